//! Node identity
//!
//! Every node of the canonical tree carries a short random id. Ids are drawn from
//! v4 UUIDs, so independent conversions running on different threads never share
//! a counter and never collide in practice.

use std::fmt;
use uuid::Uuid;

/// Number of hex characters kept from the UUID.
pub const ID_LEN: usize = 22;

/// Opaque node identifier, unique within one tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(String);

impl NodeId {
    /// Draw a fresh identifier.
    pub fn generate() -> Self {
        let mut hex = Uuid::new_v4().simple().to_string();
        hex.truncate(ID_LEN);
        NodeId(hex)
    }

    /// Wrap an identifier read from an existing tree.
    pub fn from_existing(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
