//! The canonical document tree
//!
//! `nodes` holds the typed tree every importer produces and every exporter consumes,
//! `id` the random identity scheme, and `wire` the JSON form of the tree with its
//! `format_version` handling.

pub mod id;
pub mod nodes;
pub mod wire;
