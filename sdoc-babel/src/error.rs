//! Error types for format operations

use crate::assets::AssetError;
use thiserror::Error;

/// Errors that can occur during format operations
#[derive(Debug, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    /// The source bytes are not a valid document of the requested format
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Format does not support the requested direction
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// An asset-store call failed where the image could not be skipped
    #[error("Asset store error: {0}")]
    Asset(#[from] AssetError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
