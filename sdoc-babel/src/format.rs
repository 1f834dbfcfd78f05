//! Format trait definition
//!
//! This module defines the core Format trait that all format implementations must implement.
//! The trait provides a uniform interface for parsing source bytes into the canonical tree
//! and serializing the tree back out.

use crate::context::ConversionContext;
use crate::error::FormatError;
use crate::ir::nodes::Document;

/// Serialized output produced by a [`Format`] implementation.
#[derive(Debug, Clone, PartialEq)]
pub enum SerializedDocument {
    /// UTF-8 text output (e.g., markdown, sdoc JSON)
    Text(String),
    /// Binary output (e.g., DOCX)
    Binary(Vec<u8>),
}

impl SerializedDocument {
    /// Consume the serialized output and return the underlying bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            SerializedDocument::Text(text) => text.into_bytes(),
            SerializedDocument::Binary(bytes) => bytes,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, SerializedDocument::Binary(_))
    }
}

/// Trait for document formats
///
/// Implementors provide conversion between raw bytes and the canonical [`Document`].
/// Formats can support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_parsing(&self) -> bool {
///         true
///     }
///
///     fn parse(&self, source: &[u8], ctx: &ConversionContext) -> Result<Document, FormatError> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "sdoc", "markdown", "docx")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format (e.g., ["docx"], ["md", "markdown"])
    ///
    /// Returns a slice of file extensions without the leading dot.
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (bytes → Document)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (Document → bytes)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source bytes into a Document
    ///
    /// Default implementation returns NotSupported error.
    fn parse(&self, _source: &[u8], _ctx: &ConversionContext<'_>) -> Result<Document, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a Document
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(
        &self,
        _doc: &Document,
        _ctx: &ConversionContext<'_>,
    ) -> Result<SerializedDocument, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}

/// Decode UTF-8 source text for text-based formats.
pub(crate) fn source_text<'s>(format: &str, source: &'s [u8]) -> Result<&'s str, FormatError> {
    std::str::from_utf8(source)
        .map_err(|e| FormatError::ParseError(format!("{format} source is not valid UTF-8: {e}")))
}
