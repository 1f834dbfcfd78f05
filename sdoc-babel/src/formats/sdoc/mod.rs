//! sdoc JSON format
//!
//! The canonical tree in its JSON wire form (see `ir::wire`). Parsing tolerates
//! malformed nodes; only input that is not JSON at all, or whose root is not an
//! object, is rejected.

use crate::context::ConversionContext;
use crate::error::FormatError;
use crate::format::{source_text, Format, SerializedDocument};
use crate::ir::nodes::Document;
use crate::ir::wire::{decode_document, encode_document, RawDocument};

/// Format implementation for sdoc JSON
#[derive(Default)]
pub struct SdocFormat;

/// Parse sdoc JSON into a Document
pub fn parse_sdoc(source: &str) -> Result<Document, FormatError> {
    let raw: RawDocument = serde_json::from_str(source)
        .map_err(|e| FormatError::ParseError(format!("invalid sdoc JSON: {e}")))?;
    Ok(decode_document(raw))
}

/// Serialize a Document to pretty-printed sdoc JSON
pub fn serialize_sdoc(doc: &Document) -> Result<String, FormatError> {
    serde_json::to_string_pretty(&encode_document(doc))
        .map_err(|e| FormatError::SerializationError(format!("sdoc JSON encoding failed: {e}")))
}

impl Format for SdocFormat {
    fn name(&self) -> &str {
        "sdoc"
    }

    fn description(&self) -> &str {
        "Canonical sdoc document tree (JSON)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["sdoc", "json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &[u8], _ctx: &ConversionContext<'_>) -> Result<Document, FormatError> {
        parse_sdoc(source_text(self.name(), source)?)
    }

    fn serialize(
        &self,
        doc: &Document,
        _ctx: &ConversionContext<'_>,
    ) -> Result<SerializedDocument, FormatError> {
        serialize_sdoc(doc).map(SerializedDocument::Text)
    }
}
