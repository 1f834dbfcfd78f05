//! DOCX format implementation
//!
//! Import reads the package directly: `zip` for the container and `roxmltree` for
//! the WordprocessingML parts. Export builds the package with `docx-rs`.
//!
//! # Element Mapping Table
//!
//! | sdoc Element     | DOCX Equivalent                  | Notes                                      |
//! |------------------|----------------------------------|--------------------------------------------|
//! | title / subtitle | `Title` / `Subtitle` style       |                                            |
//! | header1..6       | `Heading N` style                | Heading 7-9 import as header6              |
//! | paragraph        | Plain paragraph                  | `w:jc` ↔ align                             |
//! | blockquote       | `Intense Quote` paragraphs       | `Quote` also imports as blockquote         |
//! | code_block       | One `Code Block` paragraph/line  | Courier New, 10pt                          |
//! | ordered_list     | Numbered paragraphs              | `numFmt` decides the kind on import        |
//! | unordered_list   | Bulleted paragraphs              | Three named depths, `ilvl` carries the rest|
//! | check_list_item  | Paragraph with ☒ / ☐             | Imports as a paragraph                     |
//! | table            | Table                            | Column widths in the grid, row heights     |
//! | callout          | Shaded runs                      | Imports as plain paragraphs                |
//! | image            | Inline picture                   | Bytes go through the asset store           |
//!
//! Paragraphs without any content are dropped on import.

pub mod numbering;
pub mod package;
pub mod parser;
pub mod serializer;
pub mod styles;

use crate::context::ConversionContext;
use crate::error::FormatError;
use crate::format::{Format, SerializedDocument};
use crate::ir::nodes::Document;

pub use parser::parse_from_docx;
pub use serializer::serialize_to_docx;

/// Format implementation for Word documents
#[derive(Default)]
pub struct DocxFormat;

impl Format for DocxFormat {
    fn name(&self) -> &str {
        "docx"
    }

    fn description(&self) -> &str {
        "Office Open XML word-processing document"
    }

    fn file_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &[u8], ctx: &ConversionContext<'_>) -> Result<Document, FormatError> {
        parse_from_docx(source, ctx)
    }

    fn serialize(
        &self,
        doc: &Document,
        ctx: &ConversionContext<'_>,
    ) -> Result<SerializedDocument, FormatError> {
        serialize_to_docx(doc, ctx).map(SerializedDocument::Binary)
    }
}
