//! Markdown format implementation
//!
//! This module implements bidirectional conversion between sdoc trees and CommonMark
//! Markdown (with the table and task-list extensions).
//!
//! # Library Choice
//!
//! Parsing and printing use `comrak`. Export builds small HTML fragments with
//! `markup5ever_rcdom` first, so inline styling is expressed once as elements and
//! lowered by a single normalizer.
//!
//! # Element Mapping Table
//!
//! | sdoc Element     | Markdown Equivalent     | Export Notes                           | Import Notes                          |
//! |------------------|-------------------------|----------------------------------------|---------------------------------------|
//! | title / subtitle | `#` / `##`              | Lossy: come back as headers            | Never produced                        |
//! | header1..6       | Heading (# .. ######)   | Direct mapping                         | Direct mapping                        |
//! | paragraph        | Paragraph               | Direct mapping                         | Empty paragraphs dropped              |
//! | blockquote       | `> `                    | Children rendered inside the quote     | Children recurse                      |
//! | code_block       | Fenced code block       | Fence longer than any backtick run     | Info string → language                |
//! | ordered_list     | `1. ` lines             | Four spaces per depth                  | Nested lists preserved                |
//! | unordered_list   | `* ` lines              | Four spaces per depth                  | Nested lists preserved                |
//! | check_list_item  | `* [x] ` / `* [ ] `     | Consecutive items form one list        | One block per task item               |
//! | table            | Pipe table              | First row is the header row            | Columns split the default width       |
//! | callout          | Its children            | Background colour lost                 | Never produced                        |
//! | image_block      | Paragraph with image    | URL resolved through the asset store   | Never produced                        |
//! | Inline:          |                         |                                        |                                       |
//! |   bold / italic  | `**x**` / `*x*`         | Direct                                 | Direct                                |
//! |   code           | `` `x` ``               | Direct                                 | Direct                                |
//! |   underline      | Plain text              | Lost                                   | Never produced                        |
//! |   link           | `[text](url)`           | Title kept when it differs from text   | Title defaults to the text            |
//! |   image          | `![](url)`              | Placeholder runs dropped               | Also from inline `<img>` HTML         |
//!
//! # Lossy Conversions
//!
//! - Alignment, colours, fonts and sizes have no Markdown form.
//! - Loose list items keep only their paragraphs, joined into one.
//! - Raw HTML other than `<img>` is dropped (inline HTML becomes an empty run).

mod fragment;
mod normalize;
pub mod parser;
pub mod serializer;

use crate::context::ConversionContext;
use crate::error::FormatError;
use crate::format::{source_text, Format, SerializedDocument};
use crate::ir::nodes::Document;

pub use parser::parse_from_markdown;
pub use serializer::serialize_to_markdown;

/// Format implementation for Markdown
#[derive(Default)]
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown with tables and task lists"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &[u8], ctx: &ConversionContext<'_>) -> Result<Document, FormatError> {
        parse_from_markdown(source_text(self.name(), source)?, ctx)
    }

    fn serialize(
        &self,
        doc: &Document,
        ctx: &ConversionContext<'_>,
    ) -> Result<SerializedDocument, FormatError> {
        serialize_to_markdown(doc, ctx).map(SerializedDocument::Text)
    }
}
