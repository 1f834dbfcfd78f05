//! Conversion entry points.
//!
//! [`Converter`] is the surface a service layer calls: the four tree conversions
//! plus a generic [`Converter::convert`] between any two registered formats. Every
//! path goes through the canonical tree; there is no direct Markdown ↔ DOCX route.
//!
//! [`write_artifact`] bridges serialized output and file I/O for shells such as the
//! CLI: text can stay in memory, binary output needs a path.

use crate::assets::AssetStore;
use crate::context::{ConversionContext, ConvertOptions};
use crate::error::FormatError;
use crate::format::SerializedDocument;
use crate::formats::docx::{parse_from_docx, serialize_to_docx};
use crate::formats::markdown::{parse_from_markdown, serialize_to_markdown};
use crate::ir::nodes::Document;
use crate::registry::FormatRegistry;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Stateless converter bound to an asset store and a set of options.
///
/// ```ignore
/// let converter = Converter::new(Arc::new(MemoryAssetStore::default()));
/// let doc = converter.markdown_to_tree("# Hello", "alice")?;
/// let markdown = converter.tree_to_markdown(&doc, "doc-1")?;
/// ```
pub struct Converter {
    assets: Arc<dyn AssetStore>,
    options: ConvertOptions,
    registry: FormatRegistry,
}

impl Converter {
    pub fn new(assets: Arc<dyn AssetStore>) -> Self {
        Converter {
            assets,
            options: ConvertOptions::default(),
            registry: FormatRegistry::with_defaults(),
        }
    }

    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Context for one call.
    pub fn context(&self, document_id: &str, user: &str) -> ConversionContext<'_> {
        ConversionContext::new(self.assets.as_ref())
            .with_document_id(document_id)
            .with_user(user)
            .with_options(self.options.clone())
    }

    pub fn markdown_to_tree(&self, text: &str, user: &str) -> Result<Document, FormatError> {
        parse_from_markdown(text, &self.context("", user))
    }

    pub fn tree_to_markdown(&self, doc: &Document, document_id: &str) -> Result<String, FormatError> {
        serialize_to_markdown(doc, &self.context(document_id, &doc.last_modify_user))
    }

    /// Embedded images are pushed into the asset store under `document_id`.
    pub fn word_doc_to_tree(
        &self,
        bytes: &[u8],
        user: &str,
        document_id: &str,
    ) -> Result<Document, FormatError> {
        parse_from_docx(bytes, &self.context(document_id, user))
    }

    /// Images are fetched from the asset store under `document_id`.
    pub fn tree_to_word_doc(
        &self,
        doc: &Document,
        document_id: &str,
        user: &str,
    ) -> Result<Vec<u8>, FormatError> {
        serialize_to_docx(doc, &self.context(document_id, user))
    }

    /// Convert `source` from one registered format to another.
    pub fn convert(
        &self,
        source: &[u8],
        from: &str,
        to: &str,
        document_id: &str,
        user: &str,
    ) -> Result<SerializedDocument, FormatError> {
        let ctx = self.context(document_id, user);
        let doc = self.registry.parse(source, from, &ctx)?;
        self.registry.serialize(&doc, to, &ctx)
    }
}

/// Where serialized output ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    /// Text held in memory (no output path given).
    InMemory(String),
    /// Path of the written file.
    File(PathBuf),
}

/// Write `serialized` to `output`, or keep it in memory when it is text and no path
/// is given.
pub fn write_artifact(
    serialized: SerializedDocument,
    output: Option<PathBuf>,
) -> Result<Artifact, FormatError> {
    match (serialized, output) {
        (serialized, Some(path)) => {
            fs::write(&path, serialized.into_bytes())?;
            Ok(Artifact::File(path))
        }
        (SerializedDocument::Text(text), None) => Ok(Artifact::InMemory(text)),
        (SerializedDocument::Binary(_), None) => Err(FormatError::SerializationError(
            "binary formats require an explicit output path".to_string(),
        )),
    }
}
