//! DOCX package access: the zip container, its relationships and WordprocessingML
//! lookup helpers shared by the readers.

use crate::error::FormatError;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const DML_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const WPD_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
pub const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const STYLES_PART: &str = "word/styles.xml";
pub const NUMBERING_PART: &str = "word/numbering.xml";
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Target of one relationship in `document.xml.rels`.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub target: String,
    pub external: bool,
}

/// An opened `.docx` container.
pub struct DocxPackage<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> DocxPackage<'a> {
    pub fn open(bytes: &'a [u8]) -> Result<Self, FormatError> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| FormatError::ParseError(format!("not a DOCX package: {e}")))?;
        Ok(Self { archive })
    }

    /// The main document part; a package without one is not a Word document.
    pub fn document_xml(&mut self) -> Result<String, FormatError> {
        self.read_text(DOCUMENT_PART).ok_or_else(|| {
            FormatError::ParseError(format!("DOCX package has no {DOCUMENT_PART}"))
        })
    }

    pub fn read_text(&mut self, name: &str) -> Option<String> {
        let mut content = String::new();
        self.archive
            .by_name(name)
            .ok()?
            .read_to_string(&mut content)
            .ok()?;
        Some(content)
    }

    pub fn read_bytes(&mut self, name: &str) -> Option<Vec<u8>> {
        let mut content = Vec::new();
        self.archive
            .by_name(name)
            .ok()?
            .read_to_end(&mut content)
            .ok()?;
        Some(content)
    }

    /// Relationships of the main document part, keyed by `r:id`.
    pub fn relationships(&mut self) -> HashMap<String, Relationship> {
        let mut rels = HashMap::new();
        let Some(xml_content) = self.read_text(DOCUMENT_RELS_PART) else {
            return rels;
        };
        let Ok(xml) = roxmltree::Document::parse(&xml_content) else {
            return rels;
        };
        for node in xml.root_element().children() {
            if node.tag_name().name() != "Relationship" {
                continue;
            }
            if let (Some(id), Some(target)) = (node.attribute("Id"), node.attribute("Target")) {
                rels.insert(
                    id.to_string(),
                    Relationship {
                        target: target.to_string(),
                        external: node.attribute("TargetMode") == Some("External"),
                    },
                );
            }
        }
        rels
    }
}

/// Zip entry name of a relationship target relative to `word/`.
pub fn part_path(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("word/{}", target.trim_start_matches("./")),
    }
}

/// First WordprocessingML child of `node` named `name`.
pub fn wml<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.children()
        .find(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(WML_NS))
}

/// `w:val` of the child `child`.
pub fn wml_attr<'a, 'input>(node: roxmltree::Node<'a, 'input>, child: &str) -> Option<&'a str> {
    wml(node, child).and_then(|n| n.attribute((WML_NS, "val")))
}

/// A toggle property such as `w:b`: present with no `w:val`, or any value other than
/// `0`/`false`, means on.
pub fn wml_bool(parent: roxmltree::Node, name: &str) -> Option<bool> {
    wml(parent, name).map(|n| {
        n.attribute((WML_NS, "val"))
            .is_none_or(|v| v != "0" && v != "false")
    })
}

pub fn is_wml(node: roxmltree::Node, name: &str) -> bool {
    node.tag_name().name() == name && node.tag_name().namespace() == Some(WML_NS)
}
