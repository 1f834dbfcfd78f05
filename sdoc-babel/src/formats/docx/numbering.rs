//! List numbering definitions
//!
//! `numbering.xml` maps a paragraph's `numId` to an abstract definition whose
//! per-level `numFmt` tells ordered from bulleted levels. Export writes one
//! definition per root list.

use super::package::{is_wml, wml, wml_attr, WML_NS};
use crate::common::nested_to_flat::flatten_list;
use crate::ir::nodes::{List, ListKind};
use docx_rs::{
    AbstractNumbering, Docx, Level, LevelJc, LevelText, NumberFormat, Numbering, SpecialIndentType,
    Start,
};
use std::collections::HashMap;

/// Formats that count; everything else (bullet, none, ...) is unordered.
const ORDERED_FORMATS: &[&str] = &[
    "decimal",
    "lowerLetter",
    "lowerRoman",
    "upperLetter",
    "upperRoman",
];

/// Word offers nine list levels.
pub const LEVELS: usize = 9;

/// Numbering definitions read from `numbering.xml`.
#[derive(Debug, Clone, Default)]
pub struct NumberingDefs {
    abstract_formats: HashMap<String, HashMap<u32, String>>,
    num_to_abstract: HashMap<String, String>,
}

impl NumberingDefs {
    pub fn parse(xml_content: &str) -> Self {
        let mut defs = Self::default();
        let Ok(xml) = roxmltree::Document::parse(xml_content) else {
            return defs;
        };

        for node in xml.root_element().children() {
            if is_wml(node, "abstractNum") {
                let Some(abstract_id) = node.attribute((WML_NS, "abstractNumId")) else {
                    continue;
                };
                let mut levels = HashMap::new();
                for lvl in node.children().filter(|n| is_wml(*n, "lvl")) {
                    let Some(ilvl) = lvl
                        .attribute((WML_NS, "ilvl"))
                        .and_then(|v| v.parse::<u32>().ok())
                    else {
                        continue;
                    };
                    let format = wml_attr(lvl, "numFmt").unwrap_or("bullet");
                    levels.insert(ilvl, format.to_string());
                }
                defs.abstract_formats.insert(abstract_id.to_string(), levels);
            } else if is_wml(node, "num") {
                let Some(num_id) = node.attribute((WML_NS, "numId")) else {
                    continue;
                };
                if let Some(abstract_id) = wml(node, "abstractNumId")
                    .and_then(|n| n.attribute((WML_NS, "val")))
                {
                    defs.num_to_abstract
                        .insert(num_id.to_string(), abstract_id.to_string());
                }
            }
        }
        defs
    }

    /// Kind of list `num_id` has at `level`, when the definition is known.
    pub fn kind(&self, num_id: &str, level: u32) -> Option<ListKind> {
        let abstract_id = self.num_to_abstract.get(num_id)?;
        let format = self.abstract_formats.get(abstract_id)?.get(&level)?;
        Some(if ORDERED_FORMATS.contains(&format.as_str()) {
            ListKind::Ordered
        } else {
            ListKind::Unordered
        })
    }
}

/// Hands out numbering ids while the exporter walks the document.
#[derive(Debug, Clone)]
pub struct NumberingAllocator {
    next_id: usize,
}

impl Default for NumberingAllocator {
    fn default() -> Self {
        // The writer declares numbering 1 itself.
        Self { next_id: 2 }
    }
}

impl NumberingAllocator {
    /// Register a definition for `list` and return the `numId` its paragraphs use.
    /// Each level takes its format from the first list met at that depth.
    pub fn add_list(&mut self, docx: Docx, list: &List) -> (Docx, usize) {
        let id = self.next_id;
        self.next_id += 1;

        let mut kinds: [Option<ListKind>; LEVELS] = [None; LEVELS];
        for item in flatten_list(list) {
            let depth = item.depth.min(LEVELS - 1);
            kinds[depth].get_or_insert(item.kind);
        }

        let mut numbering = AbstractNumbering::new(id);
        for (depth, kind) in kinds.iter().enumerate() {
            numbering = numbering.add_level(list_level(depth, kind.unwrap_or(list.kind)));
        }

        let docx = docx
            .add_abstract_numbering(numbering)
            .add_numbering(Numbering::new(id, id));
        (docx, id)
    }
}

fn list_level(depth: usize, kind: ListKind) -> Level {
    let (format, text, hanging) = match kind {
        ListKind::Ordered => ("decimal", format!("%{}.", depth + 1), 420),
        ListKind::Unordered => {
            let bullet = match depth % 3 {
                0 => "•",
                1 => "○",
                _ => "▪",
            };
            ("bullet", bullet.to_string(), 360)
        }
    };
    let indent = i32::try_from(720 * (depth + 1)).unwrap_or(i32::MAX);

    Level::new(
        depth,
        Start::new(1),
        NumberFormat::new(format),
        LevelText::new(text),
        LevelJc::new("left"),
    )
    .indent(
        Some(indent),
        Some(SpecialIndentType::Hanging(hanging)),
        None,
        None,
    )
}
