//! Paragraph and character styles
//!
//! Reading resolves `w:pStyle`/`w:rStyle` ids through `styles.xml` to a role the
//! importer understands. Writing declares the styles the exporter references, with
//! the names Word shows for its built-in styles so the importer recognizes them.

use super::package::{is_wml, wml, wml_attr, wml_bool, WML_NS};
use crate::ir::nodes::ListKind;
use docx_rs::{Docx, RunFonts, Style, StyleType};
use std::collections::HashMap;

pub const TITLE: &str = "Title";
pub const SUBTITLE: &str = "Subtitle";
pub const INTENSE_QUOTE: &str = "IntenseQuote";
pub const CODE_BLOCK: &str = "CodeBlock";
pub const CODE_FONT: &str = "Courier New";
/// Half-points.
pub const CODE_SIZE: usize = 20;

/// What a paragraph style means to the importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphRole {
    Title,
    Subtitle,
    Heading(u8),
    Quote,
    /// A `List ...` style; the kind comes from the name when there is no numbering.
    List { kind: ListKind, level: u32 },
    Body,
}

#[derive(Debug, Clone, Default)]
struct StyleInfo {
    name: Option<String>,
    based_on: Option<String>,
    num_pr: Option<(String, u32)>,
    bold: Option<bool>,
    italic: Option<bool>,
}

/// Styles declared in `styles.xml`, keyed by style id.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: HashMap<String, StyleInfo>,
}

impl StyleSheet {
    pub fn parse(xml_content: &str) -> Self {
        let mut styles = HashMap::new();
        let Ok(xml) = roxmltree::Document::parse(xml_content) else {
            return Self { styles };
        };

        for style_node in xml.root_element().children() {
            if !is_wml(style_node, "style") {
                continue;
            }
            let Some(id) = style_node.attribute((WML_NS, "styleId")) else {
                continue;
            };
            let ppr = wml(style_node, "pPr");
            let rpr = wml(style_node, "rPr");
            styles.insert(
                id.to_string(),
                StyleInfo {
                    name: wml_attr(style_node, "name").map(str::to_string),
                    based_on: wml_attr(style_node, "basedOn").map(str::to_string),
                    num_pr: ppr.and_then(|ppr| wml(ppr, "numPr")).and_then(num_pr),
                    bold: rpr.and_then(|rpr| wml_bool(rpr, "b")),
                    italic: rpr.and_then(|rpr| wml_bool(rpr, "i")),
                },
            );
        }
        Self { styles }
    }

    /// The style and its `basedOn` ancestors, nearest first.
    fn chain<'s>(&'s self, id: &'s str) -> Vec<(&'s str, Option<&'s StyleInfo>)> {
        let mut chain: Vec<(&str, Option<&StyleInfo>)> = Vec::new();
        let mut current = Some(id);
        while let Some(style_id) = current {
            if chain.iter().any(|(seen, _)| *seen == style_id) {
                break;
            }
            let info = self.styles.get(style_id);
            chain.push((style_id, info));
            current = info.and_then(|info| info.based_on.as_deref());
        }
        chain
    }

    /// Role of paragraph style `id`; the first style in the chain with a known
    /// name decides.
    pub fn role(&self, id: &str) -> ParagraphRole {
        self.chain(id)
            .into_iter()
            .find_map(|(style_id, info)| {
                let name = info.and_then(|i| i.name.as_deref()).unwrap_or(style_id);
                role_from_name(name)
            })
            .unwrap_or(ParagraphRole::Body)
    }

    /// Numbering attached to paragraph style `id` or one of its ancestors.
    pub fn numbering(&self, id: &str) -> Option<(String, u32)> {
        self.chain(id)
            .into_iter()
            .find_map(|(_, info)| info.and_then(|i| i.num_pr.clone()))
    }

    pub fn bold(&self, id: &str) -> bool {
        self.chain(id)
            .into_iter()
            .find_map(|(_, info)| info.and_then(|i| i.bold))
            .unwrap_or(false)
    }

    pub fn italic(&self, id: &str) -> bool {
        self.chain(id)
            .into_iter()
            .find_map(|(_, info)| info.and_then(|i| i.italic))
            .unwrap_or(false)
    }
}

/// `(numId, ilvl)` of a `w:numPr` element.
pub fn num_pr(node: roxmltree::Node) -> Option<(String, u32)> {
    let num_id = wml_attr(node, "numId")?;
    let level = wml_attr(node, "ilvl")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    Some((num_id.to_string(), level))
}

fn role_from_name(name: &str) -> Option<ParagraphRole> {
    let key: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    match key.as_str() {
        "title" => return Some(ParagraphRole::Title),
        "subtitle" => return Some(ParagraphRole::Subtitle),
        "quote" | "intensequote" => return Some(ParagraphRole::Quote),
        _ => {}
    }

    if let Some(level) = key.strip_prefix("heading") {
        // Word goes to Heading 9; anything past 6 is a level-6 header.
        return level
            .parse::<u8>()
            .ok()
            .filter(|level| (1..=9).contains(level))
            .map(|level| ParagraphRole::Heading(level.min(6)));
    }

    // Only the bullet and number families imply a list; "List Paragraph" and
    // "List Continue" are plain paragraphs unless numbering says otherwise.
    let list = [("listbullet", ListKind::Unordered), ("listnumber", ListKind::Ordered)]
        .into_iter()
        .find_map(|(prefix, kind)| key.strip_prefix(prefix).map(|rest| (kind, rest)))
        .filter(|(_, rest)| rest.chars().all(|c| c.is_ascii_digit()));
    if let Some((kind, rest)) = list {
        let level = rest
            .parse::<u32>()
            .map(|n| n.saturating_sub(1))
            .unwrap_or(0);
        return Some(ParagraphRole::List { kind, level });
    }

    None
}

pub fn heading_style(level: u8) -> String {
    format!("Heading{level}")
}

/// List paragraph style for an item at `depth`; Word names three depths.
pub fn list_style(kind: ListKind, depth: usize) -> String {
    let base = match kind {
        ListKind::Ordered => "ListNumber",
        ListKind::Unordered => "ListBullet",
    };
    match depth {
        0 => base.to_string(),
        1 => format!("{base}2"),
        _ => format!("{base}3"),
    }
}

/// Declare every paragraph style the exporter references.
pub fn declare_styles(docx: Docx) -> Docx {
    let mut docx = docx
        .add_style(
            Style::new(TITLE, StyleType::Paragraph)
                .name("Title")
                .size(56),
        )
        .add_style(
            Style::new(SUBTITLE, StyleType::Paragraph)
                .name("Subtitle")
                .size(30)
                .color("5A5A5A"),
        );

    for (level, size) in [(1u8, 32), (2, 28), (3, 26), (4, 24), (5, 22), (6, 20)] {
        docx = docx.add_style(
            Style::new(heading_style(level), StyleType::Paragraph)
                .name(format!("Heading {level}"))
                .size(size)
                .bold(),
        );
    }

    for (id, name) in [
        ("ListNumber", "List Number"),
        ("ListNumber2", "List Number 2"),
        ("ListNumber3", "List Number 3"),
        ("ListBullet", "List Bullet"),
        ("ListBullet2", "List Bullet 2"),
        ("ListBullet3", "List Bullet 3"),
    ] {
        docx = docx.add_style(Style::new(id, StyleType::Paragraph).name(name));
    }

    let code_fonts = RunFonts::new()
        .ascii(CODE_FONT)
        .hi_ansi(CODE_FONT)
        .east_asia(CODE_FONT)
        .cs(CODE_FONT);

    docx.add_style(
        Style::new(INTENSE_QUOTE, StyleType::Paragraph)
            .name("Intense Quote")
            .indent(Some(720), None, None, None)
            .italic(),
    )
    .add_style(
        Style::new(CODE_BLOCK, StyleType::Paragraph)
            .name("Code Block")
            .fonts(code_fonts)
            .size(CODE_SIZE),
    )
}
