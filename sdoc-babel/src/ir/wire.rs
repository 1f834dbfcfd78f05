//! JSON wire form of the canonical tree
//!
//! Decoding goes through [`RawNode`], a record where every field is optional. Typed
//! nodes are only built from it at this boundary, so a node with missing fields
//! degrades to defaults and an entry that is not a node at all is skipped, instead
//! of failing the whole document. Unknown `type` strings are dropped the same way.
//!
//! The root field that holds top-level blocks changed name across schema revisions:
//! `children` up to format version 3, `elements` from version 4 on.

use super::id::NodeId;
use super::nodes::*;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// First schema revision that stores top-level blocks under `elements`.
pub const ELEMENTS_FORMAT_VERSION: u32 = 4;

/// Root record as it appears on the wire.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modify_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursors: Option<Value>,
    #[serde(
        default,
        deserialize_with = "lenient_nodes",
        skip_serializing_if = "Option::is_none"
    )]
    pub children: Option<Vec<RawNode>>,
    #[serde(
        default,
        deserialize_with = "lenient_nodes",
        skip_serializing_if = "Option::is_none"
    )]
    pub elements: Option<Vec<RawNode>>,
}

/// Any node of the tree, block or inline, with every field optional.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<RawColumn>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<RawStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RawImageData>,
    #[serde(
        default,
        deserialize_with = "lenient_nodes",
        skip_serializing_if = "Option::is_none"
    )]
    pub children: Option<Vec<RawNode>>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RawStyle {
    /// Pixels; editors may write fractional values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub white_space: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RawColumn {
    #[serde(default)]
    pub width: Option<f64>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RawImageData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

/// Deserialize a node array, dropping entries that do not decode as nodes.
fn lenient_nodes<'de, D>(deserializer: D) -> Result<Option<Vec<RawNode>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(values.map(|values| {
        values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<RawNode>(value) {
                Ok(node) => Some(node),
                Err(err) => {
                    debug!("skipping malformed node: {err}");
                    None
                }
            })
            .collect()
    }))
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Build a typed document from its raw wire form.
pub fn decode_document(raw: RawDocument) -> Document {
    let format_version = raw.format_version.unwrap_or(CURRENT_FORMAT_VERSION);
    let (primary, fallback) = if format_version >= ELEMENTS_FORMAT_VERSION {
        (raw.elements, raw.children)
    } else {
        (raw.children, raw.elements)
    };
    let nodes = primary.or(fallback).unwrap_or_default();

    Document {
        last_modify_user: raw.last_modify_user.unwrap_or_default(),
        format_version,
        blocks: decode_blocks(&nodes),
    }
}

fn node_id(raw: &RawNode) -> NodeId {
    match &raw.id {
        Some(id) if !id.is_empty() => NodeId::from_existing(id.clone()),
        _ => NodeId::generate(),
    }
}

fn children(raw: &RawNode) -> &[RawNode] {
    raw.children.as_deref().unwrap_or(&[])
}

pub fn decode_blocks(nodes: &[RawNode]) -> Vec<Block> {
    nodes.iter().filter_map(decode_block).collect()
}

/// Decode one block; `None` for unknown or missing types.
pub fn decode_block(raw: &RawNode) -> Option<Block> {
    let kind = raw.kind.as_deref()?;
    let block = match kind {
        "title" => Block::Title(decode_text_block(raw)),
        "subtitle" => Block::Subtitle(decode_text_block(raw)),
        "paragraph" => Block::Paragraph(decode_text_block(raw)),
        "blockquote" => Block::Blockquote(Blockquote {
            id: node_id(raw),
            children: decode_blocks(children(raw)),
        }),
        "code_block" => Block::CodeBlock(CodeBlock {
            id: node_id(raw),
            language: raw.language.clone().unwrap_or_default(),
            lines: children(raw)
                .iter()
                .map(|line| CodeLine {
                    id: node_id(line),
                    text: raw_text(line),
                })
                .collect(),
        }),
        "ordered_list" => Block::List(decode_list(raw, ListKind::Ordered)),
        "unordered_list" => Block::List(decode_list(raw, ListKind::Unordered)),
        "check_list_item" => Block::CheckListItem(CheckListItem {
            id: node_id(raw),
            checked: raw.checked.unwrap_or(false),
            children: decode_inlines(children(raw)),
        }),
        "table" => Block::Table(decode_table(raw)),
        "callout" => Block::Callout(Callout {
            id: node_id(raw),
            background_color: raw
                .style
                .as_ref()
                .and_then(|style| style.background_color.clone()),
            children: decode_blocks(children(raw)),
        }),
        "image_block" => Block::ImageBlock(ImageBlock {
            id: node_id(raw),
            align: raw.align.as_deref().and_then(Align::parse),
            children: decode_inlines(children(raw)),
        }),
        other => match header_level(other) {
            Some(level) => Block::Header(Header::new(level, decode_text_block(raw))),
            None => {
                debug!("skipping unsupported block type '{other}'");
                return None;
            }
        },
    };
    Some(block)
}

fn header_level(kind: &str) -> Option<u8> {
    let level: u8 = kind.strip_prefix("header")?.parse().ok()?;
    (1..=Header::MAX_LEVEL).contains(&level).then_some(level)
}

fn decode_text_block(raw: &RawNode) -> TextBlock {
    TextBlock {
        id: node_id(raw),
        align: raw.align.as_deref().and_then(Align::parse),
        children: decode_inlines(children(raw)),
    }
}

fn decode_list(raw: &RawNode, kind: ListKind) -> List {
    List {
        id: node_id(raw),
        kind,
        items: children(raw)
            .iter()
            .filter(|child| child.kind.as_deref() == Some("list_item"))
            .map(decode_list_item)
            .collect(),
    }
}

fn decode_list_item(raw: &RawNode) -> ListItem {
    let mut paragraph = None;
    let mut nested = None;
    let mut loose_inlines = Vec::new();

    for child in children(raw) {
        match child.kind.as_deref() {
            Some("paragraph") if paragraph.is_none() => paragraph = Some(decode_text_block(child)),
            Some("ordered_list") if nested.is_none() => {
                nested = Some(decode_list(child, ListKind::Ordered))
            }
            Some("unordered_list") if nested.is_none() => {
                nested = Some(decode_list(child, ListKind::Unordered))
            }
            _ => loose_inlines.extend(decode_inline(child)),
        }
    }

    ListItem {
        id: node_id(raw),
        paragraph: paragraph.unwrap_or_else(|| TextBlock::new(loose_inlines)),
        nested,
    }
}

fn decode_table(raw: &RawNode) -> Table {
    Table {
        id: node_id(raw),
        columns: raw
            .columns
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .map(|column| Column {
                width: column.width.unwrap_or(0.0).max(0.0) as u32,
            })
            .collect(),
        rows: children(raw)
            .iter()
            .filter(|row| row.kind.as_deref() == Some("table_row"))
            .map(|row| Row {
                id: node_id(row),
                min_height: row
                    .style
                    .as_ref()
                    .and_then(|style| style.min_height)
                    .map(|height| height.max(0.0) as u32),
                cells: children(row)
                    .iter()
                    .filter(|cell| cell.kind.as_deref() == Some("table_cell"))
                    .map(|cell| Cell {
                        id: node_id(cell),
                        children: decode_inlines(children(cell)),
                    })
                    .collect(),
            })
            .collect(),
    }
}

pub fn decode_inlines(nodes: &[RawNode]) -> Vec<Inline> {
    nodes.iter().filter_map(decode_inline).collect()
}

/// Decode one inline; leaves without a `type` are text runs.
pub fn decode_inline(raw: &RawNode) -> Option<Inline> {
    match raw.kind.as_deref() {
        None | Some("text") => Some(Inline::Text(decode_text_run(raw))),
        Some("link") => Some(Inline::Link(Link {
            id: node_id(raw),
            href: raw.href.clone().unwrap_or_default(),
            title: raw.title.clone().unwrap_or_default(),
            children: children(raw)
                .iter()
                .filter(|child| child.kind.is_none())
                .map(decode_text_run)
                .collect(),
        })),
        Some("image") => {
            let data = raw.data.clone().unwrap_or_default();
            Some(Inline::Image(Image {
                id: node_id(raw),
                src: data.src.unwrap_or_default(),
                width: data.width,
                height: data.height,
            }))
        }
        Some(other) => {
            debug!("skipping unsupported inline type '{other}'");
            None
        }
    }
}

fn decode_text_run(raw: &RawNode) -> TextRun {
    TextRun {
        id: node_id(raw),
        text: raw.text.clone().unwrap_or_default(),
        style: RunStyle {
            bold: raw.bold.unwrap_or(false),
            italic: raw.italic.unwrap_or(false),
            underline: raw.underline.unwrap_or(false),
            code: raw.code.unwrap_or(false),
            color: raw.color.clone(),
            font: raw.font.clone(),
            font_size: raw.font_size,
        },
    }
}

/// Concatenated text of a node's text leaves.
fn raw_text(raw: &RawNode) -> String {
    match &raw.text {
        Some(text) => text.clone(),
        None => children(raw).iter().map(raw_text).collect(),
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Lower a typed document into its wire form.
pub fn encode_document(doc: &Document) -> RawDocument {
    let blocks: Vec<RawNode> = doc.blocks.iter().map(encode_block).collect();
    let (children, elements) = if doc.format_version >= ELEMENTS_FORMAT_VERSION {
        (None, Some(blocks))
    } else {
        (Some(blocks), None)
    };
    RawDocument {
        version: Some(1),
        format_version: Some(doc.format_version),
        last_modify_user: Some(doc.last_modify_user.clone()),
        cursors: Some(Value::Object(Map::new())),
        children,
        elements,
    }
}

fn typed(kind: &str, id: &NodeId) -> RawNode {
    RawNode {
        kind: Some(kind.to_string()),
        id: Some(id.to_string()),
        ..RawNode::default()
    }
}

pub fn encode_block(block: &Block) -> RawNode {
    match block {
        Block::Title(text) => encode_text_block("title", text),
        Block::Subtitle(text) => encode_text_block("subtitle", text),
        Block::Paragraph(text) => encode_text_block("paragraph", text),
        Block::Header(header) => encode_text_block(&format!("header{}", header.level), &header.text),
        Block::Blockquote(quote) => RawNode {
            children: Some(quote.children.iter().map(encode_block).collect()),
            ..typed("blockquote", &quote.id)
        },
        Block::CodeBlock(code) => RawNode {
            language: Some(code.language.clone()),
            style: Some(RawStyle {
                white_space: Some("nowrap".to_string()),
                ..RawStyle::default()
            }),
            children: Some(
                code.lines
                    .iter()
                    .map(|line| RawNode {
                        children: Some(vec![encode_text_run(&TextRun::plain(line.text.clone()))]),
                        ..typed("code_line", &line.id)
                    })
                    .collect(),
            ),
            ..typed("code_block", &code.id)
        },
        Block::List(list) => encode_list(list),
        Block::CheckListItem(item) => RawNode {
            checked: Some(item.checked),
            children: Some(item.children.iter().map(encode_inline).collect()),
            ..typed("check_list_item", &item.id)
        },
        Block::Table(table) => RawNode {
            columns: Some(
                table
                    .columns
                    .iter()
                    .map(|column| RawColumn {
                        width: Some(f64::from(column.width)),
                    })
                    .collect(),
            ),
            children: Some(
                table
                    .rows
                    .iter()
                    .map(|row| RawNode {
                        style: row.min_height.map(|min_height| RawStyle {
                            min_height: Some(f64::from(min_height)),
                            ..RawStyle::default()
                        }),
                        children: Some(
                            row.cells
                                .iter()
                                .map(|cell| RawNode {
                                    children: Some(
                                        cell.children.iter().map(encode_inline).collect(),
                                    ),
                                    ..typed("table_cell", &cell.id)
                                })
                                .collect(),
                        ),
                        ..typed("table_row", &row.id)
                    })
                    .collect(),
            ),
            ..typed("table", &table.id)
        },
        Block::Callout(callout) => RawNode {
            style: callout.background_color.as_ref().map(|color| RawStyle {
                background_color: Some(color.clone()),
                ..RawStyle::default()
            }),
            children: Some(callout.children.iter().map(encode_block).collect()),
            ..typed("callout", &callout.id)
        },
        Block::ImageBlock(image) => RawNode {
            align: image.align.map(|align| align.as_str().to_string()),
            children: Some(image.children.iter().map(encode_inline).collect()),
            ..typed("image_block", &image.id)
        },
    }
}

fn encode_text_block(kind: &str, text: &TextBlock) -> RawNode {
    RawNode {
        align: text.align.map(|align| align.as_str().to_string()),
        children: Some(text.children.iter().map(encode_inline).collect()),
        ..typed(kind, &text.id)
    }
}

fn encode_list(list: &List) -> RawNode {
    RawNode {
        children: Some(
            list.items
                .iter()
                .map(|item| {
                    let mut children = vec![encode_text_block("paragraph", &item.paragraph)];
                    if let Some(nested) = &item.nested {
                        children.push(encode_list(nested));
                    }
                    RawNode {
                        children: Some(children),
                        ..typed("list_item", &item.id)
                    }
                })
                .collect(),
        ),
        ..typed(list.kind.type_name(), &list.id)
    }
}

pub fn encode_inline(inline: &Inline) -> RawNode {
    match inline {
        Inline::Text(run) => encode_text_run(run),
        Inline::Link(link) => RawNode {
            href: Some(link.href.clone()),
            title: Some(link.title.clone()),
            children: Some(link.children.iter().map(encode_text_run).collect()),
            ..typed("link", &link.id)
        },
        Inline::Image(image) => RawNode {
            data: Some(RawImageData {
                src: Some(image.src.clone()),
                width: image.width,
                height: image.height,
            }),
            children: Some(vec![encode_text_run(&TextRun::placeholder())]),
            ..typed("image", &image.id)
        },
    }
}

fn encode_text_run(run: &TextRun) -> RawNode {
    let flag = |set: bool| set.then_some(true);
    RawNode {
        id: Some(run.id.to_string()),
        text: Some(run.text.clone()),
        bold: flag(run.style.bold),
        italic: flag(run.style.italic),
        underline: flag(run.style.underline),
        code: flag(run.style.code),
        color: run.style.color.clone(),
        font: run.style.font.clone(),
        font_size: run.style.font_size,
        ..RawNode::default()
    }
}
