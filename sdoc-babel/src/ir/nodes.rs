//! Core data structures of the canonical document tree.
//!
//! The tree is the pivot every conversion passes through. Every variant set here is
//! closed: adding a block or inline kind is meant to break every `match` that
//! dispatches on it.

use super::id::NodeId;

/// Schema revision written by the importers.
pub const CURRENT_FORMAT_VERSION: u32 = 4;

/// Represents the root of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub last_modify_user: String,
    pub format_version: u32,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(last_modify_user: impl Into<String>, blocks: Vec<Block>) -> Self {
        Document {
            last_modify_user: last_modify_user.into(),
            format_version: CURRENT_FORMAT_VERSION,
            blocks,
        }
    }
}

/// A structural document unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(TextBlock),
    Subtitle(TextBlock),
    Header(Header),
    Paragraph(TextBlock),
    Blockquote(Blockquote),
    CodeBlock(CodeBlock),
    /// Ordered and unordered lists; the two are told apart by [`List::kind`].
    List(List),
    CheckListItem(CheckListItem),
    Table(Table),
    Callout(Callout),
    ImageBlock(ImageBlock),
}

impl Block {
    pub fn id(&self) -> &NodeId {
        match self {
            Block::Title(b) | Block::Subtitle(b) | Block::Paragraph(b) => &b.id,
            Block::Header(h) => &h.text.id,
            Block::Blockquote(q) => &q.id,
            Block::CodeBlock(c) => &c.id,
            Block::List(l) => &l.id,
            Block::CheckListItem(c) => &c.id,
            Block::Table(t) => &t.id,
            Block::Callout(c) => &c.id,
            Block::ImageBlock(i) => &i.id,
        }
    }

    pub fn paragraph(children: Vec<Inline>) -> Self {
        Block::Paragraph(TextBlock::new(children))
    }
}

/// Horizontal alignment of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Align::Left),
            "center" => Some(Align::Center),
            "right" | "end" => Some(Align::Right),
            _ => None,
        }
    }
}

/// A block made of inline runs: titles, subtitles, paragraphs and heading bodies.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBlock {
    pub id: NodeId,
    pub align: Option<Align>,
    pub children: Vec<Inline>,
}

impl TextBlock {
    pub fn new(children: Vec<Inline>) -> Self {
        TextBlock {
            id: NodeId::generate(),
            align: None,
            children,
        }
    }

    pub fn with_align(mut self, align: Option<Align>) -> Self {
        self.align = align;
        self
    }
}

/// A heading, level 1 to 6.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub level: u8,
    pub text: TextBlock,
}

impl Header {
    pub const MAX_LEVEL: u8 = 6;

    /// Levels outside `1..=6` are clamped into range.
    pub fn new(level: u8, text: TextBlock) -> Self {
        Header {
            level: level.clamp(1, Self::MAX_LEVEL),
            text,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Blockquote {
    pub id: NodeId,
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub id: NodeId,
    pub language: String,
    pub lines: Vec<CodeLine>,
}

impl CodeBlock {
    pub fn from_source(language: impl Into<String>, source: &str) -> Self {
        CodeBlock {
            id: NodeId::generate(),
            language: language.into(),
            lines: source.lines().map(CodeLine::new).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeLine {
    pub id: NodeId,
    pub text: String,
}

impl CodeLine {
    pub fn new(text: impl Into<String>) -> Self {
        CodeLine {
            id: NodeId::generate(),
            text: text.into(),
        }
    }
}

/// Whether a list is numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    pub fn type_name(self) -> &'static str {
        match self {
            ListKind::Ordered => "ordered_list",
            ListKind::Unordered => "unordered_list",
        }
    }
}

/// Represents a list of items.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub id: NodeId,
    pub kind: ListKind,
    pub items: Vec<ListItem>,
}

impl List {
    pub fn new(kind: ListKind, items: Vec<ListItem>) -> Self {
        List {
            id: NodeId::generate(),
            kind,
            items,
        }
    }
}

/// One list entry: a paragraph plus an optional nested list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub id: NodeId,
    pub paragraph: TextBlock,
    pub nested: Option<List>,
}

impl ListItem {
    pub fn new(paragraph: TextBlock) -> Self {
        ListItem {
            id: NodeId::generate(),
            paragraph,
            nested: None,
        }
    }

    pub fn with_nested(mut self, nested: List) -> Self {
        self.nested = Some(nested);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckListItem {
    pub id: NodeId,
    pub checked: bool,
    pub children: Vec<Inline>,
}

/// Represents a table. Row 0 is the header row.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub id: NodeId,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

/// Width hint for one table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: NodeId,
    pub min_height: Option<u32>,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    pub id: NodeId,
    pub children: Vec<Inline>,
}

impl Cell {
    pub fn new(children: Vec<Inline>) -> Self {
        Cell {
            id: NodeId::generate(),
            children,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Callout {
    pub id: NodeId,
    pub background_color: Option<String>,
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub id: NodeId,
    pub align: Option<Align>,
    pub children: Vec<Inline>,
}

/// Leaf content inside a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(TextRun),
    Link(Link),
    Image(Image),
}

/// Style flags carried by a text run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub code: bool,
    /// `#RRGGBB`
    pub color: Option<String>,
    pub font: Option<String>,
    /// Points.
    pub font_size: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextRun {
    pub id: NodeId,
    pub text: String,
    pub style: RunStyle,
}

impl TextRun {
    pub fn new(text: impl Into<String>, style: RunStyle) -> Self {
        TextRun {
            id: NodeId::generate(),
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, RunStyle::default())
    }

    /// The empty run that flanks links and images.
    pub fn placeholder() -> Self {
        Self::plain("")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: NodeId,
    pub href: String,
    pub title: String,
    pub children: Vec<TextRun>,
}

/// Represents an image. `src` is an absolute URL or a path relative to the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub id: NodeId,
    pub src: String,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl Image {
    pub fn new(src: impl Into<String>) -> Self {
        Image {
            id: NodeId::generate(),
            src: src.into(),
            width: None,
            height: None,
        }
    }
}
