use comrak::nodes::NodeValue;
use comrak::{parse_document, Arena, ComrakOptions};
use sdoc_babel::assets::MemoryAssetStore;
use sdoc_babel::common::table::{build_table, TableGeometry};
use sdoc_babel::context::ConversionContext;
use sdoc_babel::formats::markdown::serialize_to_markdown;
use sdoc_babel::ir::id::NodeId;
use sdoc_babel::ir::nodes::{
    Block, Callout, CheckListItem, Document, Header, Image, Inline, Link, List, ListItem,
    ListKind, TextBlock, TextRun,
};

fn text(value: &str) -> Vec<Inline> {
    vec![Inline::Text(TextRun::plain(value))]
}

fn serialize(blocks: Vec<Block>) -> String {
    let store = MemoryAssetStore::new("https://docs.example.com");
    let ctx = ConversionContext::new(&store).with_document_id("doc-1");
    serialize_to_markdown(&Document::new("", blocks), &ctx).expect("Failed to serialize")
}

#[test]
fn test_check_items_form_one_list() {
    let item = |checked, label: &str| {
        Block::CheckListItem(CheckListItem {
            id: NodeId::generate(),
            checked,
            children: text(label),
        })
    };
    let output = serialize(vec![item(true, "done"), item(false, "todo"), Block::paragraph(text("end"))]);
    assert_eq!(output, "* [x] done\n* [ ] todo\n\nend\n");
}

#[test]
fn test_relative_image_is_resolved() {
    let output = serialize(vec![Block::paragraph(vec![Inline::Image(Image::new(
        "/images/a.png",
    ))])]);
    assert_eq!(
        output,
        "![](https://docs.example.com/api/v2.1/seadoc/download-image/doc-1/images/a.png)\n"
    );
}

#[test]
fn test_absolute_image_passes_through() {
    let output = serialize(vec![Block::paragraph(vec![Inline::Image(Image::new(
        "https://cdn.example.com/x.png",
    ))])]);
    assert_eq!(output, "![](https://cdn.example.com/x.png)\n");
}

#[test]
fn test_link() {
    let output = serialize(vec![Block::paragraph(vec![Inline::Link(Link {
        id: NodeId::generate(),
        href: "https://example.com".to_string(),
        title: "site".to_string(),
        children: vec![TextRun::plain("site")],
    })])]);
    assert_eq!(output, "[site](https://example.com)\n");
}

#[test]
fn test_callout_renders_its_children() {
    let output = serialize(vec![Block::Callout(Callout {
        id: NodeId::generate(),
        background_color: None,
        children: vec![Block::paragraph(text("note"))],
    })]);
    assert_eq!(output, "note\n");
}

#[test]
fn test_trailing_plus_cell_reparses_as_table() {
    let table = build_table(
        vec![vec![text("op"), text("name")], vec![text("a+"), text("plus")]],
        TableGeometry::default(),
    );
    let output = serialize(vec![Block::Table(table)]);
    assert!(output.contains("| a+  |"), "{output}");

    let arena = Arena::new();
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    let root = parse_document(&arena, &output, &options);

    let table = root
        .children()
        .find(|node| matches!(node.data.borrow().value, NodeValue::Table(_)))
        .expect("output parses as a table");
    let rows: Vec<_> = table.children().collect();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row.children().count(), 2);
    }
}

#[test]
fn test_document_outline() {
    let list = List::new(
        ListKind::Ordered,
        vec![
            ListItem::new(TextBlock::new(text("install"))),
            ListItem::new(TextBlock::new(text("run"))),
        ],
    );
    let output = serialize(vec![
        Block::Title(TextBlock::new(text("Guide"))),
        Block::Header(Header::new(2, TextBlock::new(text("Setup")))),
        Block::paragraph(text("Steps below")),
        Block::List(list),
    ]);
    insta::assert_snapshot!(output, @r"
    # Guide

    ## Setup

    Steps below

    1. install
    2. run
    ");
}
