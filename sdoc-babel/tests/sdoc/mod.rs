//! sdoc JSON format tests
//!
//! Exercise the wire form through the public parse/serialize pair, looking at
//! the produced JSON directly where key placement matters.

use sdoc_babel::error::FormatError;
use sdoc_babel::formats::sdoc::{parse_sdoc, serialize_sdoc};
use sdoc_babel::ir::nodes::{Block, CodeBlock, Document, Inline, ListKind};
use serde_json::Value;

fn to_json(doc: &Document) -> Value {
    let text = serialize_sdoc(doc).expect("serialize");
    serde_json::from_str(&text).expect("valid json")
}

#[test]
fn test_version_three_reads_children() {
    let doc = parse_sdoc(
        r#"{
            "version": 1,
            "format_version": 3,
            "last_modify_user": "alice",
            "children": [
                {"type": "header2", "id": "h", "children": [{"id": "t", "text": "Heading"}]}
            ]
        }"#,
    )
    .expect("parse");

    assert_eq!(doc.format_version, 3);
    assert_eq!(doc.last_modify_user, "alice");
    assert!(matches!(&doc.blocks[0], Block::Header(h) if h.level == 2));
    assert_eq!(doc.blocks[0].id().as_str(), "h");
}

#[test]
fn test_version_four_falls_back_to_children() {
    let doc = parse_sdoc(
        r#"{"format_version": 4, "children": [{"type": "paragraph", "children": [{"text": "x"}]}]}"#,
    )
    .expect("parse");
    assert_eq!(doc.blocks.len(), 1);
}

#[test]
fn test_blocks_written_under_version_key() {
    let mut doc = Document::new("bob", vec![Block::paragraph(Vec::new())]);
    let current = to_json(&doc);
    assert!(current.get("elements").is_some());
    assert!(current.get("children").is_none());
    assert_eq!(current["last_modify_user"], "bob");

    doc.format_version = 3;
    let legacy = to_json(&doc);
    assert!(legacy.get("children").is_some());
    assert!(legacy.get("elements").is_none());
}

#[test]
fn test_malformed_and_unknown_nodes_are_skipped() {
    let doc = parse_sdoc(
        r#"{
            "format_version": 4,
            "elements": [
                "not a node",
                {"type": "mystery_block", "children": []},
                {"type": "paragraph", "children": [{"text": "kept"}, {"type": "mention"}, 42]},
                {"children": [{"text": "no type"}]}
            ]
        }"#,
    )
    .expect("parse");

    assert_eq!(doc.blocks.len(), 1);
    let Block::Paragraph(paragraph) = &doc.blocks[0] else {
        panic!("expected paragraph");
    };
    assert_eq!(paragraph.children.len(), 1);
}

#[test]
fn test_code_block_lines() {
    let doc = Document::new(
        "u",
        vec![Block::CodeBlock(CodeBlock::from_source("rust", "let a = 1;\nlet b = 2;"))],
    );
    let json = to_json(&doc);
    let block = &json["elements"][0];
    assert_eq!(block["type"], "code_block");
    assert_eq!(block["language"], "rust");
    assert_eq!(block["style"]["white_space"], "nowrap");
    assert_eq!(block["children"][1]["type"], "code_line");
    assert_eq!(block["children"][1]["children"][0]["text"], "let b = 2;");

    let back = parse_sdoc(&serialize_sdoc(&doc).expect("serialize")).expect("parse");
    let Block::CodeBlock(code) = &back.blocks[0] else {
        panic!("expected code block");
    };
    assert_eq!(code.lines.len(), 2);
    assert_eq!(code.lines[0].text, "let a = 1;");
}

#[test]
fn test_image_and_list_shapes() {
    let doc = parse_sdoc(
        r#"{
            "format_version": 4,
            "elements": [
                {"type": "image_block", "align": "center", "children": [
                    {"type": "image", "data": {"src": "/images/a.png", "width": 120}, "children": [{"text": ""}]}
                ]},
                {"type": "unordered_list", "children": [
                    {"type": "list_item", "children": [
                        {"type": "paragraph", "children": [{"text": "one"}]},
                        {"type": "ordered_list", "children": [
                            {"type": "list_item", "children": [{"type": "paragraph", "children": [{"text": "inner"}]}]}
                        ]}
                    ]}
                ]}
            ]
        }"#,
    )
    .expect("parse");

    let Block::ImageBlock(image_block) = &doc.blocks[0] else {
        panic!("expected image block");
    };
    let Inline::Image(image) = &image_block.children[0] else {
        panic!("expected image");
    };
    assert_eq!(image.src, "/images/a.png");
    assert_eq!(image.width, Some(120.0));
    assert_eq!(image.height, None);

    let Block::List(list) = &doc.blocks[1] else {
        panic!("expected list");
    };
    assert_eq!(list.kind, ListKind::Unordered);
    let nested = list.items[0].nested.as_ref().expect("nested");
    assert_eq!(nested.kind, ListKind::Ordered);
}

#[test]
fn test_table_columns_and_row_height() {
    let source = r#"{
        "format_version": 4,
        "elements": [
            {"type": "table", "columns": [{"width": 100}, {"width": 124.5}], "children": [
                {"type": "table_row", "style": {"min_height": 43}, "children": [
                    {"type": "table_cell", "children": [{"text": "a"}]},
                    {"type": "table_cell", "children": [{"text": "b"}]}
                ]}
            ]}
        ]
    }"#;
    let doc = parse_sdoc(source).expect("parse");
    let Block::Table(table) = &doc.blocks[0] else {
        panic!("expected table");
    };
    assert_eq!(table.columns[1].width, 124);
    assert_eq!(table.rows[0].min_height, Some(43));

    let json = to_json(&doc);
    assert_eq!(json["elements"][0]["children"][0]["style"]["min_height"], 43.0);
}

#[test]
fn test_fractional_row_height_keeps_row() {
    let source = r#"{
        "format_version": 4,
        "elements": [
            {"type": "table", "columns": [{"width": 80}], "children": [
                {"type": "table_row", "style": {"min_height": 43.5}, "children": [
                    {"type": "table_cell", "children": [{"text": "kept"}]}
                ]}
            ]}
        ]
    }"#;
    let doc = parse_sdoc(source).expect("parse");
    let Block::Table(table) = &doc.blocks[0] else {
        panic!("expected table");
    };
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].min_height, Some(43));
    assert_eq!(table.rows[0].cells.len(), 1);
}

#[test]
fn test_not_json_is_fatal() {
    assert!(matches!(
        parse_sdoc("{ not json"),
        Err(FormatError::ParseError(_))
    ));
    assert!(matches!(
        parse_sdoc(r#""just a string""#),
        Err(FormatError::ParseError(_))
    ));
}
