use sdoc_babel::assets::MemoryAssetStore;
use sdoc_babel::context::ConversionContext;
use sdoc_babel::formats::docx::{parse_from_docx, serialize_to_docx};
use sdoc_babel::ir::id::NodeId;
use sdoc_babel::ir::nodes::{
    Block, Callout, Cell, CheckListItem, CodeBlock, Column, Document, Inline, Link, Row, Table,
    TextRun,
};
use std::io::{Cursor, Read};

const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

fn text(value: &str) -> Vec<Inline> {
    vec![Inline::Text(TextRun::plain(value))]
}

fn export(blocks: Vec<Block>) -> Vec<u8> {
    let store = MemoryAssetStore::default();
    let ctx = ConversionContext::new(&store).with_document_id("doc");
    serialize_to_docx(&Document::new("", blocks), &ctx).expect("Failed to serialize")
}

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("zip");
    let mut file = archive.by_name(name).expect("part");
    let mut content = String::new();
    file.read_to_string(&mut content).expect("utf-8 part");
    content
}

fn w_attr<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<&'a str> {
    node.attribute((W, name))
}

fn elements<'a>(
    xml: &'a roxmltree::Document<'a>,
    name: &'a str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'a>> + 'a {
    xml.descendants()
        .filter(move |n| n.tag_name().name() == name && n.tag_name().namespace() == Some(W))
}

fn callout(color: Option<&str>, body: &str) -> Block {
    Block::Callout(Callout {
        id: NodeId::generate(),
        background_color: color.map(str::to_string),
        children: vec![Block::paragraph(text(body))],
    })
}

#[test]
fn test_callout_shading_uses_own_or_default_color() {
    let bytes = export(vec![callout(Some("#FFEEAA"), "custom"), callout(None, "plain")]);
    let document = read_part(&bytes, "word/document.xml");
    let xml = roxmltree::Document::parse(&document).expect("xml");

    let fills: Vec<&str> = elements(&xml, "shd").filter_map(|n| w_attr(n, "fill")).collect();
    assert!(fills.contains(&"FFEEAA"), "{fills:?}");
    assert!(fills.contains(&"F4F4F4"), "{fills:?}");
}

#[test]
fn test_code_block_is_one_paragraph_per_line() {
    let bytes = export(vec![Block::CodeBlock(CodeBlock::from_source(
        "rust",
        "fn main() {\n    run();\n}",
    ))]);
    let document = read_part(&bytes, "word/document.xml");
    let xml = roxmltree::Document::parse(&document).expect("xml");

    let code_paragraphs: Vec<_> = elements(&xml, "p")
        .filter(|p| {
            p.descendants()
                .any(|n| n.tag_name().name() == "pStyle" && w_attr(n, "val") == Some("CodeBlock"))
        })
        .collect();
    assert_eq!(code_paragraphs.len(), 3);

    for paragraph in code_paragraphs {
        let fonts = paragraph
            .descendants()
            .find(|n| n.tag_name().name() == "rFonts")
            .expect("run fonts");
        assert_eq!(w_attr(fonts, "ascii"), Some("Courier New"));
        let size = paragraph
            .descendants()
            .find(|n| n.tag_name().name() == "sz")
            .expect("run size");
        assert_eq!(w_attr(size, "val"), Some("20"));
    }
}

#[test]
fn test_check_items_carry_box_prefix() {
    let item = |checked, label: &str| {
        Block::CheckListItem(CheckListItem {
            id: NodeId::generate(),
            checked,
            children: text(label),
        })
    };
    let bytes = export(vec![item(true, "done"), item(false, "todo")]);
    let document = read_part(&bytes, "word/document.xml");
    let xml = roxmltree::Document::parse(&document).expect("xml");

    let first_texts: Vec<String> = elements(&xml, "p")
        .filter_map(|p| {
            p.descendants()
                .find(|n| n.tag_name().name() == "t")
                .and_then(|t| t.text())
                .map(str::to_string)
        })
        .collect();
    assert_eq!(first_texts, vec!["☒ ", "☐ "]);
}

#[test]
fn test_hyperlinks_use_relationships_and_anchors() {
    let link = |href: &str, label: &str| {
        Inline::Link(Link {
            id: NodeId::generate(),
            href: href.to_string(),
            title: label.to_string(),
            children: vec![TextRun::plain(label)],
        })
    };
    let bytes = export(vec![Block::paragraph(vec![
        link("https://example.com", "site"),
        link("#intro", "back"),
    ])]);

    let document = read_part(&bytes, "word/document.xml");
    let xml = roxmltree::Document::parse(&document).expect("xml");
    let hyperlinks: Vec<_> = elements(&xml, "hyperlink").collect();
    assert_eq!(hyperlinks.len(), 2);

    let rel_id = hyperlinks[0].attribute((R, "id")).expect("r:id on external link");
    assert_eq!(w_attr(hyperlinks[1], "anchor"), Some("intro"));

    let rels = read_part(&bytes, "word/_rels/document.xml.rels");
    let rels = roxmltree::Document::parse(&rels).expect("rels xml");
    let target = rels
        .descendants()
        .find(|n| n.attribute("Id") == Some(rel_id))
        .expect("relationship for the link");
    assert_eq!(target.attribute("Target"), Some("https://example.com"));
    assert_eq!(target.attribute("TargetMode"), Some("External"));

    // And the importer reads both back.
    let store = MemoryAssetStore::default();
    let ctx = ConversionContext::new(&store);
    let doc = parse_from_docx(&bytes, &ctx).expect("Failed to parse docx");
    let Block::Paragraph(paragraph) = &doc.blocks[0] else {
        panic!("expected paragraph");
    };
    let hrefs: Vec<&str> = paragraph
        .children
        .iter()
        .filter_map(|inline| match inline {
            Inline::Link(link) => Some(link.href.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(hrefs, vec!["https://example.com", "#intro"]);
}

#[test]
fn test_oversized_table_hints_do_not_overflow() {
    let table = Table {
        id: NodeId::generate(),
        columns: vec![Column { width: u32::MAX }, Column { width: 300_000_000 }],
        rows: vec![Row {
            id: NodeId::generate(),
            min_height: Some(300_000_000),
            cells: vec![Cell::new(text("a")), Cell::new(text("b"))],
        }],
    };
    let bytes = export(vec![Block::Table(table)]);

    let document = read_part(&bytes, "word/document.xml");
    let xml = roxmltree::Document::parse(&document).expect("xml");
    let height = elements(&xml, "trHeight").next().expect("row height");
    assert_eq!(w_attr(height, "val"), Some("31680"));
}
