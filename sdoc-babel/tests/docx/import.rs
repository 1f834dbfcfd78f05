use super::fixtures::{numbered, numbering_definition, paragraph, styled, Package};
use sdoc_babel::assets::MemoryAssetStore;
use sdoc_babel::common::inline::plain_text;
use sdoc_babel::context::ConversionContext;
use sdoc_babel::error::FormatError;
use sdoc_babel::formats::docx::parse_from_docx;
use sdoc_babel::ir::nodes::{Block, Document, Inline, List, ListKind};

fn import(bytes: &[u8]) -> Document {
    let store = MemoryAssetStore::default();
    let ctx = ConversionContext::new(&store).with_user("u");
    parse_from_docx(bytes, &ctx).expect("Failed to parse docx")
}

fn only_list(doc: &Document) -> &List {
    assert_eq!(doc.blocks.len(), 1, "{:?}", doc.blocks);
    match &doc.blocks[0] {
        Block::List(list) => list,
        other => panic!("expected list, got {other:?}"),
    }
}

#[test]
fn test_indent_sequence_0_1_1_0() {
    let body = [
        numbered(5, 0, "a"),
        numbered(5, 1, "a.1"),
        numbered(5, 1, "a.2"),
        numbered(5, 0, "b"),
    ]
    .concat();
    let bytes = Package::body(body)
        .with_numbering(numbering_definition(5, &["decimal", "bullet"]))
        .build();
    let doc = import(&bytes);
    let list = only_list(&doc);

    assert_eq!(list.kind, ListKind::Ordered);
    assert_eq!(list.items.len(), 2);
    let nested = list.items[0].nested.as_ref().expect("nested list");
    assert_eq!(nested.kind, ListKind::Unordered);
    assert_eq!(nested.items.len(), 2);
    assert!(list.items[1].nested.is_none());
}

#[test]
fn test_indent_sequence_0_1_0_1() {
    let body = [
        numbered(5, 0, "a"),
        numbered(5, 1, "a.1"),
        numbered(5, 0, "b"),
        numbered(5, 1, "b.1"),
    ]
    .concat();
    let bytes = Package::body(body)
        .with_numbering(numbering_definition(5, &["bullet", "bullet"]))
        .build();
    let doc = import(&bytes);
    let list = only_list(&doc);

    assert_eq!(list.items.len(), 2);
    let first = list.items[0].nested.as_ref().expect("a nests");
    let second = list.items[1].nested.as_ref().expect("b nests");
    assert_eq!(plain_text(&first.items[0].paragraph.children), "a.1");
    assert_eq!(plain_text(&second.items[0].paragraph.children), "b.1");
}

#[test]
fn test_heading_styles_and_fallbacks() {
    let body = [
        styled("Title", "Doc"),
        styled("Heading3", "Three"),
        styled("Heading8", "Eight"),
        styled("Unknown", "Plain"),
    ]
    .concat();
    let styles = r#"
        <w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/></w:style>
        <w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/></w:style>
        <w:style w:type="paragraph" w:styleId="Heading8"><w:name w:val="heading 8"/></w:style>
    "#;
    let doc = import(&Package::body(body).with_styles(styles).build());

    assert!(matches!(&doc.blocks[0], Block::Title(_)));
    assert!(matches!(&doc.blocks[1], Block::Header(h) if h.level == 3));
    assert!(matches!(&doc.blocks[2], Block::Header(h) if h.level == 6));
    assert!(matches!(&doc.blocks[3], Block::Paragraph(_)));
}

#[test]
fn test_empty_paragraphs_are_dropped() {
    let body = format!("<w:p/>{}<w:p><w:r><w:t></w:t></w:r></w:p>", paragraph("kept"));
    let doc = import(&Package::body(body).build());
    assert_eq!(doc.blocks.len(), 1);
}

#[test]
fn test_external_hyperlink() {
    let body = r#"<w:p><w:hyperlink r:id="rId9"><w:r><w:t>site</w:t></w:r></w:hyperlink></w:p>"#;
    let rels = r#"<Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>"#;
    let doc = import(&Package::body(body).with_rels(rels).build());

    let Block::Paragraph(paragraph) = &doc.blocks[0] else {
        panic!("expected paragraph");
    };
    let link = paragraph
        .children
        .iter()
        .find_map(|inline| match inline {
            Inline::Link(link) => Some(link),
            _ => None,
        })
        .expect("link");
    assert_eq!(link.href, "https://example.com");
    assert_eq!(link.children[0].text, "site");
}

#[test]
fn test_table_cells_keep_all_paragraphs() {
    let body = format!(
        "<w:tbl><w:tr><w:tc>{}{}</w:tc><w:tc>{}</w:tc></w:tr><w:tr><w:tc>{}</w:tc></w:tr></w:tbl>",
        paragraph("one"),
        paragraph("two"),
        paragraph("h"),
        paragraph("x"),
    );
    let doc = import(&Package::body(body).build());

    let Block::Table(table) = &doc.blocks[0] else {
        panic!("expected table");
    };
    assert_eq!(plain_text(&table.rows[0].cells[0].children), "one\ntwo");
    assert_eq!(table.rows[1].cells.len(), 2);
}

#[test]
fn test_missing_document_part_is_fatal() {
    let mut buffer = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buffer));
        zip.start_file("other.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.finish().unwrap();
    }
    let store = MemoryAssetStore::default();
    let ctx = ConversionContext::new(&store);
    assert!(matches!(
        parse_from_docx(&buffer, &ctx),
        Err(FormatError::ParseError(_))
    ));
}

#[test]
fn test_anchor_hyperlink() {
    let body = r#"<w:p><w:hyperlink w:anchor="intro"><w:r><w:t>back</w:t></w:r></w:hyperlink></w:p>"#;
    let doc = import(&Package::body(body).build());

    let Block::Paragraph(paragraph) = &doc.blocks[0] else {
        panic!("expected paragraph");
    };
    assert!(paragraph
        .children
        .iter()
        .any(|inline| matches!(inline, Inline::Link(link) if link.href == "#intro")));
}

#[test]
fn test_num_id_zero_is_not_a_list() {
    let body = numbered(0, 0, "plain");
    let doc = import(&Package::body(body).build());
    assert!(matches!(&doc.blocks[0], Block::Paragraph(_)));
}

#[test]
fn test_character_style_bold() {
    let body = r#"<w:p><w:r><w:rPr><w:rStyle w:val="Strong"/></w:rPr><w:t>heavy</w:t></w:r></w:p>"#;
    let styles = r#"<w:style w:type="character" w:styleId="Strong"><w:name w:val="Strong"/><w:rPr><w:b/></w:rPr></w:style>"#;
    let doc = import(&Package::body(body).with_styles(styles).build());

    let Block::Paragraph(paragraph) = &doc.blocks[0] else {
        panic!("expected paragraph");
    };
    let run = paragraph
        .children
        .iter()
        .find_map(|inline| match inline {
            Inline::Text(run) if run.text == "heavy" => Some(run),
            _ => None,
        })
        .expect("run");
    assert!(run.style.bold);
}

#[test]
fn test_list_paragraph_without_numbering_stays_paragraph() {
    let switched_off = r#"<w:p><w:pPr><w:pStyle w:val="ListParagraph"/><w:numPr><w:ilvl w:val="0"/><w:numId w:val="0"/></w:numPr></w:pPr><w:r><w:t>off</w:t></w:r></w:p>"#;
    let body = [
        switched_off.to_string(),
        styled("ListParagraph", "no numbering"),
        paragraph("plain"),
    ]
    .concat();
    let styles = r#"<w:style w:type="paragraph" w:styleId="ListParagraph"><w:name w:val="List Paragraph"/></w:style>"#;
    let doc = import(&Package::body(body).with_styles(styles).build());

    assert_eq!(doc.blocks.len(), 3, "{:?}", doc.blocks);
    assert!(doc
        .blocks
        .iter()
        .all(|block| matches!(block, Block::Paragraph(_))));
}

#[test]
fn test_num_id_zero_overrides_list_style() {
    let body = [
        styled("ListBullet", "bullet"),
        r#"<w:p><w:pPr><w:pStyle w:val="ListBullet"/><w:numPr><w:numId w:val="0"/></w:numPr></w:pPr><w:r><w:t>off</w:t></w:r></w:p>"#.to_string(),
    ]
    .concat();
    let styles = r#"<w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/></w:style>"#;
    let doc = import(&Package::body(body).with_styles(styles).build());

    assert_eq!(doc.blocks.len(), 2);
    assert!(matches!(&doc.blocks[0], Block::List(list) if list.kind == ListKind::Unordered));
    assert!(matches!(&doc.blocks[1], Block::Paragraph(_)));
}
