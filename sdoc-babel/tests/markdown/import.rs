use sdoc_babel::assets::MemoryAssetStore;
use sdoc_babel::context::ConversionContext;
use sdoc_babel::formats::markdown::parse_from_markdown;
use sdoc_babel::ir::nodes::{Block, Document, Inline, ListKind};

fn parse(source: &str) -> Document {
    let store = MemoryAssetStore::default();
    let ctx = ConversionContext::new(&store).with_user("importer");
    parse_from_markdown(source, &ctx).expect("Failed to parse markdown")
}

#[test]
fn test_bold_italic_is_one_run() {
    let doc = parse("***both***\n");
    let Block::Paragraph(paragraph) = &doc.blocks[0] else {
        panic!("expected paragraph, got {:?}", doc.blocks[0]);
    };

    assert_eq!(paragraph.children.len(), 1);
    let Inline::Text(run) = &paragraph.children[0] else {
        panic!("expected a text run");
    };
    assert_eq!(run.text, "both");
    assert!(run.style.bold && run.style.italic);
}

#[test]
fn test_link_is_flanked_by_placeholders() {
    let doc = parse("see [docs](https://example.com) now\n");
    let Block::Paragraph(paragraph) = &doc.blocks[0] else {
        panic!("expected paragraph");
    };

    let kinds: Vec<&str> = paragraph
        .children
        .iter()
        .map(|inline| match inline {
            Inline::Text(run) if run.text.is_empty() => "placeholder",
            Inline::Text(_) => "text",
            Inline::Link(_) => "link",
            Inline::Image(_) => "image",
        })
        .collect();
    assert_eq!(kinds, ["text", "placeholder", "link", "placeholder", "text"]);

    let Inline::Link(link) = &paragraph.children[2] else {
        panic!("expected link");
    };
    assert_eq!(link.href, "https://example.com");
    assert_eq!(link.title, "docs");
}

#[test]
fn test_document_metadata() {
    let doc = parse("text\n");
    assert_eq!(doc.last_modify_user, "importer");
    assert_eq!(doc.format_version, 4);
}

#[test]
fn test_mixed_document() {
    let doc = parse(
        "# Plan\n\n1. first\n2. second\n\n- [ ] open\n- [x] closed\n\n> quoted\n\n```sh\nls -la\n```\n",
    );

    assert!(matches!(&doc.blocks[0], Block::Header(h) if h.level == 1));
    assert!(matches!(&doc.blocks[1], Block::List(l) if l.kind == ListKind::Ordered && l.items.len() == 2));
    assert!(matches!(&doc.blocks[2], Block::CheckListItem(item) if !item.checked));
    assert!(matches!(&doc.blocks[3], Block::CheckListItem(item) if item.checked));
    assert!(matches!(&doc.blocks[4], Block::Blockquote(q) if q.children.len() == 1));
    match &doc.blocks[5] {
        Block::CodeBlock(code) => {
            assert_eq!(code.language, "sh");
            assert_eq!(code.lines.len(), 1);
            assert_eq!(code.lines[0].text, "ls -la");
        }
        other => panic!("expected code block, got {other:?}"),
    }
    assert_eq!(doc.blocks.len(), 6);
}

#[test]
fn test_unsupported_html_block_is_skipped() {
    let doc = parse("<div>raw</div>\n\nafter\n");
    assert_eq!(doc.blocks.len(), 1);
    assert!(matches!(&doc.blocks[0], Block::Paragraph(_)));
}

#[test]
fn test_thematic_break_is_ignored() {
    let doc = parse("a\n\n---\n\nb\n");
    assert_eq!(doc.blocks.len(), 2);
}
