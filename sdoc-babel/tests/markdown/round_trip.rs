use sdoc_babel::assets::MemoryAssetStore;
use sdoc_babel::context::ConversionContext;
use sdoc_babel::formats::markdown::{parse_from_markdown, serialize_to_markdown};

fn round_trip(source: &str) -> String {
    let store = MemoryAssetStore::default();
    let ctx = ConversionContext::new(&store);
    let doc = parse_from_markdown(source, &ctx).expect("Failed to parse markdown");
    serialize_to_markdown(&doc, &ctx).expect("Failed to serialize markdown")
}

#[test]
fn test_headings_and_paragraphs() {
    let source = "# Title\n\nFirst paragraph.\n\n## Section\n\nSecond paragraph.\n";
    assert_eq!(round_trip(source), source);
}

#[test]
fn test_emphasis_markers_normalize() {
    assert_eq!(round_trip("__bold__ and _it_\n"), "**bold** and *it*\n");
}

#[test]
fn test_nested_lists() {
    let source = "* one\n    1. inner\n    2. inner two\n* two\n";
    assert_eq!(round_trip(source), source);
}

#[test]
fn test_task_list() {
    let source = "* [x] shipped\n* [ ] pending\n";
    assert_eq!(round_trip(source), source);
}

#[test]
fn test_table() {
    let source = "| a | b |\n| --- | --- |\n| 1 | 2 |\n";
    assert_eq!(round_trip(source), source);
}

#[test]
fn test_code_block() {
    let source = "```python\nprint(1)\n```\n";
    assert_eq!(round_trip(source), source);
}

#[test]
fn test_blockquote() {
    assert_eq!(round_trip("> quoted text\n"), "> quoted text\n");
}
