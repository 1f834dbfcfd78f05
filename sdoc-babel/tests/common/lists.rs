use sdoc_babel::common::flat_to_nested::{rebuild_lists, FlatBlock, ListParagraph};
use sdoc_babel::common::nested_to_flat::list_to_flat_blocks;
use sdoc_babel::ir::nodes::{Block, Inline, List, ListItem, ListKind, TextBlock, TextRun};

fn paragraph(text: &str) -> TextBlock {
    TextBlock::new(vec![Inline::Text(TextRun::plain(text))])
}

fn stream(levels: &[u32]) -> Vec<FlatBlock> {
    levels
        .iter()
        .enumerate()
        .map(|(index, level)| {
            FlatBlock::ListParagraph(ListParagraph {
                numbering_id: "1".to_string(),
                level: *level,
                kind: ListKind::Unordered,
                paragraph: paragraph(&format!("item {index}")),
            })
        })
        .collect()
}

fn single_list(blocks: Vec<Block>) -> List {
    assert_eq!(blocks.len(), 1, "expected one list, got {blocks:?}");
    match blocks.into_iter().next() {
        Some(Block::List(list)) => list,
        other => panic!("expected a list, got {other:?}"),
    }
}

#[test]
fn test_sibling_nested_items_share_one_list() {
    let list = single_list(rebuild_lists(stream(&[0, 1, 1, 0])).unwrap());

    assert_eq!(list.items.len(), 2);
    let nested = list.items[0].nested.as_ref().expect("first item nests");
    assert_eq!(nested.items.len(), 2);
    assert!(list.items[1].nested.is_none());
}

#[test]
fn test_resumed_levels_nest_under_their_own_parent() {
    let list = single_list(rebuild_lists(stream(&[0, 1, 0, 1])).unwrap());

    assert_eq!(list.items.len(), 2);
    for item in &list.items {
        let nested = item.nested.as_ref().expect("each root item nests");
        assert_eq!(nested.items.len(), 1);
    }
}

#[test]
fn test_numbering_change_starts_a_new_list() {
    let mut blocks = stream(&[0, 0]);
    if let FlatBlock::ListParagraph(paragraph) = &mut blocks[1] {
        paragraph.numbering_id = "2".to_string();
    }
    let rebuilt = rebuild_lists(blocks).unwrap();
    assert_eq!(rebuilt.len(), 2);
}

#[test]
fn test_flatten_then_rebuild_keeps_shape() {
    let deep = List::new(ListKind::Ordered, vec![ListItem::new(paragraph("c"))]);
    let middle = List::new(
        ListKind::Unordered,
        vec![ListItem::new(paragraph("b")).with_nested(deep)],
    );
    let list = List::new(
        ListKind::Ordered,
        vec![
            ListItem::new(paragraph("a")).with_nested(middle),
            ListItem::new(paragraph("d")),
        ],
    );

    let rebuilt = single_list(rebuild_lists(list_to_flat_blocks(&list, "n")).unwrap());

    assert_eq!(rebuilt.kind, ListKind::Ordered);
    assert_eq!(rebuilt.items.len(), 2);
    let middle = rebuilt.items[0].nested.as_ref().expect("middle level");
    assert_eq!(middle.kind, ListKind::Unordered);
    let deep = middle.items[0].nested.as_ref().expect("deep level");
    assert_eq!(deep.kind, ListKind::Ordered);
    assert_eq!(deep.items.len(), 1);
}
