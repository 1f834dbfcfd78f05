//! Flattens nested lists into one entry per item.
//!
//! # The High-Level Concept
//!
//! Markdown text and word-processor paragraphs cannot hold a list inside a list
//! item. Both encode depth on each line or paragraph instead. Walking the list
//! depth-first, in pre-order, yields the items in reading order together with their depth,
//! which is what those destinations need. Every list restarts its ordinals at 1,
//! so each nested ordered list is numbered fresh.
//!
//! The inverse is `flat_to_nested::rebuild_lists`.

use crate::common::flat_to_nested::{FlatBlock, ListParagraph};
use crate::ir::nodes::{List, ListKind, TextBlock};

/// One list item with the information needed to render it in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatListItem<'a> {
    /// 0 for items of the root list
    pub depth: usize,
    pub kind: ListKind,
    /// 1-based position within its own list
    pub ordinal: usize,
    pub paragraph: &'a TextBlock,
}

/// Depth-first walk of `list`.
pub fn flatten_list(list: &List) -> Vec<FlatListItem<'_>> {
    let mut items = Vec::new();
    walk_list(list, 0, &mut items);
    items
}

fn walk_list<'a>(list: &'a List, depth: usize, items: &mut Vec<FlatListItem<'a>>) {
    for (index, item) in list.items.iter().enumerate() {
        items.push(FlatListItem {
            depth,
            kind: list.kind,
            ordinal: index + 1,
            paragraph: &item.paragraph,
        });
        if let Some(nested) = &item.nested {
            walk_list(nested, depth + 1, items);
        }
    }
}

/// Flatten `list` into the numbering-tagged stream `rebuild_lists` consumes.
pub fn list_to_flat_blocks(list: &List, numbering_id: &str) -> Vec<FlatBlock> {
    flatten_list(list)
        .into_iter()
        .map(|item| {
            FlatBlock::ListParagraph(ListParagraph {
                numbering_id: numbering_id.to_string(),
                level: u32::try_from(item.depth).unwrap_or(u32::MAX),
                kind: item.kind,
                paragraph: item.paragraph.clone(),
            })
        })
        .collect()
}
