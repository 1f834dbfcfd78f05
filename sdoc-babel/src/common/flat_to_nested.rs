//! Rebuilds nested lists from a flat, numbering-tagged paragraph stream.
//!
//! # The High-Level Concept
//!
//! Word processors do not nest lists. A list is a run of ordinary paragraphs, each
//! tagged with a numbering-definition id (which list it belongs to) and an indent
//! level (how deep it sits). This module turns such a stream back into the canonical
//! `List` / `ListItem` tree.
//!
//! The key observation is that while a list is being built, new items can only ever
//! be attached along its *right spine*: the last item of the root list, the last
//! item of that item's nested list, and so on. The stack therefore holds the indent
//! levels of the items on that spine, with the root list as a sentinel at level -1.
//!
//! # The Algorithm
//!
//! 1. **New list:**
//!    - If the paragraph's numbering id differs from the open list's, flush the open
//!      list into the output and start a new root list with the stack `[-1]`
//!
//! 2. **Close deeper levels:**
//!    - Pop the stack while its top level is `>=` the incoming level
//!
//! 3. **Attach:**
//!    - If only the sentinel is left, the item is a sibling in the root list
//!    - Otherwise the top of the stack is the parent item. The new item joins the
//!      parent's nested list, which is created if the parent has none yet
//!
//! 4. **Push** the incoming level
//!
//! 5. **Other blocks:**
//!    - Any non-list block flushes the open list, then passes through unchanged
//!
//! Sequences such as `[0, 1, 0, 1]` give each level-0 item its own nested list.
//! A jump of several levels at once (`[0, 3]`) nests under the nearest open
//! ancestor, never under synthesized intermediate levels.

use crate::ir::nodes::{Block, List, ListItem, ListKind, TextBlock};
use log::debug;
use thiserror::Error;

/// Sentinel level of the root list on the stack.
const ROOT_LEVEL: i32 = -1;

/// Error type for list reconstruction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ListError {
    /// The stack points at an item that is not on the list's right spine
    #[error("no open list item at depth {0}")]
    MissingParent(usize),
}

/// One entry of the flat stream.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatBlock {
    Block(Block),
    ListParagraph(ListParagraph),
}

/// A paragraph that belongs to a list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListParagraph {
    pub numbering_id: String,
    pub level: u32,
    pub kind: ListKind,
    pub paragraph: TextBlock,
}

/// Convert a flat block stream into blocks with properly nested lists.
pub fn rebuild_lists(stream: Vec<FlatBlock>) -> Result<Vec<Block>, ListError> {
    let mut builder = ListBuilder::default();
    for entry in stream {
        match entry {
            FlatBlock::Block(block) => builder.push_block(block),
            FlatBlock::ListParagraph(paragraph) => builder.push_list_paragraph(paragraph)?,
        }
    }
    Ok(builder.finish())
}

#[derive(Debug)]
struct OpenList {
    numbering_id: String,
    root: List,
    stack: Vec<i32>,
}

#[derive(Debug, Default)]
struct ListBuilder {
    open: Option<OpenList>,
    output: Vec<Block>,
}

impl ListBuilder {
    fn push_block(&mut self, block: Block) {
        self.flush();
        self.output.push(block);
    }

    fn push_list_paragraph(&mut self, incoming: ListParagraph) -> Result<(), ListError> {
        let level = i32::try_from(incoming.level).unwrap_or(i32::MAX);

        let same_list = self
            .open
            .as_ref()
            .is_some_and(|open| open.numbering_id == incoming.numbering_id);
        if !same_list {
            self.flush();
            self.open = Some(OpenList {
                numbering_id: incoming.numbering_id.clone(),
                root: List::new(incoming.kind, Vec::new()),
                stack: vec![ROOT_LEVEL],
            });
        }
        let Some(open) = self.open.as_mut() else {
            return Ok(());
        };

        while open.stack.last().is_some_and(|&top| top >= level) {
            open.stack.pop();
        }

        let item = ListItem::new(incoming.paragraph);
        // stack[0] is the root list, stack[d + 1] the spine item at depth d
        if open.stack.len() <= 1 {
            open.root.items.push(item);
        } else {
            let depth = open.stack.len() - 2;
            let parent = spine_item_mut(&mut open.root, depth).ok_or(ListError::MissingParent(depth))?;
            match parent.nested.as_mut() {
                Some(nested) => {
                    if nested.kind != incoming.kind {
                        debug!(
                            "list item of kind {:?} joins a {:?} list at depth {}",
                            incoming.kind,
                            nested.kind,
                            depth + 1
                        );
                    }
                    nested.items.push(item);
                }
                None => parent.nested = Some(List::new(incoming.kind, vec![item])),
            }
        }
        open.stack.push(level);
        Ok(())
    }

    fn flush(&mut self) {
        if let Some(open) = self.open.take() {
            if !open.root.items.is_empty() {
                self.output.push(Block::List(open.root));
            }
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.output
    }
}

/// The last item at `depth` along the right spine of `root`.
fn spine_item_mut(root: &mut List, depth: usize) -> Option<&mut ListItem> {
    let mut item = root.items.last_mut()?;
    for _ in 0..depth {
        item = item.nested.as_mut()?.items.last_mut()?;
    }
    Some(item)
}
