//! Markdown serialization (sdoc → Markdown export)
//!
//! Text-like blocks go through an HTML fragment and the normalizer. Lists, tables
//! and code blocks are written directly: their marker and fence rules are fixed and
//! the fragment route would lose them.

use super::fragment::{block_fragment, inline_paragraph};
use super::normalize::{fragment_to_markdown, inline_markdown, LIST_INDENT};
use crate::common::nested_to_flat::flatten_list;
use crate::common::table::{cell_line, padded_cells};
use crate::context::ConversionContext;
use crate::error::FormatError;
use crate::ir::nodes::{Block, Cell, CodeBlock, Document, Inline, List, ListKind, Table};

/// Serialize a canonical Document to Markdown
pub fn serialize_to_markdown(
    doc: &Document,
    ctx: &ConversionContext<'_>,
) -> Result<String, FormatError> {
    let mut output = String::new();
    let mut previous_was_check = false;

    for block in &doc.blocks {
        let rendered = render_block(block, ctx)?;
        if rendered.is_empty() {
            continue;
        }
        let is_check = matches!(block, Block::CheckListItem(_));
        if !output.is_empty() {
            // Consecutive check items stay one list.
            output.push_str(if is_check && previous_was_check {
                "\n"
            } else {
                "\n\n"
            });
        }
        output.push_str(&rendered);
        previous_was_check = is_check;
    }

    if !output.is_empty() {
        output.push('\n');
    }
    Ok(output)
}

fn render_block(block: &Block, ctx: &ConversionContext<'_>) -> Result<String, FormatError> {
    if let Some(fragment) = block_fragment(block, ctx) {
        return fragment_to_markdown(&fragment);
    }

    match block {
        Block::List(list) => render_list(list, ctx),
        Block::Table(table) => render_table(table, ctx),
        Block::CodeBlock(code) => Ok(render_code(code)),
        Block::Blockquote(quote) => {
            let body = render_blocks(&quote.children, ctx)?;
            Ok(body
                .lines()
                .map(|line| {
                    if line.is_empty() {
                        ">".to_string()
                    } else {
                        format!("> {line}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"))
        }
        Block::Callout(callout) => render_blocks(&callout.children, ctx),
        // Every other block has a fragment.
        _ => Ok(String::new()),
    }
}

fn render_blocks(blocks: &[Block], ctx: &ConversionContext<'_>) -> Result<String, FormatError> {
    let mut pieces = Vec::new();
    for block in blocks {
        let rendered = render_block(block, ctx)?;
        if !rendered.is_empty() {
            pieces.push(rendered);
        }
    }
    Ok(pieces.join("\n\n"))
}

fn render_inlines(inlines: &[Inline], ctx: &ConversionContext<'_>) -> Result<String, FormatError> {
    inline_markdown(&inline_paragraph(inlines, ctx))
}

fn render_list(list: &List, ctx: &ConversionContext<'_>) -> Result<String, FormatError> {
    let mut lines = Vec::new();
    for item in flatten_list(list) {
        let indent = LIST_INDENT.repeat(item.depth);
        let marker = match item.kind {
            ListKind::Ordered => format!("{}. ", item.ordinal),
            ListKind::Unordered => "* ".to_string(),
        };
        let text = render_inlines(&item.paragraph.children, ctx)?;
        let continuation = format!("\n{indent}{}", " ".repeat(marker.len()));
        lines.push(format!("{indent}{marker}{}", text.replace('\n', &continuation)));
    }
    Ok(lines.join("\n"))
}

fn render_table(table: &Table, ctx: &ConversionContext<'_>) -> Result<String, FormatError> {
    let (cols, rows) = padded_cells(table);
    if cols == 0 {
        return Ok(String::new());
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (index, row) in rows.iter().enumerate() {
        let cells = row
            .iter()
            .map(|cell| cell_markdown(*cell, ctx))
            .collect::<Result<Vec<_>, _>>()?;
        lines.push(format!("| {} |", cells.join(" | ")));
        if index == 0 {
            lines.push(format!("| {} |", vec!["---"; cols].join(" | ")));
        }
    }
    Ok(lines.join("\n"))
}

fn cell_markdown(cell: Option<&Cell>, ctx: &ConversionContext<'_>) -> Result<String, FormatError> {
    let text = match cell {
        Some(cell) => render_inlines(&cell.children, ctx)?,
        None => String::new(),
    };
    let mut text = cell_line(&text).replace('|', "\\|");
    // A trailing `+` before the delimiter breaks some table parsers.
    if text.ends_with('+') {
        text.push(' ');
    }
    Ok(text)
}

fn render_code(code: &CodeBlock) -> String {
    let body = code
        .lines
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let fence = "`".repeat(longest_backtick_run(&body).max(2) + 1);
    if body.is_empty() {
        format!("{fence}{}\n{fence}", code.language)
    } else {
        format!("{fence}{}\n{body}\n{fence}", code.language)
    }
}

fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
