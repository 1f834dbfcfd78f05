//! Markdown parsing (Markdown → sdoc import)
//!
//! Pipeline: Markdown string → Comrak AST → canonical blocks.
//!
//! Block nodes are dispatched one by one; block quotes recurse into the same
//! dispatch. Inline nodes go through the shared run merger with a style context
//! that gains a flag per emphasis wrapper.

use crate::common::inline::{InlineBuilder, StyleContext};
use crate::common::table::build_table;
use crate::context::ConversionContext;
use crate::error::FormatError;
use crate::ir::id::NodeId;
use crate::ir::nodes::{
    Block, Blockquote, CheckListItem, CodeBlock, Document, Header, Image, Inline, Link, List,
    ListItem, ListKind, TextBlock, TextRun,
};
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

/// Parse Markdown string to a canonical Document
pub fn parse_from_markdown(
    source: &str,
    ctx: &ConversionContext<'_>,
) -> Result<Document, FormatError> {
    let arena = Arena::new();
    let options = default_comrak_options();
    let root = parse_document(&arena, source, &options);

    let mut blocks = Vec::new();
    for child in root.children() {
        convert_block(child, ctx, &mut blocks);
    }
    Ok(Document::new(ctx.user.clone(), blocks))
}

pub(crate) fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options
}

fn convert_block<'a>(node: &'a AstNode<'a>, ctx: &ConversionContext<'_>, out: &mut Vec<Block>) {
    let node_data = node.data.borrow();
    match &node_data.value {
        NodeValue::Heading(heading) => {
            out.push(Block::Header(Header::new(
                heading.level,
                TextBlock::new(collect_inlines(node)),
            )));
        }

        NodeValue::Paragraph => {
            let inlines = collect_inlines(node);
            if !inlines.is_empty() {
                out.push(Block::paragraph(inlines));
            }
        }

        NodeValue::List(list) => {
            let is_task_list = node
                .children()
                .any(|item| matches!(item.data.borrow().value, NodeValue::TaskItem(_)));
            if is_task_list {
                out.extend(convert_task_list(node));
            } else {
                let kind = match list.list_type {
                    ListType::Ordered => ListKind::Ordered,
                    ListType::Bullet => ListKind::Unordered,
                };
                out.push(Block::List(convert_list(node, kind)));
            }
        }

        NodeValue::Table(_) => {
            let rows = node
                .children()
                .map(|row| row.children().map(collect_inlines).collect())
                .collect();
            out.push(Block::Table(build_table(rows, ctx.options.table)));
        }

        NodeValue::CodeBlock(code) => {
            let language = code.info.split_whitespace().next().unwrap_or_default();
            out.push(Block::CodeBlock(CodeBlock::from_source(
                language,
                code.literal.trim_end_matches('\n'),
            )));
        }

        NodeValue::BlockQuote => {
            let mut children = Vec::new();
            for child in node.children() {
                convert_block(child, ctx, &mut children);
            }
            out.push(Block::Blockquote(Blockquote {
                id: NodeId::generate(),
                children,
            }));
        }

        NodeValue::HtmlBlock(html) => match image_from_html(&html.literal) {
            Some(image) => {
                let mut builder = InlineBuilder::new();
                builder.splice_image(image);
                out.push(Block::paragraph(builder.finish()));
            }
            None => debug!("skipping raw HTML block"),
        },

        other => debug!("skipping unsupported markdown block {other:?}"),
    }
}

/// Items of a list, with sub-lists kept as nested lists.
fn convert_list<'a>(node: &'a AstNode<'a>, kind: ListKind) -> List {
    let mut items = Vec::new();
    for item in node.children() {
        let mut paragraph: Option<TextBlock> = None;
        let mut nested: Option<List> = None;

        for child in item.children() {
            let child_data = child.data.borrow();
            match &child_data.value {
                NodeValue::List(sub) if nested.is_none() => {
                    let sub_kind = match sub.list_type {
                        ListType::Ordered => ListKind::Ordered,
                        ListType::Bullet => ListKind::Unordered,
                    };
                    nested = Some(convert_list(child, sub_kind));
                }
                NodeValue::Paragraph | NodeValue::Heading(_) => {
                    let inlines = collect_inlines(child);
                    match paragraph.as_mut() {
                        // later paragraphs of a loose item join the first one
                        Some(existing) => {
                            existing.children.push(Inline::Text(TextRun::plain(" ")));
                            existing.children.extend(inlines);
                        }
                        None => paragraph = Some(TextBlock::new(inlines)),
                    }
                }
                other => debug!("dropping {other:?} inside list item"),
            }
        }

        let mut list_item = ListItem::new(paragraph.unwrap_or_default());
        list_item.nested = nested;
        items.push(list_item);
    }
    List::new(kind, items)
}

fn convert_task_list<'a>(node: &'a AstNode<'a>) -> Vec<Block> {
    node.children()
        .map(|item| {
            let checked = matches!(item.data.borrow().value, NodeValue::TaskItem(Some(_)));
            let children = item
                .children()
                .find(|child| matches!(child.data.borrow().value, NodeValue::Paragraph))
                .map(collect_inlines)
                .unwrap_or_default();
            Block::CheckListItem(CheckListItem {
                id: NodeId::generate(),
                checked,
                children,
            })
        })
        .collect()
}

/// Inline children of a block node as canonical runs.
fn collect_inlines<'a>(node: &'a AstNode<'a>) -> Vec<Inline> {
    let mut builder = InlineBuilder::new();
    let style = StyleContext::new();
    for child in node.children() {
        collect_inline(child, &style, &mut builder);
    }
    builder.finish()
}

fn collect_inline<'a>(node: &'a AstNode<'a>, style: &StyleContext, out: &mut InlineBuilder) {
    let node_data = node.data.borrow();
    match &node_data.value {
        NodeValue::Text(text) => out.push_text(text, style),
        NodeValue::SoftBreak => out.push_text(" ", style),
        NodeValue::LineBreak => out.push_text("\n", style),
        NodeValue::Code(code) => out.push_text(&code.literal, &style.code()),

        NodeValue::Emph => {
            let style = style.italic();
            for child in node.children() {
                collect_inline(child, &style, out);
            }
        }

        NodeValue::Strong => {
            let style = style.bold();
            for child in node.children() {
                collect_inline(child, &style, out);
            }
        }

        NodeValue::Link(link) => {
            let mut label = InlineBuilder::new();
            for child in node.children() {
                collect_inline(child, style, &mut label);
            }
            let children = label.finish_text_runs();
            let title = if link.title.is_empty() {
                children.iter().map(|run| run.text.as_str()).collect()
            } else {
                link.title.clone()
            };
            out.splice_link(Link {
                id: NodeId::generate(),
                href: link.url.clone(),
                title,
                children,
            });
        }

        NodeValue::Image(link) => out.splice_image(Image::new(link.url.clone())),

        NodeValue::HtmlInline(html) => match image_from_html(html) {
            Some(image) => out.splice_image(image),
            None => out.push_run(TextRun::placeholder()),
        },

        _ => {
            for child in node.children() {
                collect_inline(child, style, out);
            }
        }
    }
}

fn img_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?is)^\s*<img\b[^>]*?\bsrc\s*=\s*["']([^"']+)["'][^>]*>\s*$"#)
            .expect("img pattern is valid")
    })
}

fn dimension_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)\b(width|height)\s*=\s*["']?(\d+(?:\.\d+)?)"#)
            .expect("dimension pattern is valid")
    })
}

/// An [`Image`] from raw HTML holding exactly one `<img>` tag.
pub fn image_from_html(html: &str) -> Option<Image> {
    let captures = img_tag_pattern().captures(html)?;
    let mut image = Image::new(captures.get(1)?.as_str());
    let tag = captures.get(0)?.as_str();
    for dimension in dimension_pattern().captures_iter(tag) {
        let value = dimension[2].parse::<f32>().ok();
        match dimension[1].to_ascii_lowercase().as_str() {
            "width" => image.width = value,
            _ => image.height = value,
        }
    }
    Some(image)
}
