//! HTML fragment → Markdown text
//!
//! Fragments built by `fragment.rs` are lowered into a Comrak AST and printed with
//! `format_commonmark`. Lists inside a fragment (check-list items) are written as
//! marker lines directly so the marker set stays `* `, `N. ` and `* [x] `.

use super::fragment::{attribute, element_name, CHECKED_ATTR};
use crate::error::FormatError;
use comrak::nodes::{Ast, AstNode, NodeCode, NodeHeading, NodeLink, NodeValue};
use comrak::{format_commonmark, Arena, ComrakOptions};
use markup5ever_rcdom::{Handle, NodeData};
use std::cell::RefCell;

/// Indent of one nesting depth in marker lines.
pub const LIST_INDENT: &str = "    ";

/// Render every child of a fragment container, joined by blank lines.
pub fn fragment_to_markdown(fragment: &Handle) -> Result<String, FormatError> {
    let mut pieces = Vec::new();
    for child in fragment.children.borrow().iter() {
        render_top_level(child, &mut pieces)?;
    }
    Ok(pieces.join("\n\n"))
}

/// Render the inline content of one element (a `<p>` from `inline_paragraph`).
pub fn inline_markdown(element: &Handle) -> Result<String, FormatError> {
    let arena = Arena::new();
    let root = new_node(&arena, NodeValue::Document);
    let paragraph = new_node(&arena, NodeValue::Paragraph);
    root.append(paragraph);
    append_inline_children(&arena, paragraph, element);
    format_root(root)
}

fn render_top_level(handle: &Handle, pieces: &mut Vec<String>) -> Result<(), FormatError> {
    match element_name(handle) {
        Some("ul") | Some("ol") => {
            let mut lines = Vec::new();
            render_html_list(handle, 0, &mut lines)?;
            if !lines.is_empty() {
                pieces.push(lines.join("\n"));
            }
        }
        Some("div") => {
            for child in handle.children.borrow().iter() {
                render_top_level(child, pieces)?;
            }
        }
        _ => {
            let arena = Arena::new();
            let root = new_node(&arena, NodeValue::Document);
            append_block(&arena, root, handle);
            let markdown = format_root(root)?;
            if !markdown.is_empty() {
                pieces.push(markdown);
            }
        }
    }
    Ok(())
}

fn render_html_list(
    list: &Handle,
    depth: usize,
    lines: &mut Vec<String>,
) -> Result<(), FormatError> {
    let ordered = element_name(list) == Some("ol");
    let indent = LIST_INDENT.repeat(depth);
    let mut ordinal = 0;

    for item in list.children.borrow().iter() {
        if element_name(item) != Some("li") {
            continue;
        }
        ordinal += 1;
        let marker = if ordered {
            format!("{ordinal}. ")
        } else {
            match attribute(item, CHECKED_ATTR).as_deref() {
                Some("true") => "* [x] ".to_string(),
                Some(_) => "* [ ] ".to_string(),
                None => "* ".to_string(),
            }
        };

        let text = inline_markdown(item)?;
        let continuation = format!("\n{indent}{}", " ".repeat(marker.len()));
        lines.push(format!("{indent}{marker}{}", text.replace('\n', &continuation)));

        for child in item.children.borrow().iter() {
            if matches!(element_name(child), Some("ul") | Some("ol")) {
                render_html_list(child, depth + 1, lines)?;
            }
        }
    }
    Ok(())
}

fn append_block<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, handle: &Handle) {
    match &handle.data {
        NodeData::Text { contents } => {
            let text = contents.borrow().to_string();
            if !text.trim().is_empty() {
                let paragraph = new_node(arena, NodeValue::Paragraph);
                parent.append(paragraph);
                paragraph.append(new_node(arena, NodeValue::Text(text)));
            }
        }
        NodeData::Element { .. } => {
            let tag = element_name(handle).unwrap_or_default();
            match tag {
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    let level = tag[1..].parse().unwrap_or(1);
                    let heading = new_node(
                        arena,
                        NodeValue::Heading(NodeHeading {
                            level,
                            setext: false,
                        }),
                    );
                    parent.append(heading);
                    append_inline_children(arena, heading, handle);
                }
                "blockquote" => {
                    let quote = new_node(arena, NodeValue::BlockQuote);
                    parent.append(quote);
                    for child in handle.children.borrow().iter() {
                        append_block(arena, quote, child);
                    }
                }
                "div" => {
                    for child in handle.children.borrow().iter() {
                        append_block(arena, parent, child);
                    }
                }
                _ => {
                    let paragraph = new_node(arena, NodeValue::Paragraph);
                    parent.append(paragraph);
                    append_inline(arena, paragraph, handle);
                }
            }
        }
        _ => {}
    }
}

fn append_inline_children<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    handle: &Handle,
) {
    for child in handle.children.borrow().iter() {
        append_inline(arena, parent, child);
    }
}

fn append_inline<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, handle: &Handle) {
    if let NodeData::Text { contents } = &handle.data {
        let text = contents.borrow().to_string();
        if !text.is_empty() {
            parent.append(new_node(arena, NodeValue::Text(text)));
        }
        return;
    }

    let wrapper = match element_name(handle) {
        Some("strong") | Some("b") => NodeValue::Strong,
        Some("em") | Some("i") => NodeValue::Emph,
        Some("code") => {
            let literal = text_content(handle);
            if !literal.is_empty() {
                parent.append(new_node(
                    arena,
                    NodeValue::Code(NodeCode {
                        num_backticks: 1,
                        literal,
                    }),
                ));
            }
            return;
        }
        Some("a") => NodeValue::Link(NodeLink {
            url: attribute(handle, "href").unwrap_or_default(),
            title: attribute(handle, "title").unwrap_or_default(),
        }),
        Some("img") => {
            let url = attribute(handle, "src").unwrap_or_default();
            parent.append(new_node(
                arena,
                NodeValue::Image(NodeLink {
                    url,
                    title: String::new(),
                }),
            ));
            return;
        }
        Some("br") => {
            parent.append(new_node(arena, NodeValue::LineBreak));
            return;
        }
        // Nested lists are rendered by `render_html_list`.
        Some("ul") | Some("ol") => return,
        _ => {
            append_inline_children(arena, parent, handle);
            return;
        }
    };

    let node = new_node(arena, wrapper);
    parent.append(node);
    append_inline_children(arena, node, handle);
}

fn text_content(handle: &Handle) -> String {
    match &handle.data {
        NodeData::Text { contents } => contents.borrow().to_string(),
        _ => handle.children.borrow().iter().map(text_content).collect(),
    }
}

fn new_node<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    arena.alloc(AstNode::new(RefCell::new(Ast::new(value, (0, 0).into()))))
}

fn format_root<'a>(root: &'a AstNode<'a>) -> Result<String, FormatError> {
    let mut output = Vec::new();
    let options = ComrakOptions::default();
    format_commonmark(root, &options, &mut output).map_err(|e| {
        FormatError::SerializationError(format!("Comrak serialization failed: {e}"))
    })?;

    let markdown = String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {e}")))?;
    Ok(markdown.trim_end().to_string())
}
