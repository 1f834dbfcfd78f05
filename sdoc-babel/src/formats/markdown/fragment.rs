//! HTML fragments for Markdown export
//!
//! Text-like blocks are first rendered as a small HTML DOM (`markup5ever_rcdom`)
//! and then handed to the normalizer in `normalize.rs`. Lists, tables and code
//! blocks have no fragment: the serializer writes them directly.

use crate::common::inline::without_placeholders;
use crate::context::ConversionContext;
use crate::ir::nodes::{Block, Inline, TextRun};
use html5ever::{ns, Attribute, LocalName, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Class carried by check-list fragments.
pub const TASK_LIST_CLASS: &str = "contains-task-list";
/// Attribute holding a check-list item's state.
pub const CHECKED_ATTR: &str = "data-checked";

/// Fragment for `block`, wrapped in a container `div`; `None` when the block, or one
/// of its children, must be rendered directly.
pub fn block_fragment(block: &Block, ctx: &ConversionContext<'_>) -> Option<Handle> {
    let container = create_element("div", vec![]);
    append(&container, block_element(block, ctx)?);
    Some(container)
}

/// A `<p>` holding `inlines`, for list items and table cells.
pub fn inline_paragraph(inlines: &[Inline], ctx: &ConversionContext<'_>) -> Handle {
    let paragraph = create_element("p", vec![]);
    add_inlines(&paragraph, inlines, ctx);
    paragraph
}

fn block_element(block: &Block, ctx: &ConversionContext<'_>) -> Option<Handle> {
    let element = match block {
        Block::Title(text) => text_element("h1", &text.children, ctx),
        Block::Subtitle(text) => text_element("h2", &text.children, ctx),
        Block::Header(header) => {
            text_element(&format!("h{}", header.level), &header.text.children, ctx)
        }
        Block::Paragraph(text) => text_element("p", &text.children, ctx),
        Block::ImageBlock(image) => text_element("p", &image.children, ctx),

        Block::CheckListItem(item) => {
            let list = create_element("ul", vec![("class", TASK_LIST_CLASS)]);
            let checked = if item.checked { "true" } else { "false" };
            let entry = create_element("li", vec![(CHECKED_ATTR, checked)]);
            add_inlines(&entry, &item.children, ctx);
            append(&list, entry);
            list
        }

        Block::Blockquote(quote) => {
            let element = create_element("blockquote", vec![]);
            for child in &quote.children {
                append(&element, nested_element(child, ctx)?);
            }
            element
        }

        Block::Callout(callout) => {
            let element = create_element("div", vec![("class", "callout")]);
            for child in &callout.children {
                append(&element, block_element(child, ctx)?);
            }
            element
        }

        Block::List(_) | Block::Table(_) | Block::CodeBlock(_) => return None,
    };
    Some(element)
}

/// Blocks inside a quote may not open lists of their own.
fn nested_element(block: &Block, ctx: &ConversionContext<'_>) -> Option<Handle> {
    match block {
        Block::CheckListItem(_) | Block::Callout(_) => None,
        other => block_element(other, ctx),
    }
}

fn text_element(tag: &str, inlines: &[Inline], ctx: &ConversionContext<'_>) -> Handle {
    let element = create_element(tag, vec![]);
    add_inlines(&element, inlines, ctx);
    element
}

fn add_inlines(parent: &Handle, inlines: &[Inline], ctx: &ConversionContext<'_>) {
    for inline in without_placeholders(inlines) {
        match inline {
            Inline::Text(run) => append(parent, styled_text(run)),
            Inline::Link(link) => {
                let label: String = link.children.iter().map(|run| run.text.as_str()).collect();
                let mut attrs = vec![("href", link.href.as_str())];
                if !link.title.is_empty() && link.title != label {
                    attrs.push(("title", link.title.as_str()));
                }
                let anchor = create_element("a", attrs);
                if label.is_empty() {
                    append(&anchor, create_text(&link.href));
                } else {
                    for run in &link.children {
                        append(&anchor, styled_text(run));
                    }
                }
                append(parent, anchor);
            }
            Inline::Image(image) => {
                let src = ctx.assets.resolve_image_url(&image.src, &ctx.document_id);
                append(parent, create_element("img", vec![("src", src.as_str())]));
            }
        }
    }
}

/// `<strong><em><u><code>text</code></u></em></strong>`, keeping only the wrappers
/// the run's style asks for.
fn styled_text(run: &TextRun) -> Handle {
    let mut node = create_text(&run.text);
    let style = &run.style;
    for (set, tag) in [
        (style.code, "code"),
        (style.underline, "u"),
        (style.italic, "em"),
        (style.bold, "strong"),
    ] {
        if set {
            let wrapper = create_element(tag, vec![]);
            append(&wrapper, node);
            node = wrapper;
        }
    }
    node
}

fn append(parent: &Handle, child: Handle) {
    parent.children.borrow_mut().push(child);
}

/// Create an HTML element with attributes
fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a text node
fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Tag name of an element node.
pub fn element_name(handle: &Handle) -> Option<&str> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// Value of attribute `attr` on an element node.
pub fn attribute(handle: &Handle, attr: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| a.name.local.as_ref() == attr)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}
