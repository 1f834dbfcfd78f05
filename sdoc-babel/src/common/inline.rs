//! Building and flattening inline runs.
//!
//! Importers walk their source's inline markup recursively and hand an immutable
//! [`StyleContext`] down the recursion. Each emphasis-like wrapper derives a new
//! context with one more flag set. A flag an ancestor already set stays as it is,
//! so `**_x_**` and `_**x**_` both yield a single bold+italic run.
//!
//! Links and images never sit inside running text. [`InlineBuilder`] splices them
//! into the run sequence between two empty placeholder runs.

use crate::ir::nodes::{Image, Inline, Link, RunStyle, TextRun};

/// Style inherited from enclosing markup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleContext {
    style: RunStyle,
}

impl StyleContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(&self) -> &RunStyle {
        &self.style
    }

    pub fn bold(&self) -> Self {
        self.derive(|style| style.bold = true)
    }

    pub fn italic(&self) -> Self {
        self.derive(|style| style.italic = true)
    }

    pub fn underline(&self) -> Self {
        self.derive(|style| style.underline = true)
    }

    pub fn code(&self) -> Self {
        self.derive(|style| style.code = true)
    }

    pub fn color(&self, color: &str) -> Self {
        self.derive(|style| {
            style.color.get_or_insert_with(|| color.to_string());
        })
    }

    pub fn font(&self, font: &str) -> Self {
        self.derive(|style| {
            style.font.get_or_insert_with(|| font.to_string());
        })
    }

    pub fn font_size(&self, points: f32) -> Self {
        self.derive(|style| {
            style.font_size.get_or_insert(points);
        })
    }

    /// Apply every attribute of `other` that this context does not set yet.
    pub fn merge(&self, other: &RunStyle) -> Self {
        let mut merged = self.clone();
        let style = &mut merged.style;
        style.bold |= other.bold;
        style.italic |= other.italic;
        style.underline |= other.underline;
        style.code |= other.code;
        if style.color.is_none() {
            style.color = other.color.clone();
        }
        if style.font.is_none() {
            style.font = other.font.clone();
        }
        if style.font_size.is_none() {
            style.font_size = other.font_size;
        }
        merged
    }

    pub fn run(&self, text: impl Into<String>) -> TextRun {
        TextRun::new(text, self.style.clone())
    }

    fn derive(&self, apply: impl FnOnce(&mut RunStyle)) -> Self {
        let mut next = self.clone();
        apply(&mut next.style);
        next
    }
}

/// Accumulates the inline children of one block.
#[derive(Debug, Default)]
pub struct InlineBuilder {
    inlines: Vec<Inline>,
    // false right after a splice, so placeholders never absorb text
    open_run: bool,
}

impl InlineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.inlines.is_empty()
    }

    /// Append text, extending the previous run when its style is identical.
    pub fn push_text(&mut self, text: &str, ctx: &StyleContext) {
        if text.is_empty() {
            return;
        }
        if self.open_run {
            if let Some(Inline::Text(last)) = self.inlines.last_mut() {
                if &last.style == ctx.style() {
                    last.text.push_str(text);
                    return;
                }
            }
        }
        self.inlines.push(Inline::Text(ctx.run(text)));
        self.open_run = true;
    }

    /// Append an already styled run as its own entry.
    pub fn push_run(&mut self, run: TextRun) {
        self.inlines.push(Inline::Text(run));
        self.open_run = false;
    }

    pub fn splice_link(&mut self, link: Link) {
        self.splice(Inline::Link(link));
    }

    pub fn splice_image(&mut self, image: Image) {
        self.splice(Inline::Image(image));
    }

    fn splice(&mut self, inline: Inline) {
        self.inlines.push(Inline::Text(TextRun::placeholder()));
        self.inlines.push(inline);
        self.inlines.push(Inline::Text(TextRun::placeholder()));
        self.open_run = false;
    }

    pub fn finish(self) -> Vec<Inline> {
        self.inlines
    }

    /// Only the text runs, for contexts such as link labels that cannot hold
    /// structural inlines.
    pub fn finish_text_runs(self) -> Vec<TextRun> {
        self.inlines
            .into_iter()
            .filter_map(|inline| match inline {
                Inline::Text(run) if !run.text.is_empty() => Some(run),
                _ => None,
            })
            .collect()
    }
}

/// Concatenated text content; images contribute nothing.
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut text = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(run) => text.push_str(&run.text),
            Inline::Link(link) => link.children.iter().for_each(|run| text.push_str(&run.text)),
            Inline::Image(_) => {}
        }
    }
    text
}

/// True when the inlines render as nothing at all.
pub fn is_blank(inlines: &[Inline]) -> bool {
    inlines.iter().all(|inline| match inline {
        Inline::Text(run) => run.text.is_empty(),
        Inline::Link(link) => link.children.iter().all(|run| run.text.is_empty()),
        Inline::Image(_) => false,
    })
}

/// The inlines without the empty placeholder runs.
pub fn without_placeholders(inlines: &[Inline]) -> impl Iterator<Item = &Inline> {
    inlines
        .iter()
        .filter(|inline| !matches!(inline, Inline::Text(run) if run.text.is_empty()))
}
