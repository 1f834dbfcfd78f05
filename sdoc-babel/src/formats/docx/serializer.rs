//! DOCX serialization (sdoc → DOCX export)
//!
//! Blocks map to paragraphs with the styles declared in `styles.rs`. Nested lists
//! are flattened and every paragraph points at its root list's numbering with the
//! item depth as indent level. Images are pulled from the asset store and embedded.

use super::numbering::{NumberingAllocator, LEVELS};
use super::styles::{
    declare_styles, heading_style, list_style, CODE_BLOCK, CODE_FONT, CODE_SIZE, INTENSE_QUOTE,
    SUBTITLE, TITLE,
};
use crate::assets::AssetRef;
use crate::common::inline::{is_blank, without_placeholders};
use crate::common::nested_to_flat::flatten_list;
use crate::common::table::{column_widths, padded_cells};
use crate::context::ConversionContext;
use crate::error::FormatError;
use crate::ir::nodes::{self, Align, Block, Document, Image, Inline, TextRun};
use docx_rs::{
    AlignmentType, BreakType, Docx, Hyperlink, HyperlinkType, IndentLevel, NumberingId,
    Paragraph, Pic, Run, RunFonts, Shading, TableCell, TableRow,
};
use log::warn;
use std::io::Cursor;

const PIXELS_PER_INCH: f32 = 96.0;
const EMU_PER_PIXEL: f32 = 9525.0;
const TWIPS_PER_PIXEL: u32 = 15;
/// Largest page dimension Word accepts (22 inches).
const MAX_TWIPS: u32 = 31_680;

/// Serialize a canonical Document to DOCX bytes
pub fn serialize_to_docx(doc: &Document, ctx: &ConversionContext<'_>) -> Result<Vec<u8>, FormatError> {
    let mut writer = DocxWriter {
        ctx,
        numbering: NumberingAllocator::default(),
    };
    let mut docx = declare_styles(Docx::new());
    for block in &doc.blocks {
        docx = writer.write_block(docx, block, &Frame::default());
    }

    let mut buffer = Vec::new();
    docx.build()
        .pack(&mut Cursor::new(&mut buffer))
        .map_err(|e| FormatError::SerializationError(format!("Failed to pack DOCX: {e}")))?;
    Ok(buffer)
}

/// Container state inherited by nested blocks.
#[derive(Debug, Clone, Default)]
struct Frame {
    in_quote: bool,
    /// Hex fill without `#`
    shading: Option<String>,
}

struct DocxWriter<'c> {
    ctx: &'c ConversionContext<'c>,
    numbering: NumberingAllocator,
}

impl DocxWriter<'_> {
    fn write_block(&mut self, docx: Docx, block: &Block, frame: &Frame) -> Docx {
        match block {
            Block::Title(text) => {
                docx.add_paragraph(self.paragraph(Some(TITLE), text.align, &text.children, frame))
            }
            Block::Subtitle(text) => docx.add_paragraph(self.paragraph(
                Some(SUBTITLE),
                text.align,
                &text.children,
                frame,
            )),
            Block::Header(header) => {
                let style = heading_style(header.level);
                docx.add_paragraph(self.paragraph(
                    Some(style.as_str()),
                    header.text.align,
                    &header.text.children,
                    frame,
                ))
            }
            Block::Paragraph(text) => {
                let style = frame.in_quote.then_some(INTENSE_QUOTE);
                docx.add_paragraph(self.paragraph(style, text.align, &text.children, frame))
            }
            Block::ImageBlock(image) => {
                docx.add_paragraph(self.paragraph(None, image.align, &image.children, frame))
            }

            Block::Blockquote(quote) => {
                let inner = Frame {
                    in_quote: true,
                    ..frame.clone()
                };
                quote
                    .children
                    .iter()
                    .fold(docx, |docx, child| self.write_block(docx, child, &inner))
            }

            Block::Callout(callout) => {
                let color = callout
                    .background_color
                    .as_deref()
                    .unwrap_or(self.ctx.options.callout_color.as_str());
                let inner = Frame {
                    shading: Some(color.trim_start_matches('#').to_string()),
                    ..frame.clone()
                };
                callout
                    .children
                    .iter()
                    .fold(docx, |docx, child| self.write_block(docx, child, &inner))
            }

            Block::CodeBlock(code) => {
                if code.lines.is_empty() {
                    return docx.add_paragraph(Paragraph::new().style(CODE_BLOCK));
                }
                code.lines.iter().fold(docx, |docx, line| {
                    let run = Run::new()
                        .add_text(&line.text)
                        .fonts(code_fonts())
                        .size(CODE_SIZE);
                    docx.add_paragraph(Paragraph::new().style(CODE_BLOCK).add_run(run))
                })
            }

            Block::List(list) => {
                let (mut docx, numbering_id) = self.numbering.add_list(docx, list);
                for item in flatten_list(list) {
                    let style = list_style(item.kind, item.depth);
                    let paragraph = self
                        .paragraph(
                            Some(style.as_str()),
                            item.paragraph.align,
                            &item.paragraph.children,
                            frame,
                        )
                        .numbering(
                            NumberingId::new(numbering_id),
                            IndentLevel::new(item.depth.min(LEVELS - 1)),
                        );
                    docx = docx.add_paragraph(paragraph);
                }
                docx
            }

            Block::CheckListItem(item) => {
                let marker = if item.checked { "☒ " } else { "☐ " };
                let paragraph = Paragraph::new().add_run(self.text_run(&TextRun::plain(marker), frame));
                docx.add_paragraph(self.add_inlines(paragraph, &item.children, frame))
            }

            Block::Table(table) => docx.add_table(self.table(table, frame)),
        }
    }

    fn paragraph(
        &self,
        style: Option<&str>,
        align: Option<Align>,
        inlines: &[Inline],
        frame: &Frame,
    ) -> Paragraph {
        let mut paragraph = Paragraph::new();
        if let Some(style) = style {
            paragraph = paragraph.style(style);
        }
        if let Some(align) = align {
            paragraph = paragraph.align(alignment(align));
        }
        self.add_inlines(paragraph, inlines, frame)
    }

    fn add_inlines(&self, mut paragraph: Paragraph, inlines: &[Inline], frame: &Frame) -> Paragraph {
        for inline in without_placeholders(inlines) {
            match inline {
                Inline::Text(run) => paragraph = paragraph.add_run(self.text_run(run, frame)),
                Inline::Link(link) => {
                    let mut hyperlink = match link.href.strip_prefix('#') {
                        Some(anchor) => Hyperlink::new(anchor, HyperlinkType::Anchor),
                        None => Hyperlink::new(&link.href, HyperlinkType::External),
                    };
                    if link.children.iter().all(|run| run.text.is_empty()) {
                        hyperlink = hyperlink.add_run(Run::new().add_text(&link.href));
                    } else {
                        for run in &link.children {
                            hyperlink = hyperlink.add_run(self.text_run(run, frame));
                        }
                    }
                    paragraph = paragraph.add_hyperlink(hyperlink);
                }
                Inline::Image(image) => {
                    if let Some(run) = self.image_run(image) {
                        paragraph = paragraph.add_run(run);
                    }
                }
            }
        }
        paragraph
    }

    fn text_run(&self, text_run: &TextRun, frame: &Frame) -> Run {
        let mut run = Run::new();
        for (index, line) in text_run.text.split('\n').enumerate() {
            if index > 0 {
                run = run.add_break(BreakType::TextWrapping);
            }
            for (column, part) in line.split('\t').enumerate() {
                if column > 0 {
                    run = run.add_tab();
                }
                if !part.is_empty() {
                    run = run.add_text(part);
                }
            }
        }

        let style = &text_run.style;
        if style.bold {
            run = run.bold();
        }
        if style.italic {
            run = run.italic();
        }
        if style.underline {
            run = run.underline("single");
        }
        if style.code {
            run = run.fonts(code_fonts()).size(CODE_SIZE);
        }
        if let Some(color) = &style.color {
            run = run.color(color.trim_start_matches('#'));
        }
        if let Some(font) = &style.font {
            run = run.fonts(RunFonts::new().ascii(font).hi_ansi(font));
        }
        if let Some(points) = style.font_size.filter(|p| *p > 0.0) {
            run = run.size((points * 2.0).round() as usize);
        }
        if let Some(fill) = &frame.shading {
            run = run.shading(Shading::new().fill(fill));
        }
        run
    }

    /// Embedded picture for `image`; images the store cannot deliver are skipped.
    fn image_run(&self, image: &Image) -> Option<Run> {
        let reference = AssetRef {
            document_id: &self.ctx.document_id,
            src: &image.src,
        };
        let bytes = match self.ctx.assets.fetch_image_bytes(&reference) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("skipping image {}: {e}", image.src);
                return None;
            }
        };
        let decoded = match image::load_from_memory(&bytes) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("skipping image {}: {e}", image.src);
                return None;
            }
        };

        let width = image
            .width
            .filter(|w| *w > 0.0)
            .unwrap_or(self.ctx.options.image_width_inches * PIXELS_PER_INCH);
        let ratio = if decoded.width() > 0 {
            decoded.height() as f32 / decoded.width() as f32
        } else {
            1.0
        };
        let pic = Pic::new(&bytes).size(px_to_emu(width), px_to_emu(width * ratio));
        Some(Run::new().add_image(pic))
    }

    fn table(&self, table: &nodes::Table, frame: &Frame) -> docx_rs::Table {
        let (cols, cells) = padded_cells(table);
        let rows = cells
            .iter()
            .zip(&table.rows)
            .map(|(cells, row)| {
                let cells = cells
                    .iter()
                    .map(|cell| {
                        let inlines = cell.map(|c| c.children.as_slice()).unwrap_or_default();
                        let paragraph = if is_blank(inlines) {
                            // Word rejects cells without a paragraph.
                            Paragraph::new().add_run(Run::new().add_text(" "))
                        } else {
                            self.add_inlines(Paragraph::new(), inlines, frame)
                        };
                        TableCell::new().add_paragraph(paragraph)
                    })
                    .collect();
                let mut table_row = TableRow::new(cells);
                if let Some(height) = row.min_height {
                    table_row = table_row.row_height(px_to_twips(height) as f32);
                }
                table_row
            })
            .collect();

        let widths = if table.columns.len() == cols {
            table.columns.clone()
        } else {
            column_widths(self.ctx.options.table.width, cols)
        };
        let grid = widths
            .iter()
            .map(|column| px_to_twips(column.width) as usize)
            .collect();
        docx_rs::Table::new(rows).set_grid(grid)
    }
}

fn code_fonts() -> RunFonts {
    RunFonts::new()
        .ascii(CODE_FONT)
        .hi_ansi(CODE_FONT)
        .east_asia(CODE_FONT)
        .cs(CODE_FONT)
}

fn alignment(align: Align) -> AlignmentType {
    match align {
        Align::Left => AlignmentType::Left,
        Align::Center => AlignmentType::Center,
        Align::Right => AlignmentType::Right,
    }
}

/// Pixel hints from the tree are untrusted; clamp to what Word can lay out.
fn px_to_twips(px: u32) -> u32 {
    px.saturating_mul(TWIPS_PER_PIXEL).min(MAX_TWIPS)
}

fn px_to_emu(px: f32) -> u32 {
    (px * EMU_PER_PIXEL).round() as u32
}
