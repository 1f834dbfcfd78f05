//! DOCX parsing (DOCX → sdoc import)
//!
//! Pipeline: zip package → `word/document.xml` (roxmltree) → flat block stream →
//! canonical blocks.
//!
//! Word keeps lists flat: every list paragraph carries a numbering id and an
//! indent level. Those paragraphs enter the stream as `FlatBlock::ListParagraph`
//! and `rebuild_lists` turns them back into nested lists.

use super::numbering::NumberingDefs;
use super::package::{
    is_wml, part_path, wml, wml_attr, wml_bool, DocxPackage, Relationship, DML_NS, DOCUMENT_PART,
    NUMBERING_PART, REL_NS, STYLES_PART, WML_NS, WPD_NS,
};
use super::styles::{num_pr, ParagraphRole, StyleSheet};
use crate::common::flat_to_nested::{rebuild_lists, FlatBlock, ListParagraph};
use crate::common::inline::{is_blank, InlineBuilder, StyleContext};
use crate::common::table::build_table;
use crate::context::ConversionContext;
use crate::error::FormatError;
use crate::ir::id::NodeId;
use crate::ir::nodes::{
    Align, Block, Blockquote, Document, Header, Image, Inline, Link, ListKind, Table, TextBlock,
    TextRun,
};
use log::{debug, warn};
use std::collections::HashMap;
use std::path::Path;

/// EMUs per pixel at 96 DPI.
const EMU_PER_PIXEL: f32 = 9525.0;

/// Parse DOCX bytes to a canonical Document
pub fn parse_from_docx(bytes: &[u8], ctx: &ConversionContext<'_>) -> Result<Document, FormatError> {
    let mut package = DocxPackage::open(bytes)?;
    let document_xml = package.document_xml()?;
    let styles = package
        .read_text(STYLES_PART)
        .map(|xml| StyleSheet::parse(&xml))
        .unwrap_or_default();
    let numbering = package
        .read_text(NUMBERING_PART)
        .map(|xml| NumberingDefs::parse(&xml))
        .unwrap_or_default();
    let rels = package.relationships();

    let xml = roxmltree::Document::parse(&document_xml)
        .map_err(|e| FormatError::ParseError(format!("invalid {DOCUMENT_PART}: {e}")))?;
    let body = wml(xml.root_element(), "body")
        .ok_or_else(|| FormatError::ParseError(format!("{DOCUMENT_PART} has no body")))?;

    let mut reader = BodyReader {
        package,
        styles,
        numbering,
        rels,
        ctx,
    };
    let mut stream = Vec::new();
    reader.read_container(body, &mut stream);

    let blocks = rebuild_lists(stream).map_err(|e| FormatError::ParseError(e.to_string()))?;
    Ok(Document::new(ctx.user.clone(), blocks))
}

struct BodyReader<'p, 'c> {
    package: DocxPackage<'p>,
    styles: StyleSheet,
    numbering: NumberingDefs,
    rels: HashMap<String, Relationship>,
    ctx: &'c ConversionContext<'c>,
}

impl BodyReader<'_, '_> {
    fn read_container(&mut self, node: roxmltree::Node, out: &mut Vec<FlatBlock>) {
        for child in node.children() {
            if is_wml(child, "p") {
                self.read_paragraph(child, out);
            } else if is_wml(child, "tbl") {
                let table = self.read_table(child);
                if !table.rows.is_empty() {
                    out.push(FlatBlock::Block(Block::Table(table)));
                }
            } else if is_wml(child, "sdt") {
                if let Some(content) = wml(child, "sdtContent") {
                    self.read_container(content, out);
                }
            }
        }
    }

    fn read_paragraph(&mut self, p: roxmltree::Node, out: &mut Vec<FlatBlock>) {
        let ppr = wml(p, "pPr");
        let style_id = ppr.and_then(|ppr| wml_attr(ppr, "pStyle"));
        let role = style_id
            .map(|id| self.styles.role(id))
            .unwrap_or(ParagraphRole::Body);
        let align = ppr
            .and_then(|ppr| wml_attr(ppr, "jc"))
            .and_then(Align::parse);

        let inlines = self.read_inlines(p);
        if is_blank(&inlines) {
            return;
        }
        let text = TextBlock::new(inlines).with_align(align);

        let block = match role {
            ParagraphRole::Title => Block::Title(text),
            ParagraphRole::Subtitle => Block::Subtitle(text),
            ParagraphRole::Heading(level) => Block::Header(Header::new(level, text)),
            ParagraphRole::Quote => {
                // Consecutive quote paragraphs share one blockquote.
                if let Some(FlatBlock::Block(Block::Blockquote(quote))) = out.last_mut() {
                    quote.children.push(Block::Paragraph(text));
                } else {
                    out.push(FlatBlock::Block(Block::Blockquote(Blockquote {
                        id: NodeId::generate(),
                        children: vec![Block::Paragraph(text)],
                    })));
                }
                return;
            }
            ParagraphRole::List { .. } | ParagraphRole::Body => {
                match self.list_paragraph(ppr, style_id, role, text) {
                    Ok(list_paragraph) => {
                        out.push(FlatBlock::ListParagraph(list_paragraph));
                        return;
                    }
                    Err(text) => Block::Paragraph(text),
                }
            }
        };
        out.push(FlatBlock::Block(block));
    }

    /// Wrap `text` as a list paragraph when direct or style numbering, or a
    /// `List ...` style, says it is one; otherwise hand the text back.
    fn list_paragraph(
        &self,
        ppr: Option<roxmltree::Node>,
        style_id: Option<&str>,
        role: ParagraphRole,
        text: TextBlock,
    ) -> Result<ListParagraph, TextBlock> {
        let direct = ppr.and_then(|ppr| wml(ppr, "numPr")).and_then(num_pr);
        // numId 0 switches numbering off, style numbering included
        if direct.as_ref().is_some_and(|(num_id, _)| num_id == "0") {
            return Err(text);
        }
        let numbering = direct
            .or_else(|| style_id.and_then(|id| self.styles.numbering(id)))
            .filter(|(num_id, _)| num_id != "0");

        match (numbering, role) {
            (Some((numbering_id, level)), role) => {
                let fallback = match role {
                    ParagraphRole::List { kind, .. } => kind,
                    _ => ListKind::Unordered,
                };
                let kind = self.numbering.kind(&numbering_id, level).unwrap_or(fallback);
                Ok(ListParagraph {
                    numbering_id,
                    level,
                    kind,
                    paragraph: text,
                })
            }
            (None, ParagraphRole::List { kind, level }) => Ok(ListParagraph {
                // Style-only lists of one kind form a single list.
                numbering_id: format!("style:{}", kind.type_name()),
                level,
                kind,
                paragraph: text,
            }),
            _ => Err(text),
        }
    }

    fn read_inlines(&mut self, p: roxmltree::Node) -> Vec<Inline> {
        let mut builder = InlineBuilder::new();
        self.read_run_container(p, &mut builder);
        builder.finish()
    }

    fn read_run_container(&mut self, node: roxmltree::Node, builder: &mut InlineBuilder) {
        for child in node.children() {
            if child.tag_name().namespace() != Some(WML_NS) {
                continue;
            }
            match child.tag_name().name() {
                "r" => self.read_run(child, builder),
                "hyperlink" => self.read_hyperlink(child, builder),
                "sdt" => {
                    if let Some(content) = wml(child, "sdtContent") {
                        self.read_run_container(content, builder);
                    }
                }
                "ins" | "smartTag" | "fldSimple" | "customXml" => {
                    self.read_run_container(child, builder)
                }
                _ => {}
            }
        }
    }

    fn read_run(&mut self, r: roxmltree::Node, builder: &mut InlineBuilder) {
        let style = self.run_style(r);
        for child in r.children() {
            if child.tag_name().namespace() != Some(WML_NS) {
                continue;
            }
            match child.tag_name().name() {
                "t" => builder.push_text(child.text().unwrap_or_default(), &style),
                "tab" => builder.push_text("\t", &style),
                "br" | "cr" => builder.push_text("\n", &style),
                "drawing" => {
                    if let Some(image) = self.read_drawing(child) {
                        builder.splice_image(image);
                    }
                }
                _ => {}
            }
        }
    }

    fn run_style(&self, r: roxmltree::Node) -> StyleContext {
        let mut style = StyleContext::new();
        let Some(rpr) = wml(r, "rPr") else {
            return style;
        };
        let character_style = wml_attr(rpr, "rStyle");

        let bold = wml_bool(rpr, "b")
            .unwrap_or_else(|| character_style.is_some_and(|id| self.styles.bold(id)));
        if bold {
            style = style.bold();
        }
        let italic = wml_bool(rpr, "i")
            .unwrap_or_else(|| character_style.is_some_and(|id| self.styles.italic(id)));
        if italic {
            style = style.italic();
        }
        if wml(rpr, "u").is_some_and(|u| u.attribute((WML_NS, "val")) != Some("none")) {
            style = style.underline();
        }
        if let Some(color) = wml_attr(rpr, "color").filter(|c| *c != "auto") {
            style = style.color(&format!("#{}", color.to_uppercase()));
        }
        if let Some(font) = wml(rpr, "rFonts").and_then(|f| f.attribute((WML_NS, "ascii"))) {
            style = style.font(font);
        }
        if let Some(half_points) = wml_attr(rpr, "sz").and_then(|v| v.parse::<f32>().ok()) {
            style = style.font_size(half_points / 2.0);
        }
        style
    }

    fn read_hyperlink(&mut self, node: roxmltree::Node, builder: &mut InlineBuilder) {
        let href = node
            .attribute((REL_NS, "id"))
            .and_then(|id| self.rels.get(id))
            .map(|rel| rel.target.clone())
            .or_else(|| node.attribute((WML_NS, "anchor")).map(|a| format!("#{a}")));

        let mut label = InlineBuilder::new();
        self.read_run_container(node, &mut label);
        let children = label.finish_text_runs();

        match href {
            Some(href) => {
                let title = children.iter().map(|run| run.text.as_str()).collect();
                builder.splice_link(Link {
                    id: NodeId::generate(),
                    href,
                    title,
                    children,
                });
            }
            None => {
                debug!("hyperlink without target, keeping its text");
                for run in children {
                    builder.push_run(run);
                }
            }
        }
    }

    fn read_drawing(&mut self, drawing: roxmltree::Node) -> Option<Image> {
        let embed = find_blip_embed(drawing)?;
        let Some(rel) = self.rels.get(embed).cloned() else {
            warn!("image relationship {embed} not found");
            return None;
        };
        let size = extent_px(drawing);

        if rel.external {
            let mut image = Image::new(rel.target);
            (image.width, image.height) = size.unzip();
            return Some(image);
        }

        let part = part_path(&rel.target);
        let Some(bytes) = self.package.read_bytes(&part) else {
            warn!("image part {part} missing from package");
            return None;
        };

        let name = image_file_name(drawing, &rel.target);
        let src = match self
            .ctx
            .assets
            .store_image(&self.ctx.document_id, &name, &bytes)
        {
            Ok(src) => src,
            Err(e) => {
                warn!("dropping image {name}: {e}");
                return None;
            }
        };

        let mut image = Image::new(src);
        (image.width, image.height) = size.or_else(|| decoded_px(&bytes)).unzip();
        Some(image)
    }

    fn read_table(&mut self, tbl: roxmltree::Node) -> Table {
        let mut rows = Vec::new();
        for tr in tbl.children().filter(|n| is_wml(*n, "tr")) {
            let cells: Vec<Vec<Inline>> = tr
                .children()
                .filter(|n| is_wml(*n, "tc"))
                .map(|tc| self.read_cell(tc))
                .collect();
            rows.push(cells);
        }
        build_table(rows, self.ctx.options.table)
    }

    /// Every paragraph of the cell, joined by line breaks.
    fn read_cell(&mut self, tc: roxmltree::Node) -> Vec<Inline> {
        let mut inlines = Vec::new();
        for p in tc.descendants().filter(|n| is_wml(*n, "p")) {
            let paragraph = self.read_inlines(p);
            if is_blank(&paragraph) {
                continue;
            }
            if !inlines.is_empty() {
                inlines.push(Inline::Text(TextRun::plain("\n")));
            }
            inlines.extend(paragraph);
        }
        inlines
    }
}

fn find_blip_embed<'a>(container: roxmltree::Node<'a, 'a>) -> Option<&'a str> {
    container
        .descendants()
        .find(|n| n.tag_name().name() == "blip" && n.tag_name().namespace() == Some(DML_NS))
        .and_then(|n| n.attribute((REL_NS, "embed")))
}

/// Display size from `wp:extent`, in pixels.
fn extent_px(drawing: roxmltree::Node) -> Option<(f32, f32)> {
    let extent = drawing
        .descendants()
        .find(|n| n.tag_name().name() == "extent" && n.tag_name().namespace() == Some(WPD_NS))?;
    let cx: f32 = extent.attribute("cx")?.parse().ok()?;
    let cy: f32 = extent.attribute("cy")?.parse().ok()?;
    Some((cx / EMU_PER_PIXEL, cy / EMU_PER_PIXEL))
}

/// Pixel size of the image data itself.
fn decoded_px(bytes: &[u8]) -> Option<(f32, f32)> {
    let decoded = image::load_from_memory(bytes).ok()?;
    Some((decoded.width() as f32, decoded.height() as f32))
}

/// `{8 hex}-{docPr name}.{ext}`; the random prefix keeps names unique per document.
fn image_file_name(drawing: roxmltree::Node, target: &str) -> String {
    let stem: String = drawing
        .descendants()
        .find(|n| n.tag_name().name() == "docPr")
        .and_then(|n| n.attribute("name"))
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = if stem.trim_matches('_').is_empty() {
        "image".to_string()
    } else {
        stem
    };
    let extension = Path::new(target)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png");
    let prefix: String = NodeId::generate().as_str().chars().take(8).collect();
    format!("{prefix}-{stem}.{extension}")
}
