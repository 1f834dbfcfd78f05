use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// A package with the given body and optional side parts.
pub struct Package {
    pub body: String,
    pub styles: Option<String>,
    pub numbering: Option<String>,
    pub rels: Option<String>,
}

impl Package {
    pub fn body(body: impl Into<String>) -> Self {
        Package {
            body: body.into(),
            styles: None,
            numbering: None,
            rels: None,
        }
    }

    pub fn with_styles(mut self, styles: impl Into<String>) -> Self {
        self.styles = Some(format!(r#"<w:styles xmlns:w="{W}">{}</w:styles>"#, styles.into()));
        self
    }

    pub fn with_numbering(mut self, numbering: impl Into<String>) -> Self {
        self.numbering = Some(format!(
            r#"<w:numbering xmlns:w="{W}">{}</w:numbering>"#,
            numbering.into()
        ));
        self
    }

    pub fn with_rels(mut self, rels: impl Into<String>) -> Self {
        self.rels = Some(format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            rels.into()
        ));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = SimpleFileOptions::default();

        let document = format!(
            r#"<w:document xmlns:w="{W}" xmlns:r="{R}"><w:body>{}</w:body></w:document>"#,
            self.body
        );
        let parts = [
            Some(("word/document.xml", document)),
            self.styles.map(|xml| ("word/styles.xml", xml)),
            self.numbering.map(|xml| ("word/numbering.xml", xml)),
            self.rels.map(|xml| ("word/_rels/document.xml.rels", xml)),
        ];
        for (name, content) in parts.into_iter().flatten() {
            zip.start_file(name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        buffer
    }
}

/// A paragraph with one plain run.
pub fn paragraph(text: &str) -> String {
    format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
}

/// A paragraph with a style id.
pub fn styled(style: &str, text: &str) -> String {
    format!(r#"<w:p><w:pPr><w:pStyle w:val="{style}"/></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#)
}

/// A list paragraph under numbering `num_id` at `level`.
pub fn numbered(num_id: u32, level: u32, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="{level}"/><w:numId w:val="{num_id}"/></w:numPr></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#
    )
}

/// Numbering `num_id` whose levels use the given formats.
pub fn numbering_definition(num_id: u32, formats: &[&str]) -> String {
    let levels: String = formats
        .iter()
        .enumerate()
        .map(|(level, format)| {
            format!(r#"<w:lvl w:ilvl="{level}"><w:numFmt w:val="{format}"/></w:lvl>"#)
        })
        .collect();
    format!(
        r#"<w:abstractNum w:abstractNumId="{num_id}">{levels}</w:abstractNum><w:num w:numId="{num_id}"><w:abstractNumId w:val="{num_id}"/></w:num>"#
    )
}
