//! WordprocessingML (.docx) packaging for a styled `Document`.
//!
//! The package holds the minimum parts Word and LibreOffice need: content
//! types, package and document relationships, styles (Normal + List Bullet),
//! a single bullet numbering definition, the body and one media part per
//! embedded picture.

use std::io::{Seek, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::render::document::{
    Alignment, Block, Cell, Document, Inline, Paragraph, ParagraphStyle, Picture, Run, Table,
};
use crate::render::RenderError;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const CONTENT_TYPES_XML: &str = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Default Extension="jpeg" ContentType="image/jpeg"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="Calibri" w:cs="Calibri"/><w:sz w:val="22"/><w:szCs w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="0" w:line="276" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/><w:basedOn w:val="Normal"/><w:pPr><w:numPr><w:numId w:val="1"/></w:numPr><w:ind w:left="360" w:hanging="360"/></w:pPr></w:style><w:style w:type="table" w:default="1" w:styleId="TableNormal"><w:name w:val="Normal Table"/><w:tblPr><w:tblInd w:w="0" w:type="dxa"/><w:tblCellMar><w:top w:w="0" w:type="dxa"/><w:left w:w="108" w:type="dxa"/><w:bottom w:w="0" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar></w:tblPr></w:style></w:styles>"#;

const NUMBERING_XML: &str = r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:abstractNum w:abstractNumId="0"><w:multiLevelType w:val="singleLevel"/><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="360" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum><w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num></w:numbering>"#;

const DOCUMENT_OPEN: &str = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><w:body>"#;

const REL_TYPE_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// US Letter in twentieths of a point.
const PAGE_WIDTH_TWIPS: u32 = 12_240;
const PAGE_HEIGHT_TWIPS: u32 = 15_840;
const RULE_COLOR: &str = "4472C4";

/// Writes `doc` as a .docx package into `writer` and returns the writer.
/// Text that XML 1.0 cannot carry is an error, not a broken package.
pub fn write_package<W: Write + Seek>(doc: &Document, writer: W) -> Result<W, RenderError> {
    doc.check_text()?;
    let pictures: Vec<&Picture> = doc.pictures().collect();
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(writer);

    let parts: [(&str, String); 6] = [
        ("[Content_Types].xml", xml_part(CONTENT_TYPES_XML)),
        ("_rels/.rels", xml_part(PACKAGE_RELS_XML)),
        ("word/_rels/document.xml.rels", document_rels_xml(&pictures)),
        ("word/styles.xml", xml_part(STYLES_XML)),
        ("word/numbering.xml", xml_part(NUMBERING_XML)),
        ("word/document.xml", document_xml(doc)),
    ];
    for (name, body) in parts {
        zip.start_file(name, options)?;
        zip.write_all(body.as_bytes())?;
    }

    for (idx, picture) in pictures.iter().enumerate() {
        zip.start_file(format!("word/{}", media_name(idx, picture)), options)?;
        zip.write_all(&picture.data)?;
    }

    Ok(zip.finish()?)
}

fn xml_part(body: &str) -> String {
    format!("{XML_DECLARATION}\n{body}")
}

fn media_name(idx: usize, picture: &Picture) -> String {
    format!("media/image{}.{}", idx + 1, picture.format.extension())
}

fn picture_rel_id(idx: usize) -> String {
    format!("rIdImage{}", idx + 1)
}

fn document_rels_xml(pictures: &[&Picture]) -> String {
    let mut xml = String::from(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    xml.push_str(&format!(
        r#"<Relationship Id="rId1" Type="{REL_TYPE_BASE}/styles" Target="styles.xml"/>"#
    ));
    xml.push_str(&format!(
        r#"<Relationship Id="rId2" Type="{REL_TYPE_BASE}/numbering" Target="numbering.xml"/>"#
    ));
    for (idx, picture) in pictures.iter().enumerate() {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{REL_TYPE_BASE}/image" Target="{}"/>"#,
            picture_rel_id(idx),
            media_name(idx, picture)
        ));
    }
    xml.push_str("</Relationships>");
    xml_part(&xml)
}

/// Serializes the body. Pictures are numbered in reading order, matching
/// the relationship ids produced by `document_rels_xml`.
fn document_xml(doc: &Document) -> String {
    let mut body = BodyWriter {
        xml: String::from(DOCUMENT_OPEN),
        next_picture: 0,
    };
    for block in &doc.blocks {
        match block {
            Block::Paragraph(p) => body.paragraph(p),
            Block::Table(t) => body.table(t),
        }
    }
    let margin = doc.margin_twips;
    body.xml.push_str(&format!(
        r#"<w:sectPr><w:pgSz w:w="{PAGE_WIDTH_TWIPS}" w:h="{PAGE_HEIGHT_TWIPS}"/><w:pgMar w:top="{margin}" w:right="{margin}" w:bottom="{margin}" w:left="{margin}" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#
    ));
    body.xml.push_str("</w:body></w:document>");
    xml_part(&body.xml)
}

struct BodyWriter {
    xml: String,
    next_picture: usize,
}

impl BodyWriter {
    fn paragraph(&mut self, p: &Paragraph) {
        self.xml.push_str("<w:p><w:pPr>");
        if p.style == ParagraphStyle::ListBullet {
            self.xml.push_str(r#"<w:pStyle w:val="ListBullet"/>"#);
        }
        if p.rule_below {
            self.xml.push_str(&format!(
                r#"<w:pBdr><w:bottom w:val="single" w:sz="6" w:space="1" w:color="{RULE_COLOR}"/></w:pBdr>"#
            ));
        }
        let jc = match p.alignment {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        };
        self.xml.push_str(&format!(r#"<w:jc w:val="{jc}"/></w:pPr>"#));

        for inline in &p.content {
            match inline {
                Inline::Text(run) => self.run(run),
                Inline::Picture(picture) => self.picture(picture),
            }
        }
        self.xml.push_str("</w:p>");
    }

    fn run(&mut self, run: &Run) {
        self.xml.push_str("<w:r><w:rPr>");
        if run.bold {
            self.xml.push_str("<w:b/>");
        }
        if run.italic {
            self.xml.push_str("<w:i/>");
        }
        if let Some(color) = run.color {
            self.xml
                .push_str(&format!(r#"<w:color w:val="{}"/>"#, color.hex()));
        }
        if let Some(pt) = run.size_pt {
            let half_points = pt * 2;
            self.xml.push_str(&format!(
                r#"<w:sz w:val="{half_points}"/><w:szCs w:val="{half_points}"/>"#
            ));
        }
        self.xml.push_str("</w:rPr>");

        for (i, line) in run.text.split('\n').enumerate() {
            if i > 0 {
                self.xml.push_str("<w:br/>");
            }
            if !line.is_empty() {
                self.xml.push_str(&format!(
                    r#"<w:t xml:space="preserve">{}</w:t>"#,
                    escape(line)
                ));
            }
        }
        self.xml.push_str("</w:r>");
    }

    fn picture(&mut self, picture: &Picture) {
        let idx = self.next_picture;
        self.next_picture += 1;
        let id = idx + 1;
        let rel = picture_rel_id(idx);
        let (cx, cy) = (picture.width_emu, picture.height_emu);
        let ext = picture.format.extension();
        self.xml.push_str(&format!(
            concat!(
                r#"<w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0">"#,
                r#"<wp:extent cx="{cx}" cy="{cy}"/><wp:docPr id="{id}" name="Picture {id}"/>"#,
                r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
                r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
                r#"<pic:pic><pic:nvPicPr><pic:cNvPr id="{id}" name="image{id}.{ext}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
                r#"<pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
                r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
                r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic>"#,
                r#"</a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#,
            ),
            cx = cx,
            cy = cy,
            id = id,
            ext = ext,
            rel = rel,
        ));
    }

    fn table(&mut self, table: &Table) {
        let total: u32 = table.cells.iter().map(|c| c.width_twips).sum();
        self.xml.push_str(&format!(
            r#"<w:tbl><w:tblPr><w:tblW w:w="{total}" w:type="dxa"/><w:tblLayout w:type="fixed"/></w:tblPr><w:tblGrid>"#
        ));
        for cell in &table.cells {
            self.xml
                .push_str(&format!(r#"<w:gridCol w:w="{}"/>"#, cell.width_twips));
        }
        self.xml.push_str("</w:tblGrid><w:tr>");
        for cell in &table.cells {
            self.cell(cell);
        }
        self.xml.push_str("</w:tr></w:tbl>");
    }

    fn cell(&mut self, cell: &Cell) {
        self.xml.push_str(&format!(
            r#"<w:tc><w:tcPr><w:tcW w:w="{}" w:type="dxa"/></w:tcPr>"#,
            cell.width_twips
        ));
        // A cell must hold at least one paragraph.
        if cell.paragraphs.is_empty() {
            self.xml.push_str("<w:p/>");
        }
        for p in &cell.paragraphs {
            self.paragraph(p);
        }
        self.xml.push_str("</w:tc>");
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
