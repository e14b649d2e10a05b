//! In-memory styled document produced by `layout` and consumed by `docx`.

use std::path::Path;

use image::ImageFormat;

use crate::render::RenderError;

pub const EMU_PER_INCH: u64 = 914_400;
pub const TWIPS_PER_INCH: u32 = 1_440;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// Headings, names and rules.
    pub const ACCENT: Color = Color(68, 114, 196);
    pub const MUTED: Color = Color(128, 128, 128);

    pub fn hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParagraphStyle {
    #[default]
    Normal,
    ListBullet,
}

/// A span of uniformly styled text. `\n` inside `text` is a line break.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub size_pt: Option<u32>,
    pub color: Option<Color>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn size(mut self, pt: u32) -> Self {
        self.size_pt = Some(pt);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureFormat {
    Png,
    Jpeg,
}

impl PictureFormat {
    pub fn extension(self) -> &'static str {
        match self {
            PictureFormat::Png => "png",
            PictureFormat::Jpeg => "jpeg",
        }
    }
}

/// A decoded-and-verified raster image with its display size.
#[derive(Debug, Clone, PartialEq)]
pub struct Picture {
    pub data: Vec<u8>,
    pub format: PictureFormat,
    pub width_emu: u64,
    pub height_emu: u64,
}

impl Picture {
    /// Accepts PNG or JPEG bytes that decode cleanly.
    pub fn from_bytes(data: Vec<u8>, width_emu: u64, height_emu: u64) -> Result<Self, RenderError> {
        let format = match image::guess_format(&data)? {
            ImageFormat::Png => PictureFormat::Png,
            ImageFormat::Jpeg => PictureFormat::Jpeg,
            other => return Err(RenderError::UnsupportedImage(format!("{other:?}"))),
        };
        image::load_from_memory(&data)?;

        Ok(Self {
            data,
            format,
            width_emu,
            height_emu,
        })
    }

    pub fn from_file(path: &Path, width_emu: u64, height_emu: u64) -> Result<Self, RenderError> {
        let data = std::fs::read(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(data, width_emu, height_emu)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(Run),
    Picture(Picture),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub content: Vec<Inline>,
    pub alignment: Alignment,
    pub style: ParagraphStyle,
    /// Draws an accent-coloured bottom border, used as a horizontal rule.
    pub rule_below: bool,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty paragraph carrying only a horizontal rule.
    pub fn rule() -> Self {
        Self {
            rule_below: true,
            ..Self::default()
        }
    }

    pub fn run(mut self, run: Run) -> Self {
        self.content.push(Inline::Text(run));
        self
    }

    pub fn picture(mut self, picture: Picture) -> Self {
        self.content.push(Inline::Picture(picture));
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn style(mut self, style: ParagraphStyle) -> Self {
        self.style = style;
        self
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.content.iter().filter_map(|inline| match inline {
            Inline::Text(run) => Some(run),
            Inline::Picture(_) => None,
        })
    }

    pub fn text(&self) -> String {
        self.runs().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub width_twips: u32,
    pub paragraphs: Vec<Paragraph>,
}

/// A single-row, fixed-layout table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub blocks: Vec<Block>,
    pub margin_twips: u32,
}

impl Document {
    pub fn new(margin_twips: u32) -> Self {
        Self {
            blocks: Vec::new(),
            margin_twips,
        }
    }

    pub fn push(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    pub fn push_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    /// Every paragraph in reading order, including those inside table cells.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().flat_map(block_paragraphs)
    }

    /// Fails on the first run holding a character a document cannot store.
    pub fn check_text(&self) -> Result<(), RenderError> {
        for run in self.paragraphs().flat_map(|p| p.runs()) {
            if let Some(c) = run.text.chars().find(|&c| !is_xml_char(c)) {
                return Err(RenderError::InvalidText {
                    code: c as u32,
                    text: run.text.clone(),
                });
            }
        }
        Ok(())
    }

    /// Every embedded picture in reading order.
    pub fn pictures(&self) -> impl Iterator<Item = &Picture> {
        self.paragraphs()
            .flat_map(|p| p.content.iter())
            .filter_map(|inline| match inline {
                Inline::Picture(picture) => Some(picture),
                Inline::Text(_) => None,
            })
    }
}

/// XML 1.0 forbids C0 controls other than tab, newline and carriage return.
fn is_xml_char(c: char) -> bool {
    !matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
    )
}

fn block_paragraphs(block: &Block) -> Box<dyn Iterator<Item = &Paragraph> + '_> {
    match block {
        Block::Paragraph(p) => Box::new(std::iter::once(p)),
        Block::Table(t) => Box::new(t.cells.iter().flat_map(|c| c.paragraphs.iter())),
    }
}
