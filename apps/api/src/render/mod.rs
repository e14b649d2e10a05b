// Document export: record -> styled document -> .docx package on disk.
// `layout` owns the formatting rules, `docx` owns the file format.

pub mod document;
pub mod docx;
pub mod handlers;
pub mod labels;
pub mod layout;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::models::resume::ResumeRecord;
use crate::render::document::{Picture, EMU_PER_INCH};
use crate::render::labels::labels_for;
use crate::render::layout::build_document;
use crate::store::Language;

/// Header photo is drawn at 1.3 x 1.3 inches.
const PHOTO_SIZE_EMU: u64 = EMU_PER_INCH * 13 / 10;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write document package: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("Failed to write document stream: {0}")]
    Stream(#[from] std::io::Error),

    #[error("Image could not be decoded: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedImage(String),

    #[error("Text contains a character that cannot be written (U+{code:04X}): {text:?}")]
    InvalidText { code: u32, text: String },
}

/// Deterministic export name: `CV_<name with underscores>_<lang>.docx`.
/// Spaces and path separators become `_`, so the name never leaves the
/// output directory.
pub fn output_filename(record: &ResumeRecord, lang: Language) -> String {
    let name: String = record
        .basics
        .name
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    format!("CV_{name}_{lang}.docx")
}

/// Renders records for one language variant. Photo paths in the record are
/// resolved against `asset_dir`.
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    asset_dir: PathBuf,
    lang: Language,
}

impl DocumentRenderer {
    pub fn new(asset_dir: impl Into<PathBuf>, lang: Language) -> Self {
        Self {
            asset_dir: asset_dir.into(),
            lang,
        }
    }

    /// Writes one document to `output_path`, replacing any existing file.
    pub fn render(&self, record: &ResumeRecord, output_path: &Path) -> Result<(), RenderError> {
        let photo = record
            .basics
            .photo()
            .and_then(|relative| self.load_photo(relative));
        let doc = build_document(record, labels_for(self.lang), photo);
        doc.check_text()?;

        let file = File::create(output_path).map_err(|source| RenderError::Io {
            path: output_path.to_path_buf(),
            source,
        })?;
        let mut writer = docx::write_package(&doc, BufWriter::new(file))?;
        writer.flush()?;

        info!(
            lang = %self.lang,
            path = %output_path.display(),
            blocks = doc.blocks.len(),
            "Rendered CV document"
        );
        Ok(())
    }

    /// Any failure here drops the photo from the header; the render goes on.
    fn load_photo(&self, relative: &str) -> Option<Picture> {
        let path = self.asset_dir.join(relative);
        if !path.exists() {
            warn!(path = %path.display(), "Profile photo not found, rendering without it");
            return None;
        }
        match Picture::from_file(&path, PHOTO_SIZE_EMU, PHOTO_SIZE_EMU) {
            Ok(picture) => Some(picture),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load profile photo");
                None
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
