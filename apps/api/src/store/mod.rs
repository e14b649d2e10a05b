//! Record Store — one JSON file per language variant.
//!
//! Reads honour the requested language; writes always go to the primary
//! file. Every save is a full overwrite with no locking, so concurrent
//! writers race and the last one wins.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::resume::ResumeRecord;

/// The two independently stored variants of the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Primary variant; the only one edits are written to.
    #[default]
    It,
    En,
}

impl Language {
    pub fn tag(self) -> &'static str {
        match self {
            Language::It => "it",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("CV file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("CV file {} is malformed: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode CV record: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct RecordStore {
    primary: PathBuf,
    secondary: PathBuf,
}

impl RecordStore {
    pub fn new(primary: impl Into<PathBuf>, secondary: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    pub fn path_for(&self, lang: Language) -> &Path {
        match lang {
            Language::It => &self.primary,
            Language::En => &self.secondary,
        }
    }

    /// Reads and parses the record for `lang`.
    pub fn load(&self, lang: Language) -> Result<ResumeRecord, StoreError> {
        let path = self.path_for(lang);
        let raw = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => StoreError::NotFound {
                path: path.to_path_buf(),
            },
            _ => StoreError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let record = serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(lang = %lang, path = %path.display(), "Loaded CV record");
        Ok(record)
    }

    /// Overwrites the primary file with `record`, pretty-printed with
    /// two-space indentation. Non-ASCII text is written verbatim.
    pub fn save(&self, record: &ResumeRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(record).map_err(StoreError::Encode)?;
        std::fs::write(&self.primary, json).map_err(|source| StoreError::Io {
            path: self.primary.clone(),
            source,
        })?;
        info!(path = %self.primary.display(), "Saved CV record");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
