use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::editor::photo::PHOTO_SUBDIR;

/// Application configuration loaded from environment variables.
/// Every variable has a default, so an empty environment is valid.
#[derive(Debug, Clone)]
pub struct Config {
    /// Record for the primary language; the only file edits are saved to.
    pub primary_cv_path: PathBuf,
    pub secondary_cv_path: PathBuf,
    /// Root that record photo paths are relative to.
    pub static_dir: PathBuf,
    /// Where generated documents are written and served from.
    pub output_dir: PathBuf,
    pub port: u16,
    pub upload_limit_bytes: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            primary_cv_path: env_or("CV_PRIMARY_PATH", "cv.json").into(),
            secondary_cv_path: env_or("CV_SECONDARY_PATH", "cv_en.json").into(),
            static_dir: env_or("STATIC_DIR", "static").into(),
            output_dir: env_or("OUTPUT_DIR", ".").into(),
            port: env_or("PORT", "5000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            upload_limit_bytes: env_or("UPLOAD_LIMIT_BYTES", "10485760")
                .parse::<usize>()
                .context("UPLOAD_LIMIT_BYTES must be a byte count")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn photo_dir(&self) -> PathBuf {
        self.static_dir.join(PHOTO_SUBDIR)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
