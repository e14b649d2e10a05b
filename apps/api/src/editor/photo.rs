//! Profile photo upload: extension check, unique naming, write, record update.

use std::path::Path;

use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::routes::blocking;
use crate::store::{Language, RecordStore};

pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Photos live in this sub-directory of the static asset directory; the
/// record stores paths relative to the asset directory.
pub const PHOTO_SUBDIR: &str = "img";

/// Returns the file's extension, as written, when it is an allowed image type.
pub fn allowed_extension(filename: &str) -> Option<&str> {
    let (_, ext) = filename.rsplit_once('.')?;
    ALLOWED_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        .then_some(ext)
}

/// `<uuid v4>.<original extension>`, or a validation error for names that
/// are empty or carry a disallowed extension.
pub fn stored_filename(original: &str) -> Result<String, AppError> {
    if original.trim().is_empty() {
        return Err(AppError::Validation("No file selected".to_string()));
    }
    let ext = allowed_extension(original).ok_or_else(|| {
        AppError::Validation("Unsupported file format. Use PNG, JPG or JPEG.".to_string())
    })?;
    Ok(format!("{}.{}", Uuid::new_v4(), ext))
}

/// Validates and writes the upload into `asset_dir/img`, then points the
/// primary record at it. Returns the record's new photo path.
pub async fn save_profile_photo(
    asset_dir: &Path,
    store: &RecordStore,
    original_name: &str,
    data: Bytes,
) -> Result<String, AppError> {
    let filename = stored_filename(original_name)?;
    let target = asset_dir.join(PHOTO_SUBDIR).join(&filename);
    tokio::fs::write(&target, &data).await.map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Failed to write {}: {e}", target.display()))
    })?;

    let relative = format!("{PHOTO_SUBDIR}/{filename}");
    let store = store.clone();
    let photo = relative.clone();
    blocking(move || {
        let mut record = store.load(Language::It)?;
        record.basics.photo = Some(photo);
        store.save(&record)?;
        Ok(())
    })
    .await?;

    info!(path = %target.display(), bytes = data.len(), "Stored profile photo");
    Ok(relative)
}
