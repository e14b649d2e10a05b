//! Axum route handlers for viewing and editing the record.
//!
//! Every edit is a full load-modify-save of the primary record. Updates at
//! an out-of-range index still save; deletes at an out-of-range index do
//! not touch the file.

use axum::{
    extract::{Multipart, Path, Query, State},
    Form, Json,
};
use tracing::{debug, info};

use crate::editor::{self, photo, BasicsForm, DigitalSkillForm, EducationForm, LanguageForm};
use crate::editor::{OtherForm, SkillsForm, WorkForm};
use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::models::status::StatusMessage;
use crate::routes::{blocking, LangQuery};
use crate::state::AppState;
use crate::store::{Language, RecordStore};

/// Multipart field carrying the uploaded photo.
const PHOTO_FIELD: &str = "profile_photo";

async fn edit_primary<R, F>(store: &RecordStore, edit: F) -> Result<R, AppError>
where
    F: FnOnce(&mut ResumeRecord) -> R + Send + 'static,
    R: Send + 'static,
{
    let store = store.clone();
    blocking(move || {
        let mut record = store.load(Language::It)?;
        let outcome = edit(&mut record);
        store.save(&record)?;
        Ok(outcome)
    })
    .await
}

/// Saves only when something was removed.
async fn delete_from_primary<T, F>(store: &RecordStore, remove: F) -> Result<Option<T>, AppError>
where
    F: FnOnce(&mut ResumeRecord) -> Option<T> + Send + 'static,
    T: Send + 'static,
{
    let store = store.clone();
    blocking(move || {
        let mut record = store.load(Language::It)?;
        let removed = remove(&mut record);
        if removed.is_some() {
            store.save(&record)?;
        }
        Ok(removed)
    })
    .await
}

/// Negative indices are out of range like any other.
fn slot(index: i64) -> usize {
    usize::try_from(index).unwrap_or(usize::MAX)
}

fn nothing_deleted(section: &str, index: i64) -> Json<StatusMessage> {
    debug!(section, index, "Delete index out of range, nothing removed");
    Json(StatusMessage::info(format!("No {section} entry at index {index}")))
}

/// GET /api/v1/resume
pub async fn handle_view(
    State(state): State<AppState>,
    Query(params): Query<LangQuery>,
) -> Result<Json<ResumeRecord>, AppError> {
    let store = state.store.clone();
    let record = blocking(move || Ok(store.load(params.lang)?)).await?;
    Ok(Json(record))
}

/// PUT /api/v1/resume/basics
pub async fn handle_update_basics(
    State(state): State<AppState>,
    Form(form): Form<BasicsForm>,
) -> Result<Json<StatusMessage>, AppError> {
    edit_primary(&state.store, move |record| editor::update_basics(record, form)).await?;
    info!("Updated basics");
    Ok(Json(StatusMessage::success("Basic information updated")))
}

// ────────────────────────────────────────────────────────────────────────────
// Work
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/work
pub async fn handle_add_work(
    State(state): State<AppState>,
    Form(form): Form<WorkForm>,
) -> Result<Json<StatusMessage>, AppError> {
    edit_primary(&state.store, move |record| editor::add_work(record, form)).await?;
    Ok(Json(StatusMessage::success("Work experience added")))
}

/// PUT /api/v1/resume/work/:index
pub async fn handle_update_work(
    State(state): State<AppState>,
    Path(index): Path<i64>,
    Form(form): Form<WorkForm>,
) -> Result<Json<StatusMessage>, AppError> {
    let applied = edit_primary(&state.store, move |record| {
        editor::update_work(record, slot(index), form)
    })
    .await?;
    info!(index, applied, "Updated work entry");
    Ok(Json(StatusMessage::success("Work experience updated")))
}

/// DELETE /api/v1/resume/work/:index
pub async fn handle_delete_work(
    State(state): State<AppState>,
    Path(index): Path<i64>,
) -> Result<Json<StatusMessage>, AppError> {
    let removed = delete_from_primary(&state.store, move |record| {
        editor::delete_work(record, slot(index))
    })
    .await?;
    match removed {
        Some(deleted) => Ok(Json(StatusMessage::success(format!(
            "Work experience \"{} at {}\" deleted",
            deleted.position, deleted.company
        )))),
        None => Ok(nothing_deleted("work", index)),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    Form(form): Form<EducationForm>,
) -> Result<Json<StatusMessage>, AppError> {
    edit_primary(&state.store, move |record| editor::add_education(record, form)).await?;
    Ok(Json(StatusMessage::success("Education added")))
}

/// PUT /api/v1/resume/education/:index
pub async fn handle_update_education(
    State(state): State<AppState>,
    Path(index): Path<i64>,
    Form(form): Form<EducationForm>,
) -> Result<Json<StatusMessage>, AppError> {
    let applied = edit_primary(&state.store, move |record| {
        editor::update_education(record, slot(index), form)
    })
    .await?;
    info!(index, applied, "Updated education entry");
    Ok(Json(StatusMessage::success("Education updated")))
}

/// DELETE /api/v1/resume/education/:index
pub async fn handle_delete_education(
    State(state): State<AppState>,
    Path(index): Path<i64>,
) -> Result<Json<StatusMessage>, AppError> {
    let removed = delete_from_primary(&state.store, move |record| {
        editor::delete_education(record, slot(index))
    })
    .await?;
    match removed {
        Some(deleted) => Ok(Json(StatusMessage::success(format!(
            "Education \"{}\" deleted",
            deleted.degree
        )))),
        None => Ok(nothing_deleted("education", index)),
    }
}

/// PUT /api/v1/resume/skills
pub async fn handle_update_skills(
    State(state): State<AppState>,
    Form(form): Form<SkillsForm>,
) -> Result<Json<StatusMessage>, AppError> {
    edit_primary(&state.store, move |record| editor::update_skills(record, form)).await?;
    info!("Updated skills");
    Ok(Json(StatusMessage::success("Skills updated")))
}

// ────────────────────────────────────────────────────────────────────────────
// Languages
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/languages
pub async fn handle_add_language(
    State(state): State<AppState>,
    Form(form): Form<LanguageForm>,
) -> Result<Json<StatusMessage>, AppError> {
    edit_primary(&state.store, move |record| editor::add_language(record, form)).await?;
    Ok(Json(StatusMessage::success("Language added")))
}

/// PUT /api/v1/resume/languages/:index
pub async fn handle_update_language(
    State(state): State<AppState>,
    Path(index): Path<i64>,
    Form(form): Form<LanguageForm>,
) -> Result<Json<StatusMessage>, AppError> {
    let applied = edit_primary(&state.store, move |record| {
        editor::update_language(record, slot(index), form)
    })
    .await?;
    info!(index, applied, "Updated language entry");
    Ok(Json(StatusMessage::success("Language updated")))
}

/// DELETE /api/v1/resume/languages/:index
pub async fn handle_delete_language(
    State(state): State<AppState>,
    Path(index): Path<i64>,
) -> Result<Json<StatusMessage>, AppError> {
    let removed = delete_from_primary(&state.store, move |record| {
        editor::delete_language(record, slot(index))
    })
    .await?;
    match removed {
        Some(deleted) => Ok(Json(StatusMessage::success(format!(
            "Language \"{}\" deleted",
            deleted.language
        )))),
        None => Ok(nothing_deleted("language", index)),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Digital skills
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/digital-skills
pub async fn handle_add_digital_skill(
    State(state): State<AppState>,
    Form(form): Form<DigitalSkillForm>,
) -> Result<Json<StatusMessage>, AppError> {
    edit_primary(&state.store, move |record| {
        editor::add_digital_skill(record, form)
    })
    .await?;
    Ok(Json(StatusMessage::success("Digital skill added")))
}

/// PUT /api/v1/resume/digital-skills/:index
pub async fn handle_update_digital_skill(
    State(state): State<AppState>,
    Path(index): Path<i64>,
    Form(form): Form<DigitalSkillForm>,
) -> Result<Json<StatusMessage>, AppError> {
    let applied = edit_primary(&state.store, move |record| {
        editor::update_digital_skill(record, slot(index), form)
    })
    .await?;
    info!(index, applied, "Updated digital skill");
    Ok(Json(StatusMessage::success("Digital skill updated")))
}

/// DELETE /api/v1/resume/digital-skills/:index
pub async fn handle_delete_digital_skill(
    State(state): State<AppState>,
    Path(index): Path<i64>,
) -> Result<Json<StatusMessage>, AppError> {
    let removed = delete_from_primary(&state.store, move |record| {
        editor::delete_digital_skill(record, slot(index))
    })
    .await?;
    match removed {
        Some(deleted) => Ok(Json(StatusMessage::success(format!(
            "Digital skill \"{}\" deleted",
            deleted.skill
        )))),
        None => Ok(nothing_deleted("digital skill", index)),
    }
}

/// PUT /api/v1/resume/other
pub async fn handle_update_other(
    State(state): State<AppState>,
    Form(form): Form<OtherForm>,
) -> Result<Json<StatusMessage>, AppError> {
    edit_primary(&state.store, move |record| editor::update_other(record, form)).await?;
    info!("Updated other information");
    Ok(Json(StatusMessage::success("Other information updated")))
}

/// POST /api/v1/resume/photo
///
/// Expects a multipart body with a `profile_photo` file field.
pub async fn handle_upload_photo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<StatusMessage>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?
    {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?;

        let path =
            photo::save_profile_photo(&state.config.static_dir, &state.store, &filename, data)
                .await?;
        return Ok(Json(StatusMessage::success(format!(
            "Profile photo uploaded as {path}"
        ))));
    }

    Err(AppError::Validation("No file sent".to_string()))
}
