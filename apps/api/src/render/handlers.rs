//! Axum route handlers for document generation and download.

use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::status::StatusMessage;
use crate::render::{output_filename, DocumentRenderer};
use crate::routes::{blocking, LangQuery};
use crate::state::AppState;

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// POST /api/v1/documents/generate
///
/// Renders the requested language variant. Any failure is logged and
/// reported back as one message; nothing escapes this boundary.
pub async fn handle_generate(
    State(state): State<AppState>,
    Query(params): Query<LangQuery>,
) -> Result<Json<StatusMessage>, AppError> {
    let lang = params.lang;
    let store = state.store.clone();
    let output_dir = state.config.output_dir.clone();
    let renderer = DocumentRenderer::new(state.config.static_dir.clone(), lang);

    // Loading reads the record, rendering reads the photo and writes the
    // package; all of it stays off the executor.
    let filename = blocking(move || {
        let record = store.load(lang)?;
        let filename = output_filename(&record, lang);
        renderer
            .render(&record, &output_dir.join(&filename))
            .map_err(|e| {
                error!(lang = %lang, error = %e, "CV generation failed");
                AppError::Render(e)
            })?;
        Ok(filename)
    })
    .await?;

    info!(lang = %lang, file = %filename, "CV generated");
    Ok(Json(StatusMessage::success(format!(
        "CV generated successfully as \"{filename}\""
    ))))
}

/// GET /api/v1/documents/download
pub async fn handle_download(
    State(state): State<AppState>,
    Query(params): Query<LangQuery>,
) -> Result<Response, AppError> {
    let lang = params.lang;
    let store = state.store.clone();
    let record = blocking(move || Ok(store.load(lang)?)).await?;
    let filename = output_filename(&record, lang);
    let path = state.config.output_dir.join(&filename);

    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(
                "CV file not generated yet. Please generate the CV first.".to_string(),
            ));
        }
        Err(e) => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "Failed to read {}: {e}",
                path.display()
            )))
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        Body::from(data),
    )
        .into_response())
}
