pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;

use crate::editor::handlers as editor;
use crate::errors::AppError;
use crate::render::handlers as documents;
use crate::state::AppState;
use crate::store::Language;

/// `?lang=it|en`, defaulting to the primary language.
#[derive(Debug, Deserialize)]
pub struct LangQuery {
    #[serde(default)]
    pub lang: Language,
}

/// Runs file-backed work on tokio's blocking pool.
pub async fn blocking<T, F>(task: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("blocking task failed: {e}")))?
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.upload_limit_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Record
        .route("/api/v1/resume", get(editor::handle_view))
        .route("/api/v1/resume/basics", put(editor::handle_update_basics))
        .route("/api/v1/resume/work", post(editor::handle_add_work))
        .route(
            "/api/v1/resume/work/:index",
            put(editor::handle_update_work).delete(editor::handle_delete_work),
        )
        .route("/api/v1/resume/education", post(editor::handle_add_education))
        .route(
            "/api/v1/resume/education/:index",
            put(editor::handle_update_education).delete(editor::handle_delete_education),
        )
        .route("/api/v1/resume/skills", put(editor::handle_update_skills))
        .route("/api/v1/resume/languages", post(editor::handle_add_language))
        .route(
            "/api/v1/resume/languages/:index",
            put(editor::handle_update_language).delete(editor::handle_delete_language),
        )
        .route(
            "/api/v1/resume/digital-skills",
            post(editor::handle_add_digital_skill),
        )
        .route(
            "/api/v1/resume/digital-skills/:index",
            put(editor::handle_update_digital_skill).delete(editor::handle_delete_digital_skill),
        )
        .route("/api/v1/resume/other", put(editor::handle_update_other))
        .route(
            "/api/v1/resume/photo",
            post(editor::handle_upload_photo).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Documents
        .route("/api/v1/documents/generate", post(documents::handle_generate))
        .route("/api/v1/documents/download", get(documents::handle_download))
        .with_state(state)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::path::Path;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::models::resume::tests::sample_record;
    use crate::models::resume::ResumeRecord;
    use crate::render::tests::tiny_png;

    struct Harness {
        dir: TempDir,
        state: AppState,
    }

    impl Harness {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let config = Config {
                primary_cv_path: dir.path().join("cv.json"),
                secondary_cv_path: dir.path().join("cv_en.json"),
                static_dir: dir.path().join("static"),
                output_dir: dir.path().join("out"),
                port: 0,
                upload_limit_bytes: 1024 * 1024,
                rust_log: "info".to_string(),
            };
            std::fs::create_dir_all(config.photo_dir()).unwrap();
            std::fs::create_dir_all(&config.output_dir).unwrap();
            let state = AppState::new(config);
            state.store.save(&sample_record()).unwrap();
            Self { dir, state }
        }

        async fn send(&self, request: Request<Body>) -> Response {
            build_router(self.state.clone()).oneshot(request).await.unwrap()
        }

        async fn form(&self, method: &str, uri: &str, body: &str) -> Response {
            self.send(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
        }

        async fn empty(&self, method: &str, uri: &str) -> Response {
            self.send(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
        }

        async fn upload(&self, filename: &str, data: &[u8]) -> Response {
            let boundary = "cv-editor-test-boundary";
            let mut body = Vec::new();
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"profile_photo\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

            self.send(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/resume/photo")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
        }

        fn primary(&self) -> ResumeRecord {
            self.state.store.load(Language::It).unwrap()
        }

        fn photo_files(&self) -> usize {
            std::fs::read_dir(self.state.config.photo_dir()).unwrap().count()
        }

        fn output(&self, name: &str) -> std::path::PathBuf {
            self.state.config.output_dir.join(name)
        }
    }

    async fn json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn write_json(path: &Path, record: &ResumeRecord) {
        std::fs::write(path, serde_json::to_string_pretty(record).unwrap()).unwrap();
    }

    #[tokio::test]
    async fn test_health() {
        let h = Harness::new();
        let response = h.empty("GET", "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_view_defaults_to_primary_and_honours_lang() {
        let h = Harness::new();
        let mut english = sample_record();
        english.basics.tagline = "Engineer (EN)".to_string();
        write_json(&h.state.config.secondary_cv_path, &english);

        let primary = json(h.empty("GET", "/api/v1/resume").await).await;
        assert_eq!(primary["basics"]["tagline"], "Software Engineer");

        let secondary = json(h.empty("GET", "/api/v1/resume?lang=en").await).await;
        assert_eq!(secondary["basics"]["tagline"], "Engineer (EN)");
    }

    #[tokio::test]
    async fn test_view_missing_variant_is_not_found() {
        let h = Harness::new();
        let response = h.empty("GET", "/api/v1/resume?lang=en").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json(response).await["error"]["code"], "CV_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_unknown_lang_is_rejected() {
        let h = Harness::new();
        let response = h.empty("GET", "/api/v1/resume?lang=fr").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_work_form_round_trip() {
        let h = Harness::new();
        let response = h
            .form(
                "PUT",
                "/api/v1/resume/work/0",
                "company=Hooli&position=CTO&duration=2025&achievements=Grew+team%0AShipped",
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["status"], "success");

        let record = h.primary();
        assert_eq!(record.work[0].company, "Hooli");
        assert_eq!(record.work[0].achievements, vec!["Grew team", "Shipped"]);
        assert_eq!(record.work[1], sample_record().work[1]);
    }

    #[tokio::test]
    async fn test_out_of_range_update_still_saves() {
        let h = Harness::new();
        // Compact JSON on disk, so a pretty-printed file proves a save happened.
        let compact = serde_json::to_string(&sample_record()).unwrap();
        std::fs::write(&h.state.config.primary_cv_path, compact).unwrap();

        let response = h
            .form("PUT", "/api/v1/resume/languages/9", "language=Klingon&level=A1")
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let raw = std::fs::read_to_string(&h.state.config.primary_cv_path).unwrap();
        assert!(raw.contains("\n  \"basics\""), "file should be rewritten pretty-printed");
        assert_eq!(h.primary(), sample_record());
    }

    #[tokio::test]
    async fn test_delete_and_out_of_range_delete() {
        let h = Harness::new();
        let response = h.empty("DELETE", "/api/v1/resume/work/1").await;
        assert_eq!(json(response).await["status"], "success");
        assert_eq!(h.primary().work.len(), 2);
        assert_eq!(h.primary().work[1].company, "Initech");

        let response = h.empty("DELETE", "/api/v1/resume/work/7").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["status"], "info");
        assert_eq!(h.primary().work.len(), 2);
    }

    #[tokio::test]
    async fn test_negative_index_is_out_of_range() {
        let h = Harness::new();
        let response = h
            .form(
                "PUT",
                "/api/v1/resume/work/-1",
                "company=Hooli&position=CTO&duration=2025&achievements=",
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["status"], "success");
        assert_eq!(h.primary(), sample_record());

        let response = h.empty("DELETE", "/api/v1/resume/languages/-3").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["status"], "info");
        assert_eq!(h.primary().languages.len(), 2);
    }

    #[tokio::test]
    async fn test_edit_keeps_keys_outside_the_model() {
        let h = Harness::new();
        let mut raw = serde_json::to_value(sample_record()).unwrap();
        raw["basics"]["website"] = "https://mrossi.dev".into();
        raw["projects"] = serde_json::json!([{ "name": "cv-editor" }]);
        std::fs::write(&h.state.config.primary_cv_path, raw.to_string()).unwrap();

        h.form("PUT", "/api/v1/resume/languages/9", "language=Klingon&level=A1")
            .await;
        h.empty("DELETE", "/api/v1/resume/work/0").await;

        let saved: Value = serde_json::from_str(
            &std::fs::read_to_string(&h.state.config.primary_cv_path).unwrap(),
        )
        .unwrap();
        assert_eq!(saved["basics"]["website"], "https://mrossi.dev");
        assert_eq!(saved["projects"][0]["name"], "cv-editor");
        assert_eq!(saved["work"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_blocking_returns_value_and_error() {
        let value = blocking(|| Ok(21 * 2)).await.unwrap();
        assert_eq!(value, 42);

        let err = blocking::<(), _>(|| Err(AppError::Validation("bad".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_add_digital_skill_and_update_skills() {
        let h = Harness::new();
        h.form("POST", "/api/v1/resume/digital-skills", "skill=Figma&level=Base")
            .await;
        let body = "ai_skills=&prog_advanced=Python%2C+Go+%2C++Rust&prog_intermediate=&prog_basic=\
                    &industrial_automation=&systems_windows=&systems_linux=Debian\
                    &software_skills=&devops_skills=Docker";
        let response = h.form("PUT", "/api/v1/resume/skills", body).await;
        assert_eq!(response.status(), StatusCode::OK);

        let record = h.primary();
        assert_eq!(record.digital_skills().last().unwrap().skill, "Figma");
        assert_eq!(
            record.skills.programming.unwrap().advanced.unwrap(),
            vec!["Python", "Go", "Rust"]
        );
    }

    #[tokio::test]
    async fn test_missing_form_field_is_rejected() {
        let h = Harness::new();
        let response = h.form("POST", "/api/v1/resume/education", "degree=PhD").await;
        assert!(response.status().is_client_error());
        assert_eq!(h.primary().education.len(), 1);
    }

    #[tokio::test]
    async fn test_photo_upload_rejects_gif() {
        let h = Harness::new();
        let response = h.upload("photo.gif", b"GIF89a").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(h.photo_files(), 0);
        assert!(h.primary().basics.photo.is_none());
    }

    #[tokio::test]
    async fn test_photo_upload_accepts_png_and_generate_embeds_it() {
        let h = Harness::new();
        let response = h.upload("photo.png", &tiny_png()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(h.photo_files(), 1);

        let photo = h.primary().basics.photo.unwrap();
        assert!(photo.starts_with("img/") && photo.ends_with(".png"));

        let response = h.empty("POST", "/api/v1/documents/generate").await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = std::fs::read(h.output("CV_Mario_Rossi_it.docx")).unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        assert!(archive.file_names().any(|n| n.starts_with("word/media/")));
    }

    #[tokio::test]
    async fn test_photo_upload_without_file_field() {
        let h = Harness::new();
        let boundary = "b";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nx\r\n--{boundary}--\r\n"
        );
        let response = h
            .send(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/resume/photo")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_download_before_generate_is_not_found() {
        let h = Harness::new();
        let response = h.empty("GET", "/api/v1/documents/download").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_generate_then_download_per_language() {
        let h = Harness::new();
        write_json(&h.state.config.secondary_cv_path, &sample_record());

        let response = h.empty("POST", "/api/v1/documents/generate?lang=en").await;
        assert_eq!(response.status(), StatusCode::OK);
        let message = json(response).await;
        assert!(message["message"]
            .as_str()
            .unwrap()
            .contains("CV_Mario_Rossi_en.docx"));
        assert!(!h.output("CV_Mario_Rossi_it.docx").exists());

        let response = h.empty("GET", "/api/v1/documents/download?lang=en").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"CV_Mario_Rossi_en.docx\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..2], b"PK");

        let response = h.empty("GET", "/api/v1/documents/download?lang=it").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_generate_rejects_control_characters() {
        let h = Harness::new();
        let mut record = sample_record();
        record.basics.tagline = "Engineer\u{1}\u{B}".to_string();
        h.state.store.save(&record).unwrap();

        let response = h.empty("POST", "/api/v1/documents/generate").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(response).await["error"]["code"], "RENDER_ERROR");
        assert!(!h.output("CV_Mario_Rossi_it.docx").exists());
    }

    #[tokio::test]
    async fn test_generate_failure_is_one_message() {
        let h = Harness::new();
        std::fs::remove_dir_all(&h.state.config.output_dir).unwrap();

        let response = h.empty("POST", "/api/v1/documents/generate").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json(response).await;
        assert_eq!(body["error"]["code"], "RENDER_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Error generating CV:"));
        assert!(h.dir.path().exists());
    }
}
