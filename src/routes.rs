use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router<AppState> {
    let system_config = &state.config.system_config;

    Router::new()
        // Health check
        .route("/api/health", get(health_check))
        // Transcript persistence
        .route("/save_transcript", post(save_transcript))
        // Front-end page and assets
        .fallback_service(ServeDir::new(&system_config.static_dir))
}

#[derive(Debug, Deserialize)]
pub struct SaveTranscriptRequest {
    #[serde(default)]
    transcript: String,
    #[serde(default = "default_language")]
    language: String,
    #[serde(default)]
    timestamp: String,
}

fn default_language() -> String {
    "en-US".to_string()
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Persistence failures are reported only through the `success` field; the
/// response status stays 200 either way.
async fn save_transcript(
    State(state): State<AppState>,
    Json(request): Json<SaveTranscriptRequest>,
) -> Json<Value> {
    let success = match state.transcripts.save(
        &request.transcript,
        &request.language,
        &request.timestamp,
    ) {
        Ok(path) => {
            info!("Saved transcript to {}", path.display());
            true
        }
        Err(err) => {
            error!("Error saving transcript: {}", err);
            false
        }
    };

    Json(json!({ "success": success }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::transcripts::TranscriptStore;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::tempdir;
    use tower::ServiceExt;

    fn test_app(roots: Vec<PathBuf>) -> Router {
        let state = AppState {
            config: Config::default(),
            transcripts: Arc::new(TranscriptStore::with_roots(roots)),
        };
        create_routes(state.clone()).with_state(state)
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/save_transcript")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(res: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn save_transcript_writes_file_and_reports_success() {
        let dir = tempdir().unwrap();
        let app = test_app(vec![dir.path().to_path_buf()]);

        let res = app
            .oneshot(post_json(
                r#"{"transcript":"hello world","language":"en-US","timestamp":"20240101_120000"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = response_json(res).await;
        assert_eq!(body, json!({ "success": true }));

        let saved = dir.path().join("transcript_20240101_120000_en-US.txt");
        assert_eq!(std::fs::read_to_string(saved).unwrap(), "hello world");
    }

    #[tokio::test]
    async fn missing_fields_default_to_empty_transcript() {
        let dir = tempdir().unwrap();
        let app = test_app(vec![dir.path().to_path_buf()]);

        let res = app.oneshot(post_json("{}")).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = response_json(res).await;
        assert_eq!(body, json!({ "success": true }));

        // One file, empty content, default language, generated timestamp.
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 1);

        let name = entries[0].file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("transcript_"));
        assert!(name.ends_with("_en-US.txt"));
        assert_eq!(std::fs::read_to_string(&entries[0]).unwrap(), "");
    }

    #[tokio::test]
    async fn persistence_failure_reports_success_false() {
        let dir = tempdir().unwrap();

        // Both candidate roots sit under a regular file, so neither can be
        // created.
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, "not a directory").unwrap();
        let app = test_app(vec![blocked.join("first"), blocked.join("second")]);

        let res = app
            .oneshot(post_json(r#"{"transcript":"lost"}"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = response_json(res).await;
        assert_eq!(body, json!({ "success": false }));
    }

    #[tokio::test]
    async fn traversal_in_language_is_rejected() {
        let dir = tempdir().unwrap();
        let app = test_app(vec![dir.path().to_path_buf()]);

        let res = app
            .oneshot(post_json(
                r#"{"transcript":"x","language":"../../etc","timestamp":"20240101_120000"}"#,
            ))
            .await
            .unwrap();

        let body = response_json(res).await;
        assert_eq!(body, json!({ "success": false }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn health_check_reports_ok() {
        let dir = tempdir().unwrap();
        let app = test_app(vec![dir.path().to_path_buf()]);

        let res = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = response_json(res).await;
        assert_eq!(body, json!({ "status": "ok" }));
    }
}
