//! Router-level API tests.
//!
//! These exercise the endpoints that do not require the external tools
//! to be installed on the host.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use vcut_api::{create_router, ApiConfig, AppState};

async fn test_app() -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    let config = ApiConfig {
        temp_dir: dir.path().to_string_lossy().to_string(),
        ..ApiConfig::default()
    };
    let state = AppState::new(config).await.unwrap();
    (dir, create_router(state))
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn multipart_request(uri: &str, filename: &str, contents: &[u8]) -> Request<Body> {
    multipart_request_with_fields(uri, filename, contents, &[])
}

fn multipart_request_with_fields(
    uri: &str,
    filename: &str,
    contents: &[u8],
    fields: &[(&str, &str)],
) -> Request<Body> {
    let boundary = "testboundary7MA4YWxkTrZu0gW";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    for (name, value) in fields {
        body.extend_from_slice(format!("\r\n--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
    }
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

fn scratch_file_count(dir: &TempDir) -> usize {
    std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .count()
}

#[tokio::test]
async fn test_liveness_endpoint() {
    let (_dir, app) = test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["message"].as_str().unwrap().contains("running"));
}

#[tokio::test]
async fn test_status_of_unknown_file() {
    let (_dir, app) = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/status/output_missing.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["ready"], false);
    assert_eq!(json["exists"], false);
    assert_eq!(json["size"], 0);
    assert_eq!(json["filename"], "output_missing.mp4");
}

#[tokio::test]
async fn test_status_of_existing_file() {
    let (dir, app) = test_app().await;
    std::fs::write(dir.path().join("output_ready.mp4"), b"videobytes").unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/status/output_ready.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = json_body(response).await;
    assert_eq!(json["ready"], true);
    assert_eq!(json["exists"], true);
    assert_eq!(json["size"], 10);
}

#[tokio::test]
async fn test_video_download_and_not_found() {
    let (dir, app) = test_app().await;
    std::fs::write(dir.path().join("output_done.mp4"), b"videobytes").unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/video/output_done.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "video/mp4"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"videobytes");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/video/output_other.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_silence_json_roundtrip() {
    let (dir, app) = test_app().await;
    std::fs::write(dir.path().join("json_meta.json"), br#"{"cuts":[]}"#).unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/silencio/json_meta.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], br#"{"cuts":[]}"#);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/silencio/json_absent.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_purge_all_then_status_reports_missing() {
    let (dir, app) = test_app().await;
    std::fs::write(dir.path().join("output_result.mp4"), b"keepme").unwrap();
    std::fs::write(dir.path().join("video_scratch.mp4"), b"scratch").unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/limpar-todos")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["removed"], 2);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/status/output_result.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["exists"], false);
}

#[tokio::test]
async fn test_clear_scratch_sweeps_unmarked_files() {
    let (dir, app) = test_app().await;
    // Files written behind the store's back are scratch: nothing marked
    // them as results, so a manual sweep removes them.
    std::fs::write(dir.path().join("video_old.mp4"), b"scratch").unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/limpar-temporarios")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["removed"], 1);
    assert!(!dir.path().join("video_old.mp4").exists());
}

#[tokio::test]
async fn test_progress_placeholders_by_prefix() {
    let (_dir, app) = test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/progress/preview-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["progress"], 50);
    assert_eq!(json["status"], "processing");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/progress/cut-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["progress"], 90);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/progress/unknown-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["progress"], 0);
    assert_eq!(json["status"], "pending");
}

#[tokio::test]
async fn test_extract_audio_rejects_non_video_extension() {
    let (_dir, app) = test_app().await;

    let response = app
        .oneshot(multipart_request("/extrair-audio", "notes.txt", b"hello"))
        .await
        .unwrap();

    // Rejected on extension alone, regardless of content or host tools.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["detail"].as_str().unwrap().contains("video"));
}

#[tokio::test]
async fn test_cut_requires_threshold() {
    let (_dir, app) = test_app().await;

    let response = app
        .oneshot(multipart_request("/cortar", "clip.mp4", b"fakevideo"))
        .await
        .unwrap();

    // Either auto-editor is absent (500) or the missing threshold is
    // rejected (400); never a success without a threshold.
    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_failed_cut_leaves_no_scratch_files() {
    let (dir, app) = test_app().await;

    // Garbage bytes are never a decodable video, so the request fails
    // on every host: before any write when auto-editor is absent, after
    // the write when auto-editor rejects the input.
    let response = app
        .oneshot(multipart_request_with_fields(
            "/cortar",
            "clip.mp4",
            b"not a real video",
            &[("threshold", "4")],
        ))
        .await
        .unwrap();
    assert!(!response.status().is_success());

    // Whichever way it failed, the scratch input was removed before the
    // response was produced, not on some detached task later.
    assert_eq!(scratch_file_count(&dir), 0);
}

#[tokio::test]
async fn test_failed_preview_leaves_no_scratch_files() {
    let (dir, app) = test_app().await;

    let response = app
        .oneshot(multipart_request_with_fields(
            "/preview",
            "clip.mp4",
            b"not a real video",
            &[("threshold", "4")],
        ))
        .await
        .unwrap();
    assert!(!response.status().is_success());
    assert_eq!(scratch_file_count(&dir), 0);
}
