//! Tests for the API endpoints

use crate::api::app;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use pretty_assertions::assert_eq;
use tower::ServiceExt;

const BOUNDARY: &str = "pagetint-test-boundary";

/// Build a multipart POST to /api/analyze with one form field.
fn multipart_request(query: &str, field_name: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"test.pdf\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let uri = if query.is_empty() {
        "/api/analyze".to_string()
    } else {
        format!("/api/analyze?{query}")
    };

    Request::builder()
        .uri(uri)
        .method("POST")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn error_message(response: axum::response::Response) -> String {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    json["error"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "pagetint API");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_analyze_without_file_field_is_rejected() {
    let response = app()
        .oneshot(multipart_request("", "attachment", b"whatever"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = error_message(response).await;
    assert!(message.contains("no file provided"));
}

#[tokio::test]
async fn test_analyze_empty_file_is_rejected() {
    let response = app()
        .oneshot(multipart_request("", "file", b""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = error_message(response).await;
    assert!(message.contains("empty"));
}

#[tokio::test]
async fn test_analyze_rejects_out_of_range_threshold() {
    let response = app()
        .oneshot(multipart_request(
            "color_threshold=120",
            "file",
            b"%PDF-1.7 fake",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = error_message(response).await;
    assert!(message.contains("color threshold"));
}

#[tokio::test]
async fn test_analyze_rejects_misordered_thresholds() {
    let response = app()
        .oneshot(multipart_request(
            "color_threshold=40&photo_threshold=10",
            "file",
            b"%PDF-1.7 fake",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = error_message(response).await;
    assert!(message.contains("photo threshold"));
}

#[tokio::test]
async fn test_analyze_rejects_bad_scale() {
    let response = app()
        .oneshot(multipart_request("scale=0", "file", b"%PDF-1.7 fake"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = error_message(response).await;
    assert!(message.contains("downsample"));
}

#[tokio::test]
async fn test_analyze_unreadable_document_is_unprocessable() {
    // Not a PDF; fails at open (or at rasterizer binding when PDFium is
    // absent), which surfaces as a document error either way.
    let response = app()
        .oneshot(multipart_request("", "file", b"definitely not a pdf"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
