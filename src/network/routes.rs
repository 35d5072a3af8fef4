use std::path::PathBuf;

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, Query, State,
        multipart::MultipartRejection,
        rejection::QueryRejection,
    },
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower::{ServiceExt, limit::ConcurrencyLimit};
use tracing::info;

use super::{api_error::ApiError, upload};
use crate::color::{ClassifyRequest, ColorClassificationService, ColorClassifier, ColorReport};

/// Shared by every handler; cloning is cheap and clones share the concurrency permits.
#[derive(Clone)]
pub struct AppState {
    classifier: ConcurrencyLimit<ColorClassificationService>,
}

impl AppState {
    pub fn new(classifier: ColorClassifier, max_concurrent: usize) -> Self {
        Self {
            classifier: ColorClassificationService::limited(classifier, max_concurrent),
        }
    }

    async fn classify(self, request: ClassifyRequest) -> Result<ColorReport, ApiError> {
        Ok(self.classifier.oneshot(request).await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    pub image_path: PathBuf,
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(root))
        .route(
            "/detect-color",
            post(detect_color).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/detect-color-from-path", get(detect_color_from_path))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Color Detection API",
        "status": "active",
    }))
}

async fn detect_color(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ColorReport>, ApiError> {
    let mut multipart = multipart?;
    let (filename, bytes) = upload::read_upload(&mut multipart).await?;
    info!("Detecting color for upload '{}'", filename);

    let report = state.classify(ClassifyRequest::upload(filename, bytes)).await?;
    Ok(Json(report))
}

async fn detect_color_from_path(
    State(state): State<AppState>,
    query: Result<Query<PathQuery>, QueryRejection>,
) -> Result<Json<ColorReport>, ApiError> {
    let Query(query) = query?;
    info!("Detecting color for {}", query.image_path.display());

    let report = state.classify(ClassifyRequest::path(query.image_path)).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::classifier::tests::{encode, solid_png, transparent_gif};
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use image::{DynamicImage, GrayImage, ImageFormat, Luma};

    const BOUNDARY: &str = "drishti-test-boundary";

    fn app() -> Router {
        app_with_limit(1024 * 1024)
    }

    fn app_with_limit(max_upload_bytes: usize) -> Router {
        router(AppState::new(ColorClassifier::default(), 4), max_upload_bytes)
    }

    fn multipart_body(field: &str, filename: Option<&str>, content: &[u8]) -> Vec<u8> {
        let disposition = match filename {
            Some(filename) => {
                format!("form-data; name=\"{field}\"; filename=\"{filename}\"")
            }
            None => format!("form-data; name=\"{field}\""),
        };
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(filename: Option<&str>, content: &[u8]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/detect-color")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body("file", filename, content)))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_reports_status() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "active");
        assert_eq!(body["message"], "Welcome to the Color Detection API");
    }

    #[tokio::test]
    async fn upload_returns_color_report() {
        let response = app()
            .oneshot(upload_request(Some("red.PNG"), &solid_png(30, 30, [255, 0, 0])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["rgb"], json!({"r": 255, "g": 0, "b": 0}));
        assert_eq!(body["color_name"], "red");
        assert_eq!(body["hex_code"], "#ff0000");
        assert_eq!(body["hsi"]["s"], 1.0);
        assert_eq!(body["hsi"]["i"], 0.5);
    }

    #[tokio::test]
    async fn unsupported_extension_is_rejected() {
        let response = app()
            .oneshot(upload_request(Some("notes.txt"), b"hello"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["detail"], "Unsupported file format");
    }

    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let response = app()
            .oneshot(upload_request(Some("empty.png"), b""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["detail"], "Empty file");
    }

    #[tokio::test]
    async fn missing_file_field_is_rejected() {
        let response = app()
            .oneshot(upload_request(None, b"just text"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["detail"], "No file uploaded");
    }

    #[tokio::test]
    async fn undecodable_upload_is_a_server_error() {
        let response = app()
            .oneshot(upload_request(Some("broken.jpg"), b"not really a jpeg"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = json_body(response).await["detail"].as_str().unwrap().to_owned();
        assert!(detail.starts_with("Error processing image: "), "{detail}");
    }

    #[tokio::test]
    async fn grayscale_upload_has_no_processable_pixels() {
        let bytes = encode(
            DynamicImage::ImageLuma8(GrayImage::from_pixel(1, 1, Luma([0]))),
            ImageFormat::Png,
        );
        let response = app()
            .oneshot(upload_request(Some("gray.png"), &bytes))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await["detail"],
            "Error processing image: Could not process image pixels"
        );
    }

    #[tokio::test]
    async fn gif_upload_has_no_processable_pixels() {
        let response = app()
            .oneshot(upload_request(Some("pixel.gif"), &transparent_gif()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await["detail"],
            "Error processing image: Could not process image pixels"
        );
    }

    #[tokio::test]
    async fn oversized_upload_is_payload_too_large() {
        let response = app_with_limit(1000)
            .oneshot(upload_request(Some("big.png"), &[7u8; 5000]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let detail = json_body(response).await["detail"].as_str().unwrap().to_owned();
        assert!(detail.starts_with("Invalid multipart body: "), "{detail}");
    }

    #[tokio::test]
    async fn non_multipart_upload_gets_json_detail() {
        let request = Request::builder()
            .method("POST")
            .uri("/detect-color")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let detail = json_body(response).await["detail"].as_str().unwrap().to_owned();
        assert!(detail.starts_with("Invalid multipart body: "), "{detail}");
    }

    #[tokio::test]
    async fn path_lookup_without_query_gets_json_detail() {
        let response = app()
            .oneshot(
                Request::get("/detect-color-from-path")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let detail = json_body(response).await["detail"].as_str().unwrap().to_owned();
        assert!(detail.contains("image_path"), "{detail}");
    }

    #[tokio::test]
    async fn path_lookup_returns_color_report() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("cyan.png");
        std::fs::write(&path, solid_png(12, 12, [0, 255, 255])).expect("Failed to write image");

        let uri = format!("/detect-color-from-path?image_path={}", path.display());
        let response = app()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["color_name"], "cyan");
        assert_eq!(body["hex_code"], "#00ffff");
    }

    #[tokio::test]
    async fn path_lookup_of_missing_file_is_not_found() {
        let response = app()
            .oneshot(
                Request::get("/detect-color-from-path?image_path=/no/such/file.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await["detail"],
            "Image not found at /no/such/file.png"
        );
    }
}
