//! HTTP surface: the form page, its options, and the transform endpoint.
//!
//! | Path             | Method | Description                          |
//! |------------------|--------|--------------------------------------|
//! | `/`              | GET    | Upload form and before/after viewer  |
//! | `/api/options`   | GET    | Styles, palette and defaults         |
//! | `/api/transform` | POST   | Multipart `image`, `style`, `wallColor` |
//! | `/health`        | GET    | Liveness and credential presence     |
//!
//! `/api/transform` always answers with the tagged outcome:
//!
//! ```json
//! { "ok": true, "dataUrl": "data:image/png;base64,...", "mimeType": "image/png",
//!   "downloadName": "visualization-modern-no-change.png" }
//! { "ok": false, "error": "Image too large (max 10MB)." }
//! ```

use std::sync::Arc;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{ErrorKind, Result};
use crate::gateway::{TransformGateway, TransformInput, TransformResult};
use crate::image::ImageFormat;
use crate::renovation::{
    InteriorStyle, Swatch, UploadCandidate, ValidationError, MAX_UPLOAD_BYTES, PALETTE,
};

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    gateway: TransformGateway,
    config: Arc<Config>,
}

impl AppState {
    /// Builds state, and the gateway, from configuration.
    pub fn new(config: Config) -> Self {
        Self {
            gateway: TransformGateway::from_config(&config),
            config: Arc::new(config),
        }
    }

    /// Uses a prepared gateway instead of building one from `config`.
    pub fn with_gateway(config: Config, gateway: TransformGateway) -> Self {
        Self {
            gateway,
            config: Arc::new(config),
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/options", get(options))
        .route("/api/transform", post(transform))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds and serves until Ctrl-C.
pub async fn serve(config: Config) -> Result<()> {
    let addr = config.bind_addr;
    if !config.has_api_key() {
        tracing::warn!("GEMINI_API_KEY is not set; every transformation will fail until it is");
    }

    let app = router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "roomviz listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("roomviz stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    credential_configured: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        credential_configured: state.gateway.is_configured(),
    })
}

#[derive(Debug, Serialize)]
struct StyleOption {
    value: &'static str,
    label: &'static str,
    slug: String,
}

/// Everything the page needs to render its pickers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OptionsResponse {
    styles: Vec<StyleOption>,
    wall_colors: &'static [Swatch],
    default_style: &'static str,
    default_wall_color: String,
    max_upload_bytes: usize,
    accepted_types: Vec<&'static str>,
}

async fn options(State(state): State<AppState>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        styles: InteriorStyle::ALL
            .into_iter()
            .map(|s| StyleOption {
                value: s.as_str(),
                label: s.label(),
                slug: s.slug(),
            })
            .collect(),
        wall_colors: &PALETTE,
        default_style: InteriorStyle::default().as_str(),
        default_wall_color: state.config.default_wall_color.to_string(),
        max_upload_bytes: MAX_UPLOAD_BYTES,
        accepted_types: ImageFormat::ALL.iter().map(|f| f.mime_type()).collect(),
    })
}

/// Tagged outcome delivered to the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResponse {
    /// True when an image is attached.
    pub ok: bool,
    /// Base64 data URI of the generated image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
    /// MIME type of the generated image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Suggested download filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_name: Option<String>,
    /// Human readable failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&TransformResult> for TransformResponse {
    fn from(result: &TransformResult) -> Self {
        match result {
            TransformResult::Success(success) => Self {
                ok: true,
                data_url: Some(success.image.to_data_url()),
                mime_type: Some(success.image.mime_type.clone()),
                download_name: Some(success.download_filename()),
                error: None,
            },
            TransformResult::Failure(failure) => Self {
                ok: false,
                data_url: None,
                mime_type: None,
                download_name: None,
                error: Some(failure.reason.clone()),
            },
        }
    }
}

impl IntoResponse for TransformResult {
    fn into_response(self) -> Response {
        let status = match &self {
            TransformResult::Success(_) => StatusCode::OK,
            TransformResult::Failure(f) => match f.kind {
                ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::Configuration => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
            },
        };
        (status, Json(TransformResponse::from(&self))).into_response()
    }
}

async fn transform(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> TransformResult {
    let input = match multipart {
        Ok(multipart) => read_form(multipart).await,
        Err(rejection) => Err(ValidationError::MalformedForm(rejection.body_text())),
    };
    let input = match input {
        Ok(input) => input,
        Err(e) => {
            tracing::debug!("rejected form submission: {e}");
            return TransformResult::Failure(crate::error::RoomVizError::from(e).into());
        }
    };
    state.gateway.transform_input(input).await
}

/// Collects the `image`, `style` and `wallColor` fields; others are ignored.
async fn read_form(mut multipart: Multipart) -> std::result::Result<TransformInput, ValidationError> {
    let mut input = TransformInput::default();

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let mime = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(form_error)?;
                input.upload = Some(UploadCandidate::new(bytes.to_vec(), mime));
            }
            "style" => input.style = Some(field.text().await.map_err(form_error)?),
            "wallColor" => input.wall_color = Some(field.text().await.map_err(form_error)?),
            _ => {}
        }
    }

    Ok(input)
}

fn form_error(err: MultipartError) -> ValidationError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationError::TooLarge
    } else {
        ValidationError::MalformedForm(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RoomVizError;
    use crate::image::{GeneratedImage, GenerationMetadata};
    use crate::testing::FakeProvider;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const BOUNDARY: &str = "roomviz-test-boundary";

    enum Part<'a> {
        File(&'a str, &'a str, &'a [u8]),
        Text(&'a str, &'a str),
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::File(name, mime, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"room\"\r\n\
                             Content-Type: {mime}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                            .as_bytes(),
                    );
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn transform_request(parts: &[Part<'_>]) -> Request<Body> {
        Request::post("/api/transform")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn ok_image() -> Result<GeneratedImage> {
        Ok(GeneratedImage::new(
            vec![0x89, 0x50, 0x4E, 0x47],
            "image/png",
            GenerationMetadata::default(),
        ))
    }

    fn no_image() -> Result<GeneratedImage> {
        Err(RoomVizError::NoImage)
    }

    fn app_with(fake: Arc<FakeProvider>) -> Router {
        let gateway = TransformGateway::with_provider(fake);
        router(AppState::with_gateway(Config::default(), gateway))
    }

    #[tokio::test]
    async fn test_transform_success() {
        let fake = FakeProvider::new(ok_image);
        let app = app_with(fake.clone());

        let (status, body) = send(
            app,
            transform_request(&[
                Part::File("image", "image/jpeg", &[0xFF; 128]),
                Part::Text("style", "industrial"),
                Part::Text("wallColor", "#FFFFFF"),
            ]),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert!(body["dataUrl"].as_str().unwrap().starts_with("data:image/png;base64,"));
        assert_eq!(body["mimeType"], "image/png");
        assert_eq!(body["downloadName"], "visualization-industrial-FFFFFF.png");
        assert!(body.get("error").is_none());

        let calls = fake.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].prompt.contains("industrial style"));
        assert!(calls[0].prompt.contains("#FFFFFF"));
    }

    #[tokio::test]
    async fn test_transform_rejects_gif() {
        let fake = FakeProvider::new(ok_image);
        let app = app_with(fake.clone());

        let (status, body) = send(
            app,
            transform_request(&[Part::File("image", "image/gif", b"GIF89a")]),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "Unsupported file type: image/gif");
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn test_transform_missing_image() {
        let app = app_with(FakeProvider::new(ok_image));
        let (status, body) = send(app, transform_request(&[Part::Text("style", "boho")])).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "No image uploaded.");
    }

    #[tokio::test]
    async fn test_transform_non_multipart_body() {
        let fake = FakeProvider::new(ok_image);
        let app = app_with(fake.clone());
        let request = Request::post("/api/transform")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"style":"modern"}"#))
            .unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["ok"], false);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid form submission: "));
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn test_transform_oversized_upload() {
        let fake = FakeProvider::new(ok_image);
        let app = app_with(fake.clone());
        let big = vec![0u8; 12 * 1024 * 1024];

        let (status, body) = send(
            app,
            transform_request(&[Part::File("image", "image/png", &big)]),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Image too large (max 10MB).");
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn test_transform_upstream_failure() {
        let app = app_with(FakeProvider::new(no_image));
        let (status, body) = send(
            app,
            transform_request(&[Part::File("image", "image/webp", &[1; 32])]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "Model did not return an image.");
    }

    #[tokio::test]
    async fn test_transform_without_credential() {
        let app = router(AppState::new(Config::default()));
        let (status, body) = send(
            app,
            transform_request(&[Part::File("image", "image/png", &[1; 32])]),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Missing GEMINI_API_KEY env var.");
    }

    #[tokio::test]
    async fn test_options_and_health() {
        let app = app_with(FakeProvider::new(ok_image));

        let (status, body) = send(
            app.clone(),
            Request::get("/api/options").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["styles"].as_array().unwrap().len(), 9);
        assert_eq!(body["styles"][7]["slug"], "mid-century-modern");
        assert_eq!(body["wallColors"][0]["value"], "no-change");
        assert_eq!(body["defaultStyle"], "modern");
        assert_eq!(body["defaultWallColor"], "no-change");
        assert_eq!(body["maxUploadBytes"], MAX_UPLOAD_BYTES);

        let (status, body) = send(app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["credentialConfigured"], true);
    }

    #[tokio::test]
    async fn test_index_page() {
        let app = app_with(FakeProvider::new(ok_image));
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/api/transform"));
    }

    #[test]
    fn test_response_serialization() {
        let failure: TransformResult =
            Err::<crate::gateway::TransformSuccess, _>(RoomVizError::NoImage).into();
        let json = serde_json::to_value(TransformResponse::from(&failure)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"ok": false, "error": "Model did not return an image."})
        );
    }
}
