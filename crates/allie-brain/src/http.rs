use std::sync::Arc;

use allie_core::error::{AllieError, ErrorKind, Result};
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::brain::{Brain, DeleteRequest, SmartRequest};

/// Uploads larger than this are rejected before reaching a handler.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

type AppState = Arc<Brain>;

/// A failed request, rendered as `{ ok: false, kind, error }`.
#[derive(Debug)]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::BadRequest,
            message: message.into(),
        }
    }

    /// Bad requests keep their own message. Anything else is logged and the
    /// caller sees `public_message` only.
    fn from_error(err: AllieError, public_message: &str) -> Self {
        match err {
            AllieError::BadRequest(message) => Self::bad_request(message),
            other => {
                tracing::error!(error = %other, "request failed");
                Self {
                    kind: other.kind(),
                    message: public_message.to_string(),
                }
            }
        }
    }

    fn status(&self) -> StatusCode {
        match self.kind {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Upstream | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "ok": false,
            "kind": self.kind.as_str(),
            "error": self.message,
        });
        (self.status(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(status = %rejection.status(), error = %rejection.body_text(), "rejected json body");
        Self::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "rejected multipart upload");
        Self::bad_request("No audio file uploaded")
    }
}

trait OrApiError<T> {
    fn or_api_error(self, public_message: &str) -> std::result::Result<T, ApiError>;
}

impl<T> OrApiError<T> for Result<T> {
    fn or_api_error(self, public_message: &str) -> std::result::Result<T, ApiError> {
        self.map_err(|e| ApiError::from_error(e, public_message))
    }
}

type ApiResult = std::result::Result<Json<serde_json::Value>, ApiError>;

async fn smart(
    State(brain): State<AppState>,
    body: std::result::Result<Json<SmartRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = body?;
    let result = brain.handle_smart(request).await.or_api_error("Smart AI failed")?;
    Ok(Json(json!({ "ok": true, "result": result })))
}

async fn transcribe(
    State(brain): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> ApiResult {
    let mut multipart = multipart?;
    let mut audio = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "malformed multipart upload");
                return Err(ApiError::bad_request("No audio file uploaded"));
            }
        };
        if field.name() != Some("file") {
            continue;
        }
        match field.bytes().await {
            Ok(bytes) => {
                audio = Some(bytes);
                break;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read uploaded file");
                return Err(ApiError::bad_request("No audio file uploaded"));
            }
        }
    }

    let audio = audio
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| ApiError::bad_request("No audio file uploaded"))?;
    let text = brain
        .transcribe(&audio)
        .await
        .or_api_error("Failed to transcribe audio")?;
    Ok(Json(json!({ "ok": true, "text": text })))
}

#[derive(Debug, Default, Deserialize)]
struct PromptBody {
    #[serde(default)]
    prompt: Option<String>,
}

async fn schedule(
    State(brain): State<AppState>,
    body: std::result::Result<Json<PromptBody>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body?;
    let message = brain
        .handle_schedule(body.prompt)
        .await
        .or_api_error("Internal server error")?;
    Ok(Json(json!({ "ok": true, "message": message })))
}

async fn schedule_delete(
    State(brain): State<AppState>,
    body: std::result::Result<Json<DeleteRequest>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body?;
    let message = brain
        .handle_schedule_delete(body)
        .await
        .or_api_error("Internal server error")?;
    Ok(Json(json!({ "ok": true, "message": message })))
}

async fn generate(
    State(brain): State<AppState>,
    body: std::result::Result<Json<PromptBody>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body?;
    let prompt = body
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Prompt is required"))?;
    let result = brain.generate(&prompt).await.or_api_error("Something went wrong")?;
    Ok(Json(json!({ "ok": true, "result": result })))
}

async fn weather_by_path(State(brain): State<AppState>, Path(city): Path<String>) -> ApiResult {
    let result = brain.weather_reply(&city).await;
    Ok(Json(json!({ "ok": true, "result": result })))
}

#[derive(Debug, Default, Deserialize)]
struct CityBody {
    #[serde(default)]
    city: Option<String>,
}

async fn weather_by_body(
    State(brain): State<AppState>,
    body: std::result::Result<Json<CityBody>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body?;
    let city = body
        .city
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("City is required"))?;
    let result = brain.weather_reply(city.trim()).await;
    Ok(Json(json!({ "ok": true, "result": result })))
}

async fn health() -> &'static str {
    "ok"
}

/// Build the full route table.
pub fn router(brain: AppState) -> Router {
    Router::new()
        .route("/api/smart", post(smart))
        .route(
            "/api/transcribe",
            post(transcribe).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/schedule", post(schedule))
        .route("/api/schedule/delete", post(schedule_delete))
        .route("/api/generate", post(generate))
        .route("/api/weather", post(weather_by_body))
        .route("/api/weather/{city}", get(weather_by_path))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(brain)
}

/// Bind `0.0.0.0:{port}` and serve until the process exits.
pub async fn serve(brain: AppState, port: u16) -> Result<()> {
    let app = router(brain);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .map_err(|e| AllieError::Config(format!("failed to bind port {port}: {e}")))?;
    tracing::info!(port, "server listening");

    axum::serve(listener, app)
        .await
        .map_err(AllieError::Io)?;
    Ok(())
}
