//! HTTP boundary: `POST /api/generate` plus provider listing and health.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::error;

use crate::core::catalog::{self, PRESET_PROMPTS, ProviderInfo};
use crate::core::config::GenerationConfig;
use crate::core::dispatcher::Dispatcher;
use crate::core::error::DispatchError;
use crate::core::generation::{GenerationRequest, GenerationResult};
use crate::providers::ProviderId;

pub struct AppState {
    pub dispatcher: Dispatcher,
    pub defaults: GenerationConfig,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/providers", get(list_providers))
        .route("/api/generate", post(generate))
        .with_state(state)
}

/// JSON body of `POST /api/generate`.
///
/// `prompt` and `provider` are kept loosely typed: a prompt that is not a
/// string reads as empty (and fails validation), a provider that is not a
/// string reads as absent (and selects the default provider).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    pub prompt: Option<Value>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<i64>,
    pub provider: Option<Value>,
}

impl GenerateBody {
    /// Parse a request body regardless of its declared content type.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ApiError> {
        serde_json::from_slice(bytes).map_err(|err| ApiError::Body(err.to_string()))
    }

    pub fn into_request(self, defaults: &GenerationConfig) -> GenerationRequest {
        GenerationRequest {
            prompt: string_field(self.prompt).unwrap_or_default(),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            provider: string_field(self.provider),
        }
    }
}

fn string_field(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) => Some(text),
        _ => None,
    }
}

/// Failure as seen by HTTP clients: a status and `{ "error": ... }`.
#[derive(Debug)]
pub enum ApiError {
    Dispatch(DispatchError),
    /// Body could not be read as a generate request
    Body(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Dispatch(DispatchError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Dispatch(DispatchError::Auth(_)) => StatusCode::UNAUTHORIZED,
            ApiError::Dispatch(DispatchError::RateLimit(_)) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Dispatch(DispatchError::Generation(_)) | ApiError::Body(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Dispatch(err) => err.user_message(),
            ApiError::Body(message) => {
                DispatchError::Generation(message.clone()).user_message()
            }
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        ApiError::Dispatch(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

async fn generate(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<GenerationResult>, ApiError> {
    let outcome = match GenerateBody::from_slice(&body) {
        Ok(body) => state
            .dispatcher
            .dispatch(body.into_request(&state.defaults))
            .await
            .map_err(ApiError::from),
        Err(err) => Err(err),
    };

    match outcome {
        Ok(result) => Ok(Json(result)),
        Err(err) => {
            error!(status = err.status().as_u16(), error = ?err, "API error");
            Err(err)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvidersResponse {
    pub default_provider: ProviderId,
    pub providers: Vec<ProviderInfo>,
    pub presets: Vec<&'static str>,
}

async fn list_providers(State(state): State<Arc<AppState>>) -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        default_provider: state.dispatcher.default_provider(),
        providers: catalog::all_providers(),
        presets: PRESET_PROMPTS.to_vec(),
    })
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
