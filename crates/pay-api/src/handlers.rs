//! # Request Handlers
//!
//! JSON handlers under `/api`. The Adyen handlers are thin: the relay does the
//! validation, defaults, provider call and logging; handlers map its errors to HTTP.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use pay_core::{ApiLogEntry, PaymentError};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

/// Name reported by the health check
pub const SERVICE_NAME: &str = "dropin-checkout";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn payment_error_to_response(err: PaymentError) -> ApiError {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(err.to_string())))
}

/// JSON body extractor whose rejections use the `{"error": ...}` shape
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err((
                rejection.status(),
                Json(ErrorResponse::new(rejection.body_text())),
            )),
        }
    }
}

/// Sample item served by `/api/items`
#[derive(Debug, Clone, Serialize)]
pub struct SampleItem {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
}

pub const SAMPLE_ITEMS: [SampleItem; 3] = [
    SampleItem {
        id: 1,
        name: "Item Alpha",
        description: "First sample item",
    },
    SampleItem {
        id: 2,
        name: "Item Beta",
        description: "Second sample item",
    },
    SampleItem {
        id: 3,
        name: "Item Gamma",
        description: "Third sample item",
    },
];

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<ApiLogEntry>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": SERVICE_NAME
    }))
}

/// Static sample list
pub async fn list_items() -> impl IntoResponse {
    Json(serde_json::json!({
        "items": SAMPLE_ITEMS,
        "count": SAMPLE_ITEMS.len()
    }))
}

/// Payment methods for the Drop-in, given amount and country
#[instrument(skip(state, body))]
pub async fn adyen_payment_methods(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<Value>, ApiError> {
    state
        .relay
        .payment_methods(body)
        .await
        .map(Json)
        .map_err(payment_error_to_response)
}

/// Submit the Drop-in payment payload
#[instrument(skip(state, headers, payload))]
pub async fn adyen_payments(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<Value>, ApiError> {
    let return_url = state.checkout_urls(&headers).return_url();

    state
        .relay
        .payments(payload, &return_url)
        .await
        .map(Json)
        .map_err(payment_error_to_response)
}

/// Submit redirect / 3-D Secure details
#[instrument(skip(state, payload))]
pub async fn adyen_payments_details(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<Value>, ApiError> {
    state
        .relay
        .payments_details(payload)
        .await
        .map(Json)
        .map_err(payment_error_to_response)
}

/// Recent provider calls, oldest first
pub async fn adyen_logs(State(state): State<AppState>) -> Json<LogsResponse> {
    Json(LogsResponse {
        logs: state.logs().list(),
    })
}
