// 🌐 REST API - boundary validation and dashboard summaries over HTTP
//
// Bodies are read as raw text and pushed through `codec`, so malformed
// JSON and unknown variants answer 400 while contract violations answer
// 422 with every violation listed.

use crate::codec::{self, ContractError};
use crate::config::ContractConfig;
use crate::schema::{ContractValidator, ValidationError};
use crate::stats::dashboard_summary;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    validator: Arc<ContractValidator>,
}

impl AppState {
    pub fn new(config: ContractConfig) -> Self {
        AppState {
            validator: Arc::new(ContractValidator::with_config(config)),
        }
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<ValidationError>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: Vec::new(),
        }
    }

    fn failure(error: String, details: Vec<ValidationError>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            details,
        }
    }
}

fn respond<T: Serialize>(result: Result<T, ContractError>) -> Response {
    match result {
        Ok(value) => (StatusCode::OK, Json(ApiResponse::ok(value))).into_response(),
        Err(err) => {
            let status = match err {
                ContractError::Decode { .. } => StatusCode::BAD_REQUEST,
                ContractError::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let message = err.to_string();
            let details = match err {
                ContractError::Invalid { errors, .. } => errors,
                _ => Vec::new(),
            };
            (status, Json(ApiResponse::<()>::failure(message, details))).into_response()
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// POST /api/validate/batch
async fn validate_batch(State(state): State<AppState>, body: String) -> Response {
    respond(codec::decode_batch(&state.validator, &body))
}

/// POST /api/validate/classification
async fn validate_classification(State(state): State<AppState>, body: String) -> Response {
    respond(codec::decode_classification(&state.validator, &body))
}

/// POST /api/validate/batch-with-records
async fn validate_batch_with_records(State(state): State<AppState>, body: String) -> Response {
    respond(codec::decode_batch_with_records(&state.validator, &body))
}

/// POST /api/validate/activity
async fn validate_activity(State(state): State<AppState>, body: String) -> Response {
    respond(codec::decode_activity(&state.validator, &body))
}

/// POST /api/validate/categories - a full breakdown
async fn validate_categories(State(state): State<AppState>, body: String) -> Response {
    respond(codec::decode_categories(&state.validator, &body))
}

/// POST /api/validate/stats
async fn validate_stats(State(state): State<AppState>, body: String) -> Response {
    respond(codec::decode_stats(&state.validator, &body))
}

/// POST /api/summary - stats, breakdown and activity from a snapshot
async fn summary(State(state): State<AppState>, body: String) -> Response {
    let result = codec::decode_snapshot(&state.validator, &body).map(|snapshot| {
        dashboard_summary(
            &snapshot.batches,
            &snapshot.classifications,
            state.validator.config(),
            chrono::Utc::now(),
        )
    });
    respond(result)
}

// ============================================================================
// Router
// ============================================================================

pub fn router(config: ContractConfig) -> Router {
    let state = AppState::new(config);

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/validate/batch", post(validate_batch))
        .route("/validate/classification", post(validate_classification))
        .route("/validate/batch-with-records", post(validate_batch_with_records))
        .route("/validate/activity", post(validate_activity))
        .route("/validate/categories", post(validate_categories))
        .route("/validate/stats", post(validate_stats))
        .route("/summary", post(summary))
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}

// ============================================================================
// TESTS
// ============================================================================
