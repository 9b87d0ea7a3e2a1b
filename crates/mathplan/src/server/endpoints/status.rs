use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use crate::types::AppState;

/// GET /health
///
/// Reports that the server is up and how many majors its catalog holds.
pub async fn get_health(State(s): State<Arc<AppState>>) -> Response {
    debug!("GET /health");

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "majors": s.processor.catalog().len(),
            "uptime_secs": (Utc::now() - s.started_at).num_seconds(),
        })),
    )
        .into_response()
}
