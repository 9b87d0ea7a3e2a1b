//! API endpoints for math placement planning.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::math_plan::{MathPlanError, MajorRequirement, PlanRequest, StudentKey};
use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// Query parameters for plan endpoints.
#[derive(Debug, Deserialize)]
pub struct PlanQueryParams {
    /// If true, bypass cache and recompute
    #[serde(default)]
    pub refresh: bool,
}

/// Body of `POST /math_plan/invalidate_cache`. Without a student id the whole cache is cleared.
#[derive(Debug, Default, Deserialize)]
pub struct InvalidateRequest {
    #[serde(default)]
    pub student_id: Option<String>,
}

/// One entry of `GET /majors`.
#[derive(Debug, Serialize)]
pub struct MajorListing<'a> {
    pub id: u32,
    pub question_numbers: &'a [u32],
    pub program_codes: &'a [String],
    pub name: &'a str,
    pub college: &'a str,
    pub requirement: MajorRequirement,
}

/// Converts MathPlanError to API response.
fn plan_error_to_response(error: MathPlanError) -> Response {
    let (status, message) = match &error {
        MathPlanError::UnknownMajor { .. } => (StatusCode::NOT_FOUND, "Unknown major"),
        MathPlanError::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "Invalid plan request"),
        MathPlanError::CatalogIo { .. }
        | MathPlanError::CatalogParse { .. }
        | MathPlanError::DuplicateMajor { .. }
        | MathPlanError::EmptyCatalog => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Major catalog unavailable")
        }
    };

    ApiErrorType::from((status, message, Some(error.to_string()))).into_response()
}

/// GET /majors
///
/// Lists every major in the catalog.
pub async fn get_majors(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /majors");

    let majors: Vec<MajorListing> = s
        .processor
        .catalog()
        .majors()
        .iter()
        .map(|m| MajorListing {
            id: m.id,
            question_numbers: &m.question_numbers,
            program_codes: &m.program_codes,
            name: &m.name,
            college: &m.college,
            requirement: m.requirement,
        })
        .collect();

    (StatusCode::OK, Json(majors)).into_response()
}

/// POST /math_plan
///
/// Computes requirements, trajectory, and next step for a student.
///
/// Query parameters:
/// - `refresh` (optional): Set to `true` to bypass cache
pub async fn post_math_plan(
    State(s): State<Arc<AppState>>,
    Query(params): Query<PlanQueryParams>,
    Json(request): Json<PlanRequest>,
) -> Response {
    info!(
        "POST /math_plan - {} major(s) (refresh={})",
        request.majors.len(),
        params.refresh
    );

    match s.processor.plan_for_student(&request, params.refresh) {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(e) if e.is_client_error() => {
            warn!("Rejected math plan request: {}", e);
            plan_error_to_response(e)
        }
        Err(e) => {
            error!("Failed to compute math plan: {}", e);
            plan_error_to_response(e)
        }
    }
}

/// GET /math_plan/cache_stats
///
/// Returns cache statistics for monitoring.
pub async fn get_cache_stats(State(s): State<Arc<AppState>>) -> Response {
    (StatusCode::OK, Json(s.processor.cache().stats())).into_response()
}

/// POST /math_plan/invalidate_cache
///
/// Invalidates one student's cached plans, or the whole cache.
pub async fn post_invalidate_cache(
    State(s): State<Arc<AppState>>,
    body: Option<Json<InvalidateRequest>>,
) -> Response {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let cache = s.processor.cache();

    match request.student_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => {
            let key = StudentKey::from_student_id(id);
            let removed = cache.invalidate_student(&key);
            info!("POST /math_plan/invalidate_cache - student {} ({} removed)", key, removed);
            (
                StatusCode::OK,
                Json(json!({ "message": "Student cache invalidated", "removed": removed })),
            )
                .into_response()
        }
        _ => {
            let removed = cache.len();
            cache.clear();
            info!("POST /math_plan/invalidate_cache - all ({} removed)", removed);
            (
                StatusCode::OK,
                Json(json!({ "message": "Cache invalidated", "removed": removed })),
            )
                .into_response()
        }
    }
}
