use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::server::endpoints::{math_plan, status};
use crate::types::AppState;

mod endpoints;
mod types;

pub use types::ApiErrorType;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let math_plan_router = Router::new()
        .route("/math_plan", post(math_plan::post_math_plan))
        // Cache management endpoints
        .route("/math_plan/cache_stats", get(math_plan::get_cache_stats))
        .route(
            "/math_plan/invalidate_cache",
            post(math_plan::post_invalidate_cache),
        );

    Router::new()
        .route("/health", get(status::get_health))
        .route("/majors", get(math_plan::get_majors))
        .merge(math_plan_router)
        .with_state(app_state)
}
