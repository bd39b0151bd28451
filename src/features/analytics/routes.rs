use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::analytics::handlers;
use crate::features::analytics::services::AnalyticsService;

/// Public analytics routes
pub fn routes(service: Arc<AnalyticsService>) -> Router {
    Router::new()
        .route("/api/analytics/summary", get(handlers::get_summary))
        .with_state(service)
}
