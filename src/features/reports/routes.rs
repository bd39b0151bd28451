use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch},
    Router,
};

use crate::features::reports::handlers::{self, ReportState};

/// Multipart framing on top of the photo itself
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Public report routes: intake and the verified view
pub fn public_routes(state: ReportState, max_photo_size: usize) -> Router {
    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::submit_report).layer(
                DefaultBodyLimit::max(max_photo_size.saturating_add(MULTIPART_OVERHEAD)),
            ),
        )
        .route("/api/reports/categories", get(handlers::list_categories))
        .route("/api/reports/{id}", get(handlers::get_report))
        .with_state(state)
}

/// Moderation routes (require auth middleware to be applied by caller)
pub fn admin_routes(state: ReportState) -> Router {
    Router::new()
        .route("/api/reports/admin/all", get(handlers::admin_list_reports))
        .route("/api/reports/admin/stats", get(handlers::admin_report_stats))
        .route(
            "/api/reports/admin/{id}/status",
            patch(handlers::update_report_status),
        )
        .route(
            "/api/reports/admin/{id}",
            axum::routing::delete(handlers::delete_report),
        )
        .with_state(state)
}
