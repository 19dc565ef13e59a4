use axum::{
    routing::{get, post},
    Router,
};

use crate::features::reports::handlers::{self, ReportState};

/// Create routes for the reports feature
///
/// Note: This feature requires authentication
pub fn routes(state: ReportState) -> Router {
    Router::new()
        .route(
            "/api/reports",
            post(handlers::create_report).get(handlers::list_reports),
        )
        .route("/api/reports/mine", get(handlers::list_my_reports))
        .route("/api/reports/{id}", get(handlers::get_report))
        .with_state(state)
}
