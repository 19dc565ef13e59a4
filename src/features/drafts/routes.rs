use std::sync::Arc;

use axum::{routing::put, Router};

use crate::features::drafts::handlers;
use crate::features::drafts::services::DraftService;

/// Create routes for the drafts feature
///
/// Note: This feature requires authentication
pub fn routes(service: Arc<DraftService>) -> Router {
    Router::new()
        .route(
            "/api/drafts/report",
            put(handlers::save_report_draft)
                .get(handlers::load_report_draft)
                .delete(handlers::clear_report_draft),
        )
        .route(
            "/api/drafts/tasks/{ticket_id}",
            put(handlers::save_task_draft)
                .get(handlers::load_task_draft)
                .delete(handlers::clear_task_draft),
        )
        .with_state(service)
}
