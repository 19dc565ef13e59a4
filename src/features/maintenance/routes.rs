use axum::{
    routing::{get, post},
    Router,
};

use crate::features::maintenance::handlers::{self, MaintenanceState};

/// Create routes for the maintenance feature
///
/// Note: This feature requires authentication
pub fn routes(state: MaintenanceState) -> Router {
    Router::new()
        .route("/api/reports/{id}/assign", post(handlers::assign_technician))
        .route("/api/maintenance/tasks", get(handlers::list_my_tasks))
        .route("/api/maintenance/tasks/{id}", get(handlers::get_task))
        .route(
            "/api/maintenance/tasks/{id}/complete",
            post(handlers::complete_task),
        )
        .route(
            "/api/maintenance/tasks/{id}/verify",
            post(handlers::verify_task),
        )
        .with_state(state)
}
