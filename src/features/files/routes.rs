use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::features::files::handlers;
use crate::features::files::services::FileService;

/// Body limit above MAX_FILE_SIZE to account for multipart overhead
const UPLOAD_BODY_LIMIT: usize = 6 * 1024 * 1024;

/// Create routes for the files feature
///
/// Note: This feature requires authentication
pub fn routes(service: Arc<FileService>) -> Router {
    Router::new()
        .route(
            "/api/files/upload",
            post(handlers::upload_file).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .with_state(service)
}
