use crate::features::auth::handlers::{self, AuthState};
use axum::{
    routing::{get, post},
    Router,
};

/// Public auth routes (no authentication required)
pub fn public_routes(state: AuthState) -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .with_state(state)
}

/// Protected auth routes (require JWT authentication)
pub fn protected_routes(state: AuthState) -> Router {
    Router::new()
        .route("/api/auth/me", get(handlers::get_me))
        .with_state(state)
}
