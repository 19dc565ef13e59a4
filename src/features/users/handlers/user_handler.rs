use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::TechnicianDto;
use crate::features::users::services::UserService;
use crate::shared::types::ApiResponse;

/// List technicians available for assignment
#[utoipa::path(
    get,
    path = "/api/users/technicians",
    responses(
        (status = 200, description = "List of technician accounts", body = ApiResponse<Vec<TechnicianDto>>),
        (status = 401, description = "Not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_technicians(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<Vec<TechnicianDto>>>> {
    if !user.is_admin() {
        return Err(AppError::Unauthorized(
            "Only admins can list technicians".to_string(),
        ));
    }

    let technicians = service.list_technicians().await?;
    Ok(Json(ApiResponse::success(Some(technicians), None)))
}
