use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, ClientIp};
use crate::features::auth::dtos::{LoginDto, LoginResponseDto, RegisterDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::features::rate_limits::RateLimitService;
use crate::features::users::dtos::UserResponseDto;
use crate::shared::types::ApiResponse;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

#[derive(Clone)]
pub struct AuthState {
    pub auth: Arc<AuthService>,
    pub rate_limiter: Arc<RateLimitService>,
}

/// Register a new reporter account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Account registered successfully", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error or email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AuthState>,
    AppJson(dto): AppJson<RegisterDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state.auth.register(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(user), None)),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many login attempts")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AuthState>,
    ClientIp(ip): ClientIp,
    AppJson(dto): AppJson<LoginDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    state.rate_limiter.enforce(&ip)?;

    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = state.auth.login(dto).await?;
    Ok(Json(ApiResponse::success(Some(response), None)))
}

/// Get current authenticated user info
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user retrieved successfully", body = ApiResponse<UserResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    user: AuthenticatedUser,
    State(state): State<AuthState>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let profile = state.auth.me(user.id).await?;
    Ok(Json(ApiResponse::success(Some(profile), None)))
}
