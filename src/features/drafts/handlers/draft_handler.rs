use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::drafts::dtos::{ReportDraftDto, TaskDraftDto};
use crate::features::drafts::services::DraftService;
use crate::shared::types::ApiResponse;

/// Save the caller's report draft
#[utoipa::path(
    put,
    path = "/api/drafts/report",
    request_body = ReportDraftDto,
    responses(
        (status = 200, description = "Draft saved"),
    ),
    security(("bearer_auth" = [])),
    tag = "drafts"
)]
pub async fn save_report_draft(
    user: AuthenticatedUser,
    State(service): State<Arc<DraftService>>,
    AppJson(draft): AppJson<ReportDraftDto>,
) -> Result<Json<ApiResponse<()>>> {
    service.save_report_draft(user.id, &draft).await?;
    Ok(Json(ApiResponse::success(None, None)))
}

/// Load the caller's report draft, if any survives
#[utoipa::path(
    get,
    path = "/api/drafts/report",
    responses(
        (status = 200, description = "Draft, or null when absent or expired", body = ApiResponse<ReportDraftDto>),
    ),
    security(("bearer_auth" = [])),
    tag = "drafts"
)]
pub async fn load_report_draft(
    user: AuthenticatedUser,
    State(service): State<Arc<DraftService>>,
) -> Result<Json<ApiResponse<ReportDraftDto>>> {
    let draft = service.load_report_draft(user.id).await?;
    Ok(Json(ApiResponse::success(draft, None)))
}

/// Discard the caller's report draft
#[utoipa::path(
    delete,
    path = "/api/drafts/report",
    responses(
        (status = 200, description = "Draft discarded"),
    ),
    security(("bearer_auth" = [])),
    tag = "drafts"
)]
pub async fn clear_report_draft(
    user: AuthenticatedUser,
    State(service): State<Arc<DraftService>>,
) -> Result<Json<ApiResponse<()>>> {
    service.clear_report_draft(user.id).await?;
    Ok(Json(ApiResponse::success(None, None)))
}

/// Save the caller's completion draft for one task
#[utoipa::path(
    put,
    path = "/api/drafts/tasks/{ticket_id}",
    params(("ticket_id" = Uuid, Path, description = "Maintenance ticket ID")),
    request_body = TaskDraftDto,
    responses(
        (status = 200, description = "Draft saved"),
    ),
    security(("bearer_auth" = [])),
    tag = "drafts"
)]
pub async fn save_task_draft(
    user: AuthenticatedUser,
    State(service): State<Arc<DraftService>>,
    Path(ticket_id): Path<Uuid>,
    AppJson(draft): AppJson<TaskDraftDto>,
) -> Result<Json<ApiResponse<()>>> {
    service.save_task_draft(user.id, ticket_id, &draft).await?;
    Ok(Json(ApiResponse::success(None, None)))
}

/// Load the caller's completion draft for one task
#[utoipa::path(
    get,
    path = "/api/drafts/tasks/{ticket_id}",
    params(("ticket_id" = Uuid, Path, description = "Maintenance ticket ID")),
    responses(
        (status = 200, description = "Draft, or null when absent or expired", body = ApiResponse<TaskDraftDto>),
    ),
    security(("bearer_auth" = [])),
    tag = "drafts"
)]
pub async fn load_task_draft(
    user: AuthenticatedUser,
    State(service): State<Arc<DraftService>>,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<ApiResponse<TaskDraftDto>>> {
    let draft = service.load_task_draft(user.id, ticket_id).await?;
    Ok(Json(ApiResponse::success(draft, None)))
}

/// Discard the caller's completion draft for one task
#[utoipa::path(
    delete,
    path = "/api/drafts/tasks/{ticket_id}",
    params(("ticket_id" = Uuid, Path, description = "Maintenance ticket ID")),
    responses(
        (status = 200, description = "Draft discarded"),
    ),
    security(("bearer_auth" = [])),
    tag = "drafts"
)]
pub async fn clear_task_draft(
    user: AuthenticatedUser,
    State(service): State<Arc<DraftService>>,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.clear_task_draft(user.id, ticket_id).await?;
    Ok(Json(ApiResponse::success(None, None)))
}
