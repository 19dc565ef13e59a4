use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, ClientIp};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::drafts::DraftService;
use crate::features::maintenance::dtos::{
    AssignTechnicianDto, CompleteTaskDto, TaskDetailDto, TicketResponseDto,
};
use crate::features::maintenance::services::{TaskService, WorkflowService};
use crate::features::rate_limits::RateLimitService;
use crate::shared::types::ApiResponse;

#[derive(Clone)]
pub struct MaintenanceState {
    pub workflow: Arc<WorkflowService>,
    pub tasks: Arc<TaskService>,
    pub drafts: Arc<DraftService>,
    pub rate_limiter: Arc<RateLimitService>,
}

/// Assign a technician to an awaiting report
#[utoipa::path(
    post,
    path = "/api/reports/{id}/assign",
    params(("id" = Uuid, Path, description = "Damage report ID")),
    request_body = AssignTechnicianDto,
    responses(
        (status = 201, description = "Technician assigned, ticket opened", body = ApiResponse<TicketResponseDto>),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "Report or technician not found"),
        (status = 409, description = "Report already has an active assignment"),
        (status = 429, description = "Too many requests")
    ),
    security(("bearer_auth" = [])),
    tag = "maintenance"
)]
pub async fn assign_technician(
    user: AuthenticatedUser,
    State(state): State<MaintenanceState>,
    ClientIp(ip): ClientIp,
    Path(report_id): Path<Uuid>,
    AppJson(dto): AppJson<AssignTechnicianDto>,
) -> Result<(StatusCode, Json<ApiResponse<TicketResponseDto>>)> {
    state.rate_limiter.enforce(&ip)?;

    let ticket = state
        .workflow
        .assign_technician(&user, report_id, dto.technician_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(ticket.into()),
            Some("Technician assigned".to_string()),
        )),
    ))
}

/// List the calling technician's tasks
#[utoipa::path(
    get,
    path = "/api/maintenance/tasks",
    responses(
        (status = 200, description = "Tasks assigned to the caller", body = ApiResponse<Vec<TaskDetailDto>>),
        (status = 401, description = "Not a technician")
    ),
    security(("bearer_auth" = [])),
    tag = "maintenance"
)]
pub async fn list_my_tasks(
    user: AuthenticatedUser,
    State(state): State<MaintenanceState>,
) -> Result<Json<ApiResponse<Vec<TaskDetailDto>>>> {
    if !user.is_technician() {
        return Err(AppError::Unauthorized(
            "Only technicians have a task list".to_string(),
        ));
    }

    let tasks = state.tasks.list_for_technician(user.id).await?;
    Ok(Json(ApiResponse::success(Some(tasks), None)))
}

/// Get one task with its report context
#[utoipa::path(
    get,
    path = "/api/maintenance/tasks/{id}",
    params(("id" = Uuid, Path, description = "Maintenance ticket ID")),
    responses(
        (status = 200, description = "Task found", body = ApiResponse<TaskDetailDto>),
        (status = 401, description = "Not the assigned technician"),
        (status = 404, description = "Task not found")
    ),
    security(("bearer_auth" = [])),
    tag = "maintenance"
)]
pub async fn get_task(
    user: AuthenticatedUser,
    State(state): State<MaintenanceState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TaskDetailDto>>> {
    let task = state.tasks.get_by_id(id, &user).await?;
    Ok(Json(ApiResponse::success(Some(task), None)))
}

/// Submit completed work for verification
#[utoipa::path(
    post,
    path = "/api/maintenance/tasks/{id}/complete",
    params(("id" = Uuid, Path, description = "Maintenance ticket ID")),
    request_body = CompleteTaskDto,
    responses(
        (status = 200, description = "Completion submitted for verification", body = ApiResponse<TicketResponseDto>),
        (status = 401, description = "Not the assigned technician"),
        (status = 404, description = "Task not found"),
        (status = 409, description = "Task is not in progress")
    ),
    security(("bearer_auth" = [])),
    tag = "maintenance"
)]
pub async fn complete_task(
    user: AuthenticatedUser,
    State(state): State<MaintenanceState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CompleteTaskDto>,
) -> Result<Json<ApiResponse<TicketResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let ticket = state
        .workflow
        .submit_completion(&user, id, dto.notes, dto.images)
        .await?;

    // The draft served its purpose; a stale cache entry is not worth
    // failing an already-committed submission over.
    if let Err(e) = state.drafts.clear_task_draft(user.id, id).await {
        tracing::warn!("Failed to clear task draft after completion: {}", e);
    }

    Ok(Json(ApiResponse::success(
        Some(ticket.into()),
        Some("Work submitted for verification".to_string()),
    )))
}

/// Verify completed work, closing the report
#[utoipa::path(
    post,
    path = "/api/maintenance/tasks/{id}/verify",
    params(("id" = Uuid, Path, description = "Maintenance ticket ID")),
    responses(
        (status = 200, description = "Work verified, report closed", body = ApiResponse<TicketResponseDto>),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "Task not found"),
        (status = 409, description = "Task is not awaiting verification")
    ),
    security(("bearer_auth" = [])),
    tag = "maintenance"
)]
pub async fn verify_task(
    user: AuthenticatedUser,
    State(state): State<MaintenanceState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TicketResponseDto>>> {
    let ticket = state.workflow.verify_completion(&user, id).await?;

    Ok(Json(ApiResponse::success(
        Some(ticket.into()),
        Some("Report verified and closed".to_string()),
    )))
}
