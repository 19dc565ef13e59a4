use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, ClientIp};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::drafts::DraftService;
use crate::features::maintenance::WorkflowService;
use crate::features::rate_limits::RateLimitService;
use crate::features::reports::dtos::{
    CreateReportDto, ReportListQuery, ReportOverviewDto, ReportResponseDto,
};
use crate::features::reports::services::ReportService;
use crate::shared::types::ApiResponse;

#[derive(Clone)]
pub struct ReportState {
    pub reports: Arc<ReportService>,
    pub workflow: Arc<WorkflowService>,
    pub drafts: Arc<DraftService>,
    pub rate_limiter: Arc<RateLimitService>,
}

/// Submit a new damage report
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not a reporter"),
        (status = 429, description = "Too many requests")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn create_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    ClientIp(ip): ClientIp,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    state.rate_limiter.enforce(&ip)?;

    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = state.workflow.submit_report(&user, dto).await?;

    // The submitted form supersedes any staged draft
    if let Err(e) = state.drafts.clear_report_draft(user.id).await {
        tracing::warn!("Failed to clear report draft after submission: {}", e);
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report submitted".to_string()),
        )),
    ))
}

/// List the caller's own reports
#[utoipa::path(
    get,
    path = "/api/reports/mine",
    responses(
        (status = 200, description = "Caller's submission history", body = ApiResponse<Vec<ReportResponseDto>>),
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_my_reports(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = state.reports.list_by_reporter(user.id).await?;
    Ok(Json(ApiResponse::success(Some(reports), None)))
}

/// Admin overview of all reports
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportListQuery),
    responses(
        (status = 200, description = "All reports with assignment info", body = ApiResponse<Vec<ReportOverviewDto>>),
        (status = 401, description = "Not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<ApiResponse<Vec<ReportOverviewDto>>>> {
    if !user.is_admin() {
        return Err(AppError::Unauthorized(
            "Only admins can list all reports".to_string(),
        ));
    }

    let reports = state.reports.list_all(&query).await?;
    Ok(Json(ApiResponse::success(Some(reports), None)))
}

/// Get one report
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Damage report ID")),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 401, description = "Not the reporter or an admin"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.reports.get_by_id(id, &user).await?;
    Ok(Json(ApiResponse::success(Some(report), None)))
}
