use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::drafts::{dtos as drafts_dtos, handlers as drafts_handlers};
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::maintenance::{dtos as maintenance_dtos, handlers as maintenance_handlers};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::get_me,
        // Users
        users_handlers::list_technicians,
        // Reports
        reports_handlers::create_report,
        reports_handlers::list_my_reports,
        reports_handlers::list_reports,
        reports_handlers::get_report,
        // Maintenance
        maintenance_handlers::assign_technician,
        maintenance_handlers::list_my_tasks,
        maintenance_handlers::get_task,
        maintenance_handlers::complete_task,
        maintenance_handlers::verify_task,
        // Drafts
        drafts_handlers::save_report_draft,
        drafts_handlers::load_report_draft,
        drafts_handlers::clear_report_draft,
        drafts_handlers::save_task_draft,
        drafts_handlers::load_task_draft,
        drafts_handlers::clear_task_draft,
        // Files
        files_handlers::upload_file,
    ),
    components(
        schemas(
            // Auth
            auth_dtos::RegisterDto,
            auth_dtos::LoginDto,
            auth_dtos::LoginResponseDto,
            ApiResponse<auth_dtos::LoginResponseDto>,
            // Users
            users_dtos::UserResponseDto,
            users_dtos::TechnicianDto,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::TechnicianDto>>,
            // Reports
            reports_models::WorkStatus,
            reports_models::Priority,
            reports_dtos::CreateReportDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::ReportOverviewDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<Vec<reports_dtos::ReportOverviewDto>>,
            // Maintenance
            maintenance_dtos::AssignTechnicianDto,
            maintenance_dtos::CompleteTaskDto,
            maintenance_dtos::TicketResponseDto,
            maintenance_dtos::TaskDetailDto,
            ApiResponse<maintenance_dtos::TicketResponseDto>,
            ApiResponse<maintenance_dtos::TaskDetailDto>,
            ApiResponse<Vec<maintenance_dtos::TaskDetailDto>>,
            // Drafts
            drafts_dtos::ReportDraftDto,
            drafts_dtos::TaskDraftDto,
            ApiResponse<drafts_dtos::ReportDraftDto>,
            ApiResponse<drafts_dtos::TaskDraftDto>,
            // Files
            files_dtos::UploadFileDto,
            files_dtos::FileResponseDto,
            ApiResponse<files_dtos::FileResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User directory (admin only)"),
        (name = "reports", description = "Facility damage reports"),
        (name = "maintenance", description = "Maintenance tickets and the assignment/verification workflow"),
        (name = "drafts", description = "Unsubmitted form drafts (auto-expiring)"),
        (name = "files", description = "Evidence image upload"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "KampusCare API",
        version = "0.1.0",
        description = "API documentation for the KampusCare facility damage report service",
    )
)]
pub struct ApiDoc;

/// Registers the bearer JWT scheme the `security(...)` annotations refer to
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
