use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::models::{DamageReport, Priority, WorkStatus};

/// Request DTO for submitting a damage report.
///
/// Image entries are opaque storage paths returned by the upload endpoint;
/// the service stores and echoes them without interpreting file content.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReportDto {
    #[validate(length(min = 3, max = 150, message = "Title must be 3-150 characters"))]
    pub title: String,

    #[validate(length(min = 10, max = 5000, message = "Description must be 10-5000 characters"))]
    pub description: String,

    #[validate(length(min = 3, max = 200, message = "Location must be 3-200 characters"))]
    pub location: String,

    pub priority: Priority,

    #[validate(length(max = 10, message = "At most 10 images per report"))]
    #[serde(default)]
    pub images: Vec<String>,
}

/// Response DTO for a damage report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub reporter_id: i32,
    pub title: String,
    pub description: String,
    pub location: String,
    pub priority: Priority,
    pub images: Vec<String>,
    pub status: WorkStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DamageReport> for ReportResponseDto {
    fn from(r: DamageReport) -> Self {
        Self {
            id: r.id,
            reporter_id: r.reporter_id,
            title: r.title,
            description: r.description,
            location: r.location,
            priority: r.priority,
            images: r.images,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Admin listing row: report plus the assignment, when one exists
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct ReportOverviewDto {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub priority: Priority,
    pub status: WorkStatus,
    pub reporter_name: String,
    pub ticket_id: Option<Uuid>,
    pub technician_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters for the admin report listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ReportListQuery {
    /// Restrict the listing to one lifecycle status
    pub status: Option<WorkStatus>,
}
