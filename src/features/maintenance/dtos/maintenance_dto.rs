use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::maintenance::models::MaintenanceTicket;
use crate::features::reports::models::{Priority, WorkStatus};

/// Request DTO for assigning a technician to a report
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AssignTechnicianDto {
    pub technician_id: i32,
}

/// Request DTO for a technician's completion submission
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CompleteTaskDto {
    #[validate(length(min = 5, max = 5000, message = "Notes must be 5-5000 characters"))]
    pub notes: String,

    #[validate(length(max = 10, message = "At most 10 evidence images"))]
    #[serde(default)]
    pub images: Vec<String>,
}

/// Response DTO for a maintenance ticket
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TicketResponseDto {
    pub id: Uuid,
    pub damage_report_id: Uuid,
    pub technician_id: i32,
    pub status: WorkStatus,
    pub technician_notes: Option<String>,
    pub images: Vec<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MaintenanceTicket> for TicketResponseDto {
    fn from(t: MaintenanceTicket) -> Self {
        Self {
            id: t.id,
            damage_report_id: t.damage_report_id,
            technician_id: t.technician_id,
            status: t.status,
            technician_notes: t.technician_notes,
            images: t.images,
            completed_at: t.completed_at,
            verified_at: t.verified_at,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Task row for technician views: the ticket plus what the damage report
/// says is broken and where
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct TaskDetailDto {
    pub id: Uuid,
    pub damage_report_id: Uuid,
    pub technician_id: i32,
    pub status: WorkStatus,
    pub technician_notes: Option<String>,
    pub images: Vec<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub report_title: String,
    pub report_description: String,
    pub report_location: String,
    pub report_priority: Priority,
    pub report_images: Vec<String>,
    pub reporter_name: String,
}
