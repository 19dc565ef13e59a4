use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::reports::models::WorkStatus;

/// Database model for maintenance ticket.
///
/// A ticket only comes into existence when an admin assigns a technician;
/// `technician_id` never changes afterwards (there is no reassignment).
#[derive(Debug, Clone, FromRow)]
pub struct MaintenanceTicket {
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
