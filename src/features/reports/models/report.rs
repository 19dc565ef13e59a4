use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Shared lifecycle status for a damage report and its maintenance ticket.
///
/// A report is `awaiting` exactly as long as no ticket exists for it. Once
/// a ticket is opened, the pair always moves together through
/// `in_progress` -> `awaiting_verification` -> `done`; `done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "work_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    Awaiting,
    InProgress,
    AwaitingVerification,
    Done,
}

impl std::fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkStatus::Awaiting => write!(f, "awaiting"),
            WorkStatus::InProgress => write!(f, "in_progress"),
            WorkStatus::AwaitingVerification => write!(f, "awaiting_verification"),
            WorkStatus::Done => write!(f, "done"),
        }
    }
}

/// Priority enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "priority_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// Database model for damage report
#[derive(Debug, Clone, FromRow)]
pub struct DamageReport {
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

/// Data for creating a new damage report
#[derive(Debug, Clone)]
pub struct NewDamageReport {
    pub reporter_id: i32,
    pub title: String,
    pub description: String,
    pub location: String,
    pub priority: Priority,
    pub images: Vec<String>,
}
