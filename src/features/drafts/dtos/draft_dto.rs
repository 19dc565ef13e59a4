use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::reports::models::Priority;

/// A reporter's unsubmitted damage report form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportDraftDto {
    pub title: String,
    pub description: String,
    pub location: String,
    pub priority: Priority,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A technician's unsubmitted completion form for one task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TaskDraftDto {
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
}
