use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::maintenance::dtos::TaskDetailDto;

/// Read-side queries over maintenance tickets, joined with the parent
/// report so technicians see what and where without a second request
pub struct TaskService {
    pool: PgPool,
}

const TASK_DETAIL_QUERY: &str = r#"
    SELECT
        t.id, t.damage_report_id, t.technician_id, t.status,
        t.technician_notes, t.images, t.completed_at, t.verified_at,
        t.created_at, t.updated_at,
        r.title AS report_title,
        r.description AS report_description,
        r.location AS report_location,
        r.priority AS report_priority,
        r.images AS report_images,
        u.name AS reporter_name
    FROM maintenance_tickets t
    JOIN damage_reports r ON r.id = t.damage_report_id
    JOIN users u ON u.id = r.reporter_id
"#;

impl TaskService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Tasks assigned to a technician, newest first
    pub async fn list_for_technician(&self, technician_id: i32) -> Result<Vec<TaskDetailDto>> {
        let tasks = sqlx::query_as::<_, TaskDetailDto>(&format!(
            "{} WHERE t.technician_id = $1 ORDER BY t.created_at DESC",
            TASK_DETAIL_QUERY
        ))
        .bind(technician_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list tasks for technician: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(tasks)
    }

    /// Task detail, visible to the assigned technician and to admins
    pub async fn get_by_id(&self, id: Uuid, actor: &AuthenticatedUser) -> Result<TaskDetailDto> {
        let task = sqlx::query_as::<_, TaskDetailDto>(&format!(
            "{} WHERE t.id = $1",
            TASK_DETAIL_QUERY
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get task by ID: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Task '{}' not found", id)))?;

        if task.technician_id != actor.id && !actor.is_admin() {
            return Err(AppError::Unauthorized(
                "You can only view tasks assigned to you".to_string(),
            ));
        }

        Ok(task)
    }
}
