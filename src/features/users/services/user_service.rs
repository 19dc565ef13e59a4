use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::TechnicianDto;

/// Service for user directory queries
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List technician accounts for the assignment picker, including how
    /// many not-yet-done tickets each currently holds
    pub async fn list_technicians(&self) -> Result<Vec<TechnicianDto>> {
        let technicians = sqlx::query_as::<_, TechnicianDto>(
            r#"
            SELECT
                u.id, u.name, u.email,
                COUNT(t.id) FILTER (WHERE t.status <> 'done') AS open_tasks
            FROM users u
            LEFT JOIN maintenance_tickets t ON t.technician_id = u.id
            WHERE u.role = 'technician'
            GROUP BY u.id, u.name, u.email
            ORDER BY u.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list technicians: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(technicians)
    }
}
