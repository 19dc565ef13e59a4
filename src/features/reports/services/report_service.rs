use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{ReportListQuery, ReportOverviewDto, ReportResponseDto};
use crate::features::reports::models::DamageReport;

/// Read-side queries over damage reports. All lifecycle mutations go
/// through the workflow service instead.
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reporter's own submission history, newest first
    pub async fn list_by_reporter(&self, reporter_id: i32) -> Result<Vec<ReportResponseDto>> {
        let reports = sqlx::query_as::<_, DamageReport>(
            r#"
            SELECT id, reporter_id, title, description, location, priority,
                   images, status, created_at, updated_at
            FROM damage_reports
            WHERE reporter_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(reporter_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports by reporter: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(reports.into_iter().map(|r| r.into()).collect())
    }

    /// Admin overview of all reports with their assignment, optionally
    /// filtered by lifecycle status
    pub async fn list_all(&self, query: &ReportListQuery) -> Result<Vec<ReportOverviewDto>> {
        let rows = sqlx::query_as::<_, ReportOverviewDto>(
            r#"
            SELECT
                r.id, r.title, r.location, r.priority, r.status,
                u.name AS reporter_name,
                t.id AS ticket_id,
                tech.name AS technician_name,
                r.created_at, r.updated_at
            FROM damage_reports r
            JOIN users u ON u.id = r.reporter_id
            LEFT JOIN maintenance_tickets t ON t.damage_report_id = r.id
            LEFT JOIN users tech ON tech.id = t.technician_id
            WHERE ($1::work_status IS NULL OR r.status = $1)
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(query.status)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows)
    }

    /// Report detail, visible to its reporter and to admins
    pub async fn get_by_id(
        &self,
        id: Uuid,
        actor: &AuthenticatedUser,
    ) -> Result<ReportResponseDto> {
        let report = sqlx::query_as::<_, DamageReport>(
            r#"
            SELECT id, reporter_id, title, description, location, priority,
                   images, status, created_at, updated_at
            FROM damage_reports
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get report by ID: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Report '{}' not found", id)))?;

        if report.reporter_id != actor.id && !actor.is_admin() {
            return Err(AppError::Unauthorized(
                "You can only view your own reports".to_string(),
            ));
        }

        Ok(report.into())
    }
}
