//! Persistence contract for the workflow engine.
//!
//! The store owns the dual write: every transition that touches a ticket
//! touches its parent report in the same atomic operation, guarded by a
//! conditional status check so racing transitions serialize and exactly one
//! wins. `PgWorkflowStore` is the production implementation; tests run the
//! same contract against an in-memory store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::maintenance::engine::{CompletionUpdate, TicketOpening, Verification};
use crate::features::maintenance::models::MaintenanceTicket;
use crate::features::reports::models::{DamageReport, NewDamageReport, WorkStatus};
use crate::features::users::models::User;

#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Create a fresh damage report in the `awaiting` status
    async fn insert_report(&self, new: NewDamageReport) -> Result<DamageReport>;

    async fn find_report(&self, id: Uuid) -> Result<Option<DamageReport>>;

    async fn find_ticket(&self, id: Uuid) -> Result<Option<MaintenanceTicket>>;

    async fn find_user(&self, id: i32) -> Result<Option<User>>;

    /// Open a ticket for an `awaiting` report and move the pair to
    /// `in_progress`. Fails with `InvalidState` if the report moved on in
    /// the meantime.
    async fn open_ticket(&self, opening: &TicketOpening) -> Result<MaintenanceTicket>;

    /// Record a technician's completion submission and move the pair to
    /// `awaiting_verification`. Fails with `InvalidState` if the ticket is
    /// no longer `in_progress`.
    async fn record_completion(&self, update: &CompletionUpdate) -> Result<MaintenanceTicket>;

    /// Record an admin verification and move the pair to `done`. Fails with
    /// `InvalidState` if the ticket is not `awaiting_verification`.
    async fn record_verification(&self, verification: &Verification) -> Result<MaintenanceTicket>;
}

const TICKET_COLUMNS: &str = "id, damage_report_id, technician_id, status, technician_notes, \
                              images, completed_at, verified_at, created_at, updated_at";

pub struct PgWorkflowStore {
    pool: PgPool,
}

impl PgWorkflowStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkflowStore for PgWorkflowStore {
    async fn insert_report(&self, new: NewDamageReport) -> Result<DamageReport> {
        let report = sqlx::query_as::<_, DamageReport>(
            r#"
            INSERT INTO damage_reports (reporter_id, title, description, location, priority, images, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, reporter_id, title, description, location, priority,
                      images, status, created_at, updated_at
            "#,
        )
        .bind(new.reporter_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.location)
        .bind(new.priority)
        .bind(&new.images)
        .bind(WorkStatus::Awaiting)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert damage report: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(report)
    }

    async fn find_report(&self, id: Uuid) -> Result<Option<DamageReport>> {
        sqlx::query_as::<_, DamageReport>(
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
            tracing::error!("Failed to find damage report: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_ticket(&self, id: Uuid) -> Result<Option<MaintenanceTicket>> {
        sqlx::query_as::<_, MaintenanceTicket>(&format!(
            "SELECT {} FROM maintenance_tickets WHERE id = $1",
            TICKET_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to find maintenance ticket: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_user(&self, id: i32) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to find user: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn open_ticket(&self, opening: &TicketOpening) -> Result<MaintenanceTicket> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Conditional claim of the report row: the first assignment locks it
        // and flips the status, any racing assignment matches zero rows.
        let claimed = sqlx::query(
            r#"
            UPDATE damage_reports
            SET status = $1, updated_at = now()
            WHERE id = $2 AND status = $3
            "#,
        )
        .bind(WorkStatus::InProgress)
        .bind(opening.report_id)
        .bind(WorkStatus::Awaiting)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to claim report for assignment: {:?}", e);
            AppError::Database(e)
        })?;

        if claimed.rows_affected() == 0 {
            return Err(AppError::InvalidState(
                "Report already has an active assignment".to_string(),
            ));
        }

        let ticket = sqlx::query_as::<_, MaintenanceTicket>(&format!(
            r#"
            INSERT INTO maintenance_tickets (damage_report_id, technician_id, status)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
        .bind(opening.report_id)
        .bind(opening.technician_id)
        .bind(WorkStatus::InProgress)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to open maintenance ticket: {:?}", e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(AppError::Database)?;

        Ok(ticket)
    }

    async fn record_completion(&self, update: &CompletionUpdate) -> Result<MaintenanceTicket> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let ticket = sqlx::query_as::<_, MaintenanceTicket>(&format!(
            r#"
            UPDATE maintenance_tickets
            SET technician_notes = $1, images = $2, completed_at = $3,
                status = $4, updated_at = now()
            WHERE id = $5 AND status = $6
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
        .bind(&update.notes)
        .bind(&update.images)
        .bind(update.completed_at)
        .bind(WorkStatus::AwaitingVerification)
        .bind(update.ticket_id)
        .bind(WorkStatus::InProgress)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record completion: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| {
            AppError::InvalidState("Task cannot be completed from its current status".to_string())
        })?;

        sqlx::query(
            r#"
            UPDATE damage_reports
            SET status = $1, updated_at = now()
            WHERE id = $2
            "#,
        )
        .bind(WorkStatus::AwaitingVerification)
        .bind(ticket.damage_report_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to sync report status after completion: {:?}", e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(AppError::Database)?;

        Ok(ticket)
    }

    async fn record_verification(&self, verification: &Verification) -> Result<MaintenanceTicket> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let ticket = sqlx::query_as::<_, MaintenanceTicket>(&format!(
            r#"
            UPDATE maintenance_tickets
            SET verified_at = $1, status = $2, updated_at = now()
            WHERE id = $3 AND status = $4
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
        .bind(verification.verified_at)
        .bind(WorkStatus::Done)
        .bind(verification.ticket_id)
        .bind(WorkStatus::AwaitingVerification)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record verification: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| {
            AppError::InvalidState("Task cannot be verified from its current status".to_string())
        })?;

        sqlx::query(
            r#"
            UPDATE damage_reports
            SET status = $1, updated_at = now()
            WHERE id = $2
            "#,
        )
        .bind(WorkStatus::Done)
        .bind(ticket.damage_report_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to close report after verification: {:?}", e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(AppError::Database)?;

        Ok(ticket)
    }
}

#[cfg(test)]
pub mod memory {
    //! In-memory store used by workflow tests. All mutation happens under a
    //! single lock, giving the same serialization the Postgres transactions
    //! provide.

    use std::collections::HashMap;

    use chrono::Utc;
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct MemoryState {
        users: HashMap<i32, User>,
        reports: HashMap<Uuid, DamageReport>,
        tickets: HashMap<Uuid, MaintenanceTicket>,
    }

    #[derive(Default)]
    pub struct MemoryWorkflowStore {
        state: Mutex<MemoryState>,
    }

    impl MemoryWorkflowStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn seed_user(&self, user: User) {
            self.state.lock().await.users.insert(user.id, user);
        }

        pub async fn report(&self, id: Uuid) -> Option<DamageReport> {
            self.state.lock().await.reports.get(&id).cloned()
        }

        pub async fn ticket(&self, id: Uuid) -> Option<MaintenanceTicket> {
            self.state.lock().await.tickets.get(&id).cloned()
        }

        pub async fn tickets_for_report(&self, report_id: Uuid) -> Vec<MaintenanceTicket> {
            self.state
                .lock()
                .await
                .tickets
                .values()
                .filter(|t| t.damage_report_id == report_id)
                .cloned()
                .collect()
        }
    }

    #[async_trait]
    impl WorkflowStore for MemoryWorkflowStore {
        async fn insert_report(&self, new: NewDamageReport) -> Result<DamageReport> {
            let now = Utc::now();
            let report = DamageReport {
                id: Uuid::new_v4(),
                reporter_id: new.reporter_id,
                title: new.title,
                description: new.description,
                location: new.location,
                priority: new.priority,
                images: new.images,
                status: WorkStatus::Awaiting,
                created_at: now,
                updated_at: now,
            };

            self.state
                .lock()
                .await
                .reports
                .insert(report.id, report.clone());
            Ok(report)
        }

        async fn find_report(&self, id: Uuid) -> Result<Option<DamageReport>> {
            Ok(self.state.lock().await.reports.get(&id).cloned())
        }

        async fn find_ticket(&self, id: Uuid) -> Result<Option<MaintenanceTicket>> {
            Ok(self.state.lock().await.tickets.get(&id).cloned())
        }

        async fn find_user(&self, id: i32) -> Result<Option<User>> {
            Ok(self.state.lock().await.users.get(&id).cloned())
        }

        async fn open_ticket(&self, opening: &TicketOpening) -> Result<MaintenanceTicket> {
            let mut state = self.state.lock().await;
            let now = Utc::now();

            let report = state
                .reports
                .get_mut(&opening.report_id)
                .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

            if report.status != WorkStatus::Awaiting {
                return Err(AppError::InvalidState(
                    "Report already has an active assignment".to_string(),
                ));
            }

            report.status = WorkStatus::InProgress;
            report.updated_at = now;

            let ticket = MaintenanceTicket {
                id: Uuid::new_v4(),
                damage_report_id: opening.report_id,
                technician_id: opening.technician_id,
                status: WorkStatus::InProgress,
                technician_notes: None,
                images: vec![],
                completed_at: None,
                verified_at: None,
                created_at: now,
                updated_at: now,
            };

            state.tickets.insert(ticket.id, ticket.clone());
            Ok(ticket)
        }

        async fn record_completion(&self, update: &CompletionUpdate) -> Result<MaintenanceTicket> {
            let mut state = self.state.lock().await;
            let now = Utc::now();

            let ticket = state
                .tickets
                .get_mut(&update.ticket_id)
                .filter(|t| t.status == WorkStatus::InProgress)
                .ok_or_else(|| {
                    AppError::InvalidState(
                        "Task cannot be completed from its current status".to_string(),
                    )
                })?;

            ticket.technician_notes = Some(update.notes.clone());
            ticket.images = update.images.clone();
            ticket.completed_at = Some(update.completed_at);
            ticket.status = WorkStatus::AwaitingVerification;
            ticket.updated_at = now;
            let ticket = ticket.clone();

            let report = state
                .reports
                .get_mut(&ticket.damage_report_id)
                .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;
            report.status = WorkStatus::AwaitingVerification;
            report.updated_at = now;

            Ok(ticket)
        }

        async fn record_verification(
            &self,
            verification: &Verification,
        ) -> Result<MaintenanceTicket> {
            let mut state = self.state.lock().await;
            let now = Utc::now();

            let ticket = state
                .tickets
                .get_mut(&verification.ticket_id)
                .filter(|t| t.status == WorkStatus::AwaitingVerification)
                .ok_or_else(|| {
                    AppError::InvalidState(
                        "Task cannot be verified from its current status".to_string(),
                    )
                })?;

            ticket.verified_at = Some(verification.verified_at);
            ticket.status = WorkStatus::Done;
            ticket.updated_at = now;
            let ticket = ticket.clone();

            let report = state
                .reports
                .get_mut(&ticket.damage_report_id)
                .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;
            report.status = WorkStatus::Done;
            report.updated_at = now;

            Ok(ticket)
        }
    }
}
