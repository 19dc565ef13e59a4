use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::maintenance::engine;
use crate::features::maintenance::models::MaintenanceTicket;
use crate::features::maintenance::store::WorkflowStore;
use crate::features::reports::dtos::CreateReportDto;
use crate::features::reports::models::{DamageReport, NewDamageReport};

/// Drives the report/ticket lifecycle: loads current snapshots, lets the
/// engine rule on the requested transition, and hands the resulting plan to
/// the store for an atomic dual write.
pub struct WorkflowService {
    store: Arc<dyn WorkflowStore>,
}

impl WorkflowService {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    /// `submit`: a reporter files a new damage report
    pub async fn submit_report(
        &self,
        actor: &AuthenticatedUser,
        dto: CreateReportDto,
    ) -> Result<DamageReport> {
        engine::authorize_submission(actor)?;

        let report = self
            .store
            .insert_report(NewDamageReport {
                reporter_id: actor.id,
                title: dto.title,
                description: dto.description,
                location: dto.location,
                priority: dto.priority,
                images: dto.images,
            })
            .await?;

        tracing::info!(
            "Damage report submitted: id={}, reporter={}, priority={}",
            report.id,
            report.reporter_id,
            report.priority
        );

        Ok(report)
    }

    /// `assign`: an admin opens a maintenance ticket for a technician
    pub async fn assign_technician(
        &self,
        actor: &AuthenticatedUser,
        report_id: Uuid,
        technician_id: i32,
    ) -> Result<MaintenanceTicket> {
        let report = self
            .store
            .find_report(report_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report '{}' not found", report_id)))?;

        let technician = self
            .store
            .find_user(technician_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Technician '{}' not found", technician_id))
            })?;

        let opening = engine::plan_assignment(actor, &report, &technician)?;
        let ticket = self.store.open_ticket(&opening).await?;

        tracing::info!(
            "Technician assigned: ticket={}, report={}, technician={}",
            ticket.id,
            report_id,
            technician_id
        );

        Ok(ticket)
    }

    /// `submit_completion`: the assigned technician hands in their work
    pub async fn submit_completion(
        &self,
        actor: &AuthenticatedUser,
        ticket_id: Uuid,
        notes: String,
        images: Vec<String>,
    ) -> Result<MaintenanceTicket> {
        let ticket = self
            .store
            .find_ticket(ticket_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task '{}' not found", ticket_id)))?;

        let update = engine::plan_completion(actor, &ticket, notes, images, Utc::now())?;
        let ticket = self.store.record_completion(&update).await?;

        tracing::info!(
            "Completion submitted: ticket={}, technician={}",
            ticket.id,
            actor.id
        );

        Ok(ticket)
    }

    /// `verify`: an admin signs the completed work off
    pub async fn verify_completion(
        &self,
        actor: &AuthenticatedUser,
        ticket_id: Uuid,
    ) -> Result<MaintenanceTicket> {
        let ticket = self
            .store
            .find_ticket(ticket_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task '{}' not found", ticket_id)))?;

        let verification = engine::plan_verification(actor, &ticket, Utc::now())?;
        let ticket = self.store.record_verification(&verification).await?;

        tracing::info!("Completion verified: ticket={}, admin={}", ticket.id, actor.id);

        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::maintenance::store::memory::MemoryWorkflowStore;
    use crate::features::reports::models::{Priority, WorkStatus};
    use crate::features::users::models::{User, UserRole};
    use crate::shared::test_helpers::{admin, reporter, technician};

    fn sample_report_dto() -> CreateReportDto {
        CreateReportDto {
            title: "Broken AC in lab 3".to_string(),
            description: "The AC unit leaks and no longer cools the room".to_string(),
            location: "Building C, room 301".to_string(),
            priority: Priority::High,
            images: vec!["img/ac.jpg".to_string()],
        }
    }

    fn seed_technician(id: i32) -> User {
        User {
            id,
            name: format!("Technician {}", id),
            email: format!("tech{}@campus.test", id),
            password_hash: String::new(),
            role: UserRole::Technician,
            created_at: Utc::now(),
        }
    }

    async fn service_with_technician(id: i32) -> (WorkflowService, Arc<MemoryWorkflowStore>) {
        let store = Arc::new(MemoryWorkflowStore::new());
        store.seed_user(seed_technician(id)).await;
        (WorkflowService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn submitted_report_starts_awaiting_with_no_ticket() {
        let (service, store) = service_with_technician(42).await;

        let report = service
            .submit_report(&reporter(1), sample_report_dto())
            .await
            .unwrap();

        assert_eq!(report.status, WorkStatus::Awaiting);
        assert!(store.tickets_for_report(report.id).await.is_empty());
    }

    #[tokio::test]
    async fn full_round_trip_keeps_statuses_paired_at_every_step() {
        let (service, store) = service_with_technician(42).await;

        let report = service
            .submit_report(&reporter(1), sample_report_dto())
            .await
            .unwrap();

        // assign
        let ticket = service
            .assign_technician(&admin(9), report.id, 42)
            .await
            .unwrap();
        assert_eq!(ticket.status, WorkStatus::InProgress);
        assert_eq!(ticket.technician_id, 42);
        assert_eq!(
            store.report(report.id).await.unwrap().status,
            WorkStatus::InProgress
        );

        // submit_completion
        let ticket = service
            .submit_completion(
                &technician(42),
                ticket.id,
                "fixed the AC".to_string(),
                vec!["img/a.jpg".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(ticket.status, WorkStatus::AwaitingVerification);
        assert!(ticket.completed_at.is_some());
        assert_eq!(ticket.technician_notes.as_deref(), Some("fixed the AC"));
        assert_eq!(
            store.report(report.id).await.unwrap().status,
            WorkStatus::AwaitingVerification
        );

        // verify
        let ticket = service
            .verify_completion(&admin(9), ticket.id)
            .await
            .unwrap();
        assert_eq!(ticket.status, WorkStatus::Done);
        assert_eq!(
            store.report(report.id).await.unwrap().status,
            WorkStatus::Done
        );

        // verified after (or at the same instant as) completion
        assert!(ticket.verified_at.unwrap() >= ticket.completed_at.unwrap());
    }

    #[tokio::test]
    async fn second_assignment_is_rejected_and_leaves_one_ticket() {
        let (service, store) = service_with_technician(42).await;
        store.seed_user(seed_technician(7)).await;

        let report = service
            .submit_report(&reporter(1), sample_report_dto())
            .await
            .unwrap();

        service
            .assign_technician(&admin(9), report.id, 42)
            .await
            .unwrap();

        let second = service.assign_technician(&admin(9), report.id, 7).await;
        assert!(matches!(second, Err(AppError::InvalidState(_))));
        assert_eq!(store.tickets_for_report(report.id).await.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_assignments_let_exactly_one_win() {
        let (service, store) = service_with_technician(42).await;
        store.seed_user(seed_technician(7)).await;
        let service = Arc::new(service);

        let report = service
            .submit_report(&reporter(1), sample_report_dto())
            .await
            .unwrap();

        let a = {
            let service = Arc::clone(&service);
            let report_id = report.id;
            tokio::spawn(async move { service.assign_technician(&admin(9), report_id, 42).await })
        };
        let b = {
            let service = Arc::clone(&service);
            let report_id = report.id;
            tokio::spawn(async move { service.assign_technician(&admin(10), report_id, 7).await })
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());

        let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);

        let loser = if a.is_ok() { b } else { a };
        assert!(matches!(loser, Err(AppError::InvalidState(_))));
        assert_eq!(store.tickets_for_report(report.id).await.len(), 1);
    }

    #[tokio::test]
    async fn completion_by_non_owner_changes_nothing() {
        let (service, store) = service_with_technician(42).await;

        let report = service
            .submit_report(&reporter(1), sample_report_dto())
            .await
            .unwrap();
        let ticket = service
            .assign_technician(&admin(9), report.id, 42)
            .await
            .unwrap();

        let result = service
            .submit_completion(
                &technician(99),
                ticket.id,
                "not my task".to_string(),
                vec![],
            )
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));

        let stored = store.ticket(ticket.id).await.unwrap();
        assert_eq!(stored.status, WorkStatus::InProgress);
        assert!(stored.completed_at.is_none());
        assert_eq!(
            store.report(report.id).await.unwrap().status,
            WorkStatus::InProgress
        );
    }

    #[tokio::test]
    async fn verify_before_completion_is_rejected() {
        let (service, _store) = service_with_technician(42).await;

        let report = service
            .submit_report(&reporter(1), sample_report_dto())
            .await
            .unwrap();
        let ticket = service
            .assign_technician(&admin(9), report.id, 42)
            .await
            .unwrap();

        let result = service.verify_completion(&admin(9), ticket.id).await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn done_ticket_never_transitions_again() {
        let (service, _store) = service_with_technician(42).await;

        let report = service
            .submit_report(&reporter(1), sample_report_dto())
            .await
            .unwrap();
        let ticket = service
            .assign_technician(&admin(9), report.id, 42)
            .await
            .unwrap();
        service
            .submit_completion(&technician(42), ticket.id, "done".to_string(), vec![])
            .await
            .unwrap();
        service.verify_completion(&admin(9), ticket.id).await.unwrap();

        let again = service.verify_completion(&admin(9), ticket.id).await;
        assert!(matches!(again, Err(AppError::InvalidState(_))));

        let complete_again = service
            .submit_completion(&technician(42), ticket.id, "again".to_string(), vec![])
            .await;
        assert!(matches!(complete_again, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn transitions_on_unknown_ids_are_not_found() {
        let (service, _store) = service_with_technician(42).await;

        let missing_report = service
            .assign_technician(&admin(9), Uuid::new_v4(), 42)
            .await;
        assert!(matches!(missing_report, Err(AppError::NotFound(_))));

        let missing_ticket = service
            .submit_completion(&technician(42), Uuid::new_v4(), "x".to_string(), vec![])
            .await;
        assert!(matches!(missing_ticket, Err(AppError::NotFound(_))));

        let missing_verify = service.verify_completion(&admin(9), Uuid::new_v4()).await;
        assert!(matches!(missing_verify, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn assigning_to_a_reporter_is_not_found() {
        let (service, store) = service_with_technician(42).await;
        store
            .seed_user(User {
                id: 5,
                name: "Not A Tech".to_string(),
                email: "nta@campus.test".to_string(),
                password_hash: String::new(),
                role: UserRole::Reporter,
                created_at: Utc::now(),
            })
            .await;

        let report = service
            .submit_report(&reporter(1), sample_report_dto())
            .await
            .unwrap();

        let result = service.assign_technician(&admin(9), report.id, 5).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(
            store.report(report.id).await.unwrap().status,
            WorkStatus::Awaiting
        );
    }

    #[tokio::test]
    async fn non_reporter_cannot_submit() {
        let (service, _store) = service_with_technician(42).await;

        let result = service.submit_report(&admin(9), sample_report_dto()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
