//! Transition rules for the report/ticket lifecycle.
//!
//! Every function here is pure: it receives the acting identity and entity
//! snapshots, and either returns a plan describing the writes to perform or
//! rejects the transition. Persistence re-checks the expected prior status
//! inside the same transaction, so concurrent callers serialize and the
//! loser of a race is rejected the same way a stale caller is.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::maintenance::models::MaintenanceTicket;
use crate::features::reports::models::{DamageReport, WorkStatus};
use crate::features::users::models::{User, UserRole};

/// Writes performed when an admin assigns a technician: a new ticket is
/// opened `in_progress` and the report mirrors that status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketOpening {
    pub report_id: Uuid,
    pub technician_id: i32,
}

/// Writes performed when a technician hands their work in for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionUpdate {
    pub ticket_id: Uuid,
    pub notes: String,
    pub images: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

/// Writes performed when an admin verifies completed work, closing the pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub ticket_id: Uuid,
    pub verified_at: DateTime<Utc>,
}

/// Only reporters file damage reports
pub fn authorize_submission(actor: &AuthenticatedUser) -> Result<()> {
    if !actor.is_reporter() {
        return Err(AppError::Unauthorized(
            "Only reporters can submit damage reports".to_string(),
        ));
    }
    Ok(())
}

/// `assign`: admin only, report must still be awaiting, and the assignee
/// must hold the technician role
pub fn plan_assignment(
    actor: &AuthenticatedUser,
    report: &DamageReport,
    technician: &User,
) -> Result<TicketOpening> {
    if !actor.is_admin() {
        return Err(AppError::Unauthorized(
            "Only admins can assign technicians".to_string(),
        ));
    }

    if technician.role != UserRole::Technician {
        return Err(AppError::NotFound(format!(
            "Technician '{}' not found",
            technician.id
        )));
    }

    if report.status != WorkStatus::Awaiting {
        return Err(AppError::InvalidState(format!(
            "Report cannot be assigned while it is '{}'",
            report.status
        )));
    }

    Ok(TicketOpening {
        report_id: report.id,
        technician_id: technician.id,
    })
}

/// `submit_completion`: the assigned technician hands in notes and evidence
/// images; the ticket must still be in progress
pub fn plan_completion(
    actor: &AuthenticatedUser,
    ticket: &MaintenanceTicket,
    notes: String,
    images: Vec<String>,
    now: DateTime<Utc>,
) -> Result<CompletionUpdate> {
    if !actor.is_technician() {
        return Err(AppError::Unauthorized(
            "Only technicians can submit completion reports".to_string(),
        ));
    }

    if ticket.technician_id != actor.id {
        return Err(AppError::Unauthorized(
            "You can only complete tasks assigned to you".to_string(),
        ));
    }

    if ticket.status != WorkStatus::InProgress {
        return Err(AppError::InvalidState(format!(
            "Task cannot be completed while it is '{}'",
            ticket.status
        )));
    }

    Ok(CompletionUpdate {
        ticket_id: ticket.id,
        notes,
        images,
        completed_at: now,
    })
}

/// `verify`: admin signs completed work off, closing ticket and report
pub fn plan_verification(
    actor: &AuthenticatedUser,
    ticket: &MaintenanceTicket,
    now: DateTime<Utc>,
) -> Result<Verification> {
    if !actor.is_admin() {
        return Err(AppError::Unauthorized(
            "Only admins can verify completed work".to_string(),
        ));
    }

    if ticket.status != WorkStatus::AwaitingVerification {
        return Err(AppError::InvalidState(format!(
            "Task cannot be verified while it is '{}'",
            ticket.status
        )));
    }

    Ok(Verification {
        ticket_id: ticket.id,
        verified_at: now,
    })
}
