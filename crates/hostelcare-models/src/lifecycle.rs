//! Complaint lifecycle state machine.
//!
//! Pure functions over [`Complaint`]: no I/O and no clock. The service layer
//! loads the row under `FOR UPDATE`, calls one of these, then persists the
//! mutated fields. A function that returns `Err` leaves the complaint
//! untouched.
//!
//! Status updates (staff):
//!
//! | From        | To          | Effect                                    |
//! |-------------|-------------|-------------------------------------------|
//! | pending     | pending     | none                                      |
//! | pending     | in-progress | assign the actor if nobody is assigned    |
//! | in-progress | in-progress | none, assignee kept                       |
//! | pending/in-progress | resolved | record resolution details           |
//! | pending/in-progress | rejected | none                                |
//!
//! Everything else is refused. Explicit assignment is separate and allowed
//! from any state.

use chrono::{DateTime, Utc};

use hostelcare_core::AppError;

use crate::complaints::{Complaint, ComplaintStatus, Rating, ResolutionDetails};
use crate::ids::{AdminId, StudentId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition {
        from: ComplaintStatus,
        to: ComplaintStatus,
    },
    #[error("Only resolved complaints can be rated (current status: {0})")]
    NotResolved(ComplaintStatus),
    #[error("Rating must be between 1 and 5")]
    ScoreOutOfRange(i16),
    #[error("You can only rate your own complaints")]
    NotOwner,
    #[error("Complaint has been modified (expected version {expected}, current version {actual})")]
    StaleVersion { expected: i64, actual: i64 },
}

impl LifecycleError {
    pub fn into_app_error(self) -> AppError {
        match self {
            LifecycleError::InvalidTransition { .. }
            | LifecycleError::NotResolved(_)
            | LifecycleError::ScoreOutOfRange(_) => AppError::bad_request(self),
            LifecycleError::NotOwner => AppError::forbidden(self.to_string()),
            LifecycleError::StaleVersion { .. } => AppError::conflict(self),
        }
    }
}

/// A status change that was applied, for logging and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ComplaintStatus,
    pub to: ComplaintStatus,
}

pub fn can_transition(from: ComplaintStatus, to: ComplaintStatus) -> bool {
    use ComplaintStatus::*;

    matches!(
        (from, to),
        (Pending, Pending)
            | (Pending, InProgress)
            | (InProgress, InProgress)
            | (Pending | InProgress, Resolved)
            | (Pending | InProgress, Rejected)
    )
}

/// Rejects a mutation aimed at an older revision of the complaint.
pub fn check_version(complaint: &Complaint, expected: Option<i64>) -> Result<(), LifecycleError> {
    match expected {
        Some(expected) if expected != complaint.version => Err(LifecycleError::StaleVersion {
            expected,
            actual: complaint.version,
        }),
        _ => Ok(()),
    }
}

pub fn update_status(
    complaint: &mut Complaint,
    to: ComplaintStatus,
    actor: AdminId,
    notes: Option<String>,
    solution: Option<String>,
    now: DateTime<Utc>,
) -> Result<Transition, LifecycleError> {
    let from = complaint.status;
    if !can_transition(from, to) {
        return Err(LifecycleError::InvalidTransition { from, to });
    }

    match to {
        ComplaintStatus::InProgress => {
            if complaint.assigned_to.is_none() {
                complaint.assigned_to = Some(actor);
            }
        }
        ComplaintStatus::Resolved => {
            complaint.resolution_details = Some(ResolutionDetails {
                resolved_by: actor,
                // Clock skew between app and database must not put resolution before creation.
                resolved_at: now.max(complaint.created_at),
                notes,
                solution,
            });
        }
        ComplaintStatus::Pending | ComplaintStatus::Rejected => {}
    }

    complaint.status = to;
    Ok(Transition { from, to })
}

/// Forces `assignee` onto the complaint and moves it to in-progress.
///
/// Allowed from every state, including resolved and rejected. An existing
/// resolution record is kept.
pub fn assign(complaint: &mut Complaint, assignee: AdminId) -> Transition {
    let from = complaint.status;
    complaint.assigned_to = Some(assignee);
    complaint.status = ComplaintStatus::InProgress;
    Transition {
        from,
        to: ComplaintStatus::InProgress,
    }
}

/// Attaches or replaces the owner's rating of a resolved complaint.
pub fn rate(
    complaint: &mut Complaint,
    student: StudentId,
    score: i16,
    feedback: Option<String>,
    now: DateTime<Utc>,
) -> Result<(), LifecycleError> {
    if complaint.student != student {
        return Err(LifecycleError::NotOwner);
    }
    if complaint.status != ComplaintStatus::Resolved {
        return Err(LifecycleError::NotResolved(complaint.status));
    }
    if !(1..=5).contains(&score) {
        return Err(LifecycleError::ScoreOutOfRange(score));
    }

    complaint.rating = Some(Rating {
        score,
        feedback,
        rated_at: now,
    });
    Ok(())
}
