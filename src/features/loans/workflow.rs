//! Approval state machine.
//!
//! `transition` is pure: it decides the next status and the side effects, and the
//! loan service applies them (history inside the status-update transaction, SMS
//! after commit).
//!
//! | actor | from | action | to |
//! |---|---|---|---|
//! | approver | pending_review | approve | approved |
//! | approver | pending_review | reject | rejected |
//! | approver | pending_review | return (comment required) | returned_for_revision |
//! | owning sale | pending_review, returned_for_revision | resubmit | pending_review |

use thiserror::Error;

use crate::core::error::AppError;
use crate::features::loans::models::LoanStatus;
use crate::features::notifications::Scenario;
use crate::features::staff::StaffRole;

/// History action recorded when a case goes back to the salesperson
pub const HISTORY_ACTION_RETURN: &str = "return_for_revision";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoanAction {
    Approve { comment: Option<String> },
    Reject { comment: Option<String> },
    ReturnForRevision { comment: String },
    Resubmit,
}

impl LoanAction {
    pub fn name(&self) -> &'static str {
        match self {
            LoanAction::Approve { .. } => "approve",
            LoanAction::Reject { .. } => "reject",
            LoanAction::ReturnForRevision { .. } => "return_for_revision",
            LoanAction::Resubmit => "resubmit",
        }
    }

    /// Comment stored on the loan as `approver_comment`
    pub fn approver_comment(&self) -> Option<String> {
        match self {
            LoanAction::Approve { comment } | LoanAction::Reject { comment } => comment
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            LoanAction::ReturnForRevision { comment } => Some(comment.trim().to_string()),
            LoanAction::Resubmit => None,
        }
    }
}

/// Who is acting on the loan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub role: StaffRole,
    pub is_owner: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    AppendHistory {
        action: &'static str,
        comment: String,
    },
    Notify(Scenario),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub new_status: LoanStatus,
    pub effects: Vec<SideEffect>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Role '{role}' may not {action} a loan")]
    RoleNotPermitted {
        role: StaffRole,
        action: &'static str,
    },

    #[error("Loan not found")]
    NotOwner,

    #[error("Cannot {action} a loan in status '{from}'")]
    InvalidTransition {
        from: LoanStatus,
        action: &'static str,
    },

    #[error("A comment is required to return a loan for revision")]
    CommentRequired,
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::RoleNotPermitted { .. } => AppError::Forbidden(err.to_string()),
            // Non-owners learn nothing about the loan's existence
            WorkflowError::NotOwner => AppError::NotFound(err.to_string()),
            WorkflowError::InvalidTransition { .. } => AppError::Conflict(err.to_string()),
            WorkflowError::CommentRequired => AppError::Validation(err.to_string()),
        }
    }
}

/// Decide the outcome of `action` by `actor` on a loan currently in `status`
pub fn transition(
    status: LoanStatus,
    actor: Actor,
    action: &LoanAction,
) -> Result<Transition, WorkflowError> {
    let action_name = action.name();

    match action {
        LoanAction::Approve { .. }
        | LoanAction::Reject { .. }
        | LoanAction::ReturnForRevision { .. } => {
            if actor.role != StaffRole::Approver {
                return Err(WorkflowError::RoleNotPermitted {
                    role: actor.role,
                    action: action_name,
                });
            }
            if status != LoanStatus::PendingReview {
                return Err(WorkflowError::InvalidTransition {
                    from: status,
                    action: action_name,
                });
            }
        }
        LoanAction::Resubmit => {
            if actor.role != StaffRole::Sale {
                return Err(WorkflowError::RoleNotPermitted {
                    role: actor.role,
                    action: action_name,
                });
            }
            if !actor.is_owner {
                return Err(WorkflowError::NotOwner);
            }
            if !status.is_editable() {
                return Err(WorkflowError::InvalidTransition {
                    from: status,
                    action: action_name,
                });
            }
        }
    }

    let transition = match action {
        LoanAction::Approve { .. } => Transition {
            new_status: LoanStatus::Approved,
            effects: vec![SideEffect::Notify(Scenario::Approved)],
        },
        LoanAction::Reject { .. } => Transition {
            new_status: LoanStatus::Rejected,
            effects: vec![SideEffect::Notify(Scenario::Rejected)],
        },
        LoanAction::ReturnForRevision { comment } => {
            let comment = comment.trim();
            if comment.is_empty() {
                return Err(WorkflowError::CommentRequired);
            }
            Transition {
                new_status: LoanStatus::ReturnedForRevision,
                effects: vec![
                    SideEffect::AppendHistory {
                        action: HISTORY_ACTION_RETURN,
                        comment: comment.to_string(),
                    },
                    SideEffect::Notify(Scenario::ReturnedForRevision),
                ],
            }
        }
        LoanAction::Resubmit => Transition {
            new_status: LoanStatus::PendingReview,
            effects: vec![SideEffect::Notify(Scenario::Resubmitted)],
        },
    };

    Ok(transition)
}
