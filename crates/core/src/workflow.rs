//! DPR approval workflow: statuses and the submit transition table.
//!
//! A report moves `in_progress -> under_review -> final_review -> approved`.
//! Stages without a configured handler are skipped forward to `approved`.
//! Each row of [`TRANSITIONS`] names the status a submit is legal from, the
//! role the acting handler must hold, how the next stage and its handler are
//! picked from the project roster, and which approver column gets stamped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::{Roster, ROLE_APPROVER, ROLE_FINAL_APPROVER, ROLE_REPORTER};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DprStatus {
    InProgress,
    UnderReview,
    FinalReview,
    Approved,
}

impl DprStatus {
    pub const ALL: [DprStatus; 4] = [
        DprStatus::InProgress,
        DprStatus::UnderReview,
        DprStatus::FinalReview,
        DprStatus::Approved,
    ];

    /// The value stored in `daily_reports.dpr_status`.
    pub fn as_str(self) -> &'static str {
        match self {
            DprStatus::InProgress => "in_progress",
            DprStatus::UnderReview => "under_review",
            DprStatus::FinalReview => "final_review",
            DprStatus::Approved => "approved",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == DprStatus::Approved
    }
}

impl fmt::Display for DprStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DprStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DprStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown DPR status '{s}'")))
    }
}

/// `current_handler` is null exactly when the report is approved.
pub fn handler_invariant_holds(status: DprStatus, current_handler: Option<DbId>) -> bool {
    status.is_terminal() == current_handler.is_none()
}

// ---------------------------------------------------------------------------
// Transition table
// ---------------------------------------------------------------------------

/// Approver column stamped with the acting user's id on a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalStamp {
    ApprovedBy,
    FinalApprovedBy,
}

/// How the next stage is chosen from the project roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerSelector {
    /// Hand to the approver if one exists; approve outright when neither
    /// review role is configured.
    Approver,
    /// Hand to the final approver if one exists, otherwise approve.
    FinalApprover,
    /// Terminal: approve and clear the handler.
    Done,
}

#[derive(Debug, Clone, Copy)]
pub struct TransitionRule {
    pub from: DprStatus,
    pub actor_role: &'static str,
    pub selector: HandlerSelector,
    pub stamp: Option<ApprovalStamp>,
}

pub const TRANSITIONS: &[TransitionRule] = &[
    TransitionRule {
        from: DprStatus::InProgress,
        actor_role: ROLE_REPORTER,
        selector: HandlerSelector::Approver,
        stamp: None,
    },
    TransitionRule {
        from: DprStatus::UnderReview,
        actor_role: ROLE_APPROVER,
        selector: HandlerSelector::FinalApprover,
        stamp: Some(ApprovalStamp::ApprovedBy),
    },
    TransitionRule {
        from: DprStatus::FinalReview,
        actor_role: ROLE_FINAL_APPROVER,
        selector: HandlerSelector::Done,
        stamp: Some(ApprovalStamp::FinalApprovedBy),
    },
];

/// The rule that applies to a submit from `status`, if any.
pub fn rule_for(status: DprStatus) -> Option<&'static TransitionRule> {
    TRANSITIONS.iter().find(|rule| rule.from == status)
}

/// A fully resolved submit: where the report goes and who holds it next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: DprStatus,
    pub to: DprStatus,
    pub next_handler: Option<DbId>,
    pub stamp: Option<ApprovalStamp>,
}

impl HandlerSelector {
    fn select(self, roster: &Roster) -> Result<(DprStatus, Option<DbId>), CoreError> {
        match self {
            HandlerSelector::Approver => match (roster.approver(), roster.final_approver()) {
                (Some(approver), _) => Ok((DprStatus::UnderReview, Some(approver))),
                (None, None) => Ok((DprStatus::Approved, None)),
                (None, Some(_)) => Err(CoreError::InvalidState(
                    "Project has a final approver but no approver configured; \
                     the report cannot leave in_progress"
                        .to_string(),
                )),
            },
            HandlerSelector::FinalApprover => match roster.final_approver() {
                Some(final_approver) => Ok((DprStatus::FinalReview, Some(final_approver))),
                None => Ok((DprStatus::Approved, None)),
            },
            HandlerSelector::Done => Ok((DprStatus::Approved, None)),
        }
    }
}

/// Resolve a submit by a caller holding `actor_role` on a report in
/// `current` status.
///
/// Does not check that the caller is the current handler; that is enforced
/// by the conditional write that persists the transition.
pub fn plan_submit(
    current: DprStatus,
    actor_role: &str,
    roster: &Roster,
) -> Result<Transition, CoreError> {
    let rule = rule_for(current).ok_or_else(|| {
        CoreError::InvalidState(format!("Report is already {current}; no further transitions"))
    })?;

    if rule.actor_role != actor_role {
        return Err(CoreError::Forbidden(format!(
            "Only a user with role '{}' can submit a report in {current} (caller has '{actor_role}')",
            rule.actor_role
        )));
    }

    let (to, next_handler) = rule.selector.select(roster)?;
    Ok(Transition {
        from: current,
        to,
        next_handler,
        stamp: rule.stamp,
    })
}

/// Fail unless `user_id` is the report's current handler.
pub fn ensure_current_handler(
    current_handler: Option<DbId>,
    user_id: DbId,
) -> Result<(), CoreError> {
    if current_handler == Some(user_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the current handler can act on this report".to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
