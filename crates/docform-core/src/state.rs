//! Form lifecycle
//!
//! ```text
//! Editing ──submit──▶ Blocked(report) ──edit──▶ Editing
//!    │                   │   ▲
//!    │                   └───┘ submit again, still failing
//!    └──────submit───────┴──────▶ Submitted (terminal)
//! ```

use crate::submission::SubmissionReport;
use serde::Serialize;
use std::fmt;

/// Lifecycle state of one form instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "report", rename_all = "snake_case")]
pub enum FormState {
    /// Accepting edits
    #[default]
    Editing,
    /// Last submission attempt failed with these findings
    Blocked(SubmissionReport),
    /// Handed to the submission sink
    Submitted,
}

impl FormState {
    /// Discriminant without the payload
    #[inline]
    #[must_use]
    pub fn kind(&self) -> StateKind {
        match self {
            Self::Editing => StateKind::Editing,
            Self::Blocked(_) => StateKind::Blocked,
            Self::Submitted => StateKind::Submitted,
        }
    }

    /// Whether no further changes are accepted
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Submitted)
    }
}

/// Payload-free lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    /// Accepting edits
    Editing,
    /// Submission blocked
    Blocked,
    /// Submitted
    Submitted,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Editing => "editing",
            Self::Blocked => "blocked",
            Self::Submitted => "submitted",
        };
        f.write_str(name)
    }
}

/// Lifecycle errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Transition not in the lifecycle graph
    #[error("illegal transition: {from} -> {to}")]
    IllegalTransition {
        /// Current state
        from: StateKind,
        /// Requested state
        to: StateKind,
    },
}

/// Validate a lifecycle transition
///
/// # Errors
/// Returns [`StateError::IllegalTransition`] if `to` is not reachable from `from`
pub fn validate_transition(from: StateKind, to: StateKind) -> Result<(), StateError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(StateError::IllegalTransition { from, to })
    }
}

/// States reachable in one step from `from`
#[must_use]
pub fn allowed_transitions(from: StateKind) -> Vec<StateKind> {
    use StateKind::{Blocked, Editing, Submitted};
    match from {
        Editing => vec![Blocked, Submitted],
        Blocked => vec![Editing, Blocked, Submitted],
        Submitted => vec![],
    }
}

fn allowed(from: StateKind, to: StateKind) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}
