use std::fmt::Display;

use crate::{authoring::SessionState, models::Category};

/// Errors an authoring session reports to its caller. Field validation
/// failures are not errors; they come back as data from `submit`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthoringError {
    /// A storage collaborator failed during create or update.
    #[error("{0}")]
    Persistence(String),
    /// The existing record could not be loaded when the session opened.
    #[error("{0}")]
    Reconciliation(String),
    #[error("`{operation}` is not allowed while the session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
    #[error("`{field}` is not a field of {category} questions")]
    FieldNotApplicable {
        field: &'static str,
        category: Category,
    },
    #[error("no option is labeled {0}")]
    UnknownLabel(String),
    #[error("option {0} is marked correct and cannot carry an incorrect-choice explanation")]
    CorrectLabel(String),
    #[error("`{field}` has no entry at index {index}")]
    IndexOutOfRange { field: &'static str, index: usize },
    #[error("a question holds at most {0} options")]
    OptionLimit(usize),
    #[error("the session was closed")]
    SessionClosed,
}

impl AuthoringError {
    /// Whether the error is a session-level banner rather than a rejected call.
    pub fn is_banner(&self) -> bool {
        matches!(
            self,
            AuthoringError::Persistence(_) | AuthoringError::Reconciliation(_)
        )
    }
}

/// Converts collaborator failures into session errors at the session
/// boundary. The detail is logged; only `message` reaches the caller.
pub trait ResultExt<T> {
    fn reject_persistence(self, message: &'static str) -> Result<T, AuthoringError>;
    fn reject_reconciliation(self, message: &'static str) -> Result<T, AuthoringError>;
}

impl<T, E: Display> ResultExt<T> for Result<T, E> {
    fn reject_persistence(self, message: &'static str) -> Result<T, AuthoringError> {
        self.map_err(|e| {
            tracing::error!("{message}: {e}");
            AuthoringError::Persistence(message.to_string())
        })
    }

    fn reject_reconciliation(self, message: &'static str) -> Result<T, AuthoringError> {
        self.map_err(|e| {
            tracing::error!("{message}: {e}");
            AuthoringError::Reconciliation(message.to_string())
        })
    }
}
