//! Session error types.

use thiserror::Error;

use import_map::MappingError;

use crate::commit::CommitError;
use crate::session::Step;

/// Errors from import session operations.
///
/// Every variant is recoverable; the session stays usable.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// Upload without a header or without a data row.
    #[error("upload is empty: {headers} header(s), {rows} row(s)")]
    EmptyUpload { headers: usize, rows: usize },

    /// Operation not available in the current step.
    #[error("cannot {operation} during the {step} step")]
    InvalidStep {
        operation: &'static str,
        step: Step,
    },

    /// Ticket does not belong to the pending commit.
    #[error("commit ticket is not the pending commit")]
    StaleTicket,

    /// Sink rejected or failed the commit. The session stays in preview.
    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl SessionError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyUpload { headers: 0, .. } => {
                "The file has no header row. Add a header line naming each column.".to_string()
            }
            Self::EmptyUpload { .. } => {
                "The file has headers but no data rows. Add at least one row.".to_string()
            }
            Self::InvalidStep { operation, step } => {
                format!("You cannot {operation} while on the {step} step.")
            }
            Self::StaleTicket => "That commit is no longer pending.".to_string(),
            Self::Commit(err) => format!("The import could not be saved: {err}. You can retry."),
            Self::Mapping(err) => err.to_string(),
        }
    }
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
