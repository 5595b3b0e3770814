//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{CatalogError, ElapsedError};

use crate::quiz::QuizPhase;

/// Errors emitted by the quiz session state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    /// Validation failure: a quiz cannot start without a name.
    #[error("user name must not be empty")]
    EmptyUserName,
    #[error("cannot {action} while the quiz is {from:?}")]
    InvalidTransition {
        from: QuizPhase,
        action: &'static str,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Elapsed(#[from] ElapsedError),
}

/// Errors that end a `QuizDriver` run.
///
/// Store failures never show up here; they are rendered as notices instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DriverError {
    #[error(transparent)]
    Session(#[from] SessionError),
}
