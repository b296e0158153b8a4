//! Shared error types for the services crate.

use std::time::Duration;

use thiserror::Error;

use drill_core::model::{Difficulty, OperationMode, SessionSummaryError};
use drill_core::GenerateError;
use storage::StorageError;

/// Why a question bank could not become a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankLoadError {
    #[error("failed to fetch question bank: {0}")]
    Fetch(String),
    #[error("question bank did not load within {0:?}")]
    Timeout(Duration),
    #[error("question bank for {mode} ({difficulty}) has no usable entries")]
    Empty {
        mode: OperationMode,
        difficulty: Difficulty,
    },
    #[error("no question bank source is configured")]
    NoSource,
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no problems available for session")]
    Empty,
    #[error("no session has been started")]
    NotStarted,
    #[error("question bank is still loading")]
    Loading,
    #[error("session already completed")]
    Completed,
    #[error("current question is already answered")]
    AlreadyAnswered,
    #[error("current question has not been answered yet")]
    NotAnswered,
    #[error("session is not complete")]
    NotComplete,
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    BankLoad(#[from] BankLoadError),
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
