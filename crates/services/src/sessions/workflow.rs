use std::sync::Arc;

use drill_core::model::{LearnerId, OperationMode, UserProgress};
use storage::ProgressRepository;

use super::quiz::QuizSession;
use crate::error::SessionError;

/// Result of reporting a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    Recorded(UserProgress),
    /// The session was reported before; nothing was sent.
    AlreadyReported,
}

/// Sends finished sessions to the progress collaborator for one learner.
#[derive(Clone)]
pub struct CompletionService {
    progress: Arc<dyn ProgressRepository>,
    learner: LearnerId,
}

impl CompletionService {
    #[must_use]
    pub fn new(progress: Arc<dyn ProgressRepository>, learner: LearnerId) -> Self {
        Self { progress, learner }
    }

    #[must_use]
    pub fn learner(&self) -> &LearnerId {
        &self.learner
    }

    /// Report a completed session. Safe to call again after a failure.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` for an unfinished session and
    /// `SessionError::Storage` when the collaborator rejects the report; the
    /// session is left untouched so the report can be retried.
    pub async fn report(&self, session: &mut QuizSession) -> Result<ReportOutcome, SessionError> {
        if session.is_reported() {
            return Ok(ReportOutcome::AlreadyReported);
        }
        let report = session.completion_report()?;

        match self.progress.record_completion(&self.learner, &report).await {
            Ok(progress) => {
                session.mark_reported();
                tracing::info!(
                    learner = %self.learner,
                    level = %report.level,
                    score = report.score,
                    "session result recorded"
                );
                Ok(ReportOutcome::Recorded(progress))
            }
            Err(err) => {
                tracing::warn!(learner = %self.learner, %err, "failed to record session result");
                Err(err.into())
            }
        }
    }

    /// # Errors
    ///
    /// Returns `SessionError::Storage` if progress cannot be fetched.
    pub async fn progress(&self) -> Result<UserProgress, SessionError> {
        Ok(self.progress.get_progress(&self.learner).await?)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Storage` if progress cannot be fetched.
    pub async fn current_level(&self) -> Result<OperationMode, SessionError> {
        Ok(self.progress.current_level(&self.learner).await?)
    }
}
