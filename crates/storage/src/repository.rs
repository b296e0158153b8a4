use async_trait::async_trait;
use drill_core::Clock;
use drill_core::model::{CompletionReport, LearnerId, OperationMode, UserProgress};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::bank_source::{BankSource, InMemoryBankSource};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),
}

/// Progress collaborator: receives session results and keeps per-level records.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch a learner's progress. Unknown learners get fresh progress.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached or answers garbage.
    async fn get_progress(&self, learner: &LearnerId) -> Result<UserProgress, StorageError>;

    /// Record a finished session and return the updated progress.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the report cannot be stored.
    async fn record_completion(
        &self,
        learner: &LearnerId,
        report: &CompletionReport,
    ) -> Result<UserProgress, StorageError>;

    /// The level the learner should practice next.
    ///
    /// # Errors
    ///
    /// Same as [`ProgressRepository::get_progress`].
    async fn current_level(&self, learner: &LearnerId) -> Result<OperationMode, StorageError> {
        Ok(self.get_progress(learner).await?.current_level)
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<HashMap<LearnerId, UserProgress>>>,
    clock: Clock,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Clock::system())
    }

    /// Uses `clock` to stamp `last_attempt` on recorded levels.
    #[must_use]
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            progress: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(&self, learner: &LearnerId) -> Result<UserProgress, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .get(learner)
            .cloned()
            .unwrap_or_else(|| UserProgress::new(learner.clone())))
    }

    async fn record_completion(
        &self,
        learner: &LearnerId,
        report: &CompletionReport,
    ) -> Result<UserProgress, StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let progress = guard
            .entry(learner.clone())
            .or_insert_with(|| UserProgress::new(learner.clone()));
        progress.record(report, self.clock.now());
        Ok(progress.clone())
    }
}

/// Aggregates the progress repository and bank source behind trait objects for
/// easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub banks: Arc<dyn BankSource>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::in_memory_with_banks(InMemoryBankSource::new())
    }

    #[must_use]
    pub fn in_memory_with_banks(banks: InMemoryBankSource) -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        let banks: Arc<dyn BankSource> = Arc::new(banks);
        Self { progress, banks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::time::fixed_now;

    fn learner() -> LearnerId {
        LearnerId::new("ada").unwrap()
    }

    fn report(level: OperationMode, score: u32, completed: bool) -> CompletionReport {
        CompletionReport {
            level,
            score,
            completed,
        }
    }

    #[tokio::test]
    async fn unknown_learner_gets_fresh_progress() {
        let repo = InMemoryRepository::new();
        let progress = repo.get_progress(&learner()).await.unwrap();
        assert_eq!(progress.current_level, OperationMode::Comparison);
        assert!(progress.completed_levels.is_empty());
        assert_eq!(
            repo.current_level(&learner()).await.unwrap(),
            OperationMode::Comparison
        );
    }

    #[tokio::test]
    async fn records_accumulate_and_unlock_next_level() {
        let repo = InMemoryRepository::with_clock(Clock::fixed(fixed_now()));
        let id = learner();

        repo.record_completion(&id, &report(OperationMode::Comparison, 60, false))
            .await
            .unwrap();
        let progress = repo
            .record_completion(&id, &report(OperationMode::Comparison, 40, true))
            .await
            .unwrap();

        let level = progress.level(OperationMode::Comparison).unwrap();
        assert_eq!(level.score, 60);
        assert_eq!(level.attempts, 2);
        assert!(level.completed);
        assert_eq!(level.last_attempt, Some(fixed_now()));
        assert_eq!(progress.current_level, OperationMode::Simplification);
        assert_eq!(repo.get_progress(&id).await.unwrap(), progress);
    }

    #[tokio::test]
    async fn storage_in_memory_shares_nothing_between_learners() {
        let storage = Storage::in_memory();
        let other = LearnerId::new("grace").unwrap();
        storage
            .progress
            .record_completion(&learner(), &report(OperationMode::Comparison, 100, true))
            .await
            .unwrap();
        let progress = storage.progress.get_progress(&other).await.unwrap();
        assert!(progress.completed_levels.is_empty());
    }
}
