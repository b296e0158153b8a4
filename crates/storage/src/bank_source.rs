use async_trait::async_trait;
use drill_core::model::{Difficulty, OperationMode};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankSourceError {
    #[error("no question bank for {mode} ({difficulty})")]
    NotFound {
        mode: OperationMode,
        difficulty: Difficulty,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("bank source unavailable: {0}")]
    Unavailable(String),
}

/// File name of the bank for a mode and difficulty, e.g. `comparison-easy.txt`.
#[must_use]
pub fn resource_name(mode: OperationMode, difficulty: Difficulty) -> String {
    format!("{mode}-{difficulty}.txt")
}

/// Supplies raw question bank text addressed by mode and difficulty.
#[async_trait]
pub trait BankSource: Send + Sync {
    /// Fetch the UTF-8 text of one bank.
    ///
    /// # Errors
    ///
    /// Returns `BankSourceError::NotFound` when no bank exists for the pair, or
    /// another `BankSourceError` when it cannot be read.
    async fn fetch(
        &self,
        mode: OperationMode,
        difficulty: Difficulty,
    ) -> Result<String, BankSourceError>;
}

/// Bank texts held in memory; used by tests and embedded banks.
#[derive(Clone, Default)]
pub struct InMemoryBankSource {
    banks: Arc<Mutex<HashMap<(OperationMode, Difficulty), String>>>,
}

impl InMemoryBankSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bank(
        self,
        mode: OperationMode,
        difficulty: Difficulty,
        text: impl Into<String>,
    ) -> Self {
        self.insert(mode, difficulty, text);
        self
    }

    /// Adds or replaces a bank.
    pub fn insert(&self, mode: OperationMode, difficulty: Difficulty, text: impl Into<String>) {
        // A poisoned lock still holds a usable map.
        let mut guard = match self.banks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.insert((mode, difficulty), text.into());
    }
}

#[async_trait]
impl BankSource for InMemoryBankSource {
    async fn fetch(
        &self,
        mode: OperationMode,
        difficulty: Difficulty,
    ) -> Result<String, BankSourceError> {
        let guard = self
            .banks
            .lock()
            .map_err(|e| BankSourceError::Unavailable(e.to_string()))?;
        guard
            .get(&(mode, difficulty))
            .cloned()
            .ok_or(BankSourceError::NotFound { mode, difficulty })
    }
}

/// Reads banks from `{root}/{mode}-{difficulty}.txt`.
#[derive(Debug, Clone)]
pub struct FsBankSource {
    root: PathBuf,
}

impl FsBankSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path_for(&self, mode: OperationMode, difficulty: Difficulty) -> PathBuf {
        self.root.join(resource_name(mode, difficulty))
    }
}

#[async_trait]
impl BankSource for FsBankSource {
    async fn fetch(
        &self,
        mode: OperationMode,
        difficulty: Difficulty,
    ) -> Result<String, BankSourceError> {
        let path = self.path_for(mode, difficulty);
        tracing::debug!(path = %path.display(), "reading question bank");
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(BankSourceError::NotFound { mode, difficulty })
            }
            Err(source) => Err(BankSourceError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_names_use_lowercase_keys() {
        assert_eq!(
            resource_name(OperationMode::Comparison, Difficulty::Easy),
            "comparison-easy.txt"
        );
        assert_eq!(
            resource_name(OperationMode::Simplification, Difficulty::Hard),
            "simplification-hard.txt"
        );
    }

    #[tokio::test]
    async fn in_memory_source_serves_inserted_banks() {
        let source = InMemoryBankSource::new().with_bank(
            OperationMode::Comparison,
            Difficulty::Easy,
            "1/2, 1/3\n",
        );
        let text = source
            .fetch(OperationMode::Comparison, Difficulty::Easy)
            .await
            .unwrap();
        assert_eq!(text, "1/2, 1/3\n");

        let missing = source
            .fetch(OperationMode::Comparison, Difficulty::Hard)
            .await
            .unwrap_err();
        assert!(matches!(missing, BankSourceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn fs_source_reads_named_files() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("simplification-advanced.txt"), "6/8\n-1 3/4\n")
            .await
            .unwrap();
        let source = FsBankSource::new(dir.path());

        let text = source
            .fetch(OperationMode::Simplification, Difficulty::Advanced)
            .await
            .unwrap();
        assert_eq!(text.lines().count(), 2);

        let missing = source
            .fetch(OperationMode::Simplification, Difficulty::Easy)
            .await
            .unwrap_err();
        assert!(matches!(
            missing,
            BankSourceError::NotFound {
                mode: OperationMode::Simplification,
                difficulty: Difficulty::Easy
            }
        ));
    }
}
