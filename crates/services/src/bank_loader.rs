use std::sync::Arc;
use std::time::Duration;

use drill_core::bank::{ParsedBank, parse_bank};
use drill_core::model::{Difficulty, OperationMode};
use storage::BankSource;

use crate::config::{DEFAULT_BANK_TIMEOUT, EngineConfig};
use crate::error::BankLoadError;

/// Fetches and parses question banks under a timeout.
#[derive(Clone)]
pub struct BankLoader {
    source: Arc<dyn BankSource>,
    timeout: Duration,
}

impl BankLoader {
    #[must_use]
    pub fn new(source: Arc<dyn BankSource>) -> Self {
        Self {
            source,
            timeout: DEFAULT_BANK_TIMEOUT,
        }
    }

    /// Loader using the configured `bank_timeout`.
    #[must_use]
    pub fn from_config(source: Arc<dyn BankSource>, config: &EngineConfig) -> Self {
        Self::new(source).with_timeout(config.bank_timeout)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch and parse the bank for `mode` at `difficulty`.
    ///
    /// Malformed lines are skipped by the parser; only a bank with no usable
    /// entry at all is an error.
    ///
    /// # Errors
    ///
    /// Returns `BankLoadError::Timeout` when the fetch exceeds the timeout,
    /// `BankLoadError::Fetch` when the source fails, and `BankLoadError::Empty`
    /// when no line parses.
    pub async fn load(
        &self,
        mode: OperationMode,
        difficulty: Difficulty,
    ) -> Result<ParsedBank, BankLoadError> {
        let text = match tokio::time::timeout(self.timeout, self.source.fetch(mode, difficulty))
            .await
        {
            Ok(Ok(text)) => text,
            Ok(Err(err)) => {
                tracing::warn!(%mode, %difficulty, %err, "question bank fetch failed");
                return Err(BankLoadError::Fetch(err.to_string()));
            }
            Err(_) => {
                tracing::warn!(%mode, %difficulty, timeout = ?self.timeout, "question bank fetch timed out");
                return Err(BankLoadError::Timeout(self.timeout));
            }
        };

        let bank = parse_bank(&text, mode.arity());
        if bank.entries.is_empty() {
            return Err(BankLoadError::Empty { mode, difficulty });
        }
        Ok(bank)
    }
}
