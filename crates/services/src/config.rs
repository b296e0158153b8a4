use std::env;
use std::time::Duration;

use drill_core::SessionSettings;

/// Default time allowed for fetching a question bank.
pub const DEFAULT_BANK_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime configuration for the session engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub settings: SessionSettings,
    pub bank_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settings: SessionSettings::default(),
            bank_timeout: DEFAULT_BANK_TIMEOUT,
        }
    }
}

impl EngineConfig {
    /// Reads `DRILL_QUESTION_COUNT` and `DRILL_BANK_TIMEOUT_SECS`.
    ///
    /// Unset or invalid values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with a custom variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("DRILL_QUESTION_COUNT") {
            match raw
                .trim()
                .parse::<u32>()
                .ok()
                .and_then(|count| config.settings.clone().with_question_count(count).ok())
            {
                Some(settings) => config.settings = settings,
                None => tracing::warn!(value = %raw, "ignoring invalid DRILL_QUESTION_COUNT"),
            }
        }

        if let Some(raw) = lookup("DRILL_BANK_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.bank_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %raw, "ignoring invalid DRILL_BANK_TIMEOUT_SECS"),
            }
        }

        config
    }
}
