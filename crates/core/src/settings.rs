use thiserror::Error;

use crate::model::OperationMode;
use crate::scoring::ScoringPolicy;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("question count must be > 0")]
    InvalidQuestionCount,

    #[error("denominator range must satisfy 2 <= min <= max, got {min}..={max}")]
    InvalidDenominatorRange { min: i64, max: i64 },

    #[error("conversion multiplier must be >= 1, got {0}")]
    InvalidConversionMultiplier(i64),
}

//
// ─── GENERATOR CONFIG ──────────────────────────────────────────────────────────
//

/// Bounds used when sampling random operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    min_denominator: i64,
    max_denominator: i64,
    max_conversion_multiplier: i64,
}

impl Default for GeneratorConfig {
    /// Proper fractions over denominators 2..=12; conversion targets up to ×20.
    fn default() -> Self {
        Self {
            min_denominator: 2,
            max_denominator: 12,
            max_conversion_multiplier: 20,
        }
    }
}

impl GeneratorConfig {
    /// # Errors
    ///
    /// Returns `SettingsError` when the denominator range is empty or starts below 2,
    /// or when the multiplier is below 1.
    pub fn new(
        min_denominator: i64,
        max_denominator: i64,
        max_conversion_multiplier: i64,
    ) -> Result<Self, SettingsError> {
        if min_denominator < 2 || min_denominator > max_denominator {
            return Err(SettingsError::InvalidDenominatorRange {
                min: min_denominator,
                max: max_denominator,
            });
        }
        if max_conversion_multiplier < 1 {
            return Err(SettingsError::InvalidConversionMultiplier(
                max_conversion_multiplier,
            ));
        }
        Ok(Self {
            min_denominator,
            max_denominator,
            max_conversion_multiplier,
        })
    }

    #[must_use]
    pub fn min_denominator(&self) -> i64 {
        self.min_denominator
    }

    #[must_use]
    pub fn max_denominator(&self) -> i64 {
        self.max_denominator
    }

    #[must_use]
    pub fn max_conversion_multiplier(&self) -> i64 {
        self.max_conversion_multiplier
    }
}

//
// ─── SESSION SETTINGS ──────────────────────────────────────────────────────────
//

/// Configuration for one quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    question_count: u32,
    generator: GeneratorConfig,
    scoring: Option<ScoringPolicy>,
}

impl Default for SessionSettings {
    /// 20 questions, default generator bounds, per-mode scoring.
    fn default() -> Self {
        Self {
            question_count: 20,
            generator: GeneratorConfig::default(),
            scoring: None,
        }
    }
}

impl SessionSettings {
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidQuestionCount` if `question_count` is zero.
    pub fn new(
        question_count: u32,
        generator: GeneratorConfig,
        scoring: Option<ScoringPolicy>,
    ) -> Result<Self, SettingsError> {
        if question_count == 0 {
            return Err(SettingsError::InvalidQuestionCount);
        }
        Ok(Self {
            question_count,
            generator,
            scoring,
        })
    }

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidQuestionCount` if `question_count` is zero.
    pub fn with_question_count(mut self, question_count: u32) -> Result<Self, SettingsError> {
        if question_count == 0 {
            return Err(SettingsError::InvalidQuestionCount);
        }
        self.question_count = question_count;
        Ok(self)
    }

    /// Forces one scoring policy for every mode.
    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringPolicy) -> Self {
        self.scoring = Some(scoring);
        self
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn generator(&self) -> GeneratorConfig {
        self.generator
    }

    /// The override if one was set, otherwise the mode's default policy.
    #[must_use]
    pub fn scoring_for(&self, mode: OperationMode) -> ScoringPolicy {
        self.scoring
            .unwrap_or_else(|| ScoringPolicy::for_mode(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_drill_layout() {
        let settings = SessionSettings::default();
        assert_eq!(settings.question_count(), 20);
        assert_eq!(settings.generator().min_denominator(), 2);
        assert_eq!(settings.generator().max_denominator(), 12);
        assert_eq!(settings.generator().max_conversion_multiplier(), 20);
    }

    #[test]
    fn rejects_invalid_values() {
        assert_eq!(
            SessionSettings::new(0, GeneratorConfig::default(), None),
            Err(SettingsError::InvalidQuestionCount)
        );
        assert!(matches!(
            GeneratorConfig::new(1, 12, 20),
            Err(SettingsError::InvalidDenominatorRange { .. })
        ));
        assert!(matches!(
            GeneratorConfig::new(8, 4, 20),
            Err(SettingsError::InvalidDenominatorRange { .. })
        ));
        assert_eq!(
            GeneratorConfig::new(2, 12, 0),
            Err(SettingsError::InvalidConversionMultiplier(0))
        );
    }

    #[test]
    fn scoring_override_applies_to_every_mode() {
        let settings = SessionSettings::default().with_scoring(ScoringPolicy::Flat);
        for mode in OperationMode::ALL {
            assert_eq!(settings.scoring_for(mode), ScoringPolicy::Flat);
        }
        let defaults = SessionSettings::default();
        assert_eq!(
            defaults.scoring_for(OperationMode::Comparison),
            ScoringPolicy::Tiered
        );
    }
}
