//! Problem generation for every operation mode.
//!
//! Random and bank-sourced problems go through the same [`build_problem`], so
//! the expected answer is always computed by exact fraction arithmetic no matter
//! where the operands came from.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::model::{
    Expected, Fraction, FractionError, OperandArity, Operands, OperationMode, Problem,
};
use crate::settings::GeneratorConfig;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GenerateError {
    #[error(transparent)]
    Fraction(#[from] FractionError),

    #[error("{mode} problems take {expected} operand(s), got {found}")]
    OperandArity {
        mode: OperationMode,
        expected: usize,
        found: usize,
    },

    #[error("conversion problems need a target denominator")]
    MissingTargetDenominator,

    #[error("question bank has no usable entries")]
    EmptyBank,
}

//
// ─── SOURCE ────────────────────────────────────────────────────────────────────
//

/// Where a session's operands come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemSource {
    /// Proper fractions sampled from the configured denominator range.
    Random,
    /// Pre-parsed operands from a question bank; shuffled before use.
    Bank(Vec<Operands>),
}

//
// ─── BUILD ─────────────────────────────────────────────────────────────────────
//

/// Computes the canonical answer for `operands` under `mode`.
///
/// `target_denominator` is required for conversion problems and ignored otherwise.
///
/// # Errors
///
/// Returns `GenerateError::OperandArity` when the operand count does not fit the
/// mode, `GenerateError::MissingTargetDenominator` for a conversion without a
/// target, and `GenerateError::Fraction` for arithmetic failures (a zero divisor,
/// an incompatible conversion target, overflow).
pub fn build_problem(
    mode: OperationMode,
    operands: Operands,
    target_denominator: Option<i64>,
) -> Result<Problem, GenerateError> {
    let problem = match (mode, operands) {
        (OperationMode::Comparison, Operands::Pair { left, right }) => Problem::new(
            mode,
            operands,
            None,
            Expected::Relation(left.compare(&right).into()),
            None,
        ),
        (OperationMode::Addition, Operands::Pair { left, right }) => {
            with_raw_answer(mode, operands, None, left.unreduced_sum(&right)?)
        }
        (OperationMode::Subtraction, Operands::Pair { left, right }) => {
            with_raw_answer(mode, operands, None, left.unreduced_difference(&right)?)
        }
        (OperationMode::Multiplication, Operands::Pair { left, right }) => {
            with_raw_answer(mode, operands, None, left.unreduced_product(&right)?)
        }
        (OperationMode::Division, Operands::Pair { left, right }) => {
            with_raw_answer(mode, operands, None, left.unreduced_quotient(&right)?)
        }
        (OperationMode::Simplification, Operands::Single { value }) => {
            with_raw_answer(mode, operands, None, value)
        }
        (OperationMode::Conversion, Operands::Single { value }) => {
            let target = target_denominator.ok_or(GenerateError::MissingTargetDenominator)?;
            let converted = value.convert_to_denominator(target)?;
            with_raw_answer(mode, operands, Some(target), converted)
        }
        (mode, operands) => {
            return Err(GenerateError::OperandArity {
                mode,
                expected: mode.arity().count(),
                found: operands.arity().count(),
            });
        }
    };
    Ok(problem)
}

fn with_raw_answer(
    mode: OperationMode,
    operands: Operands,
    target_denominator: Option<i64>,
    raw: Fraction,
) -> Problem {
    let expected = raw.normalize();
    debug_assert!(expected.is_in_simplest_form() && expected.denominator() > 0);
    Problem::new(
        mode,
        operands,
        target_denominator,
        Expected::Fraction(expected),
        Some(raw),
    )
}

//
// ─── GENERATOR ─────────────────────────────────────────────────────────────────
//

/// Produces problems for one mode from an injected random source.
///
/// Seed it (`Generator::seeded`) to reproduce a problem sequence exactly.
#[derive(Debug, Clone)]
pub struct Generator<R = StdRng> {
    mode: OperationMode,
    config: GeneratorConfig,
    rng: R,
}

impl Generator<StdRng> {
    #[must_use]
    pub fn seeded(mode: OperationMode, config: GeneratorConfig, seed: u64) -> Self {
        Self::new(mode, config, StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn from_os_rng(mode: OperationMode, config: GeneratorConfig) -> Self {
        Self::new(mode, config, StdRng::from_os_rng())
    }
}

impl<R: Rng> Generator<R> {
    #[must_use]
    pub fn new(mode: OperationMode, config: GeneratorConfig, rng: R) -> Self {
        Self { mode, config, rng }
    }

    #[must_use]
    pub fn mode(&self) -> OperationMode {
        self.mode
    }

    #[must_use]
    pub fn config(&self) -> GeneratorConfig {
        self.config
    }

    /// A proper fraction `n/d` with `d` in the configured range and `0 < n < d`.
    pub fn random_fraction(&mut self) -> Fraction {
        let denominator = self
            .rng
            .random_range(self.config.min_denominator()..=self.config.max_denominator());
        let numerator = self.rng.random_range(1..denominator);
        Fraction::new_unchecked(numerator, denominator)
    }

    /// Builds one random problem.
    ///
    /// # Errors
    ///
    /// Random operands never violate arithmetic preconditions; an error here is a
    /// bug and is logged before being returned.
    pub fn next_problem(&mut self) -> Result<Problem, GenerateError> {
        let operands = match self.mode.arity() {
            OperandArity::Single => Operands::single(self.random_fraction()),
            OperandArity::Pair => Operands::pair(self.random_fraction(), self.random_fraction()),
        };
        let mode = self.mode;
        self.problem_from(operands).inspect_err(|err| {
            tracing::error!(%mode, ?operands, %err, "random operands broke a generator invariant");
        })
    }

    /// Builds a problem from supplied operands, drawing a conversion target if needed.
    ///
    /// # Errors
    ///
    /// See [`build_problem`].
    pub fn problem_from(&mut self, operands: Operands) -> Result<Problem, GenerateError> {
        let target = match self.mode {
            OperationMode::Conversion => Some(self.conversion_target(&operands.first())?),
            _ => None,
        };
        build_problem(self.mode, operands, target)
    }

    /// Builds up to `count` problems from `source`.
    ///
    /// Bank entries are shuffled (Fisher-Yates) and taken in order; entries that
    /// cannot form a problem for this mode are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::EmptyBank` when a bank yields no problem at all, or
    /// the first error from random generation.
    pub fn problems(
        &mut self,
        source: ProblemSource,
        count: usize,
    ) -> Result<Vec<Problem>, GenerateError> {
        match source {
            ProblemSource::Random => (0..count).map(|_| self.next_problem()).collect(),
            ProblemSource::Bank(mut entries) => {
                entries.shuffle(&mut self.rng);
                let mut problems = Vec::with_capacity(count.min(entries.len()));
                for operands in entries {
                    if problems.len() == count {
                        break;
                    }
                    match self.problem_from(operands) {
                        Ok(problem) => problems.push(problem),
                        Err(err) => {
                            tracing::warn!(mode = %self.mode, %err, "skipping unusable bank entry");
                        }
                    }
                }
                if problems.is_empty() {
                    return Err(GenerateError::EmptyBank);
                }
                Ok(problems)
            }
        }
    }

    fn conversion_target(&mut self, value: &Fraction) -> Result<i64, GenerateError> {
        let factor = self
            .rng
            .random_range(1..=self.config.max_conversion_multiplier());
        value
            .denominator()
            .checked_abs()
            .and_then(|denominator| denominator.checked_mul(factor))
            .ok_or(GenerateError::Fraction(FractionError::Overflow))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
