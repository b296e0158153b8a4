//! Learner answer parsing and checking.
//!
//! Validation is pure: the same problem and input always give the same verdict.
//! A malformed input is an `Err` so callers can show it without counting an attempt.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::model::{Expected, Fraction, FractionError, MixedNumber, OperationMode, Problem, Relation};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// An input box on the answer form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Whole,
    Numerator,
    Denominator,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Whole => "whole",
            Field::Numerator => "numerator",
            Field::Denominator => "denominator",
        })
    }
}

/// Malformed learner input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputError {
    #[error("{0} is required")]
    Missing(Field),

    #[error("{field} must be a whole number, got {value:?}")]
    NotAnInteger { field: Field, value: String },

    #[error("denominator cannot be zero")]
    ZeroDenominator,

    #[error(transparent)]
    Fraction(#[from] FractionError),

    #[error("pick left, right or equal for a comparison")]
    ExpectedChoice,

    #[error("enter a fraction for this problem")]
    ExpectedFraction,
}

//
// ─── INPUT ─────────────────────────────────────────────────────────────────────
//

/// Answer exactly as typed or picked by the learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    Simple {
        numerator: String,
        denominator: String,
    },
    Mixed {
        whole: String,
        numerator: String,
        denominator: String,
    },
    Choice(Relation),
}

impl RawInput {
    #[must_use]
    pub fn simple(numerator: impl Into<String>, denominator: impl Into<String>) -> Self {
        RawInput::Simple {
            numerator: numerator.into(),
            denominator: denominator.into(),
        }
    }

    #[must_use]
    pub fn mixed(
        whole: impl Into<String>,
        numerator: impl Into<String>,
        denominator: impl Into<String>,
    ) -> Self {
        RawInput::Mixed {
            whole: whole.into(),
            numerator: numerator.into(),
            denominator: denominator.into(),
        }
    }

    #[must_use]
    pub fn choice(relation: Relation) -> Self {
        RawInput::Choice(relation)
    }
}

/// Parsed learner answer. Fractions keep the typed (possibly unreduced) parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Fraction(Fraction),
    Relation(Relation),
}

//
// ─── VERDICT ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hint {
    /// Shown before any submission when the raw result of the problem reduces.
    CanBeSimplified,
    /// The submitted value is right but not in lowest terms.
    CorrectButUnreduced,
}

impl Hint {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Hint::CanBeSimplified => "The answer can be simplified.",
            Hint::CorrectButUnreduced => "Correct, but the answer can be simplified.",
        }
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub correct: bool,
    pub hint: Option<Hint>,
}

impl Verdict {
    fn incorrect() -> Self {
        Self {
            correct: false,
            hint: None,
        }
    }
}

//
// ─── PARSING ───────────────────────────────────────────────────────────────────
//

/// Parses the raw form into an exact value.
///
/// Mixed input: an empty whole counts as `0`; a leading `-` on the whole part
/// (`-0` included) makes the whole value negative and the numerator is then a
/// non-negative magnitude.
///
/// # Errors
///
/// Returns an `InputError` for missing or non-integer fields, a zero
/// denominator, or a negative numerator next to a signed or non-zero whole.
pub fn parse_input(input: &RawInput) -> Result<Answer, InputError> {
    match input {
        RawInput::Choice(relation) => Ok(Answer::Relation(*relation)),
        RawInput::Simple {
            numerator,
            denominator,
        } => {
            let numerator = parse_field(Field::Numerator, numerator)?;
            let denominator = parse_denominator(denominator)?;
            Ok(Answer::Fraction(Fraction::new(numerator, denominator)?))
        }
        RawInput::Mixed {
            whole,
            numerator,
            denominator,
        } => {
            let numerator = parse_field(Field::Numerator, numerator)?;
            let denominator = parse_denominator(denominator)?;
            let whole = whole.trim();
            let mixed = if whole.is_empty() {
                MixedNumber::new(0, numerator, denominator)?
            } else {
                let (negative, magnitude) = match whole.strip_prefix('-') {
                    Some(rest) => (true, rest),
                    None => (false, whole.strip_prefix('+').unwrap_or(whole)),
                };
                let magnitude = parse_field(Field::Whole, magnitude)?;
                if !negative && magnitude == 0 {
                    MixedNumber::new(0, numerator, denominator)?
                } else {
                    MixedNumber::from_magnitudes(negative, magnitude, numerator, denominator)?
                }
            };
            Ok(Answer::Fraction(mixed.to_fraction()?))
        }
    }
}

fn parse_field(field: Field, text: &str) -> Result<i64, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InputError::Missing(field));
    }
    trimmed.parse().map_err(|_| InputError::NotAnInteger {
        field,
        value: trimmed.to_string(),
    })
}

fn parse_denominator(text: &str) -> Result<i64, InputError> {
    match parse_field(Field::Denominator, text)? {
        0 => Err(InputError::ZeroDenominator),
        denominator => Ok(denominator),
    }
}

//
// ─── VALIDATION ────────────────────────────────────────────────────────────────
//

/// Checks `input` against the problem's canonical answer.
///
/// Fraction answers are correct when their normalized form equals the expected
/// one. A correct but unreduced fraction earns `Hint::CorrectButUnreduced`,
/// except in conversion problems where the unreduced form is the point.
///
/// # Errors
///
/// Returns `InputError` when the input cannot be parsed or has the wrong shape
/// for the problem (a fraction for a comparison, or the reverse).
pub fn validate(problem: &Problem, input: &RawInput) -> Result<Verdict, InputError> {
    match (problem.expected(), parse_input(input)?) {
        (Expected::Relation(expected), Answer::Relation(given)) => Ok(Verdict {
            correct: expected == given,
            hint: None,
        }),
        (Expected::Relation(_), Answer::Fraction(_)) => Err(InputError::ExpectedChoice),
        (Expected::Fraction(_), Answer::Relation(_)) => Err(InputError::ExpectedFraction),
        (Expected::Fraction(expected), Answer::Fraction(given)) => {
            let reduced = given.normalize();
            if reduced != expected {
                return Ok(Verdict::incorrect());
            }
            let unreduced =
                reduced != given && problem.mode() != OperationMode::Conversion;
            Ok(Verdict {
                correct: true,
                hint: unreduced.then_some(Hint::CorrectButUnreduced),
            })
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::build_problem;
    use crate::model::Operands;

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    fn addition(l: Fraction, r: Fraction) -> Problem {
        build_problem(OperationMode::Addition, Operands::pair(l, r), None).unwrap()
    }

    #[test]
    fn simple_and_mixed_forms_of_the_same_value_agree() {
        let problem = addition(frac(1, 2), frac(1, 4));

        let simple = validate(&problem, &RawInput::simple("3", "4")).unwrap();
        let mixed = validate(&problem, &RawInput::mixed("0", "3", "4")).unwrap();
        let empty_whole = validate(&problem, &RawInput::mixed("", "3", "4")).unwrap();

        for verdict in [simple, mixed, empty_whole] {
            assert!(verdict.correct);
            assert_eq!(verdict.hint, None);
        }
    }

    #[test]
    fn unreduced_correct_answer_gets_hint() {
        let problem = addition(frac(1, 4), frac(1, 4));
        let verdict = validate(&problem, &RawInput::simple("2", "4")).unwrap();
        assert_eq!(
            verdict,
            Verdict {
                correct: true,
                hint: Some(Hint::CorrectButUnreduced)
            }
        );
    }

    #[test]
    fn wrong_value_is_incorrect_without_hint() {
        let problem = addition(frac(1, 4), frac(1, 4));
        let verdict = validate(&problem, &RawInput::simple("1", "3")).unwrap();
        assert_eq!(verdict, Verdict::incorrect());
    }

    #[test]
    fn improper_answers_accept_mixed_input() {
        let problem = addition(frac(3, 4), frac(3, 4));
        assert!(validate(&problem, &RawInput::mixed("1", "1", "2")).unwrap().correct);
        assert!(validate(&problem, &RawInput::simple(" 6 ", "4")).unwrap().correct);
    }

    #[test]
    fn negative_mixed_input_carries_sign_from_whole() {
        let problem =
            build_problem(OperationMode::Subtraction, Operands::pair(frac(1, 4), frac(3, 4)), None)
                .unwrap();
        assert_eq!(problem.expected_fraction(), Some(frac(-1, 2)));

        assert!(validate(&problem, &RawInput::mixed("-0", "1", "2")).unwrap().correct);
        assert!(validate(&problem, &RawInput::mixed("", "-1", "2")).unwrap().correct);
        assert!(validate(&problem, &RawInput::simple("-1", "2")).unwrap().correct);
        assert!(validate(&problem, &RawInput::simple("1", "-2")).unwrap().correct);

        assert_eq!(
            parse_input(&RawInput::mixed("-1", "3", "4")).unwrap(),
            Answer::Fraction(frac(-7, 4))
        );
    }

    #[test]
    fn malformed_input_is_an_error() {
        let problem = addition(frac(1, 4), frac(1, 4));
        assert_eq!(
            validate(&problem, &RawInput::simple("1", "0")),
            Err(InputError::ZeroDenominator)
        );
        assert_eq!(
            validate(&problem, &RawInput::simple("", "4")),
            Err(InputError::Missing(Field::Numerator))
        );
        assert_eq!(
            validate(&problem, &RawInput::simple("x", "4")),
            Err(InputError::NotAnInteger {
                field: Field::Numerator,
                value: "x".into()
            })
        );
        assert_eq!(
            validate(&problem, &RawInput::mixed("-1", "-1", "2")),
            Err(InputError::Fraction(FractionError::NegativeMixedPart))
        );
        assert_eq!(
            validate(&problem, &RawInput::mixed("1", "1", "-2")),
            Err(InputError::Fraction(FractionError::NegativeMixedPart))
        );
        assert_eq!(
            validate(&problem, &RawInput::choice(Relation::Equal)),
            Err(InputError::ExpectedFraction)
        );
    }

    #[test]
    fn extreme_integers_are_rejected_without_panicking() {
        let problem = addition(frac(1, 4), frac(1, 4));
        let min = i64::MIN.to_string();
        let overflow = Err(InputError::Fraction(FractionError::Overflow));

        assert_eq!(validate(&problem, &RawInput::simple("1", min.as_str())), overflow);
        assert_eq!(validate(&problem, &RawInput::simple(min.as_str(), "-1")), overflow);
        assert_eq!(
            validate(&problem, &RawInput::simple(min.as_str(), min.as_str())),
            overflow
        );
        assert_eq!(
            validate(&problem, &RawInput::mixed("", min.as_str(), "2")),
            overflow
        );
        assert_eq!(
            validate(&problem, &RawInput::mixed("-1", &i64::MAX.to_string(), "1")),
            overflow
        );
        assert!(matches!(
            validate(&problem, &RawInput::mixed(min.as_str(), "1", "2")),
            Err(InputError::NotAnInteger { .. })
        ));
    }

    #[test]
    fn comparison_checks_relation() {
        let problem =
            build_problem(OperationMode::Comparison, Operands::pair(frac(2, 3), frac(1, 2)), None)
                .unwrap();
        let right: Relation = "left".parse().unwrap();
        assert!(validate(&problem, &RawInput::choice(right)).unwrap().correct);
        assert!(!validate(&problem, &RawInput::choice(Relation::Equal)).unwrap().correct);
        assert_eq!(
            validate(&problem, &RawInput::simple("2", "3")),
            Err(InputError::ExpectedChoice)
        );
    }

    #[test]
    fn conversion_accepts_target_form_without_hint() {
        let problem =
            build_problem(OperationMode::Conversion, Operands::single(frac(3, 4)), Some(12)).unwrap();
        let verdict = validate(&problem, &RawInput::simple("9", "12")).unwrap();
        assert_eq!(
            verdict,
            Verdict {
                correct: true,
                hint: None
            }
        );
    }

    #[test]
    fn simplification_rejects_wrong_value() {
        let problem =
            build_problem(OperationMode::Simplification, Operands::single(frac(6, 8)), None).unwrap();
        assert!(validate(&problem, &RawInput::simple("3", "4")).unwrap().correct);
        assert!(!validate(&problem, &RawInput::simple("6", "7")).unwrap().correct);
    }
}
