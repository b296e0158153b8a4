use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::fraction::Fraction;
use crate::model::mode::{OperandArity, OperationMode};

//
// ─── RELATION ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown comparison answer: {0}")]
pub struct RelationParseError(pub String);

/// How the left operand of a comparison relates to the right one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Less,
    Equal,
    Greater,
}

impl Relation {
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Relation::Less => '<',
            Relation::Equal => '=',
            Relation::Greater => '>',
        }
    }

    /// Which side holds the larger value: `left`, `right` or `equal`.
    #[must_use]
    pub fn larger_side(self) -> &'static str {
        match self {
            Relation::Less => "right",
            Relation::Equal => "equal",
            Relation::Greater => "left",
        }
    }
}

impl From<Ordering> for Relation {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Relation::Less,
            Ordering::Equal => Relation::Equal,
            Ordering::Greater => Relation::Greater,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Accepts either the symbol (`<`, `=`, `>`) or the larger side
/// (`left`, `right`, `equal`).
impl FromStr for Relation {
    type Err = RelationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "<" | "right" | "less" => Ok(Relation::Less),
            "=" | "equal" => Ok(Relation::Equal),
            ">" | "left" | "greater" => Ok(Relation::Greater),
            _ => Err(RelationParseError(s.to_string())),
        }
    }
}

//
// ─── OPERANDS & EXPECTED ANSWER ────────────────────────────────────────────────
//

/// The fractions a problem is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Operands {
    Single { value: Fraction },
    Pair { left: Fraction, right: Fraction },
}

impl Operands {
    #[must_use]
    pub fn single(value: Fraction) -> Self {
        Operands::Single { value }
    }

    #[must_use]
    pub fn pair(left: Fraction, right: Fraction) -> Self {
        Operands::Pair { left, right }
    }

    #[must_use]
    pub fn arity(&self) -> OperandArity {
        match self {
            Operands::Single { .. } => OperandArity::Single,
            Operands::Pair { .. } => OperandArity::Pair,
        }
    }

    #[must_use]
    pub fn first(&self) -> Fraction {
        match self {
            Operands::Single { value } => *value,
            Operands::Pair { left, .. } => *left,
        }
    }
}

/// Canonical answer the validator compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Expected {
    Fraction(Fraction),
    Relation(Relation),
}

//
// ─── PROBLEM ───────────────────────────────────────────────────────────────────
//

/// One generated exercise and its canonical answer.
///
/// Built only by the generator, which guarantees the expected fraction is the
/// reduced exact result of the operation on the operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    mode: OperationMode,
    operands: Operands,
    target_denominator: Option<i64>,
    expected: Expected,
    raw_answer: Option<Fraction>,
    has_simplifiable_raw_answer: bool,
}

impl Problem {
    pub(crate) fn new(
        mode: OperationMode,
        operands: Operands,
        target_denominator: Option<i64>,
        expected: Expected,
        raw_answer: Option<Fraction>,
    ) -> Self {
        let has_simplifiable_raw_answer =
            raw_answer.is_some_and(|raw| raw != raw.normalize());
        Self {
            mode,
            operands,
            target_denominator,
            expected,
            raw_answer,
            has_simplifiable_raw_answer,
        }
    }

    #[must_use]
    pub fn mode(&self) -> OperationMode {
        self.mode
    }

    #[must_use]
    pub fn operands(&self) -> &Operands {
        &self.operands
    }

    /// Denominator a conversion problem asks for.
    #[must_use]
    pub fn target_denominator(&self) -> Option<i64> {
        self.target_denominator
    }

    #[must_use]
    pub fn expected(&self) -> Expected {
        self.expected
    }

    #[must_use]
    pub fn expected_fraction(&self) -> Option<Fraction> {
        match self.expected {
            Expected::Fraction(value) => Some(value),
            Expected::Relation(_) => None,
        }
    }

    #[must_use]
    pub fn expected_relation(&self) -> Option<Relation> {
        match self.expected {
            Expected::Relation(relation) => Some(relation),
            Expected::Fraction(_) => None,
        }
    }

    /// The result as computed before reduction (`2/4` for `1/4 + 1/4`).
    #[must_use]
    pub fn raw_answer(&self) -> Option<Fraction> {
        self.raw_answer
    }

    #[must_use]
    pub fn has_simplifiable_raw_answer(&self) -> bool {
        self.has_simplifiable_raw_answer
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.mode, &self.operands) {
            (OperationMode::Conversion, Operands::Single { value }) => {
                let target = self.target_denominator.unwrap_or(value.denominator());
                write!(f, "convert {value} to a denominator of {target}")
            }
            (OperationMode::Comparison, Operands::Pair { left, right }) => {
                write!(f, "compare {left} ? {right}")
            }
            (mode, Operands::Pair { left, right }) => match mode.operator() {
                Some(op) => write!(f, "{left} {op} {right}"),
                None => write!(f, "{left}, {right}"),
            },
            (_, Operands::Single { value }) => write!(f, "simplify {value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_parses_symbols_and_sides() {
        assert_eq!("left".parse::<Relation>().unwrap(), Relation::Greater);
        assert_eq!("right".parse::<Relation>().unwrap(), Relation::Less);
        assert_eq!(" = ".parse::<Relation>().unwrap(), Relation::Equal);
        assert_eq!(">".parse::<Relation>().unwrap(), Relation::Greater);
        assert!("maybe".parse::<Relation>().is_err());
    }

    #[test]
    fn relation_from_ordering() {
        assert_eq!(Relation::from(Ordering::Greater).larger_side(), "left");
        assert_eq!(Relation::from(Ordering::Less).symbol(), '<');
    }

    #[test]
    fn simplifiable_flag_tracks_raw_answer() {
        let raw = Fraction::new(2, 4).unwrap();
        let problem = Problem::new(
            OperationMode::Addition,
            Operands::pair(Fraction::new(1, 4).unwrap(), Fraction::new(1, 4).unwrap()),
            None,
            Expected::Fraction(raw.normalize()),
            Some(raw),
        );
        assert!(problem.has_simplifiable_raw_answer());
        assert_eq!(problem.to_string(), "1/4 + 1/4");
    }
}
