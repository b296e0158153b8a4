use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModeParseError {
    #[error("unknown operation mode: {0}")]
    UnknownMode(String),
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

//
// ─── OPERATION MODE ────────────────────────────────────────────────────────────
//

/// Kind of exercise a problem belongs to.
///
/// Variants are declared in level order: finishing one level for the first time
/// unlocks the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    Comparison,
    Simplification,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Conversion,
}

/// How many fractions a problem of a given mode is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandArity {
    Single,
    Pair,
}

impl OperandArity {
    #[must_use]
    pub fn count(self) -> usize {
        match self {
            OperandArity::Single => 1,
            OperandArity::Pair => 2,
        }
    }
}

impl OperationMode {
    pub const ALL: [OperationMode; 7] = [
        OperationMode::Comparison,
        OperationMode::Simplification,
        OperationMode::Addition,
        OperationMode::Subtraction,
        OperationMode::Multiplication,
        OperationMode::Division,
        OperationMode::Conversion,
    ];

    /// Stable lowercase identifier, also used as the progress level id.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OperationMode::Comparison => "comparison",
            OperationMode::Simplification => "simplification",
            OperationMode::Addition => "addition",
            OperationMode::Subtraction => "subtraction",
            OperationMode::Multiplication => "multiplication",
            OperationMode::Division => "division",
            OperationMode::Conversion => "conversion",
        }
    }

    #[must_use]
    pub fn arity(self) -> OperandArity {
        match self {
            OperationMode::Simplification | OperationMode::Conversion => OperandArity::Single,
            _ => OperandArity::Pair,
        }
    }

    /// Operator shown between the operands, if the mode has one.
    #[must_use]
    pub fn operator(self) -> Option<char> {
        match self {
            OperationMode::Addition => Some('+'),
            OperationMode::Subtraction => Some('-'),
            OperationMode::Multiplication => Some('×'),
            OperationMode::Division => Some('÷'),
            _ => None,
        }
    }

    /// The level unlocked by completing this one.
    #[must_use]
    pub fn next_level(self) -> Option<OperationMode> {
        let index = Self::ALL.iter().position(|mode| *mode == self)?;
        Self::ALL.get(index + 1).copied()
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ModeParseError::UnknownMode(s.to_string()))
    }
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Tier of an externally authored question bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Advanced,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Advanced, Difficulty::Hard];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Advanced => "advanced",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ModeParseError::UnknownDifficulty(s.to_string()))
    }
}
