//! Question bank text format.
//!
//! One entry per line, `[whole " "] numerator "/" denominator`, with two such
//! fractions joined by `,` for pair modes:
//!
//! ```text
//! 2 1/3, 4/5
//! -1 3/4
//! 7/2
//! ```

use thiserror::Error;

use crate::model::{Fraction, FractionError, MixedNumber, OperandArity, Operands};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankLineError {
    #[error("missing '/' in {0:?}")]
    MissingSlash(String),

    #[error("not a number: {0:?}")]
    NotANumber(String),

    #[error("denominator cannot be zero")]
    ZeroDenominator,

    #[error("expected {expected} fraction(s) per line, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error(transparent)]
    Fraction(#[from] FractionError),
}

/// A line that was dropped while parsing a bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based.
    pub line_number: usize,
    pub content: String,
    pub error: BankLineError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBank {
    pub entries: Vec<Operands>,
    pub skipped: Vec<SkippedLine>,
}

/// Parses one fraction token, plain (`-3/4`) or mixed (`-1 3/4`).
///
/// # Errors
///
/// Returns `BankLineError` if the token does not follow the grammar.
pub fn parse_mixed_fraction(token: &str) -> Result<Fraction, BankLineError> {
    let token = token.trim();
    let parts: Vec<&str> = token.split_whitespace().collect();
    let (whole, fraction) = match parts.as_slice() {
        [fraction] => (None, *fraction),
        [whole, fraction] => (Some(*whole), *fraction),
        _ => return Err(BankLineError::NotANumber(token.to_string())),
    };

    let (numerator, denominator) = fraction
        .split_once('/')
        .ok_or_else(|| BankLineError::MissingSlash(token.to_string()))?;
    let numerator = parse_number(numerator)?;
    let denominator = parse_number(denominator)?;
    if denominator == 0 {
        return Err(BankLineError::ZeroDenominator);
    }

    match whole {
        None => Ok(Fraction::new(numerator, denominator)?),
        Some(whole) => {
            let (negative, magnitude) = match whole.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, whole),
            };
            let magnitude = parse_number(magnitude)?;
            let mixed = MixedNumber::from_magnitudes(negative, magnitude, numerator, denominator)?;
            Ok(mixed.to_fraction()?)
        }
    }
}

fn parse_number(text: &str) -> Result<i64, BankLineError> {
    let text = text.trim();
    text.parse()
        .map_err(|_| BankLineError::NotANumber(text.to_string()))
}

/// Parses a single bank line into operands of the given arity.
///
/// # Errors
///
/// Returns `BankLineError::FieldCount` when the number of comma-separated
/// fractions does not match `arity`, or the first fraction error found.
pub fn parse_line(line: &str, arity: OperandArity) -> Result<Operands, BankLineError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != arity.count() {
        return Err(BankLineError::FieldCount {
            expected: arity.count(),
            found: fields.len(),
        });
    }
    match fields.as_slice() {
        [value] => Ok(Operands::single(parse_mixed_fraction(value)?)),
        [left, right] => Ok(Operands::pair(
            parse_mixed_fraction(left)?,
            parse_mixed_fraction(right)?,
        )),
        _ => Err(BankLineError::FieldCount {
            expected: arity.count(),
            found: fields.len(),
        }),
    }
}

/// Parses a whole bank. Blank lines are ignored; malformed lines are logged and
/// skipped so the rest of the bank still loads.
#[must_use]
pub fn parse_bank(text: &str, arity: OperandArity) -> ParsedBank {
    let mut bank = ParsedBank::default();
    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let content = line.trim();
        if content.is_empty() {
            continue;
        }
        match parse_line(content, arity) {
            Ok(operands) => bank.entries.push(operands),
            Err(error) => {
                tracing::warn!("skipping bank line {}: {} ({:?})", line_number, error, content);
                bank.skipped.push(SkippedLine {
                    line_number,
                    content: content.to_string(),
                    error,
                });
            }
        }
    }
    bank
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::build_problem;
    use crate::model::{OperationMode, Relation};

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    #[test]
    fn parses_mixed_pair_line() {
        let operands = parse_line("1 2/3, 4/5", OperandArity::Pair).unwrap();
        assert_eq!(operands, Operands::pair(frac(5, 3), frac(4, 5)));

        let problem = build_problem(OperationMode::Comparison, operands, None).unwrap();
        assert_eq!(problem.expected_relation(), Some(Relation::Greater));
    }

    #[test]
    fn parses_signed_single_entries() {
        assert_eq!(parse_mixed_fraction("-1 3/4").unwrap(), frac(-7, 4));
        assert_eq!(parse_mixed_fraction("-0 1/2").unwrap(), frac(-1, 2));
        assert_eq!(parse_mixed_fraction(" 7/2 ").unwrap(), frac(7, 2));
        assert_eq!(parse_mixed_fraction("-3/4").unwrap(), frac(-3, 4));
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert_eq!(
            parse_mixed_fraction("3"),
            Err(BankLineError::MissingSlash("3".into()))
        );
        assert_eq!(
            parse_mixed_fraction("abc/4"),
            Err(BankLineError::NotANumber("abc".into()))
        );
        assert_eq!(parse_mixed_fraction("1/0"), Err(BankLineError::ZeroDenominator));
        assert_eq!(
            parse_mixed_fraction("1 -1/2"),
            Err(BankLineError::Fraction(FractionError::NegativeMixedPart))
        );
        assert_eq!(
            parse_line("1/2", OperandArity::Pair),
            Err(BankLineError::FieldCount {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            parse_line("1/2, 1/3", OperandArity::Single),
            Err(BankLineError::FieldCount {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn bank_skips_bad_lines_and_keeps_the_rest() {
        let text = "1 2/3, 4/5\n\nabc, 4/5\n  \n1/2, 1/3\n1/0, 1/2\n";
        let bank = parse_bank(text, OperandArity::Pair);

        assert_eq!(
            bank.entries,
            vec![
                Operands::pair(frac(5, 3), frac(4, 5)),
                Operands::pair(frac(1, 2), frac(1, 3)),
            ]
        );
        let skipped: Vec<usize> = bank.skipped.iter().map(|s| s.line_number).collect();
        assert_eq!(skipped, vec![3, 6]);
        assert_eq!(bank.skipped[0].content, "abc, 4/5");
    }

    #[test]
    fn empty_text_yields_empty_bank() {
        assert_eq!(parse_bank("", OperandArity::Single), ParsedBank::default());
    }
}
