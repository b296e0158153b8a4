use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::fraction::{Fraction, FractionError};

/// Whole-plus-proper-fraction presentation of a rational value.
///
/// When `whole` is non-zero the numerator is a non-negative magnitude and the
/// sign of `whole` applies to the entire value (`-1 3/4` is `-7/4`). When `whole`
/// is zero the numerator carries the sign, so `-1/2` is `0 -1/2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MixedNumber {
    whole: i64,
    numerator: i64,
    denominator: i64,
}

impl MixedNumber {
    /// # Errors
    ///
    /// Returns `FractionError::InvalidFraction` for a zero denominator and
    /// `FractionError::NegativeMixedPart` for a negative denominator, or a
    /// negative numerator alongside a non-zero whole part.
    pub fn new(whole: i64, numerator: i64, denominator: i64) -> Result<Self, FractionError> {
        if denominator == 0 {
            return Err(FractionError::InvalidFraction);
        }
        if denominator < 0 || (whole != 0 && numerator < 0) {
            return Err(FractionError::NegativeMixedPart);
        }
        Ok(Self::from_parts_unchecked(whole, numerator, denominator))
    }

    /// Builds a mixed number from typed magnitudes plus an overall sign.
    ///
    /// This is how learners and question banks write negative values: `-0 1/2`
    /// and `-1 3/4` both put the sign in front of the whole part.
    ///
    /// # Errors
    ///
    /// Same as [`MixedNumber::new`]; `whole` and `numerator` must be non-negative.
    pub fn from_magnitudes(
        negative: bool,
        whole: i64,
        numerator: i64,
        denominator: i64,
    ) -> Result<Self, FractionError> {
        if whole < 0 || numerator < 0 {
            return Err(FractionError::NegativeMixedPart);
        }
        match (negative, whole) {
            (false, _) => Self::new(whole, numerator, denominator),
            (true, 0) => Self::new(0, -numerator, denominator),
            (true, _) => Self::new(-whole, numerator, denominator),
        }
    }

    pub(crate) fn from_parts_unchecked(whole: i64, numerator: i64, denominator: i64) -> Self {
        Self {
            whole,
            numerator,
            denominator,
        }
    }

    #[must_use]
    pub fn whole(&self) -> i64 {
        self.whole
    }

    #[must_use]
    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    #[must_use]
    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    /// Improper fraction with the same value. Not reduced.
    ///
    /// # Errors
    ///
    /// Returns `FractionError::Overflow` if the combined numerator does not fit.
    pub fn to_fraction(&self) -> Result<Fraction, FractionError> {
        if self.whole == 0 {
            return Fraction::new(self.numerator, self.denominator);
        }
        let magnitude = i128::from(self.whole).abs() * i128::from(self.denominator)
            + i128::from(self.numerator);
        let signed = if self.whole < 0 { -magnitude } else { magnitude };
        let numerator = i64::try_from(signed).map_err(|_| FractionError::Overflow)?;
        Fraction::new(numerator, self.denominator)
    }
}

impl fmt::Display for MixedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.whole, self.numerator) {
            (0, _) => write!(f, "{}/{}", self.numerator, self.denominator),
            (whole, 0) => write!(f, "{whole}"),
            (whole, numerator) => write!(f, "{whole} {numerator}/{}", self.denominator),
        }
    }
}
