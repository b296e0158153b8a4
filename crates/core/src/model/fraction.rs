use std::cmp::Ordering;
use std::fmt;

use num_integer::Integer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::mixed::MixedNumber;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors raised by exact fraction arithmetic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FractionError {
    #[error("denominator cannot be zero")]
    InvalidFraction,

    #[error("cannot divide by a zero-valued fraction")]
    DivisionByZero,

    #[error("denominator {target} is not a positive multiple of {denominator}")]
    IncompatibleDenominator { target: i64, denominator: i64 },

    #[error("mixed number parts must be non-negative; the sign belongs on the whole part")]
    NegativeMixedPart,

    #[error("result does not fit in a 64-bit fraction")]
    Overflow,
}

//
// ─── FRACTION ──────────────────────────────────────────────────────────────────
//

/// Exact rational value `numerator / denominator`.
///
/// Values are stored exactly as constructed (so `2/4` stays `2/4`) and are only
/// reduced by [`Fraction::normalize`]. Every arithmetic operation returns a new,
/// normalized value. `==` compares the stored parts; use [`Fraction::equivalent`]
/// or [`Fraction::compare`] to compare rational values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FractionParts")]
pub struct Fraction {
    numerator: i64,
    denominator: i64,
}

#[derive(Deserialize)]
struct FractionParts {
    numerator: i64,
    denominator: i64,
}

impl TryFrom<FractionParts> for Fraction {
    type Error = FractionError;

    fn try_from(parts: FractionParts) -> Result<Self, Self::Error> {
        Self::new(parts.numerator, parts.denominator)
    }
}

impl Fraction {
    /// Creates a fraction as given, without reducing it.
    ///
    /// Neither part may be `i64::MIN`, so negating either one during
    /// normalization always fits.
    ///
    /// # Errors
    ///
    /// Returns `FractionError::InvalidFraction` if `denominator` is zero and
    /// `FractionError::Overflow` if either part is `i64::MIN`.
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, FractionError> {
        if denominator == 0 {
            return Err(FractionError::InvalidFraction);
        }
        if numerator == i64::MIN || denominator == i64::MIN {
            return Err(FractionError::Overflow);
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Caller guarantees `denominator != 0` and neither part is `i64::MIN`.
    pub(crate) fn new_unchecked(numerator: i64, denominator: i64) -> Self {
        debug_assert!(denominator != 0, "zero denominator");
        debug_assert!(numerator != i64::MIN && denominator != i64::MIN, "i64::MIN part");
        Self {
            numerator,
            denominator,
        }
    }

    /// The integer `value / 1`. `i64::MIN` is kept; its reciprocal is an overflow.
    #[must_use]
    pub fn from_integer(value: i64) -> Self {
        Self {
            numerator: value,
            denominator: 1,
        }
    }

    #[must_use]
    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    #[must_use]
    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    #[must_use]
    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        (self.numerator < 0) != (self.denominator < 0) && self.numerator != 0
    }

    /// Canonical form: positive denominator and `gcd(|numerator|, denominator) == 1`.
    ///
    /// Zero canonicalizes to `0/1`.
    #[must_use]
    pub fn normalize(&self) -> Self {
        // gcd(0, d) == |d|, and d != 0, so the divisor is never zero.
        let divisor = self.numerator.gcd(&self.denominator);
        let mut numerator = self.numerator / divisor;
        let mut denominator = self.denominator / divisor;
        if denominator < 0 {
            numerator = -numerator;
            denominator = -denominator;
        }
        Self {
            numerator,
            denominator,
        }
    }

    /// True for a positive denominator sharing no factor other than 1 with the numerator.
    #[must_use]
    pub fn is_in_simplest_form(&self) -> bool {
        self.denominator > 0 && self.numerator.gcd(&self.denominator) == 1
    }

    /// True when both fractions denote the same rational value.
    #[must_use]
    pub fn equivalent(&self, other: &Self) -> bool {
        self.normalize() == other.normalize()
    }

    /// Exact ordering by cross-multiplication over positive denominators.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        let a = self.normalize();
        let b = other.normalize();
        let left = i128::from(a.numerator) * i128::from(b.denominator);
        let right = i128::from(b.numerator) * i128::from(a.denominator);
        left.cmp(&right)
    }

    /// # Errors
    ///
    /// Returns `FractionError::Overflow` if the reduced sum leaves the `i64` range.
    pub fn add(&self, other: &Self) -> Result<Self, FractionError> {
        let (numerator, denominator) = self.wide_sum(other, 1);
        reduce_wide(numerator, denominator)
    }

    /// # Errors
    ///
    /// Returns `FractionError::Overflow` if the reduced difference leaves the `i64` range.
    pub fn sub(&self, other: &Self) -> Result<Self, FractionError> {
        let (numerator, denominator) = self.wide_sum(other, -1);
        reduce_wide(numerator, denominator)
    }

    /// # Errors
    ///
    /// Returns `FractionError::Overflow` if the reduced product leaves the `i64` range.
    pub fn mul(&self, other: &Self) -> Result<Self, FractionError> {
        let (numerator, denominator) = self.wide_product(other);
        reduce_wide(numerator, denominator)
    }

    /// Multiplies by the reciprocal of `other`.
    ///
    /// # Errors
    ///
    /// Returns `FractionError::DivisionByZero` if `other` is zero and
    /// `FractionError::Overflow` if the result leaves the `i64` range.
    pub fn div(&self, other: &Self) -> Result<Self, FractionError> {
        self.mul(&other.reciprocal()?)
    }

    /// # Errors
    ///
    /// Returns `FractionError::DivisionByZero` for a zero-valued fraction and
    /// `FractionError::Overflow` when the numerator is `i64::MIN`.
    pub fn reciprocal(&self) -> Result<Self, FractionError> {
        if self.numerator == 0 {
            return Err(FractionError::DivisionByZero);
        }
        Self::new(self.denominator, self.numerator)
    }

    /// Rewrites the value over `target`, which must be a positive multiple of the
    /// reduced denominator. The result is intentionally left unreduced.
    ///
    /// # Errors
    ///
    /// Returns `FractionError::IncompatibleDenominator` when `target` is not such a
    /// multiple, or `FractionError::Overflow` if the scaled numerator does not fit.
    pub fn convert_to_denominator(&self, target: i64) -> Result<Self, FractionError> {
        let reduced = self.normalize();
        if target <= 0 || target % reduced.denominator != 0 {
            return Err(FractionError::IncompatibleDenominator {
                target,
                denominator: reduced.denominator,
            });
        }
        let factor = target / reduced.denominator;
        let numerator = reduced
            .numerator
            .checked_mul(factor)
            .ok_or(FractionError::Overflow)?;
        Self::new(numerator, target)
    }

    /// Whole part (truncated toward zero) plus a non-negative remainder.
    #[must_use]
    pub fn to_mixed(&self) -> MixedNumber {
        let reduced = self.normalize();
        let whole = reduced.numerator / reduced.denominator;
        let remainder = reduced.numerator % reduced.denominator;
        if whole == 0 {
            // Values in (-1, 0) keep their sign on the numerator.
            MixedNumber::from_parts_unchecked(0, remainder, reduced.denominator)
        } else {
            MixedNumber::from_parts_unchecked(whole, remainder.abs(), reduced.denominator)
        }
    }

    /// # Errors
    ///
    /// Returns `FractionError::Overflow` if the improper numerator does not fit.
    pub fn from_mixed(mixed: &MixedNumber) -> Result<Self, FractionError> {
        mixed.to_fraction()
    }

    /// `self + other` over `lcm` of the denominators, before reduction.
    pub(crate) fn unreduced_sum(&self, other: &Self) -> Result<Self, FractionError> {
        let (numerator, denominator) = self.wide_sum(other, 1);
        narrow(numerator, denominator)
    }

    /// `self - other` over `lcm` of the denominators, before reduction.
    pub(crate) fn unreduced_difference(&self, other: &Self) -> Result<Self, FractionError> {
        let (numerator, denominator) = self.wide_sum(other, -1);
        narrow(numerator, denominator)
    }

    pub(crate) fn unreduced_product(&self, other: &Self) -> Result<Self, FractionError> {
        let (numerator, denominator) = self.wide_product(other);
        narrow(numerator, denominator)
    }

    pub(crate) fn unreduced_quotient(&self, other: &Self) -> Result<Self, FractionError> {
        let (numerator, denominator) = self.wide_product(&other.reciprocal()?);
        narrow(numerator, denominator)
    }

    fn wide_sum(&self, other: &Self, sign: i128) -> (i128, i128) {
        let left_den = i128::from(self.denominator);
        let right_den = i128::from(other.denominator);
        let common = left_den.lcm(&right_den);
        let left = i128::from(self.numerator) * (common / left_den);
        let right = i128::from(other.numerator) * (common / right_den);
        (left + sign * right, common)
    }

    fn wide_product(&self, other: &Self) -> (i128, i128) {
        (
            i128::from(self.numerator) * i128::from(other.numerator),
            i128::from(self.denominator) * i128::from(other.denominator),
        )
    }
}

fn narrow(numerator: i128, denominator: i128) -> Result<Fraction, FractionError> {
    let numerator = i64::try_from(numerator).map_err(|_| FractionError::Overflow)?;
    let denominator = i64::try_from(denominator).map_err(|_| FractionError::Overflow)?;
    Fraction::new(numerator, denominator)
}

fn reduce_wide(numerator: i128, denominator: i128) -> Result<Fraction, FractionError> {
    if denominator == 0 {
        return Err(FractionError::InvalidFraction);
    }
    let divisor = numerator.gcd(&denominator);
    let (mut numerator, mut denominator) = (numerator / divisor, denominator / divisor);
    if denominator < 0 {
        numerator = -numerator;
        denominator = -denominator;
    }
    narrow(numerator, denominator)
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    fn sample() -> Vec<Fraction> {
        let mut out = Vec::new();
        for d in -12..=12_i64 {
            if d == 0 {
                continue;
            }
            for n in -15..=15 {
                out.push(frac(n, d));
            }
        }
        out
    }

    #[test]
    fn zero_denominator_is_rejected() {
        assert_eq!(Fraction::new(1, 0), Err(FractionError::InvalidFraction));
    }

    #[test]
    fn normalize_reduces_and_fixes_sign() {
        assert_eq!(frac(6, 8).normalize(), frac(3, 4));
        assert_eq!(frac(3, -6).normalize(), frac(-1, 2));
        assert_eq!(frac(-4, -10).normalize(), frac(2, 5));
        assert_eq!(frac(0, -7).normalize(), frac(0, 1));
    }

    #[test]
    fn normalize_is_idempotent() {
        for f in sample() {
            let once = f.normalize();
            assert_eq!(once.normalize(), once, "{f}");
            assert!(once.denominator() > 0);
            assert!(once.is_in_simplest_form());
        }
    }

    #[test]
    fn arithmetic_results_are_reduced() {
        assert_eq!(frac(1, 6).add(&frac(1, 3)).unwrap(), frac(1, 2));
        assert_eq!(frac(1, 4).sub(&frac(3, 4)).unwrap(), frac(-1, 2));
        assert_eq!(frac(2, 3).mul(&frac(3, 4)).unwrap(), frac(1, 2));
        assert_eq!(frac(1, 2).div(&frac(3, 4)).unwrap(), frac(2, 3));
        assert_eq!(frac(1, 2).div(&frac(-1, 4)).unwrap(), frac(-2, 1));
    }

    #[test]
    fn division_by_zero_fraction_fails() {
        let err = frac(1, 2).div(&frac(0, 5)).unwrap_err();
        assert_eq!(err, FractionError::DivisionByZero);
    }

    #[test]
    fn unreduced_sum_keeps_lcm_denominator() {
        let raw = frac(1, 4).unreduced_sum(&frac(1, 4)).unwrap();
        assert_eq!(raw, frac(2, 4));
        assert_eq!(raw.normalize(), frac(1, 2));
    }

    #[test]
    fn compare_matches_cross_product_sign() {
        let values = sample();
        for a in values.iter().step_by(7) {
            for b in values.iter().step_by(11) {
                let an = a.normalize();
                let bn = b.normalize();
                let cross = an.numerator() * bn.denominator() - bn.numerator() * an.denominator();
                assert_eq!(a.compare(b), cross.cmp(&0), "{a} vs {b}");
                assert_eq!(a.compare(b), b.compare(a).reverse());
            }
        }
    }

    #[test]
    fn compare_is_exact_near_equality() {
        let a = frac(999_999_999, 1_000_000_000);
        let b = frac(999_999_998, 999_999_999);
        assert_eq!(a.compare(&b), Ordering::Greater);
        assert_eq!(frac(2, 6).compare(&frac(1, 3)), Ordering::Equal);
    }

    #[test]
    fn convert_to_denominator_keeps_target() {
        assert_eq!(frac(3, 4).convert_to_denominator(12).unwrap(), frac(9, 12));
        assert_eq!(frac(2, 4).convert_to_denominator(6).unwrap(), frac(3, 6));
        assert_eq!(
            frac(3, 4).convert_to_denominator(10),
            Err(FractionError::IncompatibleDenominator {
                target: 10,
                denominator: 4
            })
        );
        assert!(frac(3, 4).convert_to_denominator(-8).is_err());
    }

    #[test]
    fn simplest_form_detection() {
        assert!(frac(3, 4).is_in_simplest_form());
        assert!(!frac(2, 4).is_in_simplest_form());
        assert!(frac(0, 1).is_in_simplest_form());
        assert!(!frac(0, 5).is_in_simplest_form());
        assert!(!frac(3, -4).is_in_simplest_form());
    }

    #[test]
    fn mixed_round_trip_matches_normalize() {
        for f in sample() {
            let back = Fraction::from_mixed(&f.to_mixed()).unwrap();
            assert_eq!(back, f.normalize(), "{f}");
        }
    }

    #[test]
    fn to_mixed_splits_whole_part() {
        let mixed = frac(7, 3).to_mixed();
        assert_eq!((mixed.whole(), mixed.numerator(), mixed.denominator()), (2, 1, 3));

        let negative = frac(-7, 2).to_mixed();
        assert_eq!(
            (negative.whole(), negative.numerator(), negative.denominator()),
            (-3, 1, 2)
        );

        let small = frac(-1, 2).to_mixed();
        assert_eq!((small.whole(), small.numerator()), (0, -1));
    }

    #[test]
    fn deserialize_rejects_zero_denominator() {
        let ok: Fraction = serde_json::from_str(r#"{"numerator":2,"denominator":4}"#).unwrap();
        assert_eq!(ok, frac(2, 4));
        let bad = serde_json::from_str::<Fraction>(r#"{"numerator":2,"denominator":0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn overflow_is_reported() {
        let big = Fraction::from_integer(i64::MAX);
        assert_eq!(big.add(&big), Err(FractionError::Overflow));
    }

    #[test]
    fn min_parts_are_rejected_instead_of_overflowing_normalize() {
        assert_eq!(Fraction::new(1, i64::MIN), Err(FractionError::Overflow));
        assert_eq!(Fraction::new(i64::MIN, -1), Err(FractionError::Overflow));
        assert_eq!(Fraction::new(i64::MIN, i64::MIN), Err(FractionError::Overflow));

        let min = Fraction::from_integer(i64::MIN);
        assert_eq!(min.normalize(), min);
        assert_eq!(min.reciprocal(), Err(FractionError::Overflow));
        assert_eq!(frac(1, 2).div(&min), Err(FractionError::Overflow));
    }
}
