//! Exact rational numbers.
//!
//! Conversion ratios, π-exponents, datum translations and dimension exponents are all
//! [`Rational`] values. They are stored over fixed-width 128-bit integers in lowest terms,
//! so two rationals are equal exactly when their numerators and denominators are equal.
//!
//! Every arithmetic operation is checked: an intermediate result that does not fit in an
//! `i128` is reported as [`UnitsError::Overflow`] instead of wrapping. In practice overflow
//! only happens when a catalog declares an unrepresentable ratio, or when a square root is
//! requested with a very tight tolerance.
//!
//! ```
//! use rsunits_core::rational::Rational;
//!
//! let foot = Rational::new(381, 1250).unwrap();
//! let inch = foot.checked_div(&Rational::from_integer(12)).unwrap();
//! assert_eq!(inch, Rational::new(127, 5000).unwrap());
//! assert_eq!(inch.to_string(), "127/5000");
//! ```

use crate::errors::{UnitsError, UnitsResult};
use num::integer::Integer;
use num::rational::Ratio;
use num::traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, Signed};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// A fraction `numer / denom` in lowest terms with a strictly positive denominator.
///
/// Neither component is ever `i128::MIN`, so negation can't overflow.
///
/// Serialized as its string form (`"381/1250"`, `"-3"`), which keeps catalog files readable
/// and avoids the 64-bit integer limit of TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rational(Ratio<i128>);

fn overflow(operation: &str) -> UnitsError {
    UnitsError::Overflow(operation.to_string())
}

impl Rational {
    pub const ZERO: Self = Self::from_integer(0);
    pub const ONE: Self = Self::from_integer(1);

    /// Creates a reduced rational from a numerator and denominator.
    ///
    /// Fails with [`UnitsError::DivideByZero`] if `denom` is zero.
    pub fn new(numer: i128, denom: i128) -> UnitsResult<Self> {
        if denom == 0 {
            return Err(UnitsError::DivideByZero);
        }
        // i128::MIN has no positive counterpart, so it can't be normalised
        if numer == i128::MIN || denom == i128::MIN {
            return Err(overflow("reduction"));
        }
        Ok(Self(Ratio::new(numer, denom)))
    }

    /// Creates a rational equal to the integer `n`.
    ///
    /// Wider integers go through [`Rational::new`], which rejects `i128::MIN`.
    #[must_use]
    pub const fn from_integer(n: i64) -> Self {
        Self(Ratio::new_raw(n as i128, 1))
    }

    /// Wraps the result of a checked `Ratio` operation.
    fn checked(result: Option<Ratio<i128>>, operation: &str) -> UnitsResult<Self> {
        match result {
            Some(ratio) if *ratio.numer() != i128::MIN => Ok(Self(ratio)),
            _ => Err(overflow(operation)),
        }
    }

    #[must_use]
    pub const fn numer(&self) -> i128 {
        *self.0.numer()
    }

    #[must_use]
    pub const fn denom(&self) -> i128 {
        *self.0.denom()
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.numer() == 0
    }

    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.numer() < 0
    }

    #[must_use]
    pub const fn is_integer(&self) -> bool {
        self.denom() == 1
    }

    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Largest integer less than or equal to this value.
    #[must_use]
    pub fn floor(&self) -> i128 {
        self.numer().div_floor(&self.denom())
    }

    /// Nearest `f64` to this value.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.numer() as f64 / self.denom() as f64
    }

    pub fn checked_add(&self, other: &Self) -> UnitsResult<Self> {
        Self::checked(self.0.checked_add(&other.0), "addition")
    }

    pub fn checked_sub(&self, other: &Self) -> UnitsResult<Self> {
        Self::checked(self.0.checked_sub(&other.0), "subtraction")
    }

    pub fn checked_mul(&self, other: &Self) -> UnitsResult<Self> {
        Self::checked(self.0.checked_mul(&other.0), "multiplication")
    }

    /// Divides by `other`, failing with [`UnitsError::DivideByZero`] if `other` is zero.
    pub fn checked_div(&self, other: &Self) -> UnitsResult<Self> {
        if other.is_zero() {
            return Err(UnitsError::DivideByZero);
        }
        Self::checked(self.0.checked_div(&other.0), "division")
    }

    /// `1 / self`, failing with [`UnitsError::DivideByZero`] if `self` is zero.
    pub fn reciprocal(&self) -> UnitsResult<Self> {
        if self.is_zero() {
            return Err(UnitsError::DivideByZero);
        }
        Ok(Self(self.0.recip()))
    }

    /// Raises to an integer power. Negative powers take the reciprocal first.
    pub fn checked_pow(&self, exp: i32) -> UnitsResult<Self> {
        let base = if exp < 0 { self.reciprocal()? } else { *self };
        let exp = exp.unsigned_abs();
        // numerator and denominator stay coprime, so no reduction is needed
        let numer = base.numer().checked_pow(exp);
        let denom = base.denom().checked_pow(exp);
        match (numer, denom) {
            (Some(numer), Some(denom)) if numer != i128::MIN => {
                Ok(Self(Ratio::new_raw(numer, denom)))
            }
            _ => Err(overflow("exponentiation")),
        }
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self::from_integer(n)
    }
}

impl From<i32> for Rational {
    fn from(n: i32) -> Self {
        Self::from_integer(i64::from(n))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Rational {
    type Err = UnitsError;

    /// Parses `"n"` or `"n/d"`, with optional whitespace around each part.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || UnitsError::InvalidDomain(format!("'{s}' is not a rational number"));
        let (numer, denom) = match s.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s.trim(), "1"),
        };
        let numer: i128 = numer.parse().map_err(|_| invalid())?;
        let denom: i128 = denom.parse().map_err(|_| invalid())?;
        Self::new(numer, denom)
    }
}

impl TryFrom<String> for Rational {
    type Error = UnitsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rational> for String {
    fn from(value: Rational) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i128, d: i128) -> Rational {
        Rational::new(n, d).unwrap()
    }

    #[test]
    fn test_reduction() {
        let x = r(6, -8);
        assert_eq!(x.numer(), -3);
        assert_eq!(x.denom(), 4);
        assert_eq!(r(0, 5), Rational::ZERO);
        assert_eq!(r(0, -5).denom(), 1);
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(Rational::new(1, 0), Err(UnitsError::DivideByZero));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(r(1, 2).checked_add(&r(1, 3)).unwrap(), r(5, 6));
        assert_eq!(r(1, 2).checked_sub(&r(1, 3)).unwrap(), r(1, 6));
        assert_eq!(r(2, 3).checked_mul(&r(9, 4)).unwrap(), r(3, 2));
        assert_eq!(r(2, 3).checked_div(&r(4, 9)).unwrap(), r(3, 2));
        assert_eq!(-r(2, 3), r(-2, 3));
        assert_eq!(r(-2, 3).abs(), r(2, 3));
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(
            r(1, 2).checked_div(&Rational::ZERO),
            Err(UnitsError::DivideByZero)
        );
        assert_eq!(Rational::ZERO.reciprocal(), Err(UnitsError::DivideByZero));
    }

    #[test]
    fn test_pow() {
        assert_eq!(r(2, 3).checked_pow(3).unwrap(), r(8, 27));
        assert_eq!(r(2, 3).checked_pow(-2).unwrap(), r(9, 4));
        assert_eq!(r(2, 3).checked_pow(0).unwrap(), Rational::ONE);
        assert!(Rational::ZERO.checked_pow(-1).is_err());
    }

    #[test]
    fn test_overflow_is_reported() {
        let big = Rational::new(i128::MAX / 2, 1).unwrap();
        assert!(matches!(
            big.checked_mul(&Rational::from_integer(4)),
            Err(UnitsError::Overflow(_))
        ));
        assert!(matches!(
            big.checked_add(&big).and_then(|x| x.checked_add(&big)),
            Err(UnitsError::Overflow(_))
        ));
        assert!(matches!(
            Rational::from_integer(10).checked_pow(40),
            Err(UnitsError::Overflow(_))
        ));
        assert!(matches!(
            Rational::new(i128::MIN, 1),
            Err(UnitsError::Overflow(_))
        ));
    }

    #[test]
    fn test_never_holds_i128_min() {
        // the smallest reachable numerator still negates
        let low = Rational::new(i128::MIN + 1, 1).unwrap();
        assert_eq!((-low).numer(), i128::MAX);
        assert_eq!(
            Rational::ONE.checked_sub(&Rational::from_integer(i64::MIN)).unwrap(),
            Rational::new(i128::from(i64::MIN).abs() + 1, 1).unwrap()
        );
        assert!(matches!(
            low.checked_sub(&Rational::ONE),
            Err(UnitsError::Overflow(_))
        ));
        assert!(matches!(
            Rational::new(-2, 1).unwrap().checked_pow(127),
            Err(UnitsError::Overflow(_))
        ));
        assert_eq!(Rational::new(1, i128::MIN), Err(UnitsError::Overflow("reduction".to_string())));
    }

    #[test]
    fn test_ordering() {
        assert!(r(1, 3) < r(1, 2));
        assert!(r(-1, 2) < r(-1, 3));
        assert!(r(7, 3) > r(9, 4));
        assert!(r(22, 7) > r(355, 113));
        assert_eq!(r(4, 6).cmp(&r(2, 3)), std::cmp::Ordering::Equal);
        assert!(r(2, 1) > r(3, 2));
        assert!(r(3, 2) < r(2, 1));

        // cross multiplication would overflow here
        let a = r(i128::MAX - 1, i128::MAX);
        let b = r(i128::MAX - 2, i128::MAX - 1);
        assert!(a > b);
    }

    #[test]
    fn test_floor() {
        assert_eq!(r(7, 2).floor(), 3);
        assert_eq!(r(-7, 2).floor(), -4);
        assert_eq!(r(4, 2).floor(), 2);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("381/1250".parse::<Rational>().unwrap(), r(381, 1250));
        assert_eq!(" -6 / 4 ".parse::<Rational>().unwrap(), r(-3, 2));
        assert_eq!("5".parse::<Rational>().unwrap(), Rational::from_integer(5));
        assert!("1.5".parse::<Rational>().is_err());
        assert!("1/0".parse::<Rational>().is_err());
        assert_eq!(r(-3, 2).to_string(), "-3/2");
        assert_eq!(Rational::from_integer(7).to_string(), "7");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&r(381, 1250)).unwrap();
        assert_eq!(json, "\"381/1250\"");
        let back: Rational = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r(381, 1250));
        assert!(serde_json::from_str::<Rational>("\"1/0\"").is_err());
    }
}
