//! Physical dimensions for unit validation.
//!
//! A [`Dimension`] is a product of [`BaseDimension`]s raised to rational exponents, e.g.
//! velocity is `L T^-1` and the square root of an area is `L`. Exponents are kept sparse and
//! in canonical order: entries are sorted by base dimension and zero exponents are removed.
//! Two dimensions are therefore equal exactly when their entry lists are equal, and the
//! empty list is the dimensionless quantity.
//!
//! # Base Dimensions
//!
//! The set of base dimensions is closed:
//! - Length (L)
//! - Mass (M)
//! - Time (T)
//! - Angle (α)
//! - Electric current (I)
//! - Temperature (Θ)
//! - Amount of substance (N)
//! - Luminous intensity (J)
//! - Data (D)
//!
//! Angle is tracked as its own base dimension so that radians and steradians stay distinct
//! from plain ratios.

use crate::errors::UnitsResult;
use crate::rational::Rational;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the fixed base dimensions.
///
/// The declaration order is the canonical order of entries in a [`Dimension`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BaseDimension {
    Length,
    Mass,
    Time,
    Angle,
    Current,
    Temperature,
    Substance,
    LuminousIntensity,
    Data,
}

impl BaseDimension {
    /// All base dimensions in canonical order.
    pub const ALL: [BaseDimension; 9] = [
        BaseDimension::Length,
        BaseDimension::Mass,
        BaseDimension::Time,
        BaseDimension::Angle,
        BaseDimension::Current,
        BaseDimension::Temperature,
        BaseDimension::Substance,
        BaseDimension::LuminousIntensity,
        BaseDimension::Data,
    ];

    /// Short symbol used when printing dimensions.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            BaseDimension::Length => "L",
            BaseDimension::Mass => "M",
            BaseDimension::Time => "T",
            BaseDimension::Angle => "α",
            BaseDimension::Current => "I",
            BaseDimension::Temperature => "Θ",
            BaseDimension::Substance => "N",
            BaseDimension::LuminousIntensity => "J",
            BaseDimension::Data => "D",
        }
    }
}

impl fmt::Display for BaseDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Represents the physical dimension of a quantity.
///
/// For example:
/// - Velocity has dimensions L·T⁻¹ (length = 1, time = -1)
/// - Force has dimensions L·M·T⁻² (length = 1, mass = 1, time = -2)
/// - Solid angle has dimensions α²
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<(BaseDimension, Rational)>",
    into = "Vec<(BaseDimension, Rational)>"
)]
pub struct Dimension {
    exponents: Vec<(BaseDimension, Rational)>,
}

impl Dimension {
    /// The dimensionless (empty) dimension.
    #[must_use]
    pub const fn dimensionless() -> Self {
        Self {
            exponents: Vec::new(),
        }
    }

    /// A single base dimension with exponent 1.
    #[must_use]
    pub fn base(base: BaseDimension) -> Self {
        Self {
            exponents: vec![(base, Rational::ONE)],
        }
    }

    /// Builds a dimension from arbitrary `(base, exponent)` pairs.
    ///
    /// Repeated bases are summed and zero exponents dropped, so the result is canonical.
    pub fn from_exponents(
        exponents: impl IntoIterator<Item = (BaseDimension, Rational)>,
    ) -> UnitsResult<Self> {
        exponents
            .into_iter()
            .try_fold(Self::dimensionless(), |acc, (base, exponent)| {
                acc.multiply(&Self::single(base, exponent))
            })
    }

    fn single(base: BaseDimension, exponent: Rational) -> Self {
        if exponent.is_zero() {
            Self::dimensionless()
        } else {
            Self {
                exponents: vec![(base, exponent)],
            }
        }
    }

    /// Exponent of `base`, zero when absent.
    #[must_use]
    pub fn exponent(&self, base: BaseDimension) -> Rational {
        self.exponents
            .iter()
            .find(|(b, _)| *b == base)
            .map(|(_, e)| *e)
            .unwrap_or(Rational::ZERO)
    }

    /// Iterates over the nonzero exponents in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &(BaseDimension, Rational)> {
        self.exponents.iter()
    }

    /// Returns true if this dimension is dimensionless.
    #[must_use]
    pub fn is_dimensionless(&self) -> bool {
        self.exponents.is_empty()
    }

    /// Returns true if this dimension is compatible with another for conversion.
    ///
    /// Two dimensions are compatible if they are identical.
    #[must_use]
    pub fn is_compatible(&self, other: &Self) -> bool {
        self == other
    }

    /// Multiplies two dimensions by adding exponents.
    ///
    /// Both sides are sorted, so this is a single merge pass. Exponents that cancel to zero are
    /// removed.
    pub fn multiply(&self, other: &Self) -> UnitsResult<Self> {
        let mut exponents = Vec::with_capacity(self.exponents.len() + other.exponents.len());
        let mut lhs = self.exponents.iter().peekable();
        let mut rhs = other.exponents.iter().peekable();
        loop {
            let next = match (lhs.peek(), rhs.peek()) {
                (Some(&&(a, ea)), Some(&&(b, eb))) => {
                    if a < b {
                        lhs.next();
                        (a, ea)
                    } else if b < a {
                        rhs.next();
                        (b, eb)
                    } else {
                        lhs.next();
                        rhs.next();
                        (a, ea.checked_add(&eb)?)
                    }
                }
                (Some(&&entry), None) => {
                    lhs.next();
                    entry
                }
                (None, Some(&&entry)) => {
                    rhs.next();
                    entry
                }
                (None, None) => break,
            };
            if !next.1.is_zero() {
                exponents.push(next);
            }
        }
        Ok(Self { exponents })
    }

    /// Divides two dimensions by subtracting exponents.
    pub fn divide(&self, other: &Self) -> UnitsResult<Self> {
        self.multiply(&other.invert())
    }

    /// Negates every exponent.
    #[must_use]
    pub fn invert(&self) -> Self {
        Self {
            exponents: self.exponents.iter().map(|&(b, e)| (b, -e)).collect(),
        }
    }

    /// Raises this dimension to a rational power.
    pub fn pow(&self, exponent: &Rational) -> UnitsResult<Self> {
        if exponent.is_zero() {
            return Ok(Self::dimensionless());
        }
        let exponents = self
            .exponents
            .iter()
            .map(|(b, e)| Ok((*b, e.checked_mul(exponent)?)))
            .collect::<UnitsResult<Vec<_>>>()?;
        Ok(Self { exponents })
    }

    /// Takes the `index`-th root, i.e. raises to `1 / index`.
    pub fn root(&self, index: &Rational) -> UnitsResult<Self> {
        self.pow(&index.reciprocal()?)
    }
}

impl From<BaseDimension> for Dimension {
    fn from(base: BaseDimension) -> Self {
        Self::base(base)
    }
}

impl TryFrom<Vec<(BaseDimension, Rational)>> for Dimension {
    type Error = crate::errors::UnitsError;

    fn try_from(value: Vec<(BaseDimension, Rational)>) -> Result<Self, Self::Error> {
        Self::from_exponents(value)
    }
}

impl From<Dimension> for Vec<(BaseDimension, Rational)> {
    fn from(value: Dimension) -> Self {
        value.exponents
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "dimensionless");
        }

        let parts: Vec<String> = self
            .exponents
            .iter()
            .map(|(base, exp)| {
                if *exp == Rational::ONE {
                    base.symbol().to_string()
                } else if exp.is_integer() {
                    format!("{}^{}", base.symbol(), exp)
                } else {
                    format!("{}^({})", base.symbol(), exp)
                }
            })
            .collect();

        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim(exponents: &[(BaseDimension, i64)]) -> Dimension {
        Dimension::from_exponents(
            exponents
                .iter()
                .map(|&(b, e)| (b, Rational::from_integer(e))),
        )
        .unwrap()
    }

    fn length() -> Dimension {
        Dimension::base(BaseDimension::Length)
    }

    fn mass() -> Dimension {
        Dimension::base(BaseDimension::Mass)
    }

    fn time() -> Dimension {
        Dimension::base(BaseDimension::Time)
    }

    #[test]
    fn test_dimensionless() {
        let d = Dimension::dimensionless();
        assert!(d.is_dimensionless());
        assert_eq!(format!("{}", d), "dimensionless");
    }

    #[test]
    fn test_canonical_order() {
        let a = dim(&[(BaseDimension::Time, -2), (BaseDimension::Length, 1)]);
        let b = dim(&[(BaseDimension::Length, 1), (BaseDimension::Time, -2)]);
        assert_eq!(a, b);
        let bases: Vec<_> = a.iter().map(|(b, _)| *b).collect();
        assert_eq!(bases, vec![BaseDimension::Length, BaseDimension::Time]);
    }

    #[test]
    fn test_from_exponents_merges_and_drops_zeros() {
        let d = dim(&[
            (BaseDimension::Length, 2),
            (BaseDimension::Mass, 1),
            (BaseDimension::Length, -2),
        ]);
        assert_eq!(d, mass());
        assert_eq!(d.exponent(BaseDimension::Length), Rational::ZERO);
    }

    #[test]
    fn test_dimension_multiplication() {
        // Force = Mass * Acceleration = M * L * T^-2
        let acceleration = length()
            .divide(&time().pow(&Rational::from_integer(2)).unwrap())
            .unwrap();
        let force = mass().multiply(&acceleration).unwrap();
        assert_eq!(
            force,
            dim(&[
                (BaseDimension::Length, 1),
                (BaseDimension::Mass, 1),
                (BaseDimension::Time, -2)
            ])
        );
    }

    #[test]
    fn test_dimension_division() {
        // Velocity = Length / Time = L * T^-1
        let velocity = length().divide(&time()).unwrap();
        assert_eq!(velocity.exponent(BaseDimension::Length), Rational::ONE);
        assert_eq!(
            velocity.exponent(BaseDimension::Time),
            Rational::from_integer(-1)
        );
    }

    #[test]
    fn test_cancellation() {
        let d = dim(&[
            (BaseDimension::Length, 2),
            (BaseDimension::Mass, 1),
            (BaseDimension::Time, -3),
        ]);
        assert!(d.multiply(&d.invert()).unwrap().is_dimensionless());
        assert!(d.divide(&d).unwrap().is_dimensionless());
    }

    #[test]
    fn test_associativity() {
        let x = dim(&[(BaseDimension::Length, 1), (BaseDimension::Time, -1)]);
        let y = dim(&[(BaseDimension::Mass, 2), (BaseDimension::Length, -1)]);
        let z = dim(&[(BaseDimension::Time, 1), (BaseDimension::Data, 1)]);
        let left = x.multiply(&y).unwrap().multiply(&z).unwrap();
        let right = x.multiply(&y.multiply(&z).unwrap()).unwrap();
        assert_eq!(left, right);
        assert_eq!(left, dim(&[(BaseDimension::Mass, 2), (BaseDimension::Data, 1)]));
    }

    #[test]
    fn test_fractional_root() {
        let area = length().pow(&Rational::from_integer(2)).unwrap();
        assert_eq!(area.root(&Rational::from_integer(2)).unwrap(), length());

        let root_length = length().root(&Rational::from_integer(2)).unwrap();
        assert_eq!(
            root_length.exponent(BaseDimension::Length),
            Rational::new(1, 2).unwrap()
        );
        assert_eq!(format!("{}", root_length), "L^(1/2)");
    }

    #[test]
    fn test_pow_zero_is_dimensionless() {
        assert!(length().pow(&Rational::ZERO).unwrap().is_dimensionless());
    }

    #[test]
    fn test_is_compatible() {
        assert!(mass().is_compatible(&mass()));
        assert!(!mass().is_compatible(&length()));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", mass()), "M");
        assert_eq!(
            format!("{}", length().pow(&Rational::from_integer(2)).unwrap()),
            "L^2"
        );
        let force = dim(&[
            (BaseDimension::Mass, 1),
            (BaseDimension::Length, 1),
            (BaseDimension::Time, -2),
        ]);
        assert_eq!(format!("{}", force), "L M T^-2");
    }

    #[test]
    fn test_serde_canonicalises() {
        let json = r#"[["Time", "-1"], ["Length", "1"], ["Mass", "0"]]"#;
        let d: Dimension = serde_json::from_str(json).unwrap();
        assert_eq!(d, length().divide(&time()).unwrap());
        let back = serde_json::to_string(&d).unwrap();
        assert_eq!(back, r#"[["Length","1"],["Time","-1"]]"#);
    }
}
