//! Conversion factors: the definition of a concrete unit.
//!
//! A [`ConversionFactor`] anchors a unit to the base unit of its [`Dimension`]. A value `v`
//! in the unit corresponds to
//!
//! ```text
//! v * ratio * π^pi_exponent + translation
//! ```
//!
//! in the base unit (the unit of the same dimension with ratio 1, no π and no translation).
//! The translation is always expressed in base-unit terms.
//!
//! Named units are built with [`ConversionFactor::derive`] from a previously defined unit, and
//! compound units with the algebra on this type (velocity is `meters.divide(&seconds)`).
//!
//! ```
//! use rsunits_core::conversion_factor::ConversionFactor;
//! use rsunits_core::dimension::{BaseDimension, Dimension};
//! use rsunits_core::rational::Rational;
//!
//! let meters = ConversionFactor::base(Dimension::base(BaseDimension::Length));
//! let feet = meters.derive_ratio(381, 1250).unwrap();
//! let square_feet = feet.square().unwrap();
//! assert_eq!(square_feet.ratio(), Rational::new(145161, 1562500).unwrap());
//! ```

use crate::dimension::Dimension;
use crate::errors::{UnitsError, UnitsResult};
use crate::ratio_sqrt::ratio_sqrt;
use crate::rational::Rational;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A unit definition: dimension, exact ratio, π-exponent and datum translation.
///
/// Immutable. New factors only come out of [`ConversionFactor::derive`] and the algebra
/// methods, which validate that the ratio is nonzero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ConversionFactorRepr", into = "ConversionFactorRepr")]
pub struct ConversionFactor {
    dimension: Dimension,
    ratio: Rational,
    pi_exponent: Rational,
    translation: Rational,
}

/// Unvalidated serialized form of a [`ConversionFactor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConversionFactorRepr {
    dimension: Dimension,
    ratio: Rational,
    #[serde(default)]
    pi_exponent: Rational,
    #[serde(default)]
    translation: Rational,
}

impl ConversionFactor {
    /// The base unit of `dimension`: ratio 1, no π-exponent and no translation.
    #[must_use]
    pub fn base(dimension: Dimension) -> Self {
        Self {
            dimension,
            ratio: Rational::ONE,
            pi_exponent: Rational::ZERO,
            translation: Rational::ZERO,
        }
    }

    /// The dimensionless scalar unit.
    #[must_use]
    pub fn dimensionless() -> Self {
        Self::base(Dimension::dimensionless())
    }

    /// Creates a conversion factor from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`UnitsError::InvalidDomain`] if `ratio` is zero.
    pub fn new(
        dimension: Dimension,
        ratio: Rational,
        pi_exponent: Rational,
        translation: Rational,
    ) -> UnitsResult<Self> {
        if ratio.is_zero() {
            return Err(UnitsError::InvalidDomain(format!(
                "conversion ratio of a {dimension} unit cannot be zero"
            )));
        }
        Ok(Self {
            dimension,
            ratio,
            pi_exponent,
            translation,
        })
    }

    #[must_use]
    pub fn dimension(&self) -> &Dimension {
        &self.dimension
    }

    #[must_use]
    pub fn ratio(&self) -> Rational {
        self.ratio
    }

    #[must_use]
    pub fn pi_exponent(&self) -> Rational {
        self.pi_exponent
    }

    #[must_use]
    pub fn translation(&self) -> Rational {
        self.translation
    }

    /// Returns true if both factors have the same dimension, i.e. values can be converted
    /// between them.
    #[must_use]
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.dimension.is_compatible(&other.dimension)
    }

    #[must_use]
    pub fn is_dimensionless(&self) -> bool {
        self.dimension.is_dimensionless()
    }

    /// Defines a new unit relative to this one.
    ///
    /// One of the new unit is `ratio * π^pi_exponent` of this unit, shifted by `translation`
    /// of this unit. Ratios multiply, π-exponents add, and the translation is rescaled into
    /// base-unit terms before being added to this unit's own translation.
    ///
    /// For example fahrenheit is `celsius.derive(5/9, 0, -160/9)`.
    pub fn derive(
        &self,
        ratio: Rational,
        pi_exponent: Rational,
        translation: Rational,
    ) -> UnitsResult<Self> {
        Self::new(
            self.dimension.clone(),
            self.ratio.checked_mul(&ratio)?,
            self.pi_exponent.checked_add(&pi_exponent)?,
            self.ratio
                .checked_mul(&translation)?
                .checked_add(&self.translation)?,
        )
    }

    /// Shorthand for [`derive`](Self::derive) with a plain `numer / denom` ratio.
    pub fn derive_ratio(&self, numer: i128, denom: i128) -> UnitsResult<Self> {
        self.derive(Rational::new(numer, denom)?, Rational::ZERO, Rational::ZERO)
    }

    /// The product of two units. Translations are dropped.
    pub fn multiply(&self, other: &Self) -> UnitsResult<Self> {
        Self::new(
            self.dimension.multiply(&other.dimension)?,
            self.ratio.checked_mul(&other.ratio)?,
            self.pi_exponent.checked_add(&other.pi_exponent)?,
            Rational::ZERO,
        )
    }

    /// The quotient of two units. Translations are dropped.
    pub fn divide(&self, other: &Self) -> UnitsResult<Self> {
        Self::new(
            self.dimension.divide(&other.dimension)?,
            self.ratio.checked_div(&other.ratio)?,
            self.pi_exponent.checked_sub(&other.pi_exponent)?,
            Rational::ZERO,
        )
    }

    /// The reciprocal unit. Inverses are rates, so the translation is dropped.
    pub fn invert(&self) -> UnitsResult<Self> {
        Self::new(
            self.dimension.invert(),
            self.ratio.reciprocal()?,
            -self.pi_exponent,
            Rational::ZERO,
        )
    }

    /// Raises the unit to an integer power.
    ///
    /// Positive powers keep the translation (it is the same unit raised to a power, not a
    /// product of two offset scales). Negative powers are the inverse of the positive power and
    /// drop it. The zeroth power is the dimensionless unit.
    pub fn pow(&self, exp: i32) -> UnitsResult<Self> {
        if exp == 0 {
            return Ok(Self::dimensionless());
        }
        let n = Rational::from_integer(i64::from(exp.unsigned_abs()));
        let positive = Self::new(
            self.dimension.pow(&n)?,
            self.ratio.checked_pow(exp.unsigned_abs() as i32)?,
            self.pi_exponent.checked_mul(&n)?,
            self.translation,
        )?;
        if exp < 0 {
            positive.invert()
        } else {
            Ok(positive)
        }
    }

    pub fn square(&self) -> UnitsResult<Self> {
        self.pow(2)
    }

    pub fn cube(&self) -> UnitsResult<Self> {
        self.pow(3)
    }

    /// Approximate square root of the unit.
    ///
    /// The ratio is approximated with [`ratio_sqrt`] to within `1 / eps`; the dimension and the
    /// π-exponent are halved exactly and the translation is kept.
    ///
    /// This is an approximation: `sqrt(f).square()` is generally *not* equal to `f`, and errors
    /// propagate into anything built from the result.
    pub fn sqrt(&self, eps: i128) -> UnitsResult<Self> {
        let two = Rational::from_integer(2);
        Self::new(
            self.dimension.root(&two)?,
            ratio_sqrt(&self.ratio, eps)?,
            self.pi_exponent.checked_div(&two)?,
            self.translation,
        )
    }
}

impl Default for ConversionFactor {
    fn default() -> Self {
        Self::dimensionless()
    }
}

impl TryFrom<ConversionFactorRepr> for ConversionFactor {
    type Error = UnitsError;

    fn try_from(value: ConversionFactorRepr) -> Result<Self, Self::Error> {
        Self::new(
            value.dimension,
            value.ratio,
            value.pi_exponent,
            value.translation,
        )
    }
}

impl From<ConversionFactor> for ConversionFactorRepr {
    fn from(value: ConversionFactor) -> Self {
        Self {
            dimension: value.dimension,
            ratio: value.ratio,
            pi_exponent: value.pi_exponent,
            translation: value.translation,
        }
    }
}

impl fmt::Display for ConversionFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ratio)?;
        if !self.pi_exponent.is_zero() {
            write!(f, " π^{}", self.pi_exponent)?;
        }
        write!(f, " [{}]", self.dimension)?;
        if !self.translation.is_zero() {
            write!(f, " + {}", self.translation)?;
        }
        Ok(())
    }
}
