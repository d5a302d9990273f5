//! Values bound to a unit and a scale.
//!
//! A [`Quantity`] stores its magnitude in *linearized* form together with the
//! [`ConversionFactor`] it is expressed in and the [`Scale`] used to display it. Arithmetic
//! deduces the unit of the result from the operands:
//!
//! - `+` and `−` on linear quantities convert the right operand into the left unit.
//! - `×` and `÷` compose the units, so `meters / seconds` is a velocity.
//! - `+` on two decibel quantities multiplies the power ratios and `−` divides them.
//!
//! Every combination that can fail (incompatible dimensions or scales, rational overflow while
//! composing units) returns a [`UnitsResult`], so the operators are used as `(a + b)?`.
//!
//! ```
//! use rsunits_core::conversion_factor::ConversionFactor;
//! use rsunits_core::dimension::{BaseDimension, Dimension};
//! use rsunits_core::quantity::Quantity;
//!
//! let meters = ConversionFactor::base(Dimension::base(BaseDimension::Length));
//! let feet = meters.derive_ratio(381, 1250).unwrap();
//!
//! let total = (Quantity::new(1.0, meters.clone()) + Quantity::new(10.0, feet)).unwrap();
//! assert_eq!(total.unit(), &meters);
//! assert!((total.value() - 4.048).abs() < 1e-12);
//! ```

use crate::conversion_factor::ConversionFactor;
use crate::convert::convert;
use crate::dimension::Dimension;
use crate::errors::{UnitsError, UnitsResult};
use crate::ratio_sqrt::DEFAULT_SQRT_EPSILON;
use crate::scale::Scale;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

/// Tolerant float comparison used for quantity equality.
fn nearly_equal(a: f64, b: f64) -> bool {
    let diff = (a - b).abs();
    a == b || diff < f64::EPSILON * (a + b).abs() || diff < f64::MIN_POSITIVE
}

/// A numeric value in a unit, on a linear or decibel scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quantity {
    /// Linearized magnitude, in `unit`
    magnitude: f64,
    unit: ConversionFactor,
    scale: Scale,
}

impl Quantity {
    /// A linear quantity of `value` in `unit`.
    pub fn new(value: f64, unit: ConversionFactor) -> Self {
        Self::with_scale(value, unit, Scale::Linear)
    }

    /// A decibel quantity displaying as `value` dB.
    pub fn decibel(value: f64, unit: ConversionFactor) -> Self {
        Self::with_scale(value, unit, Scale::Decibel)
    }

    /// Creates a quantity from a display value, linearizing it for storage.
    pub fn with_scale(value: f64, unit: ConversionFactor, scale: Scale) -> Self {
        Self::from_linearized(scale.linearize(value), unit, scale)
    }

    /// Creates a quantity from an already linearized magnitude.
    pub fn from_linearized(magnitude: f64, unit: ConversionFactor, scale: Scale) -> Self {
        Self {
            magnitude,
            unit,
            scale,
        }
    }

    /// The value as shown to callers, i.e. in decibels for a decibel quantity.
    pub fn value(&self) -> f64 {
        self.scale.display(self.magnitude)
    }

    /// The stored, linearized magnitude.
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn unit(&self) -> &ConversionFactor {
        &self.unit
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn dimension(&self) -> &Dimension {
        self.unit.dimension()
    }

    pub fn is_dimensionless(&self) -> bool {
        self.unit.is_dimensionless()
    }

    /// Returns true if `other` has the same dimension, regardless of scale.
    pub fn is_compatible(&self, other: &Quantity) -> bool {
        self.unit.is_compatible(&other.unit)
    }

    /// Expresses the quantity in another compatible unit, keeping its scale.
    pub fn convert_to(&self, unit: &ConversionFactor) -> UnitsResult<Quantity> {
        Ok(Self::from_linearized(
            convert(self.magnitude, &self.unit, unit)?,
            unit.clone(),
            self.scale,
        ))
    }

    /// Expresses the quantity in another unit and scale.
    ///
    /// # Errors
    ///
    /// [`UnitsError::IncompatibleScale`] unless `scale` matches the current scale, plus the
    /// errors of [`convert`].
    pub fn convert_to_scaled(
        &self,
        unit: &ConversionFactor,
        scale: Scale,
    ) -> UnitsResult<Quantity> {
        if scale != self.scale {
            return Err(UnitsError::IncompatibleScale {
                left: self.scale,
                right: scale,
            });
        }
        self.convert_to(unit)
    }

    /// The display value in `unit`.
    pub fn value_in(&self, unit: &ConversionFactor) -> UnitsResult<f64> {
        Ok(self.convert_to(unit)?.value())
    }

    fn as_linear(&self) -> Quantity {
        Self::from_linearized(self.magnitude, self.unit.clone(), Scale::Linear)
    }

    /// Linearized magnitude expressed in the ratio-1 dimensionless unit.
    fn scalar_magnitude(&self) -> UnitsResult<f64> {
        if !self.is_dimensionless() {
            return Err(UnitsError::NotDimensionless(self.dimension().clone()));
        }
        convert(self.magnitude, &self.unit, &ConversionFactor::dimensionless())
    }

    fn require_linear(&self, operation: &str) -> UnitsResult<()> {
        if self.scale.is_linear() {
            Ok(())
        } else {
            Err(UnitsError::InvalidDomain(format!(
                "{operation} is only defined for linear quantities"
            )))
        }
    }

    fn require_linear_pair(&self, rhs: &Quantity) -> UnitsResult<()> {
        if self.scale.is_linear() && rhs.scale.is_linear() {
            Ok(())
        } else {
            Err(UnitsError::IncompatibleScale {
                left: self.scale,
                right: rhs.scale,
            })
        }
    }

    fn combine_additive(&self, rhs: &Quantity, subtract: bool) -> UnitsResult<Quantity> {
        match (self.scale, rhs.scale) {
            (Scale::Linear, Scale::Linear) => self.add_linear(rhs, subtract),
            (Scale::Decibel, Scale::Decibel) => self.add_decibel(rhs, subtract),
            (left, right) => {
                // mixed scales only combine as plain numbers, in linear terms
                if !(self.is_dimensionless() && rhs.is_dimensionless()) {
                    return Err(UnitsError::IncompatibleScale { left, right });
                }
                self.as_linear().add_linear(&rhs.as_linear(), subtract)
            }
        }
    }

    fn add_linear(&self, rhs: &Quantity, subtract: bool) -> UnitsResult<Quantity> {
        let rhs = convert(rhs.magnitude, &rhs.unit, &self.unit)?;
        let magnitude = if subtract {
            self.magnitude - rhs
        } else {
            self.magnitude + rhs
        };
        Ok(Self::from_linearized(
            magnitude,
            self.unit.clone(),
            Scale::Linear,
        ))
    }

    fn add_decibel(&self, rhs: &Quantity, subtract: bool) -> UnitsResult<Quantity> {
        let (magnitude, unit) = if self.is_compatible(rhs) {
            let rhs = convert(rhs.magnitude, &rhs.unit, &self.unit)?;
            if subtract {
                (self.magnitude / rhs, ConversionFactor::dimensionless())
            } else {
                (self.magnitude * rhs, self.unit.square()?)
            }
        } else if rhs.is_dimensionless() {
            let rhs = rhs.scalar_magnitude()?;
            let magnitude = if subtract {
                self.magnitude / rhs
            } else {
                self.magnitude * rhs
            };
            (magnitude, self.unit.clone())
        } else if self.is_dimensionless() {
            let lhs = self.scalar_magnitude()?;
            if subtract {
                (lhs / rhs.magnitude, rhs.unit.invert()?)
            } else {
                (lhs * rhs.magnitude, rhs.unit.clone())
            }
        } else {
            return Err(UnitsError::IncompatibleDimension {
                from: rhs.dimension().clone(),
                to: self.dimension().clone(),
            });
        };
        Ok(Self::from_linearized(magnitude, unit, Scale::Decibel))
    }

    fn try_add(&self, rhs: &Quantity) -> UnitsResult<Quantity> {
        self.combine_additive(rhs, false)
    }

    fn try_sub(&self, rhs: &Quantity) -> UnitsResult<Quantity> {
        self.combine_additive(rhs, true)
    }

    fn try_mul(&self, rhs: &Quantity) -> UnitsResult<Quantity> {
        self.require_linear_pair(rhs)?;
        Ok(Self::from_linearized(
            self.magnitude * rhs.magnitude,
            self.unit.multiply(&rhs.unit)?,
            Scale::Linear,
        ))
    }

    fn try_div(&self, rhs: &Quantity) -> UnitsResult<Quantity> {
        self.require_linear_pair(rhs)?;
        Ok(Self::from_linearized(
            self.magnitude / rhs.magnitude,
            self.unit.divide(&rhs.unit)?,
            Scale::Linear,
        ))
    }

    /// Remainder after dividing by `rhs` expressed in this unit.
    fn try_rem(&self, rhs: &Quantity) -> UnitsResult<Quantity> {
        self.require_linear_pair(rhs)?;
        let rhs = convert(rhs.magnitude, &rhs.unit, &self.unit)?;
        self.rem_scalar(rhs)
    }

    fn scale_by(&self, factor: f64) -> UnitsResult<Quantity> {
        self.require_linear("scalar multiplication")?;
        Ok(Self::from_linearized(
            self.magnitude * factor,
            self.unit.clone(),
            Scale::Linear,
        ))
    }

    fn rem_scalar(&self, divisor: f64) -> UnitsResult<Quantity> {
        self.require_linear("remainder")?;
        if divisor == 0.0 {
            return Err(UnitsError::DivideByZero);
        }
        Ok(Self::from_linearized(
            self.magnitude % divisor,
            self.unit.clone(),
            Scale::Linear,
        ))
    }

    /// Raises the quantity to an integer power, applying the same power to its unit.
    pub fn pow(&self, exp: i32) -> UnitsResult<Quantity> {
        self.require_linear("pow")?;
        Ok(Self::from_linearized(
            self.magnitude.powi(exp),
            self.unit.pow(exp)?,
            Scale::Linear,
        ))
    }

    /// Square root, with the unit's ratio approximated to within `1e-10`.
    pub fn sqrt(&self) -> UnitsResult<Quantity> {
        self.sqrt_with(DEFAULT_SQRT_EPSILON)
    }

    /// Square root, with the unit's ratio approximated to within `1 / eps`.
    ///
    /// See [`ConversionFactor::sqrt`].
    pub fn sqrt_with(&self, eps: i128) -> UnitsResult<Quantity> {
        self.require_linear("sqrt")?;
        if self.magnitude < 0.0 {
            return Err(UnitsError::InvalidDomain(format!(
                "cannot take the square root of negative value {}",
                self.magnitude
            )));
        }
        Ok(Self::from_linearized(
            self.magnitude.sqrt(),
            self.unit.sqrt(eps)?,
            Scale::Linear,
        ))
    }

    pub fn abs(&self) -> Quantity {
        Self::with_scale(self.value().abs(), self.unit.clone(), self.scale)
    }

    /// The smaller of two compatible quantities, expressed in this unit.
    pub fn min(&self, other: &Quantity) -> UnitsResult<Quantity> {
        let other = other.convert_to_scaled(&self.unit, self.scale)?;
        Ok(if other.magnitude < self.magnitude {
            other
        } else {
            self.clone()
        })
    }

    /// The larger of two compatible quantities, expressed in this unit.
    pub fn max(&self, other: &Quantity) -> UnitsResult<Quantity> {
        let other = other.convert_to_scaled(&self.unit, self.scale)?;
        Ok(if other.magnitude > self.magnitude {
            other
        } else {
            self.clone()
        })
    }

    /// `sqrt(self² + other²)` without intermediate overflow, in this unit.
    pub fn hypot(&self, other: &Quantity) -> UnitsResult<Quantity> {
        self.require_linear_pair(other)?;
        let other = convert(other.magnitude, &other.unit, &self.unit)?;
        Ok(Self::from_linearized(
            self.magnitude.hypot(other),
            self.unit.clone(),
            Scale::Linear,
        ))
    }

    fn dimensionless_fn(&self, name: &str, f: fn(f64) -> f64) -> UnitsResult<Quantity> {
        self.require_linear(name)?;
        Ok(Quantity::from(f(self.scalar_magnitude()?)))
    }

    /// `e^self` for a dimensionless quantity.
    pub fn exp(&self) -> UnitsResult<Quantity> {
        self.dimensionless_fn("exp", f64::exp)
    }

    /// Natural logarithm of a dimensionless quantity.
    pub fn ln(&self) -> UnitsResult<Quantity> {
        self.dimensionless_fn("ln", f64::ln)
    }

    pub fn log10(&self) -> UnitsResult<Quantity> {
        self.dimensionless_fn("log10", f64::log10)
    }

    /// `2^self` for a dimensionless quantity.
    pub fn exp2(&self) -> UnitsResult<Quantity> {
        self.dimensionless_fn("exp2", f64::exp2)
    }

    /// `e^self - 1`, accurate for small dimensionless values.
    pub fn exp_m1(&self) -> UnitsResult<Quantity> {
        self.dimensionless_fn("exp_m1", f64::exp_m1)
    }

    pub fn log2(&self) -> UnitsResult<Quantity> {
        self.dimensionless_fn("log2", f64::log2)
    }

    /// `ln(1 + self)`, accurate for small dimensionless values.
    pub fn ln_1p(&self) -> UnitsResult<Quantity> {
        self.dimensionless_fn("ln_1p", f64::ln_1p)
    }

    fn rounding_fn(&self, name: &str, f: fn(f64) -> f64) -> UnitsResult<Quantity> {
        self.require_linear(name)?;
        Ok(Self::from_linearized(
            f(self.magnitude),
            self.unit.clone(),
            Scale::Linear,
        ))
    }

    /// Smallest integer value not below the quantity, in its own unit.
    pub fn ceil(&self) -> UnitsResult<Quantity> {
        self.rounding_fn("ceil", f64::ceil)
    }

    /// Largest integer value not above the quantity, in its own unit.
    pub fn floor(&self) -> UnitsResult<Quantity> {
        self.rounding_fn("floor", f64::floor)
    }

    pub fn trunc(&self) -> UnitsResult<Quantity> {
        self.rounding_fn("trunc", f64::trunc)
    }

    /// Nearest integer value, rounding half away from zero.
    pub fn round(&self) -> UnitsResult<Quantity> {
        self.rounding_fn("round", f64::round)
    }

    /// This quantity with the sign of `sign`, which may be in any unit.
    pub fn copysign(&self, sign: &Quantity) -> UnitsResult<Quantity> {
        self.require_linear_pair(sign)?;
        Ok(Self::from_linearized(
            self.magnitude.copysign(sign.magnitude),
            self.unit.clone(),
            Scale::Linear,
        ))
    }

    /// Positive difference `max(self - other, 0)`, in this unit.
    pub fn fdim(&self, other: &Quantity) -> UnitsResult<Quantity> {
        self.require_linear_pair(other)?;
        let other = convert(other.magnitude, &other.unit, &self.unit)?;
        Ok(Self::from_linearized(
            (self.magnitude - other).max(0.0),
            self.unit.clone(),
            Scale::Linear,
        ))
    }

    /// Fused `self * factor + addend`, with a single rounding.
    ///
    /// The result is in the unit of `self * factor`, which `addend` must be compatible with.
    pub fn mul_add(&self, factor: &Quantity, addend: &Quantity) -> UnitsResult<Quantity> {
        self.require_linear_pair(factor)?;
        addend.require_linear("mul_add")?;
        let unit = self.unit.multiply(&factor.unit)?;
        let addend = convert(addend.magnitude, &addend.unit, &unit)?;
        Ok(Self::from_linearized(
            self.magnitude.mul_add(factor.magnitude, addend),
            unit,
            Scale::Linear,
        ))
    }

    pub fn is_nan(&self) -> bool {
        self.value().is_nan()
    }

    pub fn is_infinite(&self) -> bool {
        self.value().is_infinite()
    }

    pub fn is_finite(&self) -> bool {
        self.value().is_finite()
    }

    /// True if the display value has its sign bit set, including `-0.0` and `-3 dB`.
    pub fn is_sign_negative(&self) -> bool {
        self.value().is_sign_negative()
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Quantity::new(value, ConversionFactor::dimensionless())
    }
}

impl TryFrom<Quantity> for f64 {
    type Error = UnitsError;

    fn try_from(value: Quantity) -> Result<Self, Self::Error> {
        Ok(value.scale.display(value.scalar_magnitude()?))
    }
}

impl PartialEq for Quantity {
    /// Compares after converting `other` into this unit. Quantities of different dimension or
    /// scale are never equal.
    fn eq(&self, other: &Self) -> bool {
        if self.scale != other.scale {
            return false;
        }
        match convert(other.magnitude, &other.unit, &self.unit) {
            Ok(rhs) => nearly_equal(self.magnitude, rhs),
            Err(_) => false,
        }
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.scale != other.scale {
            return None;
        }
        let rhs = convert(other.magnitude, &other.unit, &self.unit).ok()?;
        if nearly_equal(self.magnitude, rhs) {
            Some(Ordering::Equal)
        } else {
            self.magnitude.partial_cmp(&rhs)
        }
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Self::Output {
        let magnitude = match self.scale {
            Scale::Linear => -self.magnitude,
            // -x dB is the reciprocal power ratio
            Scale::Decibel => self.magnitude.recip(),
        };
        Self::from_linearized(magnitude, self.unit, self.scale)
    }
}

impl Neg for &Quantity {
    type Output = Quantity;

    fn neg(self) -> Self::Output {
        -self.clone()
    }
}

macro_rules! quantity_binop {
    ($op:ident, $method:ident, $inner:ident) => {
        impl $op<&Quantity> for &Quantity {
            type Output = UnitsResult<Quantity>;

            fn $method(self, rhs: &Quantity) -> Self::Output {
                self.$inner(rhs)
            }
        }

        impl $op<Quantity> for Quantity {
            type Output = UnitsResult<Quantity>;

            fn $method(self, rhs: Quantity) -> Self::Output {
                self.$inner(&rhs)
            }
        }

        impl $op<&Quantity> for Quantity {
            type Output = UnitsResult<Quantity>;

            fn $method(self, rhs: &Quantity) -> Self::Output {
                self.$inner(rhs)
            }
        }
    };
}

quantity_binop!(Add, add, try_add);
quantity_binop!(Sub, sub, try_sub);
quantity_binop!(Mul, mul, try_mul);
quantity_binop!(Div, div, try_div);
quantity_binop!(Rem, rem, try_rem);

macro_rules! scalar_binop {
    ($op:ident, $method:ident, |$q:ident, $x:ident| $body:expr) => {
        impl $op<f64> for &Quantity {
            type Output = UnitsResult<Quantity>;

            fn $method(self, rhs: f64) -> Self::Output {
                let ($q, $x) = (self, rhs);
                $body
            }
        }

        impl $op<f64> for Quantity {
            type Output = UnitsResult<Quantity>;

            fn $method(self, rhs: f64) -> Self::Output {
                let ($q, $x) = (&self, rhs);
                $body
            }
        }
    };
}

// Bare numbers add only to dimensionless quantities, but scale anything linear
scalar_binop!(Add, add, |q, x| q.try_add(&Quantity::from(x)));
scalar_binop!(Sub, sub, |q, x| q.try_sub(&Quantity::from(x)));
scalar_binop!(Mul, mul, |q, x| q.scale_by(x));
scalar_binop!(Div, div, |q, x| q.scale_by(x.recip()));
scalar_binop!(Rem, rem, |q, x| q.rem_scalar(x));

impl Mul<Quantity> for f64 {
    type Output = UnitsResult<Quantity>;

    fn mul(self, rhs: Quantity) -> Self::Output {
        rhs.scale_by(self)
    }
}

impl Div<Quantity> for f64 {
    type Output = UnitsResult<Quantity>;

    fn div(self, rhs: Quantity) -> Self::Output {
        Quantity::from(self).try_div(&rhs)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value(), self.unit)?;
        if self.scale == Scale::Decibel {
            write!(f, " dB")?;
        }
        Ok(())
    }
}
