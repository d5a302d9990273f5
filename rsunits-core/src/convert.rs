//! Numeric conversion between compatible units.
//!
//! With `ratio = from.ratio / to.ratio`, `k = from.pi - to.pi` and
//! `offset = (from.translation - to.translation) / to.ratio`, a value converts as
//!
//! ```text
//! value * ratio * π^k + offset
//! ```
//!
//! The π and offset terms are skipped when they are zero, so conversions between units that
//! only differ by a rational ratio are exact up to the `f64` representation of the ratio.
//!
//! A [`ConversionPlan`] does the exact rational work once, which is worthwhile when the same
//! pair of units is applied to a whole series (see [`convert_array`]).

use crate::conversion_factor::ConversionFactor;
use crate::errors::{UnitsError, UnitsResult};
use crate::rational::Rational;
use log::trace;
use ndarray::{Array1, ArrayView1};
use num::{Float, NumCast};
use std::f64::consts::PI;

/// A precomputed conversion between two compatible units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConversionPlan {
    /// Both units are the same
    Identity,
    /// `value * numer / denom`
    Ratio { numer: f64, denom: f64 },
    /// `value * ratio * π^k`, with the π term already evaluated
    Pi { ratio: f64, pi_factor: f64 },
    /// `value * ratio + offset`
    Offset { ratio: f64, offset: f64 },
    /// `value * ratio * π^k + offset`
    PiOffset {
        ratio: f64,
        pi_factor: f64,
        offset: f64,
    },
}

/// `π^exponent`, using an integer power where possible.
fn pi_power(exponent: &Rational) -> f64 {
    if exponent.is_integer() {
        match i32::try_from(exponent.numer()) {
            Ok(n) => PI.powi(n),
            Err(_) => PI.powf(exponent.to_f64()),
        }
    } else {
        PI.powf(exponent.to_f64())
    }
}

impl ConversionPlan {
    /// Plans the conversion of values in `from` into `to`.
    ///
    /// # Errors
    ///
    /// [`UnitsError::IncompatibleDimension`] if the units have different dimensions, or
    /// [`UnitsError::Overflow`] if the rational terms cannot be represented.
    pub fn between(from: &ConversionFactor, to: &ConversionFactor) -> UnitsResult<Self> {
        if !from.is_compatible(to) {
            return Err(UnitsError::IncompatibleDimension {
                from: from.dimension().clone(),
                to: to.dimension().clone(),
            });
        }
        if from == to {
            return Ok(ConversionPlan::Identity);
        }

        let ratio = from.ratio().checked_div(&to.ratio())?;
        let pi_diff = from.pi_exponent().checked_sub(&to.pi_exponent())?;
        let offset = from
            .translation()
            .checked_sub(&to.translation())?
            .checked_div(&to.ratio())?;

        let plan = match (pi_diff.is_zero(), offset.is_zero()) {
            (true, true) => ConversionPlan::Ratio {
                numer: ratio.numer() as f64,
                denom: ratio.denom() as f64,
            },
            (false, true) => ConversionPlan::Pi {
                ratio: ratio.to_f64(),
                pi_factor: pi_power(&pi_diff),
            },
            (true, false) => ConversionPlan::Offset {
                ratio: ratio.to_f64(),
                offset: offset.to_f64(),
            },
            (false, false) => ConversionPlan::PiOffset {
                ratio: ratio.to_f64(),
                pi_factor: pi_power(&pi_diff),
                offset: offset.to_f64(),
            },
        };
        trace!("Planned conversion from {from} to {to}: {plan:?}");
        Ok(plan)
    }

    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            ConversionPlan::Identity => value,
            ConversionPlan::Ratio { numer, denom } => value * numer / denom,
            ConversionPlan::Pi { ratio, pi_factor } => value * ratio * pi_factor,
            ConversionPlan::Offset { ratio, offset } => value * ratio + offset,
            ConversionPlan::PiOffset {
                ratio,
                pi_factor,
                offset,
            } => value * ratio * pi_factor + offset,
        }
    }
}

/// Converts `value` from one unit into a compatible one.
///
/// ```
/// use rsunits_core::conversion_factor::ConversionFactor;
/// use rsunits_core::convert::convert;
/// use rsunits_core::dimension::{BaseDimension, Dimension};
///
/// let meters = ConversionFactor::base(Dimension::base(BaseDimension::Length));
/// let kilometers = meters.derive_ratio(1000, 1).unwrap();
/// assert_eq!(convert(2.5, &kilometers, &meters).unwrap(), 2500.0);
///
/// let seconds = ConversionFactor::base(Dimension::base(BaseDimension::Time));
/// assert!(convert(1.0, &meters, &seconds).is_err());
/// ```
pub fn convert(value: f64, from: &ConversionFactor, to: &ConversionFactor) -> UnitsResult<f64> {
    Ok(ConversionPlan::between(from, to)?.apply(value))
}

/// Converts a value of any float type, computing in double precision.
pub fn convert_value<T: Float>(
    value: T,
    from: &ConversionFactor,
    to: &ConversionFactor,
) -> UnitsResult<T> {
    let wide = value
        .to_f64()
        .ok_or_else(|| UnitsError::InvalidDomain("value is not representable as f64".into()))?;
    let converted = convert(wide, from, to)?;
    <T as NumCast>::from(converted).ok_or_else(|| {
        UnitsError::InvalidDomain(format!("converted value {converted} is out of range"))
    })
}

/// Converts every element of `values` with a single plan.
pub fn convert_array(
    values: ArrayView1<f64>,
    from: &ConversionFactor,
    to: &ConversionFactor,
) -> UnitsResult<Array1<f64>> {
    let plan = ConversionPlan::between(from, to)?;
    Ok(values.mapv(|v| plan.apply(v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::{BaseDimension, Dimension};
    use is_close::is_close;
    use ndarray::array;

    fn r(n: i128, d: i128) -> Rational {
        Rational::new(n, d).unwrap()
    }

    fn meters() -> ConversionFactor {
        ConversionFactor::base(Dimension::base(BaseDimension::Length))
    }

    fn feet() -> ConversionFactor {
        meters().derive_ratio(381, 1250).unwrap()
    }

    fn radians() -> ConversionFactor {
        ConversionFactor::base(Dimension::base(BaseDimension::Angle))
    }

    fn degrees() -> ConversionFactor {
        radians().derive(r(1, 180), Rational::ONE, Rational::ZERO).unwrap()
    }

    fn celsius() -> ConversionFactor {
        ConversionFactor::base(Dimension::base(BaseDimension::Temperature))
            .derive(Rational::ONE, Rational::ZERO, r(27315, 100))
            .unwrap()
    }

    fn fahrenheit() -> ConversionFactor {
        celsius().derive(r(5, 9), Rational::ZERO, r(-160, 9)).unwrap()
    }

    #[test]
    fn test_plan_branches() {
        assert_eq!(
            ConversionPlan::between(&feet(), &feet()).unwrap(),
            ConversionPlan::Identity
        );
        assert_eq!(
            ConversionPlan::between(&feet(), &meters()).unwrap(),
            ConversionPlan::Ratio {
                numer: 381.0,
                denom: 1250.0
            }
        );
        assert!(matches!(
            ConversionPlan::between(&degrees(), &radians()).unwrap(),
            ConversionPlan::Pi { .. }
        ));
        assert!(matches!(
            ConversionPlan::between(&celsius(), &fahrenheit()).unwrap(),
            ConversionPlan::Offset { .. }
        ));

        let offset_degrees = degrees()
            .derive(Rational::ONE, Rational::ZERO, Rational::from_integer(90))
            .unwrap();
        assert!(matches!(
            ConversionPlan::between(&offset_degrees, &radians()).unwrap(),
            ConversionPlan::PiOffset { .. }
        ));
    }

    #[test]
    fn test_identity_is_exact() {
        for value in [0.1, -7.25, 1e300, f64::MIN_POSITIVE] {
            assert_eq!(convert(value, &fahrenheit(), &fahrenheit()).unwrap(), value);
        }
    }

    #[test]
    fn test_convert_values() {
        assert!((convert(1.0, &meters(), &feet()).unwrap() - 3.28084).abs() < 5e-5);
        assert!((convert(0.0, &celsius(), &fahrenheit()).unwrap() - 32.0).abs() < 5e-5);
        assert!((convert(100.0, &celsius(), &fahrenheit()).unwrap() - 212.0).abs() < 5e-5);
        assert!((convert(-40.0, &fahrenheit(), &celsius()).unwrap() + 40.0).abs() < 5e-5);
        assert!(is_close!(
            convert(180.0, &degrees(), &radians()).unwrap(),
            std::f64::consts::PI
        ));
    }

    #[test]
    fn test_round_trip() {
        let pairs = [
            (meters(), feet()),
            (celsius(), fahrenheit()),
            (degrees(), radians()),
        ];
        for (a, b) in pairs {
            for value in [-12.5, 0.3, 1.0, 451.0] {
                let there = convert(value, &a, &b).unwrap();
                let back = convert(there, &b, &a).unwrap();
                assert!((back - value).abs() < 1e-9, "{value} -> {there} -> {back}");
            }
        }
    }

    #[test]
    fn test_incompatible() {
        let seconds = ConversionFactor::base(Dimension::base(BaseDimension::Time));
        let result = convert(1.0, &meters(), &seconds);
        assert_eq!(
            result,
            Err(UnitsError::IncompatibleDimension {
                from: Dimension::base(BaseDimension::Length),
                to: Dimension::base(BaseDimension::Time),
            })
        );
    }

    #[test]
    fn test_convert_value_f32() {
        let feet_per_meter: f32 = convert_value(1.0f32, &meters(), &feet()).unwrap();
        assert!((feet_per_meter - 3.28084).abs() < 1e-4);
    }

    #[test]
    fn test_convert_array() {
        let values = array![0.0, 100.0, -40.0];
        let converted = convert_array(values.view(), &celsius(), &fahrenheit()).unwrap();
        let expected = array![32.0, 212.0, -40.0];
        for (c, e) in converted.iter().zip(expected.iter()) {
            assert!((c - e).abs() < 5e-5);
        }
    }
}
