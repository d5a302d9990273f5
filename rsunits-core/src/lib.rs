//! Dimension algebra and unit conversion.
//!
//! Units are runtime values: a [`ConversionFactor`] pairs a [`Dimension`] with an exact
//! [`Rational`] ratio, a π-exponent and a datum translation. Factors compose algebraically
//! (length / time is a velocity), convert values between each other, and back the
//! [`Quantity`] type, which checks dimensional compatibility on every operation.

pub mod conversion_factor;
pub mod convert;
pub mod dimension;
pub mod errors;
pub mod quantity;
pub mod ratio_sqrt;
pub mod rational;
pub mod scale;

#[cfg(feature = "python")]
pub mod python;

pub use conversion_factor::ConversionFactor;
pub use dimension::{BaseDimension, Dimension};
pub use errors::{UnitsError, UnitsResult};
pub use quantity::Quantity;
pub use rational::Rational;
pub use scale::Scale;
