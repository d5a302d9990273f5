use crate::dimension::Dimension;
use crate::scale::Scale;
use thiserror::Error;

/// Error type for invalid unit algebra and conversions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitsError {
    /// A value outside the domain of an operation, e.g. the square root of a negative ratio
    /// or a zero conversion ratio.
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),
    /// Rational arithmetic exceeded the 128-bit representation.
    #[error("Integer overflow while computing {0}")]
    Overflow(String),
    #[error("Incompatible dimensions: cannot combine {from} with {to}")]
    IncompatibleDimension { from: Dimension, to: Dimension },
    #[error("Division by zero")]
    DivideByZero,
    #[error("Incompatible scales: cannot combine {left} with {right}")]
    IncompatibleScale { left: Scale, right: Scale },
    #[error("Expected a dimensionless quantity, got {0}")]
    NotDimensionless(Dimension),
}

/// Convenience type for `Result<T, UnitsError>`.
pub type UnitsResult<T> = Result<T, UnitsError>;
