use rsunits_core::errors::UnitsError;
use thiserror::Error;

/// Error type for declaring and looking up named units.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error(transparent)]
    Units(#[from] UnitsError),
    #[error("Unit {0} is already declared")]
    DuplicateUnit(String),
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),
    /// A malformed catalog configuration.
    #[error("Invalid catalog configuration: {0}")]
    Config(String),
}

/// Convenience type for `Result<T, CatalogError>`.
pub type CatalogResult<T> = Result<T, CatalogError>;
