//! Dimensional analysis and unit conversion.
//!
//! The core algebra (dimensions, conversion factors and quantities) lives in
//! [`rsunits_core`], the named catalog and physical constants in [`rsunits_catalog`]. Both are
//! re-exported here.
//!
//! ```
//! use rsunits::STANDARD_CATALOG;
//!
//! let fahrenheit = STANDARD_CATALOG.convert(100.0, "degC", "degF").unwrap();
//! assert!((fahrenheit - 212.0).abs() < 5e-5);
//! ```

pub use rsunits_catalog::{
    catalog, config, constants, standard, PhysicalConstants, UnitCatalog, UnitEntry, CONSTANTS,
    STANDARD_CATALOG,
};
pub use rsunits_core::{
    conversion_factor, convert, dimension, quantity, ratio_sqrt, rational, scale, BaseDimension,
    ConversionFactor, Dimension, Quantity, Rational, Scale, UnitsError, UnitsResult,
};
pub use rsunits_catalog::errors::{CatalogError, CatalogResult};

#[cfg(feature = "python")]
mod python;
