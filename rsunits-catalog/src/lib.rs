//! Named units and physical constants built on `rsunits-core`.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod standard;

pub mod errors;

pub use catalog::{UnitCatalog, UnitEntry};
pub use constants::{PhysicalConstants, CONSTANTS};
pub use standard::STANDARD_CATALOG;
