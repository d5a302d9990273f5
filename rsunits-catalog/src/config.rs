//! TOML catalog definitions.
//!
//! A catalog file declares units in order, each anchored to a base dimension or to an earlier
//! unit:
//!
//! ```toml
//! sqrt_epsilon = 10000000000
//!
//! [[unit]]
//! name = "meters"
//! abbreviation = "m"
//! base = "Length"
//!
//! [[unit]]
//! name = "feet"
//! abbreviation = "ft"
//! parent = "meters"
//! ratio = "381/1250"
//!
//! [[unit]]
//! name = "square_feet"
//! parent = "feet"
//! operation = "square"
//! ```
//!
//! Rational fields are strings (`"381/1250"`, `"-3"`) so they are never limited by TOML's
//! 64-bit integers.

use crate::errors::{CatalogError, CatalogResult};
use log::warn;
use rsunits_core::dimension::BaseDimension;
use rsunits_core::ratio_sqrt::DEFAULT_SQRT_EPSILON;
use rsunits_core::rational::Rational;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_sqrt_epsilon() -> i64 {
    DEFAULT_SQRT_EPSILON as i64
}

fn one() -> Rational {
    Rational::ONE
}

fn is_one(value: &Rational) -> bool {
    *value == Rational::ONE
}

fn is_zero(value: &Rational) -> bool {
    value.is_zero()
}

/// Unit manipulators that can be applied to the anchor before deriving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitOperation {
    Square,
    Cube,
    Sqrt,
    Invert,
}

/// A single `[[unit]]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    /// Anchor the unit to the base unit of a dimension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<BaseDimension>,
    /// Anchor the unit to a previously declared unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<UnitOperation>,
    #[serde(default = "one", skip_serializing_if = "is_one")]
    pub ratio: Rational,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub pi_exponent: Rational,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub translation: Rational,
}

impl UnitDefinition {
    /// A unit `ratio` times the size of `parent`.
    pub fn derived(name: &str, parent: &str, ratio: Rational) -> Self {
        Self {
            name: name.to_string(),
            abbreviation: None,
            base: None,
            parent: Some(parent.to_string()),
            operation: None,
            ratio,
            pi_exponent: Rational::ZERO,
            translation: Rational::ZERO,
        }
    }

    /// The base unit of `base`.
    pub fn base(name: &str, base: BaseDimension) -> Self {
        Self {
            name: name.to_string(),
            abbreviation: None,
            base: Some(base),
            parent: None,
            operation: None,
            ratio: Rational::ONE,
            pi_exponent: Rational::ZERO,
            translation: Rational::ZERO,
        }
    }

    pub fn with_abbreviation(mut self, abbreviation: &str) -> Self {
        self.abbreviation = Some(abbreviation.to_string());
        self
    }
}

/// A set of unit declarations plus the tolerance used for square-root operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    #[serde(default = "default_sqrt_epsilon")]
    pub sqrt_epsilon: i64,
    #[serde(default, rename = "unit")]
    pub units: Vec<UnitDefinition>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            sqrt_epsilon: default_sqrt_epsilon(),
            units: Vec::new(),
        }
    }
}

impl CatalogConfig {
    /// Parses a TOML catalog definition.
    ///
    /// Only the syntax and field types are checked here. The rest is checked by
    /// [`validate`](Self::validate) when the configuration is applied to a catalog.
    pub fn from_toml(source: &str) -> CatalogResult<Self> {
        toml::from_str(source).map_err(|e| CatalogError::Config(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&source)
    }

    pub fn to_toml(&self) -> CatalogResult<String> {
        toml::to_string(self).map_err(|e| CatalogError::Config(e.to_string()))
    }

    /// Checks the parts of the configuration that do not depend on a catalog.
    ///
    /// Warns once if `sqrt_epsilon` is above the default.
    pub fn validate(&self) -> CatalogResult<()> {
        if self.sqrt_epsilon <= 0 {
            return Err(CatalogError::Config(format!(
                "sqrt_epsilon must be positive, got {}",
                self.sqrt_epsilon
            )));
        }
        if i128::from(self.sqrt_epsilon) > DEFAULT_SQRT_EPSILON {
            warn!(
                "sqrt_epsilon {} is above the default {DEFAULT_SQRT_EPSILON}, square roots may overflow",
                self.sqrt_epsilon
            );
        }
        for unit in &self.units {
            match (&unit.base, &unit.parent) {
                (Some(_), None) | (None, Some(_)) => {}
                _ => {
                    return Err(CatalogError::Config(format!(
                        "unit {} needs exactly one of `base` or `parent`",
                        unit.name
                    )))
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEET: &str = r#"
[[unit]]
name = "meters"
abbreviation = "m"
base = "Length"

[[unit]]
name = "feet"
parent = "meters"
ratio = "381/1250"

[[unit]]
name = "square_feet"
parent = "feet"
operation = "square"
"#;

    #[test]
    fn test_parse() {
        let config = CatalogConfig::from_toml(FEET).unwrap();
        assert_eq!(config.sqrt_epsilon, 10_000_000_000);
        assert_eq!(config.units.len(), 3);
        assert_eq!(config.units[0].base, Some(BaseDimension::Length));
        assert_eq!(config.units[0].abbreviation.as_deref(), Some("m"));
        assert_eq!(config.units[1].ratio, Rational::new(381, 1250).unwrap());
        assert_eq!(config.units[1].translation, Rational::ZERO);
        assert_eq!(config.units[2].ratio, Rational::ONE);
        assert_eq!(config.units[2].operation, Some(UnitOperation::Square));
    }

    #[test]
    fn test_round_trip() {
        let config = CatalogConfig::from_toml(FEET).unwrap();
        let again = CatalogConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, again);
    }

    #[test]
    fn test_requires_one_anchor() {
        let both = r#"
[[unit]]
name = "odd"
base = "Length"
parent = "meters"
"#;
        assert!(matches!(
            CatalogConfig::from_toml(both).unwrap().validate(),
            Err(CatalogError::Config(_))
        ));

        let neither = r#"
[[unit]]
name = "odd"
"#;
        assert!(CatalogConfig::from_toml(neither).unwrap().validate().is_err());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(CatalogConfig::from_toml("sqrt_epsilon = 0")
            .unwrap()
            .validate()
            .is_err());
        assert!(CatalogConfig::from_toml("unknown_key = 1").is_err());

        let bad_ratio = r#"
[[unit]]
name = "odd"
base = "Length"
ratio = "1/0"
"#;
        assert!(matches!(
            CatalogConfig::from_toml(bad_ratio),
            Err(CatalogError::Config(_))
        ));
    }

    #[test]
    fn test_built_in_code() {
        let config = CatalogConfig {
            units: vec![
                UnitDefinition::base("meters", BaseDimension::Length).with_abbreviation("m"),
                UnitDefinition::derived("feet", "meters", Rational::new(381, 1250).unwrap())
                    .with_abbreviation("ft"),
            ],
            ..CatalogConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config, CatalogConfig::from_toml(&config.to_toml().unwrap()).unwrap());

        let feet = &config.units[1];
        assert_eq!(feet.parent.as_deref(), Some("meters"));
        assert_eq!(feet.base, None);
        assert_eq!(feet.abbreviation.as_deref(), Some("ft"));
        assert_eq!(config.units[0].ratio, Rational::ONE);
        assert_eq!(config.units[0].parent, None);
    }

    #[test]
    fn test_from_path() {
        let path = std::env::temp_dir().join(format!("rsunits-config-{}.toml", std::process::id()));
        std::fs::write(&path, FEET).unwrap();
        let config = CatalogConfig::from_path(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.unwrap(), CatalogConfig::from_toml(FEET).unwrap());

        assert!(matches!(
            CatalogConfig::from_path(&path),
            Err(CatalogError::Config(message)) if message.contains("rsunits-config")
        ));
    }
}
