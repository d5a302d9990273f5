//! Conversion tests against the standard catalog.
//!
//! These check well-known conversion values end to end, from unit lookup by name through the
//! conversion plan to the converted value.

use rsunits_catalog::errors::CatalogError;
use rsunits_catalog::standard::{standard_catalog, STANDARD_CATALOG};
use rsunits_catalog::UnitCatalog;
use rsunits_core::errors::UnitsError;
use rsunits_core::scale::Scale;

fn assert_within(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

mod linear_conversions {
    use super::*;

    #[test]
    fn test_meters_to_feet() {
        assert_within(STANDARD_CATALOG.convert(1.0, "meters", "feet").unwrap(), 3.28084, 5e-5);
        assert_within(STANDARD_CATALOG.convert(1.0, "mi", "km").unwrap(), 1.609344, 1e-12);
    }

    #[test]
    fn test_celsius_to_fahrenheit() {
        assert_within(STANDARD_CATALOG.convert(0.0, "degC", "degF").unwrap(), 32.0, 5e-5);
        assert_within(STANDARD_CATALOG.convert(100.0, "degC", "degF").unwrap(), 212.0, 5e-5);
        assert_within(STANDARD_CATALOG.convert(-40.0, "degF", "degC").unwrap(), -40.0, 5e-5);
        assert_within(STANDARD_CATALOG.convert(0.0, "degC", "K").unwrap(), 273.15, 1e-9);
    }

    #[test]
    fn test_standard_gravity() {
        assert_within(
            STANDARD_CATALOG
                .convert(1.0, "standard_gravity", "mps2")
                .unwrap(),
            9.80665,
            5e-10,
        );
    }

    #[test]
    fn test_steradians_to_square_degrees() {
        // (180 / π)² square degrees per steradian
        assert_within(STANDARD_CATALOG.convert(1.0, "sr", "deg2").unwrap(), 3282.8, 5e-2);
    }

    #[test]
    fn test_round_trip() {
        let there = STANDARD_CATALOG.convert(12.5, "psi", "kPa").unwrap();
        let back = STANDARD_CATALOG.convert(there, "kPa", "psi").unwrap();
        assert_within(back, 12.5, 1e-12);
    }

    #[test]
    fn test_identity() {
        assert_eq!(STANDARD_CATALOG.convert(42.0, "m", "meters").unwrap(), 42.0);
        assert_eq!(STANDARD_CATALOG.convert(-3.5, "degF", "degF").unwrap(), -3.5);
    }

    #[test]
    fn test_incompatible_dimensions() {
        let result = STANDARD_CATALOG.convert(1.0, "meters", "seconds");
        assert!(matches!(
            result,
            Err(CatalogError::Units(UnitsError::IncompatibleDimension { .. }))
        ));
    }

    #[test]
    fn test_unknown_unit() {
        assert_eq!(
            STANDARD_CATALOG.convert(1.0, "meters", "cubits"),
            Err(CatalogError::UnknownUnit("cubits".to_string()))
        );
    }
}

mod quantities {
    use super::*;

    #[test]
    fn test_decibel_arithmetic() {
        let sum = (STANDARD_CATALOG.decibel(10.0, "scalar").unwrap()
            + STANDARD_CATALOG.decibel(30.0, "scalar").unwrap())
        .unwrap();
        assert_eq!(sum.scale(), Scale::Decibel);
        assert_within(sum.value(), 40.0, 1e-9);

        let difference = (STANDARD_CATALOG.decibel(100.0, "scalar").unwrap()
            - STANDARD_CATALOG.decibel(80.0, "scalar").unwrap())
        .unwrap();
        assert_within(difference.value(), 20.0, 1e-9);
    }

    #[test]
    fn test_compound_quantities() {
        let distance = STANDARD_CATALOG.quantity(100.0, "km").unwrap();
        let time = STANDARD_CATALOG.quantity(2.0, "hr").unwrap();
        let speed = (distance / time).unwrap();

        let kph = STANDARD_CATALOG.require("kph").unwrap();
        assert!(speed.unit().is_compatible(kph));
        assert_within(speed.value_in(kph).unwrap(), 50.0, 1e-9);
        assert_within(
            speed.value_in(STANDARD_CATALOG.require("mps").unwrap()).unwrap(),
            13.888_888_888_9,
            1e-9,
        );
    }

    #[test]
    fn test_energy() {
        let power = STANDARD_CATALOG.quantity(2.0, "kW").unwrap();
        let time = STANDARD_CATALOG.quantity(30.0, "minutes").unwrap();
        let energy = (power * time).unwrap();
        assert_within(
            energy.value_in(STANDARD_CATALOG.require("kWh").unwrap()).unwrap(),
            1.0,
            1e-12,
        );
    }
}

mod configured_catalogs {
    use super::*;

    const SURVEY: &str = r#"
[[unit]]
name = "survey_feet"
abbreviation = "ftUS"
parent = "meters"
ratio = "1200/3937"

[[unit]]
name = "survey_acres"
parent = "survey_feet"
operation = "square"
ratio = "43560"
"#;

    #[test]
    fn test_extend_standard_catalog() {
        let mut catalog = standard_catalog();
        let before = catalog.len();
        catalog
            .extend_from_config(&rsunits_catalog::config::CatalogConfig::from_toml(SURVEY).unwrap())
            .unwrap();
        assert_eq!(catalog.len(), before + 2);

        assert_within(catalog.convert(1.0, "survey_acres", "m2").unwrap(), 4046.872_609_874_252, 1e-6);
        assert_eq!(
            catalog.ancestry("survey_acres").unwrap().iter().map(|(name, _)| *name).collect::<Vec<_>>(),
            vec!["survey_acres", "survey_feet", "meters"]
        );

        // The shared catalog is unaffected
        assert!(!STANDARD_CATALOG.contains("survey_acres"));
    }

    #[test]
    fn test_standalone_catalog() {
        let catalog = UnitCatalog::from_toml(
            r#"
[[unit]]
name = "meters"
base = "Length"

[[unit]]
name = "survey_feet"
parent = "meters"
ratio = "1200/3937"
"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_within(catalog.convert(1200.0, "meters", "survey_feet").unwrap(), 3937.0, 1e-9);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut catalog = standard_catalog();
        let result = catalog.extend_from_config(
            &rsunits_catalog::config::CatalogConfig::from_toml(
                r#"
[[unit]]
name = "feet"
parent = "meters"
ratio = "1/3"
"#,
            )
            .unwrap(),
        );
        assert_eq!(result, Err(CatalogError::DuplicateUnit("feet".to_string())));
    }
}
