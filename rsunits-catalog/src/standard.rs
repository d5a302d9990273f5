//! The standard catalog of SI, imperial and common derived units.
//!
//! Unit names are plural snake case (`meters`, `feet_per_second`) and every unit also has an
//! abbreviation (`m`, `fps`). Metric units carry the usual prefixes from femto to peta, e.g.
//! `kilometers` / `km` and `microseconds` / `us`.
//!
//! ```
//! use rsunits_catalog::standard::STANDARD_CATALOG;
//!
//! let feet = STANDARD_CATALOG.convert(1.0, "m", "ft").unwrap();
//! assert!((feet - 3.28084).abs() < 5e-5);
//! ```

use crate::catalog::UnitCatalog;
use crate::errors::CatalogResult;
use rsunits_core::conversion_factor::ConversionFactor;
use rsunits_core::dimension::BaseDimension;
use rsunits_core::rational::Rational;
use std::sync::LazyLock;

/// The standard catalog, built on first use.
pub static STANDARD_CATALOG: LazyLock<UnitCatalog> = LazyLock::new(standard_catalog);

/// Builds a fresh copy of the standard catalog, e.g. as a starting point for
/// [`UnitCatalog::extend_from_config`].
pub fn standard_catalog() -> UnitCatalog {
    build_standard_catalog().expect("standard unit definitions are valid")
}

/// Metric prefixes as `(prefix, symbol, numerator, denominator)`.
const METRIC_PREFIXES: [(&str, &str, i128, i128); 14] = [
    ("femto", "f", 1, 1_000_000_000_000_000),
    ("pico", "p", 1, 1_000_000_000_000),
    ("nano", "n", 1, 1_000_000_000),
    ("micro", "u", 1, 1_000_000),
    ("milli", "m", 1, 1_000),
    ("centi", "c", 1, 100),
    ("deci", "d", 1, 10),
    ("deca", "da", 10, 1),
    ("hecto", "h", 100, 1),
    ("kilo", "k", 1_000, 1),
    ("mega", "M", 1_000_000, 1),
    ("giga", "G", 1_000_000_000, 1),
    ("tera", "T", 1_000_000_000_000, 1),
    ("peta", "P", 1_000_000_000_000_000, 1),
];

fn factor(catalog: &UnitCatalog, name: &str) -> CatalogResult<ConversionFactor> {
    Ok(catalog.require(name)?.clone())
}

fn base(
    catalog: &mut UnitCatalog,
    name: &str,
    abbreviation: &str,
    dimension: BaseDimension,
) -> CatalogResult<()> {
    catalog.define_base(name, dimension)?;
    catalog.abbreviate(name, abbreviation)
}

fn derived(
    catalog: &mut UnitCatalog,
    name: &str,
    abbreviation: &str,
    parent: &str,
    numer: i128,
    denom: i128,
) -> CatalogResult<()> {
    catalog.derive_ratio(name, parent, numer, denom)?;
    catalog.abbreviate(name, abbreviation)
}

/// Derives a unit whose ratio includes a power of π.
fn derived_pi(
    catalog: &mut UnitCatalog,
    name: &str,
    abbreviation: &str,
    parent: &str,
    ratio: (i128, i128),
    pi_exponent: i64,
) -> CatalogResult<()> {
    catalog.derive_unit(
        name,
        parent,
        Rational::new(ratio.0, ratio.1)?,
        Rational::from_integer(pi_exponent),
        Rational::ZERO,
    )?;
    catalog.abbreviate(name, abbreviation)
}

fn compound(
    catalog: &mut UnitCatalog,
    name: &str,
    abbreviation: &str,
    unit: ConversionFactor,
) -> CatalogResult<()> {
    catalog.define_compound(name, unit)?;
    catalog.abbreviate(name, abbreviation)
}

fn product(
    catalog: &mut UnitCatalog,
    name: &str,
    abbreviation: &str,
    lhs: &str,
    rhs: &str,
) -> CatalogResult<()> {
    let unit = factor(catalog, lhs)?.multiply(&factor(catalog, rhs)?)?;
    compound(catalog, name, abbreviation, unit)
}

fn quotient(
    catalog: &mut UnitCatalog,
    name: &str,
    abbreviation: &str,
    lhs: &str,
    rhs: &str,
) -> CatalogResult<()> {
    let unit = factor(catalog, lhs)?.divide(&factor(catalog, rhs)?)?;
    compound(catalog, name, abbreviation, unit)
}

fn power(
    catalog: &mut UnitCatalog,
    name: &str,
    abbreviation: &str,
    unit: &str,
    exp: i32,
) -> CatalogResult<()> {
    let unit = factor(catalog, unit)?.pow(exp)?;
    compound(catalog, name, abbreviation, unit)
}

/// Declares `femto<name>` to `peta<name>`, except for the prefixes in `skip`.
fn metric_prefixes(
    catalog: &mut UnitCatalog,
    name: &str,
    abbreviation: &str,
    skip: &[&str],
) -> CatalogResult<()> {
    for (prefix, symbol, numer, denom) in METRIC_PREFIXES {
        if skip.contains(&prefix) {
            continue;
        }
        derived(
            catalog,
            &format!("{prefix}{name}"),
            &format!("{symbol}{abbreviation}"),
            name,
            numer,
            denom,
        )?;
    }
    Ok(())
}

fn lengths(c: &mut UnitCatalog) -> CatalogResult<()> {
    base(c, "meters", "m", BaseDimension::Length)?;
    metric_prefixes(c, "meters", "m", &[])?;
    derived(c, "feet", "ft", "meters", 381, 1250)?;
    derived(c, "inches", "in", "feet", 1, 12)?;
    derived(c, "yards", "yd", "feet", 3, 1)?;
    derived(c, "miles", "mi", "feet", 5280, 1)?;
    derived(c, "fathoms", "ftm", "feet", 6, 1)?;
    derived(c, "chains", "ch", "feet", 66, 1)?;
    derived(c, "furlongs", "fur", "chains", 10, 1)?;
    derived(c, "nautical_miles", "nmi", "meters", 1852, 1)?;
    derived(c, "astronomical_units", "au", "meters", 149_597_870_700, 1)?;
    derived(c, "lightyears", "ly", "meters", 9_460_730_472_580_800, 1)?;
    derived_pi(c, "parsecs", "pc", "astronomical_units", (648_000, 1), -1)?;
    derived(c, "angstroms", "angstrom", "nanometers", 1, 10)
}

fn masses(c: &mut UnitCatalog) -> CatalogResult<()> {
    base(c, "kilograms", "kg", BaseDimension::Mass)?;
    derived(c, "grams", "g", "kilograms", 1, 1000)?;
    metric_prefixes(c, "grams", "g", &["kilo"])?;
    derived(c, "tonnes", "t", "kilograms", 1000, 1)?;
    derived(c, "pounds", "lb", "kilograms", 45_359_237, 100_000_000)?;
    derived(c, "ounces", "oz", "pounds", 1, 16)?;
    derived(c, "stone", "st", "pounds", 14, 1)?;
    derived(c, "short_tons", "ton_us", "pounds", 2000, 1)?;
    derived(c, "long_tons", "ton_uk", "pounds", 2240, 1)?;
    derived(c, "slugs", "slug", "kilograms", 145_939_029, 10_000_000)?;
    derived(c, "carats", "ct", "milligrams", 200, 1)
}

fn times(c: &mut UnitCatalog) -> CatalogResult<()> {
    base(c, "seconds", "s", BaseDimension::Time)?;
    metric_prefixes(c, "seconds", "s", &[])?;
    derived(c, "minutes", "min", "seconds", 60, 1)?;
    derived(c, "hours", "hr", "minutes", 60, 1)?;
    derived(c, "days", "d", "hours", 24, 1)?;
    derived(c, "weeks", "wk", "days", 7, 1)?;
    derived(c, "years", "yr", "days", 365, 1)?;
    derived(c, "julian_years", "a_j", "seconds", 31_557_600, 1)?;
    derived(c, "gregorian_years", "a_g", "seconds", 31_556_952, 1)
}

fn angles(c: &mut UnitCatalog) -> CatalogResult<()> {
    base(c, "radians", "rad", BaseDimension::Angle)?;
    metric_prefixes(c, "radians", "rad", &[])?;
    derived_pi(c, "degrees", "deg", "radians", (1, 180), 1)?;
    derived(c, "arcminutes", "arcmin", "degrees", 1, 60)?;
    derived(c, "arcseconds", "arcsec", "arcminutes", 1, 60)?;
    derived(c, "milliarcseconds", "mas", "arcseconds", 1, 1000)?;
    derived_pi(c, "turns", "tr", "radians", (2, 1), 1)?;
    derived(c, "gradians", "gon", "turns", 1, 400)?;

    power(c, "steradians", "sr", "radians", 2)?;
    power(c, "degrees_squared", "deg2", "degrees", 2)?;
    derived_pi(c, "spats", "sp", "steradians", (4, 1), 1)
}

fn temperatures(c: &mut UnitCatalog) -> CatalogResult<()> {
    base(c, "kelvin", "K", BaseDimension::Temperature)?;
    c.derive_unit(
        "celsius",
        "kelvin",
        Rational::ONE,
        Rational::ZERO,
        Rational::new(27315, 100)?,
    )?;
    c.abbreviate("celsius", "degC")?;
    c.derive_unit(
        "fahrenheit",
        "celsius",
        Rational::new(5, 9)?,
        Rational::ZERO,
        Rational::new(-160, 9)?,
    )?;
    c.abbreviate("fahrenheit", "degF")?;
    derived(c, "rankine", "degR", "kelvin", 5, 9)?;
    derived(c, "reaumur", "degRe", "celsius", 5, 4)
}

fn other_base_units(c: &mut UnitCatalog) -> CatalogResult<()> {
    base(c, "amperes", "A", BaseDimension::Current)?;
    metric_prefixes(c, "amperes", "A", &[])?;
    base(c, "moles", "mol", BaseDimension::Substance)?;
    metric_prefixes(c, "moles", "mol", &[])?;
    base(c, "candelas", "cd", BaseDimension::LuminousIntensity)?;
    metric_prefixes(c, "candelas", "cd", &[])?;

    compound(c, "scalar", "1", ConversionFactor::dimensionless())?;
    derived(c, "percent", "pct", "scalar", 1, 100)?;
    derived(c, "parts_per_million", "ppm", "scalar", 1, 1_000_000)?;
    derived(c, "parts_per_billion", "ppb", "parts_per_million", 1, 1000)
}

fn geometry(c: &mut UnitCatalog) -> CatalogResult<()> {
    power(c, "square_meters", "m2", "meters", 2)?;
    power(c, "square_kilometers", "km2", "kilometers", 2)?;
    power(c, "square_feet", "ft2", "feet", 2)?;
    power(c, "square_inches", "in2", "inches", 2)?;
    power(c, "square_miles", "mi2", "miles", 2)?;
    derived(c, "hectares", "ha", "square_meters", 10_000, 1)?;
    derived(c, "acres", "ac", "square_feet", 43_560, 1)?;

    power(c, "cubic_meters", "m3", "meters", 3)?;
    power(c, "cubic_feet", "ft3", "feet", 3)?;
    power(c, "cubic_inches", "in3", "inches", 3)?;
    derived(c, "liters", "L", "cubic_meters", 1, 1000)?;
    metric_prefixes(c, "liters", "L", &[])?;
    derived(c, "gallons", "gal", "cubic_inches", 231, 1)?;
    derived(c, "quarts", "qt", "gallons", 1, 4)?;
    derived(c, "pints", "pt", "quarts", 1, 2)?;
    derived(c, "cups", "cup", "pints", 1, 2)?;
    derived(c, "fluid_ounces", "fl_oz", "cups", 1, 8)?;
    derived(c, "barrels", "bbl", "gallons", 42, 1)
}

fn kinematics(c: &mut UnitCatalog) -> CatalogResult<()> {
    power(c, "hertz", "Hz", "seconds", -1)?;
    metric_prefixes(c, "hertz", "Hz", &[])?;

    quotient(c, "meters_per_second", "mps", "meters", "seconds")?;
    quotient(c, "feet_per_second", "fps", "feet", "seconds")?;
    quotient(c, "miles_per_hour", "mph", "miles", "hours")?;
    quotient(c, "kilometers_per_hour", "kph", "kilometers", "hours")?;
    quotient(c, "knots", "kts", "nautical_miles", "hours")?;

    quotient(c, "radians_per_second", "rad_per_s", "radians", "seconds")?;
    quotient(c, "degrees_per_second", "deg_per_s", "degrees", "seconds")?;
    derived_pi(
        c,
        "revolutions_per_minute",
        "rpm",
        "radians_per_second",
        (2, 60),
        1,
    )?;

    let per_second_squared = factor(c, "seconds")?.square()?;
    compound(
        c,
        "meters_per_second_squared",
        "mps2",
        factor(c, "meters")?.divide(&per_second_squared)?,
    )?;
    compound(
        c,
        "feet_per_second_squared",
        "fps2",
        factor(c, "feet")?.divide(&per_second_squared)?,
    )?;
    derived(
        c,
        "standard_gravity",
        "SG",
        "meters_per_second_squared",
        980_665,
        100_000,
    )
}

fn mechanics(c: &mut UnitCatalog) -> CatalogResult<()> {
    product(c, "newtons", "N", "kilograms", "meters_per_second_squared")?;
    metric_prefixes(c, "newtons", "N", &[])?;
    product(c, "pounds_force", "lbf", "slugs", "feet_per_second_squared")?;
    derived(c, "dynes", "dyn", "newtons", 1, 100_000)?;
    product(c, "kiloponds", "kp", "standard_gravity", "kilograms")?;

    quotient(c, "pascals", "Pa", "newtons", "square_meters")?;
    metric_prefixes(c, "pascals", "Pa", &[])?;
    derived(c, "bars", "bar", "pascals", 100_000, 1)?;
    derived(c, "atmospheres", "atm", "pascals", 101_325, 1)?;
    quotient(c, "pounds_per_square_inch", "psi", "pounds_force", "square_inches")?;
    derived(c, "torrs", "torr", "atmospheres", 1, 760)?;

    product(c, "joules", "J", "newtons", "meters")?;
    metric_prefixes(c, "joules", "J", &[])?;
    derived(c, "calories", "cal", "joules", 4184, 1000)?;
    derived(c, "kilocalories", "kcal", "calories", 1000, 1)?;
    derived(
        c,
        "british_thermal_units",
        "BTU",
        "joules",
        105_505_585_262,
        100_000_000,
    )?;
    derived(
        c,
        "electron_volts",
        "eV",
        "joules",
        16_021_766_208,
        100_000_000_000_000_000_000_000_000_000,
    )?;

    quotient(c, "watts", "W", "joules", "seconds")?;
    metric_prefixes(c, "watts", "W", &[])?;
    derived(c, "horsepower", "hp", "watts", 7457, 10)?;
    product(c, "watt_hours", "Wh", "watts", "hours")?;
    derived(c, "kilowatt_hours", "kWh", "watt_hours", 1000, 1)
}

fn electromagnetism(c: &mut UnitCatalog) -> CatalogResult<()> {
    product(c, "coulombs", "C", "amperes", "seconds")?;
    metric_prefixes(c, "coulombs", "C", &[])?;
    product(c, "ampere_hours", "Ah", "amperes", "hours")?;

    quotient(c, "volts", "V", "watts", "amperes")?;
    metric_prefixes(c, "volts", "V", &[])?;
    quotient(c, "farads", "F", "coulombs", "volts")?;
    metric_prefixes(c, "farads", "F", &[])?;
    quotient(c, "ohms", "Ohm", "volts", "amperes")?;
    metric_prefixes(c, "ohms", "Ohm", &[])?;
    product(c, "webers", "Wb", "volts", "seconds")?;
    quotient(c, "teslas", "T", "webers", "square_meters")?;
    metric_prefixes(c, "teslas", "T", &[])?;
    derived(c, "gauss", "G", "teslas", 1, 10_000)
}

fn data(c: &mut UnitCatalog) -> CatalogResult<()> {
    base(c, "bytes", "B", BaseDimension::Data)?;
    derived(c, "bits", "b", "bytes", 1, 8)?;
    derived(c, "kilobytes", "kB", "bytes", 1000, 1)?;
    derived(c, "megabytes", "MB", "kilobytes", 1000, 1)?;
    derived(c, "gigabytes", "GB", "megabytes", 1000, 1)?;
    derived(c, "terabytes", "TB", "gigabytes", 1000, 1)?;
    derived(c, "kibibytes", "KiB", "bytes", 1024, 1)?;
    derived(c, "mebibytes", "MiB", "kibibytes", 1024, 1)?;
    derived(c, "gibibytes", "GiB", "mebibytes", 1024, 1)?;
    derived(c, "tebibytes", "TiB", "gibibytes", 1024, 1)
}

/// Declares every standard unit, in dependency order.
pub fn build_standard_catalog() -> CatalogResult<UnitCatalog> {
    let mut catalog = UnitCatalog::new();
    lengths(&mut catalog)?;
    masses(&mut catalog)?;
    times(&mut catalog)?;
    angles(&mut catalog)?;
    temperatures(&mut catalog)?;
    other_base_units(&mut catalog)?;
    geometry(&mut catalog)?;
    kinematics(&mut catalog)?;
    mechanics(&mut catalog)?;
    electromagnetism(&mut catalog)?;
    data(&mut catalog)?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsunits_core::dimension::Dimension;

    #[test]
    fn test_builds() {
        let catalog = build_standard_catalog().unwrap();
        assert!(catalog.len() > 200);
        for name in ["meters", "kilometers", "micrograms", "kilograms", "kWh", "GiB"] {
            assert!(catalog.contains(name), "{name} missing");
        }
        assert!(!catalog.contains("kilokilograms"));
    }

    #[test]
    fn test_prefixes() {
        let catalog = &*STANDARD_CATALOG;
        assert_eq!(catalog.get("km"), catalog.get("kilometers"));
        assert_eq!(
            catalog.require("milligrams").unwrap().ratio(),
            Rational::new(1, 1_000_000).unwrap()
        );
        assert_eq!(
            catalog.require("milliliters").unwrap().ratio(),
            Rational::new(1, 1_000_000).unwrap()
        );
    }

    #[test]
    fn test_derived_dimensions() {
        let catalog = &*STANDARD_CATALOG;
        let joules = catalog.require("joules").unwrap();
        assert_eq!(joules.dimension().to_string(), "L^2 M T^-2");
        assert_eq!(joules.ratio(), Rational::ONE);

        assert_eq!(
            catalog.require("hertz").unwrap().dimension(),
            &Dimension::base(BaseDimension::Time).invert()
        );
        let volts_per_ampere = catalog
            .require("volts")
            .unwrap()
            .divide(catalog.require("A").unwrap())
            .unwrap();
        assert_eq!(catalog.require("ohms").unwrap(), &volts_per_ampere);
        assert!(catalog.require("scalar").unwrap().is_dimensionless());
    }

    #[test]
    fn test_imperial_ratios() {
        let catalog = &*STANDARD_CATALOG;
        assert!((catalog.convert(1.0, "mi", "km").unwrap() - 1.609344).abs() < 1e-12);
        assert!((catalog.convert(1.0, "lb", "kg").unwrap() - 0.45359237).abs() < 1e-15);
        assert!((catalog.convert(1.0, "gal", "L").unwrap() - 3.785411784).abs() < 1e-9);
        // the slug is defined to 9 significant figures
        assert!((catalog.convert(1.0, "lbf", "N").unwrap() - 4.44822160392).abs() < 1e-9);
        assert!((catalog.convert(1.0, "psi", "Pa").unwrap() - 6894.757275590551).abs() < 1e-6);
    }
}
