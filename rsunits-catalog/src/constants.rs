//! Physical constants as pre-built quantities.
//!
//! Values follow CODATA 2014. Derived constants are computed from the defining ones with the
//! quantity operators, so their units come out of the unit algebra rather than being declared.
//!
//! ```
//! use rsunits_catalog::constants::CONSTANTS;
//! use rsunits_catalog::standard::STANDARD_CATALOG;
//!
//! let c = CONSTANTS.c.value_in(STANDARD_CATALOG.require("kph").unwrap()).unwrap();
//! assert!((c - 1_079_252_848.8).abs() < 1e-3);
//! ```

use crate::catalog::UnitCatalog;
use crate::errors::CatalogResult;
use crate::standard::STANDARD_CATALOG;
use rsunits_core::conversion_factor::ConversionFactor;
use rsunits_core::quantity::Quantity;
use rsunits_core::rational::Rational;
use std::sync::LazyLock;

/// The standard set of physical constants, built on first use.
pub static CONSTANTS: LazyLock<PhysicalConstants> = LazyLock::new(|| {
    PhysicalConstants::from_catalog(&STANDARD_CATALOG).expect("physical constants are valid")
});

/// Read-only physical constants.
#[derive(Debug, Clone)]
pub struct PhysicalConstants {
    /// π, as the dimensionless unit carrying one power of π
    pub pi: Quantity,
    /// Speed of light in vacuum
    pub c: Quantity,
    /// Newtonian constant of gravitation
    pub g: Quantity,
    /// Planck constant
    pub h: Quantity,
    /// Vacuum permeability
    pub mu0: Quantity,
    /// Vacuum permittivity
    pub epsilon0: Quantity,
    /// Characteristic impedance of vacuum
    pub z0: Quantity,
    /// Coulomb's constant
    pub k_e: Quantity,
    /// Elementary charge
    pub e: Quantity,
    /// Electron mass
    pub m_e: Quantity,
    /// Proton mass
    pub m_p: Quantity,
    /// Bohr magneton
    pub mu_b: Quantity,
    /// Avogadro constant
    pub n_a: Quantity,
    /// Molar gas constant
    pub r: Quantity,
    /// Boltzmann constant
    pub k_b: Quantity,
    /// Faraday constant
    pub f: Quantity,
    /// Stefan-Boltzmann constant
    pub sigma: Quantity,
}

impl PhysicalConstants {
    /// Builds the constants from the units of `catalog`.
    ///
    /// The catalog must declare the SI units used by the standard catalog.
    pub fn from_catalog(catalog: &UnitCatalog) -> CatalogResult<Self> {
        let unit = |name: &str| -> CatalogResult<ConversionFactor> {
            Ok(catalog.require(name)?.clone())
        };
        let quantity = |value: f64, unit: ConversionFactor| Quantity::new(value, unit);

        let pi_unit = ConversionFactor::dimensionless().derive(
            Rational::ONE,
            Rational::ONE,
            Rational::ZERO,
        )?;
        let pi = quantity(1.0, pi_unit);

        let c = quantity(299_792_458.0, unit("meters_per_second")?);
        let g = quantity(
            6.67408e-11,
            unit("meters")?
                .cube()?
                .divide(&unit("kilograms")?)?
                .divide(&unit("seconds")?.square()?)?,
        );
        let h = quantity(
            6.626_070_040e-34,
            unit("joules")?.multiply(&unit("seconds")?)?,
        );
        let newtons_per_square_ampere = unit("newtons")?.divide(&unit("amperes")?.square()?)?;
        let mu0 = (&pi * &quantity(4.0e-7, newtons_per_square_ampere))?;
        let epsilon0 = (1.0 / (&mu0 * &c.pow(2)?)?)?;
        let z0 = (&mu0 * &c)?;
        let k_e = (1.0 / ((&pi * 4.0)? * epsilon0.clone())?)?;
        let e = quantity(1.602_176_620_8e-19, unit("coulombs")?);
        let m_e = quantity(9.109_383_56e-31, unit("kilograms")?);
        let m_p = quantity(1.672_621_898e-27, unit("kilograms")?);
        let mu_b = ((&e * &h)? / ((&pi * 4.0)? * m_e.clone())?)?;
        let n_a = quantity(6.022_140_857e23, unit("moles")?.invert()?);
        let r = quantity(
            8.314_459_8,
            unit("joules")?
                .divide(&unit("kelvin")?)?
                .divide(&unit("moles")?)?,
        );
        let k_b = (&r / &n_a)?;
        let f = (&n_a * &e)?;
        let sigma = (((&pi.pow(5)? * &r.pow(4)?)? * 2.0)?
            / (((&h.pow(3)? * &c.pow(2)?)? * &n_a.pow(4)?)? * 15.0)?)?;

        Ok(Self {
            pi,
            c,
            g,
            h,
            mu0,
            epsilon0,
            z0,
            k_e,
            e,
            m_e,
            m_p,
            mu_b,
            n_a,
            r,
            k_b,
            f,
            sigma,
        })
    }

    /// Names accepted by [`get`](Self::get), in declaration order.
    pub const NAMES: [&'static str; 17] = [
        "pi", "c", "g", "h", "mu0", "epsilon0", "z0", "k_e", "e", "m_e", "m_p", "mu_b", "n_a",
        "r", "k_b", "f", "sigma",
    ];

    /// Looks a constant up by its field name.
    pub fn get(&self, name: &str) -> Option<&Quantity> {
        let constant = match name {
            "pi" => &self.pi,
            "c" => &self.c,
            "g" => &self.g,
            "h" => &self.h,
            "mu0" => &self.mu0,
            "epsilon0" => &self.epsilon0,
            "z0" => &self.z0,
            "k_e" => &self.k_e,
            "e" => &self.e,
            "m_e" => &self.m_e,
            "m_p" => &self.m_p,
            "mu_b" => &self.mu_b,
            "n_a" => &self.n_a,
            "r" => &self.r,
            "k_b" => &self.k_b,
            "f" => &self.f,
            "sigma" => &self.sigma,
            _ => return None,
        };
        Some(constant)
    }
}
