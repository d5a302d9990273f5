use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::prelude::*;
use pyo3::{wrap_pyfunction, wrap_pymodule};
use rsunits_catalog::errors::CatalogError;
use rsunits_catalog::{PhysicalConstants, CONSTANTS, STANDARD_CATALOG};
use rsunits_core::python::{core, PyConversionFactor, PyQuantity};

fn catalog_error(err: CatalogError) -> PyErr {
    match err {
        CatalogError::UnknownUnit(name) => PyKeyError::new_err(name),
        err => PyValueError::new_err(err.to_string()),
    }
}

/// Look up a unit of the standard catalog by name or abbreviation.
#[pyfunction]
fn unit(name: &str) -> PyResult<PyConversionFactor> {
    STANDARD_CATALOG
        .require(name)
        .map(|factor| PyConversionFactor(factor.clone()))
        .map_err(catalog_error)
}

/// Names of every unit in the standard catalog.
#[pyfunction]
fn unit_names() -> Vec<String> {
    STANDARD_CATALOG.names().map(str::to_string).collect()
}

/// Create a quantity in a named unit.
#[pyfunction]
#[pyo3(signature = (value, name, decibel=false))]
fn quantity(value: f64, name: &str, decibel: bool) -> PyResult<PyQuantity> {
    let result = if decibel {
        STANDARD_CATALOG.decibel(value, name)
    } else {
        STANDARD_CATALOG.quantity(value, name)
    };
    result.map(PyQuantity).map_err(catalog_error)
}

/// Convert a value between two named units.
#[pyfunction]
fn convert(value: f64, from: &str, to: &str) -> PyResult<f64> {
    STANDARD_CATALOG
        .convert(value, from, to)
        .map_err(catalog_error)
}

/// Look up a physical constant, e.g. ``constant("k_b")``.
#[pyfunction]
fn constant(name: &str) -> PyResult<PyQuantity> {
    CONSTANTS
        .get(name)
        .map(|q| PyQuantity(q.clone()))
        .ok_or_else(|| PyKeyError::new_err(name.to_string()))
}

#[pymodule]
pub fn catalog(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(unit, m)?)?;
    m.add_function(wrap_pyfunction!(unit_names, m)?)?;
    m.add_function(wrap_pyfunction!(quantity, m)?)?;
    m.add_function(wrap_pyfunction!(convert, m)?)?;
    m.add_function(wrap_pyfunction!(constant, m)?)?;
    m.add("CONSTANT_NAMES", PhysicalConstants::NAMES.to_vec())?;
    Ok(())
}

#[pymodule]
#[pyo3(name = "_lib")]
fn rsunits(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_wrapped(wrap_pymodule!(core))?;
    m.add_wrapped(wrap_pymodule!(catalog))?;

    set_path(m, "rsunits._lib.core", "core")?;
    set_path(m, "rsunits._lib.catalog", "catalog")?;

    Ok(())
}

fn set_path(m: &Bound<'_, PyModule>, path: &str, module: &str) -> PyResult<()> {
    let code = format!(
        "\
import sys
sys.modules['{path}'] = {module}
    "
    );
    m.py().run_bound(&code, None, Some(&m.dict()))
}
