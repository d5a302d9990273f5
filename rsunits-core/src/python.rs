//! Python bindings for conversion factors and quantities.
//!
//! # Usage from Python
//!
//! ```python
//! from rsunits._lib.core import ConversionFactor, Quantity
//!
//! meters = ConversionFactor.base("length")
//! feet = meters.derive("381/1250")
//! feet.convert(1.0, meters)  # 0.3048
//!
//! total = Quantity(1.0, meters) + Quantity(1.0, feet)
//! total.value  # 1.3048
//! ```

use crate::conversion_factor::ConversionFactor;
use crate::convert::{convert, convert_array};
use crate::dimension::{BaseDimension, Dimension};
use crate::errors::UnitsError;
use crate::quantity::Quantity;
use crate::ratio_sqrt::DEFAULT_SQRT_EPSILON;
use crate::rational::Rational;
use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::pyclass::CompareOp;
use std::str::FromStr;

fn value_error(err: UnitsError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn parse_rational(value: &str) -> PyResult<Rational> {
    Rational::from_str(value).map_err(value_error)
}

fn parse_base_dimension(name: &str) -> PyResult<BaseDimension> {
    let normalized: String = name.chars().filter(|c| *c != '_').collect();
    BaseDimension::ALL
        .into_iter()
        .find(|b| b.to_string().eq_ignore_ascii_case(&normalized))
        .ok_or_else(|| PyValueError::new_err(format!("Unknown base dimension: {name}")))
}

/// A unit definition: dimension, exact ratio, π-exponent and translation.
///
/// Ratios are passed and returned as rational strings such as ``"381/1250"``.
#[pyclass]
#[pyo3(name = "ConversionFactor")]
#[derive(Debug, Clone)]
pub struct PyConversionFactor(pub ConversionFactor);

#[pymethods]
impl PyConversionFactor {
    /// The base unit of a single base dimension.
    ///
    /// Parameters
    /// ----------
    /// dimension : str
    ///     Name of the base dimension, e.g. ``"length"`` or ``"luminous_intensity"``.
    ///
    /// Raises
    /// ------
    /// ValueError
    ///     If the name is not a base dimension.
    #[staticmethod]
    fn base(dimension: &str) -> PyResult<Self> {
        let base = parse_base_dimension(dimension)?;
        Ok(Self(ConversionFactor::base(Dimension::base(base))))
    }

    /// The dimensionless unit.
    #[staticmethod]
    fn dimensionless() -> Self {
        Self(ConversionFactor::dimensionless())
    }

    /// Define a new unit relative to this one.
    ///
    /// Parameters
    /// ----------
    /// ratio : str
    ///     Size of the new unit in this unit, e.g. ``"381/1250"``.
    /// pi_exponent : str
    ///     Power of π included in the ratio.
    /// translation : str
    ///     Datum offset, in this unit.
    #[pyo3(signature = (ratio, pi_exponent="0", translation="0"))]
    fn derive(&self, ratio: &str, pi_exponent: &str, translation: &str) -> PyResult<Self> {
        self.0
            .derive(
                parse_rational(ratio)?,
                parse_rational(pi_exponent)?,
                parse_rational(translation)?,
            )
            .map(Self)
            .map_err(value_error)
    }

    #[getter]
    fn ratio(&self) -> String {
        self.0.ratio().to_string()
    }

    #[getter]
    fn pi_exponent(&self) -> String {
        self.0.pi_exponent().to_string()
    }

    #[getter]
    fn translation(&self) -> String {
        self.0.translation().to_string()
    }

    #[getter]
    fn dimension(&self) -> String {
        self.0.dimension().to_string()
    }

    fn is_compatible(&self, other: &PyConversionFactor) -> bool {
        self.0.is_compatible(&other.0)
    }

    fn is_dimensionless(&self) -> bool {
        self.0.is_dimensionless()
    }

    fn invert(&self) -> PyResult<Self> {
        self.0.invert().map(Self).map_err(value_error)
    }

    fn square(&self) -> PyResult<Self> {
        self.0.square().map(Self).map_err(value_error)
    }

    fn cube(&self) -> PyResult<Self> {
        self.0.cube().map(Self).map_err(value_error)
    }

    fn pow(&self, exp: i32) -> PyResult<Self> {
        self.0.pow(exp).map(Self).map_err(value_error)
    }

    /// Approximate square root of the unit.
    ///
    /// Parameters
    /// ----------
    /// eps : int
    ///     Inverse tolerance of the ratio approximation.
    #[pyo3(signature = (eps=DEFAULT_SQRT_EPSILON))]
    fn sqrt(&self, eps: i128) -> PyResult<Self> {
        self.0.sqrt(eps).map(Self).map_err(value_error)
    }

    /// Convert a value from this unit to a compatible one.
    ///
    /// Raises
    /// ------
    /// ValueError
    ///     If the units have incompatible dimensions.
    fn convert(&self, value: f64, target: &PyConversionFactor) -> PyResult<f64> {
        convert(value, &self.0, &target.0).map_err(value_error)
    }

    /// Convert a 1d numpy array from this unit to a compatible one.
    fn convert_array<'py>(
        &self,
        py: Python<'py>,
        values: PyReadonlyArray1<'py, f64>,
        target: &PyConversionFactor,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let converted = convert_array(values.as_array(), &self.0, &target.0).map_err(value_error)?;
        Ok(converted.into_pyarray_bound(py))
    }

    fn __mul__(&self, other: &PyConversionFactor) -> PyResult<Self> {
        self.0.multiply(&other.0).map(Self).map_err(value_error)
    }

    fn __truediv__(&self, other: &PyConversionFactor) -> PyResult<Self> {
        self.0.divide(&other.0).map(Self).map_err(value_error)
    }

    fn __eq__(&self, other: &Bound<'_, PyAny>) -> PyResult<bool> {
        if let Ok(other) = other.extract::<PyRef<PyConversionFactor>>() {
            Ok(self.0 == other.0)
        } else {
            Err(PyTypeError::new_err(
                "can only compare ConversionFactor with another ConversionFactor",
            ))
        }
    }

    fn __hash__(&self) -> u64 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.0.hash(&mut hasher);
        hasher.finish()
    }

    fn __repr__(&self) -> String {
        format!("ConversionFactor('{}')", self.0)
    }

    fn __str__(&self) -> String {
        self.0.to_string()
    }
}

/// A value in a unit, on a linear or decibel scale.
#[pyclass]
#[pyo3(name = "Quantity")]
#[derive(Debug, Clone)]
pub struct PyQuantity(pub Quantity);

impl PyQuantity {
    fn operand(other: &Bound<'_, PyAny>) -> PyResult<Quantity> {
        if let Ok(q) = other.extract::<PyRef<PyQuantity>>() {
            Ok(q.0.clone())
        } else if let Ok(x) = other.extract::<f64>() {
            Ok(Quantity::from(x))
        } else {
            Err(PyTypeError::new_err("expected a Quantity or a float"))
        }
    }
}

#[pymethods]
impl PyQuantity {
    /// Create a quantity.
    ///
    /// Parameters
    /// ----------
    /// value : float
    ///     Display value, in decibels if ``decibel`` is set.
    /// unit : ConversionFactor
    ///     Unit of the value.
    /// decibel : bool
    ///     Whether the value is on the decibel scale.
    #[new]
    #[pyo3(signature = (value, unit, decibel=false))]
    fn new(value: f64, unit: &PyConversionFactor, decibel: bool) -> Self {
        if decibel {
            Self(Quantity::decibel(value, unit.0.clone()))
        } else {
            Self(Quantity::new(value, unit.0.clone()))
        }
    }

    #[getter]
    fn value(&self) -> f64 {
        self.0.value()
    }

    #[getter]
    fn magnitude(&self) -> f64 {
        self.0.magnitude()
    }

    #[getter]
    fn unit(&self) -> PyConversionFactor {
        PyConversionFactor(self.0.unit().clone())
    }

    #[getter]
    fn is_decibel(&self) -> bool {
        !self.0.scale().is_linear()
    }

    fn convert_to(&self, unit: &PyConversionFactor) -> PyResult<Self> {
        self.0.convert_to(&unit.0).map(Self).map_err(value_error)
    }

    fn pow(&self, exp: i32) -> PyResult<Self> {
        self.0.pow(exp).map(Self).map_err(value_error)
    }

    fn sqrt(&self) -> PyResult<Self> {
        self.0.sqrt().map(Self).map_err(value_error)
    }

    fn __add__(&self, other: &Bound<'_, PyAny>) -> PyResult<Self> {
        (&self.0 + &Self::operand(other)?)
            .map(Self)
            .map_err(value_error)
    }

    fn __sub__(&self, other: &Bound<'_, PyAny>) -> PyResult<Self> {
        (&self.0 - &Self::operand(other)?)
            .map(Self)
            .map_err(value_error)
    }

    fn __mul__(&self, other: &Bound<'_, PyAny>) -> PyResult<Self> {
        (&self.0 * &Self::operand(other)?)
            .map(Self)
            .map_err(value_error)
    }

    fn __truediv__(&self, other: &Bound<'_, PyAny>) -> PyResult<Self> {
        (&self.0 / &Self::operand(other)?)
            .map(Self)
            .map_err(value_error)
    }

    fn __mod__(&self, other: &Bound<'_, PyAny>) -> PyResult<Self> {
        (&self.0 % &Self::operand(other)?)
            .map(Self)
            .map_err(value_error)
    }

    fn __neg__(&self) -> Self {
        Self(-&self.0)
    }

    fn __abs__(&self) -> Self {
        Self(self.0.abs())
    }

    fn __float__(&self) -> PyResult<f64> {
        f64::try_from(self.0.clone()).map_err(value_error)
    }

    fn __richcmp__(&self, other: PyRef<PyQuantity>, op: CompareOp) -> bool {
        let (lhs, rhs) = (&self.0, &other.0);
        match op {
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
        }
    }

    fn __repr__(&self) -> String {
        format!("Quantity('{}')", self.0)
    }

    fn __str__(&self) -> String {
        self.0.to_string()
    }
}

/// Register the unit classes with a Python module.
pub fn register_units(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyConversionFactor>()?;
    m.add_class::<PyQuantity>()?;
    Ok(())
}

#[pymodule]
pub fn core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    register_units(m)
}
