use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use itertools::Itertools;
use num_bigint::BigInt;
use num_traits::Zero;
use pyo3::basic::CompareOp;
use pyo3::exceptions::{PyIndexError, PyTypeError, PyValueError, PyZeroDivisionError};
use pyo3::prelude::*;
use pyo3::types::PyType;

use crate::error::Error;
use crate::matrix::matrix::Matrix;
use crate::matrix::matrix_q::MatrixQ;
use crate::matrix::solution::Solution;
use crate::rings::fraction::Fraction;

// --------------------------------------------------
//                      PYTHON
// --------------------------------------------------

impl From<Error> for PyErr {
    fn from(error: Error) -> PyErr {
        let message = error.to_string();
        match error {
            Error::DivisionByZero => PyZeroDivisionError::new_err(message),
            Error::InvalidType(_) => PyTypeError::new_err(message),
            Error::InvalidIndex { .. } => PyIndexError::new_err(message),
            _ => PyValueError::new_err(message),
        }
    }
}

/// Accepts a `Fraction` or a Python `int`.
fn to_fraction(value: &Bound<'_, PyAny>) -> Result<Fraction, Error> {
    if let Ok(fraction) = value.downcast::<PyFraction>() {
        return Ok(fraction.get().0.clone());
    }
    if let Ok(int) = value.extract::<BigInt>() {
        return Ok(Fraction::from(int));
    }
    let name = value
        .get_type()
        .name()
        .map(|n| n.to_string())
        .unwrap_or_default();
    Err(Error::InvalidType(format!("expected Fraction or int, got {}", name)))
}

#[pyclass(name = "Fraction", frozen)]
#[derive(Debug, Clone)]
pub struct PyFraction(pub Fraction);

#[pymethods]
impl PyFraction {
    #[new]
    #[pyo3(signature = (numerator, denominator = None))]
    fn new(numerator: BigInt, denominator: Option<BigInt>) -> PyResult<Self> {
        let denominator = denominator.unwrap_or_else(|| BigInt::from(1));
        Ok(PyFraction(Fraction::new(numerator, denominator)?))
    }

    #[staticmethod]
    fn parse(text: &str) -> PyResult<Self> {
        Ok(PyFraction(Fraction::parse(text)?))
    }

    #[getter]
    fn numerator(&self) -> BigInt {
        self.0.numer().clone()
    }

    #[getter]
    fn denominator(&self) -> BigInt {
        self.0.denom().clone()
    }

    fn evaluate(&self) -> Option<f64> {
        self.0.to_f64()
    }

    fn __float__(&self) -> PyResult<f64> {
        self.0
            .to_f64()
            .ok_or_else(|| PyValueError::new_err("fraction is out of float range"))
    }

    fn __bool__(&self) -> bool {
        !self.0.is_zero()
    }

    fn __neg__(&self) -> PyFraction {
        PyFraction(-&self.0)
    }

    fn __abs__(&self) -> PyFraction {
        PyFraction(self.0.abs())
    }

    fn __add__(&self, other: &Bound<'_, PyAny>) -> PyResult<PyFraction> {
        Ok(PyFraction(&self.0 + &to_fraction(other)?))
    }

    fn __radd__(&self, other: &Bound<'_, PyAny>) -> PyResult<PyFraction> {
        self.__add__(other)
    }

    fn __sub__(&self, other: &Bound<'_, PyAny>) -> PyResult<PyFraction> {
        Ok(PyFraction(&self.0 - &to_fraction(other)?))
    }

    fn __rsub__(&self, other: &Bound<'_, PyAny>) -> PyResult<PyFraction> {
        Ok(PyFraction(&to_fraction(other)? - &self.0))
    }

    fn __mul__(&self, other: &Bound<'_, PyAny>) -> PyResult<PyFraction> {
        Ok(PyFraction(&self.0 * &to_fraction(other)?))
    }

    fn __rmul__(&self, other: &Bound<'_, PyAny>) -> PyResult<PyFraction> {
        self.__mul__(other)
    }

    fn __truediv__(&self, other: &Bound<'_, PyAny>) -> PyResult<PyFraction> {
        Ok(PyFraction(self.0.checked_div(&to_fraction(other)?)?))
    }

    fn __rtruediv__(&self, other: &Bound<'_, PyAny>) -> PyResult<PyFraction> {
        Ok(PyFraction(to_fraction(other)?.checked_div(&self.0)?))
    }

    /// Integer exponents are exact, fractional ones are approximate.
    fn __pow__(
        &self,
        exponent: &Bound<'_, PyAny>,
        _modulo: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<PyFraction> {
        if let Ok(exponent) = exponent.extract::<i32>() {
            return Ok(PyFraction(self.0.pow(exponent)?));
        }
        Ok(PyFraction(self.0.pow_fraction(&to_fraction(exponent)?)?))
    }

    fn __richcmp__(&self, other: &Bound<'_, PyAny>, op: CompareOp) -> PyResult<bool> {
        match (to_fraction(other), op) {
            (Ok(other), _) => Ok(op.matches(self.0.cmp(&other))),
            (Err(Error::InvalidType(_)), CompareOp::Eq) => Ok(false),
            (Err(Error::InvalidType(_)), CompareOp::Ne) => Ok(true),
            (Err(error), _) => Err(error.into()),
        }
    }

    fn __hash__(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        hasher.finish()
    }

    fn __str__(&self) -> String {
        self.0.to_string()
    }

    fn __repr__(&self) -> String {
        format!("Fraction({}, {})", self.0.numer(), self.0.denom())
    }
}

#[pyclass(name = "Matrix")]
#[derive(Debug, Clone)]
pub struct PyMatrix(pub MatrixQ);

impl PyMatrix {
    fn fractions(values: &[Fraction]) -> Vec<PyFraction> {
        values.iter().cloned().map(PyFraction).collect()
    }
}

#[pymethods]
impl PyMatrix {
    #[new]
    fn new(rows: usize, cols: usize) -> PyResult<Self> {
        Ok(PyMatrix(MatrixQ::new(rows, cols)?))
    }

    #[classmethod]
    fn from_list(_cls: &Bound<PyType>, lines: Vec<Vec<Bound<PyAny>>>) -> PyResult<Self> {
        let lines = lines
            .iter()
            .map(|line| line.iter().map(to_fraction).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PyMatrix(MatrixQ::from_list(lines)?))
    }

    #[classmethod]
    fn identity(_cls: &Bound<PyType>, n: usize) -> PyResult<Self> {
        Ok(PyMatrix(MatrixQ::identity(n)?))
    }

    fn to_list(&self) -> Vec<Vec<PyFraction>> {
        self.0
            .to_list()
            .into_iter()
            .map(|line| line.into_iter().map(PyFraction).collect())
            .collect()
    }

    #[getter]
    fn rows(&self) -> usize {
        self.0.rows()
    }

    #[getter]
    fn cols(&self) -> usize {
        self.0.cols()
    }

    fn get(&self, row: usize, col: usize) -> PyResult<PyFraction> {
        Ok(PyFraction(self.0.get(row, col)?.clone()))
    }

    fn store_value(&mut self, value: &Bound<'_, PyAny>, row: usize, col: usize) -> PyResult<()> {
        Ok(self.0.store_value(to_fraction(value)?, row, col)?)
    }

    fn add_to_entry(&self, value: &Bound<'_, PyAny>, row: usize, col: usize) -> PyResult<Self> {
        Ok(PyMatrix(self.0.add_to_entry(to_fraction(value)?, row, col)?))
    }

    fn swap_rows(&self, first_row: usize, second_row: usize) -> PyResult<Self> {
        Ok(PyMatrix(self.0.swap_rows(first_row, second_row)?))
    }

    fn add_row(
        &self,
        first_row: usize,
        factor: &Bound<'_, PyAny>,
        second_row: usize,
    ) -> PyResult<Self> {
        Ok(PyMatrix(self.0.add_row(first_row, to_fraction(factor)?, second_row)?))
    }

    fn multiply_row(&self, row: usize, factor: &Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(PyMatrix(self.0.multiply_row(row, to_fraction(factor)?)?))
    }

    fn augment(&self, other: PyRef<'_, PyMatrix>) -> PyResult<Self> {
        Ok(PyMatrix(self.0.augment(&other.0)?))
    }

    fn is_rref(&self) -> bool {
        self.0.is_rref()
    }

    fn gaussian_elimination(&self) -> PyMatrix {
        PyMatrix(self.0.gaussian_elimination().clone())
    }

    fn find_determinant(&self) -> Option<PyFraction> {
        self.0.find_determinant().cloned().map(PyFraction)
    }

    fn find_inverse(&self) -> Option<PyMatrix> {
        self.0.find_inverse().cloned().map(PyMatrix)
    }

    fn transpose(&self) -> PyMatrix {
        PyMatrix(self.0.transpose().clone())
    }

    #[getter(T)]
    fn transposed(&self) -> PyMatrix {
        self.transpose()
    }

    fn minor(&self, row: usize, col: usize) -> PyResult<Option<PyFraction>> {
        Ok(self.0.minor(row, col)?.map(PyFraction))
    }

    fn cofactor_matrix(&self) -> PyResult<PyMatrix> {
        Ok(PyMatrix(self.0.cofactor_matrix()?.clone()))
    }

    fn adjoint_matrix(&self) -> PyResult<PyMatrix> {
        Ok(PyMatrix(self.0.adjoint_matrix()?.clone()))
    }

    /// `None` when inconsistent, otherwise `(free, constants)` where `free`
    /// lists `(variable index, direction)` pairs.
    #[allow(clippy::type_complexity)]
    fn find_solution(&self) -> Option<(Vec<(usize, Vec<PyFraction>)>, Vec<PyFraction>)> {
        match self.0.find_solution() {
            Solution::NoSolution => None,
            solution => {
                let free = solution
                    .free_variables()
                    .iter()
                    .map(|v| (v.index, PyMatrix::fractions(&v.direction)))
                    .collect();
                let constants = PyMatrix::fractions(solution.constants().unwrap_or_default());
                Some((free, constants))
            }
        }
    }

    fn output_solution(&self) -> Option<String> {
        self.0.output_solution()
    }

    fn __add__(&self, rhs: PyRef<'_, PyMatrix>) -> PyResult<PyMatrix> {
        Ok(PyMatrix((&self.0 + &rhs.0)?))
    }

    fn __sub__(&self, rhs: PyRef<'_, PyMatrix>) -> PyResult<PyMatrix> {
        Ok(PyMatrix((&self.0 - &rhs.0)?))
    }

    fn __mul__(&self, rhs: &Bound<'_, PyAny>) -> PyResult<PyMatrix> {
        if let Ok(rhs) = rhs.downcast::<PyMatrix>() {
            return Ok(PyMatrix((&self.0 * &rhs.borrow().0)?));
        }
        Ok(PyMatrix(&self.0 * &to_fraction(rhs)?))
    }

    fn __rmul__(&self, lhs: &Bound<'_, PyAny>) -> PyResult<PyMatrix> {
        Ok(PyMatrix(&self.0 * &to_fraction(lhs)?))
    }

    /// `None` for a negative power of a singular matrix.
    fn __pow__(
        &self,
        exponent: i32,
        _modulo: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<Option<PyMatrix>> {
        Ok(self.0.pow(exponent)?.map(PyMatrix))
    }

    fn __richcmp__(&self, other: PyRef<'_, PyMatrix>, op: CompareOp) -> PyResult<bool> {
        match op {
            CompareOp::Eq => Ok(self.0 == other.0),
            CompareOp::Ne => Ok(self.0 != other.0),
            _ => Err(PyTypeError::new_err("matrices are not ordered")),
        }
    }

    fn __bool__(&self) -> bool {
        !self.0.is_zero()
    }

    fn __str__(&self) -> String {
        self.0.to_display_string()
    }

    fn __repr__(&self) -> String {
        let lines = self
            .0
            .to_list()
            .iter()
            .map(|line| format!("[{}]", line.iter().map(|x| format!("'{}'", x)).join(", ")))
            .join(", ");
        format!("Matrix([{}])", lines)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
