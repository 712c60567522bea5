//! Exact rational linear algebra.
//!
//! `Fraction / Fraction` panics on a zero divisor, like integer division.
//! Use [`Fraction::checked_div`] or [`Fraction::recip`] to get
//! [`Error::DivisionByZero`] back instead.

pub mod config;
pub mod error;
pub mod input;
pub mod matrix {
    pub(crate) mod derived;
    pub mod elimination;
    pub mod matrix;
    pub mod matrix_q;
    pub mod solution;
}
pub mod rings {
    pub mod fraction;
}

#[cfg(feature = "python")]
pub mod python;

#[cfg(test)]
mod proptests;

pub use config::DisplayConfig;
pub use error::{Error, Result};
pub use matrix::elimination::{Reduction, StopEarly};
pub use matrix::matrix::Matrix;
pub use matrix::matrix_q::MatrixQ;
pub use matrix::solution::{FreeVariable, Solution};
pub use rings::fraction::Fraction;

/// Exact rational number, always in lowest terms with a positive denominator.
pub type Rational = Fraction;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pymodule]
fn rational_matrix(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyFraction>()?;
    m.add_class::<python::PyMatrix>()?;
    Ok(())
}
