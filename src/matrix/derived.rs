use crate::matrix::matrix_q::MatrixQ;
use crate::matrix::solution::Solution;
use crate::rings::fraction::Fraction;
use once_cell::sync::OnceCell;

/// Memoized attributes of a [`MatrixQ`].
///
/// An empty cell means "not computed yet". A filled cell holding `None`
/// means "computed, and the result is absent" (no determinant, no inverse).
/// Each cell is written at most once; `store_value` replaces the whole set.
#[derive(Debug, Clone, Default)]
pub(crate) struct Derived {
    pub determinant: OnceCell<Option<Fraction>>,
    pub inverse: OnceCell<Option<Box<MatrixQ>>>,
    pub reduced_echelon_form: OnceCell<Box<MatrixQ>>,
    pub solution: OnceCell<Solution>,
    pub transpose: OnceCell<Box<MatrixQ>>,
    pub cofactor_matrix: OnceCell<Box<MatrixQ>>,
    pub adjoint_matrix: OnceCell<Box<MatrixQ>>,
}

impl Derived {
    pub fn invalidate(&mut self) {
        *self = Derived::default();
    }

    #[cfg(test)]
    pub fn computed(&self) -> usize {
        [
            self.determinant.get().is_some(),
            self.inverse.get().is_some(),
            self.reduced_echelon_form.get().is_some(),
            self.solution.get().is_some(),
            self.transpose.get().is_some(),
            self.cofactor_matrix.get().is_some(),
            self.adjoint_matrix.get().is_some(),
        ]
        .iter()
        .filter(|&&found| found)
        .count()
    }
}
