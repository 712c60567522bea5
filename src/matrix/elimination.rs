use crate::error::{Error, Result};
use crate::matrix::matrix::Matrix;
use crate::matrix::matrix_q::MatrixQ;
use crate::rings::fraction::Fraction;
use itertools::iproduct;
use log::{debug, trace};
use num_traits::{One, Zero};

/// Where Gauss-Jordan elimination may stop before reaching the reduced row
/// echelon form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopEarly {
    /// Always run back-substitution.
    Never,
    /// Treat the last column as constants and stop at the row echelon form
    /// when the system is inconsistent.
    NoSolution,
    /// Stop at the row echelon form and report the determinant.
    Determinant,
}

/// Outcome of [`MatrixQ::gaussian_elimination_with`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reduction {
    Determinant(Fraction),
    /// Row echelon form of an inconsistent system, back-substitution skipped.
    Inconsistent(MatrixQ),
    Reduced(MatrixQ),
}

impl MatrixQ {
    /// Forward elimination to row echelon form.
    ///
    /// Pivots are the first nonzero entry at or below the current row and
    /// are normalized to 1. The returned factor is the determinant of the
    /// receiver divided by the product of the echelon diagonal: -1 per row
    /// swap, times every pivot value divided out.
    fn row_echelon(&self) -> (MatrixQ, Fraction) {
        let mut result = self.detached();
        let mut det_factor = Fraction::one();
        let mut row = 0;
        let mut col = 0;

        while col < result.cols && row < result.rows {
            let leading = (row..result.rows).find(|&r| !result.at(r, col).is_zero());

            if let Some(pivot_row) = leading {
                if pivot_row != row {
                    trace!("swap rows {} and {}", row + 1, pivot_row + 1);
                    det_factor = -det_factor;
                    result.swap_rows_mut(row, pivot_row);
                }

                let pivot = result.at(row, col).clone();
                trace!("pivot {} at ({}, {})", pivot, row + 1, col + 1);
                for k in col..result.cols {
                    let value = result.at(row, k) / &pivot;
                    result.cells[row * result.cols + k] = value;
                }
                det_factor *= &pivot;

                for r in row + 1..result.rows {
                    let factor = -result.at(r, col);
                    result.add_row_mut(r, &factor, row);
                }

                row += 1;
            }
            col += 1;
        }

        (result, det_factor)
    }

    fn back_substitute(&mut self) {
        for r in 0..self.rows {
            let pivot_col = match (0..self.cols).find(|&c| !self.at(r, c).is_zero()) {
                Some(c) => c,
                None => break,
            };
            for i in 0..r {
                let factor = -self.at(i, pivot_col);
                self.add_row_mut(i, &factor, r);
            }
        }
    }

    /// Whether an augmented echelon form contains a row `0 ... 0 | c` with
    /// `c != 0`. Only the lowest row with a nonzero constant can be one.
    fn has_contradiction(&self) -> bool {
        let last = self.cols - 1;
        match (0..self.rows).rev().find(|&r| !self.at(r, last).is_zero()) {
            Some(r) => self.row(r)[..last].iter().all(|x| x.is_zero()),
            None => false,
        }
    }

    /// Reduced row echelon form, computed once and cached.
    pub fn gaussian_elimination(&self) -> &MatrixQ {
        self.derived.reduced_echelon_form.get_or_init(|| {
            debug!("reducing {}x{} matrix", self.rows, self.cols);
            let (mut echelon, _) = self.row_echelon();
            echelon.back_substitute();
            Box::new(echelon)
        })
    }

    /// Gauss-Jordan elimination with the early exits used by the
    /// determinant and the linear system solver.
    ///
    /// [`StopEarly::Determinant`] requires a square matrix and fails with
    /// [`Error::DimensionMismatch`] otherwise.
    pub fn gaussian_elimination_with(&self, stop: StopEarly) -> Result<Reduction> {
        match stop {
            StopEarly::Never => Ok(Reduction::Reduced(self.gaussian_elimination().clone())),
            StopEarly::NoSolution => Ok(self.reduce_system()),
            StopEarly::Determinant => match self.find_determinant() {
                Some(determinant) => Ok(Reduction::Determinant(determinant.clone())),
                None => Err(Error::mismatch("determinant", self.shape(), self.shape())),
            },
        }
    }

    pub(crate) fn reduce_system(&self) -> Reduction {
        if let Some(reduced) = self.derived.reduced_echelon_form.get() {
            let reduced = MatrixQ::clone(reduced);
            if reduced.has_contradiction() {
                return Reduction::Inconsistent(reduced);
            }
            return Reduction::Reduced(reduced);
        }

        let (echelon, _) = self.row_echelon();
        if echelon.has_contradiction() {
            debug!("inconsistent system, skipping back-substitution");
            return Reduction::Inconsistent(echelon);
        }

        let reduced = self.derived.reduced_echelon_form.get_or_init(|| {
            let mut reduced = echelon;
            reduced.back_substitute();
            Box::new(reduced)
        });
        Reduction::Reduced(MatrixQ::clone(reduced))
    }

    /// Determinant, or `None` for a non-square matrix.
    pub fn find_determinant(&self) -> Option<&Fraction> {
        self.derived
            .determinant
            .get_or_init(|| self.compute_determinant())
            .as_ref()
    }

    fn compute_determinant(&self) -> Option<Fraction> {
        if !self.is_square() {
            return None;
        }

        if self.rows == 2 {
            return Some(self.at(0, 0) * self.at(1, 1) - self.at(0, 1) * self.at(1, 0));
        }

        let (echelon, det_factor) = self.row_echelon();
        let determinant =
            (0..echelon.rows).map(|i| echelon.at(i, i)).product::<Fraction>() * det_factor;
        debug!("determinant of {}x{} matrix: {}", self.rows, self.cols, determinant);
        Some(determinant)
    }

    /// Inverse, or `None` when the matrix is not square or singular.
    pub fn find_inverse(&self) -> Option<&MatrixQ> {
        self.derived
            .inverse
            .get_or_init(|| self.compute_inverse().map(Box::new))
            .as_deref()
    }

    fn compute_inverse(&self) -> Option<MatrixQ> {
        match self.find_determinant() {
            Some(determinant) if !determinant.is_zero() => {}
            _ => return None,
        }

        let n = self.rows;
        let identity = MatrixQ::identity_unchecked(n);
        let augmented = self.hstack(&identity);
        let reduced = augmented.gaussian_elimination();

        // the left half must have reduced to the identity for the right half
        // to be the inverse
        if reduced.column_block(0, n) != identity {
            debug!("left block did not reduce to the identity, no inverse");
            return None;
        }
        Some(reduced.column_block(n, 2 * n))
    }

    pub fn transpose(&self) -> &MatrixQ {
        self.derived.transpose.get_or_init(|| {
            Box::new(MatrixQ::from_cells(
                self.cols,
                self.rows,
                iproduct!(0..self.cols, 0..self.rows)
                    .map(|(c, r)| self.at(r, c).clone())
                    .collect(),
            ))
        })
    }

    /// Determinant of the matrix with `row` and `col` (1-indexed) removed.
    ///
    /// A 1x1 matrix has no minor and gives `Ok(None)`.
    pub fn minor(&self, row: usize, col: usize) -> Result<Option<Fraction>> {
        if !self.is_square() {
            return Err(Error::mismatch("minor", self.shape(), self.shape()));
        }
        for index in [row, col] {
            if index == 0 || index > self.rows {
                return Err(Error::InvalidIndex {
                    index,
                    bound: self.rows,
                });
            }
        }
        if self.rows == 1 {
            return Ok(None);
        }

        let (skip_row, skip_col) = (row - 1, col - 1);
        let n = self.rows - 1;
        let removed = MatrixQ::from_cells(
            n,
            n,
            iproduct!(0..self.rows, 0..self.cols)
                .filter(|&(r, c)| r != skip_row && c != skip_col)
                .map(|(r, c)| self.at(r, c).clone())
                .collect(),
        );
        Ok(removed.find_determinant().cloned())
    }

    /// Matrix of cofactors `(-1)^(i+j) * minor(i, j)`, square matrices only.
    ///
    /// The cofactor matrix of a 1x1 matrix is `[1]`.
    pub fn cofactor_matrix(&self) -> Result<&MatrixQ> {
        if !self.is_square() {
            return Err(Error::mismatch("cofactor matrix", self.shape(), self.shape()));
        }

        self.derived
            .cofactor_matrix
            .get_or_try_init(|| -> Result<Box<MatrixQ>> {
                let n = self.rows;
                if n == 1 {
                    return Ok(Box::new(MatrixQ::identity_unchecked(1)));
                }

                let cells = iproduct!(1..=n, 1..=n)
                    .map(|(r, c)| -> Result<Fraction> {
                        let minor = self.minor(r, c)?.unwrap_or_else(Fraction::zero);
                        Ok(if (r + c) % 2 == 0 { minor } else { -minor })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Box::new(MatrixQ::from_cells(n, n, cells)))
            })
            .map(|m| &**m)
    }

    pub fn adjoint_matrix(&self) -> Result<&MatrixQ> {
        self.derived
            .adjoint_matrix
            .get_or_try_init(|| -> Result<Box<MatrixQ>> {
                Ok(Box::new(self.cofactor_matrix()?.transpose().detached()))
            })
            .map(|m| &**m)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
