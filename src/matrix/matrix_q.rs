use crate::config::DisplayConfig;
use crate::error::{Error, Result};
use crate::matrix::derived::Derived;
use crate::matrix::matrix::Matrix;
use crate::rings::fraction::Fraction;
use itertools::Itertools;
use num_traits::{One, Zero};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::fmt;
use std::ops;

/// Dense matrix of exact fractions.
///
/// Row and column arguments of the public API are 1-indexed. Elementary row
/// operations are out-of-place: they return a new matrix and leave the
/// receiver untouched. Derived attributes (determinant, inverse, RREF,
/// solution, transpose, cofactor and adjoint matrices) are computed on first
/// use and cached on the instance.
#[derive(Debug, Clone)]
pub struct MatrixQ {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) cells: Vec<Fraction>,
    pub(crate) derived: Derived,
}

impl Matrix<Fraction> for MatrixQ {
    fn from_list(lines: Vec<Vec<Fraction>>) -> Result<Self> {
        let rows = lines.len();
        let cols = lines.first().map(|l| l.len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimension { rows, cols });
        }
        if let Some((i, line)) = lines.iter().find_position(|l| l.len() != cols) {
            return Err(Error::InvalidValue(format!(
                "row {} has {} entries, expected {}",
                i + 1,
                line.len(),
                cols
            )));
        }

        Ok(MatrixQ::from_cells(
            rows,
            cols,
            lines.into_iter().flatten().collect(),
        ))
    }

    fn to_list(&self) -> Vec<Vec<Fraction>> {
        self.cells
            .chunks(self.cols)
            .map(|line| line.into())
            .collect()
    }

    fn identity(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidDimension { rows: n, cols: n });
        }
        Ok(MatrixQ::identity_unchecked(n))
    }

    fn is_rref(&self) -> bool {
        let mut last_pivot = None;
        let mut zero_row_seen = false;

        for i in 0..self.rows {
            let pivot = match self.row(i).iter().position(|x| !x.is_zero()) {
                None => {
                    zero_row_seen = true;
                    continue;
                }
                Some(_) if zero_row_seen => return false,
                Some(col) => col,
            };

            let ascending = last_pivot.map_or(true, |prev| pivot > prev);
            let cleared = (0..self.rows).all(|r| r == i || self.at(r, pivot).is_zero());
            if !ascending || !cleared || !self.at(i, pivot).is_one() {
                return false;
            }
            last_pivot = Some(pivot);
        }
        true
    }

    #[inline(always)]
    fn at(&self, row: usize, col: usize) -> &Fraction {
        &self.cells[row * self.cols + col]
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }
}

impl MatrixQ {
    pub fn new(rows: usize, cols: usize) -> Result<MatrixQ> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimension { rows, cols });
        }
        Ok(MatrixQ::from_cells(
            rows,
            cols,
            vec![Fraction::zero(); rows * cols],
        ))
    }

    pub fn from_integers(lines: Vec<Vec<i64>>) -> Result<MatrixQ> {
        MatrixQ::from_list(
            lines
                .into_iter()
                .map(|l| l.into_iter().map(Fraction::from).collect())
                .collect(),
        )
    }

    pub(crate) fn from_cells(rows: usize, cols: usize, cells: Vec<Fraction>) -> MatrixQ {
        debug_assert_eq!(cells.len(), rows * cols);
        MatrixQ {
            rows,
            cols,
            cells,
            derived: Derived::default(),
        }
    }

    pub(crate) fn identity_unchecked(n: usize) -> MatrixQ {
        MatrixQ::from_cells(
            n,
            n,
            (0..n)
                .flat_map(|i| {
                    (0..n).map(move |j| {
                        if i == j {
                            Fraction::one()
                        } else {
                            Fraction::zero()
                        }
                    })
                })
                .collect(),
        )
    }

    /// Copy of the entries without any of the cached attributes.
    pub(crate) fn detached(&self) -> MatrixQ {
        MatrixQ::from_cells(self.rows, self.cols, self.cells.clone())
    }

    pub(crate) fn row(&self, row: usize) -> &[Fraction] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    fn row_index(&self, row: usize) -> Result<usize> {
        if row == 0 || row > self.rows {
            return Err(Error::InvalidIndex {
                index: row,
                bound: self.rows,
            });
        }
        Ok(row - 1)
    }

    fn col_index(&self, col: usize) -> Result<usize> {
        if col == 0 || col > self.cols {
            return Err(Error::InvalidIndex {
                index: col,
                bound: self.cols,
            });
        }
        Ok(col - 1)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<&Fraction> {
        let (r, c) = (self.row_index(row)?, self.col_index(col)?);
        Ok(self.at(r, c))
    }

    /// Writes `value` at a 1-indexed position, in place.
    ///
    /// Every memoized attribute is dropped, since they were derived from the
    /// old entries.
    pub fn store_value(&mut self, value: impl Into<Fraction>, row: usize, col: usize) -> Result<()> {
        let (r, c) = (self.row_index(row)?, self.col_index(col)?);
        self.cells[r * self.cols + c] = value.into();
        self.derived.invalidate();
        Ok(())
    }

    pub fn add_to_entry(&self, value: impl Into<Fraction>, row: usize, col: usize) -> Result<MatrixQ> {
        let (r, c) = (self.row_index(row)?, self.col_index(col)?);
        let mut result = self.detached();
        result.cells[r * self.cols + c] += value.into();
        Ok(result)
    }

    pub fn swap_rows(&self, first_row: usize, second_row: usize) -> Result<MatrixQ> {
        let (a, b) = (self.row_index(first_row)?, self.row_index(second_row)?);
        let mut result = self.detached();
        result.swap_rows_mut(a, b);
        Ok(result)
    }

    /// New matrix where `factor` times `second_row` is added to `first_row`.
    pub fn add_row(
        &self,
        first_row: usize,
        factor: impl Into<Fraction>,
        second_row: usize,
    ) -> Result<MatrixQ> {
        let (dst, src) = (self.row_index(first_row)?, self.row_index(second_row)?);
        let mut result = self.detached();
        result.add_row_mut(dst, &factor.into(), src);
        Ok(result)
    }

    pub fn multiply_row(&self, row: usize, factor: impl Into<Fraction>) -> Result<MatrixQ> {
        let r = self.row_index(row)?;
        let mut result = self.detached();
        result.multiply_row_mut(r, &factor.into());
        Ok(result)
    }

    // In-place row primitives, 0-indexed. Only used on private copies.

    pub(crate) fn swap_rows_mut(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for k in 0..self.cols {
            self.cells.swap(a * self.cols + k, b * self.cols + k);
        }
    }

    pub(crate) fn add_row_mut(&mut self, dst: usize, factor: &Fraction, src: usize) {
        if factor.is_zero() {
            return;
        }
        for k in 0..self.cols {
            let delta = &self.cells[src * self.cols + k] * factor;
            self.cells[dst * self.cols + k] += delta;
        }
    }

    pub(crate) fn multiply_row_mut(&mut self, row: usize, factor: &Fraction) {
        for cell in &mut self.cells[row * self.cols..(row + 1) * self.cols] {
            *cell *= factor;
        }
    }

    pub fn scale(&self, factor: impl Into<Fraction>) -> MatrixQ {
        let factor = factor.into();
        MatrixQ::from_cells(
            self.rows,
            self.cols,
            self.cells.iter().map(|c| c * &factor).collect(),
        )
    }

    pub fn augment(&self, other: &MatrixQ) -> Result<MatrixQ> {
        if self.rows != other.rows {
            return Err(Error::mismatch("augmentation", self.shape(), other.shape()));
        }
        Ok(self.hstack(other))
    }

    pub(crate) fn hstack(&self, other: &MatrixQ) -> MatrixQ {
        MatrixQ::from_cells(
            self.rows,
            self.cols + other.cols,
            (0..self.rows)
                .flat_map(|r| self.row(r).iter().chain(other.row(r)).cloned())
                .collect(),
        )
    }

    /// Columns `start..end` (0-indexed) as a new matrix.
    pub(crate) fn column_block(&self, start: usize, end: usize) -> MatrixQ {
        MatrixQ::from_cells(
            self.rows,
            end - start,
            (0..self.rows)
                .flat_map(|r| self.row(r)[start..end].iter().cloned())
                .collect(),
        )
    }

    pub fn mul_vector(&self, x: &[Fraction]) -> Result<Vec<Fraction>> {
        if x.len() != self.cols {
            return Err(Error::mismatch(
                "matrix-vector product",
                self.shape(),
                (x.len(), 1),
            ));
        }
        Ok((0..self.rows)
            .map(|r| self.row(r).iter().zip(x).map(|(a, b)| a * b).sum())
            .collect())
    }

    pub fn is_zero(&self) -> bool {
        self.cells.iter().all(|c| c.is_zero())
    }

    /// `A^0` is the identity and negative powers go through the inverse.
    /// Returns `Ok(None)` when a negative power is asked of a singular matrix.
    pub fn pow(&self, exponent: i32) -> Result<Option<MatrixQ>> {
        if !self.is_square() {
            return Err(Error::mismatch("power", self.shape(), self.shape()));
        }

        let base = match exponent.cmp(&0) {
            Ordering::Equal => return Ok(Some(MatrixQ::identity_unchecked(self.rows))),
            Ordering::Greater => self.detached(),
            Ordering::Less => match self.find_inverse() {
                Some(inverse) => inverse.detached(),
                None => return Ok(None),
            },
        };

        let mut result = base.clone();
        for _ in 1..exponent.unsigned_abs() {
            result = (&result * &base)?;
        }
        Ok(Some(result))
    }

    /// Fixed-width rendering: every cell centered in `cell_width` columns,
    /// rows separated by a blank line.
    pub fn to_display_string(&self) -> String {
        self.to_display_string_with(&DisplayConfig::default())
    }

    pub fn to_display_string_with(&self, config: &DisplayConfig) -> String {
        let width = config.cell_width;
        (0..self.rows)
            .map(|r| {
                let open = if r == 0 { '[' } else { ' ' };
                let close = if r + 1 == self.rows { "]" } else { "" };
                let cells = self
                    .row(r)
                    .iter()
                    .map(|c| format!("{:^width$}", c))
                    .join("");
                format!("{open}{cells}{close}")
            })
            .join("\n\n")
    }
}

impl fmt::Display for MatrixQ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl PartialEq for MatrixQ {
    fn eq(&self, rhs: &MatrixQ) -> bool {
        self.rows == rhs.rows && self.cols == rhs.cols && self.cells == rhs.cells
    }
}

impl Eq for MatrixQ {}

impl ops::Add<&MatrixQ> for &MatrixQ {
    type Output = Result<MatrixQ>;

    fn add(self, rhs: &MatrixQ) -> Result<MatrixQ> {
        if self.cols != rhs.cols || self.rows != rhs.rows {
            return Err(Error::mismatch("addition", self.shape(), rhs.shape()));
        }

        Ok(MatrixQ::from_cells(
            self.rows,
            self.cols,
            self.cells
                .iter()
                .zip(rhs.cells.iter())
                .map(|(a, b)| a + b)
                .collect(),
        ))
    }
}

impl ops::Sub<&MatrixQ> for &MatrixQ {
    type Output = Result<MatrixQ>;

    fn sub(self, rhs: &MatrixQ) -> Result<MatrixQ> {
        if self.cols != rhs.cols || self.rows != rhs.rows {
            return Err(Error::mismatch("subtraction", self.shape(), rhs.shape()));
        }

        Ok(MatrixQ::from_cells(
            self.rows,
            self.cols,
            self.cells
                .iter()
                .zip(rhs.cells.iter())
                .map(|(a, b)| a - b)
                .collect(),
        ))
    }
}

impl ops::Mul<&MatrixQ> for &MatrixQ {
    type Output = Result<MatrixQ>;

    fn mul(self, rhs: &MatrixQ) -> Result<MatrixQ> {
        if self.cols != rhs.rows {
            return Err(Error::mismatch("multiplication", self.shape(), rhs.shape()));
        }

        let mut cells = vec![Fraction::zero(); self.rows * rhs.cols];
        cells
            .par_chunks_mut(rhs.cols)
            .enumerate()
            .for_each(|(r, row)| {
                for (c, cell) in row.iter_mut().enumerate() {
                    *cell = (0..self.cols).map(|k| self.at(r, k) * rhs.at(k, c)).sum();
                }
            });

        Ok(MatrixQ::from_cells(self.rows, rhs.cols, cells))
    }
}

impl ops::Mul<&Fraction> for &MatrixQ {
    type Output = MatrixQ;

    fn mul(self, rhs: &Fraction) -> MatrixQ {
        self.scale(rhs)
    }
}

impl ops::Mul<i64> for &MatrixQ {
    type Output = MatrixQ;

    fn mul(self, rhs: i64) -> MatrixQ {
        self.scale(rhs)
    }
}

impl ops::Mul<&MatrixQ> for &Fraction {
    type Output = MatrixQ;

    fn mul(self, rhs: &MatrixQ) -> MatrixQ {
        rhs.scale(self)
    }
}

impl ops::Mul<&MatrixQ> for i64 {
    type Output = MatrixQ;

    fn mul(self, rhs: &MatrixQ) -> MatrixQ {
        rhs.scale(self)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(num: i64, den: i64) -> Fraction {
        Fraction::new(num, den).unwrap()
    }

    fn m(lines: Vec<Vec<i64>>) -> MatrixQ {
        MatrixQ::from_integers(lines).unwrap()
    }

    #[test]
    fn test_construction() {
        let z = MatrixQ::new(2, 3).unwrap();
        assert_eq!(z.shape(), (2, 3));
        assert!(z.is_zero());
        assert_eq!(z.get(2, 3).unwrap(), &Fraction::zero());

        assert_eq!(
            MatrixQ::new(0, 3),
            Err(Error::InvalidDimension { rows: 0, cols: 3 })
        );
        assert_eq!(
            MatrixQ::new(3, 0),
            Err(Error::InvalidDimension { rows: 3, cols: 0 })
        );
        assert!(matches!(
            MatrixQ::from_integers(vec![vec![1, 2], vec![3]]),
            Err(Error::InvalidValue(_))
        ));
        assert!(matches!(
            MatrixQ::from_integers(vec![]),
            Err(Error::InvalidDimension { .. })
        ));
        assert_eq!(
            MatrixQ::identity(2).unwrap().to_list(),
            m(vec![vec![1, 0], vec![0, 1]]).to_list()
        );
    }

    #[test]
    fn test_store_value() {
        let mut a = MatrixQ::new(2, 2).unwrap();
        a.store_value(3, 1, 1).unwrap();
        a.store_value(frac(1, 2), 2, 2).unwrap();
        assert_eq!(a, MatrixQ::from_list(vec![
            vec![frac(3, 1), Fraction::zero()],
            vec![Fraction::zero(), frac(1, 2)],
        ]).unwrap());

        assert_eq!(
            a.store_value(1, 0, 1),
            Err(Error::InvalidIndex { index: 0, bound: 2 })
        );
        assert_eq!(
            a.store_value(1, 1, 3),
            Err(Error::InvalidIndex { index: 3, bound: 2 })
        );
    }

    #[test]
    fn test_store_value_invalidates_cache() {
        let mut a = m(vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(a.find_determinant(), Some(&frac(-2, 1)));
        assert_eq!(a.transpose(), &m(vec![vec![1, 3], vec![2, 4]]));
        assert_eq!(a.derived.computed(), 2);

        a.store_value(5, 1, 1).unwrap();
        assert_eq!(a.derived.computed(), 0);
        assert_eq!(a.find_determinant(), Some(&frac(14, 1)));
        assert_eq!(a.transpose(), &m(vec![vec![5, 3], vec![2, 4]]));
    }

    #[test]
    fn test_row_operations_are_out_of_place() {
        let a = m(vec![vec![1, 2], vec![3, 4], vec![5, 6]]);

        let swapped = a.swap_rows(1, 3).unwrap();
        assert_eq!(swapped, m(vec![vec![5, 6], vec![3, 4], vec![1, 2]]));

        let added = a.add_row(2, -3, 1).unwrap();
        assert_eq!(added, m(vec![vec![1, 2], vec![0, -2], vec![5, 6]]));

        let multiplied = a.multiply_row(3, frac(1, 2)).unwrap();
        assert_eq!(
            multiplied.to_list()[2],
            vec![frac(5, 2), frac(3, 1)]
        );

        let entry = a.add_to_entry(frac(1, 3), 1, 2).unwrap();
        assert_eq!(entry.get(1, 2).unwrap(), &frac(7, 3));

        // receiver untouched
        assert_eq!(a, m(vec![vec![1, 2], vec![3, 4], vec![5, 6]]));

        assert_eq!(
            a.swap_rows(0, 1),
            Err(Error::InvalidIndex { index: 0, bound: 3 })
        );
        assert!(a.add_row(1, 1, 4).is_err());
        assert!(a.multiply_row(0, 2).is_err());
        assert!(a.add_to_entry(1, 1, 0).is_err());
    }

    #[test]
    fn test_add_sub() {
        let a = m(vec![vec![1, 2], vec![3, 4]]);
        let b = m(vec![vec![2, 3], vec![4, 5]]);
        assert_eq!((&a + &b).unwrap(), m(vec![vec![3, 5], vec![7, 9]]));
        assert_eq!((&b - &a).unwrap(), m(vec![vec![1, 1], vec![1, 1]]));

        let c = m(vec![vec![1, 2, 3]]);
        assert_eq!(
            &a + &c,
            Err(Error::mismatch("addition", (2, 2), (1, 3)))
        );
        assert!((&a - &c).is_err());
    }

    #[test]
    fn test_mul() {
        let a = m(vec![vec![1, 2, 5, 77], vec![3, 4, 7, 11], vec![4, 8, 9, 1]]);
        let x = m(vec![vec![-8], vec![7], vec![1], vec![0]]);
        assert_eq!((&a * &x).unwrap(), m(vec![vec![11], vec![11], vec![33]]));
        assert_eq!(
            &a * &a,
            Err(Error::mismatch("multiplication", (3, 4), (3, 4)))
        );

        let half = frac(1, 2);
        let b = m(vec![vec![2, 4], vec![6, 8]]);
        assert_eq!(&b * &half, m(vec![vec![1, 2], vec![3, 4]]));
        assert_eq!(&b * 2i64, m(vec![vec![4, 8], vec![12, 16]]));

        assert_eq!(
            a.mul_vector(&[frac(-8, 1), frac(7, 1), frac(1, 1), Fraction::zero()])
                .unwrap(),
            vec![frac(11, 1), frac(11, 1), frac(33, 1)]
        );
        assert!(a.mul_vector(&[Fraction::one()]).is_err());
    }

    #[test]
    fn test_scalar_mul_commutes() {
        let b = m(vec![vec![2, -4], vec![6, 8]]);
        let third = frac(1, 3);
        assert_eq!(&third * &b, &b * &third);
        assert_eq!(&third * &b, MatrixQ::from_list(vec![
            vec![frac(2, 3), frac(-4, 3)],
            vec![frac(2, 1), frac(8, 3)],
        ]).unwrap());
        assert_eq!(-3i64 * &b, &b * -3i64);
        assert_eq!(0i64 * &b, MatrixQ::new(2, 2).unwrap());
        // receiver untouched
        assert_eq!(b, m(vec![vec![2, -4], vec![6, 8]]));
    }

    #[test]
    fn test_pow() {
        let a = m(vec![vec![1, 1], vec![1, 0]]);
        assert_eq!(a.pow(0).unwrap().unwrap(), MatrixQ::identity(2).unwrap());
        assert_eq!(a.pow(1).unwrap().unwrap(), a);
        assert_eq!(a.pow(5).unwrap().unwrap(), m(vec![vec![8, 5], vec![5, 3]]));

        let inv = a.pow(-2).unwrap().unwrap();
        assert_eq!((&inv * &a.pow(2).unwrap().unwrap()).unwrap(), MatrixQ::identity(2).unwrap());

        let singular = m(vec![vec![1, 2], vec![2, 4]]);
        assert_eq!(singular.pow(-1), Ok(None));
        assert_eq!(singular.pow(3).unwrap().unwrap(), m(vec![vec![25, 50], vec![50, 100]]));

        let rect = m(vec![vec![1, 2, 3]]);
        assert_eq!(rect.pow(2), Err(Error::mismatch("power", (1, 3), (1, 3))));
    }

    #[test]
    fn test_equality() {
        let a = m(vec![vec![1, 2]]);
        let b = MatrixQ::from_list(vec![vec![frac(2, 2), frac(4, 2)]]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, m(vec![vec![1], vec![2]]));
        assert_ne!(a, m(vec![vec![1, 3]]));
    }

    #[test]
    fn test_augment() {
        let a = m(vec![vec![1, 2], vec![3, 4]]);
        let b = m(vec![vec![5], vec![6]]);
        let ab = a.augment(&b).unwrap();
        assert_eq!(ab, m(vec![vec![1, 2, 5], vec![3, 4, 6]]));
        assert_eq!(ab.column_block(0, 2), a);
        assert_eq!(ab.column_block(2, 3), b);
        assert!(a.augment(&m(vec![vec![1]])).is_err());
    }

    #[test]
    fn test_is_rref() {
        assert!(m(vec![vec![1, 0, 2], vec![0, 1, 3]]).is_rref());
        assert!(m(vec![vec![1, 2, 0], vec![0, 0, 1], vec![0, 0, 0]]).is_rref());
        assert!(!m(vec![vec![1, 1, 0], vec![0, 1, 1]]).is_rref());
        assert!(!m(vec![vec![2, 0], vec![0, 1]]).is_rref());
        assert!(!m(vec![vec![0, 0], vec![0, 1]]).is_rref());
        assert!(!m(vec![vec![1, 0], vec![0, 0], vec![0, 1]]).is_rref());
        assert!(!m(vec![vec![0, 1], vec![1, 0]]).is_rref());
        assert!(m(vec![vec![0, 0], vec![0, 0]]).is_rref());
    }

    #[test]
    fn test_display() {
        let a = MatrixQ::from_list(vec![
            vec![frac(1, 1), frac(-3, 4)],
            vec![frac(10, 1), Fraction::zero()],
        ])
        .unwrap();
        let config = DisplayConfig::new().with_cell_width(6);
        assert_eq!(
            a.to_display_string_with(&config),
            "[  1    -3/4 \n\n   10    0   ]"
        );
        assert_eq!(
            m(vec![vec![7]]).to_string(),
            "[    7     ]"
        );
    }
}
