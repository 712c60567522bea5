use crate::error::Result;

/// Dense matrix surface shared by the matrix types of the crate.
///
/// Indices taken by `at` are 0-indexed; the 1-indexed row/column API lives on
/// the concrete types.
pub trait Matrix<T>
where
    Self: Sized,
{
    fn from_list(lines: Vec<Vec<T>>) -> Result<Self>;
    fn to_list(&self) -> Vec<Vec<T>>;

    fn identity(n: usize) -> Result<Self>;
    fn is_rref(&self) -> bool;
    fn at(&self, row: usize, col: usize) -> &T;

    fn rows(&self) -> usize;
    fn cols(&self) -> usize;

    fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }
}
