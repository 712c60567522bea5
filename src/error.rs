use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid type: {0}")]
    InvalidType(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid dimension: {rows} x {cols}")]
    InvalidDimension { rows: usize, cols: usize },

    #[error("Invalid index {index}, expected 1..={bound}")]
    InvalidIndex { index: usize, bound: usize },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Dimension mismatch in {op}: {}x{} and {}x{}", .left.0, .left.1, .right.0, .right.1)]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Cannot parse fraction: {0:?}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl Error {
    pub(crate) fn mismatch(op: &'static str, left: (usize, usize), right: (usize, usize)) -> Self {
        Error::DimensionMismatch { op, left, right }
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
