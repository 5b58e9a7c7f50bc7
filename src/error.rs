use std::error::Error;
use std::fmt;

/// Errors related to exact linear algebra.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinalgErr {
    /// A fraction was constructed with a zero denominator.
    ZeroDenominator,

    /// An index was outside its permitted range. Contains the kind of index ("row", "column",
    /// "permutation"), the offending index and the exclusive upper bound.
    IndexOutOfBounds(&'static str, usize, usize),

    /// A matrix was requested with zero rows or zero columns. Contains the name of the function
    /// that complained.
    EmptyMatrix(&'static str),

    /// Nested rows of unequal length. Contains the row index, the expected and the actual length.
    JaggedRows(usize, usize, usize),

    /// A matrix was expected to be square, but wasn't. Contains the name of the function that
    /// complained, and the numbers of rows and columns of the offending matrix.
    NotSquare(&'static str, usize, usize),

    /// An elementwise operation received matrices of different shapes. Contains the name of the
    /// function that complained, and the `(rows, cols)` of the first and second argument.
    ShapeMismatch(&'static str, (usize, usize), (usize, usize)),

    /// A function of two arguments whose dimensions have to match received arguments of
    /// incompatible shapes. Contains the name of the function that complained, and the relevant
    /// dimensions of the first and second argument.
    DimensionMismatch(&'static str, usize, usize),

    /// A matrix that should have been a permutation matrix wasn't. Contains the name of the
    /// function that complained.
    NotPermutation(&'static str),

    /// The lower factor passed to the solver has a diagonal entry other than one. Contains the
    /// index of that entry.
    NotUnitDiagonal(usize),

    /// Zero has no reciprocal.
    ZeroReciprocal,

    /// Backward substitution met a zero on the diagonal of the upper factor. Contains its index.
    ZeroPivot(usize),

    /// Malformed numeric text. Contains the offending input.
    NumberFormat(String),
}

/// The broad class a [LinalgErr] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad index, dimension, zero denominator or violated precondition.
    InvalidArgument,
    /// Division by zero, in whatever guise.
    Arithmetic,
    /// Unparseable number.
    NumberFormat,
}

impl LinalgErr {
    /// The class of this error: bad input, division by zero, or unparseable text.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LinalgErr::ZeroReciprocal | LinalgErr::ZeroPivot(_) => ErrorKind::Arithmetic,
            LinalgErr::NumberFormat(_) => ErrorKind::NumberFormat,
            _ => ErrorKind::InvalidArgument,
        }
    }
}

impl fmt::Display for LinalgErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinalgErr::ZeroDenominator => write!(f, "denominator must be non-zero"),
            LinalgErr::IndexOutOfBounds(what, index, bound) =>
                write!(f, "invalid {} index {}; must be in [0, {})", what, index, bound),
            LinalgErr::EmptyMatrix(fname) =>
                write!(f, "argument for {} has no rows or no columns", fname),
            LinalgErr::JaggedRows(row, expected, found) =>
                write!(f, "row {} has {} elements, expected {}", row, found, expected),
            LinalgErr::NotSquare(fname, n, m) =>
                write!(f, "argument for {} is not square: {} rows and {} columns", fname, n, m),
            LinalgErr::ShapeMismatch(fname, (n1, m1), (n2, m2)) =>
                write!(f, "argument shapes for {} don't match: {}x{} and {}x{}", fname, n1, m1, n2, m2),
            LinalgErr::DimensionMismatch(fname, n, m) =>
                write!(f, "argument dimensions for {} don't match: first argument is {}-dimensional, second is {}-dimensional", fname, n, m),
            LinalgErr::NotPermutation(fname) =>
                write!(f, "argument for {} is not a permutation matrix", fname),
            LinalgErr::NotUnitDiagonal(i) =>
                write!(f, "lower factor must have a unit diagonal, but entry ({}, {}) is not one", i, i),
            LinalgErr::ZeroReciprocal => write!(f, "zero has no reciprocal"),
            LinalgErr::ZeroPivot(i) =>
                write!(f, "zero pivot at ({}, {}) of the upper factor", i, i),
            LinalgErr::NumberFormat(text) => write!(f, "malformed number: {:?}", text),
        }
    }
}

impl Error for LinalgErr {}
