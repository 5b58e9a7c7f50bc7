//! An immutable rational matrix that remembers its structural properties.
//!
//! The matrix is zero-indexed: the second element of the third row is at `(2, 1)`.

use log::trace;
use ndarray::{Array2, ArrayView2};
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use crate::{ops, properties, rational, LinalgErr, Rational};

/// Write-once answers to the structural questions. The grid never changes, so nothing is ever
/// invalidated.
#[derive(Clone, Default)]
struct Memo {
    lower: OnceCell<bool>,
    upper: OnceCell<bool>,
    diagonal: OnceCell<bool>,
    identity: OnceCell<bool>,
    symmetric: OnceCell<bool>,
    permutation: OnceCell<bool>,
}

impl Memo {
    /// The facts that carry over to the transpose: lower and upper swap, the rest are invariant.
    fn transposed(&self) -> Memo {
        Memo {
            lower: self.upper.clone(),
            upper: self.lower.clone(),
            diagonal: self.diagonal.clone(),
            identity: self.identity.clone(),
            symmetric: self.symmetric.clone(),
            permutation: self.permutation.clone(),
        }
    }
}

fn memoized(cell: &OnceCell<bool>, name: &str, f: impl FnOnce() -> bool) -> bool {
    *cell.get_or_init(|| {
        let value = f();
        trace!("computed {} = {}", name, value);
        value
    })
}

/// A non-empty, rectangular grid of [Rational]s.
///
/// Predicates such as [Matrix::is_permutation] and the [transpose](Matrix::transpose) are
/// computed on first request and then cached. The grid is shared with the cached transpose
/// through an [Rc], so a matrix is neither `Send` nor `Sync`.
#[derive(Clone)]
pub struct Matrix {
    data: Rc<Array2<Rational>>,
    memo: Memo,
    /// The transposed grid. Seeded when this matrix was itself created as a transpose.
    transposed_data: OnceCell<Rc<Array2<Rational>>>,
    transposed: OnceCell<Box<Matrix>>,
}

impl Matrix {
    /// Take ownership of `data`; no copy is made. Fails with [LinalgErr::EmptyMatrix] if there
    /// are no rows or no columns.
    pub fn new(data: Array2<Rational>) -> Result<Self, LinalgErr> {
        if data.is_empty() {
            return Err(LinalgErr::EmptyMatrix("Matrix::new"));
        }
        Ok(Self::from_shared(Rc::new(data), OnceCell::new(), Memo::default()))
    }

    fn from_shared(
        data: Rc<Array2<Rational>>,
        transposed_data: OnceCell<Rc<Array2<Rational>>>,
        memo: Memo,
    ) -> Self {
        Matrix {
            data,
            memo,
            transposed_data,
            transposed: OnceCell::new(),
        }
    }

    /// An independent copy of a borrowed grid.
    pub fn from_view(data: ArrayView2<Rational>) -> Result<Self, LinalgErr> {
        Self::new(data.to_owned())
    }

    /// Build from nested rows, which must all have the same, non-zero length.
    pub fn from_rows(rows: Vec<Vec<Rational>>) -> Result<Self, LinalgErr> {
        let n = rows.len();
        let m = rows.first().map_or(0, Vec::len);
        if n == 0 || m == 0 {
            return Err(LinalgErr::EmptyMatrix("Matrix::from_rows"));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != m) {
            return Err(LinalgErr::JaggedRows(i, m, row.len()));
        }
        let flat: Vec<Rational> = rows.into_iter().flatten().collect();
        let data = Array2::from_shape_vec((n, m), flat)
            .map_err(|_| LinalgErr::DimensionMismatch("Matrix::from_rows", n * m, m))?;
        Self::new(data)
    }

    /// Convert a float grid entry by entry (see [rational::rationalize]).
    pub fn from_f64(data: ArrayView2<f64>) -> Result<Self, LinalgErr> {
        Self::new(rational::rationalize(&data)?)
    }

    /// The `rows x cols` zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self, LinalgErr> {
        Self::new(Array2::from_elem((rows, cols), Rational::zero()))
    }

    /// The `n x n` identity matrix.
    pub fn identity(n: usize) -> Result<Self, LinalgErr> {
        let data = Array2::from_shape_fn((n, n), |(i, j)| {
            if i == j {
                Rational::one()
            } else {
                Rational::zero()
            }
        });
        Self::new(data)
    }

    /// The element at `(i, j)`, or [LinalgErr::IndexOutOfBounds].
    pub fn get(&self, i: usize, j: usize) -> Result<&Rational, LinalgErr> {
        if i >= self.rows() {
            return Err(LinalgErr::IndexOutOfBounds("row", i, self.rows()));
        }
        if j >= self.cols() {
            return Err(LinalgErr::IndexOutOfBounds("column", j, self.cols()));
        }
        Ok(&self.data[[i, j]])
    }

    /// The number of rows.
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// The number of columns.
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Borrow the underlying grid.
    pub fn view(&self) -> ArrayView2<'_, Rational> {
        self.data.view()
    }

    /// `true` if `rows() == cols()`. Constant time, so not cached.
    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    /// `true` if `get(i, j)` is zero whenever `i < j`.
    pub fn is_lower_triangular(&self) -> bool {
        memoized(&self.memo.lower, "lower triangular", || {
            properties::is_lower_triangular(self.view())
        })
    }

    /// `true` if `get(i, j)` is zero whenever `j < i`.
    pub fn is_upper_triangular(&self) -> bool {
        memoized(&self.memo.upper, "upper triangular", || {
            properties::is_upper_triangular(self.view())
        })
    }

    /// Both lower and upper triangular.
    pub fn is_diagonal(&self) -> bool {
        memoized(&self.memo.diagonal, "diagonal", || {
            self.is_lower_triangular() && self.is_upper_triangular()
        })
    }

    /// Diagonal, with every diagonal entry equal to one.
    pub fn is_identity(&self) -> bool {
        memoized(&self.memo.identity, "identity", || {
            self.is_diagonal() && self.data.diag().iter().all(Rational::is_one)
        })
    }

    /// `true` if the matrix equals its transpose.
    pub fn is_symmetric(&self) -> bool {
        memoized(&self.memo.symmetric, "symmetric", || {
            self.is_square() && self == self.transpose()
        })
    }

    /// Square, only zeros and ones, and exactly one one per row and per column.
    pub fn is_permutation(&self) -> bool {
        memoized(&self.memo.permutation, "permutation", || {
            properties::is_permutation(self.view())
        })
    }

    /// The transpose, computed on first use.
    ///
    /// The returned matrix knows this one's grid, so transposing it again is free and yields a
    /// matrix sharing storage with `self`.
    pub fn transpose(&self) -> &Matrix {
        self.transposed.get_or_init(|| {
            let data = self
                .transposed_data
                .get_or_init(|| Rc::new(self.data.t().to_owned()));
            Box::new(Matrix::from_shared(
                Rc::clone(data),
                OnceCell::from(Rc::clone(&self.data)),
                self.memo.transposed(),
            ))
        })
    }

    /// Compact form of a permutation matrix (see [ops::compactify]). Fails with
    /// [LinalgErr::NotPermutation] unless [Matrix::is_permutation] holds.
    pub fn compact_permutation(&self) -> Result<ndarray::Array1<usize>, LinalgErr> {
        if !self.is_permutation() {
            return Err(LinalgErr::NotPermutation("compact_permutation"));
        }
        ops::compactify(self.view())
    }

    /// `true` if both matrices have the same shape and every pair of entries differs by at most
    /// `tolerance`.
    pub fn approx_eq(&self, other: &Matrix, tolerance: &Rational) -> bool {
        if self.data.dim() != other.data.dim() {
            return false;
        }
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).abs() <= *tolerance)
    }

    /// Elementwise sum. Fails with [LinalgErr::ShapeMismatch] unless the shapes agree.
    pub fn add(&self, other: &Matrix) -> Result<Matrix, LinalgErr> {
        Matrix::new(ops::add(self.view(), other.view())?)
    }

    /// Elementwise difference. Fails with [LinalgErr::ShapeMismatch] unless the shapes agree.
    pub fn subtract(&self, other: &Matrix) -> Result<Matrix, LinalgErr> {
        Matrix::new(ops::subtract(self.view(), other.view())?)
    }

    /// Every entry multiplied by `scalar`.
    pub fn scale(&self, scalar: &Rational) -> Matrix {
        Self::from_shared(
            Rc::new(ops::scale(self.view(), scalar)),
            OnceCell::new(),
            Memo::default(),
        )
    }

    /// Matrix product `self * other`. Fails with [LinalgErr::DimensionMismatch] unless
    /// `self.cols() == other.rows()`.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix, LinalgErr> {
        Matrix::new(ops::multiply(self.view(), other.view())?)
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for Matrix {}

impl fmt::Display for Matrix {
    /// One line per row, like `[1, 2/3, -4]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.data.rows().into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for (j, x) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", x)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("rows", &self.rows())
            .field("cols", &self.cols())
            .field("data", &self.data)
            .finish()
    }
}

// tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use ndarray::arr2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const COUNT: usize = 10;
    const LIMIT: usize = 30;

    fn q(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    fn ints<const N: usize>(rows: &[[i64; N]]) -> Matrix {
        let flat = rows.iter().flatten().map(|&x| Rational::from(x)).collect();
        Matrix::new(Array2::from_shape_vec((rows.len(), N), flat).unwrap()).unwrap()
    }

    fn random_rational(rng: &mut StdRng) -> Rational {
        Rational::new(rng.gen_range(-100i64..100), rng.gen_range(1i64..50)).unwrap()
    }

    fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Matrix {
        Matrix::new(Array2::from_shape_fn((rows, cols), |_| random_rational(rng))).unwrap()
    }

    #[test]
    fn identity() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..COUNT {
            let n = rng.gen_range(1..=LIMIT);
            let m = Matrix::identity(n).unwrap();
            assert!(m.is_square());
            assert!(m.is_lower_triangular());
            assert!(m.is_upper_triangular());
            assert!(m.is_diagonal());
            assert!(m.is_identity());
            assert!(m.is_symmetric());
            assert!(m.is_permutation());
        }
        assert_eq!(Matrix::identity(0), Err(LinalgErr::EmptyMatrix("Matrix::new")));
    }

    #[test]
    fn rows_and_cols() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..COUNT {
            let rows = rng.gen_range(1..=LIMIT);
            let cols = rng.gen_range(1..=LIMIT);
            let m = Matrix::zeros(rows, cols).unwrap();
            assert_eq!(m.rows(), rows);
            assert_eq!(m.cols(), cols);
            assert_eq!(m.is_square(), rows == cols);
        }
    }

    #[test]
    fn construction_errors() {
        assert_eq!(Matrix::zeros(0, 3), Err(LinalgErr::EmptyMatrix("Matrix::new")));
        assert_eq!(
            Matrix::from_rows(vec![]),
            Err(LinalgErr::EmptyMatrix("Matrix::from_rows"))
        );
        let jagged = vec![vec![q(1, 1), q(2, 1)], vec![q(3, 1)]];
        assert_eq!(Matrix::from_rows(jagged), Err(LinalgErr::JaggedRows(1, 2, 1)));
        let ok = Matrix::from_rows(vec![vec![q(1, 1), q(2, 1)], vec![q(3, 1), q(4, 1)]]);
        assert_eq!(ok.unwrap(), ints(&[[1, 2], [3, 4]]));
    }

    #[test]
    fn get() {
        let m = ints(&[[1, 2, 3], [4, 5, 6]]);
        assert_eq!(m.get(1, 2).unwrap(), &q(6, 1));
        let e = m.get(2, 0).unwrap_err();
        assert_eq!(e, LinalgErr::IndexOutOfBounds("row", 2, 2));
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);
        assert_eq!(m.get(0, 3), Err(LinalgErr::IndexOutOfBounds("column", 3, 3)));
    }

    #[test]
    fn transpose_and_equals() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..COUNT {
            let rows = rng.gen_range(1..=LIMIT);
            let cols = rng.gen_range(1..=LIMIT);
            let a = random_matrix(&mut rng, rows, cols);
            let t = Matrix::new(Array2::from_shape_fn((cols, rows), |(i, j)| {
                a.get(j, i).unwrap().clone()
            }))
            .unwrap();
            assert_eq!(a.transpose(), &t);
            assert_eq!(a.transpose().transpose(), &a);
        }
    }

    #[test]
    fn transpose_is_cached_and_shares_storage() {
        let m = ints(&[[1, 2, 3], [4, 5, 6]]);
        let t = m.transpose();
        assert!(std::ptr::eq(t, m.transpose()));
        let tt = t.transpose();
        assert!(Rc::ptr_eq(&tt.data, &m.data));
        assert!(Rc::ptr_eq(&tt.transpose().data, &t.data));
    }

    #[test]
    fn transpose_inherits_known_facts() {
        let l = ints(&[[1, 0], [7, 1]]);
        assert!(l.is_lower_triangular());
        assert!(!l.is_upper_triangular());
        let u = l.transpose();
        assert_eq!(u.memo.upper.get(), Some(&true));
        assert_eq!(u.memo.lower.get(), Some(&false));
        assert!(u.is_upper_triangular());
    }

    #[test]
    fn symmetric() {
        assert!(ints(&[[1, 2], [2, 5]]).is_symmetric());
        assert!(!ints(&[[1, 2], [3, 5]]).is_symmetric());
        assert!(!ints(&[[1, 2]]).is_symmetric());
    }

    #[test]
    fn to_string() {
        let expected = "[1, 2, 3]\n[4, 5, 6]\n[7, 8, 9]\n[10, 11, 12]";
        let m = Matrix::from_f64(
            arr2(&[[1., 2., 3.], [4., 5., 6.], [7., 8., 9.], [10., 11., 12.]]).view(),
        )
        .unwrap();
        assert_eq!(m.to_string(), expected);
        let f = Matrix::from_f64(arr2(&[[0.5, -0.2]]).view()).unwrap();
        assert_eq!(f.to_string(), "[1/2, -1/5]");
    }

    #[test]
    fn permutation_matrix() {
        assert!(ints(&[[1, 0, 0], [0, 0, 1], [0, 1, 0]]).is_permutation());
        assert!(!ints(&[[1, 1, 0], [0, 0, 1], [0, 1, 0]]).is_permutation());
        assert!(!ints(&[[1, 1, 7], [1, 0, 1], [0, 1, 0]]).is_permutation());
        assert!(!ints(&[[1, 0, 0], [1, 0, 0], [0, 1, 0]]).is_permutation());

        let p = ints(&[[0, 0, 1], [1, 0, 0], [0, 1, 0]]);
        assert!(p.is_permutation());
        assert!(!p.is_symmetric());
        assert_eq!(p.compact_permutation().unwrap(), ndarray::arr1(&[2, 0, 1]));
        assert_eq!(
            ints(&[[1, 1], [0, 1]]).compact_permutation(),
            Err(LinalgErr::NotPermutation("compact_permutation"))
        );
    }

    #[test]
    fn permutation_times_transpose_is_identity() {
        let p = ints(&[[0, 0, 1, 0], [1, 0, 0, 0], [0, 0, 0, 1], [0, 1, 0, 0]]);
        assert!(p.multiply(p.transpose()).unwrap().is_identity());
    }

    #[test]
    fn arithmetic() {
        let a = ints(&[[1, 2], [3, 4]]);
        let b = Matrix::new(arr2(&[[q(1, 2), q(0, 1)], [q(-1, 3), q(1, 1)]])).unwrap();
        assert_eq!(
            a.add(&b).unwrap(),
            Matrix::new(arr2(&[[q(3, 2), q(2, 1)], [q(8, 3), q(5, 1)]])).unwrap()
        );
        assert_eq!(a.add(&b).unwrap().subtract(&b).unwrap(), a);
        assert_eq!(a.scale(&Rational::half()).scale(&q(2, 1)), a);
        assert_eq!(
            a.multiply(&b).unwrap(),
            Matrix::new(arr2(&[[q(-1, 6), q(2, 1)], [q(1, 6), q(4, 1)]])).unwrap()
        );
        assert_eq!(a.multiply(&Matrix::identity(2).unwrap()).unwrap(), a);

        let row = ints(&[[1, 2, 3]]);
        assert_eq!(
            a.add(&row),
            Err(LinalgErr::ShapeMismatch("add", (2, 2), (1, 3)))
        );
    }

    #[test]
    fn multiply_dimension_mismatch() {
        let a = ints(&[[1, 2], [3, 4]]);
        let row = ints(&[[1, 2, 3]]);
        assert_eq!(
            a.multiply(&row),
            Err(LinalgErr::DimensionMismatch("multiply", 2, 1))
        );
        assert_eq!(
            row.multiply(&a),
            Err(LinalgErr::DimensionMismatch("multiply", 3, 2))
        );
        assert_eq!(row.multiply(row.transpose()).unwrap(), ints(&[[14]]));
    }

    #[test]
    fn approximately_equal() {
        let a = ints(&[[1, 2], [3, 4]]);
        let b = Matrix::new(arr2(&[[q(101, 100), q(2, 1)], [q(3, 1), q(399, 100)]])).unwrap();
        assert!(a.approx_eq(&b, &q(1, 100)));
        assert!(!a.approx_eq(&b, &q(1, 200)));
        assert!(!a.approx_eq(&ints(&[[1, 2]]), &q(100, 1)));
    }
}
