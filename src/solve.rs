//! Solving linear systems from a precomputed LUP factorization.
//!
//! Nothing here computes a factorization. Given `P A = L U` with `L` unit lower triangular and
//! `U` upper triangular, the system `A x = b` becomes `L U x = P b`, which is solved by one pass of
//! forward substitution and one of backward substitution. All arithmetic is exact, so there is no
//! rounding error to refine away.

use log::debug;
use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::{ops, LinalgErr, Matrix, Rational};

fn check_square(fname: &'static str, a: &ArrayView2<Rational>) -> Result<usize, LinalgErr> {
    let (n, m) = a.dim();
    if n != m {
        return Err(LinalgErr::NotSquare(fname, n, m));
    }
    Ok(n)
}

/// Solve `L U x = b` for `x`, where `b` has already been permuted by the caller.
///
/// `L` and `U` must be square and of the same size as `b`, otherwise this fails with
/// [LinalgErr::NotSquare] or [LinalgErr::DimensionMismatch]. Forward substitution never divides,
/// so `L` must have ones on its diagonal; anything else fails with [LinalgErr::NotUnitDiagonal].
/// Entries of `L` above and of `U` below the diagonal are never read, so triangularity itself is
/// not checked.
///
/// A zero on the diagonal of `U` fails with [LinalgErr::ZeroPivot].
pub fn solve(
    l: ArrayView2<Rational>,
    u: ArrayView2<Rational>,
    b: ArrayView1<Rational>,
) -> Result<Array1<Rational>, LinalgErr> {
    let n = check_square("solve", &l)?;
    let nu = check_square("solve", &u)?;
    if n != nu {
        return Err(LinalgErr::DimensionMismatch("solve", n, nu));
    }
    if n != b.len() {
        return Err(LinalgErr::DimensionMismatch("solve", n, b.len()));
    }
    if let Some(i) = l.diag().iter().position(|x| !x.is_one()) {
        return Err(LinalgErr::NotUnitDiagonal(i));
    }

    debug!("solving a {}x{} system by substitution", n, n);
    let y = forward(l, b);
    backward(u, y)
}

/// Forward substitution, solving `L y = b` for unit lower triangular `L`.
fn forward(l: ArrayView2<Rational>, b: ArrayView1<Rational>) -> Array1<Rational> {
    let n = b.len();
    let mut y = Array1::from_elem(n, Rational::zero());
    for i in 0..n {
        let mut sum = Rational::zero();
        for j in 0..i {
            sum = &l[[i, j]] * &y[j] + sum;
        }
        y[i] = &b[i] - &sum;
    }
    y
}

/// Backward substitution, solving `U x = y`. Overwrites `y` from the bottom up.
fn backward(u: ArrayView2<Rational>, mut y: Array1<Rational>) -> Result<Array1<Rational>, LinalgErr> {
    let n = y.len();
    for i in (0..n).rev() {
        let mut sum = Rational::zero();
        for j in (i + 1)..n {
            sum = &u[[i, j]] * &y[j] + sum;
        }
        y[i] = (&y[i] - &sum)
            .checked_div(&u[[i, i]])
            .map_err(|_| LinalgErr::ZeroPivot(i))?;
    }
    Ok(y)
}

/// The factors of `P A = L U`, as supplied by the caller.
///
/// The permutation is kept in compact form (see [ops::compactify]) and applied to each right-hand
/// side before [solve] runs.
#[derive(Debug)]
pub struct Lup {
    l: Matrix,
    u: Matrix,
    permutation: Array1<usize>,
}

impl Lup {
    /// Bundle the factors. `L`, `U` and `P` must be square of equal size, `P` must be a
    /// permutation matrix and `L` must have a unit diagonal. Whether `L` and `U` are really
    /// triangular, and whether they factor anything in particular, is the caller's business.
    pub fn new(l: Matrix, u: Matrix, p: &Matrix) -> Result<Self, LinalgErr> {
        let n = check_square("Lup::new", &l.view())?;
        for m in [&u, p] {
            let k = check_square("Lup::new", &m.view())?;
            if k != n {
                return Err(LinalgErr::DimensionMismatch("Lup::new", n, k));
            }
        }
        if let Some(i) = l.view().diag().iter().position(|x| !x.is_one()) {
            return Err(LinalgErr::NotUnitDiagonal(i));
        }
        let permutation = p.compact_permutation()?;
        Ok(Lup { l, u, permutation })
    }

    /// The unit lower triangular factor.
    pub fn l(&self) -> &Matrix {
        &self.l
    }

    /// The upper triangular factor.
    pub fn u(&self) -> &Matrix {
        &self.u
    }

    /// Entry `i` is the column holding the one in row `i` of `P`.
    pub fn permutation(&self) -> ArrayView1<'_, usize> {
        self.permutation.view()
    }

    /// Solve `A x = b`: permute `b` to `P b`, then substitute forward through `L` and backward
    /// through `U`.
    pub fn solve(&self, b: ArrayView1<Rational>) -> Result<Array1<Rational>, LinalgErr> {
        if b.len() != self.permutation.len() {
            return Err(LinalgErr::DimensionMismatch(
                "Lup::solve",
                self.permutation.len(),
                b.len(),
            ));
        }
        let pb = ops::permute_vector(b, self.permutation.view())?;
        solve(self.l.view(), self.u.view(), pb.view())
    }
}

// tests
