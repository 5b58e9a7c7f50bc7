//! Structural scans over a grid. These always rescan; [Matrix](crate::Matrix) caches the answers.

use ndarray::ArrayView2;

use crate::Rational;

fn is_square(a: &ArrayView2<Rational>) -> bool {
    a.nrows() == a.ncols()
}

/// Square, and every entry strictly above the diagonal is zero.
pub fn is_lower_triangular(a: ArrayView2<Rational>) -> bool {
    if !is_square(&a) {
        return false;
    }
    for j in 1..a.ncols() {
        for i in 0..j {
            if !a[[i, j]].is_zero() {
                return false;
            }
        }
    }
    true
}

/// Square, and every entry strictly below the diagonal is zero.
pub fn is_upper_triangular(a: ArrayView2<Rational>) -> bool {
    if !is_square(&a) {
        return false;
    }
    for i in 1..a.nrows() {
        for j in 0..i {
            if !a[[i, j]].is_zero() {
                return false;
            }
        }
    }
    true
}

/// Both lower and upper triangular.
pub fn is_diagonal(a: ArrayView2<Rational>) -> bool {
    is_lower_triangular(a) && is_upper_triangular(a)
}

/// Diagonal with ones on the diagonal.
pub fn is_identity(a: ArrayView2<Rational>) -> bool {
    is_diagonal(a) && a.diag().iter().all(Rational::is_one)
}

/// Square, entries only zero or one, and exactly one one in every row and every column.
///
/// Row `i` and column `i` are scanned together in a single pass.
pub fn is_permutation(a: ArrayView2<Rational>) -> bool {
    if !is_square(&a) {
        return false;
    }
    let n = a.nrows();
    for i in 0..n {
        let mut one_in_row = false;
        let mut one_in_col = false;
        for j in 0..n {
            if !mark_one(&a[[i, j]], &mut one_in_row) || !mark_one(&a[[j, i]], &mut one_in_col) {
                return false;
            }
        }
        if !one_in_row || !one_in_col {
            return false;
        }
    }
    true
}

/// Record a one in `seen`. Returns `false` for a second one, or for anything but zero and one.
fn mark_one(x: &Rational, seen: &mut bool) -> bool {
    if x.is_one() {
        !std::mem::replace(seen, true)
    } else {
        x.is_zero()
    }
}

// tests
