//! Allocation-returning functions on raw rational grids.
//!
//! Nothing here is cached: every call recomputes from its arguments. [Matrix](crate::Matrix)
//! delegates its arithmetic to these functions, and the permutation helpers are used to apply a
//! factorization's permutation to a right-hand side without forming the product `P b`.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};

use crate::{LinalgErr, Rational};

fn check_same_shape(
    fname: &'static str,
    a: &ArrayView2<Rational>,
    b: &ArrayView2<Rational>,
) -> Result<(), LinalgErr> {
    if a.dim() != b.dim() {
        return Err(LinalgErr::ShapeMismatch(fname, a.dim(), b.dim()));
    }
    Ok(())
}

/// Elementwise sum.
pub fn add(a: ArrayView2<Rational>, b: ArrayView2<Rational>) -> Result<Array2<Rational>, LinalgErr> {
    check_same_shape("add", &a, &b)?;
    Ok(Zip::from(&a).and(&b).map_collect(|x, y| x + y))
}

/// Elementwise difference.
pub fn subtract(
    a: ArrayView2<Rational>,
    b: ArrayView2<Rational>,
) -> Result<Array2<Rational>, LinalgErr> {
    check_same_shape("subtract", &a, &b)?;
    Ok(Zip::from(&a).and(&b).map_collect(|x, y| x - y))
}

/// Every entry multiplied by `scalar`.
pub fn scale(a: ArrayView2<Rational>, scalar: &Rational) -> Array2<Rational> {
    a.map(|x| x * scalar)
}

/// Matrix product, by the textbook triple loop. Fails with [LinalgErr::DimensionMismatch] unless
/// the columns of `a` match the rows of `b`.
pub fn multiply(
    a: ArrayView2<Rational>,
    b: ArrayView2<Rational>,
) -> Result<Array2<Rational>, LinalgErr> {
    let (n, k) = a.dim();
    let (kb, m) = b.dim();
    if k != kb {
        return Err(LinalgErr::DimensionMismatch("multiply", k, kb));
    }
    Ok(Array2::from_shape_fn((n, m), |(i, j)| {
        let mut acc = Rational::zero();
        for l in 0..k {
            acc = acc + &a[[i, l]] * &b[[l, j]];
        }
        acc
    }))
}

/// Compress a permutation matrix to the vector whose `i`-th entry is the column of the one in row
/// `i`.
///
/// Each row is scanned left to right and the first one wins; rows are otherwise not validated.
/// A row without any one fails with [LinalgErr::NotPermutation].
pub fn compactify(p: ArrayView2<Rational>) -> Result<Array1<usize>, LinalgErr> {
    let mut compact = Array1::zeros(p.nrows());
    for (i, row) in p.axis_iter(Axis(0)).enumerate() {
        compact[i] = row
            .iter()
            .position(Rational::is_one)
            .ok_or(LinalgErr::NotPermutation("compactify"))?;
    }
    Ok(compact)
}

fn check_indices(compact: ArrayView1<usize>, bound: usize) -> Result<(), LinalgErr> {
    match compact.iter().find(|&&k| k >= bound) {
        Some(&k) => Err(LinalgErr::IndexOutOfBounds("permutation", k, bound)),
        None => Ok(()),
    }
}

/// Reorder whole rows: `new[i] = old[compact[i]]`.
pub fn permute_rows(
    a: ArrayView2<Rational>,
    compact: ArrayView1<usize>,
) -> Result<Array2<Rational>, LinalgErr> {
    check_indices(compact, a.nrows())?;
    Ok(a.select(Axis(0), &compact.to_vec()))
}

/// Reorder columns: `new[i][j] = old[i][compact[j]]`.
///
/// Applied to a `1 x n` grid holding `b`, this yields `P b` for the permutation `P` that
/// `compact` was obtained from.
pub fn permute_columns(
    a: ArrayView2<Rational>,
    compact: ArrayView1<usize>,
) -> Result<Array2<Rational>, LinalgErr> {
    check_indices(compact, a.ncols())?;
    Ok(a.select(Axis(1), &compact.to_vec()))
}

/// Reorder a vector: `new[i] = old[compact[i]]`.
pub fn permute_vector(
    b: ArrayView1<Rational>,
    compact: ArrayView1<usize>,
) -> Result<Array1<Rational>, LinalgErr> {
    check_indices(compact, b.len())?;
    Ok(compact.map(|&k| b[k].clone()))
}

// tests
