//! Exact rational linear algebra for [ndarray], ending in an LUP-based solver.
//!
//! This library never rounds. Matrix entries are arbitrary-precision fractions ([Rational]),
//! kept in lowest terms with the sign in the numerator, so every sum, product and quotient is
//! exact. On top of that sit
//!
//! - pure [grid functions](ops) for elementwise arithmetic, products and permutations,
//! - [structural predicates](properties) such as triangularity or being a permutation matrix,
//! - an immutable [Matrix] that caches those predicates and its transpose, and
//! - [forward and backward substitution](solve()) for systems `P A = L U`.
//!
//! Note that nothing here *computes* a factorization: `L`, `U` and `P` are supplied by the
//! caller, and [Lup] merely bundles them. The typical flow is to compress `P` to an index vector
//! with [ops::compactify], reorder the right-hand side with it, and hand everything to [solve()].
//!
//! Plain loops and exact arithmetic mean this is meant for small to medium problems where
//! correctness matters more than speed: verification tooling, teaching, reference results.
//!
//! ```
//! use ndarray::arr1;
//! use rational_lup::{Lup, Matrix, Rational};
//!
//! let eye = Matrix::identity(2)?;
//! let lup = Lup::new(eye.clone(), eye.scale(&Rational::half()), &eye)?;
//! let x = lup.solve(arr1(&[Rational::from(1), Rational::from(3)]).view())?;
//! assert_eq!(x, arr1(&[Rational::from(2), Rational::from(6)]));
//! # Ok::<(), rational_lup::LinalgErr>(())
//! ```

mod error;
mod matrix;
pub mod ops;
pub mod properties;
mod rational;
mod solve;

pub use error::{ErrorKind, LinalgErr};
pub use matrix::Matrix;
pub use rational::{rationalize, Rational, MAX_DECIMAL_SCALE};
pub use solve::{solve, Lup};
