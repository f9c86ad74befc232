//! Sparse matrices for building structural operators.
//!
//! Matrices are assembled in [`CooMat`] and converted to the compressed
//! [`CscMat`] before use, or built as a `CscMat` directly.  A `CscMat` can be
//! multiplied against dense `ndarray` matrices and combined by Kronecker products,
//! which is all that the calculus routines need from them.
//!
//! Violations of the formats' invariants (bad positions, mismatched shapes in a
//! product) are programmer errors and `panic!`.

#[cfg(test)]
#[macro_use]
extern crate vcmat_assert_close;

pub mod mat;
mod math;

pub use mat::{CooMat, CscMat};
