//! Matrix calculus building blocks for variance-component models.
//!
//! The functions live in `vcmat-calculus` and are re-exported here; the sparse
//! matrix types that the structural constructors return are available under
//! [`sparse`].

pub use vcmat_calculus::*;

pub use vcmat_sparse as sparse;
