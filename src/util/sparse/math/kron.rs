//! Kronecker products of sparse matrices.

use std::ops::Mul;

use crate::mat::CscMat;

impl<T> CscMat<T>
where
    T: Clone + Mul<T, Output = T>,
{
    /// Kronecker product `self ⊗ other`.
    ///
    /// Entry `(i, j)` of `self` scales a copy of `other` placed with its top left
    /// corner at `(i * p, j * q)`, where `(p, q) = other.dim()`.  Only products of
    /// explicitly stored entries are stored in the output.
    pub fn kron(&self, other: &CscMat<T>) -> CscMat<T> {
        let (m, n) = self.dim();
        let (p, q) = other.dim();

        // Visit output columns in order; within a column, the rows `i * p + a`
        // increase with `i` and then `a`, so no sorting is needed.
        let mut entries = Vec::with_capacity(self.nnz() * other.nnz());
        for (j, a_col) in self.columns().enumerate() {
            for (b, b_col) in other.columns().enumerate() {
                let col = j * q + b;
                for (i, x) in a_col.iter() {
                    for (a, y) in b_col.iter() {
                        entries.push(((i * p + a, col), x.clone() * y.clone()));
                    }
                }
            }
        }
        CscMat::from_column_major_iter((m * p, n * q), entries)
    }
}
