/* ************************************************************************ **
** This file is part of vcmat, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Commutation, duplication and elimination matrices.
//!
//! The sparse constructors are the primary ones; the dense forms are their
//! realizations, so both always agree exactly.

use ndarray::{Array2, ArrayBase, Data, Ix2};
use vcmat_sparse::{CooMat, CscMat};

use crate::index::lower_positions;
use crate::vech::{vec, vech_len};
use crate::Scalar;

/// The `mn x mn` permutation `K` with `K · vec(A) = vec(Aᵗ)` for every `m x n` matrix `A`.
///
/// `n` defaults to `m`.  Exactly `mn` entries are stored.
pub fn spcommutation<T: Scalar>(m: usize, n: impl Into<Option<usize>>) -> CscMat<T> {
    let n = n.into().unwrap_or(m);
    let mn = m * n;
    trace!("building {}x{} commutation matrix for {}x{} operands", mn, mn, m, n);

    // column `i + j m` holds a single 1, in row `j + i n`
    let row = (0..mn).map(|c| (c / m) + (c % m) * n).collect();
    CscMat::from_parts((mn, mn), vec![T::one(); mn], row, (0..=mn).collect())
}

/// Dense form of [`spcommutation`].
pub fn commutation<T: Scalar>(m: usize, n: impl Into<Option<usize>>) -> Array2<T> {
    spcommutation(m, n).to_dense()
}

/// [`spcommutation`] for the shape of `a`.
pub fn spcommutation_for<T, S>(a: &ArrayBase<S, Ix2>) -> CscMat<T>
where
    T: Scalar,
    S: Data<Elem = T>,
{
    let (m, n) = a.dim();
    spcommutation(m, n)
}

/// [`commutation`] for the shape of `a`.
pub fn commutation_for<T, S>(a: &ArrayBase<S, Ix2>) -> Array2<T>
where
    T: Scalar,
    S: Data<Elem = T>,
{
    spcommutation_for(a).to_dense()
}

/// The `n² x n(n+1)/2` matrix `D` with `D · vech(A) = vec(A)` for every symmetric `A`.
pub fn spduplication<T: Scalar>(n: usize) -> CscMat<T> {
    let half = vech_len(n, n);
    trace!("building {}x{} duplication matrix", n * n, half);

    // each position maps to the vech index of its lower-triangular representative
    let mut imatrix = Array2::<usize>::zeros((n, n));
    for (index, (i, j)) in lower_positions(n).enumerate() {
        imatrix[(i, j)] = index;
        imatrix[(j, i)] = index;
    }

    let entries = vec(&imatrix).iter()
        .enumerate()
        .map(|(row, &col)| ((row, col), T::one()))
        .collect::<Vec<_>>();
    CooMat::from_iter((n * n, half), entries).into_csc()
}

/// Dense form of [`spduplication`].
pub fn duplication<T: Scalar>(n: usize) -> Array2<T> {
    spduplication(n).to_dense()
}

/// The `n(n+1)/2 x n²` selection matrix `E` with `E · vec(A) = vech(A)` for every `A`.
///
/// This is a left inverse of the duplication matrix.
pub fn spelimination<T: Scalar>(n: usize) -> CscMat<T> {
    let half = vech_len(n, n);
    trace!("building {}x{} elimination matrix", half, n * n);

    let entries = lower_positions(n)
        .enumerate()
        .map(|(row, (i, j))| ((row, i + j * n), T::one()))
        .collect::<Vec<_>>();
    CooMat::from_iter((half, n * n), entries).into_csc()
}

/// Dense form of [`spelimination`].
pub fn elimination<T: Scalar>(n: usize) -> Array2<T> {
    spelimination(n).to_dense()
}
