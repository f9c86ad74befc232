/* ************************************************************************ **
** This file is part of vcmat, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Linear indices of triangular regions.

use itertools::iproduct;
use ndarray::{ArrayBase, Data, Ix2};

use crate::error::{CalculusError, Result};

/// Convert a signed dimension, rejecting negative values.
pub fn dimension(value: i64) -> Result<usize> {
    if value < 0 {
        return Err(CalculusError::NegativeDimension { value });
    }
    Ok(value as usize)
}

/// Column-major linear indices `i + j * m` of the positions of an `m x n` matrix
/// on or below the `k`-th diagonal (`j - i <= k`).
///
/// `k` defaults to `0` (the main diagonal).  Positive `k` moves the boundary up.
pub fn trilind(m: usize, n: usize, k: impl Into<Option<isize>>) -> Vec<usize> {
    let k = k.into().unwrap_or(0);
    linear_indices(m, n, |offset| offset <= k)
}

/// Column-major linear indices `i + j * m` of the positions of an `m x n` matrix
/// on or above the `k`-th diagonal (`j - i >= k`).
///
/// `k` defaults to `0` (the main diagonal).
pub fn triuind(m: usize, n: usize, k: impl Into<Option<isize>>) -> Vec<usize> {
    let k = k.into().unwrap_or(0);
    linear_indices(m, n, |offset| offset >= k)
}

/// `trilind` with the shape taken from a matrix.
pub fn trilind_for<S: Data>(a: &ArrayBase<S, Ix2>, k: impl Into<Option<isize>>) -> Vec<usize> {
    let (m, n) = a.dim();
    trilind(m, n, k)
}

/// `triuind` with the shape taken from a matrix.
pub fn triuind_for<S: Data>(a: &ArrayBase<S, Ix2>, k: impl Into<Option<isize>>) -> Vec<usize> {
    let (m, n) = a.dim();
    triuind(m, n, k)
}

// `keep` receives the diagonal offset `j - i`.
fn linear_indices(m: usize, n: usize, keep: impl Fn(isize) -> bool) -> Vec<usize> {
    iproduct!(0..n, 0..m)
        .filter(|&(j, i)| keep(j as isize - i as isize))
        .map(|(j, i)| i + j * m)
        .collect()
}

/// Positions `(i, j)` with `i >= j` of an `n x n` matrix, in `vech` order.
pub(crate) fn lower_positions(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |j| (j..n).map(move |i| (i, j)))
}
