/* ************************************************************************ **
** This file is part of vcmat, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Column-major vectorization (`vec`) and half-vectorization (`vech`).

use ndarray::{s, Array1, Array2, ArrayBase, Data, Ix1, Ix2};
use num_traits::Zero;

use crate::error::{check_shape, CalculusError, Result};
use crate::index::lower_positions;

/// Length of `vech` for an `m x n` matrix: `(2m - n + 1) n / 2`.
///
/// # Panics
///
/// Panics if `n > m`.
pub fn vech_len(m: usize, n: usize) -> usize {
    assert!(n <= m, "vech is undefined for wide matrices ({}x{})", m, n);
    (2 * m + 1 - n) * n / 2
}

/// Stack the columns of `a`.
pub fn vec<T, S>(a: &ArrayBase<S, Ix2>) -> Array1<T>
where
    T: Clone,
    S: Data<Elem = T>,
{
    // row-major order of the transpose is column-major order of `a`
    a.t().iter().cloned().collect()
}

/// Inverse of [`vec`].
pub fn unvec<T, S>(v: &ArrayBase<S, Ix1>, dim: (usize, usize)) -> Result<Array2<T>>
where
    T: Clone,
    S: Data<Elem = T>,
{
    let (m, n) = dim;
    check_shape("vec", &[m * n], v.shape())?;
    Ok(Array2::from_shape_fn(dim, |(i, j)| v[i + j * m].clone()))
}

/// Stack the on-and-below-diagonal part of each column of `a`.
///
/// Column `j` contributes rows `j..m`.  Matrices with more columns than rows
/// are rejected.
pub fn vech<T, S>(a: &ArrayBase<S, Ix2>) -> Result<Array1<T>>
where
    T: Clone,
    S: Data<Elem = T>,
{
    let (m, n) = a.dim();
    if n > m {
        return Err(CalculusError::WideMatrix { rows: m, cols: n });
    }

    let mut out = Vec::with_capacity(vech_len(m, n));
    for j in 0..n {
        out.extend(a.slice(s![j.., j]).iter().cloned());
    }
    Ok(Array1::from(out))
}

/// Rebuild the lower-triangular `n x n` matrix whose `vech` is `v`.
pub fn unvech<T, S>(v: &ArrayBase<S, Ix1>, n: usize) -> Result<Array2<T>>
where
    T: Clone + Zero,
    S: Data<Elem = T>,
{
    check_shape("vech", &[vech_len(n, n)], v.shape())?;

    let mut out = Array2::<T>::zeros((n, n));
    for ((i, j), x) in lower_positions(n).zip(v) {
        out[(i, j)] = x.clone();
    }
    Ok(out)
}

/// Rebuild the symmetric `n x n` matrix whose `vech` is `v`.
pub fn unvech_symmetric<T, S>(v: &ArrayBase<S, Ix1>, n: usize) -> Result<Array2<T>>
where
    T: Clone + Zero,
    S: Data<Elem = T>,
{
    let mut out = unvech(v, n)?;
    for (i, j) in lower_positions(n).filter(|&(i, j)| i != j) {
        out[(j, i)] = out[(i, j)].clone();
    }
    Ok(out)
}
