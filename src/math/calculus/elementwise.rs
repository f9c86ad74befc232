/* ************************************************************************ **
** This file is part of vcmat, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use ndarray::{s, ArrayBase, Data, DataMut, Ix2};

use crate::error::{check_shape, Result};
use crate::Scalar;

/// `Y += A ⊗ X`, in place.
///
/// `Y` must be `mp x nq` for `A: m x n` and `X: p x q`.  Each element of `Y`
/// receives exactly one `y + a * x`, so the result is the same as adding a
/// materialized Kronecker product.  On a shape mismatch `Y` is left untouched.
pub fn kronaxpy<T, Sa, Sx, Sy>(
    a: &ArrayBase<Sa, Ix2>,
    x: &ArrayBase<Sx, Ix2>,
    y: &mut ArrayBase<Sy, Ix2>,
) -> Result<()>
where
    T: Scalar,
    Sa: Data<Elem = T>,
    Sx: Data<Elem = T>,
    Sy: DataMut<Elem = T>,
{
    let (m, n) = a.dim();
    let (p, q) = x.dim();
    check_shape("Y", &[m * p, n * q], y.shape())?;

    for ((i, j), &aij) in a.indexed_iter() {
        y.slice_mut(s![i * p..(i + 1) * p, j * q..(j + 1) * q])
            .zip_mut_with(x, |yv, &xv| *yv = *yv + aij * xv);
    }
    Ok(())
}

/// Add `eps` to each diagonal element.
pub fn bump_diagonal<T, S>(a: &mut ArrayBase<S, Ix2>, eps: T) -> &mut ArrayBase<S, Ix2>
where
    T: Scalar,
    S: DataMut<Elem = T>,
{
    a.diag_mut().mapv_inplace(|x| x + eps);
    a
}

/// Clamp each diagonal element into `[lo, hi]`.
pub fn clamp_diagonal<T, S>(a: &mut ArrayBase<S, Ix2>, lo: T, hi: T) -> &mut ArrayBase<S, Ix2>
where
    T: Scalar,
    S: DataMut<Elem = T>,
{
    a.diag_mut().mapv_inplace(|x| x.max(lo).min(hi));
    a
}
