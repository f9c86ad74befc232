/* ************************************************************************ **
** This file is part of vcmat, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Chain rule through `M = X ⊗ Y` and `M = L Lᵗ`.
//!
//! `dM` is the gradient of one or more objectives with respect to `vec(M)`.
//! Each column of a 2-D `dM` is treated as a separate objective.

use ndarray::{s, Array, ArrayBase, ArrayView, ArrayView2, ArrayViewMut, ArrayViewMut2};
use ndarray::{Axis, Data, Dimension, Ix1, Ix2};
use vcmat_sparse::CscMat;

use crate::error::{check_shape, CalculusError, Result};
use crate::structural::{spcommutation, spelimination};
use crate::vech::{vec, vech_len};
use crate::Scalar;

/// Dimensionality of a gradient array: `Ix1` for a single objective, or `Ix2`
/// for one column per objective.
pub trait Objectives: Dimension {
    /// Shape of a gradient over `rows` parameters, for `count` objectives.
    fn gradient_dim(rows: usize, count: usize) -> Self;

    /// View as a matrix with one column per objective.
    fn columns<'a, T>(view: ArrayView<'a, T, Self>) -> ArrayView2<'a, T>;

    /// View as a matrix with one column per objective.
    fn columns_mut<'a, T>(view: ArrayViewMut<'a, T, Self>) -> ArrayViewMut2<'a, T>;
}

impl Objectives for Ix1 {
    fn gradient_dim(rows: usize, _: usize) -> Self {
        Ix1(rows)
    }

    fn columns<'a, T>(view: ArrayView<'a, T, Self>) -> ArrayView2<'a, T> {
        view.insert_axis(Axis(1))
    }

    fn columns_mut<'a, T>(view: ArrayViewMut<'a, T, Self>) -> ArrayViewMut2<'a, T> {
        view.insert_axis(Axis(1))
    }
}

impl Objectives for Ix2 {
    fn gradient_dim(rows: usize, count: usize) -> Self {
        Ix2(rows, count)
    }

    fn columns<'a, T>(view: ArrayView<'a, T, Self>) -> ArrayView2<'a, T> {
        view
    }

    fn columns_mut<'a, T>(view: ArrayViewMut<'a, T, Self>) -> ArrayViewMut2<'a, T> {
        view
    }
}

// Validates `dm` against its required row count and `g` against the gradient
// shape for the same number of objectives.
fn check_gradient_shapes<T, D: Objectives>(
    g: &ArrayViewMut<'_, T, D>,
    g_rows: usize,
    dm: &ArrayView<'_, T, D>,
    dm_rows: usize,
) -> Result<()> {
    let mut expected = dm.shape().to_vec();
    expected[0] = dm_rows;
    check_shape("dM", &expected, dm.shape())?;

    let count = D::columns(dm.view()).ncols();
    check_shape("gradient", D::gradient_dim(g_rows, count).slice(), g.shape())
}

/// Propagate `dM` through `M = X ⊗ Y` to a gradient with respect to `vec(X)`.
///
/// `X` is `n x q` and only its shape is needed.  `dM` has `n p q r` rows for
/// `Y: p x r`, and `g` must have `n q` rows and as many columns as `dM`.
///
/// The computation is `g = (I_{nq} ⊗ vec(Y)ᵗ) · (I_q ⊗ K_{n,r} ⊗ I_p) · dM`.
pub fn kron_gradient_into<T, D, Sy, Sm>(
    g: ArrayViewMut<'_, T, D>,
    x_dim: (usize, usize),
    y: &ArrayBase<Sy, Ix2>,
    dm: &ArrayBase<Sm, D>,
) -> Result<()>
where
    T: Scalar,
    D: Objectives,
    Sy: Data<Elem = T>,
    Sm: Data<Elem = T>,
{
    let (n, q) = x_dim;
    let (p, r) = y.dim();
    check_gradient_shapes(&g, n * q, &dm.view(), n * p * q * r)?;
    trace!("kron gradient for X: {}x{}, Y: {}x{}", n, q, p, r);

    let dm = D::columns(dm.view());
    let mut g = D::columns_mut(g);

    // reorder vec(X ⊗ Y) into vec(X) ⊗ vec(Y)
    let perm = CscMat::eye(q).kron(&spcommutation(n, r)).kron(&CscMat::eye(p));
    let reordered = perm.dot_dense(&dm);

    // then contract each block of p r rows with vec(Y)
    let vec_y = vec(y);
    let block = p * r;
    for (row, mut g_row) in g.outer_iter_mut().enumerate() {
        g_row.assign(&vec_y.dot(&reordered.slice(s![row * block..(row + 1) * block, ..])));
    }
    Ok(())
}

/// Allocating form of [`kron_gradient_into`].
pub fn kron_gradient<T, D, Sy, Sm>(
    x_dim: (usize, usize),
    y: &ArrayBase<Sy, Ix2>,
    dm: &ArrayBase<Sm, D>,
) -> Result<Array<T, D>>
where
    T: Scalar,
    D: Objectives,
    Sy: Data<Elem = T>,
    Sm: Data<Elem = T>,
{
    let count = D::columns(dm.view()).ncols();
    let mut g = Array::<T, D>::zeros(D::gradient_dim(x_dim.0 * x_dim.1, count));
    kron_gradient_into(g.view_mut(), x_dim, y, dm)?;
    Ok(g)
}

/// Propagate `dM` through `M = L Lᵗ` to a gradient with respect to `vech(L)`.
///
/// `L` is lower triangular `n x n`, `dM` has `n²` rows, and `g` must have
/// `n(n+1)/2` rows and as many columns as `dM`.
///
/// The computation is `g = E · (Lᵗ ⊗ I_n) · (dM + K_n · dM)`, with `E` the
/// elimination matrix.  Only the lower-triangular entries of `L` are free
/// parameters, so nothing is collected from the upper triangle.
///
/// This is **not** the symmetric-parameter form `Dᵗ · (Lᵗ ⊗ I_n) · (dM + K_n · dM)`
/// built with the duplication matrix `D`.  The two agree on the diagonal of `L`,
/// but at an off-diagonal `(i, j)` that form also adds the mirrored `(j, i)` term,
/// so its off-diagonal entries are not derivatives with respect to `vech(L)`.
pub fn chol_gradient_into<T, D, Sl, Sm>(
    g: ArrayViewMut<'_, T, D>,
    l: &ArrayBase<Sl, Ix2>,
    dm: &ArrayBase<Sm, D>,
) -> Result<()>
where
    T: Scalar,
    D: Objectives,
    Sl: Data<Elem = T>,
    Sm: Data<Elem = T>,
{
    let (n, cols) = l.dim();
    if n != cols {
        return Err(CalculusError::NotSquare { rows: n, cols });
    }
    check_gradient_shapes(&g, vech_len(n, n), &dm.view(), n * n)?;
    trace!("cholesky gradient for L: {}x{}", n, n);

    let dm = D::columns(dm.view());

    // L appears on both sides of L Lᵗ
    let symmetrized = &dm + &spcommutation(n, None).dot_dense(&dm);
    let by_vec_l = CscMat::from_dense(&l.t())
        .kron(&CscMat::eye(n))
        .dot_dense(&symmetrized);

    D::columns_mut(g).assign(&spelimination(n).dot_dense(&by_vec_l));
    Ok(())
}

/// Allocating form of [`chol_gradient_into`].
pub fn chol_gradient<T, D, Sl, Sm>(
    l: &ArrayBase<Sl, Ix2>,
    dm: &ArrayBase<Sm, D>,
) -> Result<Array<T, D>>
where
    T: Scalar,
    D: Objectives,
    Sl: Data<Elem = T>,
    Sm: Data<Elem = T>,
{
    let n = l.nrows();
    let count = D::columns(dm.view()).ncols();
    let mut g = Array::<T, D>::zeros(D::gradient_dim(vech_len(n, n), count));
    chol_gradient_into(g.view_mut(), l, dm)?;
    Ok(g)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical;
    use crate::vech::{unvec, unvech};
    use itertools::iproduct;
    use ndarray::{arr1, arr2, Array1, Array2};
    use rand::Rng;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn random_matrix(dim: (usize, usize)) -> Array2<f64> {
        let mut rng = rand::thread_rng();
        Array2::from_shape_fn(dim, |_| rng.gen_range(-1.0..1.0))
    }

    fn random_lower(n: usize) -> Array2<f64> {
        let mut l = random_matrix((n, n));
        for j in 0..n {
            for i in 0..j {
                l[(i, j)] = 0.0;
            }
        }
        l
    }

    // g[i + j n] = Σ_{a,b} W[i p + a, j r + b] Y[a, b], for dM = vec(W)
    fn direct_kron_gradient(x_dim: (usize, usize), y: &Array2<f64>, dm: &Array1<f64>) -> Array1<f64> {
        let (n, q) = x_dim;
        let (p, r) = y.dim();
        let w = unvec(dm, (n * p, q * r)).unwrap();
        let mut g = Array1::<f64>::zeros(n * q);
        for (i, j, a, b) in iproduct!(0..n, 0..q, 0..p, 0..r) {
            g[i + j * n] += w[(i * p + a, j * r + b)] * y[(a, b)];
        }
        g
    }

    #[test]
    fn kron_gradient_matches_contraction() {
        init_logger();
        for (n, q, p, r) in iproduct!(1..4, 1..3, 1..3, 1..4) {
            let y = random_matrix((p, r));
            let dm = Array1::from_shape_fn(n * p * q * r, |_| rand::random::<f64>() - 0.5);

            let g = kron_gradient((n, q), &y, &dm).unwrap();
            assert_eq!(g.dim(), n * q);
            assert_close!(abs=1e-12, g, direct_kron_gradient((n, q), &y, &dm));
        }
    }

    #[test]
    fn kron_gradient_degenerate() {
        // everything 1x1: the gradient is just y * dm
        let g = kron_gradient((1, 1), &arr2(&[[3.0]]), &arr1(&[2.0])).unwrap();
        assert_eq!(g, arr1(&[6.0]));

        let g = kron_gradient((1, 1), &arr2(&[[3.0]]), &arr2(&[[2.0, -1.0]])).unwrap();
        assert_eq!(g, arr2(&[[6.0, -3.0]]));
    }

    #[test]
    fn kron_gradient_columns_are_independent() {
        let (n, q, p, r) = (2, 3, 2, 2);
        let y = random_matrix((p, r));
        let dm = random_matrix((n * p * q * r, 3));

        let g = kron_gradient((n, q), &y, &dm).unwrap();
        assert_eq!(g.dim(), (n * q, 3));
        for (k, column) in dm.columns().into_iter().enumerate() {
            let single = kron_gradient((n, q), &y, &column).unwrap();
            assert_close!(abs=1e-12, g.column(k), single.view());
        }
    }

    #[test]
    fn kron_gradient_bad_shapes() {
        let y = random_matrix((2, 2));
        let dm = Array1::<f64>::zeros(15);
        assert_eq!(
            kron_gradient((2, 2), &y, &dm),
            Err(CalculusError::ShapeMismatch { what: "dM", expected: vec![16], actual: vec![15] }),
        );

        let dm = Array2::<f64>::zeros((16, 2));
        let mut g = Array2::from_elem((4, 3), 9.0);
        assert_eq!(
            kron_gradient_into(g.view_mut(), (2, 2), &y, &dm),
            Err(CalculusError::ShapeMismatch { what: "gradient", expected: vec![4, 2], actual: vec![4, 3] }),
        );
        assert!(g.iter().all(|&x| x == 9.0));
    }

    #[test]
    fn kron_gradient_by_finite_differences() {
        init_logger();
        let (n, q, p, r) = (2, 3, 3, 2);
        let x = random_matrix((n, q));
        let y = random_matrix((p, r));
        // linear objective: f(X) = <W, X ⊗ Y>
        let w = random_matrix((n * p, q * r));
        let objective = |vec_x: &[f64]| {
            let x = unvec(&Array1::from(vec_x.to_vec()), (n, q)).unwrap();
            let mut m = Array2::<f64>::zeros((n * p, q * r));
            crate::kronaxpy(&x, &y, &mut m).unwrap();
            (&m * &w).sum()
        };

        let analytic = kron_gradient((n, q), &y, &vec(&w)).unwrap();
        let numerical = numerical::gradient(1e-3, None, vec(&x).as_slice().unwrap(), objective);
        assert_close!(abs=1e-8, analytic.to_vec(), numerical);
    }

    #[test]
    fn chol_gradient_shapes() {
        for &(n, k) in &[(1, 1), (2, 3), (4, 2)] {
            let l = random_lower(n);
            let g = chol_gradient(&l, &random_matrix((n * n, k))).unwrap();
            assert_eq!(g.dim(), (n * (n + 1) / 2, k));

            let g = chol_gradient(&l, &Array1::<f64>::zeros(n * n)).unwrap();
            assert_eq!(g.dim(), n * (n + 1) / 2);
        }
    }

    #[test]
    fn chol_gradient_degenerate() {
        // M = l², dM/dl = 2 l
        let g = chol_gradient(&arr2(&[[3.0]]), &arr1(&[0.5])).unwrap();
        assert_eq!(g, arr1(&[3.0]));
    }

    #[test]
    fn chol_gradient_errors() {
        let dm = Array1::<f64>::zeros(4);
        assert_eq!(
            chol_gradient(&Array2::<f64>::zeros((2, 3)), &dm),
            Err(CalculusError::NotSquare { rows: 2, cols: 3 }),
        );
        assert_eq!(
            chol_gradient(&Array2::<f64>::zeros((3, 3)), &dm),
            Err(CalculusError::ShapeMismatch { what: "dM", expected: vec![9], actual: vec![4] }),
        );

        let mut g = Array1::<f64>::zeros(4);
        assert!(chol_gradient_into(g.view_mut(), &Array2::<f64>::eye(2), &dm).is_err());
    }

    #[test]
    fn chol_gradient_selects_lower_entries() {
        use crate::index::lower_positions;
        use crate::structural::{duplication, elimination};

        let n = 3;
        let l = random_lower(n);
        let w = random_matrix((n, n));
        let g = chol_gradient(&l, &vec(&w)).unwrap();

        // the chain rule before any selection, as an n² vector
        let full = vec(&(&w + &w.t()).dot(&l));
        assert_close!(abs=1e-12, g.clone(), elimination::<f64>(n).dot(&full));

        let folded = duplication::<f64>(n).t().dot(&full);
        for (k, (i, j)) in lower_positions(n).enumerate() {
            if i == j {
                assert_close!(abs=1e-12, g[k], folded[k]);
            } else {
                // the duplication form also picks up the mirrored entry
                assert_close!(abs=1e-12, g[k] + full[j + i * n], folded[k]);
            }
        }
    }

    #[test]
    fn chol_gradient_by_finite_differences() {
        init_logger();
        for &n in &[1, 2, 3, 4] {
            let l = random_lower(n);
            // linear objective in M: f(L) = <W, L Lᵗ>
            let w = random_matrix((n, n));
            let objective = |vech_l: &[f64]| {
                let l = unvech(&Array1::from(vech_l.to_vec()), n).unwrap();
                (&l.dot(&l.t()) * &w).sum()
            };

            let analytic = chol_gradient(&l, &vec(&w)).unwrap();
            let point = crate::vech(&l).unwrap();
            let numerical = numerical::gradient(1e-3, None, point.as_slice().unwrap(), objective);
            assert_close!(abs=1e-8, analytic.to_vec(), numerical, "n = {}", n);
        }
    }
}
