//! Sparse-dense matrix products.

use ndarray::{Array2, ArrayBase, Data, Ix2, LinalgScalar};

use super::multiplied_dim;
use crate::mat::CscMat;

impl<T: LinalgScalar> CscMat<T> {
    /// Compute `self · rhs` for a dense `rhs`.
    ///
    /// Each stored entry `(i, j)` adds a scaled copy of row `j` of `rhs` to
    /// row `i` of the output.
    ///
    /// # Panics
    ///
    /// Panics if `self.dim().1 != rhs.nrows()`.
    pub fn dot_dense<S>(&self, rhs: &ArrayBase<S, Ix2>) -> Array2<T>
    where
        S: Data<Elem = T>,
    {
        let (m, p) = multiplied_dim(self.dim(), rhs.dim());
        let mut out = Array2::<T>::zeros((m, p));
        for (j, col) in self.columns().enumerate() {
            let rhs_row = rhs.row(j);
            for (i, &x) in col.iter() {
                out.row_mut(i).scaled_add(x, &rhs_row);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::mat::{CooMat, CscMat};
    use ndarray::{arr2, Array2};

    fn random_sparse(dim: (usize, usize)) -> Array2<f64> {
        Array2::from_shape_fn(dim, |_| {
            if rand::random::<f64>() < 0.4 {
                rand::random::<f64>() - 0.5
            } else {
                0.0
            }
        })
    }

    #[test]
    fn matches_dense_product() {
        for &(m, n, p) in &[(0, 0, 0), (1, 1, 1), (3, 4, 2), (5, 2, 7), (4, 0, 3), (0, 3, 2)] {
            let a = random_sparse((m, n));
            let b = Array2::from_shape_fn((n, p), |_| rand::random::<f64>());
            let expected = a.dot(&b);

            let csc = CscMat::from_dense(&a);
            assert_close!(abs=1e-12, csc.dot_dense(&b), expected.clone());
            // views and transposed layouts are fine too
            assert_close!(abs=1e-12, csc.dot_dense(&b.t().t()), expected);
        }
    }

    #[test]
    fn integer_entries() {
        let perm = CooMat::from_iter((3, 3), vec![((0, 2), 1), ((1, 0), 1), ((2, 1), 1)]).into_csc();
        let x = arr2(&[[1, 2], [3, 4], [5, 6]]);
        assert_eq!(perm.dot_dense(&x), arr2(&[[5, 6], [1, 2], [3, 4]]));
        assert_eq!(CscMat::eye(3).dot_dense(&x), x);

        let empty = CscMat::from_parts((2, 3), vec![], vec![], vec![0; 4]);
        assert_eq!(empty.dot_dense(&x), Array2::<i32>::zeros((2, 2)));
    }

    #[test]
    #[should_panic(expected = "incompatible shapes")]
    fn bad_shapes() {
        let _ = CscMat::<f64>::eye(3).dot_dense(&Array2::<f64>::zeros((2, 2)));
    }
}
