//! Compressed Sparse Column (CSC) matrices.

use ndarray::{Array2, ArrayBase, Data, Ix2};
use num_traits::{One, Zero};

/// Compressed storage of the major lanes of a matrix.
///
/// Only ever used as the transpose of a [`CscMat`], so that its "rows" are the
/// columns of the public matrix.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct CsrMat<T> {
    dim: (usize, usize),
    val: Vec<T>,
    idx: Vec<usize>,
    ptr: Vec<usize>, // "insertion indices" between rows
}

/// A matrix in Compressed Sparse Column (CSC) format.
#[derive(Clone, PartialEq, Eq, Debug)]
#[allow(non_snake_case)]
pub struct CscMat<T> {
    T: CsrMat<T>, // the transpose, in CSR
}

impl<T> CsrMat<T> {
    // Panics unless the parts describe a valid matrix.  O(nnz).
    fn validated(self) -> Self {
        {
            let CsrMat { dim, val, idx, ptr } = &self;

            // ptr is a sorted list of lane endpoints, of length nrows + 1
            assert_eq!(ptr.len(), dim.0 + 1, "lane pointers do not match the dimension");
            assert!(ptr[0] == 0 && ptr[dim.0] == idx.len(), "lane pointers do not span the data");
            assert!(ptr.windows(2).all(|w| w[0] <= w[1]), "lane pointers are not sorted");

            // within each lane, positions are strictly increasing and in range
            assert_eq!(idx.len(), val.len());
            for w in ptr.windows(2) {
                let lane = &idx[w[0]..w[1]];
                assert!(lane.windows(2).all(|p| p[0] < p[1]), "positions in a lane must be strictly increasing");
                assert!(lane.iter().all(|&k| k < dim.1), "position out of range for dimension {:?}", dim);
            }
        }
        self
    }

    fn from_row_major_iter<I>(dim: (usize, usize), iter: I) -> Self
    where
        I: IntoIterator<Item = ((usize, usize), T)>,
    {
        let iter = iter.into_iter();
        let cap = iter.size_hint().0;
        let mut val = Vec::with_capacity(cap);
        let mut idx = Vec::with_capacity(cap);
        let mut ptr = Vec::with_capacity(dim.0 + 1);
        ptr.push(0);

        for ((row, col), x) in iter {
            assert!(row < dim.0, "row {} out of range for dimension {:?}", row, dim);
            assert!(row + 1 >= ptr.len(), "elements are not in major order");
            // close the previous row and any empty rows in between
            while ptr.len() <= row {
                ptr.push(idx.len())
            }
            idx.push(col);
            val.push(x);
        }
        while ptr.len() <= dim.0 {
            ptr.push(idx.len())
        }

        CsrMat { dim, val, idx, ptr }.validated()
    }

    fn rows(&self) -> Lanes<'_, T> {
        Lanes {
            val: &self.val,
            idx: &self.idx,
            ptr_windows: self.ptr.windows(2),
        }
    }
}

impl<T> CscMat<T> {
    /// Build a CSC matrix from its components, which are:
    ///
    ///  * `dim`: A tuple `(nrows, ncols)`
    ///  * `val`: A vector of explicit values stored in the matrix, ordered by column then row.
    ///  * `row`: The row of each value in `val`.
    ///  * `ptr`: A list of indices for the endpoints of each column. That is, column `j` consists
    ///           of the elements from `val` and `row` in the range `ptr[j]..ptr[j+1]`.  It must
    ///           contain `ncols+1` elements, starting with `0` and ending in `val.len()`.
    ///
    /// This validates all of the invariants, with O(`val.len()`) total complexity.
    pub fn from_parts(dim: (usize, usize), val: Vec<T>, row: Vec<usize>, ptr: Vec<usize>) -> Self {
        let (nrows, ncols) = dim;
        CscMat { T: CsrMat { dim: (ncols, nrows), val, idx: row, ptr }.validated() }
    }

    /// Build from an iterator of `((row,col), value)`.
    ///
    /// The iterator must satisfy the following:
    ///
    /// * Elements are sorted by column, then row.
    /// * No `(row,col)` position is specified twice.
    /// * `row < dim.0`, `col < dim.1`
    pub fn from_column_major_iter<I>(dim: (usize, usize), iter: I) -> Self
    where
        I: IntoIterator<Item = ((usize, usize), T)>,
    {
        let transposed = iter.into_iter().map(|((r, c), x)| ((c, r), x));
        CscMat { T: CsrMat::from_row_major_iter((dim.1, dim.0), transposed) }
    }

    /// Collect the nonzero elements of a dense matrix.
    pub fn from_dense<S>(dense: &ArrayBase<S, Ix2>) -> Self
    where
        S: Data<Elem = T>,
        T: Clone + Zero,
    {
        let (nrows, ncols) = dense.dim();
        let entries = dense.t().indexed_iter()
            .filter(|(_, x)| !x.is_zero())
            .map(|((c, r), x)| ((r, c), x.clone()))
            .collect::<Vec<_>>();
        CscMat::from_column_major_iter((nrows, ncols), entries)
    }

    /// The `n x n` identity.
    pub fn eye(n: usize) -> Self
    where
        T: One + Clone,
    {
        CscMat::from_parts((n, n), vec![T::one(); n], (0..n).collect(), (0..=n).collect())
    }

    /// Get the shape tuple `(nrows, ncols)`
    #[inline(always)]
    pub fn dim(&self) -> (usize, usize) {
        (self.T.dim.1, self.T.dim.0)
    }

    /// Get the number of explicitly-stored elements.
    #[inline(always)]
    pub fn nnz(&self) -> usize {
        self.T.val.len()
    }

    #[inline(always)]
    pub(crate) fn columns(&self) -> Lanes<'_, T> {
        self.T.rows()
    }

    /// Realize as a dense matrix.
    pub fn to_dense(&self) -> Array2<T>
    where
        T: Clone + Zero,
    {
        let mut out = Array2::<T>::zeros(self.dim());
        for (j, col) in self.columns().enumerate() {
            for (i, x) in col.iter() {
                out[(i, j)] = x.clone();
            }
        }
        out
    }
}

//-------------------------------------------------

/// A single column of a `CscMat`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Lane<'a, T> {
    idx: &'a [usize],
    val: &'a [T],
}

impl<'a, T> Lane<'a, T> {
    /// Iterate over `(position, &value)`.
    #[inline]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, &'a T)> + 'a {
        self.idx.iter().cloned().zip(self.val)
    }
}

#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
#[derive(Clone)]
pub(crate) struct Lanes<'a, T> {
    val: &'a [T],
    idx: &'a [usize],
    ptr_windows: std::slice::Windows<'a, usize>,
}

impl<'a, T> Iterator for Lanes<'a, T> {
    type Item = Lane<'a, T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let win = self.ptr_windows.next()?;
        Some(Lane {
            idx: &self.idx[win[0]..win[1]],
            val: &self.val[win[0]..win[1]],
        })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ptr_windows.size_hint()
    }
}

impl<'a, T> ExactSizeIterator for Lanes<'a, T> {}

//-------------------------------------------------
