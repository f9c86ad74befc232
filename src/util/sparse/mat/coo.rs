//! COOrdinate-storage sparse matrices.

use std::ops::Add;

use crate::mat::CscMat;

/// A sparse format which simply stores triplets of `(row, column, value)`.
///
/// This is the format for assembling a matrix, which should then be converted
/// with [`CooMat::into_csc`].  Multiple elements may be stored at the same
/// coordinates, with the "true" value at that position being their sum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CooMat<T> {
    dim: (usize, usize),
    vec: Vec<((usize, usize), T)>,
}

impl<T> CooMat<T> {
    /// Construct from an iterator of `((row,col), value)` tuples.
    ///
    /// The positions are validated against `dim`.
    pub fn from_iter<I>(dim: (usize, usize), it: I) -> Self
    where
        I: IntoIterator<Item = ((usize, usize), T)>,
    {
        let vec = it.into_iter()
            .inspect(|&(pos, _)| {
                assert!(
                    pos.0 < dim.0 && pos.1 < dim.1,
                    "Element position {:?} invalid for dimension {:?}!", pos, dim,
                );
            })
            .collect();
        CooMat { dim, vec }
    }

    /// Get the shape tuple `(nrows, ncols)`
    #[inline(always)]
    pub fn dim(&self) -> (usize, usize) {
        self.dim
    }

    /// Number of explicitly stored elements, counting duplicates.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.vec.len()
    }

    /// Convert into CSC format, summing duplicates.
    ///
    /// Runtime complexity is `O(n log n)` with `n` being the number of explicit entries in the
    /// matrix (including duplicates), as it must sort the entries first.
    pub fn into_csc(self) -> CscMat<T>
    where
        T: Add<T, Output = T>,
    {
        let CooMat { dim, mut vec } = self;
        vec.sort_by_key(|&((r, c), _)| (c, r));
        CscMat::from_column_major_iter(dim, ReducedIter { iter: vec.into_iter().peekable() })
    }
}

// Sums runs of elements at the same position.
struct ReducedIter<T> {
    iter: std::iter::Peekable<std::vec::IntoIter<((usize, usize), T)>>,
}

impl<T> Iterator for ReducedIter<T>
where
    T: Add<T, Output = T>,
{
    type Item = ((usize, usize), T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (pos, mut val) = self.iter.next()?;
        while let Some((_, next)) = self.iter.next_if(|&(next_pos, _)| next_pos == pos) {
            val = val + next;
        }
        Some((pos, val))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        // any number of elements may be reduced together
        let (lo, hi) = self.iter.size_hint();
        (std::cmp::min(lo, 1), hi)
    }
}

//-------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr2, Array2};

    #[test]
    fn reduces_duplicates() {
        let coo = CooMat::from_iter((2, 5), vec![
            ((1, 4), 5i32),
            ((0, 2), 3),
            ((1, 2), -2),
            ((0, 4), 2),
            ((1, 2), 12),
        ]);
        assert_eq!(coo.nnz(), 5);
        assert_eq!(
            coo.into_csc(),
            CscMat::from_parts((2, 5), vec![3, 10, 2, 5], vec![0, 1, 0, 1], vec![0, 0, 0, 2, 2, 4]),
        );

        // everything collapses onto one entry
        let coo = CooMat::from_iter((5, 5), vec![((1, 2), 3i32); 5]);
        assert_eq!(coo.into_csc().nnz(), 1);
    }

    #[should_panic(expected = "invalid for dimension")]
    #[test]
    fn from_iter_bad_row() {
        CooMat::<i32>::from_iter((32, 48), vec![((32, 16), 17)]);
    }

    #[should_panic(expected = "invalid for dimension")]
    #[test]
    fn from_iter_bad_col() {
        CooMat::<i32>::from_iter((32, 48), vec![((0, 49), 17)]);
    }

    #[test]
    fn to_csc() {
        // always test size zero
        let coo = CooMat::<i32>::from_iter((0, 0), vec![]);
        assert_eq!(coo.into_csc(), CscMat::eye(0));

        // check that dimensions are assigned properly
        let csc = CooMat::<i32>::from_iter((28, 79), vec![]).into_csc();
        assert_eq!(csc.dim(), (28, 79));
        assert_eq!(csc.to_dense(), Array2::<i32>::zeros((28, 79)));

        // a full 2x2 matrix, given in row-major order
        let coo = CooMat::from_iter(
            (2, 2),
            vec![((0, 0), 5i32), ((0, 1), 2), ((1, 0), 3), ((1, 1), 4)],
        );
        assert_eq!(coo.into_csc().to_dense(), arr2(&[[5, 2], [3, 4]]));

        let coo = CooMat::from_iter((2, 2), vec![((1, 0), 1.0), ((0, 1), 3.0), ((1, 0), 0.25)]);
        assert_eq!(coo.dim(), (2, 2));
        assert_eq!(coo.into_csc().to_dense(), arr2(&[[0.0, 3.0], [1.25, 0.0]]));
    }
}
