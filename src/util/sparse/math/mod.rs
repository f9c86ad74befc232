//! Arithmetic on the compressed formats.
//!
//! Shapes that are incompatible for a product are a `panic!`, in the same
//! manner as `ndarray`'s own `dot`.

mod dense;
mod kron;

#[inline]
fn multiplied_dim(dim1: (usize, usize), dim2: (usize, usize)) -> (usize, usize) {
    let (m, n1) = dim1;
    let (n2, p) = dim2;
    if n1 == n2 {
        (m, p)
    } else {
        panic!("incompatible shapes: {:?} and {:?}", dim1, dim2)
    }
}
