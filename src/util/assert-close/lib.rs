use std::fmt;

use ndarray::{ArrayBase, Data, Dimension};

pub const DEFAULT_NONZERO_TOL: f64 = 1e-9;

#[macro_export]
macro_rules! assert_close {
    ($($t:tt)*) => {$crate::assert_close_impl!{@parsing [$($t)*] [[@rel $crate::DEFAULT_NONZERO_TOL] [@abs 0.0]]}};
}

#[macro_export]
macro_rules! debug_assert_close {
    ($($t:tt)*) => {{
        #[cfg(debug_assertions)] {
            $crate::assert_close!{$($t)*}
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! assert_close_impl {
    (@parsing [rel=$tol:expr, $($rest:tt)*] [$($assignment:tt)*]) => {
        $crate::assert_close_impl!(@parsing [$($rest)*] [$($assignment)* [@rel $tol]]);
    };
    (@parsing [abs=$tol:expr, $($rest:tt)*] [$($assignment:tt)*]) => {
        $crate::assert_close_impl!(@parsing [$($rest)*] [$($assignment)* [@abs $tol]]);
    };
    (@parsing [$a:expr, $b:expr $(,)*] $assignments:tt) => {
        $crate::assert_close_impl!(@expand $assignments [@comp $a, $b] [@fmt "not nearly equal!"])
    };
    (@parsing [$a:expr, $b:expr, $($fmt:tt)+] $assignments:tt) => {
        $crate::assert_close_impl!(@expand $assignments [@comp $a, $b] [@fmt $($fmt)+])
    };
    (@expand [$($assignment:tt)*] [@comp $a:expr, $b:expr] [@fmt $($fmt:tt)+] ) => {
        #[allow(unused_mut)]
        #[allow(unused_assignments)]
        {
            let a = $a;
            let b = $b;

            let mut abs;
            let mut rel;
            $(
                $crate::assert_close_impl!{@stmt::assign [abs, rel] $assignment}
            )*

            if let Err(e) = $crate::CheckClose::check_close(&a, &b, $crate::Tolerances { abs, rel }) {
                panic!(
                "{} (tolerances: rel={}, abs={})\n left: {:?}\nright: {:?}\n{}",
                 format!($($fmt)*), rel, abs, a, b, e);
            }
        }
    };
    (@stmt::assign [$abs:ident, $rel:ident] [@abs $tol:expr]) => { $abs = $tol; };
    (@stmt::assign [$abs:ident, $rel:ident] [@rel $tol:expr]) => { $rel = $tol; };
}

#[doc(hidden)]
#[allow(non_snake_case)]
#[inline]
pub fn __is_close(a: f64, b: f64, Tolerances { abs, rel }: Tolerances) -> bool {
    // Same definition as python's math.isclose.
    assert!(rel >= 0.0);
    assert!(abs >= 0.0);

    // catch infinities of same sign
    if a == b { return true; }

    // catch infinities of opposite sign, avoiding infinite relative tolerance
    if a.is_infinite() || b.is_infinite() { return false; }

    // case for general values and NaN.
    (a - b).abs() < abs.max(rel * a.abs()).max(rel * b.abs())
}

#[derive(Debug, Copy, Clone)]
pub struct Tolerances<T = f64> {
    pub abs: T,
    pub rel: T
}

#[derive(Debug, thiserror::Error)]
#[error("{}failed at:
  left: {:?}
 right: {:?}
   tol: {:?}", flat_index_note(.index), .values.0, .values.1, .tol)]
pub struct CheckCloseError<T: fmt::Debug = f64> {
    pub values: (T, T),
    pub tol: Tolerances<T>,
    /// Flat position of the offending element, for arrays.
    pub index: Option<usize>,
}

fn flat_index_note(index: &Option<usize>) -> String {
    match index {
        Some(index) => format!("first failure at flat index {}\n", index),
        None => String::new(),
    }
}

pub trait CheckClose<Rhs: ?Sized = Self> {
    type Scalar: fmt::Debug;

    /// Test that all values of self and other are close.
    fn check_close(&self, other: &Rhs, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>;
}

impl CheckClose for f64 {
    type Scalar = f64;

    #[inline]
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    {
        if __is_close(*self, *other, tol) {
            Ok(())
        } else {
            Err(CheckCloseError {
                values: (*self, *other),
                tol,
                index: None,
            })
        }
    }
}

impl<'a, T: ?Sized + CheckClose> CheckClose for &'a T {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    { CheckClose::check_close(*self, *other, tol) }
}

/// Compares elementwise, reporting the flat index of the first failure.
fn check_close_iter<'a, 'b, T, I, J>(a: I, b: J, tol: Tolerances) -> Result<(), CheckCloseError<T::Scalar>>
where
    T: CheckClose + 'a + 'b,
    I: IntoIterator<Item = &'a T>,
    J: IntoIterator<Item = &'b T>,
{
    for (index, (x, y)) in a.into_iter().zip(b).enumerate() {
        x.check_close(y, tol).map_err(|e| CheckCloseError { index: Some(index), ..e })?;
    }
    Ok(())
}

impl<T: CheckClose> CheckClose for [T] {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    {
        assert_eq!(self.len(), other.len());
        check_close_iter(self, other, tol)
    }
}

impl<T: CheckClose> CheckClose for Vec<T> {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    { (&self[..]).check_close(&other[..], tol) }
}

impl<T: CheckClose> CheckClose<[T]> for Vec<T> {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &[T], tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    { (&self[..]).check_close(other, tol) }
}

impl<T: CheckClose, const N: usize> CheckClose for [T; N] {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    { (&self[..]).check_close(&other[..], tol) }
}

// Arrays of any dimension and storage.  Shapes must match exactly; the memory
// layout of the two operands is irrelevant since comparison is in logical order.
impl<A, S, D> CheckClose for ArrayBase<S, D>
where
    A: CheckClose,
    S: Data<Elem = A>,
    D: Dimension,
{
    type Scalar = A::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    {
        assert_eq!(self.shape(), other.shape(), "shape mismatch in check_close");
        check_close_iter(self.iter(), other.iter(), tol)
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use ndarray::{arr1, arr2, Array2, ShapeBuilder};

    #[test]
    fn macro_output_can_compile() {
        assert_close!(1.0, 1.0);
        assert_close!(abs=1e-8, 1.0, 1.0);
        assert_close!(rel=1e-8, abs=1e-8, 1.0, 1.0);
        assert_close!(1.0, 1.0,);
        assert_close!(abs=1e-8, 1.0, 1.0,);
        assert_close!(rel=1e-8, abs=1e-8, 1.0, 1.0,);
    }

    #[test]
    fn bad_parse_regression() {
        #[derive(Debug)] struct S;
        impl S { fn x(self) -> S { self } }
        impl crate::CheckClose for S {
            type Scalar = f64;
            fn check_close(&self, _: &S, _: crate::Tolerances) -> Result<(), crate::CheckCloseError<Self::Scalar>> { Ok(()) }
        }
        assert_close!(
            abs=1e-10,
            S.x().x().x(),
            S.x().x().x(),
        );
        debug_assert_close!(
            abs=1e-10,
            S.x().x().x(),
            S.x().x().x(),
        );
        assert_close!(
            abs=1e-10,
            S.x().x().x(),
            S.x().x().x(),
            "{}", "hello",
        );
    }

    #[test]
    #[should_panic]
    fn not_close() {
        assert_close!(abs=0.0, rel=0.0, 1.0, 1.1);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic)]
    fn debug_not_close() {
        debug_assert_close!(abs=0.0, rel=0.0, 1.0, 1.1);
    }

    #[test]
    fn arrays() {
        assert_close!(abs=1e-12, arr1(&[1.0, 2.0]), arr1(&[1.0, 2.0 + 1e-13]));

        // memory order must not matter
        let c_order = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        let f_order = Array2::from_shape_vec((2, 2).f(), vec![1.0, 3.0, 2.0, 4.0]).unwrap();
        assert_close!(abs=0.0, rel=0.0, c_order.view(), f_order.view());
        assert_close!(abs=0.0, rel=0.0, c_order, f_order);
    }

    #[test]
    fn array_failure_reports_index() {
        use crate::{CheckClose, Tolerances};

        let a = arr1(&[1.0, 2.0, 3.0]);
        let b = arr1(&[1.0, 2.0, 3.5]);
        let err = a.check_close(&b, Tolerances { abs: 1e-3, rel: 0.0 }).unwrap_err();
        assert_eq!(err.index, Some(2));
        assert_eq!(err.values, (3.0, 3.5));
        assert!(err.to_string().starts_with("first failure at flat index 2\nfailed at:"));
    }

    #[test]
    fn error_message() {
        use crate::{CheckClose, Tolerances};

        let err = 1.0_f64.check_close(&1.5, Tolerances { abs: 0.25, rel: 0.0 }).unwrap_err();
        assert_eq!(err.index, None);
        assert_eq!(
            err.to_string(),
            "failed at:\n  left: 1.0\n right: 1.5\n   tol: Tolerances { abs: 0.25, rel: 0.0 }",
        );

        // usable as a boxed error
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.to_string().contains("right: 1.5"));
    }

    #[test]
    #[should_panic(expected = "shape mismatch")]
    fn array_shape_mismatch() {
        assert_close!(arr2(&[[1.0, 2.0]]), arr2(&[[1.0], [2.0]]));
    }
}
