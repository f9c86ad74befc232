/* ************************************************************************ **
** This file is part of vcmat, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Utilities for numeric differentiation.
//!
//! These exist so that analytic gradients (such as the ones produced by
//! `kron_gradient` and `chol_gradient`) can be checked against the objective
//! they came from.  See also [`GradientCheck`](crate::GradientCheck).

use crate::error::{CalculusError, Result};

/// Approximation method for a numerical 1D derivative.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DerivativeKind {
    /// n-point central stencil. Only implemented for `n = 3, 5, 7, 9`.
    Stencil(u32),
}

impl DerivativeKind {
    /// Alias for `DerivativeKind::Stencil(3)`.
    #[allow(bad_style)]
    pub const CentralDifference: Self = DerivativeKind::Stencil(3);

    /// Fails with `UnsupportedStencil` unless the stencil is implemented.
    pub fn validate(self) -> Result<Self> {
        self.coefficients().map(|_| self)
    }

    fn coefficients(self) -> Result<(&'static [(f64, f64)], f64)> {
        match self {
            DerivativeKind::Stencil(3) => Ok((STENCIL_3, 2.0)),
            DerivativeKind::Stencil(5) => Ok((STENCIL_5, 12.0)),
            DerivativeKind::Stencil(7) => Ok((STENCIL_7, 60.0)),
            DerivativeKind::Stencil(9) => Ok((STENCIL_9, 840.0)),
            DerivativeKind::Stencil(points) => Err(CalculusError::UnsupportedStencil { points }),
        }
    }
}

// `(offset, coefficient)` pairs; the denominators (in units of the step) are
// paired with them in `DerivativeKind::coefficients`.
//
// http://www.holoborodko.com/pavel/numerical-methods/numerical-derivative/central-differences/
const STENCIL_3: &[(f64, f64)] = &[(-1.0, -1.0), (1.0, 1.0)];
const STENCIL_5: &[(f64, f64)] = &[(-2.0, 1.0), (-1.0, -8.0), (1.0, 8.0), (2.0, -1.0)];
const STENCIL_7: &[(f64, f64)] = &[
    (-3.0, -1.0), (-2.0, 9.0), (-1.0, -45.0),
    (1.0, 45.0), (2.0, -9.0), (3.0, 1.0),
];
const STENCIL_9: &[(f64, f64)] = &[
    (-4.0, 3.0), (-3.0, -32.0), (-2.0, 168.0), (-1.0, -672.0),
    (1.0, 672.0), (2.0, -168.0), (3.0, 32.0), (4.0, -3.0),
];

impl Default for DerivativeKind {
    fn default() -> DerivativeKind {
        DerivativeKind::Stencil(5)
    }
}

enum Never {}

/// Compute a numerical derivative using finite differences.
///
/// # Panics
///
/// Panics if the stencil is not implemented; use [`DerivativeKind::validate`]
/// to check beforehand.
pub fn slope(
    step: f64,
    kind: Option<DerivativeKind>,
    point: f64,
    mut value_fn: impl FnMut(f64) -> f64,
) -> f64 {
    try_slope::<Never, _>(step, kind, point, |x| Ok(value_fn(x)))
        .unwrap_or_else(|e| match e {})
}

/// `slope` for functions that can fail.
pub fn try_slope<E, F>(
    step: f64,
    kind: Option<DerivativeKind>,
    point: f64,
    mut value_fn: F,
) -> std::result::Result<f64, E>
where
    F: FnMut(f64) -> std::result::Result<f64, E>,
{
    let kind = kind.unwrap_or_default();
    let (terms, denom) = match kind.coefficients() {
        Ok(stencil) => stencil,
        Err(e) => panic!("{}", e),
    };

    let mut numer = 0.0;
    for &(offset, coeff) in terms {
        numer += coeff * value_fn(point + offset * step)?;
    }
    Ok(numer / (denom * step))
}

/// Numerically compute a gradient.
///
/// This independently performs a slope check along each individual
/// axis of the input.  The number of function calls it makes will
/// be linearly proportional to the input size.
pub fn gradient(
    step: f64,
    kind: Option<DerivativeKind>,
    point: &[f64],
    mut value_fn: impl FnMut(&[f64]) -> f64,
) -> Vec<f64> {
    try_gradient::<Never, _>(step, kind, point, |x| Ok(value_fn(x)))
        .unwrap_or_else(|e| match e {})
}

/// `gradient` for functions that can fail.
pub fn try_gradient<E, F>(
    step: f64,
    kind: Option<DerivativeKind>,
    point: &[f64],
    mut value_fn: F,
) -> std::result::Result<Vec<f64>, E>
where
    F: FnMut(&[f64]) -> std::result::Result<f64, E>,
{
    let kind = kind.unwrap_or_default();
    let mut moved = point.to_vec();
    let mut out = Vec::with_capacity(point.len());
    for (i, &center) in point.iter().enumerate() {
        let slope = try_slope(step, Some(kind), center, |x| {
            moved[i] = x;
            value_fn(&moved)
        })?;
        moved[i] = center;
        out.push(slope);
    }
    Ok(out)
}

//---------------------------------------------------------
