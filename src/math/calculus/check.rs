/* ************************************************************************ **
** This file is part of vcmat, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Comparison of analytic gradients against finite differences.

#![allow(non_snake_case)]

use crate::error::{check_shape, CalculusError, Result};
use crate::numerical::{self, DerivativeKind};

/// Settings for checking an analytic gradient.
///
/// Every key may be omitted.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct GradientCheck {
    /// Step size for the finite differences.
    #[serde(default = "gradient_check__step")]
    pub step: f64,

    /// Number of points in the central difference stencil (3, 5, 7 or 9).
    #[serde(default = "gradient_check__stencil")]
    pub stencil: u32,

    /// An entry passes if the absolute difference is within this...
    #[serde(default = "gradient_check__abs")]
    pub abs: f64,

    /// ...or if it is within this multiple of the larger magnitude.
    #[serde(default = "gradient_check__rel")]
    pub rel: f64,
}
fn gradient_check__step() -> f64 { 1e-4 }
fn gradient_check__stencil() -> u32 { 5 }
fn gradient_check__abs() -> f64 { 1e-6 }
fn gradient_check__rel() -> f64 { 1e-5 }

impl Default for GradientCheck {
    fn default() -> Self {
        GradientCheck {
            step: gradient_check__step(),
            stencil: gradient_check__stencil(),
            abs: gradient_check__abs(),
            rel: gradient_check__rel(),
        }
    }
}

/// Outcome of a successful [`GradientCheck::check`].
#[derive(Debug, Clone, PartialEq)]
pub struct GradientReport {
    /// The finite difference gradient.
    pub numerical: Vec<f64>,
    pub max_abs_error: f64,
    /// Relative to the larger of the two magnitudes at each entry.
    pub max_rel_error: f64,
}

impl GradientCheck {
    /// Compare `analytic` against a finite difference gradient of `value_fn` at `point`.
    ///
    /// Fails with `GradientMismatch` for the first entry that is outside both
    /// tolerances.
    pub fn check(
        &self,
        point: &[f64],
        analytic: &[f64],
        value_fn: impl FnMut(&[f64]) -> f64,
    ) -> Result<GradientReport> {
        let kind = DerivativeKind::Stencil(self.stencil).validate()?;
        check_shape("analytic gradient", &[point.len()], &[analytic.len()])?;

        let numerical = numerical::gradient(self.step, Some(kind), point, value_fn);

        let mut max_abs_error = 0.0f64;
        let mut max_rel_error = 0.0f64;
        let mut first_failure = None;
        for (index, (&a, &n)) in analytic.iter().zip(&numerical).enumerate() {
            let abs_error = (a - n).abs();
            let scale = a.abs().max(n.abs());
            let rel_error = if scale == 0.0 { 0.0 } else { abs_error / scale };

            max_abs_error = max_abs_error.max(abs_error);
            max_rel_error = max_rel_error.max(rel_error);

            let passes = abs_error <= self.abs || abs_error <= self.rel * scale;
            if !passes && first_failure.is_none() {
                first_failure = Some(CalculusError::GradientMismatch { index, analytic: a, numerical: n });
            }
        }

        debug!(
            "gradient check over {} parameters: max abs error {:e}, max rel error {:e}",
            point.len(), max_abs_error, max_rel_error,
        );
        if let Some(e) = first_failure {
            return Err(e);
        }
        Ok(GradientReport { numerical, max_abs_error, max_rel_error })
    }
}
