/* ************************************************************************ **
** This file is part of vcmat, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

pub type Result<T> = std::result::Result<T, CalculusError>;

/// Errors from invalid arguments.
///
/// All of them are detected before anything is written to an output buffer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum CalculusError {
    #[error("dimensions must be non-negative (got {value})")]
    NegativeDimension { value: i64 },

    #[error("vech needs at least as many rows as columns (got a {rows}x{cols} matrix)")]
    WideMatrix { rows: usize, cols: usize },

    #[error("{what} has shape {actual:?}, but {expected:?} was expected")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("expected a square matrix (got {rows}x{cols})")]
    NotSquare { rows: usize, cols: usize },

    #[error("gradient mismatch at index {index}: analytic {analytic:e}, numerical {numerical:e}")]
    GradientMismatch {
        index: usize,
        analytic: f64,
        numerical: f64,
    },

    #[error("no {points}-point stencil is available (supported: 3, 5, 7, 9)")]
    UnsupportedStencil { points: u32 },
}

impl CalculusError {
    pub(crate) fn shape_mismatch(what: &'static str, expected: &[usize], actual: &[usize]) -> Self {
        CalculusError::ShapeMismatch {
            what,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}

/// Fails with `ShapeMismatch` unless the shapes are equal.
pub(crate) fn check_shape(what: &'static str, expected: &[usize], actual: &[usize]) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(CalculusError::shape_mismatch(what, expected, actual))
    }
}
