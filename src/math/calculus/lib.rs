/* ************************************************************************ **
** This file is part of vcmat, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Matrix calculus building blocks for variance-component models.
//!
//! Everything here is a free function over `ndarray` matrices.  Linear
//! positions are 0-based and column-major (`i + j * nrows`), which is the
//! ordering used by `vec` and `vech`.  Structural operators (commutation,
//! duplication and elimination matrices) come in a sparse `CscMat` form and a
//! dense form that is its exact realization.
//!
//! Gradients may be given for a single objective (a 1-D array) or for several
//! objectives at once (one column each); see [`Objectives`].

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[cfg(test)]
#[macro_use]
extern crate vcmat_assert_close;

use std::fmt::Debug;

use ndarray::LinalgScalar;
use num_traits::Float;

pub use crate::check::{GradientCheck, GradientReport};
pub use crate::elementwise::{bump_diagonal, clamp_diagonal, kronaxpy};
pub use crate::error::{CalculusError, Result};
pub use crate::gradient::{chol_gradient, chol_gradient_into, kron_gradient, kron_gradient_into, Objectives};
pub use crate::index::{dimension, trilind, trilind_for, triuind, triuind_for};
pub use crate::structural::{
    commutation, commutation_for, duplication, elimination, spcommutation, spcommutation_for,
    spduplication, spelimination,
};
pub use crate::vech::{unvec, unvech, unvech_symmetric, vec, vech, vech_len};

mod check;
mod elementwise;
mod error;
mod gradient;
mod index;
pub mod numerical;
mod structural;
mod vech;

/// Element types accepted by the calculus routines.
pub trait Scalar: Float + LinalgScalar + Debug {}

impl<T: Float + LinalgScalar + Debug> Scalar for T {}
