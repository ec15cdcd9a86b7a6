//! Numeric kernels used by the curve fitter and the integrator.
//!
//! Every routine here works on plain slices and closures; none of them logs or touches
//! the file system.

pub mod polynomial;
pub mod quadrature;
pub mod spline;
pub mod trapezoid;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumericError {
    #[error("Input sequences differ in length ({x_len} coordinates, {y_len} values)")]
    LengthMismatch { x_len: usize, y_len: usize },

    #[error("At least {required} points are required, found {found}")]
    InsufficientPoints { required: usize, found: usize },

    #[error(
        "Coordinates must be strictly increasing and unique: x[{index}] = {current} follows {previous}"
    )]
    NotStrictlyIncreasing {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("Linear solve failed: {0}")]
    SolveFailed(String),
}

pub(crate) fn check_lengths(xs: &[f64], ys: &[f64]) -> Result<(), NumericError> {
    if xs.len() != ys.len() {
        return Err(NumericError::LengthMismatch {
            x_len: xs.len(),
            y_len: ys.len(),
        });
    }
    Ok(())
}
