use super::{NumericError, check_lengths};
use nalgebra::{DMatrix, DVector};

/// A polynomial with coefficients stored from the highest degree down to the constant term.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// Builds a polynomial from coefficients ordered highest degree first.
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluates the polynomial at `x` with Horner's scheme.
    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
    }
}

/// Least-squares polynomial fit of the given degree.
///
/// The Vandermonde columns are scaled to unit norm before an SVD solve, and singular
/// values below `len(xs) * EPSILON` relative to the largest one are discarded.
///
/// # Errors
///
/// Returns [`NumericError::InsufficientPoints`] when fewer than `degree + 1` samples are
/// given, and [`NumericError::SolveFailed`] when the system cannot be solved.
pub fn least_squares(xs: &[f64], ys: &[f64], degree: usize) -> Result<Polynomial, NumericError> {
    check_lengths(xs, ys)?;
    let n_coeffs = degree + 1;
    if xs.len() < n_coeffs {
        return Err(NumericError::InsufficientPoints {
            required: n_coeffs,
            found: xs.len(),
        });
    }

    let mut vandermonde =
        DMatrix::from_fn(xs.len(), n_coeffs, |i, j| xs[i].powi((degree - j) as i32));
    let scales: Vec<f64> = vandermonde
        .column_iter()
        .map(|col| {
            let norm = col.norm();
            if norm > 0.0 { norm } else { 1.0 }
        })
        .collect();
    for (j, scale) in scales.iter().enumerate() {
        vandermonde.column_mut(j).unscale_mut(*scale);
    }

    let rhs = DVector::from_column_slice(ys);
    let svd = vandermonde.svd(true, true);
    let cutoff = svd.singular_values.max() * xs.len() as f64 * f64::EPSILON;
    let solution = svd
        .solve(&rhs, cutoff)
        .map_err(|e| NumericError::SolveFailed(e.to_string()))?;

    let coefficients: Vec<f64> = solution
        .iter()
        .zip(&scales)
        .map(|(c, scale)| c / scale)
        .collect();
    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(NumericError::SolveFailed(
            "polynomial coefficients are not finite".into(),
        ));
    }
    Ok(Polynomial::new(coefficients))
}
