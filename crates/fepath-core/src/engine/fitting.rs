use crate::core::numeric::polynomial::{self, Polynomial};
use crate::core::numeric::spline::CubicSpline;
use crate::core::numeric::check_lengths;
use crate::engine::config::ConfigError;
use crate::engine::error::EngineError;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitSpec {
    Polynomial { degree: usize },
    Spline,
}

/// A curve fitted to mean-force samples, callable as coordinate → value.
#[derive(Debug, Clone, PartialEq)]
pub enum FittedCurve {
    Polynomial(Polynomial),
    Spline(CubicSpline),
}

impl FittedCurve {
    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            FittedCurve::Polynomial(p) => p.evaluate(x),
            FittedCurve::Spline(s) => s.evaluate(x),
        }
    }

    pub fn sample(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}

/// Fits `(xs[i], ys[i])` with the requested curve model.
///
/// Polynomial fits accept unsorted input. Spline fits sort the pairs by coordinate first
/// and then require the coordinates to be strictly increasing; duplicates are rejected
/// rather than merged.
pub fn fit(xs: &[f64], ys: &[f64], spec: FitSpec) -> Result<FittedCurve, EngineError> {
    check_lengths(xs, ys)?;
    match spec {
        FitSpec::Polynomial { degree } => {
            if degree < 1 {
                return Err(ConfigError::InvalidParameter {
                    name: "degree",
                    reason: "polynomial degree must be >= 1".to_string(),
                }
                .into());
            }
            let poly = polynomial::least_squares(xs, ys, degree)?;
            debug!("Polynomial coefficients: {:?}", poly.coefficients());
            Ok(FittedCurve::Polynomial(poly))
        }
        FitSpec::Spline => {
            let mut pairs: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
            let (sorted_x, sorted_y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            let spline = CubicSpline::not_a_knot(&sorted_x, &sorted_y)?;
            debug!("Spline fit created over {} knot(s).", sorted_x.len());
            Ok(FittedCurve::Spline(spline))
        }
    }
}
