use crate::core::models::dataset::{MIN_DATA_POINTS, coordinate_range};
use crate::core::models::profile::IntegralProfile;
use crate::core::numeric::quadrature::{self, QuadratureSettings};
use crate::core::numeric::trapezoid::cumulative_trapezoid;
use crate::engine::config::ConfigError;
use crate::engine::error::EngineError;
use crate::engine::fitting::FittedCurve;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Number of evenly spaced points used by [`SamplingMode::Dense`].
pub const DENSE_GRID_POINTS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationMethod {
    /// Adaptive quadrature of the fitted curve between consecutive sample points.
    Quad,
    /// Trapezoidal rule on the curve evaluated at the sample points.
    Trapezoid,
}

impl FromStr for IntegrationMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quad" | "q" => Ok(IntegrationMethod::Quad),
            "trapezoid" | "t" => Ok(IntegrationMethod::Trapezoid),
            _ => Err(ConfigError::InvalidArgument {
                name: "integration method",
                value: s.to_string(),
                expected: "'quad' (q) or 'trapezoid' (t)",
            }),
        }
    }
}

impl fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrationMethod::Quad => f.write_str("quad"),
            IntegrationMethod::Trapezoid => f.write_str("trapezoid"),
        }
    }
}

/// Where the fitted curve is sampled for integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingMode {
    /// [`DENSE_GRID_POINTS`] evenly spaced points over the coordinate range.
    Dense,
    /// The original sample coordinates, in file order.
    SamplePoints,
}

impl SamplingMode {
    pub fn from_dense(dense: bool) -> Self {
        if dense {
            SamplingMode::Dense
        } else {
            SamplingMode::SamplePoints
        }
    }

    /// Short tag used in output file names.
    pub fn tag(&self) -> &'static str {
        match self {
            SamplingMode::Dense => "dense",
            SamplingMode::SamplePoints => "rval",
        }
    }
}

/// `count` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            values[count - 1] = end;
            values
        }
    }
}

/// Coordinates at which the curve is integrated for the given sampling mode.
pub fn sample_points(xs: &[f64], sampling: SamplingMode) -> Vec<f64> {
    match sampling {
        SamplingMode::Dense => match coordinate_range(xs.iter().copied()) {
            Some((lo, hi)) => linspace(lo, hi, DENSE_GRID_POINTS),
            None => Vec::new(),
        },
        SamplingMode::SamplePoints => xs.to_vec(),
    }
}

fn ensure_enough_points(xs: &[f64]) -> Result<(), EngineError> {
    if xs.len() < MIN_DATA_POINTS {
        return Err(EngineError::InsufficientData {
            found: xs.len(),
            required: MIN_DATA_POINTS,
        });
    }
    Ok(())
}

/// Cumulative integral of a fitted curve, starting at `0.0` on the first sample point.
///
/// The result is not normalized.
pub fn integrate_curve(
    curve: &FittedCurve,
    xs: &[f64],
    method: IntegrationMethod,
    sampling: SamplingMode,
) -> Result<IntegralProfile, EngineError> {
    ensure_enough_points(xs)?;
    let points = sample_points(xs, sampling);
    debug!(
        "Integrating with {} over {} {} point(s).",
        method,
        points.len(),
        sampling.tag()
    );

    let cumulative = match method {
        IntegrationMethod::Quad => {
            let settings = QuadratureSettings::default();
            let mut cumulative = Vec::with_capacity(points.len());
            let mut total = 0.0;
            cumulative.push(total);
            for pair in points.windows(2) {
                let estimate = quadrature::integrate(|x| curve.evaluate(x), pair[0], pair[1], &settings);
                if !estimate.converged {
                    warn!(
                        "Quadrature on [{:.4}, {:.4}] stopped after {} subintervals (estimated error {:.2e}).",
                        pair[0], pair[1], estimate.subintervals, estimate.abs_error
                    );
                }
                total += estimate.value;
                cumulative.push(total);
            }
            cumulative
        }
        IntegrationMethod::Trapezoid => {
            let ys = curve.sample(&points);
            cumulative_trapezoid(&points, &ys)?
        }
    };

    Ok(IntegralProfile::from_parts(&points, &cumulative))
}

/// Cumulative trapezoidal integral of the samples themselves, in the given order.
///
/// The result is not normalized.
pub fn integrate_samples(xs: &[f64], ys: &[f64]) -> Result<IntegralProfile, EngineError> {
    ensure_enough_points(xs)?;
    let cumulative = cumulative_trapezoid(xs, ys)?;
    Ok(IntegralProfile::from_parts(xs, &cumulative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::numeric::NumericError;
    use crate::core::numeric::polynomial::Polynomial;

    const TOLERANCE: f64 = 1e-9;

    fn line(slope: f64, intercept: f64) -> FittedCurve {
        FittedCurve::Polynomial(Polynomial::new(vec![slope, intercept]))
    }

    #[test]
    fn method_names_and_aliases_parse() {
        assert_eq!("quad".parse::<IntegrationMethod>(), Ok(IntegrationMethod::Quad));
        assert_eq!("Q".parse::<IntegrationMethod>(), Ok(IntegrationMethod::Quad));
        assert_eq!(" trapezoid".parse::<IntegrationMethod>(), Ok(IntegrationMethod::Trapezoid));
        assert_eq!("t".parse::<IntegrationMethod>(), Ok(IntegrationMethod::Trapezoid));
    }

    #[test]
    fn unknown_method_is_an_invalid_argument() {
        let err = "simpson".parse::<IntegrationMethod>().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidArgument {
                name: "integration method",
                ..
            }
        ));
    }

    #[test]
    fn linspace_includes_both_ends() {
        let values = linspace(1.0, 2.0, 5);
        assert_eq!(values, vec![1.0, 1.25, 1.5, 1.75, 2.0]);
        assert_eq!(linspace(3.0, 4.0, 1), vec![3.0]);
        assert!(linspace(3.0, 4.0, 0).is_empty());
    }

    #[test]
    fn dense_sampling_spans_the_coordinate_range() {
        let points = sample_points(&[2.0, 1.0, 3.0], SamplingMode::Dense);
        assert_eq!(points.len(), DENSE_GRID_POINTS);
        assert_eq!(points[0], 1.0);
        assert_eq!(points[DENSE_GRID_POINTS - 1], 3.0);
    }

    #[test]
    fn sample_point_mode_keeps_file_order() {
        assert_eq!(
            sample_points(&[2.0, 1.0, 3.0], SamplingMode::SamplePoints),
            vec![2.0, 1.0, 3.0]
        );
    }

    #[test]
    fn quad_on_sample_points_matches_the_antiderivative() {
        // g(x) = 2x, G(x) - G(x0) = x^2 - x0^2
        let xs = [1.0, 1.5, 2.5, 3.0];
        let profile = integrate_curve(&line(2.0, 0.0), &xs, IntegrationMethod::Quad, SamplingMode::SamplePoints).unwrap();
        assert_eq!(profile.len(), 4);
        for p in profile.iter() {
            assert!((p.value - (p.coordinate * p.coordinate - 1.0)).abs() < TOLERANCE);
        }
    }

    #[test]
    fn dense_trapezoid_is_exact_for_linear_curves() {
        let profile = integrate_curve(&line(-1.0, 4.0), &[0.0, 2.0], IntegrationMethod::Trapezoid, SamplingMode::Dense).unwrap();
        assert_eq!(profile.len(), DENSE_GRID_POINTS);
        let last = profile.points()[DENSE_GRID_POINTS - 1];
        assert_eq!(last.coordinate, 2.0);
        assert!((last.value - 6.0).abs() < TOLERANCE);
        assert_eq!(profile.points()[0].value, 0.0);
    }

    #[test]
    fn quad_and_trapezoid_agree_on_dense_grids() {
        let curve = FittedCurve::Polynomial(Polynomial::new(vec![1.0, -2.0, 0.5, 1.0]));
        let xs = [0.0, 0.4, 1.1, 2.0];
        let quad = integrate_curve(&curve, &xs, IntegrationMethod::Quad, SamplingMode::Dense).unwrap();
        let trap = integrate_curve(&curve, &xs, IntegrationMethod::Trapezoid, SamplingMode::Dense).unwrap();
        let q = quad.points().last().unwrap().value;
        let t = trap.points().last().unwrap().value;
        assert!((q - t).abs() < 1e-4, "quad {q} vs trapezoid {t}");
    }

    #[test]
    fn raw_samples_are_integrated_in_file_order() {
        // g(x) = 3 - x sampled out of order.
        let xs = [0.0, 2.0, 1.0, 3.0];
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 - x).collect();
        let profile = integrate_samples(&xs, &ys).unwrap();
        let expected = |x: f64| 3.0 * x - 0.5 * x * x;
        for p in profile.iter() {
            assert!((p.value - expected(p.coordinate)).abs() < TOLERANCE);
        }
    }

    #[test]
    fn fewer_than_two_points_is_insufficient_data() {
        assert!(matches!(
            integrate_samples(&[1.0], &[1.0]),
            Err(EngineError::InsufficientData { found: 1, required: 2 })
        ));
        assert!(matches!(
            integrate_curve(&line(1.0, 0.0), &[], IntegrationMethod::Quad, SamplingMode::Dense),
            Err(EngineError::InsufficientData { found: 0, .. })
        ));
    }

    #[test]
    fn mismatched_raw_lengths_surface_numeric_errors() {
        assert!(matches!(
            integrate_samples(&[1.0, 2.0], &[1.0]),
            Err(EngineError::Numeric {
                source: NumericError::LengthMismatch { .. }
            })
        ));
    }
}
