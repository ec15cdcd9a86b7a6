use super::{NumericError, check_lengths};
use nalgebra::{DMatrix, DVector};

/// Cubic interpolating spline with the not-a-knot end condition.
///
/// The spline is stored through its knot values and second derivatives. Two knots give a
/// straight line and three knots give the interpolating parabola, which is what the
/// not-a-knot condition degenerates to in those cases. Outside the knot range the end
/// segments' cubics are extrapolated.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    knots: Vec<f64>,
    values: Vec<f64>,
    second_derivatives: Vec<f64>,
}

impl CubicSpline {
    /// Builds a spline through `(xs[i], ys[i])`.
    ///
    /// # Errors
    ///
    /// `xs` must be strictly increasing; a repeated or decreasing coordinate yields
    /// [`NumericError::NotStrictlyIncreasing`]. At least two knots are required.
    pub fn not_a_knot(xs: &[f64], ys: &[f64]) -> Result<Self, NumericError> {
        check_lengths(xs, ys)?;
        if xs.len() < 2 {
            return Err(NumericError::InsufficientPoints {
                required: 2,
                found: xs.len(),
            });
        }
        for (i, pair) in xs.windows(2).enumerate() {
            if pair[1] - pair[0] <= 0.0 || pair[1].is_nan() || pair[0].is_nan() {
                return Err(NumericError::NotStrictlyIncreasing {
                    index: i + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }

        let second_derivatives = match xs.len() {
            2 => vec![0.0; 2],
            3 => {
                let h0 = xs[1] - xs[0];
                let h1 = xs[2] - xs[1];
                let d0 = (ys[1] - ys[0]) / h0;
                let d1 = (ys[2] - ys[1]) / h1;
                vec![2.0 * (d1 - d0) / (h0 + h1); 3]
            }
            _ => Self::solve_second_derivatives(xs, ys)?,
        };

        Ok(Self {
            knots: xs.to_vec(),
            values: ys.to_vec(),
            second_derivatives,
        })
    }

    fn solve_second_derivatives(xs: &[f64], ys: &[f64]) -> Result<Vec<f64>, NumericError> {
        let n = xs.len();
        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let slopes: Vec<f64> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

        let mut system = DMatrix::<f64>::zeros(n, n);
        let mut rhs = DVector::<f64>::zeros(n);

        // Continuous third derivative across the second knot.
        system[(0, 0)] = h[1];
        system[(0, 1)] = -(h[0] + h[1]);
        system[(0, 2)] = h[0];

        for i in 1..n - 1 {
            system[(i, i - 1)] = h[i - 1];
            system[(i, i)] = 2.0 * (h[i - 1] + h[i]);
            system[(i, i + 1)] = h[i];
            rhs[i] = 6.0 * (slopes[i] - slopes[i - 1]);
        }

        // Continuous third derivative across the second-to-last knot.
        system[(n - 1, n - 3)] = h[n - 2];
        system[(n - 1, n - 2)] = -(h[n - 3] + h[n - 2]);
        system[(n - 1, n - 1)] = h[n - 3];

        let solution = system
            .lu()
            .solve(&rhs)
            .ok_or_else(|| NumericError::SolveFailed("singular spline system".into()))?;
        Ok(solution.iter().copied().collect())
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let xin = &self.knots;
        let hi = match xin.partition_point(|&v| v < x) {
            i if i >= xin.len() => xin.len() - 1,
            0 => 1,
            i => i,
        };
        let lo = hi - 1;

        let diff = xin[hi] - xin[lo];
        let a = (xin[hi] - x) / diff;
        let b = (x - xin[lo]) / diff;

        a * self.values[lo]
            + b * self.values[hi]
            + (diff * diff / 6.0)
                * ((a * a - 1.0) * a * self.second_derivatives[lo]
                    + (b * b - 1.0) * b * self.second_derivatives[hi])
    }
}
