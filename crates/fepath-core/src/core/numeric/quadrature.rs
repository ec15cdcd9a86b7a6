/// Default absolute and relative tolerance of [`integrate`].
pub const DEFAULT_TOLERANCE: f64 = 1.49e-8;
/// Default maximum number of subintervals of [`integrate`].
pub const DEFAULT_SUBINTERVAL_LIMIT: usize = 50;

// 15-point Kronrod abscissae (positive half, descending) and weights. Odd indices are
// the 7-point Gauss abscissae.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_6,
    0.949_107_912_342_758_5,
    0.864_864_423_359_769_1,
    0.741_531_185_599_394_4,
    0.586_087_235_467_691_1,
    0.405_845_151_377_397_2,
    0.207_784_955_007_898_5,
    0.0,
];
const WGK: [f64; 8] = [
    0.022_935_322_010_529_225,
    0.063_092_092_629_978_55,
    0.104_790_010_322_250_18,
    0.140_653_259_715_525_92,
    0.169_004_726_639_267_9,
    0.190_350_578_064_785_4,
    0.204_432_940_075_298_9,
    0.209_482_141_084_727_83,
];
const WG: [f64; 4] = [
    0.129_484_966_168_869_7,
    0.279_705_391_489_276_7,
    0.381_830_050_505_118_9,
    0.417_959_183_673_469_4,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureSettings {
    pub abs_tolerance: f64,
    pub rel_tolerance: f64,
    pub max_subintervals: usize,
}

impl Default for QuadratureSettings {
    fn default() -> Self {
        Self {
            abs_tolerance: DEFAULT_TOLERANCE,
            rel_tolerance: DEFAULT_TOLERANCE,
            max_subintervals: DEFAULT_SUBINTERVAL_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureEstimate {
    pub value: f64,
    pub abs_error: f64,
    pub subintervals: usize,
    /// `false` when the subinterval limit was reached before the tolerance was met.
    pub converged: bool,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

impl Segment {
    fn new<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64) -> Self {
        let (value, error) = gauss_kronrod_15(f, a, b);
        Self { a, b, value, error }
    }
}

/// Applies the 7-point Gauss / 15-point Kronrod pair on `[a, b]`.
///
/// Returns the Kronrod estimate and the difference to the Gauss estimate as error bound.
fn gauss_kronrod_15<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64) -> (f64, f64) {
    let center = 0.5 * (a + b);
    let half_length = 0.5 * (b - a);

    let f_center = f(center);
    let mut kronrod = f_center * WGK[7];
    let mut gauss = f_center * WG[3];

    for j in 0..7 {
        let dx = half_length * XGK[j];
        let pair = f(center - dx) + f(center + dx);
        kronrod += WGK[j] * pair;
        if j % 2 == 1 {
            gauss += WG[j / 2] * pair;
        }
    }

    (kronrod * half_length, ((kronrod - gauss) * half_length).abs())
}

/// Adaptive Gauss–Kronrod quadrature of `f` over `[a, b]`.
///
/// The subinterval with the largest error estimate is bisected until the total error
/// falls below `max(abs_tolerance, rel_tolerance * |value|)` or the subinterval limit is
/// reached. `b < a` yields the negated integral over `[b, a]`.
pub fn integrate<F: Fn(f64) -> f64>(
    f: F,
    a: f64,
    b: f64,
    settings: &QuadratureSettings,
) -> QuadratureEstimate {
    if a == b {
        return QuadratureEstimate {
            value: 0.0,
            abs_error: 0.0,
            subintervals: 0,
            converged: true,
        };
    }

    let mut segments = vec![Segment::new(&f, a, b)];
    loop {
        let value: f64 = segments.iter().map(|s| s.value).sum();
        let abs_error: f64 = segments.iter().map(|s| s.error).sum();
        let tolerance = settings
            .abs_tolerance
            .max(settings.rel_tolerance * value.abs());

        let converged = abs_error <= tolerance;
        if converged || segments.len() >= settings.max_subintervals.max(1) {
            return QuadratureEstimate {
                value,
                abs_error,
                subintervals: segments.len(),
                converged,
            };
        }

        let worst = segments
            .iter()
            .enumerate()
            .max_by(|(_, s1), (_, s2)| s1.error.total_cmp(&s2.error))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let Segment { a, b, .. } = segments.swap_remove(worst);
        let mid = 0.5 * (a + b);
        segments.push(Segment::new(&f, a, mid));
        segments.push(Segment::new(&f, mid, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn quad<F: Fn(f64) -> f64>(f: F, a: f64, b: f64) -> QuadratureEstimate {
        integrate(f, a, b, &QuadratureSettings::default())
    }

    #[test]
    fn polynomials_are_integrated_exactly_in_one_pass() {
        let estimate = quad(|x| 3.0 * x * x - 2.0 * x + 1.0, -1.0, 2.0);
        assert!((estimate.value - 9.0).abs() < 1e-12);
        assert_eq!(estimate.subintervals, 1);
        assert!(estimate.converged);
    }

    #[test]
    fn integrates_sine_over_half_period() {
        let estimate = quad(f64::sin, 0.0, PI);
        assert!((estimate.value - 2.0).abs() < 1e-10);
        assert!(estimate.converged);
    }

    #[test]
    fn reversed_bounds_negate_the_result() {
        let forward = quad(f64::exp, 0.0, 1.0).value;
        let backward = quad(f64::exp, 1.0, 0.0).value;
        assert!((forward - (1f64.exp() - 1.0)).abs() < 1e-12);
        assert!((forward + backward).abs() < 1e-12);
    }

    #[test]
    fn empty_interval_is_zero() {
        let estimate = quad(f64::exp, 1.5, 1.5);
        assert_eq!(estimate.value, 0.0);
        assert_eq!(estimate.subintervals, 0);
    }

    #[test]
    fn adapts_to_a_sharp_peak() {
        // Lorentzian of half-width w centred at 0.3.
        let w: f64 = 1e-2;
        let f = |x: f64| w / ((x - 0.3).powi(2) + w * w);
        let exact = (0.7 / w).atan() + (0.3 / w).atan();
        let estimate = quad(f, 0.0, 1.0);
        assert!(estimate.subintervals > 1);
        assert!((estimate.value - exact).abs() < 1e-6);
    }

    #[test]
    fn reports_non_convergence_when_limit_is_hit() {
        let settings = QuadratureSettings {
            max_subintervals: 2,
            ..Default::default()
        };
        // Not symmetric about the midpoint, so the Gauss and Kronrod sums cannot cancel.
        let estimate = integrate(|x: f64| x.sqrt() * (40.0 * x).sin(), 0.0, 1.0, &settings);
        assert_eq!(estimate.subintervals, 2);
        assert!(!estimate.converged);
    }
}
