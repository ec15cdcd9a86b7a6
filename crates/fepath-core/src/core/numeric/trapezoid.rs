use super::{NumericError, check_lengths};

/// Cumulative trapezoidal integral of `ys` over `xs`, taken in the given order.
///
/// The result has one entry per sample and starts at `0.0`. Coordinates are not sorted,
/// so a step backwards along `xs` contributes a negative area.
pub fn cumulative_trapezoid(xs: &[f64], ys: &[f64]) -> Result<Vec<f64>, NumericError> {
    check_lengths(xs, ys)?;
    if xs.is_empty() {
        return Ok(Vec::new());
    }

    let mut cumulative = Vec::with_capacity(xs.len());
    let mut total = 0.0;
    cumulative.push(total);
    for i in 1..xs.len() {
        total += 0.5 * (xs[i] - xs[i - 1]) * (ys[i] + ys[i - 1]);
        cumulative.push(total);
    }
    Ok(cumulative)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn linear_function_is_integrated_exactly() {
        // g(x) = 2x + 1, G(x) = x^2 + x - (x0^2 + x0)
        let xs = [0.0, 0.5, 1.25, 2.0, 3.0];
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        let cumulative = cumulative_trapezoid(&xs, &ys).unwrap();
        for (x, g) in xs.iter().zip(&cumulative) {
            assert!((g - (x * x + x)).abs() < TOLERANCE, "x={x}: {g}");
        }
    }

    #[test]
    fn starts_at_zero() {
        let cumulative = cumulative_trapezoid(&[1.0, 2.0], &[3.0, 3.0]).unwrap();
        assert_eq!(cumulative, vec![0.0, 3.0]);
    }

    #[test]
    fn steps_backwards_subtract_area() {
        let cumulative = cumulative_trapezoid(&[2.0, 1.0], &[1.0, 1.0]).unwrap();
        assert_eq!(cumulative, vec![0.0, -1.0]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(cumulative_trapezoid(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert_eq!(
            cumulative_trapezoid(&[1.0, 2.0], &[1.0]),
            Err(NumericError::LengthMismatch { x_len: 2, y_len: 1 })
        );
    }
}
