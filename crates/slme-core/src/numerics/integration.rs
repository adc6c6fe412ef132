use super::KahanAccumulator;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntegrationError {
    #[error("integration requires at least 2 samples, got {actual}")]
    InsufficientPoints { actual: usize },
    #[error("integration input length mismatch: grid={grid}, values={values}")]
    LengthMismatch { grid: usize, values: usize },
    #[error("integration grid entry must be finite at index {index}, got {value}")]
    NonFiniteGrid { index: usize, value: f64 },
    #[error(
        "integration grid must be strictly increasing, index {index} has {current} after {previous}"
    )]
    NonIncreasingGrid {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("integrand must be finite at index {index}, got {value}")]
    NonFiniteIntegrand { index: usize, value: f64 },
}

/// Composite Simpson rule on an arbitrary increasing grid.
///
/// Each panel fits a parabola through three consecutive samples, so unequal
/// spacing is handled exactly for quadratics. With an odd number of
/// intervals the result is the average of two estimates: Simpson over the
/// first `n - 1` samples plus a trapezoid on the last interval, and a
/// trapezoid on the first interval plus Simpson over the last `n - 1`.
pub fn integrate_simpson(grid: &[f64], values: &[f64]) -> Result<f64, IntegrationError> {
    validate_samples(grid, values)?;

    let count = grid.len();
    let last = count - 1;
    if count == 2 {
        return Ok(trapezoid_span(grid, values, 0, 1));
    }

    if last % 2 == 0 {
        return Ok(simpson_span(grid, values, 0, last));
    }

    let leading =
        simpson_span(grid, values, 0, last - 1) + trapezoid_span(grid, values, last - 1, last);
    let trailing = trapezoid_span(grid, values, 0, 1) + simpson_span(grid, values, 1, last);
    Ok(0.5 * (leading + trailing))
}

/// Simpson sum over `[start, stop]`; `stop - start` must be even.
fn simpson_span(grid: &[f64], values: &[f64], start: usize, stop: usize) -> f64 {
    let mut sum = KahanAccumulator::default();
    let mut index = start;
    while index + 2 <= stop {
        let h0 = grid[index + 1] - grid[index];
        let h1 = grid[index + 2] - grid[index + 1];
        let span = h0 + h1;
        let ratio = h0 / h1;
        let panel = span / 6.0
            * (values[index] * (2.0 - 1.0 / ratio)
                + values[index + 1] * span * span / (h0 * h1)
                + values[index + 2] * (2.0 - ratio));
        sum.add(panel);
        index += 2;
    }
    sum.total()
}

fn trapezoid_span(grid: &[f64], values: &[f64], start: usize, stop: usize) -> f64 {
    let mut sum = KahanAccumulator::default();
    for index in start..stop {
        sum.add(0.5 * (grid[index + 1] - grid[index]) * (values[index] + values[index + 1]));
    }
    sum.total()
}

fn validate_samples(grid: &[f64], values: &[f64]) -> Result<(), IntegrationError> {
    if grid.len() != values.len() {
        return Err(IntegrationError::LengthMismatch {
            grid: grid.len(),
            values: values.len(),
        });
    }
    if grid.len() < 2 {
        return Err(IntegrationError::InsufficientPoints { actual: grid.len() });
    }

    for (index, value) in grid.iter().copied().enumerate() {
        if !value.is_finite() {
            return Err(IntegrationError::NonFiniteGrid { index, value });
        }
        if index > 0 {
            let previous = grid[index - 1];
            if value <= previous {
                return Err(IntegrationError::NonIncreasingGrid {
                    index,
                    previous,
                    current: value,
                });
            }
        }
    }

    for (index, value) in values.iter().copied().enumerate() {
        if !value.is_finite() {
            return Err(IntegrationError::NonFiniteIntegrand { index, value });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{IntegrationError, integrate_simpson};

    #[test]
    fn simpson_is_exact_for_cubics_on_uniform_grids() {
        let grid: Vec<f64> = (0..=20).map(|index| index as f64 * 0.1).collect();
        let values: Vec<f64> = grid.iter().map(|x| x * x * x - 2.0 * x + 1.0).collect();
        let actual = integrate_simpson(&grid, &values).expect("integration");
        assert_scalar_close("cubic", 2.0, actual, 1.0e-12, 1.0e-12);
    }

    #[test]
    fn simpson_is_exact_for_quadratics_on_irregular_grids() {
        let grid = [0.0, 0.3, 0.45, 1.1, 1.2, 2.0, 2.7];
        let values: Vec<f64> = grid.iter().map(|x| 3.0 * x * x - x + 0.5).collect();
        let actual = integrate_simpson(&grid, &values).expect("integration");
        let upper: f64 = 2.7;
        let expected = upper.powi(3) - 0.5 * upper * upper + 0.5 * upper;
        assert_scalar_close("irregular quadratic", expected, actual, 1.0e-12, 1.0e-12);
    }

    #[test]
    fn simpson_handles_odd_interval_counts_by_averaging() {
        let grid: Vec<f64> = (0..=9).map(|index| index as f64 * 0.25).collect();
        let values: Vec<f64> = grid.iter().map(|x| x * x).collect();
        let actual = integrate_simpson(&grid, &values).expect("integration");
        let upper: f64 = 2.25;
        assert_scalar_close("odd intervals", upper.powi(3) / 3.0, actual, 5.0e-3, 5.0e-3);
    }

    #[test]
    fn two_samples_reduce_to_trapezoid() {
        let simpson = integrate_simpson(&[1.0, 3.0], &[2.0, 4.0]).expect("integration");
        assert_eq!(simpson, 6.0);
    }

    #[test]
    fn rejects_malformed_grids() {
        assert_eq!(
            integrate_simpson(&[0.0], &[1.0]).expect_err("single sample"),
            IntegrationError::InsufficientPoints { actual: 1 }
        );
        assert_eq!(
            integrate_simpson(&[0.0, 1.0], &[1.0]).expect_err("length mismatch"),
            IntegrationError::LengthMismatch { grid: 2, values: 1 }
        );
        assert_eq!(
            integrate_simpson(&[0.0, 1.0, 1.0], &[1.0, 1.0, 1.0]).expect_err("repeated node"),
            IntegrationError::NonIncreasingGrid {
                index: 2,
                previous: 1.0,
                current: 1.0,
            }
        );
        assert!(matches!(
            integrate_simpson(&[0.0, 1.0, 2.0], &[1.0, f64::NAN, 1.0]),
            Err(IntegrationError::NonFiniteIntegrand { index: 1, .. })
        ));
    }

    fn assert_scalar_close(label: &str, expected: f64, actual: f64, abs_tol: f64, rel_tol: f64) {
        let abs_diff = (actual - expected).abs();
        let rel_diff = abs_diff / expected.abs().max(1.0);
        assert!(
            abs_diff <= abs_tol || rel_diff <= rel_tol,
            "{label} expected={expected:.15e} actual={actual:.15e} abs_diff={abs_diff:.15e} rel_diff={rel_diff:.15e}"
        );
    }
}
