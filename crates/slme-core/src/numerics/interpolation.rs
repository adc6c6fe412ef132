//! Interpolation on tabulated spectra.
//!
//! Both interpolants clamp outside the tabulated range: queries below the
//! first node return the first value and queries above the last node return
//! the last value.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InterpolationError {
    #[error("interpolation requires at least {required} nodes, got {actual}")]
    InsufficientPoints { required: usize, actual: usize },
    #[error("interpolation input length mismatch: nodes={nodes}, values={values}")]
    LengthMismatch { nodes: usize, values: usize },
    #[error("interpolation node must be finite at index {index}, got {value}")]
    NonFiniteNode { index: usize, value: f64 },
    #[error(
        "interpolation nodes must be strictly increasing, index {index} has {current} after {previous}"
    )]
    NonIncreasingNodes {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("interpolation value must be finite at index {index}, got {value}")]
    NonFiniteValue { index: usize, value: f64 },
    #[error("interpolation query must be finite, got {value}")]
    NonFiniteQuery { value: f64 },
}

/// Linear interpolation with boundary clamping.
pub fn interpolate_linear(
    nodes: &[f64],
    values: &[f64],
    query: f64,
) -> Result<f64, InterpolationError> {
    validate_nodes(nodes, values, 1)?;
    if !query.is_finite() {
        return Err(InterpolationError::NonFiniteQuery { value: query });
    }

    let last = nodes.len() - 1;
    if query <= nodes[0] {
        return Ok(values[0]);
    }
    if query >= nodes[last] {
        return Ok(values[last]);
    }

    match nodes.binary_search_by(|node| node.total_cmp(&query)) {
        Ok(index) => Ok(values[index]),
        Err(upper) => {
            let lower = upper - 1;
            let fraction = (query - nodes[lower]) / (nodes[upper] - nodes[lower]);
            Ok(values[lower] + (values[upper] - values[lower]) * fraction)
        }
    }
}

/// Not-a-knot cubic spline with flat extrapolation.
///
/// The third derivative is continuous across the second and the
/// second-to-last knots, which makes the spline reproduce any cubic exactly.
/// Two nodes degrade to a straight line and three nodes to the interpolating
/// parabola.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivative at each knot.
    y2s: Vec<f64>,
}

impl CubicSpline {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, InterpolationError> {
        validate_nodes(&xs, &ys, 2)?;
        let y2s = not_a_knot_second_derivatives(&xs, &ys);
        Ok(Self { xs, ys, y2s })
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        if x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= self.xs[n - 1] {
            return self.ys[n - 1];
        }

        let mut lo = 0;
        let mut hi = n - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.xs[mid] > x {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        let h = self.xs[hi] - self.xs[lo];
        let a = (self.xs[hi] - x) / h;
        let b = (x - self.xs[lo]) / h;

        a * self.ys[lo]
            + b * self.ys[hi]
            + ((a * a * a - a) * self.y2s[lo] + (b * b * b - b) * self.y2s[hi]) * h * h / 6.0
    }
}

fn not_a_knot_second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    if n == 2 {
        return vec![0.0; 2];
    }

    let widths: Vec<f64> = xs.windows(2).map(|pair| pair[1] - pair[0]).collect();
    let slopes: Vec<f64> = ys
        .windows(2)
        .zip(&widths)
        .map(|(pair, width)| (pair[1] - pair[0]) / width)
        .collect();

    if n == 3 {
        let curvature = 2.0 * (slopes[1] - slopes[0]) / (xs[2] - xs[0]);
        return vec![curvature; 3];
    }

    // Interior unknowns M[1..=n-2]; the end values are eliminated through
    // the not-a-knot conditions, keeping the system tridiagonal.
    let interior = n - 2;
    let mut sub = vec![0.0; interior];
    let mut diag = vec![0.0; interior];
    let mut sup = vec![0.0; interior];
    let mut rhs = vec![0.0; interior];
    for row in 0..interior {
        let knot = row + 1;
        sub[row] = widths[knot - 1];
        diag[row] = 2.0 * (widths[knot - 1] + widths[knot]);
        sup[row] = widths[knot];
        rhs[row] = 6.0 * (slopes[knot] - slopes[knot - 1]);
    }

    let (h0, h1) = (widths[0], widths[1]);
    diag[0] += h0 * (1.0 + h0 / h1);
    sup[0] -= h0 * h0 / h1;

    let (tail_prev, tail) = (widths[n - 3], widths[n - 2]);
    diag[interior - 1] += tail * (1.0 + tail / tail_prev);
    sub[interior - 1] -= tail * tail / tail_prev;

    for row in 1..interior {
        let factor = sub[row] / diag[row - 1];
        diag[row] -= factor * sup[row - 1];
        rhs[row] -= factor * rhs[row - 1];
    }

    let mut inner = vec![0.0; interior];
    inner[interior - 1] = rhs[interior - 1] / diag[interior - 1];
    for row in (0..interior - 1).rev() {
        inner[row] = (rhs[row] - sup[row] * inner[row + 1]) / diag[row];
    }

    let first = inner[0] * (1.0 + h0 / h1) - inner[1] * h0 / h1;
    let last = inner[interior - 1] * (1.0 + tail / tail_prev)
        - inner[interior - 2] * tail / tail_prev;

    let mut second_derivatives = Vec::with_capacity(n);
    second_derivatives.push(first);
    second_derivatives.extend(inner);
    second_derivatives.push(last);
    second_derivatives
}

fn validate_nodes(
    nodes: &[f64],
    values: &[f64],
    required: usize,
) -> Result<(), InterpolationError> {
    if nodes.len() != values.len() {
        return Err(InterpolationError::LengthMismatch {
            nodes: nodes.len(),
            values: values.len(),
        });
    }
    if nodes.len() < required {
        return Err(InterpolationError::InsufficientPoints {
            required,
            actual: nodes.len(),
        });
    }

    for (index, node) in nodes.iter().copied().enumerate() {
        if !node.is_finite() {
            return Err(InterpolationError::NonFiniteNode { index, value: node });
        }
        if index > 0 {
            let previous = nodes[index - 1];
            if node <= previous {
                return Err(InterpolationError::NonIncreasingNodes {
                    index,
                    previous,
                    current: node,
                });
            }
        }
    }

    for (index, value) in values.iter().copied().enumerate() {
        if !value.is_finite() {
            return Err(InterpolationError::NonFiniteValue { index, value });
        }
    }

    Ok(())
}
