//! Symmetric 3x3 tensor helpers.
//!
//! Eigenvalues are returned in no particular order. Callers in this crate
//! only ever use aggregate statistics (the mean) of the three values.

use super::DenseComplexMatrix;
use num_complex::Complex64;

pub const TENSOR_COMPONENT_COUNT: usize = 6;
const NEWTON_POLISH_STEPS: usize = 3;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EigenError {
    #[error("tensor eigenvalues require a 3x3 matrix, got {rows}x{cols}")]
    NonCubicShape { rows: usize, cols: usize },
    #[error("tensor entry ({row},{col}) must be finite, got {value}")]
    NonFiniteEntry {
        row: usize,
        col: usize,
        value: Complex64,
    },
    #[error("symmetric tensor requires {TENSOR_COMPONENT_COUNT} components, got {actual}")]
    ComponentCount { actual: usize },
}

/// Build `[[xx, xy, xz], [xy, yy, yz], [xz, yz, zz]]`.
pub fn symmetric_tensor_from_components(
    xx: Complex64,
    yy: Complex64,
    zz: Complex64,
    xy: Complex64,
    yz: Complex64,
    xz: Complex64,
) -> DenseComplexMatrix {
    let mut tensor = DenseComplexMatrix::zeros(3, 3);
    tensor[(0, 0)] = xx;
    tensor[(1, 1)] = yy;
    tensor[(2, 2)] = zz;
    tensor[(0, 1)] = xy;
    tensor[(1, 0)] = xy;
    tensor[(1, 2)] = yz;
    tensor[(2, 1)] = yz;
    tensor[(0, 2)] = xz;
    tensor[(2, 0)] = xz;
    tensor
}

/// Component-slice form of [`symmetric_tensor_from_components`], combining a
/// real and an imaginary row in `xx, yy, zz, xy, yz, xz` order.
pub fn tensor_from_component_slices(
    real: &[f64],
    imag: &[f64],
) -> Result<DenseComplexMatrix, EigenError> {
    for row in [real, imag] {
        if row.len() != TENSOR_COMPONENT_COUNT {
            return Err(EigenError::ComponentCount { actual: row.len() });
        }
    }

    let component = |index: usize| Complex64::new(real[index], imag[index]);
    Ok(symmetric_tensor_from_components(
        component(0),
        component(1),
        component(2),
        component(3),
        component(4),
        component(5),
    ))
}

/// Eigenvalues of a complex 3x3 matrix, unordered.
///
/// Roots of the characteristic cubic come from Cardano's formula and are
/// polished with a few Newton steps. Diagonal input returns its diagonal.
pub fn eigenvalues(matrix: &DenseComplexMatrix) -> Result<[Complex64; 3], EigenError> {
    validate_tensor(matrix)?;

    let off_diagonal_zero = (0..3)
        .flat_map(|row| (0..3).map(move |col| (row, col)))
        .filter(|(row, col)| row != col)
        .all(|(row, col)| matrix[(row, col)] == Complex64::new(0.0, 0.0));
    if off_diagonal_zero {
        return Ok([matrix[(0, 0)], matrix[(1, 1)], matrix[(2, 2)]]);
    }

    let (a, b, c) = characteristic_coefficients(matrix);
    let mut roots = cubic_roots(a, b, c);
    for root in &mut roots {
        *root = newton_polish(*root, a, b, c);
    }
    Ok(roots)
}

/// Arithmetic mean of the eigenvalues.
pub fn mean_eigenvalue(matrix: &DenseComplexMatrix) -> Result<Complex64, EigenError> {
    let values = eigenvalues(matrix)?;
    Ok((values[0] + values[1] + values[2]) / 3.0)
}

/// Coefficients of `lambda^3 + a lambda^2 + b lambda + c`.
fn characteristic_coefficients(m: &DenseComplexMatrix) -> (Complex64, Complex64, Complex64) {
    let trace = m[(0, 0)] + m[(1, 1)] + m[(2, 2)];
    let minors = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)] + m[(0, 0)] * m[(2, 2)]
        - m[(0, 2)] * m[(2, 0)]
        + m[(1, 1)] * m[(2, 2)]
        - m[(1, 2)] * m[(2, 1)];
    let determinant = m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
        - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
        + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)]);
    (-trace, minors, -determinant)
}

fn cubic_roots(a: Complex64, b: Complex64, c: Complex64) -> [Complex64; 3] {
    let shift = -a / 3.0;
    let p = b - a * a / 3.0;
    let q = 2.0 * a * a * a / 27.0 - a * b / 3.0 + c;

    let discriminant = (q * q / 4.0 + p * p * p / 27.0).sqrt();
    let plus = -q / 2.0 + discriminant;
    let minus = -q / 2.0 - discriminant;
    let u_cubed = if plus.norm_sqr() >= minus.norm_sqr() {
        plus
    } else {
        minus
    };

    if u_cubed.norm_sqr() == 0.0 {
        return [shift; 3];
    }

    let u = u_cubed.powf(1.0 / 3.0);
    let rotation = Complex64::new(-0.5, 3.0_f64.sqrt() / 2.0);
    let mut roots = [Complex64::new(0.0, 0.0); 3];
    let mut branch = u;
    for root in &mut roots {
        *root = branch - p / (3.0 * branch) + shift;
        branch *= rotation;
    }
    roots
}

fn newton_polish(root: Complex64, a: Complex64, b: Complex64, c: Complex64) -> Complex64 {
    let mut current = root;
    for _ in 0..NEWTON_POLISH_STEPS {
        let value = ((current + a) * current + b) * current + c;
        let slope = (3.0 * current + 2.0 * a) * current + b;
        if slope.norm_sqr() == 0.0 || !slope.is_finite() {
            break;
        }
        let next = current - value / slope;
        if !next.is_finite() {
            break;
        }
        current = next;
    }
    current
}

fn validate_tensor(matrix: &DenseComplexMatrix) -> Result<(), EigenError> {
    let rows = matrix.nrows();
    let cols = matrix.ncols();
    if rows != 3 || cols != 3 {
        return Err(EigenError::NonCubicShape { rows, cols });
    }

    for row in 0..3 {
        for col in 0..3 {
            let value = matrix[(row, col)];
            if !value.is_finite() {
                return Err(EigenError::NonFiniteEntry { row, col, value });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        EigenError, eigenvalues, mean_eigenvalue, symmetric_tensor_from_components,
        tensor_from_component_slices,
    };
    use crate::numerics::DenseComplexMatrix;
    use num_complex::Complex64;

    fn real(value: f64) -> Complex64 {
        Complex64::new(value, 0.0)
    }

    #[test]
    fn components_land_in_symmetric_positions() {
        let tensor = symmetric_tensor_from_components(
            real(1.0),
            real(2.0),
            real(3.0),
            real(4.0),
            real(5.0),
            real(6.0),
        );
        assert_eq!(tensor[(0, 1)], real(4.0));
        assert_eq!(tensor[(1, 0)], real(4.0));
        assert_eq!(tensor[(1, 2)], real(5.0));
        assert_eq!(tensor[(2, 1)], real(5.0));
        assert_eq!(tensor[(0, 2)], real(6.0));
        assert_eq!(tensor[(2, 0)], real(6.0));
        assert_eq!(tensor[(2, 2)], real(3.0));
    }

    #[test]
    fn diagonal_tensor_returns_its_diagonal_exactly() {
        let xx = Complex64::new(2.5, 0.1);
        let yy = Complex64::new(-1.0, 3.0);
        let zz = Complex64::new(7.25, 0.0);
        let tensor = symmetric_tensor_from_components(xx, yy, zz, real(0.0), real(0.0), real(0.0));

        let values = eigenvalues(&tensor).expect("eigenvalues");
        for expected in [xx, yy, zz] {
            assert!(values.contains(&expected), "missing eigenvalue {expected}");
        }
    }

    #[test]
    fn real_symmetric_tensor_matches_known_spectrum() {
        // [[2,1,0],[1,2,0],[0,0,5]] has eigenvalues 1, 3 and 5.
        let tensor = symmetric_tensor_from_components(
            real(2.0),
            real(2.0),
            real(5.0),
            real(1.0),
            real(0.0),
            real(0.0),
        );
        let mut values: Vec<f64> = eigenvalues(&tensor)
            .expect("eigenvalues")
            .iter()
            .map(|value| {
                assert!(value.im.abs() <= 1.0e-10, "unexpected imaginary part {value}");
                value.re
            })
            .collect();
        values.sort_by(f64::total_cmp);
        for (actual, expected) in values.iter().zip([1.0, 3.0, 5.0]) {
            assert!((actual - expected).abs() <= 1.0e-10, "{actual} vs {expected}");
        }
    }

    #[test]
    fn complex_eigenvalues_satisfy_invariants() {
        let tensor = symmetric_tensor_from_components(
            Complex64::new(10.0, 2.0),
            Complex64::new(11.0, 2.5),
            Complex64::new(9.0, 1.5),
            Complex64::new(0.4, 0.1),
            Complex64::new(-0.3, 0.05),
            Complex64::new(0.2, -0.1),
        );
        let values = eigenvalues(&tensor).expect("eigenvalues");
        let trace = tensor[(0, 0)] + tensor[(1, 1)] + tensor[(2, 2)];
        let sum = values[0] + values[1] + values[2];
        assert!((sum - trace).norm() <= 1.0e-10);

        for value in values {
            let mut shifted = tensor.clone();
            for index in 0..3 {
                shifted[(index, index)] -= value;
            }
            assert!(determinant(&shifted).norm() <= 1.0e-8, "det(A - {value}) != 0");
        }

        let mean = mean_eigenvalue(&tensor).expect("mean");
        assert!((mean - trace / 3.0).norm() <= 1.0e-12);
    }

    #[test]
    fn repeated_eigenvalues_are_recovered() {
        let tensor = symmetric_tensor_from_components(
            real(4.0),
            real(4.0),
            real(4.0),
            real(1.0e-30),
            real(0.0),
            real(0.0),
        );
        let values = eigenvalues(&tensor).expect("eigenvalues");
        for value in values {
            assert!((value - real(4.0)).norm() <= 1.0e-8);
        }
    }

    #[test]
    fn component_slices_require_six_entries() {
        let error = tensor_from_component_slices(&[1.0, 2.0, 3.0, 4.0], &[0.0; 6])
            .expect_err("four components should fail");
        assert_eq!(error, EigenError::ComponentCount { actual: 4 });

        let tensor = tensor_from_component_slices(&[1.0, 2.0, 3.0, 0.0, 0.0, 0.0], &[0.5; 6])
            .expect("six components");
        assert_eq!(tensor[(0, 0)], Complex64::new(1.0, 0.5));
        assert_eq!(tensor[(1, 2)], Complex64::new(0.0, 0.5));
    }

    #[test]
    fn rejects_non_cubic_shapes() {
        let matrix = DenseComplexMatrix::zeros(2, 3);
        assert_eq!(
            eigenvalues(&matrix).expect_err("2x3 should fail"),
            EigenError::NonCubicShape { rows: 2, cols: 3 }
        );
    }

    fn determinant(m: &DenseComplexMatrix) -> Complex64 {
        m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
            - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
            + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
    }
}
