pub mod integration;
pub mod interpolation;
pub mod linalg;

pub use integration::{IntegrationError, integrate_simpson};
pub use interpolation::{CubicSpline, InterpolationError, interpolate_linear};
pub use linalg::{
    EigenError, TENSOR_COMPONENT_COUNT, eigenvalues, mean_eigenvalue,
    symmetric_tensor_from_components, tensor_from_component_slices,
};

use faer::Mat;
use num_complex::Complex64;

pub type DenseComplexMatrix = Mat<Complex64>;

/// Compensated running sum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KahanAccumulator {
    sum: f64,
    correction: f64,
}

impl KahanAccumulator {
    pub fn add(&mut self, value: f64) {
        let corrected = value - self.correction;
        let next = self.sum + corrected;
        self.correction = (next - self.sum) - corrected;
        self.sum = next;
    }

    pub fn total(&self) -> f64 {
        self.sum
    }
}

/// Index of the first element not less than `target` in an ascending slice.
pub fn search_sorted_left(values: &[f64], target: f64) -> usize {
    values.partition_point(|value| *value < target)
}
