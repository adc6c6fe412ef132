use crate::common::constants::HBARC_EV_M;
use crate::domain::{SlmeError, SlmeResult};
use crate::numerics::{
    DenseComplexMatrix, EigenError, TENSOR_COMPONENT_COUNT, mean_eigenvalue,
    tensor_from_component_slices,
};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Complex number serialized as `[re, im]`.
pub type ComplexPair = [f64; 2];

/// Serialized dielectric response, in either supported layout.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DielectricData {
    /// Per-energy rows of six components ordered `xx, yy, zz, xy, yz, xz`.
    Components {
        energies: Vec<f64>,
        real: Vec<Vec<f64>>,
        imag: Vec<Vec<f64>>,
    },
    /// Per-energy 3x3 matrices of `[re, im]` pairs.
    Tensors {
        energies: Vec<f64>,
        tensors: Vec<Vec<Vec<ComplexPair>>>,
    },
}

/// Energy-resolved complex dielectric tensor.
#[derive(Debug, Clone)]
pub struct DielectricTensor {
    energies: Vec<f64>,
    tensors: Vec<DenseComplexMatrix>,
}

impl DielectricTensor {
    pub fn from_components(
        energies: Vec<f64>,
        real: &[Vec<f64>],
        imag: &[Vec<f64>],
    ) -> SlmeResult<Self> {
        if real.len() != energies.len() || imag.len() != energies.len() {
            return Err(SlmeError::format(
                "INPUT.DIELECTRIC_FORMAT",
                format!(
                    "dielectric component rows must match the energy grid: energies={}, real={}, imag={}",
                    energies.len(),
                    real.len(),
                    imag.len()
                ),
            ));
        }

        let tensors = real
            .iter()
            .zip(imag)
            .enumerate()
            .map(|(index, (real_row, imag_row))| {
                tensor_from_component_slices(real_row, imag_row).map_err(|source| {
                    SlmeError::format(
                        "INPUT.DIELECTRIC_FORMAT",
                        format!(
                            "dielectric row {index} is not a {TENSOR_COMPONENT_COUNT}-component tensor (real={}, imag={}): {source}",
                            real_row.len(),
                            imag_row.len()
                        ),
                    )
                })
            })
            .collect::<SlmeResult<Vec<_>>>()?;

        Self::from_tensors(energies, tensors)
    }

    pub fn from_tensors(energies: Vec<f64>, tensors: Vec<DenseComplexMatrix>) -> SlmeResult<Self> {
        if tensors.len() != energies.len() {
            return Err(SlmeError::format(
                "INPUT.DIELECTRIC_FORMAT",
                format!(
                    "dielectric tensor count {} does not match energy grid length {}",
                    tensors.len(),
                    energies.len()
                ),
            ));
        }

        for (index, tensor) in tensors.iter().enumerate() {
            if tensor.nrows() != 3 || tensor.ncols() != 3 {
                return Err(SlmeError::format(
                    "INPUT.DIELECTRIC_FORMAT",
                    format!(
                        "dielectric sample {index} must be 3x3, got {}x{}",
                        tensor.nrows(),
                        tensor.ncols()
                    ),
                ));
            }
            for row in 0..3 {
                for col in 0..3 {
                    if !tensor[(row, col)].is_finite() {
                        return Err(SlmeError::input_validation(
                            "INPUT.DIELECTRIC_VALUE",
                            format!(
                                "dielectric sample {index} has a non-finite entry at ({row},{col})"
                            ),
                        ));
                    }
                }
            }
        }

        validate_energy_grid(&energies)?;
        Ok(Self { energies, tensors })
    }

    pub fn from_data(data: DielectricData) -> SlmeResult<Self> {
        match data {
            DielectricData::Components {
                energies,
                real,
                imag,
            } => Self::from_components(energies, &real, &imag),
            DielectricData::Tensors { energies, tensors } => {
                let matrices = tensors
                    .iter()
                    .enumerate()
                    .map(|(index, sample)| matrix_from_pairs(index, sample))
                    .collect::<SlmeResult<Vec<_>>>()?;
                Self::from_tensors(energies, matrices)
            }
        }
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn tensors(&self) -> &[DenseComplexMatrix] {
        &self.tensors
    }

    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    /// Mean of the three tensor eigenvalues at each energy.
    pub fn dielectric_function(&self) -> SlmeResult<Vec<Complex64>> {
        self.tensors
            .iter()
            .enumerate()
            .map(|(index, tensor)| {
                mean_eigenvalue(tensor).map_err(|source| eigen_failure(index, source))
            })
            .collect()
    }

    /// Absorption coefficient in m^-1 on [`Self::energies`].
    pub fn absorption_coefficient(&self) -> SlmeResult<Vec<f64>> {
        let dielectric = self.dielectric_function()?;
        Ok(self
            .energies
            .iter()
            .zip(&dielectric)
            .map(|(energy, epsilon)| absorption_from_dielectric(*energy, *epsilon))
            .collect())
    }
}

/// Returns `(energies, alpha)` with `alpha` in m^-1.
pub fn absorption_coefficient(tensor: &DielectricTensor) -> SlmeResult<(Vec<f64>, Vec<f64>)> {
    let coefficients = tensor.absorption_coefficient()?;
    Ok((tensor.energies.clone(), coefficients))
}

/// `alpha = 2 E Im(sqrt(eps)) / (hbar c)`, taking the root with `Im >= 0`.
pub fn absorption_from_dielectric(energy: f64, epsilon: Complex64) -> f64 {
    let mut root = epsilon.sqrt();
    if root.im < 0.0 {
        root = -root;
    }
    2.0 * energy * root.im / HBARC_EV_M
}

fn matrix_from_pairs(index: usize, sample: &[Vec<ComplexPair>]) -> SlmeResult<DenseComplexMatrix> {
    let well_shaped = sample.len() == 3 && sample.iter().all(|row| row.len() == 3);
    if !well_shaped {
        let shape: Vec<usize> = sample.iter().map(Vec::len).collect();
        return Err(SlmeError::format(
            "INPUT.DIELECTRIC_FORMAT",
            format!("dielectric sample {index} must be 3x3, got row lengths {shape:?}"),
        ));
    }

    let mut matrix = DenseComplexMatrix::zeros(3, 3);
    for (row, entries) in sample.iter().enumerate() {
        for (col, [re, im]) in entries.iter().enumerate() {
            matrix[(row, col)] = Complex64::new(*re, *im);
        }
    }
    Ok(matrix)
}

fn validate_energy_grid(energies: &[f64]) -> SlmeResult<()> {
    if energies.is_empty() {
        return Err(SlmeError::format(
            "INPUT.DIELECTRIC_FORMAT",
            "dielectric data requires at least one energy sample",
        ));
    }

    for (index, energy) in energies.iter().copied().enumerate() {
        if !energy.is_finite() {
            return Err(SlmeError::input_validation(
                "INPUT.DIELECTRIC_ENERGY",
                format!("dielectric energy {index} must be finite, got {energy}"),
            ));
        }
        if index > 0 && energy <= energies[index - 1] {
            return Err(SlmeError::input_validation(
                "INPUT.DIELECTRIC_ENERGY",
                format!(
                    "dielectric energies must be strictly increasing, index {index} has {energy} after {}",
                    energies[index - 1]
                ),
            ));
        }
    }

    Ok(())
}

fn eigen_failure(index: usize, source: EigenError) -> SlmeError {
    SlmeError::internal(
        "RUN.DIELECTRIC_EIGENVALUES",
        format!("dielectric sample {index} eigenvalues failed: {source}"),
    )
}
