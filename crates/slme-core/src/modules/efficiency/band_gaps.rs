use crate::common::constants::BOLTZMANN_EV;
use crate::domain::{SlmeError, SlmeResult, ValidationWarning};
use serde::{Deserialize, Serialize};

/// Fundamental and direct-allowed band gaps in eV.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandGapPair {
    pub fundamental: f64,
    pub direct_allowed: f64,
}

impl BandGapPair {
    pub fn new(fundamental: f64, direct_allowed: f64) -> SlmeResult<Self> {
        let pair = Self {
            fundamental,
            direct_allowed,
        };
        pair.validate()?;
        Ok(pair)
    }

    /// Equal gaps, as for a direct-gap material.
    pub fn direct(gap: f64) -> SlmeResult<Self> {
        Self::new(gap, gap)
    }

    pub fn validate(&self) -> SlmeResult<()> {
        for (label, value) in [
            ("fundamental", self.fundamental),
            ("direct-allowed", self.direct_allowed),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SlmeError::input_validation(
                    "INPUT.BAND_GAP",
                    format!("{label} band gap must be finite and positive, got {value} eV"),
                ));
            }
        }
        Ok(())
    }

    pub fn offset(&self) -> f64 {
        self.direct_allowed - self.fundamental
    }

    /// `exp(-(E_direct - E_fundamental) / (k_B T))`.
    pub fn radiative_fraction(&self, temperature: f64) -> f64 {
        (-self.offset() / (BOLTZMANN_EV * temperature)).exp()
    }

    pub fn inversion_warning(&self, temperature: f64) -> Option<ValidationWarning> {
        (self.direct_allowed < self.fundamental).then(|| ValidationWarning::InvertedBandGaps {
            fundamental: self.fundamental,
            direct_allowed: self.direct_allowed,
            radiative_fraction: self.radiative_fraction(temperature),
        })
    }

    /// Non-spin-polarized gaps from a k-point x band eigenvalue table (eV).
    ///
    /// The highest occupied band is `electron_count / 2 - 1`. The fundamental
    /// gap is the global conduction minimum minus the global valence maximum;
    /// the direct gap is the smallest same-k separation of those two bands.
    pub fn from_band_energies(eigenvalues: &[Vec<f64>], electron_count: usize) -> SlmeResult<Self> {
        if eigenvalues.is_empty() {
            return Err(SlmeError::format(
                "INPUT.BAND_ENERGIES",
                "band energy table requires at least one k-point",
            ));
        }
        let occupied = electron_count / 2;
        if occupied == 0 {
            return Err(SlmeError::input_validation(
                "INPUT.BAND_ENERGIES",
                format!("electron count {electron_count} leaves no occupied band"),
            ));
        }

        let mut valence_max = f64::NEG_INFINITY;
        let mut conduction_min = f64::INFINITY;
        let mut direct = f64::INFINITY;
        for (kpoint, bands) in eigenvalues.iter().enumerate() {
            if bands.len() <= occupied {
                return Err(SlmeError::format(
                    "INPUT.BAND_ENERGIES",
                    format!(
                        "k-point {kpoint} has {} bands, need more than {occupied} for {electron_count} electrons",
                        bands.len()
                    ),
                ));
            }
            let valence = bands[occupied - 1];
            let conduction = bands[occupied];
            if !valence.is_finite() || !conduction.is_finite() {
                return Err(SlmeError::input_validation(
                    "INPUT.BAND_ENERGIES",
                    format!("k-point {kpoint} has non-finite band edges"),
                ));
            }
            valence_max = valence_max.max(valence);
            conduction_min = conduction_min.min(conduction);
            direct = direct.min(conduction - valence);
        }

        let pair = Self {
            fundamental: conduction_min - valence_max,
            direct_allowed: direct,
        };
        tracing::debug!(
            fundamental = pair.fundamental,
            direct_allowed = pair.direct_allowed,
            "derived band gaps from band energies"
        );
        pair.validate()?;
        Ok(pair)
    }
}
