pub mod errors;

pub use errors::{ExitPlaceholder, SlmeError, SlmeErrorCategory, SlmeResult};

use std::fmt::{Display, Formatter};

/// Non-fatal findings attached to an efficiency report.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationWarning {
    /// The direct-allowed gap lies below the fundamental gap, so the
    /// radiative fraction exceeds one.
    #[serde(rename_all = "camelCase")]
    InvertedBandGaps {
        fundamental: f64,
        direct_allowed: f64,
        radiative_fraction: f64,
    },
    /// The band gap falls outside the reference spectrum's wavelength range.
    #[serde(rename_all = "camelCase")]
    GapOutsideSpectrum {
        gap_ev: f64,
        gap_wavelength_nm: f64,
    },
}

impl Display for ValidationWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvertedBandGaps {
                fundamental,
                direct_allowed,
                radiative_fraction,
            } => write!(
                f,
                "direct-allowed gap {direct_allowed} eV is below fundamental gap {fundamental} eV (fr={radiative_fraction:.6e} > 1)"
            ),
            Self::GapOutsideSpectrum {
                gap_ev,
                gap_wavelength_nm,
            } => write!(
                f,
                "band gap {gap_ev} eV ({gap_wavelength_nm:.3} nm) lies outside the reference spectrum"
            ),
        }
    }
}
