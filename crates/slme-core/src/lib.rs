//! Photovoltaic efficiency limits from optical absorption data.
//!
//! The Shockley-Queisser limit treats the absorber as a step function at
//! its band gap; the spectroscopic limited maximum efficiency (SLME) uses
//! the material's absorption coefficient, film thickness, and the offset
//! between its fundamental and direct-allowed gaps.

pub mod common;
pub mod domain;
pub mod modules;
pub mod numerics;

pub use common::{EfficiencyConfig, load_efficiency_config};
pub use domain::{SlmeError, SlmeErrorCategory, SlmeResult, ValidationWarning};
pub use modules::dielectric::{DielectricData, DielectricTensor, absorption_coefficient};
pub use modules::efficiency::{
    BandGapPair, EfficiencyCalculator, EfficiencyReport, SlmeInput, SqInput,
    shockley_queisser_limit, slme,
};
pub use modules::spectrum::{RadiationSpectrum, SolarReference};
