//! Shockley-Queisser and SLME efficiency limits.

mod band_gaps;
mod calculator;
mod diode;
mod engine;

pub use band_gaps::BandGapPair;
pub use calculator::EfficiencyCalculator;
pub use diode::{CurrentVoltageCurve, DiodeModel, MaxPowerPoint, VoltageClimb, maximize_power};
pub use engine::{
    EfficiencyReport, SlmeInput, SqInput, shockley_queisser_limit,
    shockley_queisser_limit_bundled, slme, slme_bundled,
};
