//! Physical constants shared by the spectrum and efficiency kernels.
//!
//! SI values are the exact CODATA 2018 definitions; the eV-based forms are
//! derived once here so no kernel recomputes them per call.

use std::f64::consts::PI;

/// Speed of light in vacuum, m/s.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;
/// Planck constant, J s.
pub const PLANCK: f64 = 6.626_070_15e-34;
/// Elementary charge, C.
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;
/// Boltzmann constant, J/K.
pub const BOLTZMANN: f64 = 1.380_649e-23;

/// Planck constant, eV s.
pub const PLANCK_EV: f64 = PLANCK / ELEMENTARY_CHARGE;
/// Reduced Planck constant, eV s.
pub const HBAR_EV: f64 = PLANCK_EV / (2.0 * PI);
/// Boltzmann constant, eV/K.
pub const BOLTZMANN_EV: f64 = BOLTZMANN / ELEMENTARY_CHARGE;
/// `h c` in eV m; `E[eV] = HC_EV_M / lambda[m]`.
pub const HC_EV_M: f64 = PLANCK_EV * SPEED_OF_LIGHT;
/// `hbar c` in eV m.
pub const HBARC_EV_M: f64 = HBAR_EV * SPEED_OF_LIGHT;

pub const NM_PER_M: f64 = 1.0e9;
pub const M_PER_NM: f64 = 1.0e-9;
pub const M_PER_CM: f64 = 1.0e-2;

/// Standard test temperature (25 C), K.
pub const STANDARD_TEMPERATURE: f64 = 293.15;
