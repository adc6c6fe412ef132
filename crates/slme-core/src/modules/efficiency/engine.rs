use super::band_gaps::BandGapPair;
use super::diode::{DiodeModel, MaxPowerPoint, VoltageClimb, maximize_power};
use crate::common::EfficiencyConfig;
use crate::common::constants::{ELEMENTARY_CHARGE, HC_EV_M, M_PER_CM, M_PER_NM, NM_PER_M};
use crate::domain::{SlmeError, SlmeResult, ValidationWarning};
use crate::modules::spectrum::{SolarReference, blackbody_photon_flux_per_m};
use crate::numerics::{
    CubicSpline, IntegrationError, InterpolationError, integrate_simpson, interpolate_linear,
    search_sorted_left,
};
use serde::Serialize;
use std::f64::consts::PI;

/// Shockley-Queisser query for a single band gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqInput {
    pub band_gap: f64,
    pub temperature: f64,
    pub radiative_fraction: f64,
    pub climb: VoltageClimb,
}

impl SqInput {
    pub fn new(band_gap: f64, temperature: f64) -> Self {
        Self {
            band_gap,
            temperature,
            radiative_fraction: 1.0,
            climb: VoltageClimb::default(),
        }
    }

    pub fn with_radiative_fraction(mut self, radiative_fraction: f64) -> Self {
        self.radiative_fraction = radiative_fraction;
        self
    }

    pub fn with_climb(mut self, climb: VoltageClimb) -> Self {
        self.climb = climb;
        self
    }
}

/// SLME query: an absorption spectrum on an ascending energy grid (eV).
#[derive(Debug, Clone, PartialEq)]
pub struct SlmeInput {
    pub energies: Vec<f64>,
    pub absorption: Vec<f64>,
    pub band_gaps: BandGapPair,
    pub thickness: f64,
    pub temperature: f64,
    /// Coefficients are in cm^-1 rather than m^-1.
    pub absorbance_in_inverse_cm: bool,
    /// Drop absorption at wavelengths at or beyond the direct-allowed gap.
    pub cutoff_below_gap: bool,
    pub climb: VoltageClimb,
}

impl SlmeInput {
    pub fn new(energies: Vec<f64>, absorption: Vec<f64>, band_gaps: BandGapPair) -> Self {
        Self::from_config(energies, absorption, band_gaps, &EfficiencyConfig::default())
    }

    pub fn from_config(
        energies: Vec<f64>,
        absorption: Vec<f64>,
        band_gaps: BandGapPair,
        config: &EfficiencyConfig,
    ) -> Self {
        Self {
            energies,
            absorption,
            band_gaps,
            thickness: config.thickness,
            temperature: config.temperature,
            absorbance_in_inverse_cm: config.absorbance_in_inverse_cm,
            cutoff_below_gap: config.cutoff_below_gap,
            climb: VoltageClimb::from_config(config),
        }
    }
}

/// Efficiency and the intermediate quantities behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencyReport {
    pub efficiency: f64,
    pub temperature: f64,
    /// Incident power, W m^-2.
    pub power_in: f64,
    /// Short-circuit current density, A m^-2.
    pub j_sc: f64,
    /// Radiative saturation current density, A m^-2.
    pub j_0_radiative: f64,
    /// Total saturation current density, A m^-2.
    pub j_0: f64,
    pub radiative_fraction: f64,
    pub voltage_at_max_power: f64,
    /// W m^-2.
    pub max_power: f64,
    pub warnings: Vec<ValidationWarning>,
}

impl EfficiencyReport {
    pub fn diode(&self) -> SlmeResult<DiodeModel> {
        DiodeModel::new(self.j_sc, self.j_0, self.temperature)
    }
}

/// Detailed-balance limit for a step absorber at `input.band_gap`.
///
/// Solar and blackbody photon fluxes are integrated over wavelength up to
/// `lambda_g = h c / E_g`, with an exact boundary sample appended at
/// `lambda_g` when it falls inside the reference grid.
pub fn shockley_queisser_limit(
    reference: &SolarReference,
    input: &SqInput,
) -> SlmeResult<EfficiencyReport> {
    validate_positive("INPUT.BAND_GAP", "band gap", input.band_gap, "eV")?;
    validate_positive("INPUT.TEMPERATURE", "temperature", input.temperature, "K")?;
    validate_positive(
        "INPUT.RADIATIVE_FRACTION",
        "radiative fraction",
        input.radiative_fraction,
        "",
    )?;

    let wavelength_nm = reference.wavelength_nm();
    let gap_wavelength_nm = HC_EV_M / input.band_gap * NM_PER_M;
    let mut warnings = Vec::new();

    let cut = search_sorted_left(wavelength_nm, gap_wavelength_nm);
    let mut grid_nm = wavelength_nm[..cut].to_vec();
    let mut solar_flux = reference.photon_flux()[..cut].to_vec();
    if cut < wavelength_nm.len() && cut > 0 {
        let boundary_flux =
            interpolate_linear(wavelength_nm, reference.photon_flux(), gap_wavelength_nm)
                .map_err(|source| {
                    SlmeError::numerical(
                        "RUN.SQ_BOUNDARY",
                        format!("band-gap boundary interpolation failed: {source}"),
                    )
                })?;
        grid_nm.push(gap_wavelength_nm);
        solar_flux.push(boundary_flux);
    } else {
        let warning = ValidationWarning::GapOutsideSpectrum {
            gap_ev: input.band_gap,
            gap_wavelength_nm,
        };
        tracing::warn!(%warning, "band gap outside reference spectrum");
        warnings.push(warning);
    }

    let grid_m: Vec<f64> = grid_nm.iter().map(|value| value * M_PER_NM).collect();
    let blackbody: Vec<f64> = grid_m
        .iter()
        .map(|wavelength| blackbody_photon_flux_per_m(*wavelength, input.temperature))
        .collect();
    let solar_flux_per_m: Vec<f64> = solar_flux.iter().map(|flux| flux * NM_PER_M).collect();

    let j_0_radiative = ELEMENTARY_CHARGE * PI * truncated_integral(&grid_m, &blackbody)?;
    let j_sc = ELEMENTARY_CHARGE * truncated_integral(&grid_m, &solar_flux_per_m)?;

    finish_report(
        reference.power_in(),
        j_sc,
        j_0_radiative,
        input.radiative_fraction,
        input.temperature,
        &input.climb,
        warnings,
    )
}

/// Spectroscopic limited maximum efficiency of a film of `input.thickness`.
pub fn slme(reference: &SolarReference, input: &SlmeInput) -> SlmeResult<EfficiencyReport> {
    input.band_gaps.validate()?;
    validate_positive("INPUT.TEMPERATURE", "temperature", input.temperature, "K")?;
    if !input.thickness.is_finite() || input.thickness < 0.0 {
        return Err(SlmeError::input_validation(
            "INPUT.THICKNESS",
            format!("film thickness must be finite and non-negative, got {} m", input.thickness),
        ));
    }

    let mut warnings = Vec::new();
    let radiative_fraction = input.band_gaps.radiative_fraction(input.temperature);
    if let Some(warning) = input.band_gaps.inversion_warning(input.temperature) {
        tracing::warn!(%warning, "inverted band gaps");
        warnings.push(warning);
    }

    let wavelength_nm = reference.wavelength_nm();
    let absorptivity = absorptivity_on_grid(input, wavelength_nm)?;

    let grid_m = reference.wavelength_m();
    let absorbed_blackbody: Vec<f64> = grid_m
        .iter()
        .zip(&absorptivity)
        .map(|(wavelength, absorbed)| {
            blackbody_photon_flux_per_m(*wavelength, input.temperature) * absorbed
        })
        .collect();
    let absorbed_solar: Vec<f64> = reference
        .photon_flux()
        .iter()
        .zip(&absorptivity)
        .map(|(flux, absorbed)| flux * absorbed)
        .collect();

    let j_0_radiative = ELEMENTARY_CHARGE
        * PI
        * integrate_simpson(&grid_m, &absorbed_blackbody).map_err(integral_failure)?;
    let j_sc = ELEMENTARY_CHARGE
        * integrate_simpson(wavelength_nm, &absorbed_solar).map_err(integral_failure)?;

    finish_report(
        reference.power_in(),
        j_sc,
        j_0_radiative,
        radiative_fraction,
        input.temperature,
        &input.climb,
        warnings,
    )
}

/// [`shockley_queisser_limit`] against the process-wide AM1.5G reference.
pub fn shockley_queisser_limit_bundled(input: &SqInput) -> SlmeResult<EfficiencyReport> {
    shockley_queisser_limit(SolarReference::bundled()?, input)
}

/// [`slme`] against the process-wide AM1.5G reference.
pub fn slme_bundled(input: &SlmeInput) -> SlmeResult<EfficiencyReport> {
    slme(SolarReference::bundled()?, input)
}

/// `1 - exp(-2 alpha d)` at each wavelength (nm) of the reference grid.
///
/// The absorption spectrum is splined in energy and evaluated at
/// `E = h c / lambda`; negative spline overshoot is clamped to zero. With
/// `cutoff_below_gap`, every wavelength at or beyond `lambda(E_direct)` is
/// exactly zero.
fn absorptivity_on_grid(input: &SlmeInput, wavelength_nm: &[f64]) -> SlmeResult<Vec<f64>> {
    let scale = if input.absorbance_in_inverse_cm {
        1.0 / M_PER_CM
    } else {
        1.0
    };
    let absorption: Vec<f64> = input.absorption.iter().map(|value| value * scale).collect();
    let spline = CubicSpline::new(input.energies.clone(), absorption).map_err(|source| {
        match source {
            InterpolationError::InsufficientPoints { .. } => SlmeError::numerical(
                "RUN.ABSORPTION_INTERPOLATION",
                format!("absorption spectrum cannot be interpolated: {source}"),
            ),
            _ => SlmeError::input_validation(
                "INPUT.ABSORPTION_SPECTRUM",
                format!("absorption spectrum cannot be interpolated: {source}"),
            ),
        }
    })?;

    let direct_wavelength_nm = HC_EV_M / input.band_gaps.direct_allowed * NM_PER_M;
    Ok(wavelength_nm
        .iter()
        .map(|wavelength| {
            if input.cutoff_below_gap && *wavelength >= direct_wavelength_nm {
                return 0.0;
            }
            let energy = HC_EV_M / (wavelength * M_PER_NM);
            let alpha = spline.evaluate(energy).max(0.0);
            -(-2.0 * alpha * input.thickness).exp_m1()
        })
        .collect())
}

fn finish_report(
    power_in: f64,
    j_sc: f64,
    j_0_radiative: f64,
    radiative_fraction: f64,
    temperature: f64,
    climb: &VoltageClimb,
    warnings: Vec<ValidationWarning>,
) -> SlmeResult<EfficiencyReport> {
    if !power_in.is_finite() || power_in <= 0.0 {
        return Err(SlmeError::numerical(
            "RUN.POWER_IN",
            format!("incident power must be positive, got {power_in} W/m^2"),
        ));
    }

    let j_0 = j_0_radiative / radiative_fraction;
    let diode = DiodeModel::new(j_sc, j_0, temperature)?;
    let MaxPowerPoint { voltage, power, .. } = maximize_power(&diode, climb)?;
    let efficiency = power / power_in;

    tracing::debug!(
        power_in,
        j_sc,
        j_0_radiative,
        j_0,
        radiative_fraction,
        voltage,
        efficiency,
        "computed efficiency"
    );

    Ok(EfficiencyReport {
        efficiency,
        temperature,
        power_in,
        j_sc,
        j_0_radiative,
        j_0,
        radiative_fraction,
        voltage_at_max_power: voltage,
        max_power: power,
        warnings,
    })
}

/// Integral over a truncated domain; fewer than two samples integrate to zero.
fn truncated_integral(grid: &[f64], values: &[f64]) -> SlmeResult<f64> {
    if grid.len() < 2 {
        return Ok(0.0);
    }
    integrate_simpson(grid, values).map_err(integral_failure)
}

fn integral_failure(source: IntegrationError) -> SlmeError {
    SlmeError::numerical(
        "RUN.EFFICIENCY_INTEGRAL",
        format!("current density integral failed: {source}"),
    )
}

fn validate_positive(
    placeholder: &'static str,
    label: &str,
    value: f64,
    unit: &str,
) -> SlmeResult<()> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(SlmeError::input_validation(
        placeholder,
        format!("{label} must be finite and positive, got {value} {unit}")
            .trim_end()
            .to_string(),
    ))
}
