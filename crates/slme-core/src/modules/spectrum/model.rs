use super::solar::SolarReference;
use crate::common::constants::{
    BOLTZMANN, BOLTZMANN_EV, ELEMENTARY_CHARGE, HC_EV_M, M_PER_NM, NM_PER_M, PLANCK, PLANCK_EV,
    SPEED_OF_LIGHT,
};
use crate::domain::{SlmeError, SlmeResult};
use crate::numerics::{IntegrationError, integrate_simpson};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Independent variable of tabulated spectral data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectralVariable {
    /// Photon energy in eV.
    Energy,
    /// Wavelength in metres.
    Wavelength,
}

impl FromStr for SpectralVariable {
    type Err = SlmeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "energy" => Ok(Self::Energy),
            "wavelength" => Ok(Self::Wavelength),
            other => Err(SlmeError::unsupported_unit(
                "INPUT.SPECTRUM_VARIABLE",
                format!("unsupported spectral variable '{other}', expected 'energy' or 'wavelength'"),
            )),
        }
    }
}

impl Display for SpectralVariable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Energy => f.write_str("energy"),
            Self::Wavelength => f.write_str("wavelength"),
        }
    }
}

/// Quantity carried by tabulated spectral data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectrumUnits {
    /// Photon flux density per unit of the spectral variable.
    Flux,
    /// Power density per unit of the spectral variable.
    Power,
}

impl FromStr for SpectrumUnits {
    type Err = SlmeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flux" => Ok(Self::Flux),
            "power" => Ok(Self::Power),
            other => Err(SlmeError::unsupported_unit(
                "INPUT.SPECTRUM_UNITS",
                format!("unsupported spectrum units '{other}', expected 'flux' or 'power'"),
            )),
        }
    }
}

impl Display for SpectrumUnits {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flux => f.write_str("flux"),
            Self::Power => f.write_str("power"),
        }
    }
}

/// Photon flux spectrum in photons m^-2 s^-1 eV^-1 on an ascending energy grid.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiationSpectrum {
    energies: Vec<f64>,
    photon_flux: Vec<f64>,
}

impl RadiationSpectrum {
    /// Canonicalize tabulated data.
    ///
    /// Wavelength grids are in metres and their densities per metre. They are
    /// mapped through `E = h c / lambda`, reversed into ascending energy and
    /// scaled by the Jacobian `h c / E^2`. Power densities are then divided by
    /// the photon energy `e E`.
    pub fn from_data(
        grid: &[f64],
        values: &[f64],
        variable: SpectralVariable,
        units: SpectrumUnits,
    ) -> SlmeResult<Self> {
        if grid.len() != values.len() {
            return Err(SlmeError::format(
                "INPUT.SPECTRUM_FORMAT",
                format!(
                    "spectrum grid and values differ in length: grid={}, values={}",
                    grid.len(),
                    values.len()
                ),
            ));
        }
        if grid.is_empty() {
            return Err(SlmeError::format(
                "INPUT.SPECTRUM_FORMAT",
                "spectrum requires at least one sample",
            ));
        }
        for (index, (point, value)) in grid.iter().zip(values).enumerate() {
            if !point.is_finite() || *point <= 0.0 {
                return Err(SlmeError::input_validation(
                    "INPUT.SPECTRUM_GRID",
                    format!("spectrum {variable} {index} must be finite and positive, got {point}"),
                ));
            }
            if !value.is_finite() {
                return Err(SlmeError::input_validation(
                    "INPUT.SPECTRUM_VALUE",
                    format!("spectrum value {index} must be finite, got {value}"),
                ));
            }
        }

        let (energies, density): (Vec<f64>, Vec<f64>) = match variable {
            SpectralVariable::Energy => (grid.to_vec(), values.to_vec()),
            SpectralVariable::Wavelength => grid
                .iter()
                .zip(values)
                .rev()
                .map(|(wavelength, value)| {
                    let energy = HC_EV_M / wavelength;
                    (energy, value * HC_EV_M / (energy * energy))
                })
                .unzip(),
        };

        let photon_flux = match units {
            SpectrumUnits::Flux => density,
            SpectrumUnits::Power => energies
                .iter()
                .zip(&density)
                .map(|(energy, power)| power / (ELEMENTARY_CHARGE * energy))
                .collect(),
        };

        validate_ascending(&energies)?;
        Ok(Self {
            energies,
            photon_flux,
        })
    }

    /// Standard AM1.5G spectrum from the process-wide reference dataset.
    pub fn am15g() -> SlmeResult<Self> {
        Self::from_solar_reference(SolarReference::bundled()?)
    }

    pub fn from_solar_reference(reference: &SolarReference) -> SlmeResult<Self> {
        let wavelengths: Vec<f64> = reference
            .wavelength_nm()
            .iter()
            .map(|wavelength| wavelength * M_PER_NM)
            .collect();
        let irradiance: Vec<f64> = reference
            .irradiance()
            .iter()
            .map(|value| value * NM_PER_M)
            .collect();
        Self::from_data(
            &wavelengths,
            &irradiance,
            SpectralVariable::Wavelength,
            SpectrumUnits::Power,
        )
    }

    /// Planck photon flux per eV per steradian at `temperature` (K).
    pub fn blackbody(temperature: f64, energies: &[f64]) -> SlmeResult<Self> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(SlmeError::input_validation(
                "INPUT.TEMPERATURE",
                format!("blackbody temperature must be positive, got {temperature} K"),
            ));
        }
        let photon_flux: Vec<f64> = energies
            .iter()
            .map(|energy| blackbody_photon_flux_per_ev(*energy, temperature))
            .collect();
        Self::from_data(
            energies,
            &photon_flux,
            SpectralVariable::Energy,
            SpectrumUnits::Flux,
        )
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn photon_flux(&self) -> &[f64] {
        &self.photon_flux
    }

    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    /// Photons m^-2 s^-1 over the whole grid.
    pub fn total_photon_flux(&self) -> SlmeResult<f64> {
        integrate_simpson(&self.energies, &self.photon_flux).map_err(integration_failure)
    }

    /// W m^-2 over the whole grid.
    pub fn total_power(&self) -> SlmeResult<f64> {
        let power: Vec<f64> = self
            .energies
            .iter()
            .zip(&self.photon_flux)
            .map(|(energy, flux)| flux * energy * ELEMENTARY_CHARGE)
            .collect();
        integrate_simpson(&self.energies, &power).map_err(integration_failure)
    }

    /// Inverse of the wavelength form of [`Self::from_data`]: ascending
    /// wavelengths in m and photon flux per m, scaled by `E^2 / (h c)`.
    pub fn to_wavelength_data(&self) -> (Vec<f64>, Vec<f64>) {
        self.energies
            .iter()
            .zip(&self.photon_flux)
            .rev()
            .map(|(energy, flux)| (HC_EV_M / energy, flux * energy * energy / HC_EV_M))
            .unzip()
    }
}

/// `2 E^2 / (h^3 c^2) / (exp(E / kT) - 1)`, photons m^-2 s^-1 eV^-1 sr^-1.
pub fn blackbody_photon_flux_per_ev(energy: f64, temperature: f64) -> f64 {
    let occupation = (energy / (BOLTZMANN_EV * temperature)).exp_m1();
    2.0 * energy * energy / (PLANCK_EV.powi(3) * SPEED_OF_LIGHT * SPEED_OF_LIGHT) / occupation
}

/// Planck photon flux per metre of wavelength per steradian,
/// `2 c / lambda^4 / (exp(h c / (lambda k T)) - 1)` with `lambda` in metres.
pub fn blackbody_photon_flux_per_m(wavelength: f64, temperature: f64) -> f64 {
    let occupation = (PLANCK * SPEED_OF_LIGHT / (wavelength * BOLTZMANN * temperature)).exp_m1();
    2.0 * SPEED_OF_LIGHT / wavelength.powi(4) / occupation
}

fn validate_ascending(energies: &[f64]) -> SlmeResult<()> {
    for (index, pair) in energies.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(SlmeError::input_validation(
                "INPUT.SPECTRUM_GRID",
                format!(
                    "spectrum energies must be strictly ascending, index {} has {} after {}",
                    index + 1,
                    pair[1],
                    pair[0]
                ),
            ));
        }
    }
    Ok(())
}

fn integration_failure(source: IntegrationError) -> SlmeError {
    SlmeError::numerical(
        "RUN.SPECTRUM_INTEGRAL",
        format!("spectrum integral failed: {source}"),
    )
}
