//! Reference solar spectrum in its tabulated wavelength form.
//!
//! The dataset is a whitespace-delimited table with two header lines,
//! wavelength in nm in column 0 and spectral irradiance in W m^-2 nm^-1 in
//! column 1. Further columns (direct or extraterrestrial irradiance in the
//! ASTM G173 layout) are ignored.

use crate::common::constants::{M_PER_NM, PLANCK, SPEED_OF_LIGHT};
use crate::domain::{SlmeError, SlmeResult};
use crate::numerics::integrate_simpson;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const SOLAR_SPECTRUM_ENV: &str = "SLME_SOLAR_SPECTRUM";
pub const SOLAR_SPECTRUM_HEADER_LINES: usize = 2;
pub const DEFAULT_SOLAR_SPECTRUM_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/data/am1.5g.dat");

static BUNDLED_REFERENCE: OnceLock<SolarReference> = OnceLock::new();

#[derive(Debug, Clone, PartialEq)]
pub struct SolarReference {
    wavelength_nm: Vec<f64>,
    irradiance: Vec<f64>,
    /// Photons m^-2 s^-1 nm^-1.
    photon_flux: Vec<f64>,
    /// W m^-2.
    power_in: f64,
}

impl SolarReference {
    pub fn from_columns(wavelength_nm: Vec<f64>, irradiance: Vec<f64>) -> SlmeResult<Self> {
        if wavelength_nm.len() != irradiance.len() {
            return Err(SlmeError::format(
                "INPUT.SOLAR_FORMAT",
                format!(
                    "solar reference columns differ in length: wavelength={}, irradiance={}",
                    wavelength_nm.len(),
                    irradiance.len()
                ),
            ));
        }
        if wavelength_nm.len() < 2 {
            return Err(SlmeError::format(
                "INPUT.SOLAR_FORMAT",
                format!(
                    "solar reference requires at least 2 samples, got {}",
                    wavelength_nm.len()
                ),
            ));
        }

        for (index, wavelength) in wavelength_nm.iter().copied().enumerate() {
            if !wavelength.is_finite() || wavelength <= 0.0 {
                return Err(SlmeError::input_validation(
                    "INPUT.SOLAR_WAVELENGTH",
                    format!("solar wavelength {index} must be finite and positive, got {wavelength}"),
                ));
            }
            if index > 0 && wavelength <= wavelength_nm[index - 1] {
                return Err(SlmeError::input_validation(
                    "INPUT.SOLAR_WAVELENGTH",
                    format!(
                        "solar wavelengths must be strictly increasing, index {index} has {wavelength} after {}",
                        wavelength_nm[index - 1]
                    ),
                ));
            }
        }
        if let Some(index) = irradiance.iter().position(|value| !value.is_finite()) {
            return Err(SlmeError::input_validation(
                "INPUT.SOLAR_IRRADIANCE",
                format!("solar irradiance {index} must be finite"),
            ));
        }

        let photon_flux = wavelength_nm
            .iter()
            .zip(&irradiance)
            .map(|(wavelength, power)| photon_flux_per_nm(*wavelength, *power))
            .collect();
        let power_in = integrate_simpson(&wavelength_nm, &irradiance).map_err(|source| {
            SlmeError::numerical(
                "RUN.SOLAR_POWER",
                format!("solar incident power integral failed: {source}"),
            )
        })?;

        tracing::debug!(
            samples = wavelength_nm.len(),
            power_in,
            "loaded solar reference spectrum"
        );

        Ok(Self {
            wavelength_nm,
            irradiance,
            photon_flux,
            power_in,
        })
    }

    pub fn from_reader(reader: impl BufRead, label: &str) -> SlmeResult<Self> {
        let mut wavelength_nm = Vec::new();
        let mut irradiance = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line.map_err(|source| {
                SlmeError::parse_failure(
                    "IO.SOLAR_READ",
                    format!("failed to read solar spectrum '{label}' line {line_number}: {source}"),
                )
            })?;
            if index < SOLAR_SPECTRUM_HEADER_LINES {
                continue;
            }

            let mut columns = line.split_whitespace();
            let (Some(wavelength), Some(power)) = (columns.next(), columns.next()) else {
                if !line.trim().is_empty() {
                    tracing::warn!(
                        label,
                        line_number,
                        "skipping truncated solar spectrum row"
                    );
                }
                continue;
            };

            wavelength_nm.push(parse_column(wavelength, label, line_number)?);
            irradiance.push(parse_column(power, label, line_number)?);
        }

        Self::from_columns(wavelength_nm, irradiance).map_err(|error| {
            SlmeError::parse_failure(
                "IO.SOLAR_PARSE",
                format!("solar spectrum '{label}' is unusable: {}", error.message()),
            )
        })
    }

    pub fn load(path: &Path) -> SlmeResult<Self> {
        let file = File::open(path).map_err(|source| {
            SlmeError::parse_failure(
                "IO.SOLAR_READ",
                format!(
                    "failed to open solar spectrum '{}': {}; provide the ASTM G173-03 AM1.5G table there or set {}",
                    path.display(),
                    source,
                    SOLAR_SPECTRUM_ENV
                ),
            )
        })?;
        Self::from_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Process-wide reference loaded once from [`resolve_solar_spectrum_path`].
    pub fn bundled() -> SlmeResult<&'static Self> {
        if let Some(reference) = BUNDLED_REFERENCE.get() {
            return Ok(reference);
        }
        let loaded = Self::load(&resolve_solar_spectrum_path(None))?;
        Ok(BUNDLED_REFERENCE.get_or_init(|| loaded))
    }

    pub fn wavelength_nm(&self) -> &[f64] {
        &self.wavelength_nm
    }

    pub fn wavelength_m(&self) -> Vec<f64> {
        self.wavelength_nm
            .iter()
            .map(|wavelength| wavelength * M_PER_NM)
            .collect()
    }

    pub fn irradiance(&self) -> &[f64] {
        &self.irradiance
    }

    pub fn photon_flux(&self) -> &[f64] {
        &self.photon_flux
    }

    pub fn power_in(&self) -> f64 {
        self.power_in
    }

    pub fn len(&self) -> usize {
        self.wavelength_nm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelength_nm.is_empty()
    }
}

/// Explicit path, then `SLME_SOLAR_SPECTRUM`, then the crate's data directory.
pub fn resolve_solar_spectrum_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var_os(SOLAR_SPECTRUM_ENV) {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => PathBuf::from(DEFAULT_SOLAR_SPECTRUM_PATH),
    }
}

/// Loads `explicit` when given, otherwise the cached process-wide reference.
pub fn load_solar_reference(explicit: Option<&Path>) -> SlmeResult<SolarReferenceHandle> {
    match explicit {
        Some(path) => SolarReference::load(path).map(SolarReferenceHandle::Owned),
        None => SolarReference::bundled().map(SolarReferenceHandle::Shared),
    }
}

/// Either a freshly loaded or the process-wide reference spectrum.
#[derive(Debug)]
pub enum SolarReferenceHandle {
    Owned(SolarReference),
    Shared(&'static SolarReference),
}

impl std::ops::Deref for SolarReferenceHandle {
    type Target = SolarReference;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Owned(reference) => reference,
            Self::Shared(reference) => reference,
        }
    }
}

/// `irradiance * lambda / (h c)` with `lambda` converted to metres.
pub fn photon_flux_per_nm(wavelength_nm: f64, irradiance: f64) -> f64 {
    irradiance * wavelength_nm * M_PER_NM / (PLANCK * SPEED_OF_LIGHT)
}

fn parse_column(token: &str, label: &str, line_number: usize) -> SlmeResult<f64> {
    token.parse::<f64>().map_err(|_| {
        SlmeError::parse_failure(
            "IO.SOLAR_PARSE",
            format!("solar spectrum '{label}' line {line_number} has non-numeric value '{token}'"),
        )
    })
}
