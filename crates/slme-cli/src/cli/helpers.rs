use super::CliError;
use super::commands::ReportFlags;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use slme_core::common::constants::NM_PER_M;
use slme_core::common::{EfficiencyConfig, load_efficiency_config};
use slme_core::domain::{SlmeError, SlmeResult};
use slme_core::modules::dielectric::{DielectricData, DielectricTensor};
use slme_core::modules::efficiency::{BandGapPair, EfficiencyReport};
use slme_core::modules::spectrum::{RadiationSpectrum, SolarReferenceHandle, load_solar_reference};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub(super) const CURVE_MAX_VOLTAGE: f64 = 2.0;
pub(super) const CURVE_POINTS: usize = 200;

/// `slme --input` document: band gaps plus either a tabulated absorption
/// spectrum or dielectric data to derive one from.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SlmeDocument {
    pub(super) fundamental_gap: f64,
    pub(super) direct_gap: f64,
    #[serde(default)]
    pub(super) energies: Option<Vec<f64>>,
    #[serde(default)]
    pub(super) absorption: Option<Vec<f64>>,
    #[serde(default)]
    pub(super) dielectric: Option<DielectricData>,
}

impl SlmeDocument {
    pub(super) fn band_gaps(&self) -> SlmeResult<BandGapPair> {
        BandGapPair::new(self.fundamental_gap, self.direct_gap)
    }

    /// Returns `(energies, absorption, derived_from_dielectric)`.
    pub(super) fn absorption_spectrum(&self) -> SlmeResult<(Vec<f64>, Vec<f64>, bool)> {
        match (&self.dielectric, &self.energies, &self.absorption) {
            (Some(data), None, None) => {
                let tensor = DielectricTensor::from_data(data.clone())?;
                let absorption = tensor.absorption_coefficient()?;
                Ok((tensor.energies().to_vec(), absorption, true))
            }
            (None, Some(energies), Some(absorption)) => {
                if energies.len() != absorption.len() {
                    return Err(SlmeError::format(
                        "INPUT.SLME_DOCUMENT",
                        format!(
                            "absorption spectrum lengths differ: energies={}, absorption={}",
                            energies.len(),
                            absorption.len()
                        ),
                    ));
                }
                Ok((energies.clone(), absorption.clone(), false))
            }
            _ => Err(SlmeError::format(
                "INPUT.SLME_DOCUMENT",
                "SLME input must carry either 'energies' and 'absorption' or 'dielectric'",
            )),
        }
    }
}

pub(super) fn load_slme_document(path: &Path) -> SlmeResult<SlmeDocument> {
    let source = fs::read_to_string(path).map_err(|source| {
        SlmeError::parse_failure(
            "IO.SLME_INPUT_READ",
            format!("failed to read SLME input '{}': {}", path.display(), source),
        )
    })?;
    serde_json::from_str(&source).map_err(|source| {
        SlmeError::parse_failure(
            "IO.SLME_INPUT_PARSE",
            format!("failed to parse SLME input '{}': {}", path.display(), source),
        )
    })
}

pub(super) fn load_cli_config(path: Option<&Path>) -> Result<EfficiencyConfig, CliError> {
    let Some(path) = path else {
        return Ok(EfficiencyConfig::default());
    };
    load_efficiency_config(path)
        .map_err(|source| SlmeError::parse_failure("IO.CONFIG", source.to_string()).into())
}

/// `--spectrum` wins over the config's `solarSpectrumPath`. With neither, the
/// process-wide reference is used.
pub(super) fn load_reference(
    flag: Option<&Path>,
    config: &EfficiencyConfig,
) -> Result<SolarReferenceHandle, CliError> {
    let explicit = flag.or(config.solar_spectrum_path.as_deref());
    Ok(load_solar_reference(explicit)?)
}

pub(super) fn emit_report(report: &EfficiencyReport, flags: &ReportFlags) -> Result<(), CliError> {
    if flags.json {
        println!("{}", to_pretty_json(report)?);
    } else {
        print!("{}", render_report(report));
    }

    if let Some(path) = &flags.curve {
        let curve = report.diode()?.sample_curve(CURVE_MAX_VOLTAGE, CURVE_POINTS)?;
        let table = render_columns(
            "# voltage_V current_A/m^2 power_W/m^2",
            &[
                curve.voltage.as_slice(),
                curve.current.as_slice(),
                curve.power.as_slice(),
            ],
        );
        write_text(path, &table)?;
        if !flags.json {
            println!("Current-voltage curve: {}", path.display());
        }
    }
    Ok(())
}

pub(super) fn render_report(report: &EfficiencyReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Efficiency: {:.4} %", report.efficiency * 100.0);
    let _ = writeln!(out, "Temperature: {:.2} K", report.temperature);
    let _ = writeln!(out, "Incident power: {:.3} W/m^2", report.power_in);
    let _ = writeln!(out, "J_sc: {:.6e} A/m^2", report.j_sc);
    let _ = writeln!(out, "J_0 (radiative): {:.6e} A/m^2", report.j_0_radiative);
    let _ = writeln!(out, "J_0: {:.6e} A/m^2", report.j_0);
    let _ = writeln!(out, "Radiative fraction: {:.6e}", report.radiative_fraction);
    let _ = writeln!(
        out,
        "Maximum power: {:.3} W/m^2 at {:.3} V",
        report.max_power, report.voltage_at_max_power
    );
    for warning in &report.warnings {
        let _ = writeln!(out, "WARNING: {warning}");
    }
    out
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SpectrumSummary {
    samples: usize,
    wavelength_min_nm: f64,
    wavelength_max_nm: f64,
    energy_min_ev: f64,
    energy_max_ev: f64,
    power_in: f64,
    total_power: f64,
    total_photon_flux: f64,
}

impl SpectrumSummary {
    pub(super) fn from_spectrum(power_in: f64, spectrum: &RadiationSpectrum) -> SlmeResult<Self> {
        let (wavelengths, _) = spectrum.to_wavelength_data();
        let energies = spectrum.energies();
        Ok(Self {
            samples: spectrum.len(),
            wavelength_min_nm: wavelengths[0] * NM_PER_M,
            wavelength_max_nm: wavelengths[wavelengths.len() - 1] * NM_PER_M,
            energy_min_ev: energies[0],
            energy_max_ev: energies[energies.len() - 1],
            power_in,
            total_power: spectrum.total_power()?,
            total_photon_flux: spectrum.total_photon_flux()?,
        })
    }

    pub(super) fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Samples: {}", self.samples);
        let _ = writeln!(
            out,
            "Wavelength range: {:.1} - {:.1} nm",
            self.wavelength_min_nm, self.wavelength_max_nm
        );
        let _ = writeln!(
            out,
            "Energy range: {:.4} - {:.4} eV",
            self.energy_min_ev, self.energy_max_ev
        );
        let _ = writeln!(out, "Incident power: {:.3} W/m^2", self.power_in);
        let _ = writeln!(out, "Integrated power (energy grid): {:.3} W/m^2", self.total_power);
        let _ = writeln!(
            out,
            "Photon flux: {:.6e} m^-2 s^-1",
            self.total_photon_flux
        );
        out
    }
}

pub(super) fn render_columns(header: &str, columns: &[&[f64]]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{header}");
    let rows = columns.iter().map(|column| column.len()).min().unwrap_or(0);
    for row in 0..rows {
        let line = columns
            .iter()
            .map(|column| format!("{:.10e}", column[row]))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, "{line}");
    }
    out
}

pub(super) fn write_text(path: &Path, content: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    fs::write(path, content)
        .with_context(|| format!("failed to write output '{}'", path.display()))?;
    Ok(())
}

pub(super) fn to_pretty_json(value: &impl Serialize) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value).context("failed to serialize report")?)
}

#[cfg(test)]
mod tests {
    use super::{SlmeDocument, render_columns};
    use slme_core::domain::SlmeErrorCategory;

    #[test]
    fn document_requires_exactly_one_absorption_source() {
        let document: SlmeDocument = serde_json::from_str(
            r#"{ "fundamentalGap": 1.1, "directGap": 1.2, "energies": [1.0, 2.0] }"#,
        )
        .expect("document");
        let error = document
            .absorption_spectrum()
            .expect_err("absorption is missing");
        assert_eq!(error.category(), SlmeErrorCategory::FormatError);
    }

    #[test]
    fn dielectric_documents_derive_absorption_in_metres() {
        let document: SlmeDocument = serde_json::from_str(
            r#"{
                "fundamentalGap": 1.0,
                "directGap": 1.0,
                "dielectric": {
                    "energies": [1.0, 2.0],
                    "real": [[3, 3, 3, 0, 0, 0], [3, 3, 3, 0, 0, 0]],
                    "imag": [[4, 4, 4, 0, 0, 0], [4, 4, 4, 0, 0, 0]]
                }
            }"#,
        )
        .expect("document");
        let (energies, absorption, derived) = document.absorption_spectrum().expect("spectrum");
        assert!(derived);
        assert_eq!(energies, vec![1.0, 2.0]);
        assert!(absorption[1] > absorption[0]);
        assert_eq!(document.band_gaps().expect("gaps").fundamental, 1.0);
    }

    #[test]
    fn columns_render_one_row_per_sample() {
        let table = render_columns("# a b", &[&[1.0, 2.0], &[3.0, 4.0]]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "# a b");
        assert_eq!(lines[1].split_whitespace().count(), 2);
    }
}
