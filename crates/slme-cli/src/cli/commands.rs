use super::CliError;
use super::helpers::*;
use slme_core::modules::dielectric::{absorption_coefficient, load_dielectric_tensor};
use slme_core::modules::efficiency::{
    SlmeInput, SqInput, VoltageClimb, shockley_queisser_limit, slme,
};
use slme_core::modules::spectrum::RadiationSpectrum;
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct SqArgs {
    /// Band gap in eV
    #[arg(long)]
    gap: f64,

    /// Cell temperature in K (default: config temperature)
    #[arg(long)]
    temperature: Option<f64>,

    /// Radiative fraction dividing the radiative saturation current
    #[arg(long, default_value_t = 1.0)]
    radiative_fraction: f64,

    #[command(flatten)]
    report: ReportFlags,
}

#[derive(clap::Args)]
pub(super) struct SlmeArgs {
    /// JSON document with an absorption spectrum or dielectric data plus band gaps
    #[arg(long)]
    input: PathBuf,

    /// Film thickness in m (default: config thickness)
    #[arg(long)]
    thickness: Option<f64>,

    /// Cell temperature in K (default: config temperature)
    #[arg(long)]
    temperature: Option<f64>,

    /// Absorption coefficients are given in cm^-1
    #[arg(long)]
    inverse_cm: bool,

    /// Keep absorption below the direct-allowed gap
    #[arg(long)]
    no_cutoff: bool,

    #[command(flatten)]
    report: ReportFlags,
}

#[derive(clap::Args)]
pub(super) struct AbsorptionArgs {
    /// Dielectric data JSON (component rows or 3x3 tensors)
    #[arg(long)]
    input: PathBuf,

    /// Output table path (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct SpectrumArgs {
    /// Reference solar spectrum table
    #[arg(long)]
    spectrum: Option<PathBuf>,

    /// Efficiency config JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
pub(super) struct ReportFlags {
    /// Reference solar spectrum table (two header lines; nm, W m^-2 nm^-1)
    #[arg(long)]
    pub(super) spectrum: Option<PathBuf>,

    /// Efficiency config JSON
    #[arg(long)]
    pub(super) config: Option<PathBuf>,

    /// Write the current-voltage curve (V, J, P) to this path
    #[arg(long)]
    pub(super) curve: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub(super) json: bool,
}

pub(super) fn run_sq_command(args: SqArgs) -> Result<i32, CliError> {
    let config = load_cli_config(args.report.config.as_deref())?;
    let reference = load_reference(args.report.spectrum.as_deref(), &config)?;

    let input = SqInput::new(args.gap, args.temperature.unwrap_or(config.temperature))
        .with_radiative_fraction(args.radiative_fraction)
        .with_climb(VoltageClimb::from_config(&config));
    let report = shockley_queisser_limit(&reference, &input)?;

    emit_report(&report, &args.report)?;
    Ok(0)
}

pub(super) fn run_slme_command(args: SlmeArgs) -> Result<i32, CliError> {
    let mut config = load_cli_config(args.report.config.as_deref())?;
    if let Some(thickness) = args.thickness {
        config.thickness = thickness;
    }
    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
    }
    if args.inverse_cm {
        config.absorbance_in_inverse_cm = true;
    }
    if args.no_cutoff {
        config.cutoff_below_gap = false;
    }

    let document = load_slme_document(&args.input)?;
    let (energies, absorption, from_dielectric) = document.absorption_spectrum()?;
    tracing::debug!(
        input = %args.input.display(),
        samples = energies.len(),
        from_dielectric,
        "loaded SLME input"
    );
    if from_dielectric {
        // Coefficients derived from dielectric data are already in m^-1.
        config.absorbance_in_inverse_cm = false;
    }
    let reference = load_reference(args.report.spectrum.as_deref(), &config)?;

    let input = SlmeInput::from_config(energies, absorption, document.band_gaps()?, &config);
    let report = slme(&reference, &input)?;

    emit_report(&report, &args.report)?;
    Ok(0)
}

pub(super) fn run_absorption_command(args: AbsorptionArgs) -> Result<i32, CliError> {
    let tensor = load_dielectric_tensor(&args.input)?;
    let (energies, coefficients) = absorption_coefficient(&tensor)?;
    let table = render_columns(
        "# energy_eV absorption_m^-1",
        &[energies.as_slice(), coefficients.as_slice()],
    );

    match args.output {
        Some(path) => {
            write_text(&path, &table)?;
            println!("Absorption table: {}", path.display());
        }
        None => print!("{table}"),
    }
    Ok(0)
}

pub(super) fn run_spectrum_command(args: SpectrumArgs) -> Result<i32, CliError> {
    let config = load_cli_config(args.config.as_deref())?;
    let explicit = args.spectrum.as_deref().or(config.solar_spectrum_path.as_deref());
    let reference = load_reference(explicit, &config)?;
    let spectrum = match explicit {
        Some(_) => RadiationSpectrum::from_solar_reference(&reference)?,
        None => RadiationSpectrum::am15g()?,
    };
    let summary = SpectrumSummary::from_spectrum(reference.power_in(), &spectrum)?;

    if args.json {
        println!("{}", to_pretty_json(&summary)?);
    } else {
        print!("{}", summary.render_human());
    }
    Ok(0)
}
