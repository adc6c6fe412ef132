mod commands;
mod helpers;

use clap::Parser;
use slme_core::domain::SlmeError;
use tracing_subscriber::EnvFilter;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let compatibility_error = error.as_slme_error();
            eprintln!("{}", compatibility_error.diagnostic_line());
            if let Some(summary_line) = compatibility_error.fatal_exit_line() {
                eprintln!("{}", summary_line);
            }
            compatibility_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("slme".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            init_tracing(cli.verbose);
            dispatch_parsed(cli.command)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "slme",
    version,
    about = "Shockley-Queisser and SLME photovoltaic efficiency limits"
)]
struct Cli {
    /// Raise log verbosity to debug (RUST_LOG applies otherwise)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Shockley-Queisser limit for a single band gap
    Sq(commands::SqArgs),
    /// Spectroscopic limited maximum efficiency from an absorption spectrum
    Slme(commands::SlmeArgs),
    /// Absorption coefficient table from dielectric tensor data
    Absorption(commands::AbsorptionArgs),
    /// Summary of the reference solar spectrum
    Spectrum(commands::SpectrumArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Sq(args) => commands::run_sq_command(args),
        CliCommand::Slme(args) => commands::run_slme_command(args),
        CliCommand::Absorption(args) => commands::run_absorption_command(args),
        CliCommand::Spectrum(args) => commands::run_spectrum_command(args),
    }
}

fn init_tracing(verbose: u8) {
    let filter = if verbose > 0 {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A subscriber may already be installed when `run` is called repeatedly.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(#[from] SlmeError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_slme_error(&self) -> SlmeError {
        match self {
            Self::Usage(message) => SlmeError::input_validation("INPUT.CLI_USAGE", message.clone()),
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => SlmeError::parse_failure("IO.CLI", format!("{error:#}")),
        }
    }
}
