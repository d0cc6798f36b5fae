//! boris-restore CLI
//!
//! Thin command surface over the restore pipeline: resolves input and
//! output paths, guards against accidental overwrite, and maps
//! reconstruction errors to exit codes and stderr messages.

use clap::Parser;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use boris_restore::encoder;
use boris_restore::pipeline::restore_csv;
use boris_restore::{RestoreConfig, RestoreError, RESTORE_VERSION};

/// Rebuild a BORIS project file from a CSV export
#[derive(Parser)]
#[command(name = "boris-restore")]
#[command(version = RESTORE_VERSION)]
#[command(about = "Rebuild a BORIS project file from a CSV export", long_about = None)]
struct Cli {
    /// Path to the CSV export file
    csv_file: PathBuf,

    /// Overwrite an existing project file
    #[arg(short, long)]
    force: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e.message());
            if let Some(hint) = e.hint() {
                eprintln!("hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if !cli.csv_file.exists() {
        return Err(CliError::InputMissing(cli.csv_file));
    }

    let is_csv = cli
        .csv_file
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        eprintln!(
            "warning: {} does not have a .csv extension",
            cli.csv_file.display()
        );
    }

    let output = cli.csv_file.with_extension("boris");
    if output.exists() {
        if cli.force {
            eprintln!("warning: overwriting {}", output.display());
        } else {
            return Err(CliError::OutputExists(output));
        }
    }

    let content = fs::read_to_string(&cli.csv_file)?;

    let restored = restore_csv(&content, &RestoreConfig::default())?;
    eprintln!("Detected format: {}", restored.format.as_str());

    let json = encoder::to_json(&restored.project)?;
    fs::write(&output, json)?;

    println!("Restored: {}", output.display());
    Ok(())
}

// Error types

enum CliError {
    InputMissing(PathBuf),
    OutputExists(PathBuf),
    Io(io::Error),
    Restore(RestoreError),
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<RestoreError> for CliError {
    fn from(e: RestoreError) -> Self {
        CliError::Restore(e)
    }
}

impl CliError {
    fn message(&self) -> String {
        match self {
            CliError::InputMissing(path) => format!("{} not found", path.display()),
            CliError::OutputExists(path) => format!("{} already exists", path.display()),
            CliError::Io(e) => e.to_string(),
            CliError::Restore(e) => e.to_string(),
        }
    }

    fn hint(&self) -> Option<&'static str> {
        match self {
            CliError::InputMissing(_) => Some("check the path to the CSV export"),
            CliError::OutputExists(_) => {
                Some("pass -f/--force to overwrite, or remove the existing file")
            }
            CliError::Io(_) => Some("check file paths and permissions"),
            CliError::Restore(RestoreError::UnknownFormat) => {
                Some("only standard and aggregated exports can be restored")
            }
            CliError::Restore(_) => None,
        }
    }
}
