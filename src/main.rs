use std::{
    fs::File,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use openqxf::{hash::hash_definition_to_string, ValidatedFixture};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { files } => Ok(check(&files)),
        Commands::Fingerprint { file } => fingerprint(&file),
    }
}

/// Loads every file and reports problems. Fails if any file can't be loaded
/// or saved again.
fn check(files: &[PathBuf]) -> ExitCode {
    let mut failed = 0;
    for path in files {
        let validated = match ValidatedFixture::from_path(path) {
            Ok(v) => v,
            Err(e) => {
                println!("{}: {e}", path.display());
                failed += 1;
                continue;
            }
        };
        for problem in validated.problems() {
            println!("{}: {problem}", path.display());
        }
        let errors = validated.fixture().validate_for_save();
        for error in &errors {
            println!("{}: {error}", path.display());
        }
        if !errors.is_empty() {
            failed += 1;
        }
    }
    tracing::info!(checked = files.len(), failed, "check finished");
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn fingerprint(path: &Path) -> anyhow::Result<ExitCode> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    println!("{}", hash_definition_to_string(file)?);
    Ok(ExitCode::SUCCESS)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Checks QLC+ fixture definitions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load fixture definitions and print every problem found in them.
    Check {
        /// Definition files (.qxf) to check.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the hash of a definition file.
    Fingerprint {
        file: PathBuf,
    },
}
