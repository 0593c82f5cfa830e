//! Netsec CLI - demonstration and packaging front end for netsec-core
//!
//! Provides a `netsec` command that exercises contextual error capture and
//! reads the package's build metadata.

mod commands;

use clap::{Parser, Subcommand};
use netsec_core::{logging, NetsecConfig, Reporter};
use std::path::PathBuf;
use std::process::ExitCode;

/// Netsec CLI - contextual error capture
#[derive(Parser, Debug)]
#[command(name = "netsec", author, version, about = "Netsec - contextual error capture")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Configuration file (merged over ~/.netsec/config.toml and ./.netsecrc)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trigger a failure inside a guarded region and report it
    ///
    /// Divides 1 by the divisor. With the default divisor of 0 this fails,
    /// prints the diagnostic and exits non-zero.
    Demo {
        /// Divisor for `1 / divisor`
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        divisor: i32,

        /// Also print the diagnostic as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// List the requirements declared in a requirements file
    Requirements {
        /// Requirements file (defaults to ./requirements.txt)
        path: Option<PathBuf>,
    },

    /// Show package metadata
    Package {
        /// Project root (defaults to the current directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = NetsecConfig::discover_and_load(args.config.as_deref())?;
    if let Some(level) = args.log_level {
        config.logging.level = level.to_ascii_lowercase();
        config.validate()?;
    }

    logging::init(&config.logging)?;

    let reporter = Reporter::from_config(&config.capture, &config.render);
    tracing::debug!(probe = reporter.probe_name(), "Reporter ready");

    match args.command {
        Command::Demo { divisor, json } => commands::demo::execute(&reporter, divisor, json),
        Command::Requirements { path } => commands::requirements::execute(path),
        Command::Package { root } => commands::package::execute(root),
        Command::Config => commands::config::execute(&config),
    }
}
