// LoadTrack CLI - station LoadID assignment/scan reconciliation

mod exit_codes;
mod recon;
mod shell;
mod table;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use loadtrack_config::Settings;

use exit_codes::{EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_SUCCESS, EXIT_USAGE};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "LTRACK_LOG";

#[derive(Parser)]
#[command(name = "ltrack")]
#[command(about = "Track pallet LoadID assignments against station scans")]
#[command(version, long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LTRACK_BUILD_INFO"), ")"))]
struct Cli {
    /// Settings file (default: <config dir>/loadtrack/settings.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile assignment and scan logs read from CSV files
    Recon {
        #[command(subcommand)]
        command: recon::ReconCommands,
    },

    /// Start an interactive assign/scan session (nothing is saved)
    #[command(after_help = "\
Examples:
  ltrack shell
  printf 'assign PS001 L1\\nlogin 123456 PS001\\nscan L1\\nreport\\n' | ltrack shell")]
    Shell,

    /// List the configured station roster
    Stations,
}

pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn eval(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn config(err: loadtrack_config::ConfigError) -> Self {
        Self {
            code: EXIT_INVALID_CONFIG,
            message: err.to_string(),
            hint: Some(format!(
                "fix or remove {}, or pass --config",
                Settings::config_path().display()
            )),
        }
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings, CliError> {
    match path {
        Some(path) => Settings::load_from(path).map_err(|e| CliError {
            hint: None,
            ..CliError::config(e)
        }),
        None => Settings::load().map_err(CliError::config),
    }
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = load_settings(cli.config.as_ref()).and_then(|settings| {
        init_tracing(&settings);
        tracing::debug!(stations = settings.stations.len(), "settings loaded");

        match cli.command {
            None => {
                // No subcommand = show help
                eprintln!("Usage: ltrack <command> [options]");
                eprintln!("       ltrack --help for more information");
                Ok(())
            }
            Some(Commands::Recon { command }) => recon::cmd_recon(command, &settings),
            Some(Commands::Shell) => shell::cmd_shell(&settings),
            Some(Commands::Stations) => {
                if settings.stations.is_empty() {
                    return Err(CliError::args("no stations configured"));
                }
                for station in &settings.stations {
                    println!("{station}");
                }
                Ok(())
            }
        }
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = e.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(e.code)
        }
    }
}
