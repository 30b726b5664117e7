//! `ltrack recon` - reconcile assignment/scan logs read from CSV files.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use loadtrack_config::Settings;
use loadtrack_recon::{AssignmentEvent, ScanEvent};

use crate::exit_codes::{EXIT_EXPORT_FAILED, EXIT_RECON_MISMATCH, EXIT_RECON_PARSE, EXIT_USAGE};
use crate::table::summary_table;
use crate::CliError;

#[derive(Subcommand)]
pub enum ReconCommands {
    /// Reconcile an assignment log against a scan log
    #[command(after_help = "\
Log formats (CSV with headers, column order free):
  assignments: station,load_id,time
  scans:       station,load_id,processor_id,time

Exit code 3 when any station has assigned LoadIDs that were never scanned.

Examples:
  ltrack recon run --assignments assignments.csv --scans scans.csv
  ltrack recon run --assignments assignments.csv --scans scans.csv --json
  ltrack recon run --assignments assignments.csv --scans scans.csv --output result.json")]
    Run {
        /// Assignment log (CSV)
        #[arg(long)]
        assignments: PathBuf,

        /// Scan log (CSV)
        #[arg(long)]
        scans: PathBuf,

        /// Output JSON to stdout instead of the summary table
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Export the per-station discrepancy report as PDF
    #[command(after_help = "\
Writes one page per station to discrepency-report.pdf (see settings
report.file_name) in --out, or report.output_dir, or the current directory.

Examples:
  ltrack recon export --assignments assignments.csv --scans scans.csv
  ltrack recon export --assignments assignments.csv --scans scans.csv --out reports/")]
    Export {
        /// Assignment log (CSV)
        #[arg(long)]
        assignments: PathBuf,

        /// Scan log (CSV)
        #[arg(long)]
        scans: PathBuf,

        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub fn cmd_recon(cmd: ReconCommands, settings: &Settings) -> Result<(), CliError> {
    match cmd {
        ReconCommands::Run { assignments, scans, json, output } => {
            cmd_recon_run(&assignments, &scans, json, output)
        }
        ReconCommands::Export { assignments, scans, out } => {
            cmd_recon_export(&assignments, &scans, out, settings)
        }
    }
}

fn recon_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn read_log(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| recon_err(EXIT_USAGE, format!("cannot read {}: {e}", path.display())))
}

fn load_logs(
    assignments_path: &Path,
    scans_path: &Path,
) -> Result<(Vec<AssignmentEvent>, Vec<ScanEvent>), CliError> {
    let assignments = loadtrack_recon::load_assignments_csv(&read_log(assignments_path)?)
        .map_err(|e| recon_err(EXIT_RECON_PARSE, format!("{}: {e}", assignments_path.display())))?;
    let scans = loadtrack_recon::load_scans_csv(&read_log(scans_path)?)
        .map_err(|e| recon_err(EXIT_RECON_PARSE, format!("{}: {e}", scans_path.display())))?;

    tracing::debug!(assignments = assignments.len(), scans = scans.len(), "loaded logs");
    Ok((assignments, scans))
}

fn cmd_recon_run(
    assignments_path: &Path,
    scans_path: &Path,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let (assignments, scans) = load_logs(assignments_path, scans_path)?;
    let result = loadtrack_recon::run(&assignments, &scans);

    if json_output || output_file.is_some() {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::eval(format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = output_file {
            std::fs::write(path, &json_str).map_err(|e| {
                recon_err(EXIT_USAGE, format!("cannot write {}: {e}", path.display()))
            })?;
            eprintln!("wrote {}", path.display());
        }

        if json_output {
            println!("{json_str}");
        }
    }

    if !json_output {
        print!("{}", summary_table(&result.stations));
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "{} station(s): {} with mismatches, {} assigned, {} scanned, {} missing",
        s.stations, s.mismatched_stations, s.assigned_total, s.scanned_total, s.missing_total,
    );

    if s.mismatched_stations > 0 {
        return Err(recon_err(EXIT_RECON_MISMATCH, "mismatches found"));
    }
    Ok(())
}

fn cmd_recon_export(
    assignments_path: &Path,
    scans_path: &Path,
    out: Option<PathBuf>,
    settings: &Settings,
) -> Result<(), CliError> {
    let (assignments, scans) = load_logs(assignments_path, scans_path)?;
    let dir = out.unwrap_or_else(|| settings.output_dir());
    let path = export_report(&assignments, &scans, &dir, settings)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

/// Reconcile, lay out one page per station, and save the PDF under `dir`.
pub(crate) fn export_report(
    assignments: &[AssignmentEvent],
    scans: &[ScanEvent],
    dir: &Path,
    settings: &Settings,
) -> Result<PathBuf, CliError> {
    let stations = loadtrack_recon::reconcile(assignments, scans);
    let pages = loadtrack_report::build_pages(&stations, assignments, scans);
    let bytes = loadtrack_report::render_pdf(&pages)
        .map_err(|e| recon_err(EXIT_EXPORT_FAILED, e.to_string()))?;
    loadtrack_report::write_report(&bytes, dir, &settings.report.file_name)
        .map_err(|e| recon_err(EXIT_EXPORT_FAILED, e.to_string()))
}
