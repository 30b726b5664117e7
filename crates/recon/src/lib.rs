//! `loadtrack-recon` - station LoadID reconciliation engine.
//!
//! Pure engine crate: holds the assignment/scan logs, diffs them per station,
//! and loads logs from CSV text. No CLI, PDF or filesystem dependencies.

pub mod engine;
pub mod error;
pub mod model;
pub mod session;
pub mod summary;

pub use engine::{load_assignments_csv, load_scans_csv, reconcile, run};
pub use error::{CaptureError, ReconError};
pub use model::{AssignmentEvent, ReconReport, ReconSummary, ScanEvent, StationReconciliation};
pub use session::Session;
