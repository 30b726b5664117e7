//! `loadtrack-report` - per-station discrepancy report export.
//!
//! [`build_pages`] turns a reconcile result plus the raw logs into a page
//! model; [`render_pdf`] lays it out, one page per station.

pub mod error;
pub mod page;
pub mod pdf;

pub use error::ReportError;
pub use page::{build_pages, ReportPage, TimedLoad};
pub use pdf::{render_pdf, write_report, REPORT_FILE_NAME};
