use std::fmt;

/// Errors raised while loading assignment/scan logs from CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// Required header absent from a log file.
    MissingColumn { log: String, column: String },
    /// Malformed CSV record.
    Csv {
        log: String,
        line: Option<u64>,
        message: String,
    },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn { log, column } => {
                write!(f, "{log} log: missing column '{column}'")
            }
            Self::Csv { log, line: Some(line), message } => {
                write!(f, "{log} log, line {line}: {message}")
            }
            Self::Csv { log, line: None, message } => write!(f, "{log} log: {message}"),
        }
    }
}

impl std::error::Error for ReconError {}

/// User-visible validation failures from the capture session.
///
/// These are the only two ways an action can be refused; a refused action
/// never changes session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// Scan attempted without a logged-in station and employee ID.
    NotLoggedIn,
    /// Login attempted with a malformed employee ID or no station.
    InvalidLogin { employee_id_len: usize, station_missing: bool },
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotLoggedIn => {
                write!(f, "please log in with your employee ID and station before scanning")
            }
            Self::InvalidLogin { station_missing: true, .. } => {
                write!(f, "please select your station")
            }
            Self::InvalidLogin { employee_id_len, .. } => write!(
                f,
                "employee ID must be exactly {} characters (got {employee_id_len})",
                crate::session::EMPLOYEE_ID_LEN
            ),
        }
    }
}

impl std::error::Error for CaptureError {}
