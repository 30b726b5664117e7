use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ReportError {
    /// Document construction or serialization failed.
    Pdf(String),
    /// Saving the report to disk failed.
    Io { path: PathBuf, message: String },
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf(msg) => write!(f, "PDF error: {msg}"),
            Self::Io { path, message } => write!(f, "{}: {message}", path.display()),
        }
    }
}

impl std::error::Error for ReportError {}
