//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 1    | General error (unspecified)                      |
//! | 2    | CLI usage error (bad args, missing file)         |
//! | 3    | Reconciliation found at least one mismatch       |
//! | 4    | Assignment/scan log could not be parsed          |
//! | 5    | Report export failed                             |
//! | 6    | Settings file invalid                            |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable input file.
pub const EXIT_USAGE: u8 = 2;

/// At least one station has assigned LoadIDs that were never scanned.
pub const EXIT_RECON_MISMATCH: u8 = 3;

/// A CSV log is missing a column or has a malformed record.
pub const EXIT_RECON_PARSE: u8 = 4;

/// Rendering or writing the PDF report failed.
pub const EXIT_EXPORT_FAILED: u8 = 5;

/// Settings file unreadable or invalid.
pub const EXIT_INVALID_CONFIG: u8 = 6;
