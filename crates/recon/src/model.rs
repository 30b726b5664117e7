use serde::Serialize;

/// Displayed processor identity for a station nobody has scanned at.
pub const NO_PROCESSOR: &str = "N/A";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A LoadID designated to a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentEvent {
    pub station: String,
    pub load_id: String,
    pub time: String,
}

/// A LoadID observed at a station by a logged-in processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanEvent {
    pub station: String,
    pub load_id: String,
    pub processor_id: String,
    pub time: String,
}

// ---------------------------------------------------------------------------
// Per-station result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationReconciliation {
    pub station: String,
    /// Processor of the most recent scan at this station, or [`NO_PROCESSOR`].
    pub processor_id: String,
    pub assigned_load_ids: Vec<String>,
    pub scanned_load_ids: Vec<String>,
    /// Assigned LoadIDs that never appear among the scanned ones.
    pub missing_load_ids: Vec<String>,
    pub has_mismatch: bool,
}

impl StationReconciliation {
    pub fn mismatch_label(&self) -> &'static str {
        if self.has_mismatch {
            "Yes"
        } else {
            "No"
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub stations: usize,
    pub mismatched_stations: usize,
    pub assigned_total: usize,
    pub scanned_total: usize,
    pub missing_total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub stations: Vec<StationReconciliation>,
}
