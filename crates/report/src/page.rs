//! Report page model: what goes on each station's page, before any layout.

use loadtrack_recon::{AssignmentEvent, ScanEvent, StationReconciliation};

/// A LoadID paired with the time it was logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedLoad {
    pub load_id: String,
    pub time: String,
}

/// One station's page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPage {
    pub station: String,
    pub processor_id: String,
    pub assigned: Vec<TimedLoad>,
    pub scanned: Vec<TimedLoad>,
    pub has_mismatch: bool,
    /// Empty unless `has_mismatch`.
    pub missing: Vec<String>,
}

/// Build one page per reconciled station, in reconcile order.
///
/// Timestamps are looked up by re-filtering the logs for each station.
pub fn build_pages(
    stations: &[StationReconciliation],
    assignments: &[AssignmentEvent],
    scans: &[ScanEvent],
) -> Vec<ReportPage> {
    stations
        .iter()
        .map(|s| ReportPage {
            station: s.station.clone(),
            processor_id: s.processor_id.clone(),
            assigned: assignments
                .iter()
                .filter(|a| a.station == s.station)
                .map(|a| TimedLoad {
                    load_id: a.load_id.clone(),
                    time: a.time.clone(),
                })
                .collect(),
            scanned: scans
                .iter()
                .filter(|sc| sc.station == s.station)
                .map(|sc| TimedLoad {
                    load_id: sc.load_id.clone(),
                    time: sc.time.clone(),
                })
                .collect(),
            has_mismatch: s.has_mismatch,
            missing: if s.has_mismatch {
                s.missing_load_ids.clone()
            } else {
                Vec::new()
            },
        })
        .collect()
}
