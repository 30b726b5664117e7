use std::collections::{HashMap, HashSet};

use crate::error::ReconError;
use crate::model::{
    AssignmentEvent, ReconMeta, ReconReport, ScanEvent, StationReconciliation, NO_PROCESSOR,
};
use crate::summary::summarize;

/// Per-station accumulator. Borrows from the logs for the duration of one pass.
struct StationGroup<'a> {
    station: &'a str,
    assigned: Vec<&'a str>,
    scanned: Vec<&'a str>,
    processor_id: Option<&'a str>,
}

/// Group both logs by station and diff assigned against scanned LoadIDs.
///
/// Stations come out in first-seen order, assignments walked before scans.
/// The displayed processor is whoever scanned last at the station.
pub fn reconcile(assignments: &[AssignmentEvent], scans: &[ScanEvent]) -> Vec<StationReconciliation> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<StationGroup<'_>> = Vec::new();

    fn group_for<'a, 'g>(
        index: &mut HashMap<&'a str, usize>,
        groups: &'g mut Vec<StationGroup<'a>>,
        station: &'a str,
    ) -> &'g mut StationGroup<'a> {
        let slot = *index.entry(station).or_insert_with(|| {
            groups.push(StationGroup {
                station,
                assigned: Vec::new(),
                scanned: Vec::new(),
                processor_id: None,
            });
            groups.len() - 1
        });
        &mut groups[slot]
    }

    for a in assignments {
        group_for(&mut index, &mut groups, &a.station).assigned.push(a.load_id.as_str());
    }
    for s in scans {
        let group = group_for(&mut index, &mut groups, &s.station);
        group.scanned.push(s.load_id.as_str());
        group.processor_id = Some(s.processor_id.as_str());
    }

    groups
        .into_iter()
        .map(|g| {
            let scanned: HashSet<&str> = g.scanned.iter().copied().collect();
            let missing: Vec<String> = g
                .assigned
                .iter()
                .filter(|id| !scanned.contains(*id))
                .map(|id| id.to_string())
                .collect();

            StationReconciliation {
                station: g.station.to_string(),
                processor_id: g.processor_id.unwrap_or(NO_PROCESSOR).to_string(),
                assigned_load_ids: g.assigned.iter().map(|id| id.to_string()).collect(),
                scanned_load_ids: g.scanned.iter().map(|id| id.to_string()).collect(),
                has_mismatch: !missing.is_empty(),
                missing_load_ids: missing,
            }
        })
        .collect()
}

/// Reconcile and attach summary + run metadata.
pub fn run(assignments: &[AssignmentEvent], scans: &[ScanEvent]) -> ReconReport {
    let stations = reconcile(assignments, scans);
    let summary = summarize(&stations);

    tracing::debug!(
        stations = summary.stations,
        mismatched = summary.mismatched_stations,
        missing = summary.missing_total,
        "reconciled"
    );

    ReconReport {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        stations,
    }
}

// ---------------------------------------------------------------------------
// CSV log loading
// ---------------------------------------------------------------------------

const ASSIGNMENTS_LOG: &str = "assignments";
const SCANS_LOG: &str = "scans";

/// Header-indexed view over a CSV log. Column order is free; extra columns are ignored.
struct LogReader<'a> {
    log: &'static str,
    reader: csv::Reader<&'a [u8]>,
    headers: Vec<String>,
}

impl<'a> LogReader<'a> {
    fn new(log: &'static str, csv_data: &'a str) -> Result<Self, ReconError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(csv_data.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| csv_error(log, e))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        Ok(Self { log, reader, headers })
    }

    fn idx(&self, name: &str) -> Result<usize, ReconError> {
        self.headers.iter().position(|h| h == name).ok_or_else(|| ReconError::MissingColumn {
            log: self.log.into(),
            column: name.into(),
        })
    }

    /// Collect each record's values at `columns`, in that order.
    /// A log with no header row at all is an empty log.
    fn rows<const N: usize>(mut self, columns: [&str; N]) -> Result<Vec<[String; N]>, ReconError> {
        if self.headers.is_empty() {
            return Ok(Vec::new());
        }

        let mut indices = [0usize; N];
        for (slot, name) in indices.iter_mut().zip(columns) {
            *slot = self.idx(name)?;
        }

        let log = self.log;
        let mut rows = Vec::new();
        for record in self.reader.records() {
            let record = record.map_err(|e| csv_error(log, e))?;
            rows.push(indices.map(|i| record.get(i).unwrap_or("").to_string()));
        }
        Ok(rows)
    }
}

fn csv_error(log: &str, err: csv::Error) -> ReconError {
    ReconError::Csv {
        log: log.into(),
        line: err.position().map(|p| p.line()),
        message: err.to_string(),
    }
}

/// Parse an assignment log with columns `station,load_id,time`.
pub fn load_assignments_csv(csv_data: &str) -> Result<Vec<AssignmentEvent>, ReconError> {
    let rows = LogReader::new(ASSIGNMENTS_LOG, csv_data)?.rows(["station", "load_id", "time"])?;
    Ok(rows
        .into_iter()
        .map(|[station, load_id, time]| AssignmentEvent { station, load_id, time })
        .collect())
}

/// Parse a scan log with columns `station,load_id,processor_id,time`.
pub fn load_scans_csv(csv_data: &str) -> Result<Vec<ScanEvent>, ReconError> {
    let rows = LogReader::new(SCANS_LOG, csv_data)?
        .rows(["station", "load_id", "processor_id", "time"])?;
    Ok(rows
        .into_iter()
        .map(|[station, load_id, processor_id, time]| ScanEvent {
            station,
            load_id,
            processor_id,
            time,
        })
        .collect())
}
