use crate::model::{ReconSummary, StationReconciliation};

/// Compute summary statistics from per-station results.
pub fn summarize(stations: &[StationReconciliation]) -> ReconSummary {
    let mut summary = ReconSummary {
        stations: stations.len(),
        ..ReconSummary::default()
    };

    for s in stations {
        if s.has_mismatch {
            summary.mismatched_stations += 1;
        }
        summary.assigned_total += s.assigned_load_ids.len();
        summary.scanned_total += s.scanned_load_ids.len();
        summary.missing_total += s.missing_load_ids.len();
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(assigned: &[&str], scanned: &[&str], missing: &[&str]) -> StationReconciliation {
        let owned = |ids: &[&str]| ids.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        StationReconciliation {
            station: "PS001".into(),
            processor_id: "N/A".into(),
            assigned_load_ids: owned(assigned),
            scanned_load_ids: owned(scanned),
            missing_load_ids: owned(missing),
            has_mismatch: !missing.is_empty(),
        }
    }

    #[test]
    fn summary_counts() {
        let stations = vec![
            station(&["L1", "L2"], &["L1"], &["L2"]),
            station(&["L3"], &["L3", "L4"], &[]),
            station(&[], &["L5"], &[]),
        ];
        let summary = summarize(&stations);
        assert_eq!(summary.stations, 3);
        assert_eq!(summary.mismatched_stations, 1);
        assert_eq!(summary.assigned_total, 3);
        assert_eq!(summary.scanned_total, 4);
        assert_eq!(summary.missing_total, 1);
    }

    #[test]
    fn empty_summary() {
        assert_eq!(summarize(&[]), ReconSummary::default());
    }
}
