//! In-memory capture session: the two append-only logs plus the processor login.
//!
//! Nothing here is persisted. Dropping the session drops every event.

use crate::error::CaptureError;
use crate::model::{AssignmentEvent, ScanEvent, StationReconciliation};

/// Employee IDs are exactly this many characters.
pub const EMPLOYEE_ID_LEN: usize = 6;

/// Source of the wall-clock string stamped on each event.
pub type Clock = fn() -> String;

/// Local time as `h:mm:ss AM/PM`.
pub fn local_time() -> String {
    chrono::Local::now().format("%-I:%M:%S %p").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    pub employee_id: String,
    pub station: String,
}

#[derive(Debug)]
pub struct Session {
    assignments: Vec<AssignmentEvent>,
    scans: Vec<ScanEvent>,
    login: Option<Login>,
    clock: Clock,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_clock(local_time)
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            assignments: Vec::new(),
            scans: Vec::new(),
            login: None,
            clock,
        }
    }

    /// Record that `load_id` was designated to `station`. Never refused.
    pub fn assign(&mut self, station: &str, load_id: &str) -> &AssignmentEvent {
        let event = AssignmentEvent {
            station: station.to_string(),
            load_id: load_id.to_string(),
            time: (self.clock)(),
        };
        tracing::info!(station, load_id, time = %event.time, "pallet assigned");
        self.assignments.push(event);
        &self.assignments[self.assignments.len() - 1]
    }

    /// Log a processor in at a station. A refused login leaves any existing login in place.
    pub fn login(&mut self, employee_id: &str, station: &str) -> Result<&Login, CaptureError> {
        let employee_id_len = employee_id.chars().count();
        let station_missing = station.trim().is_empty();
        if employee_id_len != EMPLOYEE_ID_LEN || station_missing {
            tracing::warn!(employee_id_len, station_missing, "login refused");
            return Err(CaptureError::InvalidLogin { employee_id_len, station_missing });
        }

        tracing::info!(employee_id, station, "processor logged in");
        Ok(&*self.login.insert(Login {
            employee_id: employee_id.to_string(),
            station: station.to_string(),
        }))
    }

    /// Record a scan at the logged-in station, attributed to the logged-in employee.
    pub fn scan(&mut self, load_id: &str) -> Result<&ScanEvent, CaptureError> {
        let Some(login) = &self.login else {
            tracing::warn!(load_id, "scan refused: not logged in");
            return Err(CaptureError::NotLoggedIn);
        };

        let event = ScanEvent {
            station: login.station.clone(),
            load_id: load_id.to_string(),
            processor_id: login.employee_id.clone(),
            time: (self.clock)(),
        };
        tracing::info!(
            station = %event.station,
            load_id,
            processor_id = %event.processor_id,
            "load scanned"
        );
        self.scans.push(event);
        Ok(&self.scans[self.scans.len() - 1])
    }

    pub fn logout(&mut self) {
        if let Some(login) = self.login.take() {
            tracing::info!(employee_id = %login.employee_id, station = %login.station, "processor logged out");
        }
    }

    pub fn current_login(&self) -> Option<&Login> {
        self.login.as_ref()
    }

    pub fn assignments(&self) -> &[AssignmentEvent] {
        &self.assignments
    }

    pub fn scans(&self) -> &[ScanEvent] {
        &self.scans
    }

    /// Recomputed from the logs on every call.
    pub fn reconcile(&self) -> Vec<StationReconciliation> {
        crate::engine::reconcile(&self.assignments, &self.scans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_clock() -> String {
        "10:30:00 AM".into()
    }

    fn session() -> Session {
        Session::with_clock(fixed_clock)
    }

    #[test]
    fn assign_stamps_time() {
        let mut s = session();
        let event = s.assign("PS001", "L1").clone();
        assert_eq!(event.time, "10:30:00 AM");
        assert_eq!(s.assignments(), &[event]);
    }

    #[test]
    fn assign_accepts_empty_fields() {
        let mut s = session();
        s.assign("", "");
        assert_eq!(s.assignments().len(), 1);
    }

    #[test]
    fn login_requires_six_characters() {
        let mut s = session();
        for bad in ["", "12345", "1234567"] {
            let err = s.login(bad, "PS001").unwrap_err();
            assert!(matches!(err, CaptureError::InvalidLogin { station_missing: false, .. }));
            assert!(s.current_login().is_none());
        }
        assert!(s.login("123456", "PS001").is_ok());
    }

    #[test]
    fn login_counts_characters_not_bytes() {
        let mut s = session();
        assert!(s.login("ÉÉÉÉÉÉ", "PS001").is_ok());
    }

    #[test]
    fn login_requires_station() {
        let mut s = session();
        let err = s.login("123456", "").unwrap_err();
        assert_eq!(err, CaptureError::InvalidLogin { employee_id_len: 6, station_missing: true });
        assert!(s.current_login().is_none());
    }

    #[test]
    fn refused_login_keeps_previous_login() {
        let mut s = session();
        s.login("123456", "PS001").unwrap();
        assert!(s.login("12", "PS002").is_err());
        assert_eq!(s.current_login().unwrap().station, "PS001");
    }

    #[test]
    fn scan_requires_login() {
        let mut s = session();
        assert_eq!(s.scan("L1").unwrap_err(), CaptureError::NotLoggedIn);
        assert!(s.scans().is_empty());
    }

    #[test]
    fn scan_uses_logged_in_identity() {
        let mut s = session();
        s.login("654321", "PS007").unwrap();
        let event = s.scan("L9").unwrap();
        assert_eq!(event.station, "PS007");
        assert_eq!(event.processor_id, "654321");
        assert_eq!(event.time, "10:30:00 AM");
    }

    #[test]
    fn logout_keeps_logs() {
        let mut s = session();
        s.assign("PS001", "L1");
        s.login("123456", "PS001").unwrap();
        s.scan("L1").unwrap();
        s.logout();

        assert!(s.current_login().is_none());
        assert_eq!(s.assignments().len(), 1);
        assert_eq!(s.scans().len(), 1);
        assert_eq!(s.scan("L2").unwrap_err(), CaptureError::NotLoggedIn);
    }

    #[test]
    fn reconcile_reflects_current_logs() {
        let mut s = session();
        s.assign("A", "L1");
        s.assign("A", "L2");
        s.login("E10001", "A").unwrap();
        s.scan("L1").unwrap();

        let first = s.reconcile();
        assert_eq!(first[0].missing_load_ids, vec!["L2"]);
        assert_eq!(first, s.reconcile());

        s.scan("L2").unwrap();
        assert!(!s.reconcile()[0].has_mismatch);
    }

    #[test]
    fn local_time_shape() {
        let t = local_time();
        assert!(t.ends_with("AM") || t.ends_with("PM"), "{t}");
        assert_eq!(t.matches(':').count(), 2);
    }
}
