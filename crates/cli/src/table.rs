//! Plain-text tables for the three on-screen views.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use loadtrack_recon::{AssignmentEvent, ScanEvent, StationReconciliation};

/// Cells wider than this are truncated with "..". The last column is never
/// truncated.
const MAX_COL_WIDTH: usize = 32;
const COL_GAP: &str = "  ";

pub(crate) struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub(crate) fn new(headers: Vec<&'static str>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    pub(crate) fn push(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }

    pub(crate) fn render(&self) -> String {
        let last = self.headers.len().saturating_sub(1);
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let widest = self
                    .rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| UnicodeWidthStr::width(c.as_str()))
                    .chain(std::iter::once(UnicodeWidthStr::width(*h)))
                    .max()
                    .unwrap_or(0);
                if i == last {
                    widest
                } else {
                    widest.min(MAX_COL_WIDTH)
                }
            })
            .collect();

        let mut out = String::new();
        let header_cells: Vec<String> = self.headers.iter().map(|h| h.to_string()).collect();
        push_line(&mut out, &header_cells, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);
        for row in &self.rows {
            push_line(&mut out, row, &widths);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells.iter().zip(widths).map(|(c, w)| pad_right(c, *w)).collect();
    out.push_str(line.join(COL_GAP).trim_end());
    out.push('\n');
}

/// Truncate a string to fit within `width` display columns, adding ".." if truncated.
fn truncate_display(s: &str, width: usize) -> String {
    if UnicodeWidthStr::width(s) <= width {
        return s.to_string();
    }
    let budget = width.saturating_sub(2);
    let mut used = 0;
    let mut end = 0;
    for (i, ch) in s.char_indices() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        end = i + ch.len_utf8();
    }
    format!("{}..", &s[..end])
}

/// Pad or truncate a string to exactly `width` display columns.
fn pad_right(s: &str, width: usize) -> String {
    let cell = truncate_display(s, width);
    let w = UnicodeWidthStr::width(cell.as_str());
    format!("{cell}{}", " ".repeat(width.saturating_sub(w)))
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

pub(crate) fn assignments_table(assignments: &[AssignmentEvent]) -> String {
    let mut t = Table::new(vec!["Station", "LoadID", "Time"]);
    for a in assignments {
        t.push(vec![a.station.clone(), a.load_id.clone(), a.time.clone()]);
    }
    t.render()
}

pub(crate) fn scans_table(scans: &[ScanEvent]) -> String {
    let mut t = Table::new(vec!["Station", "LoadID", "Processor", "Time"]);
    for s in scans {
        t.push(vec![
            s.station.clone(),
            s.load_id.clone(),
            s.processor_id.clone(),
            s.time.clone(),
        ]);
    }
    t.render()
}

pub(crate) fn summary_table(stations: &[StationReconciliation]) -> String {
    let mut t = Table::new(vec![
        "Station",
        "Processor",
        "Pallets Assigned",
        "LoadIDs Scanned",
        "Mismatch",
        "Missing LoadIDs",
    ]);
    for s in stations {
        t.push(vec![
            s.station.clone(),
            s.processor_id.clone(),
            s.assigned_load_ids.len().to_string(),
            s.scanned_load_ids.len().to_string(),
            s.mismatch_label().to_string(),
            s.missing_load_ids.join(", "),
        ]);
    }
    t.render()
}
