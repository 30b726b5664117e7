//! PDF rendering via `printpdf`. One A4 page per station, built-in Helvetica.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rgb};

use crate::error::ReportError;
use crate::page::{ReportPage, TimedLoad};

/// File name the report is saved under.
pub const REPORT_FILE_NAME: &str = "discrepency-report.pdf";

const DOCUMENT_TITLE: &str = "Discrepancy Report";

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const LEFT: f32 = 20.0;
const INDENT: f32 = 25.0;
const TOP: f32 = 277.0;
const BOTTOM: f32 = 20.0;
const TITLE_STEP: f32 = 12.0;
const LINE_STEP: f32 = 5.5;

/// Body lines that fit between the title and the bottom margin.
pub(crate) const LINES_PER_PAGE: usize = ((TOP - TITLE_STEP - BOTTOM) / LINE_STEP) as usize;

const TITLE_SIZE: f32 = 16.0;
const LABEL_SIZE: f32 = 12.0;
const HEADING_SIZE: f32 = 11.0;
const ITEM_SIZE: f32 = 10.0;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Render the pages into a PDF document. Returns PDF bytes.
pub fn render_pdf(pages: &[ReportPage]) -> Result<Vec<u8>, ReportError> {
    let (doc, page1, layer1) = PdfDocument::new(DOCUMENT_TITLE, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?,
    };

    if pages.is_empty() {
        let layer = doc.get_page(page1).get_layer(layer1);
        layer.use_text(DOCUMENT_TITLE, TITLE_SIZE, Mm(LEFT), Mm(TOP), &fonts.bold);
        layer.use_text("No stations recorded", LABEL_SIZE, Mm(LEFT), Mm(TOP - TITLE_STEP), &fonts.regular);
    }

    for (idx, page) in pages.iter().enumerate() {
        let (page_idx, layer_idx) = if idx == 0 {
            (page1, layer1)
        } else {
            doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1")
        };
        let layer = doc.get_page(page_idx).get_layer(layer_idx);
        draw_station_page(&layer, &fonts, page);
    }

    tracing::debug!(pages = pages.len(), "rendered report");

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf).map_err(pdf_err)?;
    buf.into_inner().map_err(|e| ReportError::Pdf(format!("buffer error: {e}")))
}

/// Save PDF bytes as `file_name` inside `dir`, creating `dir` if needed.
pub fn write_report(pdf_bytes: &[u8], dir: &Path, file_name: &str) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(dir).map_err(|e| ReportError::Io {
        path: dir.to_path_buf(),
        message: format!("cannot create directory: {e}"),
    })?;

    let path = dir.join(file_name);
    std::fs::write(&path, pdf_bytes).map_err(|e| ReportError::Io {
        path: path.clone(),
        message: format!("cannot write report: {e}"),
    })?;

    tracing::info!(path = %path.display(), bytes = pdf_bytes.len(), "report written");
    Ok(path)
}

fn pdf_err(e: impl std::fmt::Display) -> ReportError {
    ReportError::Pdf(e.to_string())
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

struct Cursor<'a> {
    layer: &'a PdfLayerReference,
    fonts: &'a Fonts,
    y: f32,
}

impl Cursor<'_> {
    fn line(&mut self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.fonts.bold } else { &self.fonts.regular };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
        self.y -= LINE_STEP;
    }

    fn gap(&mut self) {
        self.y -= LINE_STEP;
    }

    /// Draw up to `cap` lines of `items`; an overflowing list ends in `... N more`.
    fn list(&mut self, items: &[String], cap: usize) {
        if items.is_empty() {
            self.line("(none)", ITEM_SIZE, INDENT, false);
            return;
        }
        if items.len() <= cap {
            for item in items {
                self.line(item, ITEM_SIZE, INDENT, false);
            }
            return;
        }
        let shown = cap.saturating_sub(1);
        for item in &items[..shown] {
            self.line(item, ITEM_SIZE, INDENT, false);
        }
        self.line(&format!("... {} more", items.len() - shown), ITEM_SIZE, INDENT, false);
    }
}

fn draw_station_page(layer: &PdfLayerReference, fonts: &Fonts, page: &ReportPage) {
    layer.use_text(
        format!("Discrepancy Report for Station: {}", page.station),
        TITLE_SIZE,
        Mm(LEFT),
        Mm(TOP),
        &fonts.bold,
    );

    let mut cursor = Cursor {
        layer,
        fonts,
        y: TOP - TITLE_STEP,
    };
    let [assigned_cap, scanned_cap, missing_cap] = list_caps(page);

    cursor.line(&format!("Station: {}", page.station), LABEL_SIZE, LEFT, false);
    cursor.line(&format!("Processor: {}", page.processor_id), LABEL_SIZE, LEFT, false);
    cursor.gap();

    cursor.line("Assigned LoadIDs:", HEADING_SIZE, LEFT, true);
    cursor.list(&timed_lines(&page.assigned), assigned_cap);
    cursor.gap();

    cursor.line("Scanned LoadIDs:", HEADING_SIZE, LEFT, true);
    cursor.list(&timed_lines(&page.scanned), scanned_cap);
    cursor.gap();

    let mismatch = if page.has_mismatch { "Yes" } else { "No" };
    cursor.line(&format!("Mismatch: {mismatch}"), LABEL_SIZE, LEFT, false);

    if page.has_mismatch {
        cursor.gap();
        layer.set_fill_color(Color::Rgb(Rgb::new(0.8, 0.0, 0.0, None)));
        cursor.line("Missing LoadIDs (Assigned but not scanned):", HEADING_SIZE, LEFT, true);
        cursor.list(&page.missing, missing_cap);
        layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    }
}

fn timed_lines(loads: &[TimedLoad]) -> Vec<String> {
    loads.iter().map(|l| format!("{}  ({})", l.load_id, l.time)).collect()
}

/// Line budget for the assigned, scanned and missing lists so one station
/// always fits on one page.
///
/// Each shown list is guaranteed one line; the rest of the page is shared out
/// evenly, with unused share flowing to longer lists.
pub(crate) fn list_caps(page: &ReportPage) -> [usize; 3] {
    // station, processor, gap, heading, gap, heading, gap, mismatch
    let mut fixed = 8;
    // one guaranteed line each for assigned and scanned
    fixed += 2;
    if page.has_mismatch {
        // gap, heading, guaranteed line
        fixed += 3;
    }

    let missing_len = if page.has_mismatch { page.missing.len() } else { 0 };
    let extra_wanted = [
        page.assigned.len().saturating_sub(1),
        page.scanned.len().saturating_sub(1),
        missing_len.saturating_sub(1),
    ];
    let extra = allot(&extra_wanted, LINES_PER_PAGE.saturating_sub(fixed));

    [1 + extra[0], 1 + extra[1], 1 + extra[2]]
}

/// Water-fill `budget` across `wanted`, never giving a slot more than it asks for.
fn allot(wanted: &[usize], budget: usize) -> Vec<usize> {
    let mut given = vec![0; wanted.len()];
    let mut left = budget;

    while left > 0 {
        let open: Vec<usize> = (0..wanted.len()).filter(|&i| given[i] < wanted[i]).collect();
        if open.is_empty() {
            break;
        }
        let share = (left / open.len()).max(1);
        for i in open {
            let give = share.min(wanted[i] - given[i]).min(left);
            given[i] += give;
            left -= give;
            if left == 0 {
                break;
            }
        }
    }

    given
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loads(n: usize) -> Vec<TimedLoad> {
        (0..n)
            .map(|i| TimedLoad {
                load_id: format!("L{i}"),
                time: "8:00:00 AM".into(),
            })
            .collect()
    }

    fn page(assigned: usize, scanned: usize, missing: usize) -> ReportPage {
        ReportPage {
            station: "PS001".into(),
            processor_id: "123456".into(),
            assigned: loads(assigned),
            scanned: loads(scanned),
            has_mismatch: missing > 0,
            missing: (0..missing).map(|i| format!("L{i}")).collect(),
        }
    }

    #[test]
    fn allot_within_budget() {
        assert_eq!(allot(&[2, 3, 0], 100), vec![2, 3, 0]);
        assert_eq!(allot(&[50, 50, 50], 30), vec![10, 10, 10]);
        assert_eq!(allot(&[2, 50, 50], 30), vec![2, 14, 14]);
        assert_eq!(allot(&[5, 5], 0), vec![0, 0]);
    }

    #[test]
    fn small_lists_fit_whole() {
        assert_eq!(list_caps(&page(3, 2, 1)), [3, 2, 1]);
    }

    #[test]
    fn huge_lists_fit_one_page() {
        let p = page(500, 400, 100);
        let caps = list_caps(&p);
        let used = 8 + 2 + caps.iter().sum::<usize>();
        assert!(used <= LINES_PER_PAGE, "used {used} of {LINES_PER_PAGE}");
        assert!(caps.iter().all(|&c| c >= 1));
    }

    /// Count `/Type /Page` dictionaries (not `/Type /Pages`).
    fn page_count(pdf: &[u8]) -> usize {
        let mut count = 0;
        for (i, w) in pdf.windows(5).enumerate() {
            if w != b"/Type" {
                continue;
            }
            let mut rest = &pdf[i + 5..];
            while let [b' ' | b'\n' | b'\r', tail @ ..] = rest {
                rest = tail;
            }
            if let [b'/', b'P', b'a', b'g', b'e', next, ..] = rest {
                if !next.is_ascii_alphanumeric() {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn one_pdf_page_per_station() {
        for n in [1, 3, 7] {
            let pages: Vec<ReportPage> = (0..n).map(|i| page(i + 1, i, 1)).collect();
            let bytes = render_pdf(&pages).unwrap();
            assert_eq!(page_count(&bytes), n, "{n} stations");
        }
    }

    #[test]
    fn empty_report_is_one_placeholder_page() {
        let bytes = render_pdf(&[]).unwrap();
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn overflowing_station_stays_on_one_page() {
        let bytes = render_pdf(&[page(300, 300, 300), page(2, 2, 0)]).unwrap();
        assert_eq!(page_count(&bytes), 2);
    }

    #[test]
    fn pdf_has_magic_bytes() {
        let bytes = render_pdf(&[page(3, 2, 1), page(1, 1, 0)]).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[test]
    fn empty_report_still_renders() {
        let bytes = render_pdf(&[]).unwrap();
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[test]
    fn overflowing_page_renders() {
        let bytes = render_pdf(&[page(300, 300, 300)]).unwrap();
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[test]
    fn write_report_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("exports");
        let path = write_report(b"%PDF-1.3 test", &dir, REPORT_FILE_NAME).unwrap();

        assert_eq!(path, dir.join("discrepency-report.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.3 test");
    }

    #[test]
    fn write_report_into_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let err = write_report(b"%PDF", &blocker, REPORT_FILE_NAME).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }
}
