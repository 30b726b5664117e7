//! `ltrack shell` - interactive capture session.
//!
//! Both logs live only in this process; nothing is written unless `export`
//! is asked for.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use loadtrack_config::Settings;
use loadtrack_recon::Session;

use crate::recon::export_report;
use crate::table::{assignments_table, scans_table, summary_table};
use crate::CliError;

const HELP: &str = "\
Commands:
  assign <station> <load_id>    assign a pallet LoadID to a station
  login <employee_id> <station> log in as a processor (employee ID is 6 characters)
  scan <load_id>                scan a LoadID at your station
  logout                        log out (logs are kept)
  whoami                        show the current login
  assignments                   show the assignment log
  scans                         show the scan log
  report                        show the discrepancy summary
  export [dir]                  write the PDF discrepancy report
  stations                      list known stations
  help                          show this help
  quit | exit                   end the session (all data is discarded)

Wrap a value in double quotes to include spaces or leave it empty:
  assign \"Station 1\" L100
  assign \"\" \"\"
Inside quotes, write \"\" for a literal quote.
";

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

pub(crate) struct Shell<'a> {
    session: Session,
    settings: &'a Settings,
}

impl<'a> Shell<'a> {
    pub(crate) fn new(session: Session, settings: &'a Settings) -> Self {
        Self { session, settings }
    }

    pub(crate) fn prompt(&self) -> String {
        match self.session.current_login() {
            Some(login) => format!("ltrack [{} @ {}]> ", login.employee_id, login.station),
            None => "ltrack> ".to_string(),
        }
    }

    /// Run one input line. User mistakes go to `err`; the session carries on.
    pub(crate) fn execute<W: Write, E: Write>(
        &mut self,
        line: &str,
        out: &mut W,
        err: &mut E,
    ) -> io::Result<Flow> {
        let words = match split_words(line) {
            Ok(words) => words,
            Err(e) => {
                writeln!(err, "error: {e}")?;
                return Ok(Flow::Continue);
            }
        };
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        let Some((&command, args)) = words.split_first() else {
            return Ok(Flow::Continue);
        };

        match (command, args) {
            ("assign", [station, load_id]) => {
                let event = self.session.assign(station, load_id);
                writeln!(out, "assigned {} to {} at {}", event.load_id, event.station, event.time)?;
            }
            ("assign", _) => writeln!(err, "usage: assign <station> <load_id>")?,

            ("login", [employee_id, station]) => self.login(employee_id, station, out, err)?,
            ("login", [employee_id]) => self.login(employee_id, "", out, err)?,
            ("login", []) => self.login("", "", out, err)?,
            ("login", _) => writeln!(err, "usage: login <employee_id> <station>")?,

            ("scan", [load_id]) => match self.session.scan(load_id) {
                Ok(event) => writeln!(
                    out,
                    "scanned {} at {} by {} at {}",
                    event.load_id, event.station, event.processor_id, event.time
                )?,
                Err(e) => writeln!(err, "error: {e}")?,
            },
            ("scan", _) => writeln!(err, "usage: scan <load_id>")?,

            ("logout", []) => {
                self.session.logout();
                writeln!(out, "logged out")?;
            }
            ("whoami", []) => match self.session.current_login() {
                Some(login) => writeln!(out, "{} at {}", login.employee_id, login.station)?,
                None => writeln!(out, "not logged in")?,
            },

            ("assignments", []) => write!(out, "{}", assignments_table(self.session.assignments()))?,
            ("scans", []) => write!(out, "{}", scans_table(self.session.scans()))?,
            ("report", []) => write!(out, "{}", summary_table(&self.session.reconcile()))?,

            ("export", []) => self.export(self.settings.output_dir(), out, err)?,
            ("export", [dir]) => self.export(PathBuf::from(dir), out, err)?,

            ("stations", []) => writeln!(out, "{}", self.settings.stations.join(" "))?,
            ("help", _) => write!(out, "{HELP}")?,
            ("quit" | "exit", []) => return Ok(Flow::Quit),

            (other, _) => writeln!(err, "unknown command '{other}' (try 'help')")?,
        }

        Ok(Flow::Continue)
    }

    fn login<W: Write, E: Write>(
        &mut self,
        employee_id: &str,
        station: &str,
        out: &mut W,
        err: &mut E,
    ) -> io::Result<()> {
        let known = self.settings.is_known_station(station);
        match self.session.login(employee_id, station) {
            Ok(login) => {
                writeln!(out, "you are currently assigned to {}", login.station)?;
                if !known {
                    writeln!(err, "note: station '{station}' is not in the station roster")?;
                }
            }
            Err(e) => writeln!(err, "error: {e}")?,
        }
        Ok(())
    }

    fn export<W: Write, E: Write>(&self, dir: PathBuf, out: &mut W, err: &mut E) -> io::Result<()> {
        match export_report(self.session.assignments(), self.session.scans(), &dir, self.settings) {
            Ok(path) => writeln!(out, "wrote {}", path.display()),
            Err(e) => writeln!(err, "error: {}", e.message),
        }
    }
}

/// Split a command line into words. A double-quoted word may contain
/// whitespace or be empty; `""` inside quotes is a literal quote.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '"' => {
                chars.next();
                let mut word = String::new();
                loop {
                    match chars.next() {
                        Some('"') => {
                            if chars.peek() == Some(&'"') {
                                chars.next();
                                word.push('"');
                            } else {
                                break;
                            }
                        }
                        Some(ch) => word.push(ch),
                        None => return Err("unterminated quote".to_string()),
                    }
                }
                words.push(word);
            }
            _ => {
                let mut word = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_whitespace() {
                        break;
                    }
                    word.push(ch);
                    chars.next();
                }
                words.push(word);
            }
        }
    }

    Ok(words)
}

pub fn cmd_shell(settings: &Settings) -> Result<(), CliError> {
    let interactive = atty::is(atty::Stream::Stdin);
    let mut shell = Shell::new(Session::new(), settings);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    if interactive {
        eprintln!("LoadID tracking session. Type 'help' for commands; data is discarded on exit.");
    }

    let mut line = String::new();
    loop {
        if interactive {
            write!(stdout, "{}", shell.prompt()).map_err(io_err)?;
            stdout.flush().map_err(io_err)?;
        }

        line.clear();
        if input.read_line(&mut line).map_err(io_err)? == 0 {
            break;
        }
        if shell.execute(&line, &mut stdout, &mut stderr).map_err(io_err)? == Flow::Quit {
            break;
        }
    }

    tracing::info!(
        assignments = shell.session.assignments().len(),
        scans = shell.session.scans().len(),
        "session ended"
    );
    Ok(())
}

fn io_err(e: io::Error) -> CliError {
    CliError::io(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> String {
        "7:45:00 AM".into()
    }

    struct Harness {
        settings: Settings,
    }

    impl Harness {
        fn new() -> Self {
            Self { settings: Settings::default() }
        }

        /// Run `lines` through a fresh shell; returns (stdout, stderr, session).
        fn run(&self, lines: &[&str]) -> (String, String, Session) {
            let mut shell = Shell::new(Session::with_clock(clock), &self.settings);
            let mut out = Vec::new();
            let mut err = Vec::new();
            for line in lines {
                if shell.execute(line, &mut out, &mut err).unwrap() == Flow::Quit {
                    break;
                }
            }
            (
                String::from_utf8(out).unwrap(),
                String::from_utf8(err).unwrap(),
                shell.session,
            )
        }
    }

    #[test]
    fn assign_login_scan_report() {
        let h = Harness::new();
        let (out, err, session) = h.run(&[
            "assign A L1",
            "assign A L2",
            "login E00001 A",
            "scan L1",
            "report",
        ]);

        assert!(out.contains("assigned L1 to A at 7:45:00 AM"));
        assert!(out.contains("scanned L1 at A by E00001 at 7:45:00 AM"));
        assert!(err.contains("not in the station roster"));
        assert_eq!(session.assignments().len(), 2);
        assert_eq!(session.scans().len(), 1);

        let report_row = out.lines().find(|l| l.starts_with("A ")).unwrap();
        assert!(report_row.contains("E00001"));
        assert!(report_row.contains("Yes"));
        assert!(report_row.trim_end().ends_with("L2"));
    }

    #[test]
    fn scan_before_login_is_refused() {
        let h = Harness::new();
        let (_, err, session) = h.run(&["scan L1"]);
        assert!(err.starts_with("error: please log in"));
        assert!(session.scans().is_empty());
    }

    #[test]
    fn bad_login_is_refused_without_state_change() {
        let h = Harness::new();
        let (_, err, session) = h.run(&["login 12345 PS001", "login 123456"]);
        assert!(err.contains("exactly 6 characters (got 5)"));
        assert!(err.contains("please select your station"));
        assert!(session.current_login().is_none());
    }

    #[test]
    fn roster_station_login_has_no_note() {
        let h = Harness::new();
        let (out, err, _) = h.run(&["login 123456 PS001", "whoami"]);
        assert!(out.contains("you are currently assigned to PS001"));
        assert!(out.contains("123456 at PS001"));
        assert!(err.is_empty());
    }

    #[test]
    fn logout_then_scan_refused() {
        let h = Harness::new();
        let (out, err, session) = h.run(&["login 123456 PS001", "logout", "scan L1", "whoami"]);
        assert!(out.contains("logged out"));
        assert!(out.contains("not logged in"));
        assert!(err.contains("error: please log in"));
        assert!(session.scans().is_empty());
    }

    #[test]
    fn quit_stops_processing() {
        let h = Harness::new();
        let (_, _, session) = h.run(&["assign A L1", "quit", "assign A L2"]);
        assert_eq!(session.assignments().len(), 1);
    }

    #[test]
    fn usage_and_unknown_commands() {
        let h = Harness::new();
        let (_, err, _) = h.run(&["assign A", "scan", "frobnicate", ""]);
        assert!(err.contains("usage: assign <station> <load_id>"));
        assert!(err.contains("usage: scan <load_id>"));
        assert!(err.contains("unknown command 'frobnicate'"));
    }

    #[test]
    fn tables_list_logs() {
        let h = Harness::new();
        let (out, _, _) = h.run(&["assign PS002 L7", "login 123456 PS002", "scan L7", "assignments", "scans"]);
        assert!(out.contains("Station  LoadID  Time"));
        assert!(out.contains("PS002    L7      7:45:00 AM"));
        assert!(out.contains("Station  LoadID  Processor  Time"));
    }

    #[test]
    fn export_writes_pdf() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("out");
        let h = Harness::new();
        let export = format!("export {}", dir.display());
        let (out, err, _) = h.run(&["assign A L1", export.as_str()]);

        assert!(err.is_empty(), "{err}");
        assert!(out.contains("discrepency-report.pdf"));
        let bytes = std::fs::read(dir.join("discrepency-report.pdf")).unwrap();
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[test]
    fn split_words_handles_quotes() {
        assert_eq!(split_words("  assign PS001   L1 ").unwrap(), vec!["assign", "PS001", "L1"]);
        assert_eq!(
            split_words(r#"assign "Station 1" "" "#).unwrap(),
            vec!["assign", "Station 1", ""]
        );
        assert_eq!(split_words(r#"assign "a ""b""" L1"#).unwrap(), vec!["assign", r#"a "b""#, "L1"]);
        assert!(split_words(r#"assign "Station 1 L1"#).is_err());
        assert!(split_words("").unwrap().is_empty());
    }

    #[test]
    fn quoted_station_with_spaces_and_empty_values() {
        let h = Harness::new();
        let (out, err, session) = h.run(&[
            r#"assign "Station 1" L100"#,
            r#"assign "" """#,
            r#"login 123456 "Station 1""#,
            "scan L100",
            r#"scan "unclosed"#,
        ]);

        assert!(out.contains("assigned L100 to Station 1 at 7:45:00 AM"));
        assert_eq!(session.assignments()[0].station, "Station 1");
        assert_eq!(session.assignments()[1].station, "");
        assert_eq!(session.assignments()[1].load_id, "");
        assert_eq!(session.scans().len(), 1);
        assert_eq!(session.scans()[0].station, "Station 1");
        assert!(err.contains("error: unterminated quote"));
    }

    #[test]
    fn prompt_shows_login() {
        let settings = Settings::default();
        let mut shell = Shell::new(Session::with_clock(clock), &settings);
        assert_eq!(shell.prompt(), "ltrack> ");
        shell.session.login("123456", "PS003").unwrap();
        assert_eq!(shell.prompt(), "ltrack [123456 @ PS003]> ");
    }
}
