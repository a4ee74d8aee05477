// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-width table rendering

use crate::types::*;
use colored::*;

const ID_WIDTH: usize = 6;
const MID_WIDTH: usize = 12;
const TIME_WIDTH: usize = 30;
const NOTES_WIDTH: usize = 30;
const RULE_WIDTH: usize = ID_WIDTH + MID_WIDTH + TIME_WIDTH + MID_WIDTH + NOTES_WIDTH + 5;

/// Cell tone, applied after padding so ANSI codes never disturb alignment.
#[derive(Clone, Copy)]
enum Tone {
    Plain,
    Alarm,
    Calm,
    Doubt,
    Muted,
}

pub struct ReportFormatter {
    color: bool,
}

impl ReportFormatter {
    pub fn new() -> Self {
        Self { color: true }
    }

    /// No ANSI escapes; used for files, pipes and tests.
    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn banner(&self, suite: &str) -> String {
        let title = format!("{:^width$}", format!("=[{}]=", suite.to_uppercase()), width = RULE_WIDTH);
        if self.color {
            title.bold().cyan().to_string()
        } else {
            title
        }
    }

    fn rule(&self) -> String {
        "-".repeat(RULE_WIDTH)
    }

    fn header(&self, labels: [&str; 5]) -> String {
        format!(
            "{:^iw$}|{:^mw$}|{:^tw$}|{:^mw$}|{:^nw$}|",
            labels[0],
            labels[1],
            labels[2],
            labels[3],
            labels[4],
            iw = ID_WIDTH,
            mw = MID_WIDTH,
            tw = TIME_WIDTH,
            nw = NOTES_WIDTH
        )
    }

    fn paint(&self, cell: String, tone: Tone) -> String {
        if !self.color {
            return cell;
        }
        match tone {
            Tone::Plain => cell,
            Tone::Alarm => cell.red().bold().to_string(),
            Tone::Calm => cell.green().to_string(),
            Tone::Doubt => cell.yellow().to_string(),
            Tone::Muted => cell.dimmed().to_string(),
        }
    }

    fn row(&self, cells: [(String, Tone); 5]) -> String {
        let [id, second, third, growth, notes] = cells;
        format!(
            "{}|{}|{}|{}|{}|",
            self.paint(format!("{:>w$}", id.0, w = ID_WIDTH), id.1),
            self.paint(format!("{:>w$}", second.0, w = MID_WIDTH), second.1),
            self.paint(format!("{:>w$}", third.0, w = TIME_WIDTH), third.1),
            self.paint(format!("{:>w$}", growth.0, w = MID_WIDTH), growth.1),
            self.paint(format!("{:<w$}", notes.0, w = NOTES_WIDTH), notes.1),
        )
    }

    pub fn profile_table(&self, report: &ProfileReport) -> String {
        let mut lines = vec![
            self.banner(&report.suite),
            self.rule(),
            self.header(["ID", "PUMPS", "TIMES", "GROWTH", "NOTES"]),
            self.rule(),
        ];
        for row in &report.rows {
            lines.push(self.profile_row(row));
        }
        lines.push(self.rule());
        lines.push(self.summary_line(&report.summary()));
        if report.interrupted {
            lines.push(self.paint(
                format!("interrupted after {} records", report.rows.len()),
                Tone::Doubt,
            ));
        }
        lines.join("\n")
    }

    pub fn profile_row(&self, row: &ProfileRow) -> String {
        let na = || ("N/A".to_string(), Tone::Muted);
        let id = (row.id.clone(), Tone::Plain);
        match &row.verdict {
            ProfileVerdict::Measured {
                pumps,
                times,
                growth,
            } => self.row([
                id,
                (format!("({},{})", pumps.0, pumps.1), Tone::Plain),
                (format!("({:.10},{:.10})", times.0, times.1), Tone::Plain),
                growth_cell(growth),
                (row.notes.clone(), Tone::Plain),
            ]),
            ProfileVerdict::TimedOut {
                pumps,
                first,
                budget_ms,
            } => {
                let times = match first {
                    Some(t1) => format!("({:.10},>{}ms)", t1, budget_ms),
                    None => format!("(>{}ms,-)", budget_ms),
                };
                self.row([
                    id,
                    (format!("({},{})", pumps.0, pumps.1), Tone::Plain),
                    (times, Tone::Plain),
                    ("TIMEOUT".to_string(), Tone::Alarm),
                    (row.notes.clone(), Tone::Plain),
                ])
            }
            ProfileVerdict::Skipped { reason } => {
                let notes = if row.notes.is_empty() {
                    reason.clone()
                } else {
                    row.notes.clone()
                };
                self.row([id, na(), na(), na(), (notes, Tone::Plain)])
            }
            ProfileVerdict::Malformed { reason } => self.row([
                id,
                na(),
                na(),
                na(),
                (join_notes(&format!("malformed: {}", reason), &row.notes), Tone::Doubt),
            ]),
            ProfileVerdict::CompileFailed { error } => self.row([
                id,
                na(),
                na(),
                na(),
                (join_notes(&row.notes, error), Tone::Doubt),
            ]),
            ProfileVerdict::EngineFailed { error } => self.row([
                id,
                na(),
                na(),
                ("ERROR".to_string(), Tone::Alarm),
                (join_notes(&row.notes, error), Tone::Doubt),
            ]),
        }
    }

    fn summary_line(&self, summary: &ProfileSummary) -> String {
        format!(
            "confirmed: {}  not confirmed: {}  indeterminate: {}  timeout: {}  skipped: {}  malformed: {}  engine errors: {}",
            self.paint(summary.confirmed.to_string(), Tone::Alarm),
            summary.not_confirmed,
            summary.indeterminate,
            summary.timed_out,
            summary.skipped,
            summary.malformed,
            summary.engine_errors
        )
    }

    pub fn stress_table(&self, report: &StressReport) -> String {
        let mut lines = vec![
            self.banner(&report.suite),
            self.rule(),
            self.header(["ID", "ITERATION", "ELAPSED", "GROWTH", "NOTES"]),
            self.rule(),
        ];
        for row in &report.rows {
            lines.push(self.stress_row(row));
        }
        lines.push(self.rule());
        lines.push(self.termination_line(report));
        lines.join("\n")
    }

    pub fn stress_row(&self, row: &StressRow) -> String {
        let id = (row.id.clone(), Tone::Plain);
        let iteration = (row.iteration.to_string(), Tone::Plain);
        let notes = (row.notes.clone(), Tone::Plain);
        match &row.step {
            StressStep::Measured {
                elapsed, growth, ..
            } => self.row([
                id,
                iteration,
                (format!("{:.10}", elapsed), Tone::Plain),
                match growth {
                    Some(growth) => growth_cell(growth),
                    None => ("-".to_string(), Tone::Muted),
                },
                notes,
            ]),
            StressStep::TimedOut { budget_ms } => self.row([
                id,
                iteration,
                (format!(">{}ms", budget_ms), Tone::Alarm),
                ("TIMEOUT".to_string(), Tone::Alarm),
                notes,
            ]),
            StressStep::EngineFailed { error } => self.row([
                id,
                iteration,
                ("N/A".to_string(), Tone::Muted),
                ("ERROR".to_string(), Tone::Alarm),
                (join_notes(&row.notes, error), Tone::Doubt),
            ]),
        }
    }

    fn termination_line(&self, report: &StressReport) -> String {
        let (text, tone) = match &report.termination {
            StressTermination::Completed => (
                format!("ramp completed after {} iterations", report.rows.len()),
                Tone::Plain,
            ),
            StressTermination::TimedOut { iteration } => (
                format!("ramp stopped: iteration {} exceeded the match budget", iteration),
                Tone::Alarm,
            ),
            StressTermination::EngineFailed { iteration } => (
                format!("ramp stopped: engine failure at iteration {}", iteration),
                Tone::Alarm,
            ),
            StressTermination::Interrupted { completed } => (
                format!("ramp interrupted after {} iterations", completed),
                Tone::Doubt,
            ),
            StressTermination::NotRunnable { detail } => {
                (format!("record {} not run ({})", report.id, detail), Tone::Doubt)
            }
            StressTermination::CompileFailed { error } => {
                (format!("record {} not run ({})", report.id, error), Tone::Doubt)
            }
        };
        self.paint(text, tone)
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn growth_cell(growth: &Growth) -> (String, Tone) {
    match (growth.percent, growth.classification) {
        (Some(percent), GrowthClass::ConfirmedSuperlinear) => (format!("{:.1}%", percent), Tone::Alarm),
        (Some(percent), _) => (format!("{:.1}%", percent), Tone::Calm),
        (None, _) => ("INDET".to_string(), Tone::Doubt),
    }
}

fn join_notes(first: &str, second: &str) -> String {
    match (first.is_empty(), second.is_empty()) {
        (true, _) => second.to_string(),
        (_, true) => first.to_string(),
        _ => format!("{}; {}", first, second),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(line: &str) -> Vec<String> {
        line.split('|').map(|cell| cell.trim().to_string()).collect()
    }

    #[test]
    fn skipped_row_is_all_na() {
        let row = ProfileRow {
            id: "67".to_string(),
            verdict: ProfileVerdict::Skipped {
                reason: "skipped - python hangs".to_string(),
            },
            notes: "skipped - python hangs".to_string(),
        };
        let line = ReportFormatter::plain().profile_row(&row);
        assert_eq!(
            cells(&line),
            vec!["67", "N/A", "N/A", "N/A", "skipped - python hangs", ""]
        );
    }

    #[test]
    fn measured_row_shows_pumps_times_growth() {
        let row = ProfileRow {
            id: "X".to_string(),
            verdict: ProfileVerdict::Measured {
                pumps: (3, 4),
                times: (0.001, 0.005),
                growth: Growth {
                    percent: Some(400.0),
                    classification: GrowthClass::ConfirmedSuperlinear,
                },
            },
            notes: String::new(),
        };
        let line = ReportFormatter::plain().profile_row(&row);
        assert_eq!(
            cells(&line),
            vec!["X", "(3,4)", "(0.0010000000,0.0050000000)", "400.0%", "", ""]
        );
        assert_eq!(line.len(), RULE_WIDTH);
    }

    #[test]
    fn header_matches_columns() {
        let report = ProfileReport {
            suite: "regexlib".to_string(),
            base: 0,
            rows: Vec::new(),
            interrupted: false,
        };
        let table = ReportFormatter::plain().profile_table(&report);
        let header = table.lines().nth(2).expect("header line");
        assert_eq!(
            cells(header),
            vec!["ID", "PUMPS", "TIMES", "GROWTH", "NOTES", ""]
        );
        assert!(table.lines().next().unwrap_or_default().contains("=[REGEXLIB]="));
    }

    #[test]
    fn stress_first_step_has_no_growth() {
        let row = StressRow {
            id: "70".to_string(),
            iteration: 1,
            probe_len: 3,
            step: StressStep::Measured {
                elapsed: 0.0000021,
                outcome: MatchOutcome::Unmatched,
                growth: None,
            },
            notes: String::new(),
        };
        let line = ReportFormatter::plain().stress_row(&row);
        assert_eq!(cells(&line), vec!["70", "1", "0.0000021000", "-", "", ""]);
    }

    #[test]
    fn timeout_row_is_flagged() {
        let row = StressRow {
            id: "70".to_string(),
            iteration: 9,
            probe_len: 11,
            step: StressStep::TimedOut { budget_ms: 250 },
            notes: String::new(),
        };
        let line = ReportFormatter::plain().stress_row(&row);
        assert_eq!(cells(&line), vec!["70", "9", ">250ms", "TIMEOUT", "", ""]);
    }

    #[test]
    fn compile_failure_keeps_error_in_notes() {
        let row = ProfileRow {
            id: "361".to_string(),
            verdict: ProfileVerdict::CompileFailed {
                error: "regress cannot compile pattern: bad".to_string(),
            },
            notes: "modified".to_string(),
        };
        let line = ReportFormatter::plain().profile_row(&row);
        assert!(line.contains("modified; regress cannot compile pattern: bad"));
    }
}
