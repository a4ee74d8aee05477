// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report assembly, console tables and file export

pub mod formatter;
pub mod output;

use crate::types::*;

pub use formatter::ReportFormatter;
pub use output::{save_report, ReportOutputFormat};

/// Bundle the results of one invocation under a timestamp.
pub fn assemble(
    engine: &str,
    budget_ms: u64,
    profiles: Vec<ProfileReport>,
    stress: Vec<StressReport>,
) -> ValidationReport {
    ValidationReport {
        created_at: chrono::Utc::now().to_rfc3339(),
        engine: engine.to_string(),
        budget_ms,
        profiles,
        stress,
    }
}

pub fn print_profile(report: &ProfileReport, formatter: &ReportFormatter) {
    println!("{}", formatter.profile_table(report));
    println!();
}

pub fn print_stress(report: &StressReport, formatter: &ReportFormatter) {
    println!("{}", formatter.stress_table(report));
    println!();
}
