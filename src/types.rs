// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for pump-attack
//!
//! A [`VulnerabilityRecord`] is one statically flagged candidate. The runners
//! turn records into [`ProfileRow`]s and [`StressRow`]s, which the report
//! module renders.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine-independent regex options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegexFlag {
    #[serde(alias = "i", alias = "ignorecase")]
    CaseInsensitive,
    #[serde(alias = "s", alias = "dotall")]
    DotMatchesNewline,
    #[serde(alias = "m")]
    Multiline,
}

impl RegexFlag {
    pub fn all() -> Vec<Self> {
        vec![
            RegexFlag::CaseInsensitive,
            RegexFlag::DotMatchesNewline,
            RegexFlag::Multiline,
        ]
    }
}

/// Execution state of a record, decided once at load time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RecordState {
    Runnable,
    /// Pre-flagged upstream: the engine cannot compile it or it hangs.
    Skipped { reason: String },
    /// Failed validation; never reaches the engine.
    Malformed { reason: String },
}

/// One candidate vulnerability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilityRecord {
    pub id: String,
    pub pattern: String,
    #[serde(default)]
    pub flags: Vec<RegexFlag>,
    pub prefix: String,
    pub pumpable: String,
    pub suffix: String,
    pub baseline_pump_count: usize,
    pub state: RecordState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kleene: Option<String>,
}

impl VulnerabilityRecord {
    /// A record without flags or annotations. It is checked again when it
    /// joins a corpus and before any runner executes it.
    pub fn new(
        id: impl Into<String>,
        pattern: impl Into<String>,
        prefix: impl Into<String>,
        pumpable: impl Into<String>,
        suffix: impl Into<String>,
        baseline_pump_count: usize,
    ) -> Self {
        Self {
            id: id.into(),
            pattern: pattern.into(),
            flags: Vec::new(),
            prefix: prefix.into(),
            pumpable: pumpable.into(),
            suffix: suffix.into(),
            baseline_pump_count,
            state: RecordState::Runnable,
            notes: None,
            details: None,
            kleene: None,
        }
    }

    pub fn with_flags(mut self, flags: &[RegexFlag]) -> Self {
        self.flags = flags.to_vec();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn skipped(mut self, reason: impl Into<String>) -> Self {
        self.state = RecordState::Skipped {
            reason: reason.into(),
        };
        self
    }

    pub fn is_runnable(&self) -> bool {
        matches!(self.state, RecordState::Runnable)
    }

    /// Why this record must not reach an engine, ignoring its state.
    pub fn execution_defect(&self) -> Option<&'static str> {
        execution_defect(&self.pattern, &self.pumpable, self.baseline_pump_count)
    }
}

pub(crate) fn execution_defect(
    pattern: &str,
    pumpable: &str,
    baseline_pump_count: usize,
) -> Option<&'static str> {
    if pattern.is_empty() {
        Some("empty pattern")
    } else if pumpable.is_empty() {
        Some("empty pumpable string")
    } else if baseline_pump_count < 1 {
        Some("baseline pump count must be at least 1")
    } else {
        None
    }
}

/// Result of a completed match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Matched,
    Unmatched,
}

/// A single timed match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub elapsed_secs: f64,
    pub outcome: MatchOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthClass {
    ConfirmedSuperlinear,
    NotConfirmed,
    /// The earlier measurement was below timing resolution.
    Indeterminate,
}

impl fmt::Display for GrowthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrowthClass::ConfirmedSuperlinear => write!(f, "CONFIRMED"),
            GrowthClass::NotConfirmed => write!(f, "NOT CONFIRMED"),
            GrowthClass::Indeterminate => write!(f, "INDETERMINATE"),
        }
    }
}

/// Relative growth between two measurements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    /// `None` when the classification is [`GrowthClass::Indeterminate`].
    pub percent: Option<f64>,
    pub classification: GrowthClass,
}

/// What happened to one record in profile mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ProfileVerdict {
    Measured {
        pumps: (usize, usize),
        times: (f64, f64),
        growth: Growth,
    },
    TimedOut {
        pumps: (usize, usize),
        /// Elapsed time of the first probe, when only the second one timed out.
        first: Option<f64>,
        budget_ms: u64,
    },
    Skipped {
        reason: String,
    },
    Malformed {
        reason: String,
    },
    CompileFailed {
        error: String,
    },
    EngineFailed {
        error: String,
    },
}

impl ProfileVerdict {
    pub fn label(&self) -> &'static str {
        match self {
            ProfileVerdict::Measured { growth, .. } => match growth.classification {
                GrowthClass::ConfirmedSuperlinear => "confirmed",
                GrowthClass::NotConfirmed => "not-confirmed",
                GrowthClass::Indeterminate => "indeterminate",
            },
            ProfileVerdict::TimedOut { .. } => "timeout",
            ProfileVerdict::Skipped { .. } => "skipped",
            ProfileVerdict::Malformed { .. } => "malformed",
            ProfileVerdict::CompileFailed { .. } => "compile-error",
            ProfileVerdict::EngineFailed { .. } => "engine-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    pub verdict: ProfileVerdict,
    pub notes: String,
}

/// One step of a stress ramp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StressStep {
    Measured {
        elapsed: f64,
        outcome: MatchOutcome,
        /// Absent on the first iteration, which has no predecessor.
        growth: Option<Growth>,
    },
    TimedOut {
        budget_ms: u64,
    },
    EngineFailed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressRow {
    pub id: String,
    pub iteration: usize,
    pub probe_len: usize,
    pub step: StressStep,
    pub notes: String,
}

/// Why a stress ramp stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StressTermination {
    Completed,
    TimedOut { iteration: usize },
    EngineFailed { iteration: usize },
    Interrupted { completed: usize },
    NotRunnable { detail: String },
    CompileFailed { error: String },
}

/// Profile results for one corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReport {
    pub suite: String,
    pub base: usize,
    pub rows: Vec<ProfileRow>,
    /// Set when a cancel request cut the run short.
    pub interrupted: bool,
}

impl ProfileReport {
    pub fn summary(&self) -> ProfileSummary {
        let mut summary = ProfileSummary::default();
        for row in &self.rows {
            match &row.verdict {
                ProfileVerdict::Measured { growth, .. } => match growth.classification {
                    GrowthClass::ConfirmedSuperlinear => summary.confirmed += 1,
                    GrowthClass::NotConfirmed => summary.not_confirmed += 1,
                    GrowthClass::Indeterminate => summary.indeterminate += 1,
                },
                ProfileVerdict::TimedOut { .. } => summary.timed_out += 1,
                ProfileVerdict::Skipped { .. } => summary.skipped += 1,
                ProfileVerdict::Malformed { .. } => summary.malformed += 1,
                ProfileVerdict::CompileFailed { .. } | ProfileVerdict::EngineFailed { .. } => {
                    summary.engine_errors += 1
                }
            }
        }
        summary
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub confirmed: usize,
    pub not_confirmed: usize,
    pub indeterminate: usize,
    pub timed_out: usize,
    pub skipped: usize,
    pub malformed: usize,
    pub engine_errors: usize,
}

/// Stress results for one record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressReport {
    pub suite: String,
    pub id: String,
    pub rows: Vec<StressRow>,
    pub termination: StressTermination,
}

/// Everything a single invocation produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub created_at: String,
    pub engine: String,
    pub budget_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<ProfileReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stress: Vec<StressReport>,
}
