// SPDX-License-Identifier: PMPL-1.0-or-later

//! Profile mode: one two-point growth sample per record, in corpus order.

use super::synth;
use super::ValidationExecutor;
use crate::analysis::analyze;
use crate::corpus::Corpus;
use crate::error::MatchError;
use crate::types::{ProfileReport, ProfileRow, ProfileVerdict, RecordState, VulnerabilityRecord};
use rayon::prelude::*;

impl ValidationExecutor<'_> {
    pub fn profile(&self, corpus: &Corpus) -> ProfileReport {
        tracing::info!(
            suite = %corpus.suite,
            records = corpus.len(),
            runnable = corpus.runnable(),
            base = self.settings().base,
            parallel = self.settings().parallel,
            "profiling corpus"
        );

        let rows: Vec<ProfileRow> = if self.settings().parallel {
            // rayon's collect keeps corpus order.
            corpus
                .records
                .par_iter()
                .filter_map(|record| (!self.cancelled()).then(|| self.profile_record(record)))
                .collect()
        } else {
            let mut rows = Vec::with_capacity(corpus.len());
            for record in &corpus.records {
                if self.cancelled() {
                    break;
                }
                rows.push(self.profile_record(record));
            }
            rows
        };

        let interrupted = rows.len() < corpus.len();
        if interrupted {
            tracing::warn!(
                suite = %corpus.suite,
                completed = rows.len(),
                "profile run interrupted"
            );
        }

        ProfileReport {
            suite: corpus.suite.clone(),
            base: self.settings().base,
            rows,
            interrupted,
        }
    }

    pub fn profile_record(&self, record: &VulnerabilityRecord) -> ProfileRow {
        let verdict = match &record.state {
            RecordState::Skipped { reason } => ProfileVerdict::Skipped {
                reason: reason.clone(),
            },
            RecordState::Malformed { reason } => ProfileVerdict::Malformed {
                reason: reason.clone(),
            },
            RecordState::Runnable => match record.execution_defect() {
                Some(reason) => ProfileVerdict::Malformed {
                    reason: reason.to_string(),
                },
                None => self.measure_pair(record),
            },
        };

        ProfileRow {
            id: record.id.clone(),
            verdict,
            notes: record.notes.clone().unwrap_or_default(),
        }
    }

    fn measure_pair(&self, record: &VulnerabilityRecord) -> ProfileVerdict {
        let sized = self
            .settings()
            .base
            .checked_add(record.baseline_pump_count)
            .filter(|n| n.checked_add(1).and_then(|k| synth::probe_len(record, k)).is_some());
        let Some(n) = sized else {
            tracing::warn!(id = %record.id, base = self.settings().base, "probe size out of range");
            return ProfileVerdict::Malformed {
                reason: format!(
                    "base {} + {} pumps does not fit a probe",
                    self.settings().base,
                    record.baseline_pump_count
                ),
            };
        };
        let pumps = (n, n + 1);
        let budget_ms = self.settings().budget_ms;

        let matcher = match self.compile(record) {
            Ok(matcher) => matcher,
            Err(err) => {
                return ProfileVerdict::CompileFailed {
                    error: err.to_string(),
                }
            }
        };

        let first = synth::build(record, n);
        let second = synth::build(record, n + 1);

        let t1 = match self.measure(record, &matcher, &first) {
            Ok(measurement) => measurement.elapsed_secs,
            Err(MatchError::Timeout { .. }) => {
                return ProfileVerdict::TimedOut {
                    pumps,
                    first: None,
                    budget_ms,
                }
            }
            Err(err) => {
                return ProfileVerdict::EngineFailed {
                    error: err.to_string(),
                }
            }
        };

        let t2 = match self.measure(record, &matcher, &second) {
            Ok(measurement) => measurement.elapsed_secs,
            Err(MatchError::Timeout { .. }) => {
                return ProfileVerdict::TimedOut {
                    pumps,
                    first: Some(t1),
                    budget_ms,
                }
            }
            Err(err) => {
                return ProfileVerdict::EngineFailed {
                    error: err.to_string(),
                }
            }
        };

        ProfileVerdict::Measured {
            pumps,
            times: (t1, t2),
            growth: analyze(t1, t2, &self.settings().growth),
        }
    }
}
