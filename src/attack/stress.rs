// SPDX-License-Identifier: PMPL-1.0-or-later

//! Stress mode: ramp one record's probe a pump at a time and time every step.

use super::synth;
use super::ValidationExecutor;
use crate::analysis::analyze;
use crate::corpus::Corpus;
use crate::error::MatchError;
use crate::types::{
    RecordState, StressReport, StressRow, StressStep, StressTermination, VulnerabilityRecord,
};

/// Upper bound on ramp length.
pub const STRESS_ITERATIONS: usize = 20;

impl ValidationExecutor<'_> {
    /// `None` when the corpus has no record with this id.
    pub fn stress(&self, corpus: &Corpus, id: &str) -> Option<StressReport> {
        corpus
            .get(id)
            .map(|record| self.stress_record(&corpus.suite, record))
    }

    pub fn stress_record(&self, suite: &str, record: &VulnerabilityRecord) -> StressReport {
        let finish = |rows: Vec<StressRow>, termination: StressTermination| StressReport {
            suite: suite.to_string(),
            id: record.id.clone(),
            rows,
            termination,
        };

        match &record.state {
            RecordState::Runnable => {
                let defect = record.execution_defect().or_else(|| {
                    synth::probe_len(record, STRESS_ITERATIONS)
                        .is_none()
                        .then_some("probe does not fit at the last step")
                });
                if let Some(reason) = defect {
                    return finish(
                        Vec::new(),
                        StressTermination::NotRunnable {
                            detail: format!("malformed: {}", reason),
                        },
                    );
                }
            }
            RecordState::Skipped { reason } => {
                return finish(
                    Vec::new(),
                    StressTermination::NotRunnable {
                        detail: format!("skipped: {}", reason),
                    },
                )
            }
            RecordState::Malformed { reason } => {
                return finish(
                    Vec::new(),
                    StressTermination::NotRunnable {
                        detail: format!("malformed: {}", reason),
                    },
                )
            }
        }

        let matcher = match self.compile(record) {
            Ok(matcher) => matcher,
            Err(err) => {
                return finish(
                    Vec::new(),
                    StressTermination::CompileFailed {
                        error: err.to_string(),
                    },
                )
            }
        };

        tracing::info!(suite, id = %record.id, "stress ramp starting");
        let notes = record.notes.clone().unwrap_or_default();
        let mut rows = Vec::with_capacity(STRESS_ITERATIONS);
        let mut previous: Option<f64> = None;
        let mut termination = StressTermination::Completed;

        for iteration in 1..=STRESS_ITERATIONS {
            if self.cancelled() {
                termination = StressTermination::Interrupted {
                    completed: rows.len(),
                };
                break;
            }

            let probe = synth::build(record, iteration);
            let step = match self.measure(record, &matcher, &probe) {
                Ok(measurement) => {
                    let growth = previous
                        .map(|prev| analyze(prev, measurement.elapsed_secs, &self.settings().growth));
                    previous = Some(measurement.elapsed_secs);
                    StressStep::Measured {
                        elapsed: measurement.elapsed_secs,
                        outcome: measurement.outcome,
                        growth,
                    }
                }
                Err(MatchError::Timeout { budget }) => {
                    termination = StressTermination::TimedOut { iteration };
                    StressStep::TimedOut {
                        budget_ms: budget.as_millis() as u64,
                    }
                }
                Err(err) => {
                    termination = StressTermination::EngineFailed { iteration };
                    StressStep::EngineFailed {
                        error: err.to_string(),
                    }
                }
            };

            let stop = !matches!(step, StressStep::Measured { .. });
            rows.push(StressRow {
                id: record.id.clone(),
                iteration,
                probe_len: probe.len(),
                step,
                notes: notes.clone(),
            });
            if stop {
                break;
            }
        }

        finish(rows, termination)
    }
}
