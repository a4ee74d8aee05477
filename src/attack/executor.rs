// SPDX-License-Identifier: PMPL-1.0-or-later

//! Shared compile/measure plumbing for both runners

use super::CancelToken;
use crate::config::RunSettings;
use crate::engine::{self, MatchEngine, Matcher};
use crate::error::{CompileError, MatchError};
use crate::types::{Measurement, VulnerabilityRecord};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub struct ValidationExecutor<'e> {
    engine: &'e dyn MatchEngine,
    settings: RunSettings,
    cancel: CancelToken,
    abandoned: AtomicUsize,
}

impl<'e> ValidationExecutor<'e> {
    pub fn new(engine: &'e dyn MatchEngine, settings: RunSettings) -> Self {
        Self {
            engine,
            settings,
            cancel: CancelToken::new(),
            abandoned: AtomicUsize::new(0),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    pub(crate) fn cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Match workers given up on so far. They may still be burning CPU.
    pub fn abandoned_workers(&self) -> usize {
        self.abandoned.load(Ordering::Relaxed)
    }

    pub(crate) fn compile(
        &self,
        record: &VulnerabilityRecord,
    ) -> Result<Arc<dyn Matcher>, CompileError> {
        self.engine
            .compile(&record.pattern, &record.flags)
            .inspect_err(|err| tracing::warn!(id = %record.id, "{}", err))
    }

    pub(crate) fn measure(
        &self,
        record: &VulnerabilityRecord,
        matcher: &Arc<dyn Matcher>,
        probe: &str,
    ) -> Result<Measurement, MatchError> {
        let result = engine::timed_match(matcher, probe, self.settings.budget());
        match &result {
            Ok(measurement) => tracing::debug!(
                id = %record.id,
                probe_len = probe.len(),
                elapsed = measurement.elapsed_secs,
                outcome = ?measurement.outcome,
                "timed match"
            ),
            Err(MatchError::Timeout { budget }) => {
                let abandoned = self.abandoned.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::warn!(
                    id = %record.id,
                    probe_len = probe.len(),
                    budget_ms = budget.as_millis() as u64,
                    abandoned,
                    "match timed out; worker abandoned"
                );
            }
            Err(err) => tracing::warn!(id = %record.id, "{}", err),
        }
        result
    }
}
