// SPDX-License-Identifier: PMPL-1.0-or-later

//! Validation orchestration: profile and stress runners

pub mod executor;
pub mod profile;
pub mod stress;
pub mod synth;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use executor::ValidationExecutor;
pub use stress::STRESS_ITERATIONS;

/// Run-wide interrupt flag, checked between records and between stress steps.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
