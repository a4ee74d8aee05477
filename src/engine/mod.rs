// SPDX-License-Identifier: PMPL-1.0-or-later

//! Matching engine adapter
//!
//! The subject under test is input built to explode matching time, so every
//! match runs on its own worker thread and the caller only waits for the
//! budget. A worker that outlives its budget is abandoned, not killed: the
//! engines we wrap have no preemption point.

pub mod backtrack;

use crate::error::{CompileError, MatchError};
use crate::types::{MatchOutcome, Measurement, RegexFlag};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub use backtrack::BacktrackEngine;

/// A compiled pattern, shareable with match workers.
pub trait Matcher: Send + Sync {
    fn is_match(&self, input: &str) -> bool;
}

/// Something that turns pattern text into a [`Matcher`].
pub trait MatchEngine: Send + Sync {
    fn name(&self) -> &'static str;

    fn compile(&self, pattern: &str, flags: &[RegexFlag])
        -> Result<Arc<dyn Matcher>, CompileError>;
}

/// Run one match under a wall-clock budget.
///
/// Elapsed time is taken inside the worker around the match call alone, so
/// thread start-up does not leak into the measurement.
pub fn timed_match(
    matcher: &Arc<dyn Matcher>,
    input: &str,
    budget: Duration,
) -> Result<Measurement, MatchError> {
    let (tx, rx) = mpsc::channel();
    let worker = Arc::clone(matcher);
    let input = input.to_owned();

    thread::Builder::new()
        .name("pump-match".to_string())
        .spawn(move || {
            let start = Instant::now();
            let matched = worker.is_match(&input);
            let elapsed = start.elapsed();
            // The receiver is gone once the caller gave up on us.
            let _ = tx.send((elapsed, matched));
        })
        .map_err(|err| MatchError::Spawn(err.to_string()))?;

    match rx.recv_timeout(budget) {
        Ok((elapsed, matched)) => Ok(Measurement {
            elapsed_secs: elapsed.as_secs_f64(),
            outcome: if matched {
                MatchOutcome::Matched
            } else {
                MatchOutcome::Unmatched
            },
        }),
        Err(RecvTimeoutError::Timeout) => Err(MatchError::Timeout { budget }),
        Err(RecvTimeoutError::Disconnected) => Err(MatchError::WorkerLost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sleepy(Duration);

    impl Matcher for Sleepy {
        fn is_match(&self, _input: &str) -> bool {
            thread::sleep(self.0);
            true
        }
    }

    struct Exploding;

    impl Matcher for Exploding {
        fn is_match(&self, _input: &str) -> bool {
            panic!("engine blew up");
        }
    }

    #[test]
    fn fast_match_reports_elapsed_and_outcome() {
        let matcher: Arc<dyn Matcher> = Arc::new(Sleepy(Duration::from_millis(5)));
        let measurement =
            timed_match(&matcher, "abc", Duration::from_secs(5)).expect("match should finish");
        assert_eq!(measurement.outcome, MatchOutcome::Matched);
        assert!(measurement.elapsed_secs >= 0.005);
    }

    #[test]
    fn slow_match_times_out_without_blocking() {
        let matcher: Arc<dyn Matcher> = Arc::new(Sleepy(Duration::from_secs(30)));
        let start = Instant::now();
        let result = timed_match(&matcher, "abc", Duration::from_millis(50));
        assert_eq!(
            result,
            Err(MatchError::Timeout {
                budget: Duration::from_millis(50)
            })
        );
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn panicking_worker_is_reported() {
        let matcher: Arc<dyn Matcher> = Arc::new(Exploding);
        let result = timed_match(&matcher, "abc", Duration::from_secs(5));
        assert_eq!(result, Err(MatchError::WorkerLost));
    }
}
