// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error taxonomy for validation runs.
//!
//! Everything here except [`CorpusError`] is record-scoped: runners turn it into
//! a report row and move on to the next record.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// The matching engine rejected a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{engine} cannot compile pattern: {message}")]
pub struct CompileError {
    pub engine: &'static str,
    pub message: String,
}

/// A timed match that produced no measurement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("match exceeded its {}ms budget", budget.as_millis())]
    Timeout { budget: Duration },

    #[error("match worker could not be started: {0}")]
    Spawn(String),

    #[error("match worker exited without reporting a result")]
    WorkerLost,
}

/// A record that failed load-time validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record '{id}' is malformed: {reason}")]
pub struct MalformedRecord {
    pub id: String,
    pub reason: String,
}

/// Failure to obtain a corpus at all. This one aborts the run.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("reading corpus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing json corpus {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("parsing yaml corpus {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported corpus extension for {0}")]
    UnsupportedExtension(PathBuf),
}
