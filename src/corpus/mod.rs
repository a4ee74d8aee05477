// SPDX-License-Identifier: PMPL-1.0-or-later

//! Corpus loading and load-time validation.
//!
//! Structural problems (a file that does not parse, a record missing `id` or
//! `pumpable`) fail the whole load. Semantic problems (an empty pattern on a
//! record that would run, a zero pump count) only mark that record malformed.

pub mod builtin;

use crate::error::{CorpusError, MalformedRecord};
use crate::types::{execution_defect, RecordState, RegexFlag, VulnerabilityRecord};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub use builtin::Suite;

/// An ordered, immutable list of records.
#[derive(Debug, Clone)]
pub struct Corpus {
    pub suite: String,
    pub records: Vec<VulnerabilityRecord>,
}

impl Corpus {
    /// Build a corpus from records constructed in code. They go through the
    /// same checks as loaded records; a failing record turns `Malformed`.
    pub fn from_records(suite: impl Into<String>, records: Vec<VulnerabilityRecord>) -> Self {
        let mut seen = HashSet::new();
        let records = records
            .into_iter()
            .map(|mut record| {
                if matches!(record.state, RecordState::Malformed { .. }) {
                    return record;
                }
                let skip = !record.is_runnable();
                let verdict = check_fields(
                    &record.id,
                    skip,
                    &record.pattern,
                    &record.pumpable,
                    record.baseline_pump_count,
                    &mut seen,
                );
                if let Err(err) = verdict {
                    tracing::warn!("{}", err);
                    record.state = RecordState::Malformed { reason: err.reason };
                }
                record
            })
            .collect();
        Self {
            suite: suite.into(),
            records,
        }
    }

    pub fn get(&self, id: &str) -> Option<&VulnerabilityRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn runnable(&self) -> usize {
        self.records.iter().filter(|r| r.is_runnable()).count()
    }

    /// Load a JSON or YAML corpus file, dispatching on its extension.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let content = fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let fallback = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "corpus".to_string());

        let document = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => parse_json(&content).map_err(|source| CorpusError::Json {
                path: path.to_path_buf(),
                source,
            })?,
            Some("yaml") | Some("yml") => {
                parse_yaml(&content).map_err(|source| CorpusError::Yaml {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            _ => return Err(CorpusError::UnsupportedExtension(path.to_path_buf())),
        };

        Ok(document.into_corpus(fallback))
    }
}

/// Record layout as found in corpus files
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(alias = "index")]
    pub id: String,
    #[serde(default, alias = "exp")]
    pub pattern: String,
    #[serde(default)]
    pub flags: Vec<RegexFlag>,
    pub prefix: String,
    pub pumpable: String,
    pub suffix: String,
    #[serde(alias = "n")]
    pub baseline_pump_count: usize,
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub kleene: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SuiteDocument {
    #[serde(default)]
    suite: Option<String>,
    records: Vec<RawRecord>,
}

#[derive(Debug)]
struct CorpusDocument {
    suite: Option<String>,
    records: Vec<RawRecord>,
}

impl CorpusDocument {
    fn into_corpus(self, fallback_suite: String) -> Corpus {
        let suite = self.suite.unwrap_or(fallback_suite);
        let mut seen = HashSet::new();
        let records = self
            .records
            .into_iter()
            .map(|raw| validate(raw, &mut seen))
            .collect::<Vec<_>>();
        tracing::debug!(suite = %suite, records = records.len(), "corpus loaded");
        Corpus { suite, records }
    }
}

// A corpus file is either a bare list of records or `{ suite, records }`.
fn parse_json(content: &str) -> Result<CorpusDocument, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    if value.is_array() {
        Ok(CorpusDocument {
            suite: None,
            records: serde_json::from_value(value)?,
        })
    } else {
        let doc: SuiteDocument = serde_json::from_value(value)?;
        Ok(CorpusDocument {
            suite: doc.suite,
            records: doc.records,
        })
    }
}

fn parse_yaml(content: &str) -> Result<CorpusDocument, serde_yaml::Error> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)?;
    if value.is_sequence() {
        Ok(CorpusDocument {
            suite: None,
            records: serde_yaml::from_value(value)?,
        })
    } else {
        let doc: SuiteDocument = serde_yaml::from_value(value)?;
        Ok(CorpusDocument {
            suite: doc.suite,
            records: doc.records,
        })
    }
}

fn check(raw: &RawRecord, seen: &mut HashSet<String>) -> Result<(), MalformedRecord> {
    check_fields(
        &raw.id,
        raw.skip,
        &raw.pattern,
        &raw.pumpable,
        raw.baseline_pump_count,
        seen,
    )
}

fn check_fields(
    id: &str,
    skip: bool,
    pattern: &str,
    pumpable: &str,
    baseline_pump_count: usize,
    seen: &mut HashSet<String>,
) -> Result<(), MalformedRecord> {
    let reject = |reason: &str| MalformedRecord {
        id: id.to_string(),
        reason: reason.to_string(),
    };

    if id.trim().is_empty() {
        return Err(reject("empty id"));
    }
    if !seen.insert(id.to_string()) {
        return Err(reject("duplicate id"));
    }
    if skip {
        return Ok(());
    }
    match execution_defect(pattern, pumpable, baseline_pump_count) {
        Some(reason) => Err(reject(reason)),
        None => Ok(()),
    }
}

/// Decide the record's state once, at load time.
pub fn validate(raw: RawRecord, seen: &mut HashSet<String>) -> VulnerabilityRecord {
    let state = match check(&raw, seen) {
        Err(err) => {
            tracing::warn!("{}", err);
            RecordState::Malformed { reason: err.reason }
        }
        Ok(()) if raw.skip => RecordState::Skipped {
            reason: raw
                .notes
                .clone()
                .unwrap_or_else(|| "flagged skip".to_string()),
        },
        Ok(()) => RecordState::Runnable,
    };

    VulnerabilityRecord {
        id: raw.id,
        pattern: raw.pattern,
        flags: raw.flags,
        prefix: raw.prefix,
        pumpable: raw.pumpable,
        suffix: raw.suffix,
        baseline_pump_count: raw.baseline_pump_count,
        state,
        notes: raw.notes,
        details: raw.details,
        kleene: raw.kleene,
    }
}
