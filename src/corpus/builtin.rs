// SPDX-License-Identifier: PMPL-1.0-or-later

//! Bundled candidate suites.
//!
//! `regexlib` holds candidates harvested from the regexlib.com catalogue,
//! `snort` holds patterns extracted from Snort IDS rules. Both were produced
//! upstream by static analysis and carry their prefix/pumpable/suffix triples.

use super::{parse_json, Corpus};
use crate::error::CorpusError;
use std::path::PathBuf;

const REGEXLIB: &str = include_str!("../../corpora/regexlib.json");
const SNORT: &str = include_str!("../../corpora/snort.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suite {
    Regexlib,
    Snort,
}

impl Suite {
    pub fn all() -> Vec<Self> {
        vec![Suite::Regexlib, Suite::Snort]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Suite::Regexlib => "regexlib",
            Suite::Snort => "snort",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Suite::Regexlib => REGEXLIB,
            Suite::Snort => SNORT,
        }
    }

    pub fn load(&self) -> Result<Corpus, CorpusError> {
        let document = parse_json(self.source()).map_err(|source| CorpusError::Json {
            path: PathBuf::from(format!("<bundled {}>", self.name())),
            source,
        })?;
        Ok(document.into_corpus(self.name().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RecordState, RegexFlag};

    #[test]
    fn bundled_suites_parse_cleanly() {
        for suite in Suite::all() {
            let corpus = suite.load().expect("bundled suite should parse");
            assert_eq!(corpus.suite, suite.name());
            assert!(!corpus.is_empty());
            assert!(
                corpus
                    .records
                    .iter()
                    .all(|r| !matches!(r.state, RecordState::Malformed { .. })),
                "bundled {} suite should carry no malformed records",
                suite.name()
            );
        }
    }

    #[test]
    fn regexlib_keeps_skip_annotations() {
        let corpus = Suite::Regexlib.load().expect("bundled suite should parse");
        assert_eq!(corpus.len(), 131);
        let hang = corpus.get("67").expect("record 67 should exist");
        assert_eq!(
            hang.state,
            RecordState::Skipped {
                reason: "skipped - python hangs".to_string()
            }
        );
        let first = corpus.get("15").expect("record 15 should exist");
        assert!(first.is_runnable());
        assert_eq!(first.baseline_pump_count, 5);
    }

    #[test]
    fn snort_records_are_case_insensitive() {
        let corpus = Suite::Snort.load().expect("bundled suite should parse");
        assert_eq!(corpus.len(), 13);
        let record = corpus.get("24").expect("record 24 should exist");
        assert_eq!(record.flags, vec![RegexFlag::CaseInsensitive]);
        assert_eq!(record.pumpable, "\r\n\u{b}");
    }
}
