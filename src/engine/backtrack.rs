// SPDX-License-Identifier: PMPL-1.0-or-later

//! Classical backtracking engine backed by `regress`.
//!
//! Flags are passed without `u`, which keeps Annex-B escape leniency: corpus
//! patterns written for other dialects (`\:`, `\&`, `\#`) still compile.
//!
//! Matches are anchored at the start of the input, never retried at later
//! offsets. `m` only changes what `^` means inside the pattern.

use super::{MatchEngine, Matcher};
use crate::error::CompileError;
use crate::types::RegexFlag;
use std::sync::Arc;

const ENGINE_NAME: &str = "regress";

/// Holds only at offset 0, whatever the flags say.
const INPUT_START: &str = r"(?<![\s\S])";

#[derive(Debug, Clone, Copy, Default)]
pub struct BacktrackEngine;

impl BacktrackEngine {
    pub fn new() -> Self {
        Self
    }

    /// Native flag string for the option set.
    pub fn flag_string(flags: &[RegexFlag]) -> String {
        let mut native = String::new();
        for flag in flags {
            let c = match flag {
                RegexFlag::CaseInsensitive => 'i',
                RegexFlag::DotMatchesNewline => 's',
                RegexFlag::Multiline => 'm',
            };
            if !native.contains(c) {
                native.push(c);
            }
        }
        native
    }
}

struct BacktrackMatcher {
    regex: regress::Regex,
}

impl Matcher for BacktrackMatcher {
    fn is_match(&self, input: &str) -> bool {
        self.regex.find(input).is_some()
    }
}

impl MatchEngine for BacktrackEngine {
    fn name(&self) -> &'static str {
        ENGINE_NAME
    }

    fn compile(
        &self,
        pattern: &str,
        flags: &[RegexFlag],
    ) -> Result<Arc<dyn Matcher>, CompileError> {
        let native = Self::flag_string(flags);
        let reject = |err: regress::Error| CompileError {
            engine: ENGINE_NAME,
            message: err.to_string(),
        };
        // The bare pattern must stand on its own before it is wrapped, or a
        // stray `)` could close the anchoring group.
        regress::Regex::with_flags(pattern, native.as_str()).map_err(reject)?;
        let anchored = format!("{}(?:{})", INPUT_START, pattern);
        let regex = regress::Regex::with_flags(&anchored, native.as_str()).map_err(reject)?;
        Ok(Arc::new(BacktrackMatcher { regex }))
    }
}
