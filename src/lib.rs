// SPDX-License-Identifier: PMPL-1.0-or-later

//! pump-attack: empirical confirmation of ReDoS candidates.
//!
//! Static analysis upstream flags a regex as vulnerable and hands over an
//! attack template: a prefix, a pumpable string and a suffix. This crate
//! grows that template, times a backtracking engine against it and reports
//! whether matching time grows super-linearly.
//!
//! PIPELINE:
//! 1. **Corpus**: ordered records, validated once at load time.
//! 2. **Attack**: probe synthesis plus the profile and stress runners.
//! 3. **Engine**: compile once per record, match on a bounded worker thread.
//! 4. **Analysis**: relative growth between two measurements.
//! 5. **Report**: fixed-width tables and JSON/YAML export.

pub mod analysis;
pub mod attack;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod report;
pub mod types;
