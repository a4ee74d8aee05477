// SPDX-License-Identifier: PMPL-1.0-or-later

//! Run settings, loadable from a JSON or YAML file and overridable from the CLI.

use crate::analysis::GrowthPolicy;
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Added to every record's baseline pump count in profile mode.
    pub base: usize,
    /// Wall-clock budget for a single match.
    pub budget_ms: u64,
    pub growth: GrowthPolicy,
    /// Profile records on the rayon pool instead of one after another.
    pub parallel: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            base: 0,
            budget_ms: 5_000,
            growth: GrowthPolicy::default(),
            parallel: false,
        }
    }
}

impl RunSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading run settings {}", path.display()))?;
        let settings: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("parsing json run settings {}", path.display()))?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("parsing yaml run settings {}", path.display()))?,
            _ => {
                return Err(anyhow!(
                    "unsupported run settings extension for {}",
                    path.display()
                ))
            }
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.budget_ms == 0 {
            bail!("match budget must be at least 1ms");
        }
        if !self.growth.threshold_percent.is_finite() {
            bail!("growth threshold must be a finite percentage");
        }
        if !(self.growth.epsilon_secs >= 0.0) {
            bail!("growth epsilon must be a non-negative number of seconds");
        }
        Ok(())
    }

    pub fn budget(&self) -> Duration {
        Duration::from_millis(self.budget_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let dir = TempDir::new().expect("tempdir should create");
        let path = dir.path().join("settings.yaml");
        fs::write(&path, "budget_ms: 250\ngrowth:\n  threshold_percent: 80\n")
            .expect("settings should write");

        let settings = RunSettings::load(&path).expect("settings should load");
        assert_eq!(settings.budget_ms, 250);
        assert_eq!(settings.growth.threshold_percent, 80.0);
        assert_eq!(settings.growth.epsilon_secs, GrowthPolicy::default().epsilon_secs);
        assert_eq!(settings.base, 0);
        assert!(!settings.parallel);
    }

    #[test]
    fn zero_budget_is_rejected() {
        let dir = TempDir::new().expect("tempdir should create");
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"budget_ms": 0}"#).expect("settings should write");
        let err = RunSettings::load(&path).expect_err("zero budget should fail");
        assert!(err.to_string().contains("budget"));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = TempDir::new().expect("tempdir should create");
        let path = dir.path().join("settings.toml");
        fs::write(&path, "base = 1").expect("settings should write");
        assert!(RunSettings::load(&path).is_err());
    }
}
