// SPDX-License-Identifier: PMPL-1.0-or-later

//! Growth analysis between two timed matches

use crate::types::{Growth, GrowthClass};
use serde::{Deserialize, Serialize};

/// Tunables for [`analyze`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthPolicy {
    /// Earlier measurements at or below this many seconds carry no usable ratio.
    pub epsilon_secs: f64,
    /// Growth strictly above this percentage confirms the record.
    pub threshold_percent: f64,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            epsilon_secs: 1e-7,
            threshold_percent: 50.0,
        }
    }
}

/// Relative growth of `t2` over `t1`, both in seconds.
pub fn analyze(t1: f64, t2: f64, policy: &GrowthPolicy) -> Growth {
    if !(t1 > policy.epsilon_secs) || !t2.is_finite() {
        return Growth {
            percent: None,
            classification: GrowthClass::Indeterminate,
        };
    }

    let percent = ((t2 - t1) / t1) * 100.0;
    let classification = if percent > policy.threshold_percent {
        GrowthClass::ConfirmedSuperlinear
    } else {
        GrowthClass::NotConfirmed
    };

    Growth {
        percent: Some(percent),
        classification,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fivefold_is_four_hundred_percent() {
        let growth = analyze(0.001, 0.005, &GrowthPolicy::default());
        let percent = growth.percent.expect("ratio should be defined");
        assert!((percent - 400.0).abs() < 1e-9, "got {}", percent);
        assert_eq!(growth.classification, GrowthClass::ConfirmedSuperlinear);
    }

    #[test]
    fn zero_baseline_is_indeterminate() {
        for t2 in [0.0, 1e-9, 1.0, f64::MAX] {
            let growth = analyze(0.0, t2, &GrowthPolicy::default());
            assert_eq!(growth.classification, GrowthClass::Indeterminate);
            assert!(growth.percent.is_none());
        }
    }

    #[test]
    fn baseline_below_epsilon_is_indeterminate() {
        let policy = GrowthPolicy {
            epsilon_secs: 1e-6,
            ..GrowthPolicy::default()
        };
        let growth = analyze(5e-7, 1.0, &policy);
        assert_eq!(growth.classification, GrowthClass::Indeterminate);
    }

    #[test]
    fn nan_baseline_is_indeterminate() {
        let growth = analyze(f64::NAN, 1.0, &GrowthPolicy::default());
        assert_eq!(growth.classification, GrowthClass::Indeterminate);
    }

    #[test]
    fn threshold_is_strict() {
        let policy = GrowthPolicy {
            epsilon_secs: 1e-9,
            threshold_percent: 100.0,
        };
        let flat = analyze(0.002, 0.004, &policy);
        assert_eq!(flat.classification, GrowthClass::NotConfirmed);
        let steep = analyze(0.002, 0.0041, &policy);
        assert_eq!(steep.classification, GrowthClass::ConfirmedSuperlinear);
    }

    #[test]
    fn shrinking_time_is_negative_growth() {
        let growth = analyze(0.004, 0.002, &GrowthPolicy::default());
        assert_eq!(growth.percent, Some(-50.0));
        assert_eq!(growth.classification, GrowthClass::NotConfirmed);
    }
}
