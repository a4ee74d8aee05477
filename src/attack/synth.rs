// SPDX-License-Identifier: PMPL-1.0-or-later

//! Attack string synthesis

use crate::types::VulnerabilityRecord;

/// Longest probe the runners will build.
pub const MAX_PROBE_LEN: usize = 1 << 30;

/// `prefix ++ pumpable * pump_count ++ suffix`
///
/// Callers check [`probe_len`] first; this does not guard against sizes
/// that cannot be allocated.
pub fn build(record: &VulnerabilityRecord, pump_count: usize) -> String {
    let mut probe = String::with_capacity(probe_len(record, pump_count).unwrap_or(0));
    probe.push_str(&record.prefix);
    for _ in 0..pump_count {
        probe.push_str(&record.pumpable);
    }
    probe.push_str(&record.suffix);
    probe
}

/// Byte length of `build(record, pump_count)` without building it, or `None`
/// past [`MAX_PROBE_LEN`].
pub fn probe_len(record: &VulnerabilityRecord, pump_count: usize) -> Option<usize> {
    pump_count
        .checked_mul(record.pumpable.len())?
        .checked_add(record.prefix.len())?
        .checked_add(record.suffix.len())
        .filter(|len| *len <= MAX_PROBE_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(prefix: &str, pumpable: &str, suffix: &str) -> VulnerabilityRecord {
        VulnerabilityRecord::new("t", "x", prefix, pumpable, suffix, 1)
    }

    #[test]
    fn zero_pumps_is_prefix_and_suffix() {
        let r = record("<a", "bc", "!");
        assert_eq!(build(&r, 0), "<a!");
    }

    #[test]
    fn length_follows_pump_count() {
        let r = record("a:\\0", "\\0\\0", "\u{0}");
        for k in 0..12 {
            let probe = build(&r, k);
            assert_eq!(
                probe.len(),
                r.prefix.len() + k * r.pumpable.len() + r.suffix.len()
            );
            assert_eq!(Some(probe.len()), probe_len(&r, k));
        }
    }

    #[test]
    fn repeated_calls_agree() {
        let r = record("post ?", "=&&", "");
        assert_eq!(build(&r, 7), build(&r, 7));
        assert_eq!(build(&r, 3), "post ?=&&=&&=&&");
    }

    #[test]
    fn multibyte_pumpable() {
        let r = record("", "\u{00e9}\u{2028}", "x");
        let probe = build(&r, 4);
        assert_eq!(probe.chars().count(), 9);
        assert_eq!(Some(probe.len()), probe_len(&r, 4));
    }

    #[test]
    fn oversized_probes_have_no_length() {
        let r = record("ab", "cd", "");
        assert_eq!(probe_len(&r, usize::MAX), None);
        assert_eq!(probe_len(&r, MAX_PROBE_LEN), None);
        assert_eq!(probe_len(&r, (MAX_PROBE_LEN - 2) / 2), Some(MAX_PROBE_LEN));
    }
}
