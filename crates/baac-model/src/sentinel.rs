//! Missing-value sentinels.
//!
//! BAAC files mark absent or not-applicable values with `-1`, and text
//! exports add empty strings, `"."` and `"nan"`. The later pipeline variant
//! also treats `0` as missing, which is why columns where `0` is a real
//! category get re-based before filtering.
//!
//! Every check on a cell goes through [`SentinelPolicy`] so the recoding rules,
//! the row filter and the availability report agree on what "missing" means.

use baac_common::{any_to_f64, parse_f64};
use polars::prelude::AnyValue;
use serde::{Deserialize, Serialize};

/// The unknown / not-applicable code.
pub const UNKNOWN: i64 = -1;

/// Which values count as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentinelPolicy {
    /// Empty, `"."`, `"nan"`, null/NaN and `-1`.
    Lenient,
    /// Everything in `Lenient`, plus `0`.
    #[default]
    Strict,
}

impl SentinelPolicy {
    /// Whether `0` is treated as missing.
    #[must_use]
    pub const fn zero_is_missing(self) -> bool {
        matches!(self, Self::Strict)
    }

    #[must_use]
    pub fn is_sentinel_i64(self, value: i64) -> bool {
        value == UNKNOWN || (self.zero_is_missing() && value == 0)
    }

    /// NaN is the float encoding of an unset value.
    #[must_use]
    pub fn is_sentinel_f64(self, value: f64) -> bool {
        value.is_nan() || value == UNKNOWN as f64 || (self.zero_is_missing() && value == 0.0)
    }

    /// Text cells are trimmed, so `" -1"` is a sentinel like `"-1"`.
    #[must_use]
    pub fn is_sentinel_str(self, value: &str) -> bool {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "." || trimmed.eq_ignore_ascii_case("nan") {
            return true;
        }
        parse_f64(trimmed).is_some_and(|number| self.is_sentinel_f64(number))
    }

    /// Generic cell check; `Null` is always missing.
    #[must_use]
    pub fn is_sentinel(self, value: &AnyValue<'_>) -> bool {
        match value {
            AnyValue::Null => true,
            AnyValue::String(s) => self.is_sentinel_str(s),
            AnyValue::StringOwned(s) => self.is_sentinel_str(s),
            other => any_to_f64(other.clone()).is_some_and(|number| self.is_sentinel_f64(number)),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::Strict => "strict",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minus_one_is_missing_under_both_policies() {
        for policy in [SentinelPolicy::Lenient, SentinelPolicy::Strict] {
            assert!(policy.is_sentinel_i64(-1));
            assert!(policy.is_sentinel_f64(-1.0));
            assert!(policy.is_sentinel_str("-1"));
            assert!(policy.is_sentinel_str(" -1"));
            assert!(policy.is_sentinel(&AnyValue::Int64(-1)));
        }
    }

    #[test]
    fn zero_depends_on_policy() {
        assert!(!SentinelPolicy::Lenient.is_sentinel_i64(0));
        assert!(SentinelPolicy::Strict.is_sentinel_i64(0));
        assert!(!SentinelPolicy::Lenient.is_sentinel_str("0"));
        assert!(SentinelPolicy::Strict.is_sentinel_str("0"));
        assert!(SentinelPolicy::Strict.is_sentinel(&AnyValue::Float64(0.0)));
    }

    #[test]
    fn text_markers_are_missing() {
        let policy = SentinelPolicy::Lenient;
        assert!(policy.is_sentinel_str(""));
        assert!(policy.is_sentinel_str("   "));
        assert!(policy.is_sentinel_str("."));
        assert!(policy.is_sentinel_str("NaN"));
        assert!(!policy.is_sentinel_str("A"));
        assert!(!policy.is_sentinel_str("#ERREUR"));
        assert!(!policy.is_sentinel_str("12"));
    }

    #[test]
    fn null_and_nan_are_missing() {
        let policy = SentinelPolicy::Lenient;
        assert!(policy.is_sentinel(&AnyValue::Null));
        assert!(policy.is_sentinel(&AnyValue::Float64(f64::NAN)));
        assert!(!policy.is_sentinel(&AnyValue::Int32(4)));
        assert!(!policy.is_sentinel(&AnyValue::Boolean(false)));
    }

    #[test]
    fn default_is_strict() {
        assert_eq!(SentinelPolicy::default(), SentinelPolicy::Strict);
        assert_eq!(SentinelPolicy::default().label(), "strict");
    }
}
