//! Metric kinds and typed values.
//!
//! The kind decides the write policy (replace for gauge-style kinds,
//! accumulate for rate kinds) and, for rate kinds, the time unit the derived
//! rate is expressed in at flush time.

use serde::{Deserialize, Serialize};

/// Declared type of a metric, fixed at definition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricKind {
    Int64,
    Bool,
    Double,
    RatePerSecond,
    RatePerMinute,
    RatePerHour,
    RatePerDay,
}

impl MetricKind {
    pub fn is_rate(self) -> bool {
        self.rate_unit_ms().is_some()
    }

    /// Value type submitted to the backend; every rate kind submits doubles.
    pub fn value_type(self) -> ValueType {
        match self {
            MetricKind::Int64 => ValueType::Int64,
            MetricKind::Bool => ValueType::Bool,
            MetricKind::Double
            | MetricKind::RatePerSecond
            | MetricKind::RatePerMinute
            | MetricKind::RatePerHour
            | MetricKind::RatePerDay => ValueType::Double,
        }
    }

    /// Millisecond length of the rate's time unit; `None` for non-rate kinds.
    pub fn rate_unit_ms(self) -> Option<i64> {
        match self {
            MetricKind::RatePerSecond => Some(1_000),
            MetricKind::RatePerMinute => Some(60_000),
            MetricKind::RatePerHour => Some(3_600_000),
            MetricKind::RatePerDay => Some(86_400_000),
            MetricKind::Int64 | MetricKind::Bool | MetricKind::Double => None,
        }
    }
}

/// Backend-side value encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    Int64,
    Bool,
    Double,
}

/// A single written or submitted value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Int64(i64),
    Bool(bool),
    Double(f64),
}

impl MetricValue {
    pub fn value_type(self) -> ValueType {
        match self {
            MetricValue::Int64(_) => ValueType::Int64,
            MetricValue::Bool(_) => ValueType::Bool,
            MetricValue::Double(_) => ValueType::Double,
        }
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Int64(v)
    }
}

impl From<bool> for MetricValue {
    fn from(v: bool) -> Self {
        MetricValue::Bool(v)
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Double(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_kinds_submit_doubles() {
        for kind in [
            MetricKind::RatePerSecond,
            MetricKind::RatePerMinute,
            MetricKind::RatePerHour,
            MetricKind::RatePerDay,
        ] {
            assert!(kind.is_rate());
            assert_eq!(kind.value_type(), ValueType::Double);
        }
    }

    #[test]
    fn gauge_kinds_have_no_rate_unit() {
        for kind in [MetricKind::Int64, MetricKind::Bool, MetricKind::Double] {
            assert!(!kind.is_rate());
            assert_eq!(kind.rate_unit_ms(), None);
        }
    }

    #[test]
    fn rate_units_in_millis() {
        assert_eq!(MetricKind::RatePerSecond.rate_unit_ms(), Some(1_000));
        assert_eq!(MetricKind::RatePerMinute.rate_unit_ms(), Some(60_000));
        assert_eq!(MetricKind::RatePerHour.rate_unit_ms(), Some(3_600_000));
        assert_eq!(MetricKind::RatePerDay.rate_unit_ms(), Some(86_400_000));
    }

    #[test]
    fn value_type_of_written_values() {
        assert_eq!(MetricValue::from(7i64).value_type(), ValueType::Int64);
        assert_eq!(MetricValue::from(true).value_type(), ValueType::Bool);
        assert_eq!(MetricValue::from(0.5f64).value_type(), ValueType::Double);
    }
}
