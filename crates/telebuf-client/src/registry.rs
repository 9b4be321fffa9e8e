//! Metric registry and in-memory accumulators.
//!
//! The registry is the only shared mutable resource in the engine:
//! application threads mutate accumulators through the write path, and the
//! flush coordinator reads snapshots and resets accumulators after a
//! confirmed submission. Entries live behind a `DashMap`, so writes stay
//! O(1) and never suspend.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use telebuf_core::error::{Result, TelebufError};
use telebuf_core::kind::{MetricKind, MetricValue};

/// Accumulated state for one metric.
#[derive(Debug, Clone)]
struct MetricState {
    kind: MetricKind,
    accum: Accumulator,
    /// Whether the backend has acknowledged descriptor creation. Flips
    /// `false -> true` exactly once and never reverts.
    remote_registered: bool,
}

/// Write policy per kind: rate kinds sum deltas, gauge kinds keep the last
/// written value.
#[derive(Debug, Clone, PartialEq)]
enum Accumulator {
    /// Running delta sum since the last successful flush. Never unset.
    Rate(f64),
    /// Last written value; `None` means unwritten since the last flush and
    /// the metric is omitted from the next submission.
    Gauge(Option<MetricValue>),
}

impl Accumulator {
    fn empty_for(kind: MetricKind) -> Self {
        if kind.is_rate() {
            Accumulator::Rate(0.0)
        } else {
            Accumulator::Gauge(None)
        }
    }
}

/// A submittable value captured by [`MetricRegistry::snapshot`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Sample {
    pub name: String,
    pub data: SampleData,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SampleData {
    /// Delta sum plus the unit the derived rate is expressed in.
    Rate { sum: f64, unit_ms: i64 },
    Gauge(MetricValue),
}

/// Name -> metric state map; source of truth for kind and registration
/// status.
#[derive(Default)]
pub struct MetricRegistry {
    metrics: DashMap<String, MetricState>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a new metric. Duplicate names are rejected; redefining a live
    /// metric is always a wiring mistake.
    pub fn define(&self, name: &str, kind: MetricKind) -> Result<()> {
        match self.metrics.entry(name.to_string()) {
            Entry::Occupied(_) => Err(TelebufError::DuplicateMetric(name.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(MetricState {
                    kind,
                    accum: Accumulator::empty_for(kind),
                    remote_registered: false,
                });
                tracing::debug!(metric = %name, ?kind, "metric defined");
                Ok(())
            }
        }
    }

    /// Replace the buffered value of a gauge-style metric.
    pub fn write_gauge(&self, name: &str, value: MetricValue) -> Result<()> {
        let mut state = self
            .metrics
            .get_mut(name)
            .ok_or_else(|| TelebufError::UnknownMetric(name.to_string()))?;
        if state.kind.is_rate() {
            return Err(TelebufError::KindMismatch {
                name: name.to_string(),
                detail: "rate metric cannot accept a gauge write".into(),
            });
        }
        if value.value_type() != state.kind.value_type() {
            return Err(TelebufError::KindMismatch {
                name: name.to_string(),
                detail: format!(
                    "{:?} value written to {:?} metric",
                    value.value_type(),
                    state.kind
                ),
            });
        }
        state.accum = Accumulator::Gauge(Some(value));
        Ok(())
    }

    /// Add a delta to a rate metric's since-last-flush sum.
    pub fn write_rate_delta(&self, name: &str, delta: f64) -> Result<()> {
        let mut state = self
            .metrics
            .get_mut(name)
            .ok_or_else(|| TelebufError::UnknownMetric(name.to_string()))?;
        match &mut state.accum {
            Accumulator::Rate(sum) => {
                *sum += delta;
                Ok(())
            }
            Accumulator::Gauge(_) => Err(TelebufError::KindMismatch {
                name: name.to_string(),
                detail: "gauge metric cannot accept a rate delta".into(),
            }),
        }
    }

    /// Metrics the backend has not acknowledged yet.
    pub(crate) fn pending_registrations(&self) -> Vec<(String, MetricKind)> {
        self.metrics
            .iter()
            .filter(|e| !e.remote_registered)
            .map(|e| (e.key().clone(), e.kind))
            .collect()
    }

    /// No-op on unknown names; in correct operation registration outcomes
    /// are correlated to known names only.
    pub(crate) fn mark_registered(&self, name: &str) {
        if let Some(mut state) = self.metrics.get_mut(name) {
            state.remote_registered = true;
        }
    }

    /// Submittable values at this instant: every rate metric (a zero sum is
    /// still reported as a zero rate) plus gauges written since the last
    /// flush.
    pub(crate) fn snapshot(&self) -> Vec<Sample> {
        let mut out = Vec::with_capacity(self.metrics.len());
        for entry in self.metrics.iter() {
            match (&entry.accum, entry.kind.rate_unit_ms()) {
                (Accumulator::Rate(sum), Some(unit_ms)) => out.push(Sample {
                    name: entry.key().clone(),
                    data: SampleData::Rate { sum: *sum, unit_ms },
                }),
                (Accumulator::Gauge(Some(value)), _) => out.push(Sample {
                    name: entry.key().clone(),
                    data: SampleData::Gauge(*value),
                }),
                _ => {}
            }
        }
        out
    }

    /// Retire the submitted portion of each included accumulator. The reset
    /// is relative to the snapshot, not absolute: writes that landed while
    /// the submission call was in flight stay buffered for the next cycle.
    /// Rate sums subtract what was sent; a gauge clears only when its value
    /// is still the one that was sent.
    pub(crate) fn reset_after_flush(&self, included: &[Sample]) {
        for sample in included {
            if let Some(mut state) = self.metrics.get_mut(sample.name.as_str()) {
                match (&mut state.accum, &sample.data) {
                    (Accumulator::Rate(sum), SampleData::Rate { sum: sent, .. }) => {
                        *sum -= sent;
                    }
                    (Accumulator::Gauge(current), SampleData::Gauge(sent)) => {
                        if *current == Some(*sent) {
                            *current = None;
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}
