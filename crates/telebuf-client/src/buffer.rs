//! Buffering engine: write handles and the flush-cycle coordinator.
//!
//! One cycle runs two sequential phases: lazily register descriptors the
//! backend has not acknowledged yet, then submit one batched time-series
//! request. Failure at either phase leaves every accumulator and the rate
//! window untouched, so buffered values are re-evaluated over an extended
//! window on the next cycle (at-least-once delivery).

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use futures_util::stream::FuturesUnordered;
use futures_util::StreamExt;
use tokio::sync::Mutex;
use tokio::time::{timeout, Duration};

use telebuf_core::error::{Result, TelebufError};
use telebuf_core::kind::{MetricKind, MetricValue};
use telebuf_core::protocol::{
    DescriptorRequest, MetricLabels, Point, Resource, ResourceLabels, SubmitRequest, TimeSeries,
};
use telebuf_core::rate::rate_of;

use crate::backend::MetricBackend;
use crate::config::BufferConfig;
use crate::registry::{MetricRegistry, SampleData};

/// What one successful cycle did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushOutcome {
    /// Descriptors newly acknowledged by the backend this cycle.
    pub registered: usize,
    /// Points submitted this cycle.
    pub submitted: usize,
}

struct BufferShared {
    cfg: BufferConfig,
    backend: Arc<dyn MetricBackend>,
    registry: MetricRegistry,
    /// End of the previous rate window, in epoch milliseconds. Advanced only
    /// on a confirmed submission so a failed cycle extends the window
    /// instead of skewing it.
    prev_flush_ms: AtomicI64,
    /// Serializes timer-driven and explicit cycles; overlapping cycles
    /// would race on accumulator resets and the rate window.
    flush_gate: Mutex<()>,
}

/// Client-side metrics buffer: accumulates written values in memory and
/// flushes them to a remote backend, converting rate-kind sums into
/// per-unit rates.
#[derive(Clone)]
pub struct MetricBuffer {
    shared: Arc<BufferShared>,
}

impl MetricBuffer {
    pub fn new(cfg: BufferConfig, backend: Arc<dyn MetricBackend>) -> Self {
        Self {
            shared: Arc::new(BufferShared {
                cfg,
                backend,
                registry: MetricRegistry::new(),
                prev_flush_ms: AtomicI64::new(wall_clock_ms()),
                flush_gate: Mutex::new(()),
            }),
        }
    }

    pub fn config(&self) -> &BufferConfig {
        &self.shared.cfg
    }

    /// Define a gauge-style metric and return its write handle. `kind` must
    /// not be a rate kind.
    pub fn define_gauge(&self, name: &str, kind: MetricKind) -> Result<GaugeHandle> {
        if kind.is_rate() {
            return Err(TelebufError::KindMismatch {
                name: name.to_string(),
                detail: format!("{kind:?} is a rate kind; use define_rate"),
            });
        }
        self.shared.registry.define(name, kind)?;
        Ok(GaugeHandle {
            name: Arc::from(name),
            shared: Arc::clone(&self.shared),
        })
    }

    /// Define a rate metric and return its write handle.
    pub fn define_rate(&self, name: &str, kind: MetricKind) -> Result<RateHandle> {
        if !kind.is_rate() {
            return Err(TelebufError::KindMismatch {
                name: name.to_string(),
                detail: format!("{kind:?} is not a rate kind; use define_gauge"),
            });
        }
        self.shared.registry.define(name, kind)?;
        Ok(RateHandle {
            name: Arc::from(name),
            shared: Arc::clone(&self.shared),
            count: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Name-addressed gauge write; synchronous, O(1), never suspends.
    pub fn write_gauge(&self, name: &str, value: impl Into<MetricValue>) -> Result<()> {
        self.shared.registry.write_gauge(name, value.into())
    }

    /// Name-addressed rate-delta write; synchronous, O(1), never suspends.
    pub fn write_rate_delta(&self, name: &str, delta: f64) -> Result<()> {
        self.shared.registry.write_rate_delta(name, delta)
    }

    /// Run one full flush cycle at the current wall-clock time.
    pub async fn flush(&self) -> Result<FlushOutcome> {
        self.flush_at(wall_clock_ms()).await
    }

    /// Run one full flush cycle at an explicit timestamp (epoch
    /// milliseconds). Exposed so tests and shutdown paths can drive cycles
    /// deterministically; shares all logic with the timer path.
    pub async fn flush_at(&self, now_ms: i64) -> Result<FlushOutcome> {
        let _gate = self.shared.flush_gate.lock().await;
        let registered = self.register_pending().await?;
        let submitted = self.submit_points(now_ms).await?;
        Ok(FlushOutcome {
            registered,
            submitted,
        })
    }

    // Phase 1: one registration call per pending metric, issued
    // concurrently, each future carrying its metric name so outcomes
    // correlate without parsing anything out of the response.
    async fn register_pending(&self) -> Result<usize> {
        let pending = self.shared.registry.pending_registrations();
        if pending.is_empty() {
            return Ok(0);
        }
        let call_timeout = Duration::from_millis(self.shared.cfg.backend_timeout_ms);
        let mut calls = FuturesUnordered::new();
        for (name, kind) in pending {
            let req = self.descriptor_request(&name, kind);
            let backend = Arc::clone(&self.shared.backend);
            calls.push(async move {
                let outcome = timeout(call_timeout, backend.register_descriptor(req)).await;
                (name, outcome)
            });
        }

        let mut registered = 0usize;
        let mut first_err: Option<TelebufError> = None;
        while let Some((name, outcome)) = calls.next().await {
            match outcome {
                Ok(Ok(())) => {
                    self.shared.registry.mark_registered(&name);
                    registered += 1;
                    tracing::debug!(metric = %name, "descriptor registered");
                }
                Ok(Err(e)) => {
                    tracing::warn!(metric = %name, error = %e, "descriptor registration failed");
                    first_err
                        .get_or_insert_with(|| TelebufError::Registration(format!("{name}: {e}")));
                }
                Err(_) => {
                    tracing::warn!(metric = %name, "descriptor registration timed out");
                    first_err
                        .get_or_insert_with(|| TelebufError::Registration(format!("{name}: timed out")));
                }
            }
        }
        // any failure in the batch aborts the cycle before Phase 2;
        // successes stay marked and are not re-registered on retry
        match first_err {
            Some(e) => Err(e),
            None => Ok(registered),
        }
    }

    // Phase 2: convert accumulators to points and submit one batch.
    async fn submit_points(&self, now_ms: i64) -> Result<usize> {
        let prev_ms = self.shared.prev_flush_ms.load(Ordering::Acquire);
        let samples = self.shared.registry.snapshot();
        if samples.is_empty() {
            // nothing written and no rate metrics: a quiet cycle, not an error
            self.shared.prev_flush_ms.store(now_ms, Ordering::Release);
            return Ok(0);
        }

        let mut series = Vec::with_capacity(samples.len());
        for sample in &samples {
            let value = match &sample.data {
                SampleData::Rate { sum, unit_ms } => {
                    MetricValue::Double(rate_of(*sum, now_ms, prev_ms, *unit_ms))
                }
                SampleData::Gauge(value) => *value,
            };
            series.push(TimeSeries {
                metric_type: self.shared.cfg.metric_type(&sample.name),
                labels: self.labels(),
                resource: Resource {
                    resource_type: "global".into(),
                    labels: ResourceLabels {
                        project_id: self.shared.cfg.project_id.clone(),
                    },
                },
                point: Point {
                    timestamp_ms: now_ms,
                    value: value.into(),
                },
            });
        }

        let sent = series.len();
        let request = SubmitRequest {
            project_id: self.shared.cfg.project_id.clone(),
            series,
        };
        let call_timeout = Duration::from_millis(self.shared.cfg.backend_timeout_ms);
        match timeout(call_timeout, self.shared.backend.submit_time_series(request)).await {
            Ok(Ok(())) => {
                // relative to the snapshot: writes that raced the backend
                // call stay buffered for the next cycle
                self.shared.registry.reset_after_flush(&samples);
                self.shared.prev_flush_ms.store(now_ms, Ordering::Release);
                tracing::debug!(points = sent, "time series submitted");
                Ok(sent)
            }
            Ok(Err(e)) => Err(TelebufError::Submission(e.to_string())),
            Err(_) => Err(TelebufError::Submission("timed out".into())),
        }
    }

    fn descriptor_request(&self, name: &str, kind: MetricKind) -> DescriptorRequest {
        let cfg = &self.shared.cfg;
        DescriptorRequest {
            display_name: cfg.display_name(name),
            description: format!("{} reported by {}", name, cfg.app_name),
            metric_type: cfg.metric_type(name),
            metric_kind: "GAUGE".into(),
            value_type: kind.value_type(),
            labels: self.labels(),
        }
    }

    fn labels(&self) -> MetricLabels {
        MetricLabels {
            app_name: self.shared.cfg.app_name.clone(),
            env_name: self.shared.cfg.env_name.clone(),
        }
    }
}

/// Write capability bound to one gauge-style metric.
#[derive(Clone)]
pub struct GaugeHandle {
    name: Arc<str>,
    shared: Arc<BufferShared>,
}

impl std::fmt::Debug for GaugeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaugeHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl GaugeHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the buffered value; it is reported once on the next
    /// successful flush.
    pub fn set(&self, value: impl Into<MetricValue>) -> Result<()> {
        self.shared.registry.write_gauge(&self.name, value.into())
    }
}

/// Write capability bound to one rate metric.
#[derive(Clone)]
pub struct RateHandle {
    name: Arc<str>,
    shared: Arc<BufferShared>,
    count: Arc<AtomicU64>,
}

impl std::fmt::Debug for RateHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl RateHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add to the since-last-flush delta sum.
    pub fn add(&self, delta: f64) -> Result<()> {
        self.shared.registry.write_rate_delta(&self.name, delta)
    }

    /// Count `n` events: bumps the handle-local running total and forwards
    /// only the delta, so the accumulator stays a since-last-flush sum and
    /// monotonic callers never double-count.
    pub fn add_count(&self, n: u64) -> Result<()> {
        self.shared.registry.write_rate_delta(&self.name, n as f64)?;
        self.count.fetch_add(n, Ordering::Relaxed);
        Ok(())
    }

    /// Monotonic total counted through this handle.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

fn wall_clock_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
