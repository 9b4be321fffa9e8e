//! telebuf client library entry.
//!
//! This crate wires the metric registry, the flush-cycle coordinator, the
//! backend seam, and the scheduler into a buffering engine. It is intended to
//! be consumed by host applications and by integration tests.

pub mod backend;
pub mod buffer;
pub mod config;
pub mod registry;
pub mod scheduler;

pub use backend::MetricBackend;
pub use buffer::{FlushOutcome, GaugeHandle, MetricBuffer, RateHandle};
pub use config::BufferConfig;
pub use registry::MetricRegistry;
pub use scheduler::FlushScheduler;

pub use telebuf_core::{MetricKind, MetricValue};
