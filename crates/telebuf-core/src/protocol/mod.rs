//! Wire payloads exchanged with a metric backend.
//!
//! These are plain serde shapes; transport and auth belong to backend
//! adapter implementations.

pub mod descriptor;
pub mod series;

pub use descriptor::{DescriptorRequest, MetricLabels};
pub use series::{Point, Resource, ResourceLabels, SubmitRequest, TimeSeries, TypedValue};
