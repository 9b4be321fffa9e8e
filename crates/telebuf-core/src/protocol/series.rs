//! Time-series submission payload.

use serde::{Deserialize, Serialize};

use crate::kind::MetricValue;
use crate::protocol::descriptor::MetricLabels;

/// One batched submission: a destination and one entry per metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    /// Destination project identifier.
    pub project_id: String,
    pub series: Vec<TimeSeries>,
}

/// One metric's contribution to a flush cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    /// Type identifier, `<namespace>/<group>/<name>`.
    pub metric_type: String,
    pub labels: MetricLabels,
    pub resource: Resource,
    pub point: Point,
}

/// Destination resource descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub labels: ResourceLabels,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLabels {
    pub project_id: String,
}

/// A single timestamped value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    pub value: TypedValue,
}

/// Value encoded per the metric's declared value type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypedValue {
    Int64Value(i64),
    DoubleValue(f64),
    BoolValue(bool),
}

impl From<MetricValue> for TypedValue {
    fn from(v: MetricValue) -> Self {
        match v {
            MetricValue::Int64(i) => TypedValue::Int64Value(i),
            MetricValue::Double(d) => TypedValue::DoubleValue(d),
            MetricValue::Bool(b) => TypedValue::BoolValue(b),
        }
    }
}
