//! Descriptor-creation payload.
//!
//! A descriptor must exist backend-side before time-series points for the
//! metric are accepted. Registration is lazy: the first flush cycle that sees
//! a metric without a backend acknowledgement issues one of these.

use serde::{Deserialize, Serialize};

use crate::kind::ValueType;

/// Request payload for `register_descriptor`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorRequest {
    /// Human-readable name shown by the backend UI.
    pub display_name: String,
    pub description: String,
    /// Type identifier, `<namespace>/<group>/<name>`.
    #[serde(rename = "type")]
    pub metric_type: String,
    /// Always `GAUGE`: rate kinds are converted to point-in-time rates
    /// before submission.
    pub metric_kind: String,
    pub value_type: ValueType,
    pub labels: MetricLabels,
}

/// Fixed label set attached to every descriptor and time-series entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricLabels {
    pub app_name: String,
    pub env_name: String,
}
