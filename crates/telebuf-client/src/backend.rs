//! Backend adapter seam.

use async_trait::async_trait;

use telebuf_core::error::Result;
use telebuf_core::protocol::{DescriptorRequest, SubmitRequest};

/// Remote monitoring backend, consumed through exactly two operations.
///
/// Implementations own transport, auth, and retry policy. Both calls are
/// all-or-nothing: a transport error fails the whole request and the flush
/// coordinator keeps buffered state for the next cycle.
#[async_trait]
pub trait MetricBackend: Send + Sync {
    /// Create (or confirm) the backend-side descriptor for one metric.
    async fn register_descriptor(&self, descriptor: DescriptorRequest) -> Result<()>;

    /// Submit one batched time-series request, one entry per metric.
    async fn submit_time_series(&self, request: SubmitRequest) -> Result<()>;
}
