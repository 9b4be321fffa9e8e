//! Shared test fixtures: a recording mock backend and a baseline config.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use telebuf_client::config::BufferConfig;
use telebuf_client::MetricBackend;
use telebuf_core::error::{Result, TelebufError};
use telebuf_core::protocol::{DescriptorRequest, SubmitRequest};

#[derive(Default)]
pub struct MockBackend {
    pub registered: Mutex<Vec<DescriptorRequest>>,
    pub submitted: Mutex<Vec<SubmitRequest>>,
    pub fail_register: AtomicBool,
    pub fail_submit: AtomicBool,
    /// When set, only registrations whose type identifier ends with this
    /// name fail; the rest of the batch succeeds.
    pub fail_register_named: Mutex<Option<String>>,
    /// When set, a submission suspends until [`MockBackend::release_submit`]
    /// is called, so tests can interleave writes with an in-flight call.
    pub hold_submissions: AtomicBool,
    pub submissions_entered: AtomicUsize,
    release: Notify,
}

#[async_trait]
impl MetricBackend for MockBackend {
    async fn register_descriptor(&self, descriptor: DescriptorRequest) -> Result<()> {
        if self.fail_register.load(Ordering::SeqCst) {
            return Err(TelebufError::Io("backend unavailable".into()));
        }
        if let Some(name) = self.fail_register_named.lock().unwrap().as_deref() {
            if descriptor.metric_type.ends_with(name) {
                return Err(TelebufError::Io("backend unavailable".into()));
            }
        }
        self.registered.lock().unwrap().push(descriptor);
        Ok(())
    }

    async fn submit_time_series(&self, request: SubmitRequest) -> Result<()> {
        self.submissions_entered.fetch_add(1, Ordering::SeqCst);
        if self.hold_submissions.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(TelebufError::Io("backend unavailable".into()));
        }
        self.submitted.lock().unwrap().push(request);
        Ok(())
    }
}

impl MockBackend {
    /// Let one held submission proceed. A permit is stored if the call has
    /// not reached its suspension point yet.
    pub fn release_submit(&self) {
        self.hold_submissions.store(false, Ordering::SeqCst);
        self.release.notify_one();
    }

    pub fn registered_count(&self) -> usize {
        self.registered.lock().unwrap().len()
    }

    pub fn submitted_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    pub fn last_submission(&self) -> SubmitRequest {
        self.submitted.lock().unwrap().last().cloned().unwrap()
    }
}

pub fn test_config() -> BufferConfig {
    BufferConfig {
        project_id: "acme-prod".into(),
        credentials: None,
        app_name: "checkout".into(),
        env_name: "prod".into(),
        metric_group: "checkout".into(),
        namespace: "custom.googleapis.com".into(),
        flush_interval_ms: 0,
        backend_timeout_ms: 1_000,
    }
}

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
