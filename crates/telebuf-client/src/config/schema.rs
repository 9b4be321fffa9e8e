use serde::Deserialize;

use telebuf_core::error::{Result, TelebufError};

/// Construction-time settings for one buffering instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BufferConfig {
    /// Destination project identifier.
    pub project_id: String,

    /// Opaque credentials reference, handed through to backend
    /// implementations; the engine never interprets it.
    #[serde(default)]
    pub credentials: Option<String>,

    pub app_name: String,
    pub env_name: String,

    /// Metric group, the middle segment of every type identifier.
    pub metric_group: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// 0 disables the recurring timer; flushes then happen only on explicit
    /// calls.
    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,

    /// Upper bound for each backend call within a flush cycle; a call that
    /// exceeds it fails the phase.
    #[serde(default = "default_backend_timeout_ms")]
    pub backend_timeout_ms: u64,
}

impl BufferConfig {
    pub fn validate(&self) -> Result<()> {
        if self.project_id.is_empty() {
            return Err(TelebufError::Config("project_id must not be empty".into()));
        }
        if self.app_name.is_empty() || self.env_name.is_empty() {
            return Err(TelebufError::Config(
                "app_name and env_name must not be empty".into(),
            ));
        }
        if self.metric_group.is_empty() {
            return Err(TelebufError::Config("metric_group must not be empty".into()));
        }
        if self.namespace.is_empty() {
            return Err(TelebufError::Config("namespace must not be empty".into()));
        }
        if self.flush_interval_ms != 0 && self.flush_interval_ms < 100 {
            return Err(TelebufError::Config(
                "flush_interval_ms must be 0 (manual) or at least 100".into(),
            ));
        }
        if !(100..=600_000).contains(&self.backend_timeout_ms) {
            return Err(TelebufError::Config(
                "backend_timeout_ms must be between 100 and 600000".into(),
            ));
        }
        Ok(())
    }

    /// `<namespace>/<group>/<name>`.
    pub fn metric_type(&self, name: &str) -> String {
        format!("{}/{}/{}", self.namespace, self.metric_group, name)
    }

    /// Display name shown by the backend UI. When the group doubles as the
    /// application name it is used as a prefix.
    pub fn display_name(&self, name: &str) -> String {
        if self.metric_group == self.app_name {
            format!("{}/{}", self.metric_group, name)
        } else {
            name.to_string()
        }
    }
}

fn default_namespace() -> String {
    "custom.googleapis.com".into()
}
fn default_flush_interval_ms() -> u64 {
    5000
}
fn default_backend_timeout_ms() -> u64 {
    10_000
}
