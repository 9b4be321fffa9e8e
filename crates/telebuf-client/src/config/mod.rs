//! Buffer config loader (strict parsing).

pub mod schema;

use std::fs;

use telebuf_core::error::{Result, TelebufError};

pub use schema::BufferConfig;

pub fn load_from_file(path: &str) -> Result<BufferConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TelebufError::Io(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<BufferConfig> {
    let cfg: BufferConfig =
        serde_yaml::from_str(s).map_err(|e| TelebufError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
