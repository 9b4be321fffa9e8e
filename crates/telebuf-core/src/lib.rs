//! telebuf core: metric kinds, rate conversion, wire payloads, and error types.
//!
//! This crate defines the value model and backend-facing payload shapes shared
//! by the buffering engine and by backend adapters. It intentionally carries no
//! runtime dependencies so it can be reused by alternate transports and test
//! harnesses.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `TelebufError`/`Result` so host
//! processes do not crash on bad metric traffic.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod kind;
pub mod protocol;
pub mod rate;

/// Shared result type.
pub use error::{Result, TelebufError};
pub use kind::{MetricKind, MetricValue, ValueType};
