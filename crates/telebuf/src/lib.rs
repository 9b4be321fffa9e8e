//! Top-level facade crate for telebuf.
//!
//! Re-exports core types and the client library so users can depend on a single crate.

pub mod core {
    pub use telebuf_core::*;
}

pub mod client {
    pub use telebuf_client::*;
}
