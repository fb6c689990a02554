//! Structured logging and optional OpenTelemetry span export.
//!
//! # Telemetry invariants
//!
//! - The broker credential must never appear in any span attribute or log field.
//! - Update text is logged at `debug` only.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`), overridden by
//!   `RUST_LOG` when set.

pub mod init;

pub use init::{init_telemetry, shutdown_telemetry};
