//! Axum middleware settings applied to the router.
//!
//! Includes request tracing, timeout enforcement, response compression, and a
//! body size cap.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;

/// Largest request body accepted on any route.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

/// Body limit layer enforcing [`MAX_BODY_BYTES`].
pub fn body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(MAX_BODY_BYTES)
}

/// Per-request timeout. Expiry drops the handler future, which abandons any
/// pending publish without affecting the shared producer.
pub fn request_timeout(secs: u64) -> Duration {
    Duration::from_secs(secs)
}
