//! Common error types shared across crates.

use thiserror::Error;

/// Request-level error type.
///
/// Every variant aborts the current request; there is no degraded mode.
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::ScoringFailure`] → 500
/// - [`ServiceError::PublishFailure`] → 502
/// - [`ServiceError::Unavailable`] → 503
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request body is not valid JSON or lacks a usable `update` field.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The scorer rejected the update text.
    #[error("scoring failure: {0}")]
    ScoringFailure(String),

    /// The broker rejected the publish or did not acknowledge it in time.
    #[error("publish failure: {0}")]
    PublishFailure(String),

    /// The broker producer could not be initialised.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::ScoringFailure(_) => 500,
            ServiceError::PublishFailure(_) => 502,
            ServiceError::Unavailable(_) => 503,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code used in [`crate::protocol::ErrorResponse`].
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::ScoringFailure(_) => "scoring_failed",
            ServiceError::PublishFailure(_) => "publish_failed",
            ServiceError::Unavailable(_) => "service_unavailable",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(ServiceError::ScoringFailure("x".into()).http_status(), 500);
        assert_eq!(ServiceError::PublishFailure("x".into()).http_status(), 502);
        assert_eq!(ServiceError::Unavailable("x".into()).http_status(), 503);
        assert_eq!(ServiceError::Internal("x".into()).http_status(), 500);
    }

    #[test]
    fn no_variant_maps_to_success() {
        let all = [
            ServiceError::BadRequest("x".into()),
            ServiceError::ScoringFailure("x".into()),
            ServiceError::PublishFailure("x".into()),
            ServiceError::Unavailable("x".into()),
            ServiceError::Internal("x".into()),
        ];
        assert!(all.iter().all(|e| e.http_status() >= 400));
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::PublishFailure("message timed out".into());
        assert!(e.to_string().contains("message timed out"));
        assert_eq!(e.code(), "publish_failed");
    }
}
