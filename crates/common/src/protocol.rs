//! Request and response types exchanged over the public HTTP API.

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::envelope::Score;

// ---------------------------------------------------------------------------
// Update endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /api/updates`.
///
/// `update` is required. A JSON string is taken verbatim; any other non-null
/// JSON value is accepted and converted to its compact JSON text. Absence and
/// `null` are both rejected at parse time.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest {
    /// Raw update text handed to the scorer.
    #[serde(deserialize_with = "update_text")]
    pub update: String,
}

fn update_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Err(de::Error::custom("`update` must not be null")),
        serde_json::Value::String(s) => Ok(s),
        other => Ok(other.to_string()),
    }
}

/// Plain-text success body for `POST /api/updates`.
pub fn score_message(score: Score) -> String {
    format!("Your score: {score}")
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// Whether the shared broker producer has been created yet.
    pub producer_ready: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> serde_json::Result<UpdateRequest> {
        serde_json::from_str(body)
    }

    #[test]
    fn string_update_is_verbatim() {
        let req = parse(r#"{"update":"speed=80,zone=urban"}"#).unwrap();
        assert_eq!(req.update, "speed=80,zone=urban");
    }

    #[test]
    fn non_string_update_is_converted_to_text() {
        assert_eq!(parse(r#"{"update":17}"#).unwrap().update, "17");
        assert_eq!(parse(r#"{"update":true}"#).unwrap().update, "true");
        assert_eq!(
            parse(r#"{"update":{"speed":80}}"#).unwrap().update,
            r#"{"speed":80}"#
        );
    }

    #[test]
    fn extra_fields_are_ignored() {
        let req = parse(r#"{"update":"a=1","truck":"T-9"}"#).unwrap();
        assert_eq!(req.update, "a=1");
    }

    #[test]
    fn missing_update_is_rejected() {
        let err = parse(r#"{"other":"x"}"#).unwrap_err();
        assert!(err.to_string().contains("update"));
    }

    #[test]
    fn null_update_is_rejected() {
        assert!(parse(r#"{"update":null}"#).is_err());
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(parse("update=speed").is_err());
        assert!(parse("").is_err());
        assert!(parse(r#""speed=80""#).is_err());
    }

    #[test]
    fn score_message_renders_whole_scores_without_fraction() {
        assert_eq!(score_message(42.0), "Your score: 42");
        assert_eq!(score_message(7.5), "Your score: 7.5");
    }

    #[test]
    fn error_response_new() {
        let e = ErrorResponse::new("bad_request", "missing field `update`");
        assert_eq!(e.code, "bad_request");
        assert!(e.message.contains("update"));
    }
}
