//! The update envelope: the unit of data published to the broker.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Numeric score derived from an update's text.
pub type Score = f64;

/// Message published to the broker for every accepted update.
///
/// Serialised with PascalCase keys: `{"Id": "<uuid>", "Score": 42.0, "Update": "..."}`.
/// Downstream consumers deduplicate on `Id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateEnvelope {
    /// Fresh v4 identifier; never reused.
    pub id: Uuid,
    /// Score computed from exactly this envelope's `update`.
    pub score: Score,
    /// Raw update text extracted from the request.
    pub update: String,
}

impl UpdateEnvelope {
    /// Package an update and its score under a newly generated identifier.
    ///
    /// Performs no I/O and cannot fail.
    pub fn build(update: impl Into<String>, score: Score) -> Self {
        Self {
            id: Uuid::new_v4(),
            score,
            update: update.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn build_keeps_update_and_score_paired() {
        let env = UpdateEnvelope::build("speed=80,zone=urban", 42.0);
        assert_eq!(env.update, "speed=80,zone=urban");
        assert_eq!(env.score, 42.0);
        assert_eq!(env.id.get_version_num(), 4);
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<Uuid> = (0..10_000)
            .map(|_| UpdateEnvelope::build("x", 1.0).id)
            .collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn wire_format_uses_pascal_case_keys() {
        let env = UpdateEnvelope::build("speed=80", 42.0);
        let value = serde_json::to_value(&env).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["Id"], env.id.to_string());
        assert_eq!(obj["Score"], 42.0);
        assert_eq!(obj["Update"], "speed=80");
    }
}
