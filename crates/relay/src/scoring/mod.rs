//! Scoring of update text.
//!
//! The relay treats scoring as an injected capability: handlers only see
//! `Arc<dyn Scorer>`. [`TelemetryScorer`] is the bundled default; any
//! `Fn(&str) -> Result<Score, ScoreError>` closure also qualifies.

use common::{Score, ServiceError};
use thiserror::Error;

/// Errors produced while scoring an update.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The update text is empty or whitespace only.
    #[error("update is empty")]
    EmptyUpdate,

    /// The computed score overflowed to a non-finite value.
    #[error("score is not a finite number")]
    NotFinite,
}

impl From<ScoreError> for ServiceError {
    fn from(err: ScoreError) -> Self {
        ServiceError::ScoringFailure(err.to_string())
    }
}

/// Pure function from update text to a score.
pub trait Scorer: Send + Sync {
    /// Score `update`. Must depend on nothing but `update`.
    fn score(&self, update: &str) -> Result<Score, ScoreError>;
}

impl<F> Scorer for F
where
    F: Fn(&str) -> Result<Score, ScoreError> + Send + Sync,
{
    fn score(&self, update: &str) -> Result<Score, ScoreError> {
        self(update)
    }
}

/// Default scorer for `key=value` telemetry updates.
///
/// Splits the update on commas, and sums every value that parses as a finite
/// number. Pairs with non-numeric values (e.g. `zone=urban`) and fragments
/// without `=` contribute nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryScorer;

impl Scorer for TelemetryScorer {
    fn score(&self, update: &str) -> Result<Score, ScoreError> {
        if update.trim().is_empty() {
            return Err(ScoreError::EmptyUpdate);
        }

        let total: Score = update
            .split(',')
            .filter_map(|pair| pair.split_once('='))
            .filter_map(|(_, value)| value.trim().parse::<Score>().ok())
            .filter(|value| value.is_finite())
            .sum();

        if !total.is_finite() {
            return Err(ScoreError::NotFinite);
        }
        Ok(total)
    }
}
