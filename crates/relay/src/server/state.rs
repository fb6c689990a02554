//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::broker::{MessageKeys, ProducerManager};
use crate::scoring::Scorer;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-wrapped or already `Arc`-backed) so
/// that Axum can clone the state for each request without copying expensive data.
#[derive(Clone)]
pub struct AppState {
    /// Scorer applied to every update.
    pub scorer: Arc<dyn Scorer>,
    /// Owner of the shared broker producer.
    pub producers: ProducerManager,
    /// Source of per-message broker keys.
    pub keys: Arc<MessageKeys>,
}

impl AppState {
    /// Create a new [`AppState`] around a scorer and a producer manager.
    pub fn new(scorer: Arc<dyn Scorer>, producers: ProducerManager) -> Self {
        Self {
            scorer,
            producers,
            keys: Arc::new(MessageKeys::new()),
        }
    }
}
