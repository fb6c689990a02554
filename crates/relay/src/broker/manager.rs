//! [`ProducerManager`]: sole owner of the process-wide producer handle.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use super::{BrokerError, BrokerSettings, ProducerFactory, Publisher};

/// Lazily creates, then hands out, the single shared [`Publisher`].
///
/// Wraps a `tokio::sync::OnceCell` so that:
/// - Concurrent first callers await one initialisation and all receive the
///   same handle.
/// - A failed (or cancelled) initialisation leaves the cell empty; the next
///   caller retries instead of reusing a broken handle.
///
/// Cloning the manager shares the same cell.
#[derive(Clone)]
pub struct ProducerManager {
    inner: Arc<Inner>,
}

struct Inner {
    settings: BrokerSettings,
    factory: Arc<dyn ProducerFactory>,
    handle: OnceCell<Arc<dyn Publisher>>,
}

impl ProducerManager {
    /// Create a manager that will build its producer from `settings` on first use.
    pub fn new(settings: BrokerSettings, factory: Arc<dyn ProducerFactory>) -> Self {
        Self {
            inner: Arc::new(Inner {
                settings,
                factory,
                handle: OnceCell::new(),
            }),
        }
    }

    /// Return the shared producer, creating it if this is the first call.
    ///
    /// # Errors
    ///
    /// Returns the factory's [`BrokerError`] if creation fails. Nothing is
    /// cached in that case, nor when the returned future is dropped before
    /// creation finishes.
    pub async fn get(&self) -> Result<Arc<dyn Publisher>, BrokerError> {
        let inner = &self.inner;
        inner
            .handle
            .get_or_try_init(|| async {
                info!(
                    bootstrap_servers = %inner.settings.bootstrap_servers,
                    topic = %inner.settings.topic,
                    "initialising broker producer"
                );
                // Factory does blocking file and client I/O.
                let factory = Arc::clone(&inner.factory);
                let settings = inner.settings.clone();
                tokio::task::spawn_blocking(move || factory.create(&settings))
                    .await
                    .map_err(|e| BrokerError::Client(format!("initialisation task failed: {e}")))
                    .and_then(|created| created)
                    .map_err(|e| {
                        warn!(error = %e, "broker producer initialisation failed");
                        e
                    })
            })
            .await
            .map(Arc::clone)
    }

    /// Returns `true` once the producer has been created.
    pub fn is_ready(&self) -> bool {
        self.inner.handle.initialized()
    }

    /// Settings the producer is (or will be) built from.
    pub fn settings(&self) -> &BrokerSettings {
        &self.inner.settings
    }
}
