//! In-memory broker doubles shared by unit tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::{path::PathBuf, time::Duration};

use async_trait::async_trait;
use common::UpdateEnvelope;

use super::{BrokerError, BrokerSettings, ProducerFactory, Publisher};

pub(crate) fn test_settings() -> BrokerSettings {
    BrokerSettings {
        bootstrap_servers: "localhost:9093".into(),
        topic: "truck-updates".into(),
        sasl_username: "$ConnectionString".into(),
        sasl_password: "secret".into(),
        ca_location: PathBuf::from("./cacert.pem"),
        message_timeout: Duration::from_millis(500),
    }
}

/// Publisher that decodes and keeps every envelope it receives.
#[derive(Default)]
pub(crate) struct RecordingPublisher {
    published: Mutex<Vec<(i64, UpdateEnvelope)>>,
}

impl RecordingPublisher {
    pub(crate) fn envelopes(&self) -> Vec<UpdateEnvelope> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .map(|(_, env)| env.clone())
            .collect()
    }

    pub(crate) fn keys(&self) -> Vec<i64> {
        self.published.lock().unwrap().iter().map(|(k, _)| *k).collect()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, key: i64, payload: &[u8]) -> Result<(), BrokerError> {
        let envelope: UpdateEnvelope =
            serde_json::from_slice(payload).map_err(|e| BrokerError::Publish(e.to_string()))?;
        // Yield so concurrent publishes interleave.
        tokio::task::yield_now().await;
        self.published.lock().unwrap().push((key, envelope));
        Ok(())
    }
}

/// Factory that hands out one shared [`RecordingPublisher`] and counts creations.
pub(crate) struct CountingFactory {
    publisher: Arc<RecordingPublisher>,
    created: AtomicUsize,
    delay: Duration,
}

impl CountingFactory {
    pub(crate) fn new() -> Arc<Self> {
        // Widen the window in which concurrent first callers overlap.
        Self::with_delay(Duration::from_millis(5))
    }

    pub(crate) fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            publisher: Arc::new(RecordingPublisher::default()),
            created: AtomicUsize::new(0),
            delay,
        })
    }

    pub(crate) fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub(crate) fn publisher(&self) -> &RecordingPublisher {
        &self.publisher
    }
}

impl ProducerFactory for CountingFactory {
    fn create(&self, _settings: &BrokerSettings) -> Result<Arc<dyn Publisher>, BrokerError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        Ok(self.publisher.clone() as Arc<dyn Publisher>)
    }
}
