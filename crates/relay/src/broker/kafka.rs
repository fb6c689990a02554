//! `rdkafka`-backed producer used in production.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use rdkafka::{
    config::ClientConfig,
    error::{KafkaError, RDKafkaErrorCode},
    producer::{FutureProducer, FutureRecord},
};
use tracing::{debug, info};

use super::{tls, BrokerError, BrokerSettings, ProducerFactory, Publisher, SASL_MECHANISM, SECURITY_PROTOCOL};

/// Builds [`KafkaPublisher`]s over `SASL_SSL`.
#[derive(Debug, Default, Clone, Copy)]
pub struct KafkaProducerFactory;

impl ProducerFactory for KafkaProducerFactory {
    fn create(&self, settings: &BrokerSettings) -> Result<Arc<dyn Publisher>, BrokerError> {
        let certs = tls::load_ca_bundle(&settings.ca_location)?;
        debug!(
            ca_location = %settings.ca_location.display(),
            certs,
            "CA bundle loaded"
        );

        let producer: FutureProducer = client_config(settings)
            .create()
            .map_err(|e| BrokerError::Client(e.to_string()))?;

        info!(
            bootstrap_servers = %settings.bootstrap_servers,
            topic = %settings.topic,
            "broker producer created"
        );

        Ok(Arc::new(KafkaPublisher {
            producer,
            topic: settings.topic.clone(),
            queue_timeout: settings.message_timeout,
        }))
    }
}

/// Translate [`BrokerSettings`] into librdkafka properties.
fn client_config(settings: &BrokerSettings) -> ClientConfig {
    let mut config = ClientConfig::new();
    config
        .set("bootstrap.servers", &settings.bootstrap_servers)
        .set("security.protocol", SECURITY_PROTOCOL)
        .set("sasl.mechanism", SASL_MECHANISM)
        .set("sasl.username", &settings.sasl_username)
        .set("sasl.password", &settings.sasl_password)
        .set("ssl.ca.location", settings.ca_location.to_string_lossy())
        .set(
            "message.timeout.ms",
            settings.message_timeout.as_millis().to_string(),
        );
    config
}

/// Shared producer handle. `FutureProducer` is internally reference counted
/// and supports concurrent sends.
pub struct KafkaPublisher {
    producer: FutureProducer,
    topic: String,
    queue_timeout: Duration,
}

#[async_trait]
impl Publisher for KafkaPublisher {
    async fn publish(&self, key: i64, payload: &[u8]) -> Result<(), BrokerError> {
        let key_bytes = key.to_be_bytes();
        let record = FutureRecord::to(&self.topic)
            .key(&key_bytes[..])
            .payload(payload);

        match self.producer.send(record, self.queue_timeout).await {
            Ok((partition, offset)) => {
                debug!(topic = %self.topic, partition, offset, key, "message delivered");
                Ok(())
            }
            Err((KafkaError::MessageProduction(RDKafkaErrorCode::MessageTimedOut), _)) => {
                Err(BrokerError::Timeout(format!(
                    "no acknowledgement from {} within {:?}",
                    self.topic, self.queue_timeout
                )))
            }
            Err((e, _)) => Err(BrokerError::Publish(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn settings(ca_location: PathBuf) -> BrokerSettings {
        BrokerSettings {
            bootstrap_servers: "fleet.servicebus.windows.net:9093".into(),
            topic: "truck-updates".into(),
            sasl_username: "$ConnectionString".into(),
            sasl_password: "secret".into(),
            ca_location,
            message_timeout: Duration::from_millis(1500),
        }
    }

    #[test]
    fn client_config_sets_secure_transport() {
        let config = client_config(&settings(PathBuf::from("/srv/relay/cacert.pem")));
        assert_eq!(
            config.get("bootstrap.servers"),
            Some("fleet.servicebus.windows.net:9093")
        );
        assert_eq!(config.get("security.protocol"), Some("SASL_SSL"));
        assert_eq!(config.get("sasl.mechanism"), Some("PLAIN"));
        assert_eq!(config.get("sasl.username"), Some("$ConnectionString"));
        assert_eq!(config.get("sasl.password"), Some("secret"));
        assert_eq!(config.get("ssl.ca.location"), Some("/srv/relay/cacert.pem"));
        assert_eq!(config.get("message.timeout.ms"), Some("1500"));
    }

    #[test]
    fn create_fails_without_ca_bundle() {
        let result = KafkaProducerFactory.create(&settings(PathBuf::from("/nonexistent/cacert.pem")));
        assert!(matches!(result, Err(BrokerError::CaBundle { .. })));
    }
}
