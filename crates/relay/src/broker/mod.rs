//! Broker producer: settings, publishing seam, and the shared-handle lifecycle.
//!
//! # Lifecycle
//!
//! 1. At startup, [`BrokerSettings::from_config`] resolves connection
//!    parameters, including the CA bundle location.
//! 2. The first request to need the producer calls [`ProducerManager::get`],
//!    which asks the [`ProducerFactory`] for a [`Publisher`] exactly once.
//! 3. Every later request receives the same `Arc<dyn Publisher>`. The handle is
//!    never torn down; process exit reclaims it.
//!
//! # Security invariants
//!
//! - Transport is always `SASL_SSL` with the `PLAIN` mechanism; there is no
//!   fallback transport.
//! - The SASL password never appears in logs or `Debug` output.

pub mod kafka;
pub mod keys;
pub mod manager;
pub mod tls;

#[cfg(test)]
pub(crate) mod testing;

pub use kafka::KafkaProducerFactory;
pub use keys::MessageKeys;
pub use manager::ProducerManager;

use std::{path::PathBuf, sync::Arc, time::Duration};

use async_trait::async_trait;
use common::ServiceError;
use thiserror::Error;

use crate::config::Config;

/// Security protocol applied to every broker connection.
pub const SECURITY_PROTOCOL: &str = "SASL_SSL";
/// SASL mechanism applied to every broker connection.
pub const SASL_MECHANISM: &str = "PLAIN";

/// Errors produced by the broker layer.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// The CA bundle is missing, unreadable, or holds no usable certificate.
    #[error("invalid CA bundle at {path}: {reason}")]
    CaBundle { path: String, reason: String },

    /// The client library refused to build a producer from the settings.
    #[error("failed to create producer: {0}")]
    Client(String),

    /// The broker rejected the message.
    #[error("publish rejected: {0}")]
    Publish(String),

    /// The broker did not acknowledge the message before the delivery timeout.
    #[error("publish timed out: {0}")]
    Timeout(String),
}

impl From<BrokerError> for ServiceError {
    fn from(err: BrokerError) -> Self {
        match err {
            BrokerError::CaBundle { .. } | BrokerError::Client(_) => {
                ServiceError::Unavailable(err.to_string())
            }
            BrokerError::Publish(_) | BrokerError::Timeout(_) => {
                ServiceError::PublishFailure(err.to_string())
            }
        }
    }
}

/// Connection parameters fixed when the producer is created.
#[derive(Clone)]
pub struct BrokerSettings {
    /// Bootstrap `host:port` list.
    pub bootstrap_servers: String,
    /// Topic every envelope is published to.
    pub topic: String,
    /// SASL PLAIN username.
    pub sasl_username: String,
    /// SASL PLAIN password (the connection credential).
    pub sasl_password: String,
    /// Resolved filesystem path of the CA bundle.
    pub ca_location: PathBuf,
    /// Upper bound on a single delivery, including retries inside the client.
    pub message_timeout: Duration,
}

impl BrokerSettings {
    /// Derive broker settings from the validated service configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the CA bundle location cannot be resolved.
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            bootstrap_servers: cfg.broker_address.clone(),
            topic: cfg.broker_topic.clone(),
            sasl_username: cfg.sasl_username.clone(),
            sasl_password: cfg.broker_connection_string.clone(),
            ca_location: cfg.ca_cert_path()?,
            message_timeout: Duration::from_millis(cfg.publish_timeout_ms),
        })
    }
}

impl std::fmt::Debug for BrokerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerSettings")
            .field("bootstrap_servers", &self.bootstrap_servers)
            .field("topic", &self.topic)
            .field("sasl_username", &self.sasl_username)
            .field("sasl_password", &"[REDACTED]")
            .field("ca_location", &self.ca_location)
            .field("message_timeout", &self.message_timeout)
            .finish()
    }
}

/// A long-lived producer handle.
///
/// Implementations must tolerate concurrent `publish` calls from many requests.
/// Dropping an in-flight `publish` future must leave the handle usable.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish `payload` under `key` to the configured topic and wait for the
    /// broker's acknowledgement.
    async fn publish(&self, key: i64, payload: &[u8]) -> Result<(), BrokerError>;
}

/// Builds the [`Publisher`] owned by [`ProducerManager`].
#[cfg_attr(test, mockall::automock)]
pub trait ProducerFactory: Send + Sync {
    /// Construct a producer from `settings`.
    fn create(&self, settings: &BrokerSettings) -> Result<Arc<dyn Publisher>, BrokerError>;
}
