//! Configuration loading and validation for the relay service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};

/// Validated relay service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Bootstrap `host:port` of the streaming endpoint. **Required.**
    pub broker_address: String,

    /// Credential used as the SASL PLAIN password. **Required.**
    pub broker_connection_string: String,

    /// Topic every envelope is published to. **Required.**
    pub broker_topic: String,

    /// SASL PLAIN username.
    #[serde(default = "default_sasl_username")]
    pub sasl_username: String,

    /// CA bundle file name, resolved against the application base directory.
    /// **Required** unless `is_local` is set.
    #[serde(default)]
    pub ca_cert_file_name: String,

    /// Application base directory. Defaults to the executable's directory.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub app_base_dir: Option<PathBuf>,

    /// Local/testing mode: use `local_ca_cert_path` instead of the base directory.
    #[serde(default)]
    pub is_local: bool,

    /// CA bundle path used when `is_local` is set.
    #[serde(default = "default_local_ca_cert_path")]
    pub local_ca_cert_path: PathBuf,

    /// Upper bound (milliseconds) on a single broker delivery.
    #[serde(default = "default_publish_timeout_ms")]
    pub publish_timeout_ms: u64,

    /// Port the HTTP server listens on.
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Per-request timeout enforced by the HTTP layer.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Optional OTLP/gRPC endpoint; span export is disabled when unset.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_sasl_username() -> String {
    "$ConnectionString".into()
}
fn default_local_ca_cert_path() -> PathBuf {
    PathBuf::from("./cacert.pem")
}
fn default_publish_timeout_ms() -> u64 {
    5000
}
fn default_http_port() -> u16 {
    8080
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".into()
}

/// Treat an optional variable that is set but blank the same as an unset one.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()).map(T::from))
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("broker_address", &self.broker_address)
            .field("broker_connection_string", &"[REDACTED]")
            .field("broker_topic", &self.broker_topic)
            .field("sasl_username", &self.sasl_username)
            .field("ca_cert_file_name", &self.ca_cert_file_name)
            .field("app_base_dir", &self.app_base_dir)
            .field("is_local", &self.is_local)
            .field("local_ca_cert_path", &self.local_ca_cert_path)
            .field("publish_timeout_ms", &self.publish_timeout_ms)
            .field("http_port", &self.http_port)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("otel_exporter_otlp_endpoint", &self.otel_exporter_otlp_endpoint)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_environment(config::Environment::default())
    }

    fn from_environment(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.broker_address, "BROKER_ADDRESS")?;
        ensure_non_empty(&self.broker_connection_string, "BROKER_CONNECTION_STRING")?;
        ensure_non_empty(&self.broker_topic, "BROKER_TOPIC")?;
        ensure_non_empty(&self.sasl_username, "SASL_USERNAME")?;
        if !self.is_local {
            ensure_non_empty(&self.ca_cert_file_name, "CA_CERT_FILE_NAME")?;
        }

        if self.publish_timeout_ms == 0 {
            anyhow::bail!("PUBLISH_TIMEOUT_MS must be > 0");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        Ok(())
    }

    /// Resolve the CA bundle location handed to the broker client.
    ///
    /// Local mode always uses `local_ca_cert_path`. Otherwise the file name is
    /// joined onto `app_base_dir`, or onto the running executable's directory
    /// when no base directory is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the executable's directory cannot be determined.
    pub fn ca_cert_path(&self) -> Result<PathBuf> {
        if self.is_local {
            return Ok(self.local_ca_cert_path.clone());
        }
        let base = match &self.app_base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_exe()
                .context("failed to locate the running executable")?
                .parent()
                .map(PathBuf::from)
                .context("executable path has no parent directory")?,
        };
        Ok(base.join(&self.ca_cert_file_name))
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
