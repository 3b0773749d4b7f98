use crate::core::errors::SerumError;
use crate::core::kernel::signer::{KeypairSigner, TxSigner};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const MAINNET_HTTP_ENDPOINT: &str = "https://virginia.solana.dex.blxrbdn.com";
pub const MAINNET_WS_ENDPOINT: &str = "wss://virginia.solana.dex.blxrbdn.com/ws";
pub const MAINNET_GRPC_ENDPOINT: &str = "virginia.solana.dex.blxrbdn.com:9000";
pub const TESTNET_HTTP_ENDPOINT: &str =
    "http://serum-nlb-53baf45ef9775263.elb.us-east-1.amazonaws.com";
pub const TESTNET_WS_ENDPOINT: &str =
    "ws://serum-nlb-53baf45ef9775263.elb.us-east-1.amazonaws.com/ws";
pub const TESTNET_GRPC_ENDPOINT: &str = "serum-nlb-53baf45ef9775263.elb.us-east-1.amazonaws.com:9000";

/// Default deadline for unary calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(7);

pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";
pub const ENDPOINT_ENV: &str = "SERUM_ENDPOINT";
pub const TESTNET_ENV: &str = "SERUM_TESTNET";
pub const TIMEOUT_ENV: &str = "SERUM_TIMEOUT_SECONDS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Mainnet,
    Testnet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Http,
    #[serde(rename = "ws")]
    WebSocket,
    Grpc,
}

impl TransportKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::WebSocket => "ws",
            Self::Grpc => "grpc",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-set endpoint for an environment and transport
pub const fn default_endpoint(environment: Environment, kind: TransportKind) -> &'static str {
    match (environment, kind) {
        (Environment::Mainnet, TransportKind::Http) => MAINNET_HTTP_ENDPOINT,
        (Environment::Mainnet, TransportKind::WebSocket) => MAINNET_WS_ENDPOINT,
        (Environment::Mainnet, TransportKind::Grpc) => MAINNET_GRPC_ENDPOINT,
        (Environment::Testnet, TransportKind::Http) => TESTNET_HTTP_ENDPOINT,
        (Environment::Testnet, TransportKind::WebSocket) => TESTNET_WS_ENDPOINT,
        (Environment::Testnet, TransportKind::Grpc) => TESTNET_GRPC_ENDPOINT,
    }
}

/// Endpoint, deadline and optional signing key of one client instance
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub private_key: Option<Secret<String>>,
}

// Never expose the private key in serialization
impl Serialize for ClientConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ClientConfig", 3)?;
        state.serialize_field("endpoint", &self.endpoint)?;
        state.serialize_field("timeout_ms", &(self.timeout.as_millis() as u64))?;
        state.serialize_field(
            "private_key",
            &self.private_key.as_ref().map(|_| "[REDACTED]"),
        )?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ClientConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ClientConfigHelper {
            endpoint: String,
            timeout_ms: Option<u64>,
            private_key: Option<String>,
        }

        let helper = ClientConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            endpoint: helper.endpoint,
            timeout: helper
                .timeout_ms
                .map_or(DEFAULT_TIMEOUT, Duration::from_millis),
            private_key: helper.private_key.map(Secret::new),
        })
    }
}

impl ClientConfig {
    /// Create a configuration for a custom endpoint with no signing key
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
            private_key: None,
        }
    }

    #[must_use]
    pub fn mainnet(kind: TransportKind) -> Self {
        Self::new(default_endpoint(Environment::Mainnet, kind))
    }

    #[must_use]
    pub fn testnet(kind: TransportKind) -> Self {
        Self::new(default_endpoint(Environment::Testnet, kind))
    }

    /// Create configuration from environment variables
    ///
    /// - `PRIVATE_KEY`: base58 Solana keypair (optional, only needed for writes)
    /// - `SERUM_ENDPOINT`: overrides the pre-set endpoint
    /// - `SERUM_TESTNET`: `true` selects the testnet endpoint
    /// - `SERUM_TIMEOUT_SECONDS`: unary deadline
    pub fn from_env(kind: TransportKind) -> Result<Self, ConfigError> {
        let testnet = env::var(TESTNET_ENV)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let environment = if testnet {
            Environment::Testnet
        } else {
            Environment::Mainnet
        };

        let endpoint = env::var(ENDPOINT_ENV)
            .unwrap_or_else(|_| default_endpoint(environment, kind).to_string());

        let timeout = match env::var(TIMEOUT_ENV) {
            Ok(raw) => parse_timeout_secs(&raw)?,
            Err(_) => DEFAULT_TIMEOUT,
        };

        let private_key = env::var(PRIVATE_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Secret::new);

        Ok(Self {
            endpoint,
            timeout,
            private_key,
        })
    }

    /// Create configuration from .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(kind: TransportKind) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(kind, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(
        kind: TransportKind,
        env_file_path: &str,
    ) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // fall back to the process environment
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(kind)
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_private_key(mut self, private_key: impl Into<String>) -> Self {
        self.private_key = Some(Secret::new(private_key.into()));
        self
    }

    pub fn has_private_key(&self) -> bool {
        self.private_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().is_empty())
    }

    /// Build the signer for the configured key
    ///
    /// A missing key is not an error here; it only fails on the first write.
    pub fn signer(&self) -> Result<Option<Arc<dyn TxSigner>>, SerumError> {
        match &self.private_key {
            Some(key) if !key.expose_secret().is_empty() => {
                let signer = KeypairSigner::from_base58(key.expose_secret())?;
                Ok(Some(Arc::new(signer)))
            }
            _ => Ok(None),
        }
    }
}

/// Parse a whole number of seconds; zero would expire every call at once
fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidConfiguration(format!(
            "{}={}: timeout must be at least one second",
            TIMEOUT_ENV, raw
        ))),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::InvalidConfiguration(format!(
            "{}={}: {}",
            TIMEOUT_ENV, raw, e
        ))),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let config = ClientConfig::mainnet(TransportKind::Grpc);
        assert_eq!(config.endpoint, MAINNET_GRPC_ENDPOINT);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(!config.has_private_key());

        let config = ClientConfig::testnet(TransportKind::WebSocket);
        assert!(config.endpoint.starts_with("ws://"));
    }

    #[test]
    fn test_serialization_redacts_private_key() {
        let config = ClientConfig::new("http://localhost:1809").with_private_key("secret");
        let json = serde_json::to_string(&config).unwrap();

        assert!(json.contains("[REDACTED]"));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_timeout_seconds_parsing() {
        assert_eq!(parse_timeout_secs("12").unwrap(), Duration::from_secs(12));
        assert!(matches!(
            parse_timeout_secs("0"),
            Err(ConfigError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            parse_timeout_secs("soon"),
            Err(ConfigError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_missing_key_yields_no_signer() {
        let config = ClientConfig::new("http://localhost:1809");
        assert!(config.signer().unwrap().is_none());
    }

    #[test]
    fn test_malformed_key_is_signing_error() {
        let config = ClientConfig::new("http://localhost:1809").with_private_key("not-base58-0OIl");
        let err = config.signer().err().unwrap();
        assert!(matches!(err, SerumError::Signing(_)));
    }
}
