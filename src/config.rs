//! # Configuration Management
//!
//! Centralized configuration for the blackjack host and player.
//!
//! This module holds the fixed wire constants shared by both ends plus the
//! runtime configuration for the server, the client, discovery and logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()` (`BLACKJACK_*`)

use crate::error::{ProtocolError, Result};
use crate::utils::timeout;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::Level;

/// Marker at the start of every message
pub const MAGIC_COOKIE: u32 = 0xABCD_DCBA;

/// Kind byte of the discovery offer
pub const KIND_OFFER: u8 = 0x2;

/// Kind byte of the session request
pub const KIND_REQUEST: u8 = 0x3;

/// Kind byte shared by client decisions and server updates
pub const KIND_PAYLOAD: u8 = 0x4;

/// Width of fixed name fields in bytes
pub const NAME_FIELD_LEN: usize = 32;

/// Width of the decision field in bytes
pub const DECISION_FIELD_LEN: usize = 5;

/// Wire sizes of each message kind
pub const OFFER_SIZE: usize = 39;
pub const REQUEST_SIZE: usize = 38;
pub const CLIENT_DECISION_SIZE: usize = 10;
pub const SERVER_UPDATE_SIZE: usize = 9;

/// Well-known UDP port for offers
pub const DISCOVERY_PORT: u16 = 13122;

/// Receive buffer for discovery datagrams
pub const DISCOVERY_BUFFER_SIZE: usize = 1024;

/// Dealer keeps drawing while below this total
pub const DEALER_STAND_THRESHOLD: u8 = 17;

/// Highest non-bust hand value
pub const BLACKJACK: u8 = 21;

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GameConfig {
    /// Server-specific configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Client-specific configuration
    #[serde(default)]
    pub client: ClientConfig,

    /// Discovery configuration
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("BLACKJACK_SERVER_ADDRESS") {
            config.server.address = addr;
        }

        if let Ok(name) = std::env::var("BLACKJACK_SERVER_NAME") {
            config.server.display_name = name;
        }

        if let Ok(timeout) = std::env::var("BLACKJACK_INACTIVITY_TIMEOUT_MS") {
            if let Ok(val) = timeout.parse::<u64>() {
                config.server.inactivity_timeout = Duration::from_millis(val);
            }
        }

        if let Ok(name) = std::env::var("BLACKJACK_PARTY_NAME") {
            config.client.party_name = name;
        }

        if let Ok(rounds) = std::env::var("BLACKJACK_ROUNDS") {
            if let Ok(val) = rounds.parse::<u8>() {
                config.client.rounds = val;
            }
        }

        if let Ok(port) = std::env::var("BLACKJACK_DISCOVERY_PORT") {
            if let Ok(val) = port.parse::<u16>() {
                config.discovery.port = val;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.server.validate());
        errors.extend(self.client.validate());
        errors.extend(self.discovery.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

fn validate_name(label: &str, name: &str, errors: &mut Vec<String>) {
    if name.is_empty() {
        errors.push(format!("{label} cannot be empty"));
    } else if name.len() > NAME_FIELD_LEN {
        errors.push(format!(
            "{label} too long: {} bytes (maximum: {NAME_FIELD_LEN}, longer names are truncated)",
            name.len()
        ));
    }
}

/// Server-specific configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen address; port 0 picks an ephemeral port that is then advertised
    pub address: String,

    /// Name advertised in offers
    pub display_name: String,

    /// Close a session after this long without data from the peer
    #[serde(with = "duration_serde")]
    pub inactivity_timeout: Duration,

    /// Timeout for graceful server shutdown
    #[serde(with = "duration_serde")]
    pub shutdown_timeout: Duration,

    /// Maximum number of concurrent sessions
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: String::from("0.0.0.0:0"),
            display_name: String::from("Blackjack Host"),
            inactivity_timeout: timeout::INACTIVITY_TIMEOUT,
            shutdown_timeout: timeout::SHUTDOWN_TIMEOUT,
            max_connections: 64,
        }
    }
}

impl ServerConfig {
    /// Validate server configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.address.is_empty() {
            errors.push("Server address cannot be empty".to_string());
        } else if self.address.parse::<std::net::SocketAddr>().is_err() {
            errors.push(format!(
                "Invalid server address format: '{}' (expected format: '0.0.0.0:0')",
                self.address
            ));
        }

        validate_name("Server display name", &self.display_name, &mut errors);

        if self.inactivity_timeout.as_millis() < 100 {
            errors.push("Inactivity timeout too short (minimum: 100ms)".to_string());
        } else if self.inactivity_timeout.as_secs() > 3600 {
            errors.push("Inactivity timeout too long (maximum: 1 hour)".to_string());
        }

        if self.shutdown_timeout.as_secs() < 1 {
            errors.push("Shutdown timeout too short (minimum: 1s)".to_string());
        } else if self.shutdown_timeout.as_secs() > 60 {
            errors.push("Shutdown timeout too long (maximum: 60s)".to_string());
        }

        if self.max_connections == 0 {
            errors.push("Max connections must be greater than 0".to_string());
        }

        errors
    }
}

/// Client-specific configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Name sent in the session request
    pub party_name: String,

    /// Rounds requested per session
    pub rounds: u8,

    /// Timeout for the TCP connect attempt
    #[serde(with = "duration_serde")]
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            party_name: String::from("Lucky Player"),
            rounds: 3,
            connect_timeout: timeout::CONNECT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Validate client configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        validate_name("Party name", &self.party_name, &mut errors);

        if self.rounds == 0 {
            errors.push("Rounds must be greater than 0".to_string());
        }

        if self.connect_timeout.as_millis() < 100 {
            errors.push("Connect timeout too short (minimum: 100ms)".to_string());
        }

        errors
    }
}

/// Discovery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    /// Whether the server broadcasts offers
    pub enabled: bool,

    /// UDP port offers are sent to and received on
    pub port: u16,

    /// Destination address of offers
    pub broadcast_address: String,

    /// Delay between two offers
    #[serde(with = "duration_serde")]
    pub interval: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: DISCOVERY_PORT,
            broadcast_address: String::from("255.255.255.255"),
            interval: timeout::OFFER_INTERVAL,
        }
    }
}

impl DiscoveryConfig {
    /// Validate discovery configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Discovery port cannot be 0".to_string());
        }

        if self.broadcast_address.parse::<std::net::IpAddr>().is_err() {
            errors.push(format!(
                "Invalid broadcast address: '{}' (expected an IP address)",
                self.broadcast_address
            ));
        }

        if self.interval.as_millis() < 10 {
            errors.push("Offer interval too short (minimum: 10ms)".to_string());
        } else if self.interval.as_secs() > 60 {
            errors.push("Offer interval too long (maximum: 60s)".to_string());
        }

        errors
    }

    /// Socket address offers are sent to
    pub fn target(&self) -> Result<std::net::SocketAddr> {
        let ip = self
            .broadcast_address
            .parse::<std::net::IpAddr>()
            .map_err(|e| ProtocolError::ConfigError(format!("Invalid broadcast address: {e}")))?;
        Ok(std::net::SocketAddr::new(ip, self.port))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("blackjack-protocol"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for Duration serialization/deserialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = duration.as_millis() as u64;
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
