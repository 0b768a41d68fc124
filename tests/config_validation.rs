//! Integration tests for configuration validation

#![allow(clippy::expect_used)]

use blackjack_protocol::config::{
    ClientConfig, DiscoveryConfig, GameConfig, LoggingConfig, ServerConfig, DISCOVERY_PORT,
};
use std::time::Duration;
use tracing::Level;

#[test]
fn test_default_config_validates() {
    let config = GameConfig::default();
    let errors = config.validate();
    assert!(
        errors.is_empty(),
        "Default config should be valid, but got errors: {:?}",
        errors
    );
}

#[test]
fn test_default_discovery_uses_well_known_port() {
    let config = GameConfig::default();
    assert!(config.discovery.enabled);
    assert_eq!(config.discovery.port, DISCOVERY_PORT);
    assert_eq!(
        config.discovery.target().expect("default target"),
        "255.255.255.255:13122".parse().expect("literal address")
    );
}

#[test]
fn test_invalid_server_address() {
    let mut config = GameConfig::default();
    config.server.address = "invalid_address".to_string();

    let errors = config.validate();
    assert!(!errors.is_empty(), "Should have validation errors");
    assert!(errors.iter().any(|e| e.contains("Invalid server address")));
}

#[test]
fn test_empty_server_address() {
    let mut config = GameConfig::default();
    config.server.address = String::new();

    let errors = config.validate();
    assert!(!errors.is_empty());
    assert!(errors.iter().any(|e| e.contains("cannot be empty")));
}

#[test]
fn test_empty_display_name() {
    let mut config = GameConfig::default();
    config.server.display_name = String::new();

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Server display name cannot be empty")));
}

#[test]
fn test_long_party_name_is_reported() {
    let mut config = GameConfig::default();
    config.client.party_name = "x".repeat(40);

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Party name too long")));
}

#[test]
fn test_inactivity_timeout_too_short() {
    let mut config = GameConfig::default();
    config.server.inactivity_timeout = Duration::from_millis(50);

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Inactivity timeout too short")));
}

#[test]
fn test_inactivity_timeout_too_long() {
    let mut config = GameConfig::default();
    config.server.inactivity_timeout = Duration::from_secs(7200);

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Inactivity timeout too long")));
}

#[test]
fn test_shutdown_timeout_bounds() {
    let mut config = GameConfig::default();
    config.server.shutdown_timeout = Duration::from_millis(500);
    assert!(config
        .validate()
        .iter()
        .any(|e| e.contains("Shutdown timeout too short")));

    config.server.shutdown_timeout = Duration::from_secs(120);
    assert!(config
        .validate()
        .iter()
        .any(|e| e.contains("Shutdown timeout too long")));
}

#[test]
fn test_zero_max_connections() {
    let mut config = GameConfig::default();
    config.server.max_connections = 0;

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Max connections must be greater than 0")));
}

#[test]
fn test_zero_rounds() {
    let mut config = GameConfig::default();
    config.client.rounds = 0;

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Rounds must be greater than 0")));
}

#[test]
fn test_connect_timeout_too_short() {
    let mut config = GameConfig::default();
    config.client.connect_timeout = Duration::from_millis(10);

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Connect timeout too short")));
}

#[test]
fn test_invalid_broadcast_address() {
    let mut config = GameConfig::default();
    config.discovery.broadcast_address = "everyone".to_string();

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Invalid broadcast address")));
    assert!(config.discovery.target().is_err());
}

#[test]
fn test_zero_discovery_port() {
    let mut config = GameConfig::default();
    config.discovery.port = 0;

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Discovery port cannot be 0")));
}

#[test]
fn test_offer_interval_bounds() {
    let mut config = GameConfig::default();
    config.discovery.interval = Duration::from_millis(1);
    assert!(config
        .validate()
        .iter()
        .any(|e| e.contains("Offer interval too short")));

    config.discovery.interval = Duration::from_secs(600);
    assert!(config
        .validate()
        .iter()
        .any(|e| e.contains("Offer interval too long")));
}

#[test]
fn test_empty_app_name() {
    let mut config = GameConfig::default();
    config.logging.app_name = String::new();

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Application name cannot be empty")));
}

#[test]
fn test_long_app_name() {
    let mut config = GameConfig::default();
    config.logging.app_name = "a".repeat(100);

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Application name too long")));
}

#[test]
fn test_validate_strict_with_valid_config() {
    let config = GameConfig::default();
    assert!(config.validate_strict().is_ok());
}

#[test]
fn test_validate_strict_with_invalid_config() {
    let mut config = GameConfig::default();
    config.server.address = String::new();

    let result = config.validate_strict();
    assert!(result.is_err());

    if let Err(e) = result {
        let error_str = e.to_string();
        assert!(error_str.contains("Configuration validation failed"));
    }
}

#[test]
fn test_multiple_validation_errors() {
    let mut config = GameConfig::default();

    config.server.address = String::new();
    config.server.max_connections = 0;
    config.client.rounds = 0;
    config.discovery.port = 0;
    config.logging.app_name = String::new();

    let errors = config.validate();

    assert!(
        errors.len() >= 5,
        "Expected at least 5 errors, got {}: {:?}",
        errors.len(),
        errors
    );
}

#[test]
fn test_overrides_apply_on_defaults() {
    let config = GameConfig::default_with_overrides(|c| {
        c.client.rounds = 7;
        c.discovery.enabled = false;
    });
    assert_eq!(config.client.rounds, 7);
    assert!(!config.discovery.enabled);
    assert_eq!(config.server.display_name, "Blackjack Host");
}

#[test]
fn test_example_config_parses_back() {
    let text = GameConfig::example_config();
    let parsed = GameConfig::from_toml(&text).expect("example config should parse");
    assert_eq!(parsed.client.rounds, 3);
    assert_eq!(parsed.discovery.port, DISCOVERY_PORT);
    assert_eq!(parsed.server.inactivity_timeout, Duration::from_secs(600));
    assert_eq!(parsed.logging.log_level, Level::INFO);
}

#[test]
fn test_from_toml_rejects_bad_log_level() {
    let mut text = GameConfig::example_config();
    text = text.replace("log_level = \"info\"", "log_level = \"loud\"");
    assert!(GameConfig::from_toml(&text).is_err());
}

#[test]
fn test_save_and_load_file() {
    let path = std::env::temp_dir().join(format!(
        "blackjack-config-test-{}.toml",
        std::process::id()
    ));
    let config = GameConfig::default_with_overrides(|c| {
        c.server.display_name = "Saved Table".to_string();
        c.discovery.interval = Duration::from_millis(250);
    });
    config.save_to_file(&path).expect("save");

    let loaded = GameConfig::from_file(&path).expect("load");
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.server.display_name, "Saved Table");
    assert_eq!(loaded.discovery.interval, Duration::from_millis(250));
}

#[test]
fn test_valid_lan_config() {
    let config = GameConfig {
        server: ServerConfig {
            address: "0.0.0.0:4000".to_string(),
            display_name: "Friday Night Table".to_string(),
            inactivity_timeout: Duration::from_secs(120),
            shutdown_timeout: Duration::from_secs(5),
            max_connections: 16,
        },
        client: ClientConfig {
            party_name: "Team Rocket".to_string(),
            rounds: 10,
            connect_timeout: Duration::from_secs(2),
        },
        discovery: DiscoveryConfig {
            enabled: true,
            port: DISCOVERY_PORT,
            broadcast_address: "192.168.1.255".to_string(),
            interval: Duration::from_secs(1),
        },
        logging: LoggingConfig {
            app_name: "blackjack-host".to_string(),
            log_level: Level::DEBUG,
            json_format: true,
        },
    };

    let errors = config.validate();
    assert!(errors.is_empty(), "LAN config should be valid, got: {:?}", errors);
}
