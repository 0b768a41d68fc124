//! Structured logging setup.
//!
//! Installs a global `tracing-subscriber` formatter driven by [`LoggingConfig`].

use crate::config::LoggingConfig;
use crate::error::{ProtocolError, Result};

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_target(false);

    let installed = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| ProtocolError::ConfigError(format!("Failed to init logging: {e}")))?;
    tracing::debug!(app = %config.app_name, level = %config.log_level, "Logging initialised");
    Ok(())
}
