//! Structured logging via `tracing`.
//!
//! `RUST_LOG` takes precedence over the configured level. Output goes to
//! stderr so it never mixes with anything the desktop shell prints.

use crate::config::{LogFormat, LoggingSettings};
use crate::error::ConfigError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub fn init_logging(settings: &LoggingSettings) -> Result<(), ConfigError> {
    let filter = build_env_filter(settings)?;
    let registry = Registry::default().with(filter);

    let result = match settings.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| ConfigError::Logging(e.to_string()))
}

fn build_env_filter(settings: &LoggingSettings) -> Result<EnvFilter, ConfigError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&settings.level)
        .map_err(|e| ConfigError::Logging(format!("invalid log level {:?}: {}", settings.level, e)))
}
