// Layered settings: built-in defaults, optional TOML file, WORKFLOWGEN_* environment

use crate::error::ConfigError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "https://workflowgenerator.onrender.com";
pub const DEFAULT_CONFIG_FILE: &str = "workflowgen.toml";
pub const ENV_PREFIX: &str = "WORKFLOWGEN";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub backend_url: String,
    pub readiness: ReadinessSettings,
    pub ui: UiSettings,
    #[serde(default)]
    pub clipboard: ClipboardSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadinessSettings {
    pub interval_secs: u64,
    pub max_retries: u32,
    pub probe_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiSettings {
    pub status_clear_secs: u64,
    pub copy_feedback_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClipboardSettings {
    /// Program and arguments that read the text to copy from stdin.
    /// When unset the platform default is used.
    #[serde(default)]
    pub fallback_command: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// How often and how long the readiness monitor keeps probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    pub max_retries: u32,
    pub probe_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_retries: 24,
            probe_timeout: Duration::from_secs(10),
        }
    }
}

impl ReadinessSettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::from_secs(self.interval_secs),
            max_retries: self.max_retries,
            probe_timeout: Duration::from_secs(self.probe_timeout_secs),
        }
    }
}

impl UiSettings {
    pub fn status_clear(&self) -> Duration {
        Duration::from_secs(self.status_clear_secs)
    }

    pub fn copy_feedback(&self) -> Duration {
        Duration::from_secs(self.copy_feedback_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            readiness: ReadinessSettings {
                interval_secs: policy.interval.as_secs(),
                max_retries: policy.max_retries,
                probe_timeout_secs: policy.probe_timeout.as_secs(),
            },
            ui: UiSettings {
                status_clear_secs: 3,
                copy_feedback_secs: 2,
            },
            clipboard: ClipboardSettings::default(),
            logging: LoggingSettings {
                level: "info".to_string(),
                format: LogFormat::Text,
            },
        }
    }
}

impl Settings {
    /// Load settings from `workflowgen.toml` in the working directory (if any)
    /// and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(None, environment())
    }

    /// Load settings from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::from_sources(Some(path), environment())
    }

    pub(crate) fn from_sources(
        path: Option<&Path>,
        environment: Environment,
    ) -> Result<Self, ConfigError> {
        let builder = match path {
            Some(path) => builder_with_defaults()?.add_source(File::from(path).required(true)),
            None => builder_with_defaults()?
                .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings: Settings = builder.add_source(environment).build()?.try_deserialize()?;
        settings.validated()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        let trimmed = self.backend_url.trim().trim_end_matches('/').to_string();
        let parsed = Url::parse(&trimmed).map_err(|e| ConfigError::InvalidBackendUrl {
            url: self.backend_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBackendUrl {
                url: self.backend_url.clone(),
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }
        self.backend_url = trimmed;

        if self.readiness.interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "readiness.interval_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.readiness.probe_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "readiness.probe_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(command) = &self.clipboard.fallback_command {
            if command.is_empty() {
                return Err(ConfigError::Invalid {
                    key: "clipboard.fallback_command",
                    reason: "must name a program".to_string(),
                });
            }
        }

        Ok(self)
    }
}

fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    let defaults = Settings::default();
    Config::builder()
        .set_default("backend_url", defaults.backend_url)?
        .set_default("readiness.interval_secs", defaults.readiness.interval_secs as i64)?
        .set_default("readiness.max_retries", defaults.readiness.max_retries as i64)?
        .set_default(
            "readiness.probe_timeout_secs",
            defaults.readiness.probe_timeout_secs as i64,
        )?
        .set_default("ui.status_clear_secs", defaults.ui.status_clear_secs as i64)?
        .set_default("ui.copy_feedback_secs", defaults.ui.copy_feedback_secs as i64)?
        .set_default("logging.level", defaults.logging.level)?
        .set_default("logging.format", "text")
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
