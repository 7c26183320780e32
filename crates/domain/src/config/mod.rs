mod cache;
mod capture;
mod errors;
mod logging;
mod reporter;
mod stats;

pub use cache::{CacheConfig, TtlConfig};
pub use capture::CaptureConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use reporter::ReporterConfig;
pub use stats::StatsConfig;

use serde::{Deserialize, Serialize};

/// Main configuration structure for dns-sentry.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Packet capture configuration
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Classification cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Upstream classifier reporting configuration
    #[serde(default)]
    pub reporter: ReporterConfig,

    /// Periodic stats flush configuration
    #[serde(default)]
    pub stats: StatsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dns-sentry.toml in current directory
    /// 3. /etc/dns-sentry/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("dns-sentry.toml").exists() {
            Self::from_file("dns-sentry.toml")?
        } else if std::path::Path::new("/etc/dns-sentry/config.toml").exists() {
            Self::from_file("/etc/dns-sentry/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(url) = overrides.reporter_url {
            self.reporter.url = url;
        }
        if let Some(url) = overrides.redis_url {
            self.cache.redis_url = url;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.max_size == 0 {
            return Err(ConfigError::Validation(
                "Cache max_size cannot be 0".to_string(),
            ));
        }

        if self.reporter.url.is_empty() {
            return Err(ConfigError::Validation(
                "Reporter URL cannot be empty".to_string(),
            ));
        }

        if self.reporter.report_threshold == 0 {
            return Err(ConfigError::Validation(
                "Report threshold cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub reporter_url: Option<String>,
    pub redis_url: Option<String>,
    pub log_level: Option<String>,
}
