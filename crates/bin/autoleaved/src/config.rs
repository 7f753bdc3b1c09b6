//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `autoleave.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use autoleave_app::interval::{FixedInterval, IntervalPolicy, JitteredInterval};
use autoleave_domain::error::{AutomationError, ValidationError};
use autoleave_domain::profile::TargetProfile;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Screens, labels and delays of the target application.
    pub target: TargetProfile,
    /// Tick interval policy.
    pub polling: PollingConfig,
    /// Preference storage.
    pub storage: StorageConfig,
    /// Host tree source.
    pub host: HostConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Which interval policy drives the scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollPolicy {
    #[default]
    Fixed,
    Jittered,
}

impl FromStr for PollPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "jittered" => Ok(Self::Jittered),
            other => Err(ConfigError::Validation(format!(
                "unknown poll policy {other:?}, expected \"fixed\" or \"jittered\""
            ))),
        }
    }
}

/// Scheduler interval configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub policy: PollPolicy,
    /// Delay between ticks for the fixed policy, in ms.
    pub interval_ms: u64,
    /// Minimum delay between ticks for the jittered policy, in ms.
    pub base_ms: u64,
    /// Upper bound (exclusive) of the random extra delay, in ms.
    pub jitter_ms: u64,
    /// Seed for reproducible jitter.
    pub seed: Option<u64>,
}

/// `SQLite` preference storage configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
    /// Keyword string written to the store at startup, when set.
    pub seed_keywords: Option<String>,
}

/// Host configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// JSON screen script; the built-in demo script when absent.
    pub script: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `autoleave.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, an
    /// override cannot be parsed, or the result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("autoleave.toml")?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = var("AUTOLEAVE_DATABASE_URL") {
            self.storage.url = val;
        }
        if let Some(val) = var("AUTOLEAVE_KEYWORDS") {
            self.storage.seed_keywords = Some(val);
        }
        if let Some(val) = var("AUTOLEAVE_SCRIPT") {
            self.host.script = Some(PathBuf::from(val));
        }
        if let Some(val) = var("AUTOLEAVE_POLL_POLICY") {
            self.polling.policy = val.parse()?;
        }
        if let Some(val) = var("AUTOLEAVE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.target.validate()?;
        match self.polling.policy {
            PollPolicy::Fixed if self.polling.interval_ms == 0 => {
                Err(ValidationError::ZeroDuration {
                    field: "polling.interval_ms",
                }
                .into())
            }
            PollPolicy::Jittered if self.polling.jitter_ms == 0 => {
                Err(ValidationError::ZeroDuration {
                    field: "polling.jitter_ms",
                }
                .into())
            }
            _ => Ok(()),
        }
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.storage.url
    }
}

impl PollingConfig {
    /// Build the configured interval policy.
    #[must_use]
    pub fn interval_policy(&self) -> Box<dyn IntervalPolicy> {
        match self.policy {
            PollPolicy::Fixed => Box::new(FixedInterval(Duration::from_millis(self.interval_ms))),
            PollPolicy::Jittered => {
                let base = Duration::from_millis(self.base_ms);
                let jitter = Duration::from_millis(self.jitter_ms);
                match self.seed {
                    Some(seed) => Box::new(JitteredInterval::seeded(base, jitter, seed)),
                    None => Box::new(JitteredInterval::new(base, jitter)),
                }
            }
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            policy: PollPolicy::Fixed,
            interval_ms: 500,
            base_ms: 3000,
            jitter_ms: 2000,
            seed: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:autoleave.db?mode=rwc".to_string(),
            seed_keywords: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "autoleaved=info,autoleave=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// The `[target]` section is unusable.
    #[error("invalid target profile")]
    Target(#[from] AutomationError),
    /// The `[polling]` section is unusable.
    #[error("invalid polling configuration")]
    Polling(#[from] ValidationError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
