// src/config/models.rs
use crate::health::{EvaluateOptions, Thresholds};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_PARTITION: &str = "Common";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("missing mandatory parameter: {0}")]
    Missing(&'static str),

    #[error("{name} must be a percentage in (0, 100], got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("timeout must be at least one second")]
    InvalidTimeout,

    #[error("retry.max_attempts must be at least 1")]
    InvalidRetry,
}

/// Everything needed to run one pool check, validated.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub connection: ConnectionConfig,
    pub pool: String,
    pub thresholds: Thresholds,
    pub verbose: bool,
    pub members: bool,
    pub retry: RetryConfig,
}

impl CheckConfig {
    pub fn evaluate_options(&self) -> EvaluateOptions {
        EvaluateOptions {
            verbose: self.verbose,
            show_members: self.members,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Bare host name or a full base URL such as `https://lb:8443`.
    pub host: String,
    pub partition: String,
    pub user: String,
    pub password: String,
    pub timeout_secs: u64,
    pub verify_tls: bool,
}

impl ConnectionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff_base_ms: 200,
            backoff_max_ms: 2_000,
        }
    }
}

impl RetryConfig {
    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    pub fn backoff_max(&self) -> Duration {
        Duration::from_millis(self.backoff_max_ms)
    }
}

/// Unvalidated settings from one source (file or command line).
///
/// Sources are layered with [`PartialConfig::merge`] and turned into a
/// [`CheckConfig`] with [`PartialConfig::build`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialConfig {
    pub host: Option<String>,
    pub partition: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub pool: Option<String>,
    pub warning: Option<f64>,
    pub critical: Option<f64>,
    pub verbose: Option<bool>,
    pub members: Option<bool>,
    pub timeout_secs: Option<u64>,
    pub verify_tls: Option<bool>,
    pub retry: Option<RetryConfig>,
}

impl PartialConfig {
    /// Layer `other` on top of `self`; values set in `other` win.
    pub fn merge(self, other: PartialConfig) -> PartialConfig {
        PartialConfig {
            host: other.host.or(self.host),
            partition: other.partition.or(self.partition),
            user: other.user.or(self.user),
            password: other.password.or(self.password),
            pool: other.pool.or(self.pool),
            warning: other.warning.or(self.warning),
            critical: other.critical.or(self.critical),
            verbose: other.verbose.or(self.verbose),
            members: other.members.or(self.members),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            verify_tls: other.verify_tls.or(self.verify_tls),
            retry: other.retry.or(self.retry),
        }
    }

    pub fn build(self) -> Result<CheckConfig, ConfigError> {
        let host = required(self.host, "host")?;
        let user = required(self.user, "user")?;
        let password = required(self.password, "password")?;
        let pool = required(self.pool, "pool")?;
        let warning = self.warning.ok_or(ConfigError::Missing("warning"))?;
        let critical = self.critical.ok_or(ConfigError::Missing("critical"))?;
        let partition = self
            .partition
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PARTITION.to_string());

        validate_percent("warning", warning)?;
        validate_percent("critical", critical)?;

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        let retry = self.retry.unwrap_or_default();
        if retry.max_attempts == 0 {
            return Err(ConfigError::InvalidRetry);
        }

        let thresholds = Thresholds::new(warning, critical);
        if thresholds.is_inverted() {
            tracing::warn!(
                warning,
                critical,
                "critical threshold is below warning threshold; warning can only fire when critical does not"
            );
        }

        Ok(CheckConfig {
            connection: ConnectionConfig {
                host,
                partition,
                user,
                password,
                timeout_secs,
                verify_tls: self.verify_tls.unwrap_or(true),
            },
            pool,
            thresholds,
            verbose: self.verbose.unwrap_or(false),
            members: self.members.unwrap_or(false),
            retry,
        })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn validate_percent(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 100.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { name, value })
    }
}
