//! # Observability Configuration
//!
//! Logging, trace export and the Prometheus endpoint are all driven by
//! environment variables read once at start-up. Malformed values are
//! reported as [`AppError::Config`] instead of silently falling back.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::errors::{AppError, AppResult};

pub const SERVICE_NAME: &str = "telecom-manager-bot";

/// Read `key`, falling back to `default` when unset, and parse it
pub fn env_or<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, raw))),
        _ => Ok(default),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Level for the bot's own targets when none is configured
    pub fn default_log_level(self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Staging => "info",
            Environment::Production => "warn",
        }
    }
}

impl FromStr for Environment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(AppError::Config(format!("Unknown environment: {}", other))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of log lines on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!("Unknown log format: {}", other))),
        }
    }
}

/// The `/metrics` and `/health/*` HTTP endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsServerConfig {
    pub enabled: bool,
    pub port: u16,
    /// Listen on every interface instead of localhost only
    pub bind_all_interfaces: bool,
    /// Bearer token required on every request when set
    pub auth_token: Option<String>,
    pub requests_per_minute: u32,
}

impl Default for MetricsServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 9090,
            bind_all_interfaces: false,
            auth_token: None,
            requests_per_minute: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObservabilityConfig {
    pub environment: Environment,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Traces are exported over OTLP/gRPC only when this is set
    pub otlp_endpoint: Option<String>,
    pub trace_sampling_ratio: f64,
    pub metrics: MetricsServerConfig,
    /// Period of the pipeline and process gauges
    pub gauge_refresh_secs: u64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Development)
    }
}

impl ObservabilityConfig {
    /// Defaults tuned per environment: verbose pretty logs while developing,
    /// sampled traces and JSON logs once deployed
    pub fn for_environment(environment: Environment) -> Self {
        let deployed = environment != Environment::Development;
        Self {
            environment,
            log_level: environment.default_log_level().to_string(),
            log_format: if deployed {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            },
            otlp_endpoint: None,
            trace_sampling_ratio: if environment == Environment::Production {
                0.1
            } else {
                1.0
            },
            metrics: MetricsServerConfig::default(),
            gauge_refresh_secs: 30,
        }
    }

    pub fn from_env() -> AppResult<Self> {
        let environment = env_or("ENVIRONMENT", Environment::Development)?;
        let defaults = Self::for_environment(environment);

        Ok(Self {
            environment,
            log_level: env_or("OBSERVABILITY_LOG_LEVEL", defaults.log_level)?,
            log_format: env_or("LOG_FORMAT", defaults.log_format)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|e| !e.trim().is_empty()),
            trace_sampling_ratio: env_or("TRACE_SAMPLING_RATIO", defaults.trace_sampling_ratio)?,
            metrics: MetricsServerConfig {
                enabled: env_or("ENABLE_METRICS_EXPORT", defaults.metrics.enabled)?,
                port: env_or("METRICS_PORT", defaults.metrics.port)?,
                bind_all_interfaces: env_or(
                    "METRICS_BIND_ALL_INTERFACES",
                    defaults.metrics.bind_all_interfaces,
                )?,
                auth_token: env::var("METRICS_AUTH_TOKEN").ok().filter(|t| !t.is_empty()),
                requests_per_minute: env_or(
                    "METRICS_REQUESTS_PER_MINUTE",
                    defaults.metrics.requests_per_minute,
                )?,
            },
            gauge_refresh_secs: env_or("GAUGE_REFRESH_SECS", defaults.gauge_refresh_secs)?,
        })
    }

    pub fn validate(&self) -> AppResult<()> {
        if let Some(endpoint) = &self.otlp_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(AppError::Config(format!(
                    "Invalid OTLP endpoint format: {}",
                    endpoint
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.trace_sampling_ratio) {
            return Err(AppError::Config(format!(
                "Trace sampling ratio must be within 0.0..=1.0, got {}",
                self.trace_sampling_ratio
            )));
        }

        if self.metrics.enabled {
            if self.metrics.port == 0 {
                return Err(AppError::Config("Metrics port cannot be 0".to_string()));
            }
            if self.metrics.requests_per_minute == 0 {
                return Err(AppError::Config(
                    "Metrics rate limit must allow at least one request per minute".to_string(),
                ));
            }
            if self.metrics.bind_all_interfaces
                && self.environment == Environment::Production
                && self.metrics.auth_token.is_none()
            {
                return Err(AppError::Config(
                    "METRICS_AUTH_TOKEN is required when metrics listen on all interfaces in production"
                        .to_string(),
                ));
            }
        }

        if self.gauge_refresh_secs == 0 {
            return Err(AppError::Config(
                "Gauge refresh interval cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defaults() {
        let dev = ObservabilityConfig::default();
        assert_eq!(dev.environment, Environment::Development);
        assert_eq!(dev.log_level, "debug");
        assert_eq!(dev.log_format, LogFormat::Pretty);
        assert_eq!(dev.trace_sampling_ratio, 1.0);
        assert!(dev.validate().is_ok());

        let prod = ObservabilityConfig::for_environment(Environment::Production);
        assert_eq!(prod.log_format, LogFormat::Json);
        assert_eq!(prod.trace_sampling_ratio, 0.1);
        assert_eq!(prod.log_level, "warn");
    }

    #[test]
    fn test_parsing_names() {
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("Staging".parse::<Environment>().unwrap(), Environment::Staging);
        assert!("qa".parse::<Environment>().is_err());
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!(Environment::Staging.to_string(), "staging");
    }

    #[test]
    fn test_validation() {
        let mut config = ObservabilityConfig::default();

        config.otlp_endpoint = Some("collector:4317".to_string());
        assert!(config.validate().is_err());
        config.otlp_endpoint = Some("http://collector:4317".to_string());
        assert!(config.validate().is_ok());

        config.trace_sampling_ratio = 1.5;
        assert!(config.validate().is_err());
        config.trace_sampling_ratio = 0.5;

        config.metrics.port = 0;
        assert!(config.validate().is_err());
        // A disabled server does not need a port
        config.metrics.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_open_metrics_in_production_need_a_token() {
        let mut config = ObservabilityConfig::for_environment(Environment::Production);
        config.metrics.bind_all_interfaces = true;
        assert!(config.validate().is_err());

        config.metrics.auth_token = Some("s3cret".to_string());
        assert!(config.validate().is_ok());
    }
}
