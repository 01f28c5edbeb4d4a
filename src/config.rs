//! # Unified Application Configuration
//!
//! All settings are read from environment variables (optionally loaded from a
//! `.env` file by `main`) into one [`AppConfig`] and validated before the bot
//! starts polling.
//!
//! | Variable                  | Default | Meaning                              |
//! |---------------------------|---------|--------------------------------------|
//! | `TELEGRAM_BOT_TOKEN`      | none    | Bot API token, required              |
//! | `HTTP_CLIENT_TIMEOUT_SECS`| 30      | Timeout of Bot API requests          |
//! | `DEDUPLICATION_TTL_SECS`  | 300     | How long an update id is remembered  |
//! | `DEFAULT_LANGUAGE`        | uz      | Language for unsupported user locales|
//!
//! Observability variables are documented in [`crate::observability_config`].

use std::env;

use crate::errors::{AppError, AppResult};
use crate::localization::{has_locale, DEFAULT_LANGUAGE};
use crate::observability_config::{env_or, ObservabilityConfig};

/// Shortest secret part Telegram has been seen to issue
const MIN_TOKEN_SECRET_LEN: usize = 20;

/// Check a token has the `<numeric bot id>:<secret>` shape
pub fn check_token_shape(token: &str) -> AppResult<()> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Config("Bot token cannot be empty".to_string()));
    }

    let Some((bot_id, secret)) = token.split_once(':') else {
        return Err(AppError::Config(
            "Bot token format is invalid. Expected format: 'bot_id:bot_token'".to_string(),
        ));
    };
    if bot_id.is_empty() || !bot_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Config("Bot token bot ID must be numeric".to_string()));
    }
    if secret.len() < MIN_TOKEN_SECRET_LEN || secret.contains(':') {
        return Err(AppError::Config(
            "Bot token secret looks truncated. Please verify it's a valid token".to_string(),
        ));
    }
    Ok(())
}

/// Telegram-facing settings
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    pub token: String,
    pub http_timeout_secs: u64,
    pub deduplication_ttl_secs: u64,
    /// Language for users whose Telegram language is not supported
    pub default_language: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            http_timeout_secs: 30,
            deduplication_ttl_secs: 300,
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl BotConfig {
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            token: env::var("TELEGRAM_BOT_TOKEN").map_err(|_| {
                AppError::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
            })?,
            http_timeout_secs: env_or("HTTP_CLIENT_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            deduplication_ttl_secs: env_or(
                "DEDUPLICATION_TTL_SECS",
                defaults.deduplication_ttl_secs,
            )?,
            default_language: env_or("DEFAULT_LANGUAGE", defaults.default_language)?
                .to_lowercase(),
        })
    }

    pub fn validate(&self) -> AppResult<()> {
        check_token_shape(&self.token)?;

        if !(1..=300).contains(&self.http_timeout_secs) {
            return Err(AppError::Config(
                "HTTP timeout must be between 1 and 300 seconds".to_string(),
            ));
        }

        if self.deduplication_ttl_secs == 0 {
            return Err(AppError::Config("Deduplication TTL cannot be 0".to_string()));
        }

        if !has_locale(&self.default_language) {
            return Err(AppError::Config(format!(
                "No locale ships for default language: {}",
                self.default_language
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub bot: BotConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            bot: BotConfig::from_env()?,
            observability: ObservabilityConfig::from_env()?,
        })
    }

    pub fn validate(&self) -> AppResult<()> {
        self.bot.validate()?;
        self.observability.validate()?;
        Ok(())
    }

    /// One-line summary for the start-up log; never includes secrets
    pub fn summary(&self) -> String {
        let metrics = &self.observability.metrics;
        format!(
            "environment={}, default_language={}, http_timeout_secs={}, dedup_ttl_secs={}, metrics={}, otlp={}",
            self.observability.environment,
            self.bot.default_language,
            self.bot.http_timeout_secs,
            self.bot.deduplication_ttl_secs,
            if metrics.enabled {
                format!("port {}", metrics.port)
            } else {
                "off".to_string()
            },
            self.observability.otlp_endpoint.as_deref().unwrap_or("off"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_TOKEN: &str = "123456789:AAFakeTokenForTestingPurposes1234567890";

    #[test]
    fn test_token_shape() {
        assert!(check_token_shape("").is_err());
        assert!(check_token_shape("invalid-token").is_err());
        assert!(check_token_shape("abc:AAFakeTokenForTestingPurposes1234567890").is_err());
        assert!(check_token_shape("123:short").is_err());
        assert!(check_token_shape(VALID_TOKEN).is_ok());
    }

    #[test]
    fn test_bot_config_validation() {
        let mut config = BotConfig {
            token: VALID_TOKEN.to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.http_timeout_secs = 0;
        assert!(config.validate().is_err());
        config.http_timeout_secs = 301;
        assert!(config.validate().is_err());
        config.http_timeout_secs = 30;

        config.deduplication_ttl_secs = 0;
        assert!(config.validate().is_err());
        config.deduplication_ttl_secs = 60;

        config.default_language = "en".to_string();
        assert!(config.validate().is_err());
        config.default_language = "ru".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_summary_has_no_secrets() {
        let mut config = AppConfig::default();
        config.bot.token = VALID_TOKEN.to_string();
        let summary = config.summary();
        assert!(!summary.contains("AAFake"));
        assert!(summary.contains("environment=development"));
        assert!(summary.contains("metrics=port 9090"));
        assert!(summary.contains("otlp=off"));
    }
}
