//! # Application Error Types
//!
//! This module defines the error types shared by the domain layer and the bot
//! handlers. Domain operations return [`AppResult`]; handlers convert any
//! error into a logged event plus one localized notice for the user.

use std::fmt;

use crate::models::ApplicationStatus;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// A record looked up by id does not exist
    NotFound { entity: &'static str, id: String },
    /// A status change that the transition table does not allow
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    /// User input rejected by validation (wizard steps, search queries)
    Validation(String),
    /// Configuration validation errors
    Config(String),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound { entity, id } => write!(f, "[NOT_FOUND] {} {}", entity, id),
            AppError::InvalidTransition { from, to } => {
                write!(f, "[INVALID_TRANSITION] {} -> {}", from.code(), to.code())
            }
            AppError::Validation(msg) => write!(f, "[VALIDATION] {}", msg),
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl AppError {
    /// Shorthand for a missing record
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        AppError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Localization key of the notice shown to the user for this error
    pub fn user_message_key(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "error-not-found",
            AppError::InvalidTransition { .. } => "error-invalid-transition",
            AppError::Validation(_) => "error-validation",
            AppError::Config(_) | AppError::Internal(_) => "error-generic",
        }
    }

    /// Short label used for error metrics
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "not_found",
            AppError::InvalidTransition { .. } => "invalid_transition",
            AppError::Validation(_) => "validation",
            AppError::Config(_) => "config",
            AppError::Internal(_) => "internal",
        }
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use tracing::{error, warn};

    /// Log a failure inside an update handler
    pub fn log_handler_error(
        error: &impl std::fmt::Display,
        handler: &str,
        user_id: Option<i64>,
        payload: Option<&str>,
    ) {
        error!(
            error = %error,
            handler = %handler,
            user_id = ?user_id,
            payload = ?payload,
            "Update handler failed"
        );
    }

    /// Log a rejected status change
    pub fn log_transition_rejected(
        application_id: &str,
        from: &str,
        to: &str,
        user_id: Option<i64>,
    ) {
        warn!(
            application_id = %application_id,
            from = %from,
            to = %to,
            user_id = ?user_id,
            "Status transition rejected"
        );
    }

    /// Log network/communication errors with connection context
    pub fn log_network_error(
        error: &impl std::fmt::Display,
        operation: &str,
        endpoint: Option<&str>,
        attempt_count: Option<u32>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            endpoint = ?endpoint,
            attempt_count = ?attempt_count,
            "Network operation failed"
        );
    }

    /// Log validation errors with input context
    pub fn log_validation_error(
        error: &impl std::fmt::Display,
        operation: &str,
        user_id: Option<i64>,
        input_type: &str,
        input_value: Option<&str>,
    ) {
        warn!(
            error = %error,
            operation = %operation,
            user_id = ?user_id,
            input_type = %input_type,
            input_value = ?input_value.map(|v| v.chars().take(100).collect::<String>()),
            "Validation failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = AppError::not_found("application", "CONN-2024-001");
        assert_eq!(err.to_string(), "[NOT_FOUND] application CONN-2024-001");

        let err = AppError::InvalidTransition {
            from: ApplicationStatus::Completed,
            to: ApplicationStatus::Created,
        };
        assert_eq!(err.to_string(), "[INVALID_TRANSITION] completed -> created");
    }

    #[test]
    fn test_user_message_keys() {
        assert_eq!(
            AppError::Validation("x".into()).user_message_key(),
            "error-validation"
        );
        assert_eq!(
            AppError::Internal("x".into()).user_message_key(),
            "error-generic"
        );
    }
}
