//! Observability module for centralized metrics, tracing, and logging setup.
//!
//! This module provides:
//! - Metrics collection and Prometheus export
//! - Distributed tracing with OpenTelemetry
//! - Structured logging with configurable levels
//! - Liveness and readiness endpoints

pub mod health_checks;
pub mod metrics;
pub mod system_monitoring;
pub mod tracing_mod;

use anyhow::Result;

use crate::observability_config::ObservabilityConfig;

pub use health_checks::{perform_readiness_checks, ReadinessProbe};
pub use metrics::{
    record_assignment_metrics, record_error_metrics, record_export_metrics,
    record_status_transition_metrics, record_telegram_duplicate_message, record_telegram_message,
    record_user_engagement_metrics, record_wizard_metrics, UserAction, WizardEvent,
};
pub use system_monitoring::{record_pipeline_gauges, start_system_metrics_recorder};

/// Initialize the complete observability stack
pub async fn init_observability_with_config(
    config: &ObservabilityConfig,
    probe: ReadinessProbe,
) -> Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    // Logging first so the remaining steps can report
    tracing_mod::init_tracing_with_config(config)?;

    tracing_mod::init_opentelemetry_tracing_with_config(config)?;

    if config.metrics.enabled {
        let metrics_handle = metrics::init_metrics_with_config(config)?;
        metrics::start_metrics_server(metrics_handle, &config.metrics, probe).await?;
    } else {
        tracing::info!("Metrics export disabled");
    }

    tracing::info!(
        environment = %config.environment,
        otlp_endpoint = ?config.otlp_endpoint,
        metrics_port = %config.metrics.port,
        "Observability stack initialized successfully"
    );
    Ok(())
}

/// Create a span for Telegram bot operations
pub fn telegram_span(operation: &str, user_id: Option<i64>) -> tracing::Span {
    tracing::info_span!(
        "telegram_operation",
        operation = operation,
        user_id = user_id,
        component = "telegram"
    )
}

/// Create a span for repository operations
pub fn store_span(operation: &str, entity: &str) -> tracing::Span {
    tracing::info_span!(
        "store_operation",
        operation = operation,
        entity = entity,
        component = "store"
    )
}
