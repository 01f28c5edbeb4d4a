//! Metrics collection and Prometheus export.
//!
//! This module provides:
//! - Rate limiting and optional bearer auth for the metrics endpoint
//! - The hyper server behind `/metrics`, `/health/live` and `/health/ready`
//! - Recording helpers for bot, workflow and export events

use anyhow::Result;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

use super::health_checks::{perform_readiness_checks, ReadinessProbe};
use crate::export::ExportFormat;
use crate::models::ApplicationStatus;
use crate::observability_config::{MetricsServerConfig, ObservabilityConfig};
use crate::wizard::OrderKind;

/// Simple per-IP rate limiter for HTTP requests
#[derive(Debug)]
pub struct RateLimiter {
    requests: Mutex<HashMap<String, Vec<Instant>>>,
    max_requests: u32,
    window_secs: u64,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
            max_requests,
            window_secs,
        }
    }

    /// Check if request is allowed for the given IP
    pub fn is_allowed(&self, ip: &str) -> bool {
        let now = Instant::now();
        let window = Duration::from_secs(self.window_secs);

        let mut requests = self.requests.lock();
        // Expire old timestamps for every peer and forget peers left with none
        requests.retain(|_, times| {
            times.retain(|&time| now.duration_since(time) < window);
            !times.is_empty()
        });
        let client_requests = requests.entry(ip.to_string()).or_default();

        if client_requests.len() >= self.max_requests as usize {
            return false;
        }

        client_requests.push(now);
        true
    }

    /// Number of peers with requests still inside the window
    pub fn tracked_peers(&self) -> usize {
        self.requests.lock().len()
    }
}

/// Requests must carry `Authorization: Bearer <token>` when a token is configured
pub fn check_auth<B>(req: &hyper::Request<B>, expected_token: Option<&str>) -> bool {
    let Some(expected_token) = expected_token else {
        return true;
    };

    req.headers()
        .get("authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token == expected_token)
}

/// Initialize the Prometheus recorder
pub fn init_metrics_with_config(config: &ObservabilityConfig) -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    tracing::info!(
        metrics_enabled = %config.metrics.enabled,
        environment = %config.environment,
        "Metrics collection initialized"
    );
    Ok(handle)
}

fn text_response(status: hyper::StatusCode, body: impl Into<String>) -> hyper::Response<String> {
    let mut response = hyper::Response::new(body.into());
    *response.status_mut() = status;
    response
}

/// Start the metrics and health server
pub async fn start_metrics_server(
    metrics_handle: PrometheusHandle,
    config: &MetricsServerConfig,
    probe: ReadinessProbe,
) -> Result<()> {
    let addr = if config.bind_all_interfaces {
        SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), config.port)
    } else {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), config.port)
    };

    let rate_limiter = Arc::new(RateLimiter::new(config.requests_per_minute, 60));
    let auth_token: Arc<Option<String>> = Arc::new(config.auth_token.clone());
    let probe = Arc::new(probe);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        bind_all = %config.bind_all_interfaces,
        auth = %config.auth_token.is_some(),
        "Metrics server listening on {}",
        addr
    );

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, peer_addr)) => {
                    let metrics_handle = metrics_handle.clone();
                    let rate_limiter = rate_limiter.clone();
                    let probe = probe.clone();
                    let auth_token = auth_token.clone();

                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);

                        let service = hyper::service::service_fn(
                            move |req: hyper::Request<hyper::body::Incoming>| {
                                let metrics_handle = metrics_handle.clone();
                                let rate_limiter = rate_limiter.clone();
                                let probe = probe.clone();
                                let auth_token = auth_token.clone();
                                let peer_ip = peer_addr.ip().to_string();
                                async move {
                                    if !rate_limiter.is_allowed(&peer_ip) {
                                        return Ok::<_, std::convert::Infallible>(text_response(
                                            hyper::StatusCode::TOO_MANY_REQUESTS,
                                            "Rate limit exceeded",
                                        ));
                                    }

                                    if !check_auth(&req, auth_token.as_deref()) {
                                        let mut response = text_response(
                                            hyper::StatusCode::UNAUTHORIZED,
                                            "Unauthorized",
                                        );
                                        response.headers_mut().insert(
                                            "www-authenticate",
                                            hyper::header::HeaderValue::from_static("Bearer"),
                                        );
                                        return Ok(response);
                                    }

                                    let response = match (req.method(), req.uri().path()) {
                                        (&hyper::Method::GET, "/metrics") => {
                                            let mut response =
                                                hyper::Response::new(metrics_handle.render());
                                            response.headers_mut().insert(
                                                "content-type",
                                                hyper::header::HeaderValue::from_static(
                                                    "text/plain; version=0.0.4; charset=utf-8",
                                                ),
                                            );
                                            response
                                        }
                                        (&hyper::Method::GET, "/health/live") => {
                                            hyper::Response::new("OK".to_string())
                                        }
                                        (&hyper::Method::GET, "/health/ready") => {
                                            match perform_readiness_checks(&probe).await {
                                                Ok(()) => hyper::Response::new("OK".to_string()),
                                                Err(e) => text_response(
                                                    hyper::StatusCode::SERVICE_UNAVAILABLE,
                                                    format!("NOT READY: {}", e),
                                                ),
                                            }
                                        }
                                        _ => text_response(hyper::StatusCode::NOT_FOUND, "Not Found"),
                                    };
                                    Ok(response)
                                }
                            },
                        );

                        if let Err(err) = http1::Builder::new().serve_connection(io, service).await
                        {
                            crate::errors::error_logging::log_network_error(
                                &err,
                                "serve_http_connection",
                                Some(&peer_addr.to_string()),
                                None,
                            );
                        }
                    });
                }
                Err(e) => {
                    crate::errors::error_logging::log_network_error(
                        &e,
                        "accept_tcp_connection",
                        Some(&addr.to_string()),
                        None,
                    );
                }
            }
        }
    });

    Ok(())
}

/// Record Telegram update processing
pub fn record_telegram_message(message_type: &str) {
    let message_type = message_type.to_string();
    metrics::counter!("telegram_messages_total", "type" => message_type).increment(1);
}

/// Record a dropped duplicate update
pub fn record_telegram_duplicate_message() {
    metrics::counter!("telegram_duplicate_messages_total").increment(1);
}

/// Record an error surfaced to a user
pub fn record_error_metrics(error_kind: &str, component: &str) {
    metrics::counter!(
        "errors_total",
        "kind" => error_kind.to_string(),
        "component" => component.to_string()
    )
    .increment(1);
}

/// Manager actions tracked for engagement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    StartCommand,
    HelpCommand,
    CancelCommand,
    BrowseApplications,
    OpenInbox,
    SearchApplications,
    ApplyFilter,
    ChangeStatus,
    AssignApplication,
    CreateConnectionOrder,
    CreateTechnicalOrder,
    ViewStaffActivity,
    ViewMonitoring,
    ExportApplications,
}

impl UserAction {
    pub fn as_str(self) -> &'static str {
        match self {
            UserAction::StartCommand => "start_command",
            UserAction::HelpCommand => "help_command",
            UserAction::CancelCommand => "cancel_command",
            UserAction::BrowseApplications => "browse_applications",
            UserAction::OpenInbox => "open_inbox",
            UserAction::SearchApplications => "search_applications",
            UserAction::ApplyFilter => "apply_filter",
            UserAction::ChangeStatus => "change_status",
            UserAction::AssignApplication => "assign_application",
            UserAction::CreateConnectionOrder => "create_connection_order",
            UserAction::CreateTechnicalOrder => "create_technical_order",
            UserAction::ViewStaffActivity => "view_staff_activity",
            UserAction::ViewMonitoring => "view_monitoring",
            UserAction::ExportApplications => "export_applications",
        }
    }
}

/// Record a manager action
pub fn record_user_engagement_metrics(user_id: i64, action: UserAction, language_code: Option<&str>) {
    metrics::counter!("user_actions_total", "action" => action.as_str()).increment(1);

    if let Some(lang) = language_code {
        metrics::counter!("user_language_usage_total", "language" => lang.to_string()).increment(1);
    }

    tracing::debug!(
        user_id = %user_id,
        action = %action.as_str(),
        language_code = ?language_code,
        "User engagement recorded"
    );
}

/// Record an attempted status change
pub fn record_status_transition_metrics(
    from: ApplicationStatus,
    to: ApplicationStatus,
    accepted: bool,
) {
    metrics::counter!(
        "status_transitions_total",
        "from" => from.code(),
        "to" => to.code(),
        "result" => if accepted { "accepted" } else { "rejected" }
    )
    .increment(1);
}

/// Record an assignment to a junior manager
pub fn record_assignment_metrics(staff_id: u32, success: bool) {
    metrics::counter!(
        "assignments_total",
        "result" => if success { "success" } else { "failure" }
    )
    .increment(1);
    tracing::debug!(staff_id = %staff_id, success = %success, "Assignment recorded");
}

/// Lifecycle points of an order wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    Started,
    StepRejected,
    Completed,
    Cancelled,
}

impl WizardEvent {
    fn as_str(self) -> &'static str {
        match self {
            WizardEvent::Started => "started",
            WizardEvent::StepRejected => "step_rejected",
            WizardEvent::Completed => "completed",
            WizardEvent::Cancelled => "cancelled",
        }
    }
}

/// Record an order wizard event at the given step number
pub fn record_wizard_metrics(kind: OrderKind, event: WizardEvent, step: usize) {
    metrics::counter!(
        "order_wizard_events_total",
        "kind" => kind.code(),
        "event" => event.as_str()
    )
    .increment(1);
    if event == WizardEvent::Cancelled {
        metrics::histogram!("order_wizard_abandon_step", "kind" => kind.code()).record(step as f64);
    }
}

/// Record a produced export document
pub fn record_export_metrics(format: ExportFormat, rows: usize, bytes: usize, duration: Duration) {
    metrics::counter!("exports_total", "format" => format.code()).increment(1);
    metrics::histogram!("export_rows", "format" => format.code()).record(rows as f64);
    metrics::histogram!("export_size_bytes", "format" => format.code()).record(bytes as f64);
    metrics::histogram!("export_duration_seconds", "format" => format.code())
        .record(duration.as_secs_f64());
}
