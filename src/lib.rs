//! # Telecom Manager Bot
//!
//! A Telegram bot for managers of a telecom provider: browse and filter
//! service applications, move them through the status workflow, assign
//! them to junior managers, create connection and technical-service
//! orders, and watch staff activity and pipeline health.

pub mod bot;
pub mod catalog;
pub mod client_search;
pub mod config;
pub mod deduplication;
pub mod dialogue;
pub mod errors;
pub mod export;
pub mod filters;
pub mod localization;
pub mod mock_data;
pub mod models;
pub mod monitoring;
pub mod observability;
pub mod observability_config;
pub mod pagination;
pub mod pricing;
pub mod repository;
pub mod staff;
pub mod status_workflow;
pub mod wizard;

// Re-export types for easier access
pub use errors::{AppError, AppResult};
pub use models::{Application, ApplicationStatus, Priority, WorkflowType};
pub use repository::InMemoryStore;
