//! Callbacks module for handling all inline keyboard callback queries
//!
//! This module is organized into submodules for different types of callbacks:
//! - `callback_handler`: Main routing handler for all callback queries
//! - `callback_types`: Callback payloads and their parsing
//! - `application_callbacks`: Paging, status changes and assignment
//! - `filter_callbacks`: The filter menu
//! - `export_callbacks`: Document export of the current list
//! - `staff_callbacks`: Staff activity by role
//! - `monitoring_callbacks`: Monitoring dashboard refresh
//! - `order_callbacks`: Connection and technical-service order wizards

pub mod application_callbacks;
pub mod callback_handler;
pub mod callback_types;
pub mod export_callbacks;
pub mod filter_callbacks;
pub mod monitoring_callbacks;
pub mod order_callbacks;
pub mod staff_callbacks;
