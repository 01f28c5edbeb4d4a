//! Callback payloads understood by the bot.
//!
//! Every inline button carries one of these payloads; keyboards build them
//! with [`CallbackAction::payload`] and the router parses them back with
//! [`CallbackAction::parse`]. Telegram limits callback data to 64 bytes.

use crate::client_search::SearchMethod;
use crate::export::ExportFormat;
use crate::filters::DatePreset;
use crate::models::{ApplicationStatus, Priority, StaffRole, WorkflowType};

/// Inputs of the order wizard coming from inline buttons
#[derive(Debug, Clone, PartialEq)]
pub enum OrderCallback {
    Method(SearchMethod),
    Client(u32),
    /// Region, type, tariff or problem code
    Choose(String),
    Skip,
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallbackAction {
    /// Decorative buttons such as the page counter
    Noop,
    PrevApplication,
    NextApplication,
    /// Re-render the current application card
    BackToApplication,
    ShowStatusMenu(String),
    SelectStatus {
        app_id: String,
        status: ApplicationStatus,
    },
    SkipComment,
    ShowAssignMenu(String),
    AssignTo {
        app_id: String,
        staff_id: u32,
    },
    FilterStatus(ApplicationStatus),
    FilterPriority(Priority),
    FilterWorkflow(WorkflowType),
    FilterDate(DatePreset),
    FilterClear,
    FilterApply,
    Export(ExportFormat),
    /// `None` lists every role
    StaffRole(Option<StaffRole>),
    MonitorRefresh,
    Order(OrderCallback),
}

impl CallbackAction {
    /// Parse a callback payload; unknown payloads give `None`
    pub fn parse(data: &str) -> Option<Self> {
        let action = match data {
            "noop" => CallbackAction::Noop,
            "app_prev" => CallbackAction::PrevApplication,
            "app_next" => CallbackAction::NextApplication,
            "app_back" => CallbackAction::BackToApplication,
            "comment_skip" => CallbackAction::SkipComment,
            "filter_clear" => CallbackAction::FilterClear,
            "filter_apply" => CallbackAction::FilterApply,
            "monitor_refresh" => CallbackAction::MonitorRefresh,
            "staff_role_all" => CallbackAction::StaffRole(None),
            "order_skip" => CallbackAction::Order(OrderCallback::Skip),
            "order_confirm" => CallbackAction::Order(OrderCallback::Confirm),
            "order_cancel" => CallbackAction::Order(OrderCallback::Cancel),
            _ => return Self::parse_prefixed(data),
        };
        Some(action)
    }

    fn parse_prefixed(data: &str) -> Option<Self> {
        if let Some(id) = data.strip_prefix("app_status_") {
            return non_empty(id).map(|id| CallbackAction::ShowStatusMenu(id.to_string()));
        }
        if let Some(rest) = data.strip_prefix("status_select_") {
            let (app_id, status) = rest.rsplit_once(':')?;
            return Some(CallbackAction::SelectStatus {
                app_id: non_empty(app_id)?.to_string(),
                status: ApplicationStatus::from_code(status)?,
            });
        }
        // Longer prefix first: "mgr_assign_" is a prefix of it
        if let Some(rest) = data.strip_prefix("mgr_assign_jm_") {
            let (app_id, staff_id) = rest.rsplit_once(':')?;
            return Some(CallbackAction::AssignTo {
                app_id: non_empty(app_id)?.to_string(),
                staff_id: staff_id.parse().ok()?,
            });
        }
        if let Some(id) = data.strip_prefix("mgr_assign_") {
            return non_empty(id).map(|id| CallbackAction::ShowAssignMenu(id.to_string()));
        }
        if let Some(code) = data.strip_prefix("filter_status_") {
            return ApplicationStatus::from_code(code).map(CallbackAction::FilterStatus);
        }
        if let Some(code) = data.strip_prefix("filter_priority_") {
            return Priority::from_code(code).map(CallbackAction::FilterPriority);
        }
        if let Some(code) = data.strip_prefix("filter_workflow_") {
            return WorkflowType::from_code(code).map(CallbackAction::FilterWorkflow);
        }
        if let Some(code) = data.strip_prefix("filter_date_") {
            return DatePreset::from_code(code).map(CallbackAction::FilterDate);
        }
        if let Some(code) = data.strip_prefix("export_") {
            return ExportFormat::from_code(code).map(CallbackAction::Export);
        }
        if let Some(code) = data.strip_prefix("staff_role_") {
            return StaffRole::from_code(code).map(|role| CallbackAction::StaffRole(Some(role)));
        }
        if let Some(code) = data.strip_prefix("order_method_") {
            return SearchMethod::from_code(code)
                .map(|method| CallbackAction::Order(OrderCallback::Method(method)));
        }
        if let Some(id) = data.strip_prefix("order_client_") {
            return id
                .parse()
                .ok()
                .map(|id| CallbackAction::Order(OrderCallback::Client(id)));
        }
        if let Some(code) = data.strip_prefix("order_choose_") {
            return non_empty(code)
                .map(|code| CallbackAction::Order(OrderCallback::Choose(code.to_string())));
        }
        None
    }

    /// Payload string carried by an inline button
    pub fn payload(&self) -> String {
        match self {
            CallbackAction::Noop => "noop".to_string(),
            CallbackAction::PrevApplication => "app_prev".to_string(),
            CallbackAction::NextApplication => "app_next".to_string(),
            CallbackAction::BackToApplication => "app_back".to_string(),
            CallbackAction::ShowStatusMenu(id) => format!("app_status_{}", id),
            CallbackAction::SelectStatus { app_id, status } => {
                format!("status_select_{}:{}", app_id, status.code())
            }
            CallbackAction::SkipComment => "comment_skip".to_string(),
            CallbackAction::ShowAssignMenu(id) => format!("mgr_assign_{}", id),
            CallbackAction::AssignTo { app_id, staff_id } => {
                format!("mgr_assign_jm_{}:{}", app_id, staff_id)
            }
            CallbackAction::FilterStatus(s) => format!("filter_status_{}", s.code()),
            CallbackAction::FilterPriority(p) => format!("filter_priority_{}", p.code()),
            CallbackAction::FilterWorkflow(w) => format!("filter_workflow_{}", w.code()),
            CallbackAction::FilterDate(d) => format!("filter_date_{}", d.code()),
            CallbackAction::FilterClear => "filter_clear".to_string(),
            CallbackAction::FilterApply => "filter_apply".to_string(),
            CallbackAction::Export(f) => format!("export_{}", f.code()),
            CallbackAction::StaffRole(None) => "staff_role_all".to_string(),
            CallbackAction::StaffRole(Some(role)) => format!("staff_role_{}", role.code()),
            CallbackAction::MonitorRefresh => "monitor_refresh".to_string(),
            CallbackAction::Order(order) => match order {
                OrderCallback::Method(m) => format!("order_method_{}", m.code()),
                OrderCallback::Client(id) => format!("order_client_{}", id),
                OrderCallback::Choose(code) => format!("order_choose_{}", code),
                OrderCallback::Skip => "order_skip".to_string(),
                OrderCallback::Confirm => "order_confirm".to_string(),
                OrderCallback::Cancel => "order_cancel".to_string(),
            },
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_prefixes_do_not_collide() {
        assert_eq!(
            CallbackAction::parse("mgr_assign_jm_CONN-2024-001:2"),
            Some(CallbackAction::AssignTo {
                app_id: "CONN-2024-001".to_string(),
                staff_id: 2
            })
        );
        assert_eq!(
            CallbackAction::parse("mgr_assign_CONN-2024-001"),
            Some(CallbackAction::ShowAssignMenu("CONN-2024-001".to_string()))
        );
    }

    #[test]
    fn test_status_select_with_underscored_status() {
        assert_eq!(
            CallbackAction::parse("status_select_TECH-2024-001:in_progress"),
            Some(CallbackAction::SelectStatus {
                app_id: "TECH-2024-001".to_string(),
                status: ApplicationStatus::InProgress
            })
        );
        assert_eq!(CallbackAction::parse("status_select_TECH-2024-001:done"), None);
    }

    #[test]
    fn test_unknown_payloads() {
        assert_eq!(CallbackAction::parse(""), None);
        assert_eq!(CallbackAction::parse("export_xls"), None);
        assert_eq!(CallbackAction::parse("mgr_assign_jm_X:abc"), None);
        assert_eq!(CallbackAction::parse("app_status_"), None);
    }

    #[test]
    fn test_payloads_fit_telegram_limit() {
        let longest = CallbackAction::SelectStatus {
            app_id: "CONN-2024-999".to_string(),
            status: ApplicationStatus::Transferred,
        };
        assert!(longest.payload().len() <= 64);
    }
}
