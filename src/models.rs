//! Domain records for applications, clients and staff.
//!
//! Every enum carries a stable snake_case code (used in callback payloads and
//! exports), an emoji, and the localization key of its display label.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Created,
    Assigned,
    InProgress,
    Pending,
    Completed,
    Cancelled,
    Transferred,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 7] = [
        ApplicationStatus::Created,
        ApplicationStatus::Assigned,
        ApplicationStatus::InProgress,
        ApplicationStatus::Pending,
        ApplicationStatus::Completed,
        ApplicationStatus::Cancelled,
        ApplicationStatus::Transferred,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ApplicationStatus::Created => "created",
            ApplicationStatus::Assigned => "assigned",
            ApplicationStatus::InProgress => "in_progress",
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Completed => "completed",
            ApplicationStatus::Cancelled => "cancelled",
            ApplicationStatus::Transferred => "transferred",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    pub fn emoji(self) -> &'static str {
        match self {
            ApplicationStatus::Created => "🆕",
            ApplicationStatus::Assigned => "👤",
            ApplicationStatus::InProgress => "🔧",
            ApplicationStatus::Pending => "⏳",
            ApplicationStatus::Completed => "✅",
            ApplicationStatus::Cancelled => "❌",
            ApplicationStatus::Transferred => "🔄",
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            ApplicationStatus::Created => "status-created",
            ApplicationStatus::Assigned => "status-assigned",
            ApplicationStatus::InProgress => "status-in-progress",
            ApplicationStatus::Pending => "status-pending",
            ApplicationStatus::Completed => "status-completed",
            ApplicationStatus::Cancelled => "status-cancelled",
            ApplicationStatus::Transferred => "status-transferred",
        }
    }

    /// Open applications still need work from someone
    pub fn is_open(self) -> bool {
        !matches!(
            self,
            ApplicationStatus::Completed | ApplicationStatus::Cancelled
        )
    }
}

/// Priority of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Normal,
        Priority::High,
        Priority::Urgent,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Priority::Low => "🟢",
            Priority::Normal => "🟡",
            Priority::High => "🟠",
            Priority::Urgent => "🔴",
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            Priority::Low => "priority-low",
            Priority::Normal => "priority-normal",
            Priority::High => "priority-high",
            Priority::Urgent => "priority-urgent",
        }
    }
}

/// Which workflow produced the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowType {
    ConnectionRequest,
    TechnicalService,
    CallCenterDirect,
}

impl WorkflowType {
    pub const ALL: [WorkflowType; 3] = [
        WorkflowType::ConnectionRequest,
        WorkflowType::TechnicalService,
        WorkflowType::CallCenterDirect,
    ];

    pub fn code(self) -> &'static str {
        match self {
            WorkflowType::ConnectionRequest => "connection_request",
            WorkflowType::TechnicalService => "technical_service",
            WorkflowType::CallCenterDirect => "call_center_direct",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.code() == code)
    }

    pub fn emoji(self) -> &'static str {
        match self {
            WorkflowType::ConnectionRequest => "🔌",
            WorkflowType::TechnicalService => "🔧",
            WorkflowType::CallCenterDirect => "📞",
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            WorkflowType::ConnectionRequest => "workflow-connection",
            WorkflowType::TechnicalService => "workflow-technical",
            WorkflowType::CallCenterDirect => "workflow-call-center",
        }
    }
}

/// A connection request or service ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub client_name: String,
    pub client_phone: String,
    pub address: String,
    pub region: String,
    pub description: String,
    pub status: ApplicationStatus,
    pub priority: Priority,
    pub workflow_type: WorkflowType,
    pub assigned_to: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub comments: Option<String>,
    pub estimated_cost: Option<u64>,
    pub media_file_id: Option<String>,
    pub location: Option<(f64, f64)>,
}

/// A customer of the operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: u32,
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub region: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Manager,
    JuniorManager,
    Technician,
    CallCenter,
}

impl StaffRole {
    pub const ALL: [StaffRole; 4] = [
        StaffRole::Manager,
        StaffRole::JuniorManager,
        StaffRole::Technician,
        StaffRole::CallCenter,
    ];

    pub fn code(self) -> &'static str {
        match self {
            StaffRole::Manager => "manager",
            StaffRole::JuniorManager => "junior_manager",
            StaffRole::Technician => "technician",
            StaffRole::CallCenter => "call_center",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }

    pub fn label_key(self) -> &'static str {
        match self {
            StaffRole::Manager => "role-manager",
            StaffRole::JuniorManager => "role-junior-manager",
            StaffRole::Technician => "role-technician",
            StaffRole::CallCenter => "role-call-center",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffStatus {
    Online,
    Busy,
    Offline,
}

impl StaffStatus {
    pub fn emoji(self) -> &'static str {
        match self {
            StaffStatus::Online => "🟢",
            StaffStatus::Busy => "🟡",
            StaffStatus::Offline => "⚫",
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            StaffStatus::Online => "staff-online",
            StaffStatus::Busy => "staff-busy",
            StaffStatus::Offline => "staff-offline",
        }
    }
}

/// Coarse workload classification derived from active application count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadBucket {
    Idle,
    Normal,
    High,
    Overloaded,
}

impl WorkloadBucket {
    pub fn from_active(active: u32) -> Self {
        match active {
            0 => WorkloadBucket::Idle,
            1..=3 => WorkloadBucket::Normal,
            4..=6 => WorkloadBucket::High,
            _ => WorkloadBucket::Overloaded,
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            WorkloadBucket::Idle => "workload-idle",
            WorkloadBucket::Normal => "workload-normal",
            WorkloadBucket::High => "workload-high",
            WorkloadBucket::Overloaded => "workload-overloaded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: u32,
    pub full_name: String,
    pub role: StaffRole,
    pub status: StaffStatus,
    pub active_applications: u32,
    pub completed_today: u32,
    pub completed_total: u32,
    pub avg_completion_hours: f32,
    pub rating: f32,
}

impl StaffMember {
    pub fn workload(&self) -> WorkloadBucket {
        WorkloadBucket::from_active(self.active_applications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_from_code() {
        for status in ApplicationStatus::ALL {
            assert_eq!(ApplicationStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(Priority::from_code("urgent"), Some(Priority::Urgent));
        assert_eq!(
            WorkflowType::from_code("technical_service"),
            Some(WorkflowType::TechnicalService)
        );
        assert_eq!(ApplicationStatus::from_code("archived"), None);
    }

    #[test]
    fn test_workload_buckets() {
        assert_eq!(WorkloadBucket::from_active(0), WorkloadBucket::Idle);
        assert_eq!(WorkloadBucket::from_active(3), WorkloadBucket::Normal);
        assert_eq!(WorkloadBucket::from_active(4), WorkloadBucket::High);
        assert_eq!(WorkloadBucket::from_active(7), WorkloadBucket::Overloaded);
    }

    #[test]
    fn test_serde_uses_snake_case_codes() {
        let json = serde_json::to_string(&ApplicationStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }
}
