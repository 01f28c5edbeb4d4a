//! Realtime monitoring snapshot over applications and staff.

use chrono::{DateTime, Duration, Utc};

use crate::models::{
    Application, ApplicationStatus, Priority, StaffMember, StaffStatus, WorkflowType,
};

/// Open applications untouched for longer than this are reported as stale
pub const STALE_AFTER_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct MonitoringSnapshot {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    /// Count per status, in [`ApplicationStatus::ALL`] order
    pub by_status: Vec<(ApplicationStatus, usize)>,
    /// Count per workflow, in [`WorkflowType::ALL`] order
    pub by_workflow: Vec<(WorkflowType, usize)>,
    pub urgent_open: usize,
    /// Ids of open applications not updated within [`STALE_AFTER_HOURS`]
    pub stale_open: Vec<String>,
    pub created_today: usize,
    pub staff_online: usize,
    pub staff_busy: usize,
    pub staff_offline: usize,
}

impl MonitoringSnapshot {
    pub fn collect(apps: &[Application], staff: &[StaffMember], now: DateTime<Utc>) -> Self {
        let by_status = ApplicationStatus::ALL
            .into_iter()
            .map(|status| (status, apps.iter().filter(|a| a.status == status).count()))
            .collect();
        let by_workflow = WorkflowType::ALL
            .into_iter()
            .map(|wf| (wf, apps.iter().filter(|a| a.workflow_type == wf).count()))
            .collect();

        let stale_cutoff = now - Duration::hours(STALE_AFTER_HOURS);
        let stale_open = apps
            .iter()
            .filter(|a| a.status.is_open() && a.updated_at < stale_cutoff)
            .map(|a| a.id.clone())
            .collect();

        let today = now.date_naive();
        let staff_count = |status: StaffStatus| staff.iter().filter(|m| m.status == status).count();

        Self {
            generated_at: now,
            total: apps.len(),
            by_status,
            by_workflow,
            urgent_open: apps
                .iter()
                .filter(|a| a.priority == Priority::Urgent && a.status.is_open())
                .count(),
            stale_open,
            created_today: apps
                .iter()
                .filter(|a| a.created_at.date_naive() == today)
                .count(),
            staff_online: staff_count(StaffStatus::Online),
            staff_busy: staff_count(StaffStatus::Busy),
            staff_offline: staff_count(StaffStatus::Offline),
        }
    }

    pub fn count(&self, status: ApplicationStatus) -> usize {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn open(&self) -> usize {
        self.by_status
            .iter()
            .filter(|(s, _)| s.is_open())
            .map(|(_, n)| n)
            .sum()
    }
}
