//! Staff activity overview.

use crate::models::{StaffMember, StaffRole, StaffStatus};

/// Aggregated view over a staff list
#[derive(Debug, Clone, PartialEq)]
pub struct StaffActivity {
    pub members: Vec<StaffMember>,
    pub online: usize,
    pub busy: usize,
    pub offline: usize,
    pub active_applications: u32,
    pub completed_today: u32,
    pub top_performer: Option<StaffMember>,
}

impl StaffActivity {
    /// Summarizes `staff`, optionally restricted to one role
    pub fn summarize(staff: &[StaffMember], role: Option<StaffRole>) -> Self {
        let members: Vec<StaffMember> = staff
            .iter()
            .filter(|member| role.is_none_or(|r| member.role == r))
            .cloned()
            .collect();

        let count = |status: StaffStatus| members.iter().filter(|m| m.status == status).count();

        let top_performer = members
            .iter()
            .filter(|m| m.completed_today > 0)
            .max_by(|a, b| {
                a.completed_today
                    .cmp(&b.completed_today)
                    .then(a.rating.total_cmp(&b.rating))
            })
            .cloned();

        Self {
            online: count(StaffStatus::Online),
            busy: count(StaffStatus::Busy),
            offline: count(StaffStatus::Offline),
            active_applications: members.iter().map(|m| m.active_applications).sum(),
            completed_today: members.iter().map(|m| m.completed_today).sum(),
            top_performer,
            members,
        }
    }
}
