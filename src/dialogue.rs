//! Per-chat conversation state of the manager bot.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::filters::{inbox, ApplicationFilter};
use crate::models::{Application, ApplicationStatus};
use crate::wizard::OrderWizard;

/// Which list of applications is being paged through
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ListView {
    #[default]
    All,
    Inbox,
    Filtered(ApplicationFilter),
}

impl ListView {
    /// Records of this view, in store order
    pub fn select(&self, apps: &[Application]) -> Vec<Application> {
        match self {
            ListView::All => apps.to_vec(),
            ListView::Inbox => inbox(apps).into_iter().cloned().collect(),
            ListView::Filtered(filter) => filter.apply(apps).into_iter().cloned().collect(),
        }
    }

    /// Where `app_id` sits in this view, falling back to the full list when
    /// the record is not (or no longer) part of it
    pub fn locate(self, apps: &[Application], app_id: &str) -> (ListView, usize) {
        if let Some(index) = self.select(apps).iter().position(|a| a.id == app_id) {
            return (self, index);
        }
        let index = apps.iter().position(|a| a.id == app_id).unwrap_or(0);
        (ListView::All, index)
    }

    pub fn title_key(&self) -> &'static str {
        match self {
            ListView::All => "list-title-all",
            ListView::Inbox => "list-title-inbox",
            ListView::Filtered(_) => "list-title-filtered",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ManagerState {
    #[default]
    Idle,
    Browsing {
        view: ListView,
        index: usize,
    },
    /// Building a filter from the filter menu before applying it
    EditingFilter {
        filter: ApplicationFilter,
    },
    AwaitingSearchQuery,
    /// Status picked; an optional comment is expected before it is applied
    AwaitingComment {
        app_id: String,
        target: ApplicationStatus,
        view: ListView,
        index: usize,
    },
    Ordering(OrderWizard),
}

impl ManagerState {
    /// View to export or return to from the current state
    pub fn current_view(&self) -> ListView {
        match self {
            ManagerState::Browsing { view, .. } | ManagerState::AwaitingComment { view, .. } => {
                view.clone()
            }
            ManagerState::EditingFilter { filter } => ListView::Filtered(filter.clone()),
            _ => ListView::All,
        }
    }
}

pub type ManagerDialogue = Dialogue<ManagerState, InMemStorage<ManagerState>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_data::seed_applications;
    use chrono::Utc;

    #[test]
    fn test_list_views_keep_store_order() {
        let apps = seed_applications(Utc::now());

        let all = ListView::All.select(&apps);
        assert_eq!(all.len(), apps.len());

        let inbox = ListView::Inbox.select(&apps);
        let ids: Vec<&str> = inbox.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["CONN-2024-001", "TECH-2024-002", "CALL-2024-002", "CONN-2024-004"]
        );

        let filtered =
            ListView::Filtered(ApplicationFilter::by_status(ApplicationStatus::Completed))
                .select(&apps);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_locate_finds_record_or_falls_back_to_all() {
        let apps = seed_applications(Utc::now());

        assert_eq!(
            ListView::Inbox.locate(&apps, "CALL-2024-002"),
            (ListView::Inbox, 2)
        );

        // Assigned records leave the inbox; the full list still shows them
        let expected = apps.iter().position(|a| a.id == "CONN-2024-002").unwrap();
        assert_eq!(
            ListView::Inbox.locate(&apps, "CONN-2024-002"),
            (ListView::All, expected)
        );
        assert_eq!(
            ListView::All.locate(&apps, "CONN-2024-002"),
            (ListView::All, expected)
        );
        assert_ne!(expected, 0);
    }

    #[test]
    fn test_current_view() {
        assert_eq!(ManagerState::Idle.current_view(), ListView::All);
        let state = ManagerState::Browsing {
            view: ListView::Inbox,
            index: 2,
        };
        assert_eq!(state.current_view(), ListView::Inbox);
    }
}
