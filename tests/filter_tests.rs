//! # Filter, Search and Paging Tests

use chrono::{Duration, TimeZone, Utc};
use telecom_manager_bot::dialogue::ListView;
use telecom_manager_bot::filters::{inbox, ApplicationFilter, DatePreset};
use telecom_manager_bot::mock_data::seed_applications;
use telecom_manager_bot::models::{ApplicationStatus, Priority, WorkflowType};
use telecom_manager_bot::pagination::{clamp_index, PageMove, Pager};

fn ids<'a>(apps: impl IntoIterator<Item = &'a telecom_manager_bot::models::Application>) -> Vec<String> {
    apps.into_iter().map(|a| a.id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_combine_with_and() {
        let apps = seed_applications(Utc::now());

        let filter = ApplicationFilter {
            workflow_type: Some(WorkflowType::TechnicalService),
            priority: Some(Priority::High),
            ..Default::default()
        };
        assert_eq!(ids(filter.apply(&apps)), vec!["TECH-2024-001", "TECH-2024-003"]);

        let filter = ApplicationFilter {
            status: Some(ApplicationStatus::Created),
            priority: Some(Priority::Urgent),
            ..Default::default()
        };
        assert_eq!(ids(filter.apply(&apps)), vec!["TECH-2024-002"]);

        let urgent = ApplicationFilter::by_priority(Priority::Urgent);
        assert_eq!(ids(urgent.apply(&apps)), vec!["TECH-2024-002", "CALL-2024-002"]);
    }

    #[test]
    fn test_text_search_is_case_insensitive_over_several_fields() {
        let apps = seed_applications(Utc::now());

        assert_eq!(
            ids(ApplicationFilter::by_text("SAMARQAND").apply(&apps)),
            vec!["CALL-2024-001", "CONN-2024-004"]
        );
        assert_eq!(
            ids(ApplicationFilter::by_text("conn-2024-003").apply(&apps)),
            vec!["CONN-2024-003"]
        );
        assert_eq!(
            ids(ApplicationFilter::by_text("998944567890").apply(&apps)),
            vec!["CONN-2024-002"]
        );
        assert!(ApplicationFilter::by_text("no such thing").apply(&apps).is_empty());
    }

    #[test]
    fn test_date_range_bounds_are_inclusive() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let apps = seed_applications(now);

        let filter = ApplicationFilter {
            created_from: Some(now - Duration::hours(2)),
            created_to: Some(now - Duration::hours(1)),
            ..Default::default()
        };
        assert_eq!(
            ids(filter.apply(&apps)),
            vec!["CONN-2024-001", "TECH-2024-002", "CALL-2024-002"]
        );
    }

    #[test]
    fn test_date_presets() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let apps = seed_applications(now);

        let (from, to) = DatePreset::Today.range(now);
        assert_eq!(from, Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap());
        assert_eq!(to, now);

        let week = ApplicationFilter {
            created_from: Some(DatePreset::Week.range(now).0),
            created_to: Some(now),
            ..Default::default()
        };
        // Everything but the 8, 10 and 20 day old records
        assert_eq!(week.apply(&apps).len(), 7);

        assert_eq!(DatePreset::from_code("month"), Some(DatePreset::Month));
        assert_eq!(DatePreset::from_code("year"), None);
    }

    #[test]
    fn test_inbox_holds_new_and_transferred() {
        let apps = seed_applications(Utc::now());
        let inbox = inbox(&apps);
        assert!(inbox.iter().all(|a| matches!(
            a.status,
            ApplicationStatus::Created | ApplicationStatus::Transferred
        )));
        assert_eq!(inbox.len(), 4);
        assert_eq!(ListView::Inbox.select(&apps).len(), 4);
    }

    #[test]
    fn test_pager_walks_and_stops_at_both_ends() {
        let mut pager = Pager::new(0, 3);
        assert_eq!(pager.prev(), PageMove::AtStart);
        assert_eq!(pager.next(), PageMove::Moved(1));
        assert_eq!(pager.next(), PageMove::Moved(2));
        assert_eq!(pager.next(), PageMove::AtEnd);
        assert_eq!(pager.index(), 2);
        assert_eq!(pager.prev(), PageMove::Moved(1));
    }

    #[test]
    fn test_pager_on_empty_and_shrunk_lists() {
        let mut empty = Pager::new(5, 0);
        assert!(empty.is_empty());
        assert_eq!(empty.next(), PageMove::Empty);
        assert_eq!(empty.prev(), PageMove::Empty);

        // Stored index from a longer list
        let pager = Pager::new(9, 4);
        assert_eq!(pager.index(), 3);
        assert!(pager.is_last());
        assert_eq!(clamp_index(9, 0), 0);
    }
}
