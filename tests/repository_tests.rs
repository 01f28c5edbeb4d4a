//! # Repository Tests
//!
//! Assignment, order creation and client registration in the in-memory store.

use telecom_manager_bot::errors::AppError;
use telecom_manager_bot::models::{ApplicationStatus, Priority, StaffRole, WorkflowType};
use telecom_manager_bot::repository::{
    ApplicationRepository, ClientRepository, InMemoryStore, NewApplication, StaffRepository,
};

fn new_order(workflow_type: WorkflowType) -> NewApplication {
    NewApplication {
        client_name: "Aziz Karimov".to_string(),
        client_phone: "+998901234567".to_string(),
        address: "Toshkent, Chilonzor 5-kvartal".to_string(),
        region: "toshkent".to_string(),
        description: "internet / slow_speed".to_string(),
        priority: Priority::Normal,
        workflow_type,
        estimated_cost: Some(250_000),
        media_file_id: None,
        location: Some((41.2995, 69.2401)),
        created_by: "manager:42".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_store_contents() {
        let store = InMemoryStore::seeded();
        assert_eq!(store.list_all().len(), 10);
        assert_eq!(store.all_clients().len(), 8);
        assert_eq!(store.all_staff().len(), 7);
        assert_eq!(store.created_orders(), 0);
    }

    #[test]
    fn test_junior_managers_only() {
        let store = InMemoryStore::seeded();
        let ids: Vec<u32> = store.junior_managers().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 5, 7]);
        assert!(store
            .staff_by_role(StaffRole::Technician)
            .iter()
            .all(|m| m.role == StaffRole::Technician));
    }

    #[test]
    fn test_assign_new_application_moves_it_to_assigned() {
        let store = InMemoryStore::seeded();
        let before = store.get_staff(5).unwrap();

        let app = store.assign("CONN-2024-001", 5, "manager:1").unwrap();

        assert_eq!(app.status, ApplicationStatus::Assigned);
        assert_eq!(app.assigned_to, Some(5));
        assert_eq!(
            store.get_staff(5).unwrap().active_applications,
            before.active_applications + 1
        );
    }

    #[test]
    fn test_reassign_moves_workload_between_staff() {
        let store = InMemoryStore::seeded();
        // CONN-2024-002 is assigned to junior manager 2
        let old_before = store.get_staff(2).unwrap().active_applications;
        let new_before = store.get_staff(7).unwrap().active_applications;

        let app = store.assign("CONN-2024-002", 7, "manager:1").unwrap();

        assert_eq!(app.status, ApplicationStatus::Assigned);
        assert_eq!(store.get_staff(2).unwrap().active_applications, old_before - 1);
        assert_eq!(store.get_staff(7).unwrap().active_applications, new_before + 1);
    }

    #[test]
    fn test_cancel_and_reopen_keep_workload_consistent() {
        let store = InMemoryStore::seeded();
        let base = store.get_staff(5).unwrap().active_applications;
        let active = |id: u32| store.get_staff(id).unwrap().active_applications;

        store.assign("CONN-2024-001", 5, "manager:1").unwrap();
        assert_eq!(active(5), base + 1);

        let cancelled = store
            .update_status("CONN-2024-001", ApplicationStatus::Cancelled, "manager:1", None)
            .unwrap();
        assert_eq!(cancelled.assigned_to, None);
        assert_eq!(active(5), base);

        let reopened = store
            .update_status("CONN-2024-001", ApplicationStatus::Created, "manager:1", None)
            .unwrap();
        assert_eq!(reopened.assigned_to, None);
        assert_eq!(active(5), base);

        store.assign("CONN-2024-001", 5, "manager:1").unwrap();
        assert_eq!(active(5), base + 1);

        // Moving it on releases exactly one unit from the previous assignee
        let other_base = active(7);
        store.assign("CONN-2024-001", 7, "manager:1").unwrap();
        assert_eq!(active(5), base);
        assert_eq!(active(7), other_base + 1);
    }

    #[test]
    fn test_assign_keeps_in_progress_status() {
        let store = InMemoryStore::seeded();
        let app = store.assign("TECH-2024-004", 2, "manager:1").unwrap();
        assert_eq!(app.status, ApplicationStatus::InProgress);
        assert_eq!(app.assigned_to, Some(2));
    }

    #[test]
    fn test_assign_rejects_non_junior_staff_and_closed_records() {
        let store = InMemoryStore::seeded();

        let err = store.assign("CONN-2024-001", 3, "manager:1").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = store.assign("TECH-2024-003", 2, "manager:1").unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));

        let err = store.assign("CONN-2024-001", 99, "manager:1").unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));

        assert_eq!(store.get_by_id("CONN-2024-001").unwrap().assigned_to, None);
    }

    #[test]
    fn test_create_appends_with_next_sequence_id() {
        let store = InMemoryStore::seeded();

        let tech = store.create(new_order(WorkflowType::TechnicalService)).unwrap();
        let conn = store.create(new_order(WorkflowType::ConnectionRequest)).unwrap();

        assert!(tech.id.starts_with("TECH-"));
        assert!(tech.id.ends_with("-005"));
        assert!(conn.id.starts_with("CONN-"));
        assert!(conn.id.ends_with("-005"));
        assert_eq!(tech.status, ApplicationStatus::Created);
        assert_eq!(tech.assigned_to, None);
        assert_eq!(tech.estimated_cost, Some(250_000));
        assert_eq!(tech.updated_by.as_deref(), Some("manager:42"));

        let all = store.list_all();
        assert_eq!(all.len(), 12);
        assert_eq!(all.last().unwrap().id, conn.id);
        assert_eq!(store.created_orders(), 2);
    }

    #[test]
    fn test_add_client_rejects_duplicate_phone() {
        let store = InMemoryStore::seeded();

        let client = store
            .add_client("Shahlo Umarova", "+998935551122", "xorazm")
            .unwrap();
        assert_eq!(client.id, 9);
        assert_eq!(store.get_client(9).unwrap().full_name, "Shahlo Umarova");

        let err = store
            .add_client("Someone Else", "+998935551122", "")
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
