//! # Status Workflow Tests
//!
//! Transition table checks and status changes applied through the store.

use telecom_manager_bot::errors::AppError;
use telecom_manager_bot::models::ApplicationStatus::{self, *};
use telecom_manager_bot::repository::{ApplicationRepository, InMemoryStore, StaffRepository};
use telecom_manager_bot::status_workflow::{allowed_next, can_transition, check_transition, is_terminal};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        assert!(can_transition(Created, Assigned));
        assert!(can_transition(Assigned, InProgress));
        assert!(can_transition(InProgress, Completed));
        assert!(can_transition(Pending, InProgress));
        assert!(can_transition(Transferred, Assigned));
        assert!(can_transition(Cancelled, Created));

        assert!(!can_transition(Created, Completed));
        assert!(!can_transition(Created, Pending));
        assert!(!can_transition(Transferred, Completed));
        assert!(!can_transition(Cancelled, InProgress));
        assert!(!can_transition(Completed, Created));
    }

    #[test]
    fn test_transition_table_is_exact() {
        let permitted: [(ApplicationStatus, &[ApplicationStatus]); 7] = [
            (Created, &[Assigned, InProgress, Cancelled, Transferred]),
            (Assigned, &[InProgress, Pending, Cancelled, Transferred]),
            (InProgress, &[Pending, Completed, Cancelled, Transferred]),
            (Pending, &[InProgress, Completed, Cancelled]),
            (Transferred, &[Assigned, InProgress, Cancelled]),
            (Cancelled, &[Created]),
            (Completed, &[]),
        ];

        for (from, targets) in permitted {
            for to in ApplicationStatus::ALL {
                assert_eq!(
                    can_transition(from, to),
                    targets.contains(&to),
                    "{:?} -> {:?}",
                    from,
                    to
                );
                assert_eq!(check_transition(from, to).is_ok(), targets.contains(&to));
            }
            assert_eq!(allowed_next(from).len(), targets.len(), "{:?}", from);
        }
    }

    #[test]
    fn test_every_status_has_no_self_loop() {
        for status in ApplicationStatus::ALL {
            assert!(!can_transition(status, status), "{:?}", status);
        }
    }

    #[test]
    fn test_completed_is_the_only_terminal_status() {
        let terminal: Vec<ApplicationStatus> = ApplicationStatus::ALL
            .into_iter()
            .filter(|s| is_terminal(*s))
            .collect();
        assert_eq!(terminal, vec![Completed]);
        assert!(allowed_next(Completed).is_empty());
    }

    #[test]
    fn test_check_transition_error_names_both_ends() {
        let err = check_transition(Completed, InProgress).unwrap_err();
        assert_eq!(
            err,
            AppError::InvalidTransition {
                from: Completed,
                to: InProgress
            }
        );
        assert_eq!(err.user_message_key(), "error-invalid-transition");
    }

    #[test]
    fn test_store_applies_allowed_change_with_comment() {
        let store = InMemoryStore::seeded();
        let updated = store
            .update_status(
                "CONN-2024-001",
                Assigned,
                "manager:1",
                Some("Operator called the client".to_string()),
            )
            .unwrap();

        assert_eq!(updated.status, Assigned);
        assert_eq!(updated.updated_by.as_deref(), Some("manager:1"));
        assert_eq!(updated.comments.as_deref(), Some("Operator called the client"));
        assert_eq!(store.get_by_id("CONN-2024-001").unwrap().status, Assigned);
    }

    #[test]
    fn test_store_rejects_disallowed_change_and_keeps_record() {
        let store = InMemoryStore::seeded();
        let before = store.get_by_id("TECH-2024-003").unwrap();

        let err = store
            .update_status("TECH-2024-003", InProgress, "manager:1", None)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
        assert_eq!(store.get_by_id("TECH-2024-003").unwrap(), before);
    }

    #[test]
    fn test_unknown_application_is_not_found() {
        let store = InMemoryStore::seeded();
        let err = store
            .update_status("NOPE-1", Assigned, "manager:1", None)
            .unwrap_err();
        assert_eq!(err.user_message_key(), "error-not-found");
    }

    #[test]
    fn test_completion_updates_assignee_counters() {
        let store = InMemoryStore::seeded();
        // TECH-2024-001 is in progress with technician 3
        let before = store.get_staff(3).unwrap();

        store
            .update_status("TECH-2024-001", Completed, "manager:1", None)
            .unwrap();

        let after = store.get_staff(3).unwrap();
        assert_eq!(after.active_applications, before.active_applications - 1);
        assert_eq!(after.completed_today, before.completed_today + 1);
        assert_eq!(after.completed_total, before.completed_total + 1);
    }
}
