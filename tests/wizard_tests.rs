//! # Order Wizard Tests
//!
//! Walks both order wizards through the store the bot uses and checks
//! rejection, cancellation and pricing at the confirmation step.

use telecom_manager_bot::client_search::SearchMethod;
use telecom_manager_bot::errors::AppError;
use telecom_manager_bot::models::{ApplicationStatus, WorkflowType};
use telecom_manager_bot::pricing::CostBreakdown;
use telecom_manager_bot::repository::{ApplicationRepository, ClientRepository, InMemoryStore};
use telecom_manager_bot::wizard::{
    CompletedOrder, OrderKind, OrderWizard, WizardInput, WizardOutcome, WizardStep,
};

/// Feed inputs that must all be accepted and return the resulting wizard
fn drive(store: &InMemoryStore, kind: OrderKind, inputs: Vec<WizardInput>) -> OrderWizard {
    let mut wizard = OrderWizard::start(kind);
    for input in inputs {
        match wizard.advance(input.clone(), store) {
            Ok(WizardOutcome::Continue(next)) => wizard = next,
            other => panic!("input {:?} gave {:?}", input, other),
        }
    }
    wizard
}

fn complete(store: &InMemoryStore, wizard: &OrderWizard) -> CompletedOrder {
    match wizard.advance(WizardInput::Confirm, store) {
        Ok(WizardOutcome::Completed(order)) => order,
        other => panic!("confirm gave {:?}", other),
    }
}

fn choose(code: &str) -> WizardInput {
    WizardInput::Choose(code.to_string())
}

fn text(value: &str) -> WizardInput {
    WizardInput::Text(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_technical_order_happy_path() {
        let store = InMemoryStore::seeded();
        let wizard = drive(
            &store,
            OrderKind::TechnicalService,
            vec![
                WizardInput::Method(SearchMethod::Phone),
                text("90 123-45"),
            ],
        );
        match &wizard.step {
            WizardStep::SelectingClient { candidates } => {
                assert_eq!(candidates.len(), 1);
                assert_eq!(candidates[0].full_name, "Aziz Karimov");
            }
            step => panic!("unexpected step {:?}", step),
        }

        let wizard = {
            let mut w = wizard;
            for input in [
                WizardInput::PickClient(1),
                choose("toshkent"),
                choose("internet"),
                choose("slow_speed"),
                text("  Chilonzor 5-kvartal, 12-uy "),
                WizardInput::Media("photo-file-id".to_string()),
                WizardInput::Location {
                    latitude: 41.2995,
                    longitude: 69.2401,
                },
            ] {
                w = match w.advance(input, &store).unwrap() {
                    WizardOutcome::Continue(next) => next,
                    other => panic!("unexpected outcome {:?}", other),
                };
            }
            w
        };

        match &wizard.step {
            WizardStep::Confirming { cost, draft } => {
                assert_eq!(*cost, CostBreakdown::new(50_000, 150_000, 50_000));
                assert_eq!(cost.total(), 250_000);
                assert_eq!(draft.address.as_deref(), Some("Chilonzor 5-kvartal, 12-uy"));
            }
            step => panic!("unexpected step {:?}", step),
        }
        assert_eq!(wizard.step.number(), 6);

        let order = complete(&store, &wizard);
        let created = store.create(order.to_new_application("manager:7")).unwrap();

        assert_eq!(created.workflow_type, WorkflowType::TechnicalService);
        assert_eq!(created.status, ApplicationStatus::Created);
        assert_eq!(created.client_name, "Aziz Karimov");
        assert_eq!(created.region, "toshkent");
        assert_eq!(created.estimated_cost, Some(250_000));
        assert_eq!(created.media_file_id.as_deref(), Some("photo-file-id"));
        assert_eq!(created.location, Some((41.2995, 69.2401)));
    }

    #[test]
    fn test_connection_order_for_new_client() {
        let store = InMemoryStore::seeded();
        let wizard = drive(
            &store,
            OrderKind::Connection,
            vec![
                WizardInput::Method(SearchMethod::New),
                text("Shahlo Umarova"),
                text("+998 93 555 11 22"),
                choose("xorazm"),
                choose("b2c"),
                choose("home_100"),
                text("Urganch, Al-Xorazmiy ko'chasi 4"),
                WizardInput::Skip,
                WizardInput::Skip,
            ],
        );

        // New client is registered as soon as the phone is accepted
        assert!(store
            .all_clients()
            .iter()
            .any(|c| c.phone == "+998935551122"));

        let order = complete(&store, &wizard);
        assert_eq!(order.cost.total(), 300_000);
        assert_eq!(order.draft.media_file_id, None);
        assert_eq!(order.draft.location, None);

        let app = order.to_new_application("manager:7");
        assert_eq!(app.workflow_type, WorkflowType::ConnectionRequest);
        assert_eq!(app.client_phone, "+998935551122");
    }

    #[test]
    fn test_rejected_input_keeps_step() {
        let store = InMemoryStore::seeded();
        let wizard = drive(
            &store,
            OrderKind::TechnicalService,
            vec![
                WizardInput::Method(SearchMethod::Id),
                text("1"),
                WizardInput::PickClient(1),
                choose("toshkent"),
            ],
        );
        assert!(matches!(wizard.step, WizardStep::SelectingServiceType { .. }));

        // Tariffs belong to the connection wizard
        let err = wizard.advance(choose("home_100"), &store).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Free text is not a choice
        let err = wizard.advance(text("internet"), &store).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert!(matches!(wizard.step, WizardStep::SelectingServiceType { .. }));
    }

    #[test]
    fn test_short_address_and_bad_phone_are_rejected() {
        let store = InMemoryStore::seeded();
        let wizard = drive(
            &store,
            OrderKind::Connection,
            vec![WizardInput::Method(SearchMethod::New), text("Ali Valiyev")],
        );
        let err = wizard.advance(text("12345"), &store).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let wizard = drive(
            &store,
            OrderKind::Connection,
            vec![
                WizardInput::Method(SearchMethod::Name),
                text("karimov"),
                WizardInput::PickClient(6),
                choose("andijon"),
                choose("b2b"),
                choose("business_300"),
            ],
        );
        let err = wizard.advance(text("uy"), &store).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_existing_phone_cannot_be_registered_again() {
        let store = InMemoryStore::seeded();
        let wizard = drive(
            &store,
            OrderKind::Connection,
            vec![WizardInput::Method(SearchMethod::New), text("Aziz Karimov")],
        );
        let err = wizard.advance(text("+998901234567"), &store).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_search_without_matches_is_not_found() {
        let store = InMemoryStore::seeded();
        let wizard = drive(
            &store,
            OrderKind::TechnicalService,
            vec![WizardInput::Method(SearchMethod::Name)],
        );
        let err = wizard.advance(text("Nobody Here"), &store).unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[test]
    fn test_cancel_from_any_step() {
        let store = InMemoryStore::seeded();
        let start = OrderWizard::start(OrderKind::Connection);
        assert_eq!(
            start.advance(WizardInput::Cancel, &store).unwrap(),
            WizardOutcome::Cancelled
        );

        let mid = drive(
            &store,
            OrderKind::Connection,
            vec![
                WizardInput::Method(SearchMethod::Id),
                text("3"),
                WizardInput::PickClient(3),
            ],
        );
        assert_eq!(
            mid.advance(WizardInput::Cancel, &store).unwrap(),
            WizardOutcome::Cancelled
        );
        assert_eq!(store.list_all().len(), 10);
    }

    #[test]
    fn test_problem_cost_does_not_depend_on_service() {
        let store = InMemoryStore::seeded();
        let wizard = drive(
            &store,
            OrderKind::TechnicalService,
            vec![
                WizardInput::Method(SearchMethod::Id),
                text("2"),
                WizardInput::PickClient(2),
                choose("toshkent"),
                choose("tv"),
                choose("equipment_failure"),
                text("Yunusobod 11-kvartal"),
                WizardInput::Skip,
                WizardInput::Skip,
            ],
        );
        let order = complete(&store, &wizard);
        // equipment_failure is priced the same whatever the service
        assert_eq!(order.cost.total(), 350_000);
    }
}
