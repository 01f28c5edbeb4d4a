//! Connection and technical-service order wizards.
//!
//! Button presses and typed messages both end up in [`advance_wizard`], so
//! the wizard behaves the same whichever way the input arrives.

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode};
use tracing::{info, warn};

use super::callback_types::OrderCallback;
use crate::bot::formatters::{format_order_created, format_wizard_step};
use crate::bot::keyboards::{location_request_keyboard, wizard_keyboard};
use crate::bot::menu::main_menu_keyboard;
use crate::bot::HandlerContext;
use crate::dialogue::{ManagerDialogue, ManagerState};
use crate::errors::{error_logging, AppError};
use crate::observability::{self, UserAction, WizardEvent};
use crate::repository::ApplicationRepository;
use crate::wizard::{OrderKind, OrderWizard, WizardInput, WizardOutcome, WizardStep};

impl From<OrderCallback> for WizardInput {
    fn from(callback: OrderCallback) -> Self {
        match callback {
            OrderCallback::Method(method) => WizardInput::Method(method),
            OrderCallback::Client(id) => WizardInput::PickClient(id),
            OrderCallback::Choose(code) => WizardInput::Choose(code),
            OrderCallback::Skip => WizardInput::Skip,
            OrderCallback::Confirm => WizardInput::Confirm,
            OrderCallback::Cancel => WizardInput::Cancel,
        }
    }
}

/// Send the prompt of the wizard's current step
pub async fn send_wizard_step(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    wizard: &OrderWizard,
) -> Result<()> {
    let lang = ctx.language();
    ctx.bot
        .send_message(chat_id, format_wizard_step(wizard, ctx.localization, &lang))
        .parse_mode(ParseMode::Html)
        .reply_markup(wizard_keyboard(wizard, ctx.localization, &lang))
        .await?;

    if matches!(wizard.step, WizardStep::AwaitingLocation { .. }) {
        ctx.bot
            .send_message(chat_id, ctx.t("order-location-hint"))
            .reply_markup(location_request_keyboard(ctx.localization, &lang))
            .await?;
    }
    Ok(())
}

/// Open a new order wizard from the main menu
pub async fn start_order(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    dialogue: &ManagerDialogue,
    kind: OrderKind,
) -> Result<()> {
    let action = match kind {
        OrderKind::Connection => UserAction::CreateConnectionOrder,
        OrderKind::TechnicalService => UserAction::CreateTechnicalOrder,
    };
    observability::record_user_engagement_metrics(ctx.user_id, action, ctx.language_code);
    observability::record_wizard_metrics(kind, WizardEvent::Started, 1);

    let wizard = OrderWizard::start(kind);
    dialogue.update(ManagerState::Ordering(wizard.clone())).await?;
    send_wizard_step(ctx, chat_id, &wizard).await
}

/// Feed one input into the wizard and act on the outcome.
///
/// Rejected input keeps the current step and repeats its prompt after the
/// error notice.
pub async fn advance_wizard(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    dialogue: &ManagerDialogue,
    wizard: &OrderWizard,
    input: WizardInput,
) -> Result<()> {
    let step_number = wizard.step.number();

    match wizard.advance(input, ctx.store.as_ref()) {
        Ok(WizardOutcome::Continue(next)) => {
            dialogue.update(ManagerState::Ordering(next.clone())).await?;
            send_wizard_step(ctx, chat_id, &next).await
        }
        Ok(WizardOutcome::Completed(order)) => {
            let created = ctx.store.create(order.to_new_application(&ctx.actor()))?;
            observability::record_wizard_metrics(wizard.kind, WizardEvent::Completed, step_number);
            info!(
                user_id = %ctx.user_id,
                application_id = %created.id,
                kind = %wizard.kind.code(),
                cost = order.cost.total(),
                "Order created"
            );

            dialogue.update(ManagerState::Idle).await?;
            let lang = ctx.language();
            ctx.bot
                .send_message(chat_id, format_order_created(&created, ctx.localization, &lang))
                .parse_mode(ParseMode::Html)
                .reply_markup(main_menu_keyboard(ctx.localization, &lang))
                .await?;
            Ok(())
        }
        Ok(WizardOutcome::Cancelled) => {
            observability::record_wizard_metrics(wizard.kind, WizardEvent::Cancelled, step_number);
            dialogue.update(ManagerState::Idle).await?;
            let lang = ctx.language();
            ctx.bot
                .send_message(chat_id, ctx.t("order-cancelled"))
                .reply_markup(main_menu_keyboard(ctx.localization, &lang))
                .await?;
            Ok(())
        }
        Err(e @ (AppError::Validation(_) | AppError::NotFound { .. })) => {
            observability::record_wizard_metrics(
                wizard.kind,
                WizardEvent::StepRejected,
                step_number,
            );
            error_logging::log_validation_error(
                &e,
                wizard.step.name(),
                Some(ctx.user_id),
                "wizard_input",
                None,
            );
            ctx.bot
                .send_message(chat_id, format!("⚠️ {}", ctx.t(e.user_message_key())))
                .await?;
            send_wizard_step(ctx, chat_id, wizard).await
        }
        Err(e) => {
            warn!(user_id = %ctx.user_id, error = %e, "Order wizard aborted");
            dialogue.update(ManagerState::Idle).await?;
            Err(e.into())
        }
    }
}

/// Inline button pressed while a wizard is open
pub async fn handle_order_callback(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    dialogue: &ManagerDialogue,
    state: &ManagerState,
    callback: OrderCallback,
) -> Result<Option<String>> {
    let ManagerState::Ordering(wizard) = state else {
        // Buttons of a wizard that is no longer open
        return Ok(Some(ctx.t("order-expired")));
    };

    advance_wizard(ctx, chat_id, dialogue, wizard, callback.into()).await?;
    Ok(None)
}
