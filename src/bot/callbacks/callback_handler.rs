//! Callback Handler module for processing inline keyboard callback queries

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ChatId, MaybeInaccessibleMessage, MessageId};
use tracing::{debug, warn, Instrument};

use super::callback_types::CallbackAction;
use super::filter_callbacks::FilterEdit;
use super::{
    application_callbacks, export_callbacks, filter_callbacks, monitoring_callbacks,
    order_callbacks, staff_callbacks,
};
use crate::bot::HandlerContext;
use crate::deduplication::{RequestKey, SharedDeduplicator};
use crate::dialogue::{ManagerDialogue, ManagerState};
use crate::errors::{error_logging, AppError};
use crate::localization::LocalizationManager;
use crate::observability;
use crate::repository::InMemoryStore;

/// Chat and message the pressed keyboard belongs to
fn message_location(q: &CallbackQuery) -> Option<(ChatId, MessageId)> {
    match q.message.as_ref()? {
        MaybeInaccessibleMessage::Regular(msg) => Some((msg.chat.id, msg.id)),
        MaybeInaccessibleMessage::Inaccessible(msg) => Some((msg.chat.id, msg.message_id)),
    }
}

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    store: Arc<InMemoryStore>,
    dialogue: ManagerDialogue,
    localization: Arc<LocalizationManager>,
    dedup: SharedDeduplicator,
) -> Result<()> {
    let span = observability::telegram_span("callback_handler", Some(q.from.id.0 as i64));
    handle_callback(bot, q, store, dialogue, localization, dedup)
        .instrument(span)
        .await
}

async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    store: Arc<InMemoryStore>,
    dialogue: ManagerDialogue,
    localization: Arc<LocalizationManager>,
    dedup: SharedDeduplicator,
) -> Result<()> {
    if dedup.is_duplicate(&RequestKey::callback(q.id.0.clone()))? {
        debug!(user_id = %q.from.id, callback_id = %q.id.0, "Skipping duplicate callback");
        observability::record_telegram_duplicate_message();
        return Ok(());
    }
    observability::record_telegram_message("callback");

    let ctx = HandlerContext {
        bot: &bot,
        store: &store,
        localization: &localization,
        language_code: q.from.language_code.as_deref(),
        user_id: q.from.id.0 as i64,
    };

    let data = q.data.as_deref().unwrap_or("");
    let state = dialogue.get().await?.unwrap_or_default();
    debug!(user_id = %q.from.id, data = %data, state = ?state, "Received callback");

    let outcome = match (CallbackAction::parse(data), message_location(&q)) {
        (Some(action), Some((chat_id, message_id))) => {
            route(&ctx, action, chat_id, message_id, &dialogue, &state).await
        }
        (None, _) => {
            warn!(user_id = %q.from.id, data = %data, "Unknown callback payload");
            Ok(Some(ctx.t("callback-unknown")))
        }
        (Some(_), None) => Ok(Some(ctx.t("callback-expired"))),
    };

    let notice = match outcome {
        Ok(notice) => notice,
        Err(e) => {
            error_logging::log_handler_error(&e, "callback_handler", Some(ctx.user_id), Some(data));
            let app_error = e.downcast_ref::<AppError>();
            observability::record_error_metrics(
                app_error.map_or("internal", AppError::kind),
                "callback_handler",
            );
            Some(ctx.t(app_error.map_or("error-generic", AppError::user_message_key)))
        }
    };

    // Telegram shows a spinner on the button until the query is answered
    let answer = bot.answer_callback_query(q.id.clone());
    match notice {
        Some(text) => answer.text(text).await?,
        None => answer.await?,
    };

    Ok(())
}

async fn route(
    ctx: &HandlerContext<'_>,
    action: CallbackAction,
    chat_id: ChatId,
    message_id: MessageId,
    dialogue: &ManagerDialogue,
    state: &ManagerState,
) -> Result<Option<String>> {
    match action {
        CallbackAction::Noop => Ok(None),
        CallbackAction::PrevApplication => {
            application_callbacks::handle_paging(ctx, chat_id, message_id, dialogue, state, false)
                .await
        }
        CallbackAction::NextApplication => {
            application_callbacks::handle_paging(ctx, chat_id, message_id, dialogue, state, true)
                .await
        }
        CallbackAction::BackToApplication => {
            application_callbacks::handle_back_to_application(
                ctx, chat_id, message_id, dialogue, state,
            )
            .await
        }
        CallbackAction::ShowStatusMenu(app_id) => {
            application_callbacks::handle_show_status_menu(ctx, chat_id, message_id, &app_id).await
        }
        CallbackAction::SelectStatus { app_id, status } => {
            application_callbacks::handle_select_status(
                ctx, chat_id, dialogue, state, &app_id, status,
            )
            .await
        }
        CallbackAction::SkipComment => {
            if !matches!(state, ManagerState::AwaitingComment { .. }) {
                return Ok(Some(ctx.t("callback-expired")));
            }
            application_callbacks::apply_status_change(ctx, chat_id, dialogue, state, None)
                .await?;
            Ok(None)
        }
        CallbackAction::ShowAssignMenu(app_id) => {
            application_callbacks::handle_show_assign_menu(ctx, chat_id, message_id, &app_id).await
        }
        CallbackAction::AssignTo { app_id, staff_id } => {
            application_callbacks::handle_assign(
                ctx, chat_id, message_id, dialogue, state, &app_id, staff_id,
            )
            .await
        }
        CallbackAction::FilterStatus(status) => {
            filter_callbacks::handle_filter_edit(
                ctx,
                chat_id,
                message_id,
                dialogue,
                state,
                FilterEdit::Status(status),
            )
            .await
        }
        CallbackAction::FilterPriority(priority) => {
            filter_callbacks::handle_filter_edit(
                ctx,
                chat_id,
                message_id,
                dialogue,
                state,
                FilterEdit::Priority(priority),
            )
            .await
        }
        CallbackAction::FilterWorkflow(workflow) => {
            filter_callbacks::handle_filter_edit(
                ctx,
                chat_id,
                message_id,
                dialogue,
                state,
                FilterEdit::Workflow(workflow),
            )
            .await
        }
        CallbackAction::FilterDate(preset) => {
            filter_callbacks::handle_filter_edit(
                ctx,
                chat_id,
                message_id,
                dialogue,
                state,
                FilterEdit::Date(preset),
            )
            .await
        }
        CallbackAction::FilterClear => {
            filter_callbacks::handle_filter_edit(
                ctx,
                chat_id,
                message_id,
                dialogue,
                state,
                FilterEdit::Clear,
            )
            .await
        }
        CallbackAction::FilterApply => {
            filter_callbacks::handle_filter_apply(ctx, chat_id, message_id, dialogue, state).await
        }
        CallbackAction::Export(format) => {
            export_callbacks::handle_export(ctx, chat_id, state, format).await
        }
        CallbackAction::StaffRole(role) => {
            staff_callbacks::handle_staff_role(ctx, chat_id, message_id, role).await
        }
        CallbackAction::MonitorRefresh => {
            monitoring_callbacks::handle_monitor_refresh(ctx, chat_id, message_id).await
        }
        CallbackAction::Order(callback) => {
            order_callbacks::handle_order_callback(ctx, chat_id, dialogue, state, callback).await
        }
    }
}
