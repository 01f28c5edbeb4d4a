//! Message Handler module for text, media and location messages

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{debug, Instrument};

use super::callbacks::{
    application_callbacks, filter_callbacks, monitoring_callbacks, order_callbacks,
    staff_callbacks,
};
use super::command_handlers::{self, BotCommand};
use super::keyboards::export_keyboard;
use super::menu::{main_menu_keyboard, MenuAction};
use super::HandlerContext;
use crate::deduplication::{RequestKey, SharedDeduplicator};
use crate::dialogue::{ListView, ManagerDialogue, ManagerState};
use crate::errors::{error_logging, AppError};
use crate::filters::ApplicationFilter;
use crate::localization::LocalizationManager;
use crate::observability::{self, UserAction, WizardEvent};
use crate::repository::InMemoryStore;
use crate::wizard::{OrderKind, WizardInput};

/// What a message carries, as far as the bot is concerned
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingContent {
    Text(String),
    /// File id of a photo, video or document
    Media(String),
    Location { latitude: f64, longitude: f64 },
    Unsupported,
}

impl IncomingContent {
    pub fn of(msg: &Message) -> Self {
        if let Some(text) = msg.text() {
            IncomingContent::Text(text.to_string())
        } else if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
            IncomingContent::Media(photo.file.id.0.clone())
        } else if let Some(video) = msg.video() {
            IncomingContent::Media(video.file.id.0.clone())
        } else if let Some(document) = msg.document() {
            IncomingContent::Media(document.file.id.0.clone())
        } else if let Some(location) = msg.location() {
            IncomingContent::Location {
                latitude: location.latitude,
                longitude: location.longitude,
            }
        } else {
            IncomingContent::Unsupported
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            IncomingContent::Text(_) => "text",
            IncomingContent::Media(_) => "media",
            IncomingContent::Location { .. } => "location",
            IncomingContent::Unsupported => "unsupported",
        }
    }
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    store: Arc<InMemoryStore>,
    dialogue: ManagerDialogue,
    localization: Arc<LocalizationManager>,
    dedup: SharedDeduplicator,
) -> Result<()> {
    let span = observability::telegram_span(
        "message_handler",
        msg.from.as_ref().map(|u| u.id.0 as i64),
    );
    handle_message(bot, msg, store, dialogue, localization, dedup)
        .instrument(span)
        .await
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    store: Arc<InMemoryStore>,
    dialogue: ManagerDialogue,
    localization: Arc<LocalizationManager>,
    dedup: SharedDeduplicator,
) -> Result<()> {
    if dedup.is_duplicate(&RequestKey::message(msg.chat.id, msg.id))? {
        debug!(chat_id = %msg.chat.id, message_id = msg.id.0, "Skipping duplicate message");
        observability::record_telegram_duplicate_message();
        return Ok(());
    }

    let content = IncomingContent::of(&msg);
    observability::record_telegram_message(content.kind());

    let user = msg.from.as_ref();
    let ctx = HandlerContext {
        bot: &bot,
        store: &store,
        localization: &localization,
        language_code: user.and_then(|u| u.language_code.as_deref()),
        user_id: user.map_or(msg.chat.id.0, |u| u.id.0 as i64),
    };

    if let Err(e) = dispatch(&ctx, msg.chat.id, &dialogue, content).await {
        error_logging::log_handler_error(&e, "message_handler", Some(ctx.user_id), msg.text());
        let app_error = e.downcast_ref::<AppError>();
        observability::record_error_metrics(
            app_error.map_or("internal", AppError::kind),
            "message_handler",
        );
        let key = app_error.map_or("error-generic", AppError::user_message_key);
        bot.send_message(msg.chat.id, format!("❌ {}", ctx.t(key)))
            .await?;
    }

    Ok(())
}

async fn dispatch(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    dialogue: &ManagerDialogue,
    content: IncomingContent,
) -> Result<()> {
    let state = dialogue.get().await?.unwrap_or_default();
    debug!(user_id = %ctx.user_id, content = %content.kind(), state = ?state, "Received message");

    if let IncomingContent::Text(text) = &content {
        if let Some(command) = BotCommand::parse(text) {
            return command_handlers::handle_command(ctx, chat_id, dialogue, command).await;
        }
        if let Some(action) = MenuAction::parse(text, ctx.localization) {
            if let ManagerState::Ordering(wizard) = &state {
                // Leaving the wizard through the main menu
                observability::record_wizard_metrics(
                    wizard.kind,
                    WizardEvent::Cancelled,
                    wizard.step.number(),
                );
                dialogue.update(ManagerState::Idle).await?;
                return handle_menu_action(ctx, chat_id, dialogue, &ManagerState::Idle, action)
                    .await;
            }
            return handle_menu_action(ctx, chat_id, dialogue, &state, action).await;
        }
    }

    match (&state, content) {
        (ManagerState::AwaitingSearchQuery, IncomingContent::Text(query)) => {
            handle_search_query(ctx, chat_id, dialogue, &query).await
        }
        (ManagerState::AwaitingComment { .. }, IncomingContent::Text(comment)) => {
            application_callbacks::apply_status_change(ctx, chat_id, dialogue, &state, Some(comment))
                .await
        }
        (ManagerState::Ordering(wizard), IncomingContent::Text(text)) => {
            order_callbacks::advance_wizard(ctx, chat_id, dialogue, wizard, WizardInput::Text(text))
                .await
        }
        (ManagerState::Ordering(wizard), IncomingContent::Media(file_id)) => {
            order_callbacks::advance_wizard(ctx, chat_id, dialogue, wizard, WizardInput::Media(file_id))
                .await
        }
        (
            ManagerState::Ordering(wizard),
            IncomingContent::Location {
                latitude,
                longitude,
            },
        ) => {
            order_callbacks::advance_wizard(
                ctx,
                chat_id,
                dialogue,
                wizard,
                WizardInput::Location {
                    latitude,
                    longitude,
                },
            )
            .await
        }
        _ => handle_unsupported_message(ctx, chat_id).await,
    }
}

async fn handle_menu_action(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    dialogue: &ManagerDialogue,
    state: &ManagerState,
    action: MenuAction,
) -> Result<()> {
    debug!(user_id = %ctx.user_id, ?action, "Main menu action");
    match action {
        MenuAction::Applications => {
            observability::record_user_engagement_metrics(
                ctx.user_id,
                UserAction::BrowseApplications,
                ctx.language_code,
            );
            application_callbacks::send_application_page(ctx, chat_id, dialogue, ListView::All, 0)
                .await
        }
        MenuAction::Inbox => {
            observability::record_user_engagement_metrics(
                ctx.user_id,
                UserAction::OpenInbox,
                ctx.language_code,
            );
            application_callbacks::send_application_page(ctx, chat_id, dialogue, ListView::Inbox, 0)
                .await
        }
        MenuAction::Search => {
            dialogue.update(ManagerState::AwaitingSearchQuery).await?;
            ctx.bot
                .send_message(chat_id, ctx.t("search-prompt"))
                .parse_mode(ParseMode::Html)
                .await?;
            Ok(())
        }
        MenuAction::Filters => {
            filter_callbacks::send_filter_menu(ctx, chat_id, dialogue, state).await
        }
        MenuAction::ConnectionOrder => {
            order_callbacks::start_order(ctx, chat_id, dialogue, OrderKind::Connection).await
        }
        MenuAction::TechnicalOrder => {
            order_callbacks::start_order(ctx, chat_id, dialogue, OrderKind::TechnicalService).await
        }
        MenuAction::Staff => staff_callbacks::send_staff_activity(ctx, chat_id).await,
        MenuAction::Monitoring => monitoring_callbacks::send_monitoring(ctx, chat_id).await,
        MenuAction::Export => {
            // The list the user was looking at stays selected for the export
            let title = ctx.t(state.current_view().title_key());
            ctx.bot
                .send_message(
                    chat_id,
                    ctx.t_args("export-choose-format", &[("title", &title)]),
                )
                .parse_mode(ParseMode::Html)
                .reply_markup(export_keyboard())
                .await?;
            Ok(())
        }
        MenuAction::Help => command_handlers::handle_help_command(ctx, chat_id).await,
    }
}

async fn handle_search_query(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    dialogue: &ManagerDialogue,
    query: &str,
) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        ctx.bot
            .send_message(chat_id, ctx.t("search-empty-query"))
            .await?;
        return Ok(());
    }

    observability::record_user_engagement_metrics(
        ctx.user_id,
        UserAction::SearchApplications,
        ctx.language_code,
    );
    let view = ListView::Filtered(ApplicationFilter::by_text(query));
    application_callbacks::send_application_page(ctx, chat_id, dialogue, view, 0).await
}

async fn handle_unsupported_message(ctx: &HandlerContext<'_>, chat_id: ChatId) -> Result<()> {
    let lang = ctx.language();
    ctx.bot
        .send_message(chat_id, ctx.t("unsupported-message"))
        .reply_markup(main_menu_keyboard(ctx.localization, &lang))
        .await?;
    Ok(())
}
