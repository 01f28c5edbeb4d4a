//! Application browsing: paging, status changes and assignment.

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardMarkup, MessageId, ParseMode};
use tracing::debug;

use crate::bot::formatters::{
    format_application_card, format_assign_menu, format_empty_list, format_status_menu,
};
use crate::bot::keyboards::{
    application_card_keyboard, assign_keyboard, comment_keyboard, status_select_keyboard,
};
use crate::bot::{tolerate_unmodified, HandlerContext};
use crate::dialogue::{ListView, ManagerDialogue, ManagerState};
use crate::errors::{error_logging, AppError};
use crate::models::ApplicationStatus;
use crate::observability::{self, UserAction};
use crate::pagination::{PageMove, Pager};
use crate::repository::{ApplicationRepository, StaffRepository};
use crate::status_workflow;

/// Rendered list page
#[derive(Debug, Clone)]
pub struct PageView {
    pub text: String,
    pub keyboard: InlineKeyboardMarkup,
    /// Index after clamping to the current list length
    pub index: usize,
}

/// Render the application at `index` of `view`
pub fn render_page(ctx: &HandlerContext<'_>, view: &ListView, index: usize) -> PageView {
    let lang = ctx.language();
    let apps = view.select(&ctx.store.list_all());

    if apps.is_empty() {
        return PageView {
            text: format_empty_list(view.title_key(), ctx.localization, &lang),
            keyboard: InlineKeyboardMarkup::default(),
            index: 0,
        };
    }

    let pager = Pager::new(index, apps.len());
    let app = &apps[pager.index()];
    let assignee = app.assigned_to.and_then(|id| ctx.store.get_staff(id).ok());

    PageView {
        text: format!(
            "<b>{}</b>\n\n{}",
            ctx.t(view.title_key()),
            format_application_card(
                app,
                pager.index(),
                pager.len(),
                assignee.as_ref(),
                ctx.localization,
                &lang
            )
        ),
        keyboard: application_card_keyboard(app, &pager, ctx.localization, &lang),
        index: pager.index(),
    }
}

/// Send a new message with the page and remember the browsing position
pub async fn send_application_page(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    dialogue: &ManagerDialogue,
    view: ListView,
    index: usize,
) -> Result<()> {
    let page = render_page(ctx, &view, index);
    ctx.bot
        .send_message(chat_id, page.text)
        .parse_mode(ParseMode::Html)
        .reply_markup(page.keyboard)
        .await?;
    dialogue
        .update(ManagerState::Browsing {
            view,
            index: page.index,
        })
        .await?;
    Ok(())
}

/// Replace the message content with the page and remember the position
pub async fn edit_application_page(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    message_id: MessageId,
    dialogue: &ManagerDialogue,
    view: ListView,
    index: usize,
) -> Result<()> {
    let page = render_page(ctx, &view, index);
    let edit = ctx.bot
        .edit_message_text(chat_id, message_id, page.text)
        .parse_mode(ParseMode::Html)
        .reply_markup(page.keyboard)
        .await;
    tolerate_unmodified(edit)?;
    dialogue
        .update(ManagerState::Browsing {
            view,
            index: page.index,
        })
        .await?;
    Ok(())
}

fn browsing_position(state: &ManagerState) -> (ListView, usize) {
    match state {
        ManagerState::Browsing { view, index } | ManagerState::AwaitingComment { view, index, .. } => {
            (view.clone(), *index)
        }
        _ => (ListView::All, 0),
    }
}

/// Move one record back or forward; boundaries return a notice for the
/// callback answer and leave the message untouched
pub async fn handle_paging(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    message_id: MessageId,
    dialogue: &ManagerDialogue,
    state: &ManagerState,
    forward: bool,
) -> Result<Option<String>> {
    let (view, index) = browsing_position(state);
    let len = view.select(&ctx.store.list_all()).len();
    let mut pager = Pager::new(index, len);

    let step = if forward { pager.next() } else { pager.prev() };
    debug!(user_id = %ctx.user_id, ?step, "Paging applications");

    match step {
        PageMove::Moved(new_index) => {
            observability::record_user_engagement_metrics(
                ctx.user_id,
                UserAction::BrowseApplications,
                ctx.language_code,
            );
            edit_application_page(ctx, chat_id, message_id, dialogue, view, new_index).await?;
            Ok(None)
        }
        PageMove::AtStart => Ok(Some(ctx.t("page-first"))),
        PageMove::AtEnd => Ok(Some(ctx.t("page-last"))),
        PageMove::Empty => Ok(Some(ctx.t("list-empty"))),
    }
}

pub async fn handle_back_to_application(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    message_id: MessageId,
    dialogue: &ManagerDialogue,
    state: &ManagerState,
) -> Result<Option<String>> {
    let (view, index) = browsing_position(state);
    edit_application_page(ctx, chat_id, message_id, dialogue, view, index).await?;
    Ok(None)
}

pub async fn handle_show_status_menu(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    message_id: MessageId,
    app_id: &str,
) -> Result<Option<String>> {
    let app = ctx.store.get_by_id(app_id)?;
    if status_workflow::is_terminal(app.status) {
        return Ok(Some(ctx.t("status-terminal")));
    }

    let lang = ctx.language();
    let edit = ctx.bot
        .edit_message_text(
            chat_id,
            message_id,
            format_status_menu(&app, ctx.localization, &lang),
        )
        .parse_mode(ParseMode::Html)
        .reply_markup(status_select_keyboard(&app, ctx.localization, &lang))
        .await;
    tolerate_unmodified(edit)?;
    Ok(None)
}

/// Status picked from the menu: validate, then ask for an optional comment
pub async fn handle_select_status(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    dialogue: &ManagerDialogue,
    state: &ManagerState,
    app_id: &str,
    target: ApplicationStatus,
) -> Result<Option<String>> {
    let app = ctx.store.get_by_id(app_id)?;

    if let Err(e) = status_workflow::check_transition(app.status, target) {
        error_logging::log_transition_rejected(
            app_id,
            app.status.code(),
            target.code(),
            Some(ctx.user_id),
        );
        observability::record_status_transition_metrics(app.status, target, false);
        return Err(e.into());
    }

    let (view, index) = browsing_position(state);
    dialogue
        .update(ManagerState::AwaitingComment {
            app_id: app_id.to_string(),
            target,
            view,
            index,
        })
        .await?;

    let lang = ctx.language();
    let prompt = ctx.t_args(
        "status-comment-prompt",
        &[
            ("id", app_id),
            ("status", &ctx.t(target.label_key())),
        ],
    );
    ctx.bot
        .send_message(chat_id, prompt)
        .parse_mode(ParseMode::Html)
        .reply_markup(comment_keyboard(ctx.localization, &lang))
        .await?;
    Ok(None)
}

/// Apply the pending status change, with the comment if one was typed
pub async fn apply_status_change(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    dialogue: &ManagerDialogue,
    state: &ManagerState,
    comment: Option<String>,
) -> Result<()> {
    let ManagerState::AwaitingComment {
        app_id,
        target,
        view,
        index,
    } = state
    else {
        return Ok(());
    };

    let before = ctx.store.get_by_id(app_id)?;
    let comment = comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    match ctx
        .store
        .update_status(app_id, *target, &ctx.actor(), comment)
    {
        Ok(updated) => {
            observability::record_status_transition_metrics(before.status, updated.status, true);
            observability::record_user_engagement_metrics(
                ctx.user_id,
                UserAction::ChangeStatus,
                ctx.language_code,
            );
            let confirmation = ctx.t_args(
                "status-changed",
                &[
                    ("id", &updated.id),
                    ("from", &ctx.t(before.status.label_key())),
                    ("to", &ctx.t(updated.status.label_key())),
                ],
            );
            ctx.bot
                .send_message(chat_id, format!("✅ {}", confirmation))
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Err(e) => {
            if let AppError::InvalidTransition { from, to } = &e {
                error_logging::log_transition_rejected(
                    app_id,
                    from.code(),
                    to.code(),
                    Some(ctx.user_id),
                );
                observability::record_status_transition_metrics(*from, *to, false);
            }
            // The list is shown again below either way
            dialogue
                .update(ManagerState::Browsing {
                    view: view.clone(),
                    index: *index,
                })
                .await?;
            return Err(e.into());
        }
    }

    send_application_page(ctx, chat_id, dialogue, view.clone(), *index).await
}

pub async fn handle_show_assign_menu(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    message_id: MessageId,
    app_id: &str,
) -> Result<Option<String>> {
    let app = ctx.store.get_by_id(app_id)?;
    if !app.status.is_open() {
        return Err(AppError::InvalidTransition {
            from: app.status,
            to: ApplicationStatus::Assigned,
        }
        .into());
    }

    let junior_managers = ctx.store.junior_managers();
    if junior_managers.is_empty() {
        return Ok(Some(ctx.t("assign-no-staff")));
    }

    let lang = ctx.language();
    let edit = ctx.bot
        .edit_message_text(
            chat_id,
            message_id,
            format_assign_menu(&app, ctx.localization, &lang),
        )
        .parse_mode(ParseMode::Html)
        .reply_markup(assign_keyboard(
            app_id,
            &junior_managers,
            ctx.localization,
            &lang,
        ))
        .await;
    tolerate_unmodified(edit)?;
    Ok(None)
}

pub async fn handle_assign(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    message_id: MessageId,
    dialogue: &ManagerDialogue,
    state: &ManagerState,
    app_id: &str,
    staff_id: u32,
) -> Result<Option<String>> {
    let result = ctx.store.assign(app_id, staff_id, &ctx.actor());
    observability::record_assignment_metrics(staff_id, result.is_ok());
    let updated = result?;

    observability::record_user_engagement_metrics(
        ctx.user_id,
        UserAction::AssignApplication,
        ctx.language_code,
    );

    let staff_name = ctx
        .store
        .get_staff(staff_id)
        .map(|member| member.full_name)
        .unwrap_or_else(|_| format!("#{}", staff_id));

    // Show the record just assigned, even if it left the browsed view
    let (view, index) = state
        .current_view()
        .locate(&ctx.store.list_all(), &updated.id);
    edit_application_page(ctx, chat_id, message_id, dialogue, view, index).await?;

    Ok(Some(ctx.t_args(
        "assign-done",
        &[("id", &updated.id), ("name", &staff_name)],
    )))
}
