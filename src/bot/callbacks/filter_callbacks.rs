//! Filter menu: criteria are toggled in place, then applied as a list view.

use anyhow::Result;
use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId, ParseMode};

use super::application_callbacks::edit_application_page;
use crate::bot::formatters::format_filter_summary;
use crate::bot::keyboards::filter_keyboard;
use crate::bot::{tolerate_unmodified, HandlerContext};
use crate::dialogue::{ListView, ManagerDialogue, ManagerState};
use crate::filters::{ApplicationFilter, DatePreset};
use crate::models::{ApplicationStatus, Priority, WorkflowType};
use crate::observability::{self, UserAction};
use crate::repository::ApplicationRepository;

/// One change to the filter being edited
#[derive(Debug, Clone, Copy)]
pub enum FilterEdit {
    Status(ApplicationStatus),
    Priority(Priority),
    Workflow(WorkflowType),
    Date(DatePreset),
    Clear,
}

/// Selecting an already selected value clears it
fn toggle<T: PartialEq>(slot: &mut Option<T>, value: T) {
    if slot.as_ref() == Some(&value) {
        *slot = None;
    } else {
        *slot = Some(value);
    }
}

pub fn apply_edit(filter: &ApplicationFilter, edit: FilterEdit) -> ApplicationFilter {
    let mut filter = filter.clone();
    match edit {
        FilterEdit::Status(status) => toggle(&mut filter.status, status),
        FilterEdit::Priority(priority) => toggle(&mut filter.priority, priority),
        FilterEdit::Workflow(workflow) => toggle(&mut filter.workflow_type, workflow),
        FilterEdit::Date(preset) => {
            let (from, to) = preset.range(Utc::now());
            filter.created_from = Some(from);
            filter.created_to = Some(to);
        }
        FilterEdit::Clear => filter = ApplicationFilter::default(),
    }
    filter
}

/// Filter the user is editing, or the one behind the current list
fn filter_in_progress(state: &ManagerState) -> ApplicationFilter {
    match state {
        ManagerState::EditingFilter { filter } => filter.clone(),
        _ => match state.current_view() {
            ListView::Filtered(filter) => filter,
            _ => ApplicationFilter::default(),
        },
    }
}

/// Send the filter menu as a new message
pub async fn send_filter_menu(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    dialogue: &ManagerDialogue,
    state: &ManagerState,
) -> Result<()> {
    let filter = filter_in_progress(state);
    let lang = ctx.language();
    ctx.bot
        .send_message(chat_id, format_filter_summary(&filter, ctx.localization, &lang))
        .parse_mode(ParseMode::Html)
        .reply_markup(filter_keyboard(&filter, ctx.localization, &lang))
        .await?;
    dialogue.update(ManagerState::EditingFilter { filter }).await?;
    Ok(())
}

pub async fn handle_filter_edit(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    message_id: MessageId,
    dialogue: &ManagerDialogue,
    state: &ManagerState,
    edit: FilterEdit,
) -> Result<Option<String>> {
    let filter = apply_edit(&filter_in_progress(state), edit);
    let lang = ctx.language();

    let edit = ctx.bot
        .edit_message_text(
            chat_id,
            message_id,
            format_filter_summary(&filter, ctx.localization, &lang),
        )
        .parse_mode(ParseMode::Html)
        .reply_markup(filter_keyboard(&filter, ctx.localization, &lang))
        .await;
    tolerate_unmodified(edit)?;
    dialogue.update(ManagerState::EditingFilter { filter }).await?;
    Ok(None)
}

pub async fn handle_filter_apply(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    message_id: MessageId,
    dialogue: &ManagerDialogue,
    state: &ManagerState,
) -> Result<Option<String>> {
    let filter = filter_in_progress(state);
    observability::record_user_engagement_metrics(
        ctx.user_id,
        UserAction::ApplyFilter,
        ctx.language_code,
    );

    let view = if filter.is_empty() {
        ListView::All
    } else {
        ListView::Filtered(filter)
    };
    let matched = view.select(&ctx.store.list_all()).len();
    edit_application_page(ctx, chat_id, message_id, dialogue, view, 0).await?;

    Ok(Some(ctx.t_args(
        "filter-applied",
        &[("count", &matched.to_string())],
    )))
}
