//! Staff activity overview, optionally scoped to one role.

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId, ParseMode};

use crate::bot::formatters::format_staff_activity;
use crate::bot::keyboards::staff_role_keyboard;
use crate::bot::{tolerate_unmodified, HandlerContext};
use crate::models::StaffRole;
use crate::observability::{self, UserAction};
use crate::repository::StaffRepository;
use crate::staff::StaffActivity;

fn render(ctx: &HandlerContext<'_>, role: Option<StaffRole>) -> String {
    let activity = StaffActivity::summarize(&ctx.store.all_staff(), role);
    format_staff_activity(&activity, ctx.localization, &ctx.language())
}

pub async fn send_staff_activity(ctx: &HandlerContext<'_>, chat_id: ChatId) -> Result<()> {
    observability::record_user_engagement_metrics(
        ctx.user_id,
        UserAction::ViewStaffActivity,
        ctx.language_code,
    );
    let lang = ctx.language();
    ctx.bot
        .send_message(chat_id, render(ctx, None))
        .parse_mode(ParseMode::Html)
        .reply_markup(staff_role_keyboard(None, ctx.localization, &lang))
        .await?;
    Ok(())
}

pub async fn handle_staff_role(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    message_id: MessageId,
    role: Option<StaffRole>,
) -> Result<Option<String>> {
    let lang = ctx.language();
    let edit = ctx.bot
        .edit_message_text(chat_id, message_id, render(ctx, role))
        .parse_mode(ParseMode::Html)
        .reply_markup(staff_role_keyboard(role, ctx.localization, &lang))
        .await;
    tolerate_unmodified(edit)?;
    Ok(None)
}
