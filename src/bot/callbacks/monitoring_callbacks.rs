//! Realtime monitoring dashboard.

use anyhow::Result;
use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId, ParseMode};

use crate::bot::formatters::format_monitoring;
use crate::bot::keyboards::monitoring_keyboard;
use crate::bot::{tolerate_unmodified, HandlerContext};
use crate::monitoring::MonitoringSnapshot;
use crate::observability::{self, UserAction};
use crate::repository::{ApplicationRepository, StaffRepository};

fn render(ctx: &HandlerContext<'_>) -> String {
    let snapshot = MonitoringSnapshot::collect(
        &ctx.store.list_all(),
        &ctx.store.all_staff(),
        Utc::now(),
    );
    observability::record_pipeline_gauges(&snapshot);
    format_monitoring(&snapshot, ctx.localization, &ctx.language())
}

pub async fn send_monitoring(ctx: &HandlerContext<'_>, chat_id: ChatId) -> Result<()> {
    observability::record_user_engagement_metrics(
        ctx.user_id,
        UserAction::ViewMonitoring,
        ctx.language_code,
    );
    let lang = ctx.language();
    ctx.bot
        .send_message(chat_id, render(ctx))
        .parse_mode(ParseMode::Html)
        .reply_markup(monitoring_keyboard(ctx.localization, &lang))
        .await?;
    Ok(())
}

pub async fn handle_monitor_refresh(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    message_id: MessageId,
) -> Result<Option<String>> {
    let lang = ctx.language();
    let edit = ctx.bot
        .edit_message_text(chat_id, message_id, render(ctx))
        .parse_mode(ParseMode::Html)
        .reply_markup(monitoring_keyboard(ctx.localization, &lang))
        .await;
    tolerate_unmodified(edit)?;
    Ok(Some(ctx.t("monitor-refreshed")))
}
