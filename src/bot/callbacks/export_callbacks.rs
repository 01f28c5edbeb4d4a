//! Export of the current list as a document.

use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile};
use tracing::info;

use crate::bot::HandlerContext;
use crate::dialogue::ManagerState;
use crate::export::{render_export, ExportFormat};
use crate::observability::{self, UserAction};
use crate::repository::ApplicationRepository;

pub async fn handle_export(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    state: &ManagerState,
    format: ExportFormat,
) -> Result<Option<String>> {
    let started = Instant::now();
    let view = state.current_view();
    let apps = view.select(&ctx.store.list_all());

    let file = render_export(
        &apps,
        format,
        ctx.localization,
        &ctx.language(),
        Utc::now(),
    )?;
    let size = file.bytes.len();

    info!(
        user_id = %ctx.user_id,
        format = %format.code(),
        rows = apps.len(),
        bytes = size,
        file_name = %file.file_name,
        "Sending export"
    );

    ctx.bot
        .send_document(
            chat_id,
            InputFile::memory(file.bytes).file_name(file.file_name),
        )
        .caption(ctx.t_args(
            "export-caption",
            &[
                ("count", &apps.len().to_string()),
                ("title", &ctx.t(view.title_key())),
            ],
        ))
        .await?;

    observability::record_export_metrics(format, apps.len(), size, started.elapsed());
    observability::record_user_engagement_metrics(
        ctx.user_id,
        UserAction::ExportApplications,
        ctx.language_code,
    );
    Ok(Some(ctx.t("export-done")))
}
