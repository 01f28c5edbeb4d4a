//! Command Handlers module for processing bot commands

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::debug;

use super::menu::main_menu_keyboard;
use super::HandlerContext;
use crate::dialogue::ManagerDialogue;
use crate::dialogue::ManagerState;
use crate::observability::{self, UserAction};

/// Bot commands understood in any dialogue state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Cancel,
}

impl BotCommand {
    /// Parse `/start`, `/help` and `/cancel`, also in the `/cmd@botname` form
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let command = word.strip_prefix('/')?;
        let command = command.split('@').next().unwrap_or(command);
        match command {
            "start" => Some(BotCommand::Start),
            "help" => Some(BotCommand::Help),
            "cancel" => Some(BotCommand::Cancel),
            _ => None,
        }
    }
}

pub async fn handle_command(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    dialogue: &ManagerDialogue,
    command: BotCommand,
) -> Result<()> {
    debug!(user_id = %ctx.user_id, ?command, "Handling command");
    match command {
        BotCommand::Start => handle_start_command(ctx, chat_id, dialogue).await,
        BotCommand::Help => handle_help_command(ctx, chat_id).await,
        BotCommand::Cancel => handle_cancel_command(ctx, chat_id, dialogue).await,
    }
}

/// Handle the /start command
pub async fn handle_start_command(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    dialogue: &ManagerDialogue,
) -> Result<()> {
    observability::record_user_engagement_metrics(
        ctx.user_id,
        UserAction::StartCommand,
        ctx.language_code,
    );
    dialogue.update(ManagerState::Idle).await?;

    let lang = ctx.language();
    let welcome_message = format!(
        "👋 <b>{}</b>\n\n{}",
        ctx.t("welcome-title"),
        ctx.t("welcome-description")
    );
    ctx.bot
        .send_message(chat_id, welcome_message)
        .parse_mode(ParseMode::Html)
        .reply_markup(main_menu_keyboard(ctx.localization, &lang))
        .await?;
    Ok(())
}

/// Handle the /help command
pub async fn handle_help_command(ctx: &HandlerContext<'_>, chat_id: ChatId) -> Result<()> {
    observability::record_user_engagement_metrics(
        ctx.user_id,
        UserAction::HelpCommand,
        ctx.language_code,
    );

    let help_message = format!(
        "ℹ️ <b>{}</b>\n\n{}\n\n{}",
        ctx.t("help-title"),
        ctx.t("help-menu"),
        ctx.t("help-commands")
    );
    ctx.bot
        .send_message(chat_id, help_message)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// Handle the /cancel command: drop whatever the user was doing
pub async fn handle_cancel_command(
    ctx: &HandlerContext<'_>,
    chat_id: ChatId,
    dialogue: &ManagerDialogue,
) -> Result<()> {
    observability::record_user_engagement_metrics(
        ctx.user_id,
        UserAction::CancelCommand,
        ctx.language_code,
    );

    let previous = dialogue.get().await?.unwrap_or_default();
    if let ManagerState::Ordering(wizard) = &previous {
        observability::record_wizard_metrics(
            wizard.kind,
            observability::WizardEvent::Cancelled,
            wizard.step.number(),
        );
    }
    dialogue.update(ManagerState::Idle).await?;

    let key = if previous == ManagerState::Idle {
        "cancel-nothing"
    } else {
        "cancel-done"
    };
    let lang = ctx.language();
    ctx.bot
        .send_message(chat_id, ctx.t(key))
        .reply_markup(main_menu_keyboard(ctx.localization, &lang))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(BotCommand::parse("/start"), Some(BotCommand::Start));
        assert_eq!(BotCommand::parse("/help extra words"), Some(BotCommand::Help));
        assert_eq!(BotCommand::parse("/cancel@manager_bot"), Some(BotCommand::Cancel));
        assert_eq!(BotCommand::parse("/unknown"), None);
        assert_eq!(BotCommand::parse("start"), None);
        assert_eq!(BotCommand::parse(""), None);
    }
}
