use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use teloxide::types::MaybeInaccessibleMessage;
use tracing::info;

use telecom_manager_bot::bot;
use telecom_manager_bot::config::AppConfig;
use telecom_manager_bot::deduplication::create_shared_deduplicator;
use telecom_manager_bot::dialogue::{ManagerDialogue, ManagerState};
use telecom_manager_bot::localization::LocalizationManager;
use telecom_manager_bot::observability::{self, ReadinessProbe};
use telecom_manager_bot::repository::{InMemoryStore, StaffRepository};

/// Upper bound on remembered update ids
const DEDUPLICATION_MAX_ENTRIES: usize = 10_000;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    config.validate()?;

    // In-memory store seeded with demo applications, clients and staff
    let store = Arc::new(InMemoryStore::seeded());

    let probe = ReadinessProbe {
        bot_token: Some(config.bot.token.clone()),
        store: Some(Arc::clone(&store) as Arc<dyn StaffRepository>),
    };

    // Initialize complete observability stack (metrics, tracing, logging)
    observability::init_observability_with_config(&config.observability, probe).await?;
    info!(summary = %config.summary(), "Configuration loaded");

    let _system_metrics_handle = observability::start_system_metrics_recorder(
        Arc::clone(&store),
        config.observability.gauge_refresh_secs,
    );

    let localization = Arc::new(
        LocalizationManager::new()?.with_default_language(&config.bot.default_language)?,
    );

    let dedup =
        create_shared_deduplicator(config.bot.deduplication_ttl_secs, DEDUPLICATION_MAX_ENTRIES);

    // Initialize the bot with custom client configuration for better reliability
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.bot.http_timeout_secs))
        .build()?;

    let bot = Bot::with_client(config.bot.token.clone(), client);

    info!(
        timeout_secs = config.bot.http_timeout_secs,
        "Bot initialized, starting dispatcher"
    );

    // Create shared dialogue storage
    let dialogue_storage = InMemStorage::<ManagerState>::new();

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint({
            let store = Arc::clone(&store);
            let storage = dialogue_storage.clone();
            let localization = Arc::clone(&localization);
            let dedup = Arc::clone(&dedup);
            move |bot: Bot, msg: Message| {
                let store = Arc::clone(&store);
                let localization = Arc::clone(&localization);
                let dedup = Arc::clone(&dedup);
                let dialogue = ManagerDialogue::new(storage.clone(), msg.chat.id);
                async move {
                    bot::message_handler(bot, msg, store, dialogue, localization, dedup).await
                }
            }
        }))
        .branch(Update::filter_callback_query().endpoint({
            let store = Arc::clone(&store);
            let storage = dialogue_storage.clone();
            let localization = Arc::clone(&localization);
            let dedup = Arc::clone(&dedup);
            move |bot: Bot, q: CallbackQuery| {
                let store = Arc::clone(&store);
                let localization = Arc::clone(&localization);
                let dedup = Arc::clone(&dedup);
                // Use the chat ID from the original message that contained the inline keyboard
                let chat_id = match &q.message {
                    Some(MaybeInaccessibleMessage::Regular(msg)) => msg.chat.id,
                    Some(MaybeInaccessibleMessage::Inaccessible(msg)) => msg.chat.id,
                    None => ChatId::from(q.from.id),
                };
                let dialogue = ManagerDialogue::new(storage.clone(), chat_id);
                async move {
                    bot::callback_handler(bot, q, store, dialogue, localization, dedup).await
                }
            }
        }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
