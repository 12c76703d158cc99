//! HomeworkBuddy Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use tracing::{error, info, warn};

use HomeworkBuddy::{
    config::Settings,
    database::{DatabaseService, DocumentStore},
    handlers::{handle_callback_query, handle_command, handle_message, Command},
    services::{Messenger, ReminderScheduler, TelegramMessenger},
    state::AppContext,
    utils::{clock::{Clock, SystemClock}, logging},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", HomeworkBuddy::info());

    // Open the document store
    info!(path = %settings.storage.path, "Opening document store...");
    let store = DocumentStore::open(&settings.storage.path).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(settings.scheduler.utc_offset_hours)?);
    let database = Arc::new(DatabaseService::new(store.clone(), clock.clone()));

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);
    let messenger: Arc<dyn Messenger> = Arc::new(TelegramMessenger::new(bot.clone()));

    let ctx = Arc::new(AppContext::new(settings.clone(), database.clone(), messenger, clock.clone()));

    // Start reminders and cleanup
    let scheduler = Arc::new(ReminderScheduler::new(
        database,
        ctx.notification_service.clone(),
        ctx.state_storage.clone(),
        clock,
        &settings.scheduler,
    )?);
    let scheduler_handle = scheduler.spawn();

    info!("Setting up bot handlers...");
    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![ctx])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("HomeworkBuddy bot is ready, starting polling...");
    dispatcher.dispatch().await;

    info!("Stopping scheduler...");
    scheduler_handle.abort();
    store.shutdown().await;

    info!("HomeworkBuddy bot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    // Handle commands
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_commands),
                )
                .branch(
                    // Handle text and photo messages
                    dptree::endpoint(handle_messages),
                ),
        )
        .branch(
            // Handle callback queries
            Update::filter_callback_query().endpoint(handle_callbacks),
        )
}

/// Handle bot commands
async fn handle_commands(msg: Message, cmd: Command, ctx: Arc<AppContext>) -> HandlerResult {
    if let Err(e) = handle_command(msg, cmd, ctx).await {
        error!(error = %e, severity = %e.severity(), "Error handling command");
        return Err(e.into());
    }
    Ok(())
}

/// Handle regular messages
async fn handle_messages(msg: Message, ctx: Arc<AppContext>) -> HandlerResult {
    if let Err(e) = handle_message(msg, ctx).await {
        error!(error = %e, severity = %e.severity(), "Error handling message");
        return Err(e.into());
    }
    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(query: CallbackQuery, ctx: Arc<AppContext>) -> HandlerResult {
    let user_id = query.from.id.0 as i64;
    if let Err(e) = handle_callback_query(query, ctx).await {
        error!(user_id = user_id, error = %e, severity = %e.severity(), "Error handling callback query");
        return Err(e.into());
    }
    Ok(())
}
