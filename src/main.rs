use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;

use ioibot::cli::{render_poll_report, Cli, Commands};
use ioibot::core::web_server::start_display_server;
use ioibot::core::{config, init_logger};
use ioibot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};
use ioibot::{create_pool, CommandRouter, Directory, PollController, PollStore};

/// Main entry point
///
/// # Errors
/// Returns an error if initialization fails (logging, database, roster, bot).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command_or_default() {
        Commands::Run { display_port } => run_bot(display_port.or(*config::DISPLAY_PORT)).await,
        Commands::Display { port } => start_display_server(port, open_store()?, load_directory()?).await,
        Commands::Polls => {
            print!("{}", render_poll_report(&open_store()?)?);
            Ok(())
        }
    }
}

fn open_store() -> Result<PollStore> {
    let pool = create_pool(&config::DATABASE_PATH)?;
    log::info!("Database ready at {}", config::DATABASE_PATH.as_str());
    Ok(PollStore::new(Arc::new(pool)))
}

fn load_directory() -> Result<Arc<Directory>> {
    Ok(Arc::new(Directory::load(config::DIRECTORY_PATH.as_str())?))
}

async fn run_bot(display_port: Option<u16>) -> Result<()> {
    let store = open_store()?;
    let directory = load_directory()?;

    if let Some(port) = display_port {
        let display_store = store.clone();
        let display_directory = Arc::clone(&directory);
        tokio::spawn(async move {
            if let Err(e) = start_display_server(port, display_store, display_directory).await {
                log::error!("Poll display server stopped: {}", e);
            }
        });
    }

    let bot = create_bot()?;
    let me = bot.get_me().await?;
    log::info!("Logged in as @{}", me.username.as_deref().unwrap_or("<no username>"));

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let router = Arc::new(CommandRouter::new(directory, PollController::new(store)));
    let handler_deps = HandlerDeps::new(router, Arc::new(bot.clone()), me.username.clone(), me.id);

    log::info!("Starting bot in long polling mode");
    Dispatcher::builder(bot, schema(handler_deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
