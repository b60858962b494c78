use anyhow::Result;
use serenity::prelude::*;
use std::sync::Arc;
use tracing::{error, info};

mod bot;
mod catapi;
mod commands;
mod config;
mod data;
mod handler;
mod scheduler;
mod tracker;

use config::Config;
use handler::Handler;
use tracker::Tracker;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "meow_streak_bot=info,serenity=warn".to_string()),
        )
        .init();

    info!("Starting Meow Streak Bot...");

    let config = Arc::new(Config::from_env()?);

    // A corrupt data file is fatal here; a missing one just starts fresh.
    let tracker = Tracker::load(&config).await?;
    let data = bot::shared(tracker);

    let intents = GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

    let handler = Handler::new(data, config.clone());

    let mut client = Client::builder(&config.token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Discord client: {}", e))?;

    info!("Bot initialized successfully, connecting to Discord...");

    if let Err(why) = client.start().await {
        error!("Discord client error: {}", why);
        return Err(anyhow::anyhow!("Discord client failed: {}", why));
    }

    Ok(())
}
