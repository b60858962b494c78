use anyhow::{anyhow, Context, Result};
use cron::Schedule;
use serenity::model::id::ChannelId;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_ROLLOVER_CRON: &str = "0 0 0 * * *";

/// Everything the bot needs from the environment, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    /// The one channel where commands and streak tracking apply.
    pub target_channel_id: ChannelId,
    /// Allow-list of user ids eligible for streak reporting, in configured order.
    pub tracked_users: Vec<String>,
    pub cat_api_key: Option<String>,
    pub streak_file: PathBuf,
    pub counter_file: PathBuf,
    pub rollover_schedule: Schedule,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("DISCORD_TOKEN")
            .map_err(|_| anyhow!("DISCORD_TOKEN environment variable is required"))?;

        let target_channel_id = std::env::var("TARGET_CHANNEL_ID")
            .map_err(|_| anyhow!("TARGET_CHANNEL_ID environment variable is required"))?
            .parse::<u64>()
            .context("TARGET_CHANNEL_ID must be a numeric channel id")
            .map(ChannelId::new)?;

        let tracked_users: Vec<String> = std::env::var("USER_IDS")
            .map_err(|_| anyhow!("USER_IDS environment variable is required"))?
            .split(',')
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        if tracked_users.is_empty() {
            return Err(anyhow!("USER_IDS must contain at least one user id"));
        }

        let cat_api_key = std::env::var("CAT_API_KEY").ok();

        let streak_file = std::env::var("STREAK_FILE")
            .unwrap_or_else(|_| "streaks.json".to_string())
            .into();
        let counter_file = std::env::var("COUNTER_FILE")
            .unwrap_or_else(|_| "leaderboard.json".to_string())
            .into();

        let cron_expr = std::env::var("ROLLOVER_CRON")
            .unwrap_or_else(|_| DEFAULT_ROLLOVER_CRON.to_string());
        let rollover_schedule = Schedule::from_str(&cron_expr)
            .with_context(|| format!("ROLLOVER_CRON is not a valid cron expression: {cron_expr}"))?;

        Ok(Self {
            token,
            target_channel_id,
            tracked_users,
            cat_api_key,
            streak_file,
            counter_file,
            rollover_schedule,
        })
    }
}
