use crate::{bot::SharedTracker, commands, config::Config};
use anyhow::{Context as _, Result};
use chrono::Local;
use serenity::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};

/// The once-a-day rollover job: announce stragglers, reset broken streaks,
/// post the streak report and first-meower, then wipe the day's state.
pub struct RolloverScheduler {
    data: SharedTracker,
    config: Arc<Config>,
}

impl RolloverScheduler {
    pub fn new(data: SharedTracker, config: Arc<Config>) -> Self {
        Self { data, config }
    }

    /// Sleep until each upcoming cron firing and run the rollover. A failed
    /// firing is logged and skipped; the next day's firing is independent.
    pub async fn start(&self, ctx: Context) {
        loop {
            let next = match self.config.rollover_schedule.upcoming(Local).next() {
                Some(t) => t,
                None => {
                    error!("Rollover schedule has no upcoming firings, scheduler exiting");
                    return;
                }
            };
            info!("Next rollover scheduled for {}", next);

            let wait = (next - Local::now())
                .to_std()
                .unwrap_or(Duration::ZERO);
            sleep(wait).await;

            if let Err(e) = self.run_rollover(&ctx).await {
                error!("Rollover failed: {:#}", e);
            }
        }
    }

    async fn run_rollover(&self, ctx: &Context) -> Result<()> {
        let channel = self.config.target_channel_id;

        // Resolve the announcement channel before touching any state, so a
        // misconfigured channel carries today's attendance into tomorrow
        // instead of half-applying the rollover.
        channel
            .to_channel(&ctx.http)
            .await
            .context("rollover channel could not be resolved")?;

        let mut tracker = self.data.write().await;

        let missing = tracker.missing_today();
        if !missing.is_empty() {
            channel
                .say(&ctx.http, shortfall_announcement(&missing))
                .await?;
            tracker.reset_missed_streaks(&missing).await?;
            info!("Rollover reset {} broken streaks", missing.len());
        } else {
            channel
                .say(
                    &ctx.http,
                    "🎉 Purrfection achieved! Every cat has meowed today! 🐾😸",
                )
                .await?;
        }

        channel
            .say(&ctx.http, commands::streaks::render(&tracker.streak_report()))
            .await?;

        channel
            .say(
                &ctx.http,
                first_meow_announcement(tracker.first_meower.as_deref()),
            )
            .await?;

        tracker.reset_day();
        info!("Rollover complete, attendance cleared for the new day");
        Ok(())
    }
}

fn shortfall_announcement(missing: &[String]) -> String {
    let mentions: Vec<String> = missing.iter().map(|id| commands::mention(id)).collect();
    format!(
        "🌅 New day, new meows! But yesterday these slackers didn't meow: {} 😾",
        mentions.join(" ")
    )
}

fn first_meow_announcement(first_meower: Option<&str>) -> String {
    match first_meower {
        Some(id) => format!(
            "🥇 **First to Meow Today:** {} — speedy paws! 🐾💨",
            commands::mention(id)
        ),
        None => "😿 No one claimed *First to Meow* today... sleepy cats.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortfall_mentions_every_straggler() {
        let text = shortfall_announcement(&["1".to_string(), "2".to_string()]);
        assert!(text.contains("<@1> <@2>"));
        assert!(text.contains("slackers"));
    }

    #[test]
    fn first_meow_announcement_names_the_claimant() {
        assert!(first_meow_announcement(Some("42")).contains("<@42>"));
        assert!(first_meow_announcement(None).contains("No one claimed"));
    }
}
