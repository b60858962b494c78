use crate::{bot::SharedTracker, catapi, commands, config::Config, scheduler::RolloverScheduler};
use rand::Rng;
use serenity::{
    async_trait,
    builder::{CreateEmbed, CreateMessage},
    model::{channel::Message, gateway::Ready},
    prelude::*,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

const KEYWORD: &str = "meow";

const REWARDS: [&str; 4] = [
    "Here's your meow reward! 🐾",
    "Another meow? You're unstoppable 😼",
    "Meowster of the universe incoming!",
    "Cats approve this message 🐱",
];

const FETCH_FAILED: &str = "Couldn't fetch a cat right now... blame the internet 😿";

fn contains_meow(text: &str) -> bool {
    text.to_lowercase().contains(KEYWORD)
}

pub struct Handler {
    pub data: SharedTracker,
    pub config: Arc<Config>,
    http: reqwest::Client,
    scheduler_started: AtomicBool,
}

impl Handler {
    pub fn new(data: SharedTracker, config: Arc<Config>) -> Self {
        Self {
            data,
            config,
            http: reqwest::Client::new(),
            scheduler_started: AtomicBool::new(false),
        }
    }

    async fn reward_meow(
        &self,
        ctx: &Context,
        msg: &Message,
        in_target_channel: bool,
    ) -> anyhow::Result<()> {
        // Best-effort; a failed reaction never blocks the reward.
        if let Err(why) = msg.react(&ctx.http, '🐱').await {
            warn!("Failed to react to meow: {}", why);
        }

        let user_id = msg.author.id.to_string();
        self.data
            .write()
            .await
            .record_meow(&user_id, in_target_channel)
            .await?;

        let phrase = REWARDS[rand::thread_rng().gen_range(0..REWARDS.len())];

        match catapi::fetch_cat_url(&self.http, self.config.cat_api_key.as_deref()).await {
            Ok(url) => {
                let mut builder = CreateMessage::new().embed(CreateEmbed::new().image(url));
                // The reward phrase only accompanies meows in the target channel.
                if in_target_channel {
                    builder = builder.content(phrase);
                }
                msg.channel_id.send_message(&ctx.http, builder).await?;
            }
            Err(why) => {
                error!("Failed to fetch cat: {:#}", why);
                msg.channel_id.say(&ctx.http, FETCH_FAILED).await?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        // Ready fires again on reconnect; only spawn the scheduler once.
        if !self.scheduler_started.swap(true, Ordering::SeqCst) {
            let scheduler = RolloverScheduler::new(self.data.clone(), self.config.clone());
            tokio::spawn(async move {
                scheduler.start(ctx).await;
            });
            info!("Rollover scheduler started");
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let in_target_channel = msg.channel_id == self.config.target_channel_id;

        // Commands win over the keyword: "!streaks" never earns a cat.
        if in_target_channel {
            match commands::handle_command(&ctx, &msg, &self.data).await {
                Ok(true) => return,
                Ok(false) => {}
                Err(why) => {
                    error!("Error handling command: {}", why);
                    return;
                }
            }
        }

        if !contains_meow(&msg.content) {
            return;
        }

        if let Err(why) = self.reward_meow(&ctx, &msg, in_target_channel).await {
            error!("Error rewarding meow from user {}: {:#}", msg.author.id, why);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_match_is_case_insensitive_substring() {
        assert!(contains_meow("meow"));
        assert!(contains_meow("MEOW!"));
        assert!(contains_meow("ameower"));
        assert!(contains_meow("good morning, Meow meow"));
        assert!(!contains_meow("meo"));
        assert!(!contains_meow("woof"));
        assert!(!contains_meow("!streaks"));
    }
}
