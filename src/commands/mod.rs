pub mod leaderboard;
pub mod streaks;

use crate::bot::SharedTracker;
use serenity::{model::channel::Message, prelude::*};

pub fn mention(user_id: &str) -> String {
    format!("<@{user_id}>")
}

/// Dispatch the two exact-match text commands. Returns `true` if the message
/// was a command (handled or not), so the caller can skip the reward path.
pub async fn handle_command(
    ctx: &Context,
    msg: &Message,
    data: &SharedTracker,
) -> serenity::Result<bool> {
    match msg.content.as_str() {
        "!streaks" => {
            let report = data.read().await.streak_report();
            msg.channel_id
                .say(&ctx.http, streaks::render(&report))
                .await?;
            Ok(true)
        }
        "!leaderboard" => {
            let top = data.read().await.leaderboard(10);
            msg.channel_id
                .say(&ctx.http, leaderboard::render(&top))
                .await?;
            Ok(true)
        }
        _ => Ok(false),
    }
}
