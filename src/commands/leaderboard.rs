use super::mention;

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

/// Render the `!leaderboard` top list: medals for the podium, plain numeric
/// ranks below it.
pub fn render(entries: &[(String, u64)]) -> String {
    let lines: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, (id, count))| {
            let rank = MEDALS
                .get(i)
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("**{}.**", i + 1));
            let plural = if *count == 1 { "" } else { "s" };
            format!("{} {} — {} meow{}", rank, mention(id), count, plural)
        })
        .collect();

    format!("🏆 **Top Meowers Leaderboard** 🏆\n{}", lines.join("\n"))
}
