use super::mention;

/// Render the `!streaks` report: one line per tracked user, fire icon for a
/// live streak, crying cat for a broken one. Also sent verbatim at rollover.
pub fn render(report: &[(String, u64)]) -> String {
    let lines: Vec<String> = report
        .iter()
        .map(|(id, streak)| {
            let emoji = if *streak == 0 { "😿" } else { "🔥" };
            let plural = if *streak == 1 { "" } else { "s" };
            format!("- {}: {} day{} {}", mention(id), streak, plural, emoji)
        })
        .collect();

    format!("📈 Current Meow Streaks:\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_active_streaks_get_different_icons() {
        let report = vec![("a".to_string(), 0), ("b".to_string(), 3)];
        let text = render(&report);
        assert!(text.contains("- <@a>: 0 days 😿"));
        assert!(text.contains("- <@b>: 3 days 🔥"));
    }

    #[test]
    fn one_day_streak_is_singular() {
        let text = render(&[("a".to_string(), 1)]);
        assert!(text.contains("- <@a>: 1 day 🔥"));
    }

    #[test]
    fn report_starts_with_header() {
        let text = render(&[]);
        assert!(text.starts_with("📈 Current Meow Streaks:"));
    }
}
