use crate::config::Config;
use crate::data;
use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::{debug, info};

/// All mutable bot state, owned in one place instead of scattered globals.
///
/// `counts` and `streaks` are mirrored to disk after every mutation; the
/// attendance set and first-meower live only in memory and are wiped by
/// [`Tracker::reset_day`], which only the rollover job calls.
pub struct Tracker {
    /// Tracked user ids in configured order; drives streak-report ordering.
    pub tracked_users: Vec<String>,
    /// Lifetime meow counts, all channels.
    pub counts: HashMap<String, u64>,
    /// Current streak lengths. A user absent from the map has streak 0.
    pub streaks: HashMap<String, u64>,
    /// Who has meowed in the target channel since the last rollover.
    pub meowed_today: HashSet<String>,
    /// First target-channel meower since the last rollover, if any.
    pub first_meower: Option<String>,
    streak_file: PathBuf,
    counter_file: PathBuf,
}

impl Tracker {
    pub fn new(tracked_users: Vec<String>, streak_file: PathBuf, counter_file: PathBuf) -> Self {
        Self {
            tracked_users,
            counts: HashMap::new(),
            streaks: HashMap::new(),
            meowed_today: HashSet::new(),
            first_meower: None,
            streak_file,
            counter_file,
        }
    }

    /// Load both persisted maps. Missing files start empty; corrupt files
    /// fail startup.
    pub async fn load(config: &Config) -> Result<Self> {
        let mut tracker = Self::new(
            config.tracked_users.clone(),
            config.streak_file.clone(),
            config.counter_file.clone(),
        );
        tracker.streaks = data::load_map(&tracker.streak_file).await?;
        tracker.counts = data::load_map(&tracker.counter_file).await?;
        info!(
            "Loaded {} streak entries and {} leaderboard entries",
            tracker.streaks.len(),
            tracker.counts.len()
        );
        Ok(tracker)
    }

    /// Record one qualifying meow from `user_id`.
    ///
    /// The lifetime count always increments, once per message. The streak
    /// increments at most once per user per day, and only for messages in
    /// the target channel; the attendance set is the idempotence guard.
    pub async fn record_meow(&mut self, user_id: &str, in_target_channel: bool) -> Result<()> {
        *self.counts.entry(user_id.to_string()).or_insert(0) += 1;
        data::save_map(&self.counter_file, &self.counts).await?;

        if !in_target_channel {
            return Ok(());
        }

        if self.first_meower.is_none() {
            info!("First meow of the day from user {}", user_id);
            self.first_meower = Some(user_id.to_string());
        }

        if !self.meowed_today.contains(user_id) {
            let streak = self.streaks.entry(user_id.to_string()).or_insert(0);
            *streak += 1;
            debug!("User {} streak extended to {}", user_id, streak);
            data::save_map(&self.streak_file, &self.streaks).await?;
            self.meowed_today.insert(user_id.to_string());
        }

        Ok(())
    }

    /// Every tracked user with their current streak, in configured order.
    pub fn streak_report(&self) -> Vec<(String, u64)> {
        self.tracked_users
            .iter()
            .map(|id| (id.clone(), self.streaks.get(id).copied().unwrap_or(0)))
            .collect()
    }

    /// Top `limit` lifetime counts, descending. Tie order is whatever the
    /// map yields; callers must not rely on it.
    pub fn leaderboard(&self, limit: usize) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self
            .counts
            .iter()
            .map(|(id, count)| (id.clone(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(limit);
        entries
    }

    /// Tracked users who have not meowed in the target channel today.
    pub fn missing_today(&self) -> Vec<String> {
        self.tracked_users
            .iter()
            .filter(|id| !self.meowed_today.contains(*id))
            .cloned()
            .collect()
    }

    /// Zero the streaks of everyone who missed today, persisting once for
    /// the whole batch.
    pub async fn reset_missed_streaks(&mut self, missing: &[String]) -> Result<()> {
        for id in missing {
            self.streaks.insert(id.clone(), 0);
        }
        data::save_map(&self.streak_file, &self.streaks).await?;
        Ok(())
    }

    /// Start the new day. Called only by the rollover job.
    pub fn reset_day(&mut self) {
        self.first_meower = None;
        self.meowed_today.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_tracker(dir: &TempDir, tracked: &[&str]) -> Tracker {
        Tracker::new(
            tracked.iter().map(|s| s.to_string()).collect(),
            dir.path().join("streaks.json"),
            dir.path().join("leaderboard.json"),
        )
    }

    #[tokio::test]
    async fn first_meow_of_day_extends_streak_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = test_tracker(&dir, &["alice"]);

        tracker.record_meow("alice", true).await.unwrap();
        assert_eq!(tracker.streaks["alice"], 1);

        tracker.record_meow("alice", true).await.unwrap();
        tracker.record_meow("alice", true).await.unwrap();
        assert_eq!(tracker.streaks["alice"], 1);
        assert_eq!(tracker.counts["alice"], 3);
    }

    #[tokio::test]
    async fn counts_increment_regardless_of_channel() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = test_tracker(&dir, &["alice"]);

        tracker.record_meow("alice", false).await.unwrap();
        tracker.record_meow("alice", true).await.unwrap();
        tracker.record_meow("alice", false).await.unwrap();

        assert_eq!(tracker.counts["alice"], 3);
        // Only the target-channel meow touched the streak.
        assert_eq!(tracker.streaks["alice"], 1);
    }

    #[tokio::test]
    async fn off_channel_meow_does_not_claim_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = test_tracker(&dir, &["alice", "bob"]);

        tracker.record_meow("alice", false).await.unwrap();
        assert_eq!(tracker.first_meower, None);

        tracker.record_meow("bob", true).await.unwrap();
        tracker.record_meow("alice", true).await.unwrap();
        assert_eq!(tracker.first_meower.as_deref(), Some("bob"));
    }

    #[tokio::test]
    async fn rollover_zeroes_missing_users_and_clears_day() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = test_tracker(&dir, &["alice", "bob"]);
        tracker.streaks.insert("bob".to_string(), 7);

        tracker.record_meow("alice", true).await.unwrap();

        let missing = tracker.missing_today();
        assert_eq!(missing, vec!["bob".to_string()]);

        tracker.reset_missed_streaks(&missing).await.unwrap();
        assert_eq!(tracker.streaks["bob"], 0);
        assert_eq!(tracker.streaks["alice"], 1);

        tracker.reset_day();
        assert!(tracker.meowed_today.is_empty());
        assert_eq!(tracker.first_meower, None);
        // Next day, everyone is missing again until they meow.
        assert_eq!(tracker.missing_today().len(), 2);
    }

    #[tokio::test]
    async fn streak_report_keeps_configured_order_and_defaults_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = test_tracker(&dir, &["bob", "alice"]);
        tracker.streaks.insert("alice".to_string(), 3);

        let report = tracker.streak_report();
        assert_eq!(
            report,
            vec![("bob".to_string(), 0), ("alice".to_string(), 3)]
        );
    }

    #[tokio::test]
    async fn leaderboard_sorts_descending_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = test_tracker(&dir, &[]);
        tracker.counts.insert("a".to_string(), 5);
        tracker.counts.insert("b".to_string(), 9);
        tracker.counts.insert("c".to_string(), 1);

        let top = tracker.leaderboard(10);
        assert_eq!(
            top,
            vec![
                ("b".to_string(), 9),
                ("a".to_string(), 5),
                ("c".to_string(), 1)
            ]
        );

        assert_eq!(tracker.leaderboard(2).len(), 2);
    }

    #[tokio::test]
    async fn mutations_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = test_tracker(&dir, &["alice"]);
        tracker.record_meow("alice", true).await.unwrap();
        tracker.record_meow("alice", false).await.unwrap();

        let mut reloaded = test_tracker(&dir, &["alice"]);
        reloaded.streaks = crate::data::load_map(&dir.path().join("streaks.json"))
            .await
            .unwrap();
        reloaded.counts = crate::data::load_map(&dir.path().join("leaderboard.json"))
            .await
            .unwrap();

        assert_eq!(reloaded.streaks["alice"], 1);
        assert_eq!(reloaded.counts["alice"], 2);
        // The attendance set is memory-only and starts empty after restart.
        assert!(reloaded.meowed_today.is_empty());
    }
}
