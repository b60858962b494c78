use crate::tracker::Tracker;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to the tracker. The message handler and the rollover job
/// are the only writers; each takes the write lock for the full span of a
/// mutation plus its persist, so a user's meow is one critical section.
pub type SharedTracker = Arc<RwLock<Tracker>>;

pub fn shared(tracker: Tracker) -> SharedTracker {
    Arc::new(RwLock::new(tracker))
}
