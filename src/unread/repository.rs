use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{thread, user};

/// Per-thread, per-member unread counters. Incremented once for every
/// message whose sender is the other member, reset when the member
/// opens the thread. The counters are derived data: a lost update
/// self-heals on the next send or read, so the operations are
/// deliberately infallible for callers.
#[async_trait]
pub trait UnreadTracker {
    async fn increment(&self, thread_id: &thread::Id, member: &user::Id);

    async fn clear(&self, thread_id: &thread::Id, member: &user::Id);

    async fn count(&self, thread_id: &thread::Id, member: &user::Id) -> u64;

    /// Sum across all of the member's threads, for the badge.
    async fn total_for(&self, member: &user::Id) -> u64;
}

pub struct InMemoryUnreadTracker {
    counters: RwLock<HashMap<user::Id, HashMap<thread::Id, u64>>>,
}

impl InMemoryUnreadTracker {
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUnreadTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UnreadTracker for InMemoryUnreadTracker {
    async fn increment(&self, thread_id: &thread::Id, member: &user::Id) {
        let mut counters = self.counters.write().await;

        *counters
            .entry(member.clone())
            .or_default()
            .entry(thread_id.clone())
            .or_insert(0) += 1;
    }

    async fn clear(&self, thread_id: &thread::Id, member: &user::Id) {
        let mut counters = self.counters.write().await;

        if let Some(threads) = counters.get_mut(member) {
            threads.remove(thread_id);
        }
    }

    async fn count(&self, thread_id: &thread::Id, member: &user::Id) -> u64 {
        let counters = self.counters.read().await;

        counters
            .get(member)
            .and_then(|threads| threads.get(thread_id))
            .copied()
            .unwrap_or(0)
    }

    async fn total_for(&self, member: &user::Id) -> u64 {
        let counters = self.counters.read().await;

        counters
            .get(member)
            .map(|threads| threads.values().sum())
            .unwrap_or(0)
    }
}
