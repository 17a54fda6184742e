use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::{Message, SendClock};
use crate::{thread, user};

#[async_trait]
pub trait MessageRepository {
    /// Appends to the thread's log. The repository assigns the id and
    /// the `sent_at` timestamp; each append is independently atomic, so
    /// concurrent senders need no coordination.
    async fn append(
        &self,
        thread_id: &thread::Id,
        sender: &user::Id,
        text: &str,
    ) -> super::Result<Message>;

    /// Full log, ascending by `sent_at`.
    async fn find_by_thread_id(&self, thread_id: &thread::Id) -> super::Result<Vec<Message>>;

    /// Page of the log ending before `before` (exclusive), ascending,
    /// at most `limit` entries when given.
    async fn find_by_thread_id_paged(
        &self,
        thread_id: &thread::Id,
        limit: Option<usize>,
        before: Option<i64>,
    ) -> super::Result<Vec<Message>>;
}

pub struct InMemoryMessageRepository {
    clock: SendClock,
    logs: RwLock<HashMap<thread::Id, Vec<Message>>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self {
            clock: SendClock::new(),
            logs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(
        &self,
        thread_id: &thread::Id,
        sender: &user::Id,
        text: &str,
    ) -> super::Result<Message> {
        let mut logs = self.logs.write().await;

        // Timestamp assigned under the lock, so log order and sent_at
        // order never diverge.
        let message = Message::new(thread_id.clone(), sender.clone(), text, self.clock.next());
        logs.entry(thread_id.clone())
            .or_default()
            .push(message.clone());

        Ok(message)
    }

    async fn find_by_thread_id(&self, thread_id: &thread::Id) -> super::Result<Vec<Message>> {
        let logs = self.logs.read().await;

        Ok(logs.get(thread_id).cloned().unwrap_or_default())
    }

    async fn find_by_thread_id_paged(
        &self,
        thread_id: &thread::Id,
        limit: Option<usize>,
        before: Option<i64>,
    ) -> super::Result<Vec<Message>> {
        let logs = self.logs.read().await;

        let log = logs.get(thread_id).map(Vec::as_slice).unwrap_or_default();

        let upper = match before {
            Some(before) => log.partition_point(|m| m.sent_at() < before),
            None => log.len(),
        };

        let lower = match limit {
            Some(limit) => upper.saturating_sub(limit),
            None => 0,
        };

        Ok(log[lower..upper].to_vec())
    }
}
