use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::Thread;
use super::{Id, Key};
use crate::message::model::LastMessage;
use crate::{thread, user};

#[async_trait]
pub trait ThreadRepository {
    /// Persists a new thread. The canonical key acts as a uniqueness
    /// constraint: a concurrent create for the same pair that already
    /// committed makes this fail with [`super::Error::AlreadyExists`],
    /// and the caller falls back to a read.
    async fn create(&self, thread: Thread) -> super::Result<()>;

    async fn find_by_id(&self, id: &Id) -> super::Result<Thread>;

    async fn find_by_key(&self, key: &Key) -> super::Result<Option<Thread>>;

    /// All threads the user is a member of, most recent activity first.
    async fn find_by_member(&self, member: &user::Id) -> super::Result<Vec<Thread>>;

    /// Overwrites the denormalized summary. Last-write-wins by
    /// `sent_at`, so retries and reordered deliveries are harmless.
    async fn update_last_message(&self, id: &Id, msg: &LastMessage) -> super::Result<()>;
}

#[derive(Default)]
struct Indexes {
    by_id: HashMap<Id, Thread>,
    by_key: HashMap<Key, Id>,
}

/// Store backed by process memory. Each method takes the write or read
/// lock once, which gives the same per-document atomicity a remote
/// document store would offer.
pub struct InMemoryThreadRepository {
    indexes: RwLock<Indexes>,
}

impl InMemoryThreadRepository {
    pub fn new() -> Self {
        Self {
            indexes: RwLock::new(Indexes::default()),
        }
    }
}

impl Default for InMemoryThreadRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ThreadRepository for InMemoryThreadRepository {
    async fn create(&self, thread: Thread) -> super::Result<()> {
        let mut idx = self.indexes.write().await;

        if idx.by_key.contains_key(thread.key()) {
            return Err(thread::Error::AlreadyExists(thread.key().clone()));
        }

        idx.by_key.insert(thread.key().clone(), thread.id().clone());
        idx.by_id.insert(thread.id().clone(), thread);

        Ok(())
    }

    async fn find_by_id(&self, id: &Id) -> super::Result<Thread> {
        self.indexes
            .read()
            .await
            .by_id
            .get(id)
            .cloned()
            .ok_or(thread::Error::NotFound(Some(id.to_owned())))
    }

    async fn find_by_key(&self, key: &Key) -> super::Result<Option<Thread>> {
        let idx = self.indexes.read().await;
        let thread = idx.by_key.get(key).and_then(|id| idx.by_id.get(id));

        Ok(thread.cloned())
    }

    async fn find_by_member(&self, member: &user::Id) -> super::Result<Vec<Thread>> {
        let idx = self.indexes.read().await;

        let mut threads = idx
            .by_id
            .values()
            .filter(|t| t.contains(member))
            .cloned()
            .collect::<Vec<_>>();

        threads.sort_by_key(|t| std::cmp::Reverse(t.activity_at()));

        Ok(threads)
    }

    async fn update_last_message(&self, id: &Id, msg: &LastMessage) -> super::Result<()> {
        let mut idx = self.indexes.write().await;

        let thread = idx
            .by_id
            .get_mut(id)
            .ok_or(thread::Error::NotFound(Some(id.to_owned())))?;

        let stale = thread
            .last_message()
            .is_some_and(|current| current.sent_at() > msg.sent_at());

        if !stale {
            thread.set_last_message(msg.clone());
        }

        Ok(())
    }
}
