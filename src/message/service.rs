use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use log::{error, warn};
use tokio::time::sleep;

use super::model::Message;
use super::repository::MessageRepository;
use crate::event;
use crate::event::model::{Notification, NotificationStream};
use crate::thread::service::ThreadService;
use crate::unread::repository::UnreadTracker;
use crate::{message, thread, unread, user};

const SUMMARY_RETRIES: u32 = 3;
const SUMMARY_RETRY_BASE_DELAY: Duration = Duration::from_millis(50);

#[async_trait]
pub trait MessageService {
    /// Validates and appends the message, then updates the thread
    /// summary and the counterpart's unread counter. The append is the
    /// durability point: once it succeeds the message is never rolled
    /// back, and follow-up failures only mean a stale summary.
    async fn create(
        &self,
        sender: &user::Id,
        thread_id: &thread::Id,
        text: &str,
    ) -> super::Result<Message>;

    async fn find_by_thread_id_and_params(
        &self,
        member: &user::Id,
        thread_id: &thread::Id,
        limit: Option<usize>,
        before: Option<i64>,
    ) -> super::Result<Vec<Message>>;

    /// Live message log: historical messages first, then each new
    /// append in arrival order. Dropping the stream unsubscribes.
    async fn subscribe(
        &self,
        member: &user::Id,
        thread_id: &thread::Id,
    ) -> super::Result<NotificationStream>;
}

#[derive(Clone)]
pub struct MessageServiceImpl {
    repo: message::Repository,
    thread_service: thread::Service,
    tracker: unread::Tracker,
    events: event::Service,
}

impl MessageServiceImpl {
    pub fn new(
        repo: message::Repository,
        thread_service: thread::Service,
        tracker: unread::Tracker,
        events: event::Service,
    ) -> Self {
        Self {
            repo,
            thread_service,
            tracker,
            events,
        }
    }
}

#[async_trait]
impl MessageService for MessageServiceImpl {
    async fn create(
        &self,
        sender: &user::Id,
        thread_id: &thread::Id,
        text: &str,
    ) -> super::Result<Message> {
        if text.trim().is_empty() {
            return Err(message::Error::EmptyText);
        }

        let counterpart = self.thread_service.counterpart(thread_id, sender).await?;

        let message = self.repo.append(thread_id, sender, text).await?;

        // Durable from here on.
        self.finalize(&message, &counterpart).await;

        Ok(message)
    }

    async fn find_by_thread_id_and_params(
        &self,
        member: &user::Id,
        thread_id: &thread::Id,
        limit: Option<usize>,
        before: Option<i64>,
    ) -> super::Result<Vec<Message>> {
        self.thread_service.check_member(thread_id, member).await?;

        self.repo
            .find_by_thread_id_paged(thread_id, limit, before)
            .await
    }

    async fn subscribe(
        &self,
        member: &user::Id,
        thread_id: &thread::Id,
    ) -> super::Result<NotificationStream> {
        self.thread_service.check_member(thread_id, member).await?;

        // Bus first, snapshot second. Anything appended in between is
        // in the snapshot and filtered out of the live tail by its
        // strictly increasing sent_at.
        let updates = self
            .events
            .subscribe(&event::Subject::Messages(thread_id.clone()));

        let history = self.repo.find_by_thread_id(thread_id).await?;
        let cursor = history.last().map(Message::sent_at).unwrap_or(i64::MIN);

        let mut live = updates.filter(move |n| {
            futures::future::ready(match n {
                Notification::NewMessage(m) => m.sent_at() > cursor,
                _ => false,
            })
        });

        let stream = async_stream::stream! {
            yield Notification::MessageSnapshot(history);

            while let Some(n) = live.next().await {
                yield n;
            }
        };

        Ok(Box::pin(stream))
    }
}

impl MessageServiceImpl {
    /// Best-effort follow-ups after a durable append: denormalized
    /// summary, unread counter, notifications. Retried with backoff and
    /// logged on exhaustion, never propagated to the sender.
    async fn finalize(&self, message: &Message, counterpart: &user::Id) {
        let last_message = message.to_last_message();
        let thread_id = message.thread_id();

        let mut delay = SUMMARY_RETRY_BASE_DELAY;
        for attempt in 1..=SUMMARY_RETRIES {
            match self
                .thread_service
                .update_last_message(thread_id, &last_message)
                .await
            {
                Ok(()) => break,
                Err(e) if attempt == SUMMARY_RETRIES => {
                    error!("giving up on summary update for {thread_id}: {e:?}");
                }
                Err(e) => {
                    warn!("summary update for {thread_id} failed (attempt {attempt}): {e:?}");
                    sleep(delay).await;
                    delay *= 2;
                }
            }
        }

        self.tracker.increment(thread_id, counterpart).await;

        self.events.publish(
            &event::Subject::Messages(thread_id.clone()),
            Notification::NewMessage(message.clone()),
        );

        for member in [message.sender(), counterpart] {
            self.events.publish(
                &event::Subject::Notifications(member.clone()),
                Notification::ThreadUpdated {
                    id: thread_id.clone(),
                    last_message: last_message.clone(),
                },
            );
        }
    }
}
