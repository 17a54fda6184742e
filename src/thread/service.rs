use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use futures::StreamExt;
use futures::future::join_all;
use log::warn;

use super::model::{Thread, ThreadDto};
use super::repository::ThreadRepository;
use super::{Id, Key};
use crate::event;
use crate::event::model::{Notification, NotificationStream};
use crate::message::model::LastMessage;
use crate::unread::repository::UnreadTracker;
use crate::user::model::Profile;
use crate::user::repository::ProfileResolver;
use crate::{thread, unread, user};

#[async_trait]
pub trait ThreadService {
    /// Returns the single thread for the unordered pair, creating it if
    /// missing. The boolean is true when this call created the thread.
    async fn get_or_create(
        &self,
        me: &user::Id,
        counterpart: &user::Id,
        context_label: Option<&str>,
    ) -> super::Result<(ThreadDto, bool)>;

    async fn find_by_id_and_member(&self, id: &Id, member: &user::Id)
    -> super::Result<ThreadDto>;

    async fn find_all(&self, member: &user::Id) -> super::Result<Vec<ThreadDto>>;

    async fn check_member(&self, id: &Id, member: &user::Id) -> super::Result<()>;

    /// The other member of the thread, with a membership check on `member`.
    async fn counterpart(&self, id: &Id, member: &user::Id) -> super::Result<user::Id>;

    async fn update_last_message(&self, id: &Id, msg: &LastMessage) -> super::Result<()>;

    async fn mark_read(&self, id: &Id, member: &user::Id) -> super::Result<()>;

    /// Live thread list: yields the current snapshot first, then one
    /// notification per change. Dropping the stream unsubscribes.
    async fn subscribe(&self, member: &user::Id) -> super::Result<NotificationStream>;
}

#[derive(Clone)]
pub struct ThreadServiceImpl {
    repo: thread::Repository,
    profiles: user::Profiles,
    tracker: unread::Tracker,
    events: event::Service,
}

impl ThreadServiceImpl {
    pub fn new(
        repo: thread::Repository,
        profiles: user::Profiles,
        tracker: unread::Tracker,
        events: event::Service,
    ) -> Self {
        Self {
            repo,
            profiles,
            tracker,
            events,
        }
    }
}

#[async_trait]
impl ThreadService for ThreadServiceImpl {
    async fn get_or_create(
        &self,
        me: &user::Id,
        counterpart: &user::Id,
        context_label: Option<&str>,
    ) -> super::Result<(ThreadDto, bool)> {
        let key = Key::of(me, counterpart)?;

        if let Some(existing) = self.repo.find_by_key(&key).await? {
            let dto = self.to_dto(&existing, me).await?;
            return Ok((dto, false));
        }

        // Profiles are resolved on the create path only; the found path
        // reuses the snapshots already stored on the thread.
        let info = self.snapshot_profiles(me, counterpart).await?;
        let thread = Thread::new(
            key.clone(),
            [me.clone(), counterpart.clone()],
            info,
            context_label.map(str::to_owned),
        );

        match self.repo.create(thread.clone()).await {
            Ok(()) => {
                for member in thread.participants() {
                    let dto = self.to_dto(&thread, member).await?;
                    self.events.publish(
                        &event::Subject::Notifications(member.clone()),
                        Notification::NewThread(dto),
                    );
                }

                let dto = self.to_dto(&thread, me).await?;
                Ok((dto, true))
            }
            Err(thread::Error::AlreadyExists(_)) => {
                // Lost the create race; the committed thread wins.
                let winner = self
                    .repo
                    .find_by_key(&key)
                    .await?
                    .ok_or(thread::Error::NotFound(None))?;

                let dto = self.to_dto(&winner, me).await?;
                Ok((dto, false))
            }
            Err(e) => Err(e),
        }
    }

    async fn find_by_id_and_member(
        &self,
        id: &Id,
        member: &user::Id,
    ) -> super::Result<ThreadDto> {
        let thread = self.repo.find_by_id(id).await?;
        self.to_dto(&thread, member).await
    }

    async fn find_all(&self, member: &user::Id) -> super::Result<Vec<ThreadDto>> {
        let threads = self.repo.find_by_member(member).await?;
        let deduplicated = dedup_by_key(threads);

        let dtos = join_all(
            deduplicated
                .iter()
                .map(|t| async { self.to_dto(t, member).await }),
        )
        .await;

        dtos.into_iter().collect()
    }

    async fn check_member(&self, id: &Id, member: &user::Id) -> super::Result<()> {
        let thread = self.repo.find_by_id(id).await?;

        if !thread.contains(member) {
            return Err(thread::Error::NotMember);
        }

        Ok(())
    }

    async fn counterpart(&self, id: &Id, member: &user::Id) -> super::Result<user::Id> {
        let thread = self.repo.find_by_id(id).await?;

        thread
            .counterpart_of(member)
            .cloned()
            .ok_or(thread::Error::NotMember)
    }

    async fn update_last_message(&self, id: &Id, msg: &LastMessage) -> super::Result<()> {
        self.repo.update_last_message(id, msg).await
    }

    async fn mark_read(&self, id: &Id, member: &user::Id) -> super::Result<()> {
        self.check_member(id, member).await?;
        self.tracker.clear(id, member).await;

        self.events.publish(
            &event::Subject::Notifications(member.clone()),
            Notification::Read {
                thread_id: id.clone(),
            },
        );

        Ok(())
    }

    async fn subscribe(&self, member: &user::Id) -> super::Result<NotificationStream> {
        // Subscribing before the snapshot read means a change landing in
        // between shows up twice at most, never not at all.
        let mut updates = self
            .events
            .subscribe(&event::Subject::Notifications(member.clone()));

        let snapshot = self.find_all(member).await?;

        let stream = async_stream::stream! {
            yield Notification::ThreadSnapshot(snapshot);

            while let Some(n) = updates.next().await {
                yield n;
            }
        };

        Ok(Box::pin(stream))
    }
}

impl ThreadServiceImpl {
    async fn snapshot_profiles(
        &self,
        me: &user::Id,
        counterpart: &user::Id,
    ) -> super::Result<HashMap<user::Id, Profile>> {
        let mut info = HashMap::with_capacity(2);

        for id in [me, counterpart] {
            let profile = match self.profiles.get_profile(id).await? {
                Some(p) => p,
                None => {
                    warn!("no profile for {id}, falling back to the raw id");
                    Profile::new(id.to_string(), None)
                }
            };
            info.insert(id.clone(), profile);
        }

        Ok(info)
    }

    async fn to_dto(&self, thread: &Thread, member: &user::Id) -> super::Result<ThreadDto> {
        let counterpart = thread
            .counterpart_of(member)
            .ok_or(thread::Error::NotMember)?;

        let unread = self.tracker.count(thread.id(), member).await;

        Ok(ThreadDto::new(thread, counterpart, unread))
    }
}

/// Defensive pass against legacy key drift: a record whose stored key
/// predates the canonical derivation is grouped with its recomputed
/// key, so one conversation never renders twice. Input is ordered most
/// recent first and the first occurrence wins.
fn dedup_by_key(threads: Vec<Thread>) -> Vec<Thread> {
    let mut seen = HashSet::with_capacity(threads.len());

    threads
        .into_iter()
        .filter(|t| {
            let [a, b] = t.participants();
            let key = Key::of(a, b).unwrap_or_else(|_| t.key().clone());
            seen.insert(key)
        })
        .collect()
}
