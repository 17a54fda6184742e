#![allow(dead_code)]

use std::sync::Arc;

use donation_chat_service::contact::service::ContactServiceImpl;
use donation_chat_service::event::service::EventService;
use donation_chat_service::message::repository::InMemoryMessageRepository;
use donation_chat_service::message::service::MessageServiceImpl;
use donation_chat_service::thread::repository::InMemoryThreadRepository;
use donation_chat_service::thread::service::ThreadServiceImpl;
use donation_chat_service::unread::repository::InMemoryUnreadTracker;
use donation_chat_service::user::model::Profile;
use donation_chat_service::user::repository::{InMemoryProfiles, ProfileResolver};
use donation_chat_service::{contact, event, message, thread, unread, user};

pub const ADMIN: &str = "admin";

pub struct Stack {
    pub threads: thread::Service,
    pub messages: message::Service,
    pub contacts: contact::Service,
    pub tracker: unread::Tracker,
    pub profiles: user::Profiles,
    pub thread_repo: thread::Repository,
    pub events: event::Service,
}

pub fn stack() -> Stack {
    let events: event::Service = Arc::new(EventService::new());
    let profiles: user::Profiles = Arc::new(InMemoryProfiles::new());
    let tracker: unread::Tracker = Arc::new(InMemoryUnreadTracker::new());

    let thread_repo: thread::Repository = Arc::new(InMemoryThreadRepository::new());
    let threads: thread::Service = Arc::new(ThreadServiceImpl::new(
        thread_repo.clone(),
        profiles.clone(),
        tracker.clone(),
        events.clone(),
    ));

    let message_repo: message::Repository = Arc::new(InMemoryMessageRepository::new());
    let messages: message::Service = Arc::new(MessageServiceImpl::new(
        message_repo,
        threads.clone(),
        tracker.clone(),
        events.clone(),
    ));

    let contacts: contact::Service = Arc::new(ContactServiceImpl::new(
        user::Id::from(ADMIN),
        threads.clone(),
        messages.clone(),
    ));

    Stack {
        threads,
        messages,
        contacts,
        tracker,
        profiles,
        thread_repo,
        events,
    }
}

pub async fn register_profile(stack: &Stack, id: &str, name: &str) {
    stack
        .profiles
        .upsert(&user::Id::from(id), Profile::new(name, None))
        .await
        .expect("profile upsert should not fail");
}
