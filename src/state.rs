use std::sync::Arc;

use axum::extract::FromRef;

use crate::contact::service::ContactServiceImpl;
use crate::event::service::EventService;
use crate::integration::Config;
use crate::message::repository::InMemoryMessageRepository;
use crate::message::service::MessageServiceImpl;
use crate::thread::repository::InMemoryThreadRepository;
use crate::thread::service::ThreadServiceImpl;
use crate::unread::repository::InMemoryUnreadTracker;
use crate::user::repository::InMemoryProfiles;
use crate::{contact, event, message, thread, unread, user};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub profiles: user::Profiles,
    pub tracker: unread::Tracker,
    pub events: event::Service,
    pub thread_service: thread::Service,
    pub message_service: message::Service,
    pub contact_service: contact::Service,
}

impl AppState {
    pub fn init(config: &Config) -> Self {
        let events: event::Service = Arc::new(EventService::new());
        let profiles: user::Profiles = Arc::new(InMemoryProfiles::new());
        let tracker: unread::Tracker = Arc::new(InMemoryUnreadTracker::new());

        let thread_repo: thread::Repository = Arc::new(InMemoryThreadRepository::new());
        let thread_service: thread::Service = Arc::new(ThreadServiceImpl::new(
            thread_repo,
            profiles.clone(),
            tracker.clone(),
            events.clone(),
        ));

        let message_repo: message::Repository = Arc::new(InMemoryMessageRepository::new());
        let message_service: message::Service = Arc::new(MessageServiceImpl::new(
            message_repo,
            thread_service.clone(),
            tracker.clone(),
            events.clone(),
        ));

        let contact_service: contact::Service = Arc::new(ContactServiceImpl::new(
            config.admin.clone(),
            thread_service.clone(),
            message_service.clone(),
        ));

        Self {
            profiles,
            tracker,
            events,
            thread_service,
            message_service,
            contact_service,
        }
    }
}
