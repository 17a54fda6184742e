use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Id, Key};
use crate::message::model::LastMessage;
use crate::user;
use crate::user::model::Profile;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Thread {
    id: Id,
    key: Key,
    participants: [user::Id; 2],
    /// Display snapshots captured at creation time; may go stale.
    participant_info: HashMap<user::Id, Profile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_message: Option<LastMessage>,
    created_at: i64,
}

impl Thread {
    pub fn new(
        key: Key,
        participants: [user::Id; 2],
        participant_info: HashMap<user::Id, Profile>,
        context_label: Option<String>,
    ) -> Self {
        Self {
            id: Id::random(),
            key,
            participants,
            participant_info,
            context_label,
            last_message: None,
            created_at: chrono::Utc::now().timestamp_micros(),
        }
    }

    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub const fn key(&self) -> &Key {
        &self.key
    }

    pub const fn participants(&self) -> &[user::Id; 2] {
        &self.participants
    }

    pub fn participant_info(&self) -> &HashMap<user::Id, Profile> {
        &self.participant_info
    }

    pub fn context_label(&self) -> Option<&str> {
        self.context_label.as_deref()
    }

    pub const fn last_message(&self) -> Option<&LastMessage> {
        self.last_message.as_ref()
    }

    pub const fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn contains(&self, member: &user::Id) -> bool {
        self.participants.contains(member)
    }

    pub fn counterpart_of(&self, member: &user::Id) -> Option<&user::Id> {
        match &self.participants {
            [a, b] if a == member => Some(b),
            [a, b] if b == member => Some(a),
            _ => None,
        }
    }

    /// Sort key for the thread list: time of the last message, falling
    /// back to creation time for threads nobody has written to yet.
    pub fn activity_at(&self) -> i64 {
        self.last_message
            .as_ref()
            .map(LastMessage::sent_at)
            .unwrap_or(self.created_at)
    }

    pub(super) fn set_last_message(&mut self, msg: LastMessage) {
        self.last_message = Some(msg);
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ThreadDto {
    id: Id,
    counterpart: user::Id,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_message: Option<LastMessage>,
    unread: u64,
    created_at: i64,
}

impl ThreadDto {
    pub fn new(thread: &Thread, counterpart: &user::Id, unread: u64) -> Self {
        let info = thread.participant_info().get(counterpart);

        Self {
            id: thread.id().clone(),
            counterpart: counterpart.clone(),
            name: info
                .map(|p| p.display_name().to_owned())
                .unwrap_or_else(|| counterpart.to_string()),
            avatar: info.and_then(|p| p.avatar().map(str::to_owned)),
            context_label: thread.context_label().map(str::to_owned),
            last_message: thread.last_message().cloned(),
            unread,
            created_at: thread.created_at(),
        }
    }

    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub const fn counterpart(&self) -> &user::Id {
        &self.counterpart
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    pub fn context_label(&self) -> Option<&str> {
        self.context_label.as_deref()
    }

    pub const fn last_message(&self) -> Option<&LastMessage> {
        self.last_message.as_ref()
    }

    pub const fn unread(&self) -> u64 {
        self.unread
    }
}
