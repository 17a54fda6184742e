use std::pin::Pin;

use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::message::model::{LastMessage, Message};
use crate::thread;
use crate::thread::model::ThreadDto;

pub type NotificationStream = Pin<Box<dyn Stream<Item = Notification> + Send>>;

/// What subscribers receive. Snapshot variants are only ever the first
/// item of a subscription; everything after is a diff.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    ThreadSnapshot(Vec<ThreadDto>),
    NewThread(ThreadDto),
    ThreadUpdated {
        id: thread::Id,
        last_message: LastMessage,
    },
    MessageSnapshot(Vec<Message>),
    NewMessage(Message),
    Read {
        thread_id: thread::Id,
    },
}

/// Client-to-server frames on the websocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    SubscribeThreads,
    SubscribeMessages { thread_id: thread::Id },
}
