use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};

use super::Id;
use crate::{thread, user};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Message {
    id: Id,
    thread_id: thread::Id,
    sender: user::Id,
    text: String,
    /// Server-assigned, strictly increasing. The ordering key for the
    /// whole stream; never taken from the client.
    sent_at: i64,
}

impl Message {
    pub fn new(thread_id: thread::Id, sender: user::Id, text: &str, sent_at: i64) -> Self {
        Self {
            id: Id::random(),
            thread_id,
            sender,
            text: text.to_string(),
            sent_at,
        }
    }

    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub const fn thread_id(&self) -> &thread::Id {
        &self.thread_id
    }

    pub const fn sender(&self) -> &user::Id {
        &self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn sent_at(&self) -> i64 {
        self.sent_at
    }

    pub fn to_last_message(&self) -> LastMessage {
        LastMessage {
            text: self.text.clone(),
            sender: self.sender.clone(),
            sent_at: self.sent_at,
        }
    }
}

/// Denormalized summary stored on the owning thread so the thread list
/// renders without reading the message log.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct LastMessage {
    text: String,
    sender: user::Id,
    sent_at: i64,
}

impl LastMessage {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn sender(&self) -> &user::Id {
        &self.sender
    }

    pub const fn sent_at(&self) -> i64 {
        self.sent_at
    }
}

/// Monotonic send clock, microsecond resolution. Wall-clock time is
/// taken as a base but never replayed: two calls can share a wall
/// instant, the second still gets a larger value. This keeps `sent_at`
/// a total order even when senders race.
pub struct SendClock {
    last: AtomicI64,
}

impl SendClock {
    pub fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    pub fn next(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_micros();
        let mut prev = self.last.load(Ordering::Relaxed);

        loop {
            let next = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(current) => prev = current,
            }
        }
    }
}

impl Default for SendClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_strictly_increasing() {
        let clock = SendClock::new();

        let mut prev = clock.next();
        for _ in 0..10_000 {
            let next = clock.next();
            assert!(next > prev);
            prev = next;
        }
    }
}
