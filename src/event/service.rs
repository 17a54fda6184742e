use log::{debug, warn};
use tokio::sync::broadcast;

use super::Subject;
use super::model::{Notification, NotificationStream};

const BUS_CAPACITY: usize = 256;

/// In-process notification bus. Everything goes over one broadcast
/// channel; subscribers filter by subject. Dropping the returned stream
/// is the unsubscribe.
pub struct EventService {
    tx: broadcast::Sender<(Subject, Notification)>,
}

impl EventService {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, subject: &Subject, notification: Notification) {
        if self.tx.send((subject.clone(), notification)).is_err() {
            debug!("no active subscribers for {subject:?}");
        }
    }

    pub fn subscribe(&self, subject: &Subject) -> NotificationStream {
        let mut rx = self.tx.subscribe();
        let subject = subject.clone();

        Box::pin(async_stream::stream! {
            loop {
                match rx.recv().await {
                    Ok((s, n)) if s == subject => yield n,
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("subscriber of {subject:?} lagged, skipped {skipped} notifications");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for EventService {
    fn default() -> Self {
        Self::new()
    }
}
