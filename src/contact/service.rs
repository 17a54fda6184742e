use async_trait::async_trait;
use log::info;

use crate::message::service::MessageService;
use crate::thread::model::ThreadDto;
use crate::thread::service::ThreadService;
use crate::{message, thread, user};

#[async_trait]
pub trait ContactService {
    /// Opens (or reopens) the conversation with a fixed counterparty,
    /// the configured administrator by default. A newly created thread
    /// is seeded with one greeting authored by the caller; an existing
    /// thread is returned untouched, so calling this twice never
    /// duplicates the greeting.
    async fn contact(
        &self,
        me: &user::Id,
        counterpart: Option<&user::Id>,
        context_label: Option<&str>,
    ) -> super::Result<ThreadDto>;
}

#[derive(Clone)]
pub struct ContactServiceImpl {
    admin: user::Id,
    thread_service: thread::Service,
    message_service: message::Service,
}

impl ContactServiceImpl {
    pub fn new(
        admin: user::Id,
        thread_service: thread::Service,
        message_service: message::Service,
    ) -> Self {
        Self {
            admin,
            thread_service,
            message_service,
        }
    }
}

#[async_trait]
impl ContactService for ContactServiceImpl {
    async fn contact(
        &self,
        me: &user::Id,
        counterpart: Option<&user::Id>,
        context_label: Option<&str>,
    ) -> super::Result<ThreadDto> {
        let counterpart = counterpart.unwrap_or(&self.admin);

        let (dto, created) = self
            .thread_service
            .get_or_create(me, counterpart, context_label)
            .await?;

        if created {
            info!("seeding greeting for new contact thread {}", dto.id());

            // Seeded through the regular send path so the summary,
            // unread counter and notifications stay consistent.
            self.message_service
                .create(me, dto.id(), &greeting(context_label))
                .await?;
        }

        // Re-read so the returned summary reflects the seeding.
        let dto = self.thread_service.find_by_id_and_member(dto.id(), me).await?;

        Ok(dto)
    }
}

fn greeting(context_label: Option<&str>) -> String {
    match context_label {
        Some(label) => format!("Hello! I need help with {label}."),
        None => "Hello! I need some assistance.".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::greeting;

    #[test]
    fn greeting_embeds_context_label() {
        assert_eq!(
            "Hello! I need help with Donation: Chairs.",
            greeting(Some("Donation: Chairs"))
        );
        assert_eq!("Hello! I need some assistance.", greeting(None));
    }
}
