use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::Profile;
use crate::user;

/// Profile directory seam. The platform's user records live elsewhere;
/// this resolver only answers "what does this user look like" for
/// participant snapshots and exposes the upsert the sync job calls.
#[async_trait]
pub trait ProfileResolver {
    async fn get_profile(&self, id: &user::Id) -> super::Result<Option<Profile>>;

    async fn upsert(&self, id: &user::Id, profile: Profile) -> super::Result<()>;
}

pub struct InMemoryProfiles {
    profiles: RwLock<HashMap<user::Id, Profile>>,
}

impl InMemoryProfiles {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryProfiles {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileResolver for InMemoryProfiles {
    async fn get_profile(&self, id: &user::Id) -> super::Result<Option<Profile>> {
        Ok(self.profiles.read().await.get(id).cloned())
    }

    async fn upsert(&self, id: &user::Id, profile: Profile) -> super::Result<()> {
        self.profiles.write().await.insert(id.clone(), profile);
        Ok(())
    }
}
