use async_trait::async_trait;
use dashmap::DashMap;
use domains::{DomainResult, ProfileStore, UserId, UserProfile};

/// Profile documents keyed by user id.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: DashMap<UserId, UserProfile>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, user: &UserId) -> DomainResult<Option<UserProfile>> {
        Ok(self.profiles.get(user).map(|p| p.clone()))
    }

    async fn put(&self, user: &UserId, profile: UserProfile) -> DomainResult<()> {
        self.profiles.insert(user.clone(), profile);
        Ok(())
    }
}
