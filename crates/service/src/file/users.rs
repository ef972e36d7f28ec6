use std::sync::Arc;

use models::{NewUser, User, UserPatch};
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::file::Collaborators;
use crate::storage::JsonMapStore;
use crate::stores::UserStore;

/// Users persisted as a JSON map `id -> User`.
#[derive(Clone)]
pub struct FileUserStore {
    store: Arc<JsonMapStore<String, User>>,
    ctx: Collaborators,
}

impl FileUserStore {
    /// Initialize the store from the given file path. Creates the file if missing.
    pub async fn new<P: Into<std::path::PathBuf>>(path: P, ctx: Collaborators) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<String, User>::new(path).await?;
        Ok(Arc::new(Self { store, ctx }))
    }

    pub fn in_memory(ctx: Collaborators) -> Arc<Self> {
        Arc::new(Self { store: JsonMapStore::in_memory(), ctx })
    }

    pub async fn list(&self) -> Vec<User> {
        self.store.values().await
    }

    pub async fn get(&self, id: &str) -> Option<User> {
        self.store.get(id).await
    }

    pub async fn exists(&self, id: &str) -> bool {
        self.store.contains_key(id).await
    }

    pub async fn exists_by_pseudo(&self, pseudo: &str) -> bool {
        let found = self.store.any_value(|u| u.pseudo == pseudo).await;
        debug!(%pseudo, found, "pseudo_lookup");
        found
    }

    pub async fn count(&self) -> usize {
        self.store.len().await
    }

    #[instrument(skip(self, input), fields(pseudo = %input.pseudo))]
    pub async fn add(&self, input: NewUser) -> Result<User, ServiceError> {
        input.validate()?;
        let _gate = self.ctx.gate.lock().await;
        let user = User::new(self.ctx.ids.next_id(), input, self.ctx.clock.now());
        self.store.insert(user.id.clone(), user.clone()).await?;
        info!(user_id = %user.id, "user_added");
        Ok(user)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: UserPatch) -> Result<User, ServiceError> {
        patch.validate()?;
        let _gate = self.ctx.gate.lock().await;
        let now = self.ctx.clock.now();
        let updated = self
            .store
            .update_map(|map| {
                let existing = map.get_mut(id).ok_or_else(|| ServiceError::not_found("user", id))?;
                existing.apply(patch, now);
                Ok(existing.clone())
            })
            .await?;
        info!(user_id = %id, "user_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<Option<User>, ServiceError> {
        let _gate = self.ctx.gate.lock().await;
        let removed = self.store.remove(id).await?;
        if removed.is_some() {
            info!(user_id = %id, "user_removed");
        }
        Ok(removed)
    }
}

#[async_trait::async_trait]
impl UserStore for FileUserStore {
    async fn list(&self) -> Vec<User> { self.list().await }
    async fn get(&self, id: &str) -> Option<User> { self.get(id).await }
    async fn exists(&self, id: &str) -> bool { self.exists(id).await }
    async fn exists_by_pseudo(&self, pseudo: &str) -> bool { self.exists_by_pseudo(pseudo).await }
    async fn count(&self) -> usize { self.count().await }
    async fn add(&self, input: NewUser) -> Result<User, ServiceError> { self.add(input).await }
    async fn update(&self, id: &str, patch: UserPatch) -> Result<User, ServiceError> { self.update(id, patch).await }
    async fn remove(&self, id: &str) -> Result<Option<User>, ServiceError> { self.remove(id).await }
}
