use std::sync::Arc;

use models::{Item, ItemPatch, NewItem};
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::file::Collaborators;
use crate::storage::JsonMapStore;
use crate::stores::{ItemStore, UserStore};

/// Items persisted as a JSON map `id -> Item`. Owner lookups go through `users`.
#[derive(Clone)]
pub struct FileItemStore {
    store: Arc<JsonMapStore<String, Item>>,
    users: Arc<dyn UserStore>,
    ctx: Collaborators,
}

impl FileItemStore {
    pub async fn new<P: Into<std::path::PathBuf>>(
        path: P,
        users: Arc<dyn UserStore>,
        ctx: Collaborators,
    ) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<String, Item>::new(path).await?;
        Ok(Arc::new(Self { store, users, ctx }))
    }

    pub fn in_memory(users: Arc<dyn UserStore>, ctx: Collaborators) -> Arc<Self> {
        Arc::new(Self { store: JsonMapStore::in_memory(), users, ctx })
    }

    pub async fn list(&self) -> Vec<Item> {
        self.store.values().await
    }

    pub async fn get(&self, id: &str) -> Option<Item> {
        self.store.get(id).await
    }

    pub async fn exists(&self, id: &str) -> bool {
        self.store.contains_key(id).await
    }

    pub async fn count(&self) -> usize {
        self.store.len().await
    }

    pub async fn list_by_owner(&self, owner_id: &str) -> Vec<Item> {
        self.store.filter_values(|i| i.owner_id == owner_id).await
    }

    pub async fn check_user(&self, user_id: &str) -> bool {
        self.users.exists(user_id).await
    }

    /// Create an item. The owner is not looked up here; see `check_user`.
    #[instrument(skip(self, input), fields(owner_id = %input.owner_id))]
    pub async fn create(&self, input: NewItem) -> Result<Item, ServiceError> {
        input.validate()?;
        let _gate = self.ctx.gate.lock().await;
        let item = Item::new(self.ctx.ids.next_id(), input, self.ctx.clock.now());
        self.store.insert(item.id.clone(), item.clone()).await?;
        info!(item_id = %item.id, owner_id = %item.owner_id, "item_created");
        Ok(item)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: ItemPatch) -> Result<Item, ServiceError> {
        let _gate = self.ctx.gate.lock().await;
        let now = self.ctx.clock.now();
        let updated = self
            .store
            .update_map(|map| {
                let existing = map.get_mut(id).ok_or_else(|| ServiceError::not_found("item", id))?;
                existing.apply(patch, now);
                Ok(existing.clone())
            })
            .await?;
        info!(item_id = %id, "item_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn transfer_ownership(&self, id: &str, new_owner_id: &str) -> Result<Item, ServiceError> {
        let _gate = self.ctx.gate.lock().await;
        if !self.store.contains_key(id).await {
            return Err(ServiceError::not_found("item", id));
        }
        if !self.check_user(new_owner_id).await {
            warn!(item_id = %id, owner_id = %new_owner_id, "transfer_rejected_unknown_owner");
            return Err(ServiceError::InvalidOwner(new_owner_id.to_string()));
        }
        let now = self.ctx.clock.now();
        let (previous_owner, item) = self
            .store
            .update_map(|map| {
                let existing = map.get_mut(id).ok_or_else(|| ServiceError::not_found("item", id))?;
                let previous = existing.owner_id.clone();
                existing.transfer_to(new_owner_id.to_string(), now);
                Ok((previous, existing.clone()))
            })
            .await?;
        info!(item_id = %id, from = %previous_owner, to = %new_owner_id, "item_transferred");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<Option<Item>, ServiceError> {
        let _gate = self.ctx.gate.lock().await;
        let removed = self.store.remove(id).await?;
        if removed.is_some() {
            info!(item_id = %id, "item_deleted");
        }
        Ok(removed)
    }
}

#[async_trait::async_trait]
impl ItemStore for FileItemStore {
    async fn list(&self) -> Vec<Item> { self.list().await }
    async fn get(&self, id: &str) -> Option<Item> { self.get(id).await }
    async fn exists(&self, id: &str) -> bool { self.exists(id).await }
    async fn count(&self) -> usize { self.count().await }
    async fn list_by_owner(&self, owner_id: &str) -> Vec<Item> { self.list_by_owner(owner_id).await }
    async fn check_user(&self, user_id: &str) -> bool { self.check_user(user_id).await }
    async fn create(&self, input: NewItem) -> Result<Item, ServiceError> { self.create(input).await }
    async fn update(&self, id: &str, patch: ItemPatch) -> Result<Item, ServiceError> { self.update(id, patch).await }
    async fn transfer_ownership(&self, id: &str, new_owner_id: &str) -> Result<Item, ServiceError> {
        self.transfer_ownership(id, new_owner_id).await
    }
    async fn delete(&self, id: &str) -> Result<Option<Item>, ServiceError> { self.delete(id).await }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::file::FileUserStore;
    use crate::ids::SequentialIds;
    use models::NewUser;

    struct Fixture {
        clock: Arc<ManualClock>,
        users: Arc<FileUserStore>,
        items: Arc<FileItemStore>,
    }

    fn setup() -> Fixture {
        let clock = Arc::new(ManualClock::starting_at(100));
        let ctx = Collaborators::new(clock.clone(), Arc::new(SequentialIds::new("rec")));
        let users = FileUserStore::in_memory(ctx.clone());
        let items = FileItemStore::in_memory(users.clone(), ctx);
        Fixture { clock, users, items }
    }

    async fn add_user(f: &Fixture, pseudo: &str) -> Result<String, ServiceError> {
        let user = f.users.add(NewUser { pseudo: pseudo.into(), name: pseudo.into() }).await?;
        Ok(user.id)
    }

    fn drill(owner_id: &str) -> NewItem {
        NewItem { description: "drill".into(), image_url: "https://img/drill.png".into(), owner_id: owner_id.into() }
    }

    #[tokio::test]
    async fn create_does_not_look_up_owner() -> Result<(), anyhow::Error> {
        let f = setup();
        assert!(!f.items.check_user("ghost").await);
        let item = f.items.create(drill("ghost")).await?;
        assert_eq!(item.owner_id, "ghost");
        assert_eq!(item.created_at, item.updated_at);
        assert_eq!(f.items.get(&item.id).await, Some(item));
        Ok(())
    }

    #[tokio::test]
    async fn update_merges_description_only() -> Result<(), anyhow::Error> {
        let f = setup();
        let owner = add_user(&f, "ana").await?;
        let item = f.items.create(drill(&owner)).await?;
        f.clock.advance(10);
        let updated = f.items.update(&item.id, ItemPatch { description: Some(String::new()), image_url: None }).await?;
        assert_eq!(updated.description, "");
        assert_eq!(updated.image_url, item.image_url);
        assert_eq!(updated.owner_id, owner);
        assert!(updated.updated_at >= item.updated_at);

        let missing = f.items.update("nope", ItemPatch::default()).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn transfer_to_existing_user() -> Result<(), anyhow::Error> {
        let f = setup();
        let ana = add_user(&f, "ana").await?;
        let bob = add_user(&f, "bob").await?;
        let item = f.items.create(drill(&ana)).await?;
        f.clock.advance(1);

        let moved = f.items.transfer_ownership(&item.id, &bob).await?;
        assert_eq!(moved.owner_id, bob);
        assert_eq!(moved.updated_at, 101);
        assert_eq!(moved.description, item.description);
        assert_eq!(f.items.list_by_owner(&bob).await, vec![moved]);
        assert!(f.items.list_by_owner(&ana).await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn transfer_to_unknown_user_leaves_item_unchanged() -> Result<(), anyhow::Error> {
        let f = setup();
        let ana = add_user(&f, "ana").await?;
        let item = f.items.create(drill(&ana)).await?;
        f.clock.advance(1);

        let res = f.items.transfer_ownership(&item.id, "u2").await;
        assert!(matches!(res, Err(ServiceError::InvalidOwner(ref id)) if id == "u2"));
        assert_eq!(f.items.get(&item.id).await, Some(item));
        Ok(())
    }

    #[tokio::test]
    async fn transfer_of_missing_item_is_not_found() -> Result<(), anyhow::Error> {
        let f = setup();
        let ana = add_user(&f, "ana").await?;
        let res = f.items.transfer_ownership("nope", &ana).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn delete_is_idempotent() -> Result<(), anyhow::Error> {
        let f = setup();
        let item = f.items.create(drill("anyone")).await?;
        assert_eq!(f.items.delete(&item.id).await?.map(|i| i.id), Some(item.id.clone()));
        assert!(!f.items.exists(&item.id).await);
        assert_eq!(f.items.delete(&item.id).await?, None);
        Ok(())
    }
}
