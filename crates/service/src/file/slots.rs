use std::sync::Arc;

use models::{NewSlot, Slot, SlotPatch};
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::file::Collaborators;
use crate::storage::JsonMapStore;
use crate::stores::{ItemStore, SlotStore, UserStore};

/// Slots persisted as a JSON map `id -> Slot`.
///
/// Unlike items, slots keep their references honest for their whole lifetime: the renter
/// and the item are resolved on create and again, against the merged record, on every
/// update. Owner is checked before item.
#[derive(Clone)]
pub struct FileSlotStore {
    store: Arc<JsonMapStore<String, Slot>>,
    users: Arc<dyn UserStore>,
    items: Arc<dyn ItemStore>,
    ctx: Collaborators,
}

impl FileSlotStore {
    pub async fn new<P: Into<std::path::PathBuf>>(
        path: P,
        users: Arc<dyn UserStore>,
        items: Arc<dyn ItemStore>,
        ctx: Collaborators,
    ) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<String, Slot>::new(path).await?;
        Ok(Arc::new(Self { store, users, items, ctx }))
    }

    pub fn in_memory(users: Arc<dyn UserStore>, items: Arc<dyn ItemStore>, ctx: Collaborators) -> Arc<Self> {
        Arc::new(Self { store: JsonMapStore::in_memory(), users, items, ctx })
    }

    pub async fn list(&self) -> Vec<Slot> {
        self.store.values().await
    }

    pub async fn get(&self, id: &str) -> Option<Slot> {
        self.store.get(id).await
    }

    pub async fn exists(&self, id: &str) -> bool {
        self.store.contains_key(id).await
    }

    pub async fn count(&self) -> usize {
        self.store.len().await
    }

    pub async fn list_by_item(&self, item_id: &str) -> Vec<Slot> {
        self.store.filter_values(|s| s.item_id == item_id).await
    }

    pub async fn list_by_owner(&self, owner_id: &str) -> Vec<Slot> {
        self.store.filter_values(|s| s.owner_id == owner_id).await
    }

    async fn check_references(&self, owner_id: &str, item_id: &str) -> Result<(), ServiceError> {
        if !self.users.exists(owner_id).await {
            warn!(%owner_id, %item_id, "slot_rejected_unknown_owner");
            return Err(ServiceError::InvalidOwner(owner_id.to_string()));
        }
        if !self.items.exists(item_id).await {
            warn!(%owner_id, %item_id, "slot_rejected_unknown_item");
            return Err(ServiceError::InvalidItem(item_id.to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self, input), fields(owner_id = %input.owner_id, item_id = %input.item_id))]
    pub async fn create(&self, input: NewSlot) -> Result<Slot, ServiceError> {
        input.validate()?;
        let _gate = self.ctx.gate.lock().await;
        self.check_references(&input.owner_id, &input.item_id).await?;
        let slot = Slot::new(self.ctx.ids.next_id(), input, self.ctx.clock.now());
        self.store.insert(slot.id.clone(), slot.clone()).await?;
        info!(
            slot_id = %slot.id,
            item_id = %slot.item_id,
            owner_id = %slot.owner_id,
            begin_at = slot.begin_at,
            end_at = slot.end_at,
            "slot_created"
        );
        Ok(slot)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: SlotPatch) -> Result<Slot, ServiceError> {
        patch.validate()?;
        let _gate = self.ctx.gate.lock().await;
        let mut slot = self.store.get(id).await.ok_or_else(|| ServiceError::not_found("slot", id))?;
        slot.apply(patch, self.ctx.clock.now());
        self.check_references(&slot.owner_id, &slot.item_id).await?;
        self.store.insert(slot.id.clone(), slot.clone()).await?;
        info!(slot_id = %id, available = slot.available, "slot_updated");
        Ok(slot)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<Option<Slot>, ServiceError> {
        let _gate = self.ctx.gate.lock().await;
        let removed = self.store.remove(id).await?;
        if removed.is_some() {
            info!(slot_id = %id, "slot_deleted");
        }
        Ok(removed)
    }
}

#[async_trait::async_trait]
impl SlotStore for FileSlotStore {
    async fn list(&self) -> Vec<Slot> { self.list().await }
    async fn get(&self, id: &str) -> Option<Slot> { self.get(id).await }
    async fn exists(&self, id: &str) -> bool { self.exists(id).await }
    async fn count(&self) -> usize { self.count().await }
    async fn list_by_item(&self, item_id: &str) -> Vec<Slot> { self.list_by_item(item_id).await }
    async fn list_by_owner(&self, owner_id: &str) -> Vec<Slot> { self.list_by_owner(owner_id).await }
    async fn create(&self, input: NewSlot) -> Result<Slot, ServiceError> { self.create(input).await }
    async fn update(&self, id: &str, patch: SlotPatch) -> Result<Slot, ServiceError> { self.update(id, patch).await }
    async fn delete(&self, id: &str) -> Result<Option<Slot>, ServiceError> { self.delete(id).await }
}
