use async_trait::async_trait;
use models::{NewSlot, Slot, SlotPatch};

use crate::errors::ServiceError;
use crate::pagination::Pagination;

/// Trait abstraction for slot storage. Both `owner_id` and `item_id` must resolve on
/// create and on every update.
#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn list(&self) -> Vec<Slot>;
    async fn get(&self, id: &str) -> Option<Slot>;
    async fn exists(&self, id: &str) -> bool;
    async fn count(&self) -> usize;
    async fn list_by_item(&self, item_id: &str) -> Vec<Slot>;
    async fn list_by_owner(&self, owner_id: &str) -> Vec<Slot>;
    async fn create(&self, input: NewSlot) -> Result<Slot, ServiceError>;
    async fn update(&self, id: &str, patch: SlotPatch) -> Result<Slot, ServiceError>;
    async fn delete(&self, id: &str) -> Result<Option<Slot>, ServiceError>;

    async fn list_page(&self, page: Pagination) -> Vec<Slot> {
        page.paginate(self.list().await)
    }
}
