use async_trait::async_trait;
use models::{Item, ItemPatch, NewItem};

use crate::errors::ServiceError;
use crate::pagination::Pagination;

/// Trait abstraction for item storage. Items reference their owner in a `UserStore`.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn list(&self) -> Vec<Item>;
    async fn get(&self, id: &str) -> Option<Item>;
    async fn exists(&self, id: &str) -> bool;
    async fn count(&self) -> usize;
    /// Items owned by `owner_id`, ascending by item id.
    async fn list_by_owner(&self, owner_id: &str) -> Vec<Item>;
    /// Whether `user_id` resolves in the backing user store. `create` does not call it;
    /// callers that want a checked create call this first.
    async fn check_user(&self, user_id: &str) -> bool;
    async fn create(&self, input: NewItem) -> Result<Item, ServiceError>;
    async fn update(&self, id: &str, patch: ItemPatch) -> Result<Item, ServiceError>;
    /// `NotFound` if the item is absent, `InvalidOwner` if the new owner is; the item is
    /// left untouched in both cases.
    async fn transfer_ownership(&self, id: &str, new_owner_id: &str) -> Result<Item, ServiceError>;
    async fn delete(&self, id: &str) -> Result<Option<Item>, ServiceError>;

    async fn list_page(&self, page: Pagination) -> Vec<Item> {
        page.paginate(self.list().await)
    }
}
