use async_trait::async_trait;
use models::{NewUser, User, UserPatch};

use crate::errors::ServiceError;
use crate::pagination::Pagination;

/// Trait abstraction for user storage. Leaf of the store graph: depends on nothing.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users, ascending by id.
    async fn list(&self) -> Vec<User>;
    async fn get(&self, id: &str) -> Option<User>;
    async fn exists(&self, id: &str) -> bool;
    /// Exact match scan. Pseudo uniqueness is only checkable, `add` does not enforce it.
    async fn exists_by_pseudo(&self, pseudo: &str) -> bool;
    async fn count(&self) -> usize;
    async fn add(&self, input: NewUser) -> Result<User, ServiceError>;
    /// Merge `patch` onto an existing user; `NotFound` when `id` is absent.
    async fn update(&self, id: &str, patch: UserPatch) -> Result<User, ServiceError>;
    /// Returns the removed user, `None` when there was nothing to remove.
    async fn remove(&self, id: &str) -> Result<Option<User>, ServiceError>;

    async fn list_page(&self, page: Pagination) -> Vec<User> {
        page.paginate(self.list().await)
    }
}
