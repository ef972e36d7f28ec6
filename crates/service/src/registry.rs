//! Wiring of the three stores.
//!
//! A `Registry` is built once at startup and handed around by reference. Users are opened
//! first, then items (which look up users), then slots (which look up both).

use std::collections::HashSet;
use std::sync::Arc;

use common::types::Summary;
use configs::StorageConfig;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::file::{Collaborators, FileItemStore, FileSlotStore, FileUserStore};
use crate::stores::{ItemStore, SlotStore, UserStore};

/// References that no longer resolve. Deletes do not cascade, so these can accumulate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    /// Items whose owner is gone.
    pub orphan_items: Vec<String>,
    /// Slots whose renter or item is gone.
    pub dangling_slots: Vec<String>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.orphan_items.is_empty() && self.dangling_slots.is_empty()
    }
}

#[derive(Clone)]
pub struct Registry {
    pub users: Arc<dyn UserStore>,
    pub items: Arc<dyn ItemStore>,
    pub slots: Arc<dyn SlotStore>,
    ctx: Collaborators,
}

impl Registry {
    /// Open file-backed stores under `cfg.data_dir` with the system clock and UUID ids.
    pub async fn open(cfg: &StorageConfig) -> Result<Self, ServiceError> {
        Self::open_with(cfg, Collaborators::default()).await
    }

    pub async fn open_with(cfg: &StorageConfig, ctx: Collaborators) -> Result<Self, ServiceError> {
        let users = FileUserStore::new(cfg.users_path(), ctx.clone()).await?;
        let items = FileItemStore::new(cfg.items_path(), users.clone(), ctx.clone()).await?;
        let slots = FileSlotStore::new(cfg.slots_path(), users.clone(), items.clone(), ctx.clone()).await?;
        info!(data_dir = %cfg.data_dir, "registry_opened");
        Ok(Self { users, items, slots, ctx })
    }

    pub fn in_memory() -> Self {
        Self::in_memory_with(Collaborators::default())
    }

    pub fn in_memory_with(ctx: Collaborators) -> Self {
        let users = FileUserStore::in_memory(ctx.clone());
        let items = FileItemStore::in_memory(users.clone(), ctx.clone());
        let slots = FileSlotStore::in_memory(users.clone(), items.clone(), ctx.clone());
        Self { users, items, slots, ctx }
    }

    pub async fn summary(&self) -> Summary {
        Summary {
            users: self.users.count().await,
            items: self.items.count().await,
            slots: self.slots.count().await,
        }
    }

    /// Scan all three stores for references that do not resolve.
    ///
    /// Holds the write gate for the duration so the three listings are one consistent view.
    pub async fn audit(&self) -> IntegrityReport {
        let _gate = self.ctx.gate.lock().await;
        let user_ids: HashSet<String> = self.users.list().await.into_iter().map(|u| u.id).collect();
        let items = self.items.list().await;
        let item_ids: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();

        let orphan_items: Vec<String> = items
            .iter()
            .filter(|i| !user_ids.contains(&i.owner_id))
            .map(|i| i.id.clone())
            .collect();
        let dangling_slots: Vec<String> = self
            .slots
            .list()
            .await
            .into_iter()
            .filter(|s| !user_ids.contains(&s.owner_id) || !item_ids.contains(s.item_id.as_str()))
            .map(|s| s.id)
            .collect();

        let report = IntegrityReport { orphan_items, dangling_slots };
        if !report.is_clean() {
            warn!(
                orphan_items = report.orphan_items.len(),
                dangling_slots = report.dangling_slots.len(),
                "integrity_audit_found_dangling_references"
            );
        }
        report
    }
}
