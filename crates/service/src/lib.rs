//! Record stores for users, items and rental slots.
//! - Each store owns an ordered JSON-backed map; see `storage`.
//! - Items and slots resolve their references through the stores they depend on.
//! - `Registry` builds the three stores with a shared clock, id source and write gate.
//!
//! # Examples
//! ```
//! use service::registry::Registry;
//! use service::errors::ServiceError;
//! use service::stores::{ItemStore, SlotStore, UserStore};
//! use models::{NewItem, NewSlot, NewUser};
//!
//! let reg = Registry::in_memory();
//! tokio_test::block_on(async {
//!     let owner = reg.users.add(NewUser { pseudo: "ana".into(), name: "Ana".into() }).await.unwrap();
//!     let item = reg.items.create(NewItem { description: "tent".into(), image_url: String::new(), owner_id: owner.id.clone() }).await.unwrap();
//!     let slot = reg.slots.create(NewSlot { item_id: item.id, owner_id: owner.id, begin_at: 100, end_at: 200, ..Default::default() }).await.unwrap();
//!     assert_eq!((slot.begin_at, slot.end_at), (100, 200));
//!
//!     let err = reg.slots.create(NewSlot { item_id: "missing".into(), owner_id: slot.owner_id, ..Default::default() }).await.unwrap_err();
//!     assert!(matches!(err, ServiceError::InvalidItem(_)));
//! });
//! ```

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod clock;
pub mod ids;
pub mod stores;
pub mod file;
pub mod pagination;
pub mod registry;

pub use registry::{IntegrityReport, Registry};
