//! Store abstractions for the three record types.
//!
//! Implementations can be file-backed or purely in memory; see `crate::file`.

pub mod user_store;
pub mod item_store;
pub mod slot_store;

pub use item_store::ItemStore;
pub use slot_store::SlotStore;
pub use user_store::UserStore;
