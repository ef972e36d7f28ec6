//! Storage abstractions for service layer
//!
//! The ordered key-value map every entity store is built on.

pub mod json_map_store;

pub use json_map_store::JsonMapStore;
