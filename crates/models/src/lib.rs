//! Record types for the three entity stores.
//!
//! Each entity has a stored record, a creation payload and a patch. Patches carry
//! `Option` fields: `Some` overwrites (empty strings and `false` included), `None` keeps
//! the stored value.

pub mod errors;
pub mod user;
pub mod item;
pub mod slot;

pub use item::{Item, ItemPatch, NewItem};
pub use slot::{NewSlot, Slot, SlotPatch};
pub use user::{NewUser, User, UserPatch};

/// Shared non-blank rule for required string fields.
pub(crate) fn require(field: &str, value: &str) -> Result<(), errors::ModelError> {
    if value.trim().is_empty() {
        return Err(errors::ModelError::Validation(format!("{field} required")));
    }
    Ok(())
}
