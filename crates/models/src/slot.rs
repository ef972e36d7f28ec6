use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// A rental window of one item by one user. `available` is caller-owned and is not
/// derived from the window; `begin_at <= end_at` is expected but not checked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: String,
    pub description: String,
    pub item_id: String,
    pub owner_id: String,
    pub begin_at: i64,
    pub end_at: i64,
    pub available: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSlot {
    pub description: String,
    pub item_id: String,
    pub owner_id: String,
    pub begin_at: i64,
    pub end_at: i64,
    pub available: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotPatch {
    pub description: Option<String>,
    pub item_id: Option<String>,
    pub owner_id: Option<String>,
    pub begin_at: Option<i64>,
    pub end_at: Option<i64>,
    pub available: Option<bool>,
}

impl NewSlot {
    pub fn validate(&self) -> Result<(), ModelError> {
        crate::require("owner_id", &self.owner_id)?;
        crate::require("item_id", &self.item_id)
    }
}

impl SlotPatch {
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(owner_id) = &self.owner_id {
            crate::require("owner_id", owner_id)?;
        }
        if let Some(item_id) = &self.item_id {
            crate::require("item_id", item_id)?;
        }
        Ok(())
    }
}

impl Slot {
    pub fn new(id: String, input: NewSlot, now: i64) -> Self {
        Self {
            id,
            description: input.description,
            item_id: input.item_id,
            owner_id: input.owner_id,
            begin_at: input.begin_at,
            end_at: input.end_at,
            available: input.available,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: SlotPatch, now: i64) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(item_id) = patch.item_id {
            self.item_id = item_id;
        }
        if let Some(owner_id) = patch.owner_id {
            self.owner_id = owner_id;
        }
        if let Some(begin_at) = patch.begin_at {
            self.begin_at = begin_at;
        }
        if let Some(end_at) = patch.end_at {
            self.end_at = end_at;
        }
        if let Some(available) = patch.available {
            self.available = available;
        }
        self.updated_at = now.max(self.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Slot {
        Slot::new(
            "s1".into(),
            NewSlot {
                description: "weekend".into(),
                item_id: "i1".into(),
                owner_id: "u1".into(),
                begin_at: 100,
                end_at: 200,
                available: true,
            },
            7,
        )
    }

    #[test]
    fn false_overwrites_available() {
        let mut slot = sample();
        slot.apply(SlotPatch { available: Some(false), ..Default::default() }, 8);
        assert!(!slot.available);
        assert_eq!(slot.begin_at, 100);
        assert_eq!(slot.end_at, 200);
        assert_eq!(slot.item_id, "i1");
        assert_eq!(slot.updated_at, 8);
    }

    #[test]
    fn window_is_not_checked() {
        let mut slot = sample();
        slot.apply(SlotPatch { begin_at: Some(500), end_at: Some(50), ..Default::default() }, 9);
        assert_eq!((slot.begin_at, slot.end_at), (500, 50));
    }

    #[test]
    fn blank_references_are_rejected() {
        let input = NewSlot { owner_id: "u1".into(), ..Default::default() };
        assert_eq!(input.validate(), Err(ModelError::Validation("item_id required".into())));
        let patch = SlotPatch { owner_id: Some(" ".into()), ..Default::default() };
        assert_eq!(patch.validate(), Err(ModelError::Validation("owner_id required".into())));
    }
}
