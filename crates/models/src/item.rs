use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub description: String,
    pub image_url: String,
    pub owner_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub description: String,
    pub image_url: String,
    pub owner_id: String,
}

/// Plain update payload. Ownership is not part of it; see `Item::transfer_to`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemPatch {
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl NewItem {
    pub fn validate(&self) -> Result<(), ModelError> {
        crate::require("owner_id", &self.owner_id)
    }
}

impl Item {
    pub fn new(id: String, input: NewItem, now: i64) -> Self {
        Self {
            id,
            description: input.description,
            image_url: input.image_url,
            owner_id: input.owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: ItemPatch, now: i64) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        self.updated_at = now.max(self.updated_at);
    }

    pub fn transfer_to(&mut self, owner_id: String, now: i64) {
        self.owner_id = owner_id;
        self.updated_at = now.max(self.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Item {
        Item::new(
            "i1".into(),
            NewItem { description: "drill".into(), image_url: "https://img/1.png".into(), owner_id: "u1".into() },
            100,
        )
    }

    #[test]
    fn apply_merges_only_present_fields() {
        let mut item = sample();
        item.apply(ItemPatch { description: Some("cordless drill".into()), image_url: None }, 150);
        assert_eq!(item.description, "cordless drill");
        assert_eq!(item.image_url, "https://img/1.png");
        assert_eq!(item.owner_id, "u1");
        assert_eq!(item.updated_at, 150);
    }

    #[test]
    fn transfer_changes_owner_and_timestamp_only() {
        let mut item = sample();
        let before = item.clone();
        item.transfer_to("u2".into(), 200);
        assert_eq!(item.owner_id, "u2");
        assert_eq!(item.updated_at, 200);
        assert_eq!(item.description, before.description);
        assert_eq!(item.created_at, before.created_at);
    }

    #[test]
    fn owner_is_required() {
        let input = NewItem { owner_id: String::new(), ..Default::default() };
        assert!(input.validate().is_err());
    }
}
