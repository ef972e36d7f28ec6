use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub pseudo: String,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Creation payload; id and timestamps are assigned by the store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub pseudo: String,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    pub pseudo: Option<String>,
    pub name: Option<String>,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), ModelError> {
        crate::require("pseudo", &self.pseudo)
    }
}

impl UserPatch {
    /// A patch may omit `pseudo`, but may not blank it.
    pub fn validate(&self) -> Result<(), ModelError> {
        match &self.pseudo {
            Some(pseudo) => crate::require("pseudo", pseudo),
            None => Ok(()),
        }
    }
}

impl User {
    pub fn new(id: String, input: NewUser, now: i64) -> Self {
        Self {
            id,
            pseudo: input.pseudo,
            name: input.name,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge `patch` onto this record and refresh `updated_at` (never moving it backwards).
    pub fn apply(&mut self, patch: UserPatch, now: i64) {
        if let Some(pseudo) = patch.pseudo {
            self.pseudo = pseudo;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        self.updated_at = now.max(self.updated_at);
    }
}
