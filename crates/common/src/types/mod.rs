use serde::{Deserialize, Serialize};

/// Record counts per store, as reported at startup.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub users: usize,
    pub items: usize,
    pub slots: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.users + self.items + self.slots
    }
}
