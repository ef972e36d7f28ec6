//! File-backed store implementations on top of `JsonMapStore`.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::clock::{Clock, SystemClock};
use crate::ids::{IdGenerator, UuidGenerator};

pub mod users;
pub mod items;
pub mod slots;

pub use items::FileItemStore;
pub use slots::FileSlotStore;
pub use users::FileUserStore;

/// Handles shared by every store of one registry.
///
/// `gate` serializes all mutations across the stores: it is held from the first
/// referential check to the final write, so a check cannot be invalidated by a concurrent
/// delete. Reads never take it.
#[derive(Clone)]
pub struct Collaborators {
    pub gate: Arc<Mutex<()>>,
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
}

impl Collaborators {
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { gate: Arc::new(Mutex::new(())), clock, ids }
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock::default()), Arc::new(UuidGenerator))
    }
}
