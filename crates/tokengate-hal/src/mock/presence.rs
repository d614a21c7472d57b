//! Mock card-presence input.

use crate::traits::PresenceSense;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Simulated presence-detect contact.
///
/// Clones share the same contact state; the handle flips it.
///
/// # Examples
///
/// ```
/// use tokengate_hal::mock::MockPresence;
/// use tokengate_hal::traits::PresenceSense;
///
/// let (presence, handle) = MockPresence::new();
/// assert!(!presence.is_present());
///
/// handle.insert();
/// assert!(presence.is_present());
///
/// handle.remove();
/// assert!(!presence.is_present());
/// ```
#[derive(Debug, Clone)]
pub struct MockPresence {
    present: Arc<AtomicBool>,
}

impl MockPresence {
    /// Create a new presence input with no card seated, plus its handle.
    #[must_use]
    pub fn new() -> (Self, MockPresenceHandle) {
        let present = Arc::new(AtomicBool::new(false));
        (
            MockPresence {
                present: Arc::clone(&present),
            },
            MockPresenceHandle { present },
        )
    }
}

impl PresenceSense for MockPresence {
    fn is_present(&self) -> bool {
        self.present.load(Ordering::SeqCst)
    }
}

/// Handle for seating and removing the simulated card.
#[derive(Debug, Clone)]
pub struct MockPresenceHandle {
    present: Arc<AtomicBool>,
}

impl MockPresenceHandle {
    /// Seat the card in the reader.
    pub fn insert(&self) {
        self.present.store(true, Ordering::SeqCst);
    }

    /// Pull the card out of the reader.
    pub fn remove(&self) {
        self.present.store(false, Ordering::SeqCst);
    }

    /// Current contact state.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.present.load(Ordering::SeqCst)
    }
}
