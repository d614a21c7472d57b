//! Mock grant-signal output.

use crate::traits::GrantSignal;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug)]
struct Inner {
    engaged: AtomicBool,
    /// State changes in order of occurrence (`true` = engaged).
    transitions: Mutex<Vec<bool>>,
}

/// Simulated grant output that records its state transitions.
///
/// Repeated calls that do not change the state are not recorded, so a
/// blink sequence shows up as alternating `true`/`false` entries.
#[derive(Debug)]
pub struct MockGrant {
    inner: Arc<Inner>,
}

impl MockGrant {
    /// Create a new deasserted grant output, plus its observer handle.
    #[must_use]
    pub fn new() -> (Self, MockGrantHandle) {
        let inner = Arc::new(Inner {
            engaged: AtomicBool::new(false),
            transitions: Mutex::new(Vec::new()),
        });
        (
            MockGrant {
                inner: Arc::clone(&inner),
            },
            MockGrantHandle { inner },
        )
    }

    fn set(&self, engaged: bool) {
        if self.inner.engaged.swap(engaged, Ordering::SeqCst) != engaged {
            self.inner
                .transitions
                .lock()
                .expect("grant transition log poisoned")
                .push(engaged);
        }
    }
}

impl GrantSignal for MockGrant {
    fn engage(&mut self) {
        self.set(true);
    }

    fn disengage(&mut self) {
        self.set(false);
    }

    fn is_engaged(&self) -> bool {
        self.inner.engaged.load(Ordering::SeqCst)
    }
}

/// Handle for observing the simulated grant output.
#[derive(Debug, Clone)]
pub struct MockGrantHandle {
    inner: Arc<Inner>,
}

impl MockGrantHandle {
    /// Current state of the signal.
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.inner.engaged.load(Ordering::SeqCst)
    }

    /// All state changes so far, oldest first (`true` = engaged).
    #[must_use]
    pub fn transitions(&self) -> Vec<bool> {
        self.inner
            .transitions
            .lock()
            .expect("grant transition log poisoned")
            .clone()
    }
}
