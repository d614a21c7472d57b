//! Mock data line.

use crate::traits::{DataLine, LineLevel};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Simulated half-duplex wire.
///
/// Clones share the same line level, so handing one clone to each device
/// models connecting them with a single physical wire. The line starts at
/// the idle (high) level.
///
/// A released mock line keeps its last driven level; drivers leave the line
/// high (stop bit) before releasing, which matches the pull-up idle state.
#[derive(Debug, Clone)]
pub struct MockLine {
    high: Arc<AtomicBool>,
}

impl MockLine {
    /// Create a new line at the idle-high level.
    #[must_use]
    pub fn new() -> Self {
        MockLine {
            high: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl Default for MockLine {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLine for MockLine {
    fn drive(&mut self, level: LineLevel) {
        self.high.store(level.is_high(), Ordering::SeqCst);
    }

    fn release(&mut self) {}

    fn sample(&self) -> LineLevel {
        LineLevel::from_bit(self.high.load(Ordering::SeqCst))
    }
}
