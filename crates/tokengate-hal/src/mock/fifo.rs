//! Mock UART receive FIFO with overrun behavior.

use crate::traits::UartFifo;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

/// Hardware receive buffer depth. A third unread byte overruns the
/// receiver, which then drops everything until it is recycled.
const FIFO_DEPTH: usize = 2;

#[derive(Debug)]
struct Inner {
    rx: Mutex<VecDeque<u8>>,
    tx: Mutex<Vec<u8>>,
    enabled: AtomicBool,
    overrun: AtomicBool,
}

/// Simulated hardware-assisted serial port.
///
/// Models the part that matters to the protocol: a two-byte receive FIFO
/// that overruns when a third byte arrives unread, and a receiver-enable
/// line whose off/on recycle is the only way to clear the overrun. The
/// handle plays the far end of the wire.
///
/// # Examples
///
/// ```
/// use tokengate_hal::mock::MockUartFifo;
/// use tokengate_hal::traits::UartFifo;
///
/// let (mut port, handle) = MockUartFifo::new();
///
/// assert!(handle.push_rx(b'a'));
/// assert!(handle.push_rx(b'b'));
/// assert!(!handle.push_rx(b'c'));     // third byte overruns
/// assert!(handle.is_overrun());
///
/// port.try_take();
/// port.try_take();
/// port.set_receiver_enabled(false);
/// port.set_receiver_enabled(true);    // recycle clears the overrun
/// assert!(handle.push_rx(b'd'));
/// assert_eq!(port.try_take(), Some(b'd'));
/// ```
#[derive(Debug)]
pub struct MockUartFifo {
    inner: Arc<Inner>,
}

impl MockUartFifo {
    /// Create a new enabled, empty port, plus its far-end handle.
    #[must_use]
    pub fn new() -> (Self, MockUartFifoHandle) {
        let inner = Arc::new(Inner {
            rx: Mutex::new(VecDeque::new()),
            tx: Mutex::new(Vec::new()),
            enabled: AtomicBool::new(true),
            overrun: AtomicBool::new(false),
        });
        (
            MockUartFifo {
                inner: Arc::clone(&inner),
            },
            MockUartFifoHandle { inner },
        )
    }
}

impl UartFifo for MockUartFifo {
    fn write(&mut self, byte: u8) {
        self.inner
            .tx
            .lock()
            .expect("uart tx log poisoned")
            .push(byte);
    }

    fn try_take(&mut self) -> Option<u8> {
        self.inner
            .rx
            .lock()
            .expect("uart rx fifo poisoned")
            .pop_front()
    }

    fn set_receiver_enabled(&mut self, enabled: bool) {
        self.inner.enabled.store(enabled, Ordering::SeqCst);
        if enabled {
            self.inner.overrun.store(false, Ordering::SeqCst);
        }
    }
}

/// Handle playing the far end of the wire against a [`MockUartFifo`].
#[derive(Debug, Clone)]
pub struct MockUartFifoHandle {
    inner: Arc<Inner>,
}

impl MockUartFifoHandle {
    /// Deliver one byte to the receiver.
    ///
    /// Returns whether the byte was accepted. Bytes are dropped while the
    /// receiver is disabled or overrun, and the byte that finds the FIFO
    /// already full is dropped and trips the overrun condition.
    pub fn push_rx(&self, byte: u8) -> bool {
        if !self.inner.enabled.load(Ordering::SeqCst) || self.inner.overrun.load(Ordering::SeqCst)
        {
            return false;
        }
        let mut rx = self.inner.rx.lock().expect("uart rx fifo poisoned");
        if rx.len() >= FIFO_DEPTH {
            self.inner.overrun.store(true, Ordering::SeqCst);
            return false;
        }
        rx.push_back(byte);
        true
    }

    /// Whether the receiver is currently overrun.
    #[must_use]
    pub fn is_overrun(&self) -> bool {
        self.inner.overrun.load(Ordering::SeqCst)
    }

    /// Everything the port has transmitted so far.
    #[must_use]
    pub fn sent(&self) -> Vec<u8> {
        self.inner.tx.lock().expect("uart tx log poisoned").clone()
    }

    /// Number of unread bytes in the receive FIFO.
    #[must_use]
    pub fn pending_rx(&self) -> usize {
        self.inner.rx.lock().expect("uart rx fifo poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_is_captured() {
        let (mut port, handle) = MockUartFifo::new();
        port.write(b'y');
        port.write(b'o');
        assert_eq!(handle.sent(), vec![b'y', b'o']);
    }

    #[test]
    fn test_fifo_in_order() {
        let (mut port, handle) = MockUartFifo::new();
        assert!(handle.push_rx(1));
        assert!(handle.push_rx(2));
        assert_eq!(port.try_take(), Some(1));
        assert_eq!(port.try_take(), Some(2));
        assert_eq!(port.try_take(), None);
    }

    #[test]
    fn test_overrun_drops_until_recycled() {
        let (mut port, handle) = MockUartFifo::new();
        assert!(handle.push_rx(1));
        assert!(handle.push_rx(2));
        assert!(!handle.push_rx(3));
        assert!(handle.is_overrun());

        // Draining the FIFO alone does not clear the condition.
        port.try_take();
        port.try_take();
        assert!(!handle.push_rx(4));

        port.set_receiver_enabled(false);
        port.set_receiver_enabled(true);
        assert!(!handle.is_overrun());
        assert!(handle.push_rx(5));
        assert_eq!(port.try_take(), Some(5));
    }

    #[test]
    fn test_disabled_receiver_drops_bytes() {
        let (mut port, handle) = MockUartFifo::new();
        port.set_receiver_enabled(false);
        assert!(!handle.push_rx(1));
        port.set_receiver_enabled(true);
        assert!(handle.push_rx(2));
        assert_eq!(port.try_take(), Some(2));
    }
}
