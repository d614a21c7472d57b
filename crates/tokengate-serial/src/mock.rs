//! Byte-level mock wire for tests and the demo binary.
//!
//! [`wire()`] returns two cross-connected endpoints; whatever one side
//! sends, the other receives. Dropping an endpoint models its device
//! losing power: the peer's next operation fails with `Disconnected`.

use crate::link::SerialLink;
use std::fmt;
use std::time::Duration;
use tokengate_core::constants::REMOVAL_SENTINEL;
use tokengate_core::{Error, Result};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// Polling interval while waiting for a byte with a presence check
/// attached; one bit period at the protocol rate.
const RECV_POLL: Duration = Duration::from_micros(104);

/// One endpoint of a simulated serial wire.
pub struct MockSerial {
    tx: mpsc::UnboundedSender<u8>,
    rx: mpsc::UnboundedReceiver<u8>,
    present_check: Option<Box<dyn Fn() -> bool + Send + Sync>>,
}

impl fmt::Debug for MockSerial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockSerial")
            .field("has_present_check", &self.present_check.is_some())
            .finish()
    }
}

/// Create both ends of a simulated wire.
#[must_use]
pub fn wire() -> (MockSerial, MockSerial) {
    let (a_tx, b_rx) = mpsc::unbounded_channel();
    let (b_tx, a_rx) = mpsc::unbounded_channel();
    (
        MockSerial {
            tx: a_tx,
            rx: a_rx,
            present_check: None,
        },
        MockSerial {
            tx: b_tx,
            rx: b_rx,
            present_check: None,
        },
    )
}

impl MockSerial {
    /// Attach the still-present predicate polled during receives.
    ///
    /// With a check attached, `recv_byte` returns the removal sentinel as
    /// soon as the predicate flips false, which is how the lock behaves.
    /// Without one, receives block until a byte arrives or the wire is
    /// dropped, which is how the card behaves.
    pub fn set_present_check(&mut self, check: impl Fn() -> bool + Send + Sync + 'static) {
        self.present_check = Some(Box::new(check));
    }

    /// Pop one received byte without waiting.
    pub fn try_recv_byte(&mut self) -> Option<u8> {
        self.rx.try_recv().ok()
    }

    /// A tap sharing this endpoint's transmit driver.
    ///
    /// Models a third party wired onto the same physical line (the
    /// recharger): whatever the tap sends arrives at this endpoint's peer.
    #[must_use]
    pub fn tap(&self) -> WireTap {
        WireTap {
            tx: self.tx.clone(),
        }
    }
}

impl SerialLink for MockSerial {
    async fn send_byte(&mut self, byte: u8) -> Result<()> {
        self.tx
            .send(byte)
            .map_err(|_| Error::disconnected("serial wire"))
    }

    async fn recv_byte(&mut self) -> Result<u8> {
        match &self.present_check {
            Some(check) => loop {
                if !check() {
                    return Ok(REMOVAL_SENTINEL);
                }
                match self.rx.try_recv() {
                    Ok(byte) => return Ok(byte),
                    Err(TryRecvError::Empty) => tokio::time::sleep(RECV_POLL).await,
                    Err(TryRecvError::Disconnected) => {
                        return Err(Error::disconnected("serial wire"));
                    }
                }
            },
            None => self
                .rx
                .recv()
                .await
                .ok_or_else(|| Error::disconnected("serial wire")),
        }
    }

    async fn recover_overrun(&mut self) -> Result<()> {
        while self.rx.try_recv().is_ok() {}
        Ok(())
    }
}

/// Third-party transmit tap on a mock wire (see [`MockSerial::tap`]).
#[derive(Debug, Clone)]
pub struct WireTap {
    tx: mpsc::UnboundedSender<u8>,
}

impl WireTap {
    /// Push every byte of `text` onto the wire.
    ///
    /// # Errors
    /// Returns `Error::Disconnected` when the receiving endpoint is gone.
    pub fn send_line(&self, text: &str) -> Result<()> {
        for &byte in text.as_bytes() {
            self.tx
                .send(byte)
                .map_err(|_| Error::disconnected("serial wire"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_bytes_cross_the_wire_both_ways() {
        let (mut a, mut b) = wire();
        a.send_byte(0x42).await.unwrap();
        assert_eq!(b.recv_byte().await.unwrap(), 0x42);

        b.send_byte(0x24).await.unwrap();
        assert_eq!(a.recv_byte().await.unwrap(), 0x24);
    }

    #[tokio::test]
    async fn test_dropped_peer_is_disconnected() {
        let (mut a, b) = wire();
        drop(b);
        assert!(a.send_byte(1).await.is_err());
        assert!(a.recv_byte().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_present_check_yields_sentinel() {
        let (mut a, _b) = wire();
        let present = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&present);
        a.set_present_check(move || flag.load(Ordering::SeqCst));

        assert_eq!(a.recv_byte().await.unwrap(), REMOVAL_SENTINEL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_present_check_still_receives_bytes() {
        let (mut a, mut b) = wire();
        a.set_present_check(|| true);
        b.send_byte(b'x').await.unwrap();
        assert_eq!(a.recv_byte().await.unwrap(), b'x');
    }

    #[tokio::test]
    async fn test_recover_drains_pending_input() {
        let (mut a, mut b) = wire();
        b.send_byte(1).await.unwrap();
        b.send_byte(2).await.unwrap();
        a.recover_overrun().await.unwrap();
        assert_eq!(a.try_recv_byte(), None);
    }

    #[tokio::test]
    async fn test_tap_injects_toward_the_peer() {
        let (a, mut b) = wire();
        let tap = a.tap();
        tap.send_line("4\r").unwrap();
        assert_eq!(b.recv_byte().await.unwrap(), b'4');
        assert_eq!(b.recv_byte().await.unwrap(), b'\r');
    }
}
