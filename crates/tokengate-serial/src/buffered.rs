//! FIFO-backed serial over a hardware-assisted port (lock side).
//!
//! The lock's part has a real UART, so this variant only polls the receive
//! FIFO instead of timing individual bits. The trade is deliberate: the
//! lock also drives a visible indicator and cannot tolerate the timing
//! slack software bit-banging needs.

use crate::link::SerialLink;
use tokengate_core::Result;
use tokengate_core::constants::REMOVAL_SENTINEL;
use tokengate_hal::clock::BitClock;
use tokengate_hal::traits::{PresenceSense, UartFifo};

/// Number of stale FIFO bytes drained during overrun recovery, matching
/// the hardware receive buffer depth.
const STALE_DRAIN_COUNT: usize = 2;

/// Hardware-assisted serial link.
#[derive(Debug)]
pub struct BufferedSerial<F: UartFifo, P: PresenceSense, C: BitClock> {
    port: F,
    presence: P,
    clock: C,
}

impl<F: UartFifo, P: PresenceSense, C: BitClock> BufferedSerial<F, P, C> {
    /// Create a link over the given port. The presence input is the
    /// cancellation signal for [`recv_byte`](SerialLink::recv_byte).
    pub fn new(port: F, presence: P, clock: C) -> Self {
        BufferedSerial {
            port,
            presence,
            clock,
        }
    }
}

impl<F: UartFifo, P: PresenceSense, C: BitClock> SerialLink for BufferedSerial<F, P, C> {
    async fn send_byte(&mut self, byte: u8) -> Result<()> {
        self.port.write(byte);
        Ok(())
    }

    async fn recv_byte(&mut self) -> Result<u8> {
        loop {
            if !self.presence.is_present() {
                return Ok(REMOVAL_SENTINEL);
            }
            if let Some(byte) = self.port.try_take() {
                return Ok(byte);
            }
            self.clock.wait_poll().await;
        }
    }

    async fn recover_overrun(&mut self) -> Result<()> {
        for _ in 0..STALE_DRAIN_COUNT {
            let _ = self.port.try_take();
        }
        self.port.set_receiver_enabled(false);
        self.port.set_receiver_enabled(true);
        Ok(())
    }
}
