//! Bit-banged serial over the raw data line (card side).
//!
//! The card's part has no UART, so every bit is driven and sampled in
//! software against the calibrated bit clock. Receive centers its samples
//! by waiting one and a half bit periods past the start edge, then one bit
//! period between samples, so all eight data bits land mid-cell.

use crate::link::SerialLink;
use tokengate_core::Result;
use tokengate_core::constants::DATA_BITS;
use tokengate_hal::clock::BitClock;
use tokengate_hal::traits::{DataLine, LineLevel};

/// Software-timed serial link.
///
/// Trades a hardware UART for CPU-driven bit timing. Both sides of a
/// transfer must be running their bit clocks at the same calibrated rate.
#[derive(Debug)]
pub struct SoftSerial<L: DataLine, C: BitClock> {
    line: L,
    clock: C,
}

impl<L: DataLine, C: BitClock> SoftSerial<L, C> {
    /// Create a link over the given line and bit clock. The line is
    /// released to its idle-high state.
    pub fn new(mut line: L, clock: C) -> Self {
        line.release();
        SoftSerial { line, clock }
    }
}

impl<L: DataLine, C: BitClock> SerialLink for SoftSerial<L, C> {
    async fn send_byte(&mut self, byte: u8) -> Result<()> {
        // Start bit.
        self.line.drive(LineLevel::Low);
        self.clock.wait_bit().await;

        // Data bits, least-significant first.
        for i in 0..DATA_BITS {
            let bit = (byte >> i) & 1 == 1;
            self.line.drive(LineLevel::from_bit(bit));
            self.clock.wait_bit().await;
        }

        // Stop bit, then hand the wire back.
        self.line.drive(LineLevel::High);
        self.clock.wait_bit().await;
        self.line.release();
        Ok(())
    }

    async fn recv_byte(&mut self) -> Result<u8> {
        self.line.release();

        // Wait for the start edge.
        while self.line.sample().is_high() {
            self.clock.wait_poll().await;
        }

        // 1.5 bit periods from the edge lands mid-cell of data bit 0.
        self.clock.wait_bit().await;
        self.clock.wait_half_bit().await;

        let mut value = 0u8;
        for i in 0..DATA_BITS {
            if self.line.sample().is_high() {
                value |= 1 << i;
            }
            self.clock.wait_bit().await;
        }
        Ok(value)
    }

    async fn recover_overrun(&mut self) -> Result<()> {
        // No receive buffer to purge on the bit-banged variant.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokengate_hal::clock::BaudClock;
    use tokengate_hal::mock::MockLine;

    fn pair() -> (SoftSerial<MockLine, BaudClock>, SoftSerial<MockLine, BaudClock>) {
        let line = MockLine::new();
        let clock = BaudClock::default();
        (
            SoftSerial::new(line.clone(), clock),
            SoftSerial::new(line, clock),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_byte_survives_the_wire() {
        let (mut tx, mut rx) = pair();
        let (sent, received) = tokio::join!(tx.send_byte(0xA5), rx.recv_byte());
        sent.unwrap();
        assert_eq!(received.unwrap(), 0xA5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_ones_and_all_zeros() {
        let (mut tx, mut rx) = pair();

        let (_, received) = tokio::join!(tx.send_byte(0xFF), rx.recv_byte());
        assert_eq!(received.unwrap(), 0xFF);

        let (_, received) = tokio::join!(tx.send_byte(0x00), rx.recv_byte());
        assert_eq!(received.unwrap(), 0x00);
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_bytes_stay_framed() {
        let (mut tx, mut rx) = pair();
        let message = b"yes\r\n";

        let send = async {
            for &b in message {
                tx.send_byte(b).await.unwrap();
            }
        };
        let recv = async {
            let mut out = Vec::new();
            for _ in 0..message.len() {
                out.push(rx.recv_byte().await.unwrap());
            }
            out
        };

        let (_, received) = tokio::join!(send, recv);
        assert_eq!(received, message);
    }

    #[tokio::test(start_paused = true)]
    async fn test_line_idles_high_after_send() {
        let line = MockLine::new();
        let mut tx = SoftSerial::new(line.clone(), BaudClock::default());
        tx.send_byte(0x00).await.unwrap();
        assert_eq!(line.sample(), LineLevel::High);
    }
}
