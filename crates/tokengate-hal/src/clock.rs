//! Calibrated delay source.
//!
//! Every wait in the system (bit periods on the wire, sampling alignment,
//! the session choreography's millisecond delays) goes through one
//! [`BitClock`] capability. On a host target the clock is backed by the
//! async runtime's timer ([`BaudClock`]); the protocol logic never notices
//! the difference between that and a busy-wait loop on an embedded counter,
//! which is the behavior it models.

#![allow(async_fn_in_trait)]

use std::time::Duration;
use tokengate_core::constants::BAUD_RATE;

/// Number of edge-detection polls per bit period.
///
/// Start-edge detection samples the line at this granularity, so the worst
/// case skew of the first data-bit sample is one eighth of a bit, well
/// inside the half-bit margin the 1.5-bit centering delay provides.
const POLLS_PER_BIT: u32 = 8;

/// Calibrated delays derived from the serial bit period.
///
/// Contract: consecutive [`wait_bit`] calls stay aligned closely enough
/// that the ten samples of one character frame (start + 8 data + stop)
/// need no resynchronization. None of the waits are cancellable.
///
/// [`wait_bit`]: BitClock::wait_bit
pub trait BitClock: Send + Sync {
    /// Block for one bit period.
    async fn wait_bit(&self);

    /// Block for half a bit period (receive sampling alignment).
    async fn wait_half_bit(&self);

    /// Block for the edge-detection polling granularity (a fraction of
    /// one bit period).
    async fn wait_poll(&self);

    /// Block for `millis` milliseconds.
    async fn wait_millis(&self, millis: u32);
}

/// Timer-backed clock calibrated from a baud rate.
///
/// # Examples
///
/// ```
/// use tokengate_hal::clock::BaudClock;
/// use std::time::Duration;
///
/// let clock = BaudClock::default();
/// assert_eq!(clock.bit_period(), Duration::from_nanos(104_166));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BaudClock {
    bit: Duration,
}

impl BaudClock {
    /// Create a clock for the given line speed.
    #[must_use]
    pub fn new(baud: u32) -> Self {
        BaudClock {
            bit: Duration::from_nanos(1_000_000_000 / u64::from(baud)),
        }
    }

    /// The calibrated bit period.
    #[must_use]
    pub fn bit_period(&self) -> Duration {
        self.bit
    }
}

impl Default for BaudClock {
    /// Clock for the protocol's fixed 9600-baud rate.
    fn default() -> Self {
        BaudClock::new(BAUD_RATE)
    }
}

impl BitClock for BaudClock {
    async fn wait_bit(&self) {
        tokio::time::sleep(self.bit).await;
    }

    async fn wait_half_bit(&self) {
        tokio::time::sleep(self.bit / 2).await;
    }

    async fn wait_poll(&self) {
        tokio::time::sleep(self.bit / POLLS_PER_BIT).await;
    }

    async fn wait_millis(&self, millis: u32) {
        tokio::time::sleep(Duration::from_millis(u64::from(millis))).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn test_bit_period_at_9600_baud() {
        let clock = BaudClock::default();
        // 104.17 µs, truncated to whole nanoseconds
        assert_eq!(clock.bit_period(), Duration::from_nanos(104_166));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ten_bits_span_one_frame() {
        let clock = BaudClock::default();
        let start = Instant::now();
        for _ in 0..10 {
            clock.wait_bit().await;
        }
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_nanos(1_041_660));
        assert!(elapsed < Duration::from_nanos(1_100_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_millis() {
        let clock = BaudClock::default();
        let start = Instant::now();
        clock.wait_millis(150).await;
        assert!(start.elapsed() >= Duration::from_millis(150));
    }
}
