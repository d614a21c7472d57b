//! The byte-level serial contract shared by both devices.

#![allow(async_fn_in_trait)]

use tokengate_core::Result;

/// Half-duplex, polled, byte-oriented channel over the shared wire.
///
/// Two implementations exist with identical wire behavior: the bit-banged
/// [`SoftSerial`](crate::SoftSerial) used by the card (no UART on that
/// part) and the FIFO-backed [`BufferedSerial`](crate::BufferedSerial)
/// used by the lock. They must agree exactly on the bit pattern (9600
/// baud, 8 data bits LSB-first, no parity, one stop bit, idle high)
/// because they talk to each other.
///
/// # Object Safety and Dynamic Dispatch
///
/// This trait is NOT object-safe: `async fn` methods return opaque
/// `impl Future` types (Edition 2024 RPITIT). Use generic type parameters;
/// a `&mut L` where `L: SerialLink` also implements the trait, so a link
/// can be lent out per session without giving up ownership.
pub trait SerialLink: Send {
    /// Transmit one byte: start bit low, 8 data bits least-significant
    /// first, stop bit high. Occupies the wire for ~10 bit periods.
    async fn send_byte(&mut self, byte: u8) -> Result<()>;

    /// Receive one byte.
    ///
    /// Waits for the start edge (or for buffered data), then samples 8
    /// bits least-significant first. On the lock side this is the one
    /// cancellation point in the system: when the card-presence signal
    /// drops mid-wait, the call returns the
    /// [`REMOVAL_SENTINEL`](tokengate_core::constants::REMOVAL_SENTINEL)
    /// byte instead of blocking forever. Cancellation is observed by
    /// polling, never asynchronously.
    ///
    /// # Errors
    ///
    /// Returns `Error::Disconnected` when the underlying channel is gone
    /// for good (mock wire dropped; models the peer losing power).
    async fn recv_byte(&mut self) -> Result<u8>;

    /// Purge stale buffered input and recycle the receiver.
    ///
    /// On the buffered variant this discards FIFO bytes left over from a
    /// previous exchange, including the device's own transmissions heard
    /// on the shared wire, and clears a receiver overrun. The
    /// bit-banged variant has no buffer; for it this is a no-op.
    async fn recover_overrun(&mut self) -> Result<()>;
}

impl<T: SerialLink + ?Sized> SerialLink for &mut T {
    async fn send_byte(&mut self, byte: u8) -> Result<()> {
        (**self).send_byte(byte).await
    }

    async fn recv_byte(&mut self) -> Result<u8> {
        (**self).recv_byte().await
    }

    async fn recover_overrun(&mut self) -> Result<()> {
        (**self).recover_overrun().await
    }
}
