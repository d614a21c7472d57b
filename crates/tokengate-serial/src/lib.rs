//! Half-duplex serial transport for the Tokengate protocol.
//!
//! One contract, two implementations. [`SoftSerial`] times every bit in
//! software for the card's UART-less part; [`BufferedSerial`] leans on a
//! hardware FIFO for the lock. Both produce the same wire pattern:
//! 9600 baud, 8 data bits LSB-first, no parity, one stop bit, idle high.
//!
//! The [`mock`] module provides a byte-level simulated wire for tests and
//! the demo binary.

pub mod buffered;
pub mod link;
pub mod mock;
pub mod soft;

pub use buffered::BufferedSerial;
pub use link::SerialLink;
pub use soft::SoftSerial;
