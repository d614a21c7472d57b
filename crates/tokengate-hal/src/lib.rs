//! Hardware capability layer for the Tokengate card/lock protocol.
//!
//! This crate abstracts every physical signal the protocol touches (the
//! shared data line, the card-presence input, the grant output, the lock's
//! receive FIFO, and the EEPROM cell registers) as capability traits, plus
//! the calibrated [`BitClock`](clock::BitClock) delay source everything is
//! timed against.
//!
//! Protocol logic upstack depends only on these traits, so a device build
//! swaps in real register-backed implementations while tests and the demo
//! binary use the in-memory mocks in [`mock`], each paired with a controller
//! handle for driving the simulated hardware:
//!
//! ```
//! use tokengate_hal::mock::MockPresence;
//! use tokengate_hal::traits::PresenceSense;
//!
//! let (presence, handle) = MockPresence::new();
//! handle.insert();
//! assert!(presence.is_present());
//! ```

pub mod clock;
pub mod mock;
pub mod traits;

pub use clock::{BaudClock, BitClock};
pub use traits::{DataLine, EepromCells, GrantSignal, LineLevel, PresenceSense, UartFifo};
