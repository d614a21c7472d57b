//! In-memory mock implementations of the hardware capabilities.
//!
//! Each mock comes with a controller handle for driving the simulated
//! hardware from a test or demo: `MockX::new()` returns the device (which
//! implements the capability trait) and a handle (which the test keeps).
//! All state lives behind `Arc`s, so clones of a device or handle observe
//! the same simulated hardware.

mod eeprom;
mod fifo;
mod grant;
mod line;
mod presence;

pub use eeprom::{MockEeprom, MockEepromHandle};
pub use fifo::{MockUartFifo, MockUartFifoHandle};
pub use grant::{MockGrant, MockGrantHandle};
pub use line::MockLine;
pub use presence::{MockPresence, MockPresenceHandle};
