//! Shared foundation for the Tokengate card/lock protocol workspace.
//!
//! Holds the error type, the wire/timing/storage constants both devices
//! must agree on, and the validated domain types ([`TokenBalance`],
//! [`EepromAddr`]).

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{EepromAddr, TokenBalance};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
