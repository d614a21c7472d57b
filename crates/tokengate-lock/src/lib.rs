//! Lock-side control logic for the Tokengate protocol.
//!
//! One authentication round per card insertion: detect, query, judge,
//! signal, wait for removal. The round is a validated state machine
//! ([`LockState`]) driven by [`LockController`].

pub mod controller;
pub mod state;

pub use controller::LockController;
pub use state::{AccessOutcome, LockState};
