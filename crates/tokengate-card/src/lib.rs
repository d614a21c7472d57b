//! Card-side session logic for the Tokengate protocol.
//!
//! The card serves one reader at a time over the shared wire: it answers
//! a balance query with `yes`/`no` (withdrawing at most once per
//! insertion) and applies recharge commands to its persisted balance.

pub mod session;

pub use session::SessionEngine;
