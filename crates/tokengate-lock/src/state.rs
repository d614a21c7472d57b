//! Lock-side authentication round state machine.
//!
//! One card insertion drives exactly one pass through the cycle:
//!
//! ```text
//! WaitInsertion → Debounce → Query → AwaitAnswer → Judge → Signal
//!       ↑                                                    │
//!       └──────────────────── WaitRemoval ←───────────────────┘
//! ```
//!
//! Transitions are validated; the controller refuses to skip a phase.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokengate_core::{Error, Result};

/// Phases of one authentication round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    /// Polling the presence signal for a card.
    WaitInsertion,

    /// Letting the insertion contact settle.
    Debounce,

    /// Transmitting the balance query.
    Query,

    /// Waiting for the card's answer (or its removal).
    AwaitAnswer,

    /// Comparing the answer against the expected text.
    Judge,

    /// Driving the grant signal: steady on success, blinking on failure.
    Signal,

    /// Polling the presence signal until the card leaves.
    WaitRemoval,
}

impl LockState {
    /// Check if transition to the target state is allowed.
    ///
    /// # Examples
    ///
    /// ```
    /// use tokengate_lock::LockState;
    ///
    /// assert!(LockState::WaitInsertion.can_transition_to(LockState::Debounce));
    /// assert!(!LockState::WaitInsertion.can_transition_to(LockState::Signal));
    /// ```
    #[must_use]
    pub fn can_transition_to(self, target: LockState) -> bool {
        matches!(
            (self, target),
            (LockState::WaitInsertion, LockState::Debounce)
                | (LockState::Debounce, LockState::Query)
                | (LockState::Query, LockState::AwaitAnswer)
                | (LockState::AwaitAnswer, LockState::Judge)
                | (LockState::Judge, LockState::Signal)
                | (LockState::Signal, LockState::WaitRemoval)
                | (LockState::WaitRemoval, LockState::WaitInsertion)
        )
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LockState::WaitInsertion => "WaitInsertion",
            LockState::Debounce => "Debounce",
            LockState::Query => "Query",
            LockState::AwaitAnswer => "AwaitAnswer",
            LockState::Judge => "Judge",
            LockState::Signal => "Signal",
            LockState::WaitRemoval => "WaitRemoval",
        };
        write!(f, "{name}")
    }
}

/// Validate and apply a state change.
///
/// # Errors
/// Returns `Error::InvalidStateTransition` when the cycle does not allow
/// the move.
pub(crate) fn transition(state: &mut LockState, target: LockState) -> Result<()> {
    if !state.can_transition_to(target) {
        return Err(Error::InvalidStateTransition {
            from: state.to_string(),
            to: target.to_string(),
        });
    }
    *state = target;
    Ok(())
}

/// Outcome of one authentication round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessOutcome {
    /// The card answered `yes`; the grant signal was held steady.
    Granted,

    /// Anything else: a `no`, garbage, or a mid-exchange removal.
    Denied,
}

impl fmt::Display for AccessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessOutcome::Granted => write!(f, "granted"),
            AccessOutcome::Denied => write!(f, "denied"),
        }
    }
}
