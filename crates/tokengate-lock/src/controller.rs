//! The lock-side round driver.

use crate::state::{AccessOutcome, LockState, transition};
use tokengate_core::Result;
use tokengate_core::constants::{
    BLINK_COUNT, BLINK_PERIOD_MS, CANDIDATE_YES, DRAIN_DELAY_MS, INSERTION_DEBOUNCE_MS,
    INSERTION_SETTLE_MS, MSG_QUERY, POST_SIGNAL_DELAY_MS, PRESENCE_POLL_MS, REMOVAL_DEBOUNCE_MS,
    REMOVAL_SETTLE_MS,
};
use tokengate_hal::clock::BitClock;
use tokengate_hal::traits::{GrantSignal, PresenceSense};
use tokengate_protocol::{read_line, write_line};
use tokengate_serial::SerialLink;
use tracing::{debug, info, trace};

/// Drives one authentication round per card insertion.
///
/// The controller owns the lock's peripherals and walks the
/// [`LockState`] cycle for every seated card: debounce, query the card,
/// purge the receiver, judge the answer, signal the outcome, wait for
/// removal. A card pulled mid-exchange surfaces as an empty answer and
/// falls through to the denial signal; it is deliberately not
/// distinguished from a wrong answer.
#[derive(Debug)]
pub struct LockController<S, P, G, C>
where
    S: SerialLink,
    P: PresenceSense,
    G: GrantSignal,
    C: BitClock,
{
    link: S,
    presence: P,
    grant: G,
    clock: C,
    state: LockState,
}

impl<S, P, G, C> LockController<S, P, G, C>
where
    S: SerialLink,
    P: PresenceSense,
    G: GrantSignal,
    C: BitClock,
{
    /// Create a controller idling in `WaitInsertion`.
    pub fn new(link: S, presence: P, grant: G, clock: C) -> Self {
        LockController {
            link,
            presence,
            grant,
            clock,
            state: LockState::WaitInsertion,
        }
    }

    /// Current phase of the round.
    #[must_use]
    pub fn state(&self) -> LockState {
        self.state
    }

    /// Attend rounds forever, one per insertion.
    ///
    /// # Errors
    /// Propagates link failures and (impossible by construction) state
    /// machine violations.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let outcome = self.attend_one().await?;
            info!(%outcome, "access round finished");
        }
    }

    /// Attend exactly one round: from waiting for an insertion through
    /// the card's removal.
    ///
    /// # Errors
    /// Propagates link failures; protocol-level problems (wrong answer,
    /// removal mid-exchange) are folded into [`AccessOutcome::Denied`].
    pub async fn attend_one(&mut self) -> Result<AccessOutcome> {
        self.wait_for_presence(true).await;
        transition(&mut self.state, LockState::Debounce)?;
        trace!("card seated, debouncing");
        self.clock.wait_millis(INSERTION_DEBOUNCE_MS).await;
        self.clock.wait_millis(INSERTION_SETTLE_MS).await;

        transition(&mut self.state, LockState::Query)?;
        write_line(&mut self.link, MSG_QUERY).await?;
        // Let the transmit side drain fully before listening, then purge
        // what the receiver overheard of our own transmission.
        self.clock.wait_millis(DRAIN_DELAY_MS).await;
        self.link.recover_overrun().await?;

        transition(&mut self.state, LockState::AwaitAnswer)?;
        let answer = read_line(&mut self.link).await?;

        transition(&mut self.state, LockState::Judge)?;
        let granted = answer.matches(CANDIDATE_YES);
        debug!(%answer, granted, "answer judged");

        transition(&mut self.state, LockState::Signal)?;
        if granted {
            self.grant.engage();
        } else {
            self.blink_denial().await;
        }

        transition(&mut self.state, LockState::WaitRemoval)?;
        self.clock.wait_millis(POST_SIGNAL_DELAY_MS).await;
        self.wait_for_presence(false).await;
        self.clock.wait_millis(REMOVAL_SETTLE_MS).await;
        self.grant.disengage();
        self.clock.wait_millis(REMOVAL_DEBOUNCE_MS).await;
        transition(&mut self.state, LockState::WaitInsertion)?;

        Ok(if granted {
            AccessOutcome::Granted
        } else {
            AccessOutcome::Denied
        })
    }

    async fn wait_for_presence(&self, present: bool) {
        while self.presence.is_present() != present {
            self.clock.wait_millis(PRESENCE_POLL_MS).await;
        }
    }

    async fn blink_denial(&mut self) {
        for _ in 0..BLINK_COUNT {
            self.grant.engage();
            self.clock.wait_millis(BLINK_PERIOD_MS).await;
            self.grant.disengage();
            self.clock.wait_millis(BLINK_PERIOD_MS).await;
        }
    }
}
