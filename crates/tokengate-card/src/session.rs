//! The card-side command interpreter.

use tokengate_core::Result;
use tokengate_core::constants::{
    CANDIDATE_QUERY, MSG_NO, MSG_YES, POWER_ON_DELAY_MS, RECHARGE_OPTIONS, SETTLE_DELAY_MS,
};
use tokengate_core::types::TokenBalance;
use tokengate_hal::clock::BitClock;
use tokengate_hal::traits::EepromCells;
use tokengate_protocol::{parse_amount, read_line, write_line};
use tokengate_serial::SerialLink;
use tokengate_storage::BalanceStore;
use tracing::{debug, info, trace};

/// Stateful command interpreter running on the card.
///
/// Answers one balance query per insertion (a withdrawal is attempted at
/// most once per session; repeated queries are silently ignored) and
/// applies recharge commands unconditionally.
///
/// The card is powered only while seated in a reader, so the session flag
/// normally resets by construction: a new insertion powers up a fresh
/// engine. Hosts where the card process outlives insertions must call
/// [`reset_session`](SessionEngine::reset_session) on their insertion
/// event instead.
#[derive(Debug)]
pub struct SessionEngine<S: SerialLink, E: EepromCells, C: BitClock> {
    link: S,
    store: BalanceStore<E>,
    clock: C,
    withdrawn_this_session: bool,
}

impl<S: SerialLink, E: EepromCells, C: BitClock> SessionEngine<S, E, C> {
    /// Create an engine for a fresh insertion: no withdrawal yet.
    pub fn new(link: S, store: BalanceStore<E>, clock: C) -> Self {
        SessionEngine {
            link,
            store,
            clock,
            withdrawn_this_session: false,
        }
    }

    /// Serve commands until the link goes away (the card loses power).
    ///
    /// Starts with the power-stabilization delay, then loops over
    /// [`service_one`](SessionEngine::service_one) indefinitely.
    ///
    /// # Errors
    /// Returns the link's `Disconnected` error once the wire is gone.
    pub async fn run(&mut self) -> Result<()> {
        self.clock.wait_millis(POWER_ON_DELAY_MS).await;
        loop {
            self.service_one().await?;
        }
    }

    /// Receive and handle exactly one line.
    ///
    /// # Errors
    /// Propagates link errors; every protocol-level oddity (unknown
    /// command, repeated query, odd recharge text) is absorbed silently.
    pub async fn service_one(&mut self) -> Result<()> {
        let line = read_line(&mut self.link).await?;

        let is_query = line.matches(CANDIDATE_QUERY);
        let is_recharge = RECHARGE_OPTIONS.iter().any(|c| line.matches(c));

        // Give the lock actuator time to get ready for the response.
        self.clock.wait_millis(SETTLE_DELAY_MS).await;

        if is_query {
            self.handle_query().await?;
        } else if is_recharge {
            let amount = parse_amount(&line);
            self.store.set_balance(TokenBalance::new(amount));
            info!(amount, "balance recharged");
        } else {
            trace!(%line, "ignoring unrecognized line");
        }
        Ok(())
    }

    async fn handle_query(&mut self) -> Result<()> {
        if self.withdrawn_this_session {
            debug!("repeated query in this session, staying silent");
            return Ok(());
        }
        self.withdrawn_this_session = true;

        let balance = self.store.balance();
        match balance.withdraw() {
            Some(rest) => {
                write_line(&mut self.link, MSG_YES).await?;
                self.store.set_balance(rest);
                info!(before = balance.get(), after = rest.get(), "withdrawal applied");
            }
            None => {
                write_line(&mut self.link, MSG_NO).await?;
                info!(balance = balance.get(), "insufficient balance, nothing withdrawn");
            }
        }
        Ok(())
    }

    /// Begin a new session: the next query may withdraw again.
    pub fn reset_session(&mut self) {
        self.withdrawn_this_session = false;
    }

    /// Whether this session's withdrawal has already been attempted.
    #[must_use]
    pub fn has_withdrawn(&self) -> bool {
        self.withdrawn_this_session
    }
}
