//! Scripted demonstration of a card and a lock sharing one wire.
//!
//! Wires the mock peripherals back to back and plays four insertions:
//! a granted round, a third-party recharge, another granted round, and a
//! final blinking denial once the card runs dry. `RUST_LOG` controls
//! verbosity (try `RUST_LOG=debug`).

use std::time::Duration;
use tokengate_card::SessionEngine;
use tokengate_core::constants::BALANCE_ADDR;
use tokengate_hal::clock::BaudClock;
use tokengate_hal::mock::{MockEeprom, MockGrant, MockPresence, MockPresenceHandle};
use tokengate_hal::traits::PresenceSense;
use tokengate_lock::LockController;
use tokengate_serial::mock::{MockSerial, wire};
use tokengate_storage::BalanceStore;
use tokio::time::sleep;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (mut lock_side, card_side) = wire();
    let (presence, presence_handle) = MockPresence::new();
    let (grant, grant_handle) = MockGrant::new();
    let (eeprom, cells) = MockEeprom::new();
    cells.seed(BALANCE_ADDR, 8);
    info!(balance = cells.peek(BALANCE_ADDR), "card initialized");

    let check = presence.clone();
    lock_side.set_present_check(move || check.is_present());
    let recharger = lock_side.tap();

    let mut controller =
        LockController::new(lock_side, presence.clone(), grant, BaudClock::default());
    let lock_task = tokio::spawn(async move {
        let _ = controller.run().await;
    });
    let card_task = tokio::spawn(card_supervisor(card_side, eeprom, presence.clone()));

    // Round 1: funded card, steady grant (8 -> 6).
    play_round(&presence_handle, Duration::from_millis(1500)).await;
    info!(balance = cells.peek(BALANCE_ADDR), "after first round");

    // The third party on the shared wire queues a recharge; the card
    // applies it first thing at its next power-up, before the query.
    recharger.send_line("4\r")?;
    info!("recharger queued a 4-token balance");

    // Round 2: recharge overwrites to 4, query takes it to 2.
    play_round(&presence_handle, Duration::from_millis(1500)).await;
    info!(balance = cells.peek(BALANCE_ADDR), "after recharge round");

    // Round 3 drains the card (2 -> 0).
    play_round(&presence_handle, Duration::from_millis(1500)).await;
    info!(balance = cells.peek(BALANCE_ADDR), "after third round");

    // Round 4: broke card, blinking denial (the blink takes 3 s).
    play_round(&presence_handle, Duration::from_millis(4000)).await;
    info!(
        balance = cells.peek(BALANCE_ADDR),
        engaged = grant_handle.is_engaged(),
        "after denial round"
    );

    card_task.abort();
    lock_task.abort();
    Ok(())
}

/// Seat the card for `hold`, then pull it and let the contacts settle.
async fn play_round(presence: &MockPresenceHandle, hold: Duration) {
    presence.insert();
    sleep(hold).await;
    presence.remove();
    sleep(Duration::from_millis(400)).await;
}

/// Powers a fresh session engine whenever the card is seated and cuts it
/// when the card leaves, modeling the reader-powered card.
async fn card_supervisor(mut link: MockSerial, eeprom: MockEeprom, presence: MockPresence) {
    loop {
        while !presence.is_present() {
            sleep(Duration::from_millis(1)).await;
        }
        let mut engine = SessionEngine::new(
            &mut link,
            BalanceStore::new(eeprom.clone()),
            BaudClock::default(),
        );
        tokio::select! {
            result = engine.run() => {
                if result.is_err() {
                    return;
                }
            }
            () = removed(&presence) => {}
        }
        drop(engine);
        // An unpowered card hears nothing; bytes the session left behind
        // (the newline tail of CRLF messages) die with it.
        while link.try_recv_byte().is_some() {}
    }
}

async fn removed(presence: &MockPresence) {
    while presence.is_present() {
        sleep(Duration::from_millis(1)).await;
    }
}
