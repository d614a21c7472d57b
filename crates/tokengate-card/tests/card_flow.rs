//! End-to-end walk of the card's token economy across several insertions.
//!
//! Each insertion powers the card up fresh (a new engine over the same
//! persistent cells), which is what resets the once-per-session
//! withdrawal flag.

use tokengate_card::SessionEngine;
use tokengate_core::constants::BALANCE_ADDR;
use tokengate_hal::clock::BaudClock;
use tokengate_hal::mock::MockEeprom;
use tokengate_protocol::write_line;
use tokengate_serial::mock::{MockSerial, wire};
use tokengate_storage::BalanceStore;

/// What the card sees of the lock's query: the trailing newline of the
/// wire message is lost while the card is busy, so it ends at the
/// carriage return.
const QUERY: &str = "has money?\r";

/// Power the card up in a reader: fresh engine, fresh wire, same cells.
fn power_up(eeprom: &MockEeprom) -> (SessionEngine<MockSerial, MockEeprom, BaudClock>, MockSerial) {
    let (reader_side, card_side) = wire();
    let engine = SessionEngine::new(
        card_side,
        BalanceStore::new(eeprom.clone()),
        BaudClock::default(),
    );
    (engine, reader_side)
}

async fn query(
    engine: &mut SessionEngine<MockSerial, MockEeprom, BaudClock>,
    reader: &mut MockSerial,
) -> Option<String> {
    write_line(reader, QUERY).await.unwrap();
    engine.service_one().await.unwrap();
    if let Some(first) = reader.try_recv_byte() {
        let mut answer = vec![first];
        while let Some(byte) = reader.try_recv_byte() {
            answer.push(byte);
        }
        Some(String::from_utf8(answer).unwrap())
    } else {
        None
    }
}

async fn recharge(
    engine: &mut SessionEngine<MockSerial, MockEeprom, BaudClock>,
    reader: &mut MockSerial,
    command: &str,
) {
    write_line(reader, command).await.unwrap();
    engine.service_one().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_token_economy_across_insertions() {
    let (eeprom, cells) = MockEeprom::new();
    cells.seed(BALANCE_ADDR, 8);

    // First insertion: withdrawal succeeds, then the session goes quiet.
    let (mut engine, mut reader) = power_up(&eeprom);
    assert_eq!(query(&mut engine, &mut reader).await.as_deref(), Some("yes\r\n"));
    assert_eq!(cells.peek(BALANCE_ADDR), 6);
    assert_eq!(query(&mut engine, &mut reader).await, None);
    assert_eq!(cells.peek(BALANCE_ADDR), 6);

    // Second insertion: a recharge overwrites (6 becomes 4, not 10) and
    // is visible to the query that follows it.
    let (mut engine, mut reader) = power_up(&eeprom);
    recharge(&mut engine, &mut reader, "4\r").await;
    assert_eq!(cells.peek(BALANCE_ADDR), 4);
    assert_eq!(query(&mut engine, &mut reader).await.as_deref(), Some("yes\r\n"));
    assert_eq!(cells.peek(BALANCE_ADDR), 2);
    assert_eq!(query(&mut engine, &mut reader).await, None);

    // Third insertion drains the card.
    let (mut engine, mut reader) = power_up(&eeprom);
    assert_eq!(query(&mut engine, &mut reader).await.as_deref(), Some("yes\r\n"));
    assert_eq!(cells.peek(BALANCE_ADDR), 0);

    // Fourth insertion: broke card answers no and stays untouched.
    let (mut engine, mut reader) = power_up(&eeprom);
    assert_eq!(query(&mut engine, &mut reader).await.as_deref(), Some("no\r\n"));
    assert_eq!(cells.peek(BALANCE_ADDR), 0);
}

#[tokio::test(start_paused = true)]
async fn test_withdrawals_only_ever_step_by_two() {
    let (eeprom, cells) = MockEeprom::new();
    cells.seed(BALANCE_ADDR, 7);

    let mut seen = vec![7u8];
    loop {
        let (mut engine, mut reader) = power_up(&eeprom);
        match query(&mut engine, &mut reader).await.as_deref() {
            Some("yes\r\n") => seen.push(cells.peek(BALANCE_ADDR)),
            Some("no\r\n") => break,
            other => panic!("unexpected answer: {other:?}"),
        }
    }

    assert_eq!(seen, vec![7, 5, 3, 1]);
    assert_eq!(cells.peek(BALANCE_ADDR), 1);
}
