//! Protocol, timing, and storage constants.
//!
//! Everything both devices must agree on lives here: the wire messages,
//! the serial line parameters, the fixed delays of the session choreography,
//! and the EEPROM layout. The values are part of the wire protocol: a card
//! and a lock built with different values will not interoperate.

// ============================================================================
// Serial line parameters
// ============================================================================

/// Line speed in bits per second.
///
/// One bit period at this rate is ~104.17 µs; a full character frame
/// (start + 8 data + stop) occupies ~1.04 ms on the wire.
pub const BAUD_RATE: u32 = 9_600;

/// Data bits per character frame.
pub const DATA_BITS: u32 = 8;

/// Total bits per character frame: 1 start + 8 data + 1 stop, no parity.
pub const BITS_PER_FRAME: u32 = 10;

// ============================================================================
// Wire messages
// ============================================================================

/// Query sent by the lock when a card is seated.
pub const MSG_QUERY: &str = "has money?\r\n";

/// Affirmative answer: the withdrawal was applied.
pub const MSG_YES: &str = "yes\r\n";

/// Negative answer: insufficient balance, nothing changed.
pub const MSG_NO: &str = "no\r\n";

/// What a received query line looks like once the terminator is stripped.
pub const CANDIDATE_QUERY: &str = "has money?";

/// What a received affirmative answer looks like once stripped.
pub const CANDIDATE_YES: &str = "yes";

/// Recharge commands a third party may send to the card.
///
/// Each sets the balance to its literal decimal value, overwriting
/// whatever was stored before.
pub const RECHARGE_OPTIONS: [&str; 3] = ["2", "4", "8"];

/// Byte substituted for a real reception when the card is pulled mid-read.
///
/// Returning the line terminator makes the pending `read_line` complete
/// with an empty line, which then fails the answer comparison the same way
/// a wrong answer would.
pub const REMOVAL_SENTINEL: u8 = b'\r';

/// Maximum payload bytes in one line, terminator excluded.
pub const MAX_LINE_PAYLOAD: usize = 15;

// ============================================================================
// Token economy
// ============================================================================

/// Tokens withdrawn by one successful query-triggered transaction.
pub const WITHDRAW_AMOUNT: u8 = 2;

// ============================================================================
// EEPROM layout
// ============================================================================

/// Number of addressable EEPROM cells.
pub const EEPROM_SIZE: usize = 64;

/// Cell holding the token balance.
pub const BALANCE_ADDR: u8 = 0x00;

/// First cell of the NUL-terminated string region.
pub const STRING_BASE_ADDR: u8 = 0x10;

/// Bytes available to the string region, terminator included.
pub const STRING_REGION_CAPACITY: usize = EEPROM_SIZE - STRING_BASE_ADDR as usize;

/// First byte of the write-arm unlock sequence.
pub const UNLOCK_FIRST: u8 = 0x55;

/// Second byte of the write-arm unlock sequence.
pub const UNLOCK_SECOND: u8 = 0xAA;

// ============================================================================
// Session timing (card)
// ============================================================================

/// Delay after power-up before the card starts listening.
pub const POWER_ON_DELAY_MS: u32 = 50;

/// Delay between classifying a line and acting on it.
///
/// Gives the mechanical lock actuator time to be ready for the response.
pub const SETTLE_DELAY_MS: u32 = 150;

// ============================================================================
// Session timing (lock)
// ============================================================================

/// Debounce after the presence signal asserts.
pub const INSERTION_DEBOUNCE_MS: u32 = 100;

/// Extra settling time on top of the insertion debounce.
pub const INSERTION_SETTLE_MS: u32 = 50;

/// Wait for the transmit side to fully drain after sending the query.
pub const DRAIN_DELAY_MS: u32 = 100;

/// Pause between judging the answer and starting the removal wait.
pub const POST_SIGNAL_DELAY_MS: u32 = 100;

/// Pause after the presence signal deasserts, before dropping the grant.
pub const REMOVAL_SETTLE_MS: u32 = 10;

/// Debounce after the card has left the reader.
pub const REMOVAL_DEBOUNCE_MS: u32 = 100;

/// Polling interval while watching the presence signal.
pub const PRESENCE_POLL_MS: u32 = 1;

/// Number of grant-signal blinks on a denied access.
pub const BLINK_COUNT: u32 = 3;

/// On time and off time of one denial blink.
pub const BLINK_PERIOD_MS: u32 = 500;
