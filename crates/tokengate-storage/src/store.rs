//! Persistent balance store over the EEPROM cell registers.

use tokengate_core::constants::{
    BALANCE_ADDR, STRING_BASE_ADDR, STRING_REGION_CAPACITY, UNLOCK_FIRST, UNLOCK_SECOND,
};
use tokengate_core::{EepromAddr, Error, Result, TokenBalance};
use tokengate_hal::traits::EepromCells;
use tracing::trace;

/// Typed access to the persisted cells: the balance byte at a fixed
/// address and a NUL-terminated string region above it.
///
/// Writes are durable: `write_byte` drives the full arming sequence and
/// then busy-waits on the hardware's write-complete flag, so a caller
/// that gets control back may assume the value survives an immediate
/// power loss. Reads are assumed always immediately valid.
///
/// The store is single-threaded by design; the hardware write-busy flag
/// is the only gate against overlapping writes, and the one thread of
/// control never overlaps them.
#[derive(Debug)]
pub struct BalanceStore<E: EepromCells> {
    cells: E,
}

impl<E: EepromCells> BalanceStore<E> {
    /// Wrap the cell registers.
    pub fn new(cells: E) -> Self {
        BalanceStore { cells }
    }

    /// Read one cell.
    pub fn read_byte(&mut self, addr: EepromAddr) -> u8 {
        self.cells.select(addr.get());
        self.cells.set_read_strobe(true);
        let value = self.cells.output();
        self.cells.set_read_strobe(false);
        value
    }

    /// Write one cell and wait for the hardware to confirm it landed.
    pub fn write_byte(&mut self, addr: EepromAddr, value: u8) {
        self.cells.select(addr.get());
        self.cells.latch(value);
        self.cells.set_write_enable(true);
        self.cells.push_unlock(UNLOCK_FIRST);
        self.cells.push_unlock(UNLOCK_SECOND);
        self.cells.set_write_start(true);
        while !self.cells.write_done() {}
        self.cells.set_write_start(false);
        self.cells.set_write_enable(false);
        self.cells.clear_write_done();
        trace!(addr = %addr, value, "eeprom write committed");
    }

    /// Current token balance.
    pub fn balance(&mut self) -> TokenBalance {
        TokenBalance::new(self.read_byte(balance_addr()))
    }

    /// Persist a new token balance.
    pub fn set_balance(&mut self, balance: TokenBalance) {
        self.write_byte(balance_addr(), balance.get());
    }

    /// Persist a NUL-terminated string into the string region,
    /// byte by byte through the durable write primitive.
    ///
    /// # Errors
    /// Returns `Error::RegionOverflow` when the text plus terminator does
    /// not fit the region.
    pub fn put_string(&mut self, text: &str) -> Result<()> {
        let needed = text.len() + 1;
        if needed > STRING_REGION_CAPACITY {
            return Err(Error::RegionOverflow {
                len: needed,
                capacity: STRING_REGION_CAPACITY,
            });
        }
        let base = string_base();
        for (i, &byte) in text.as_bytes().iter().enumerate() {
            self.write_byte(offset_in_region(base, i), byte);
        }
        self.write_byte(offset_in_region(base, text.len()), 0);
        Ok(())
    }

    /// Read the string region up to its NUL terminator (or the region
    /// end, whichever comes first).
    pub fn get_string(&mut self) -> String {
        let base = string_base();
        let mut out = Vec::new();
        for i in 0..STRING_REGION_CAPACITY {
            let byte = self.read_byte(offset_in_region(base, i));
            if byte == 0 {
                break;
            }
            out.push(byte);
        }
        String::from_utf8_lossy(&out).into_owned()
    }
}

fn balance_addr() -> EepromAddr {
    EepromAddr::new(BALANCE_ADDR).expect("balance address is in range")
}

fn string_base() -> EepromAddr {
    EepromAddr::new(STRING_BASE_ADDR).expect("string base address is in range")
}

fn offset_in_region(base: EepromAddr, i: usize) -> EepromAddr {
    base.offset(i as u8)
        .expect("offset stays inside the string region")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tokengate_hal::mock::{MockEeprom, MockEepromHandle};

    fn store() -> (BalanceStore<MockEeprom>, MockEepromHandle) {
        let (eeprom, handle) = MockEeprom::new();
        (BalanceStore::new(eeprom), handle)
    }

    #[test]
    fn test_round_trip_all_byte_values() {
        let (mut store, _handle) = store();
        let addr = EepromAddr::new(5).unwrap();
        for value in 0..=u8::MAX {
            store.write_byte(addr, value);
            assert_eq!(store.read_byte(addr), value);
        }
    }

    #[test]
    fn test_write_waits_for_completion_flag() {
        let (mut store, handle) = store();
        handle.set_write_latency(4);

        let addr = EepromAddr::new(2).unwrap();
        store.write_byte(addr, 0x77);

        // Returning from write_byte means the cell already holds the value.
        assert_eq!(handle.peek(2), 0x77);
        assert_eq!(handle.writes_completed(), 1);
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(255)]
    fn test_balance_round_trip(#[case] tokens: u8) {
        let (mut store, handle) = store();
        store.set_balance(TokenBalance::new(tokens));
        assert_eq!(store.balance().get(), tokens);
        assert_eq!(handle.peek(BALANCE_ADDR), tokens);
    }

    #[test]
    fn test_seeded_balance_is_read() {
        let (mut store, handle) = store();
        handle.seed(BALANCE_ADDR, 8);
        assert_eq!(store.balance().get(), 8);
    }

    #[test]
    fn test_string_region_round_trip() {
        let (mut store, handle) = store();
        store.put_string("gold card").unwrap();
        assert_eq!(store.get_string(), "gold card");

        // NUL terminator sits right after the text.
        assert_eq!(handle.peek(STRING_BASE_ADDR + 9), 0);
    }

    #[test]
    fn test_string_stops_at_terminator() {
        let (mut store, _handle) = store();
        store.put_string("ab").unwrap();
        store.put_string("x").unwrap();
        assert_eq!(store.get_string(), "x");
    }

    #[test]
    fn test_string_does_not_touch_balance() {
        let (mut store, _handle) = store();
        store.set_balance(TokenBalance::new(8));
        store.put_string("hello").unwrap();
        assert_eq!(store.balance().get(), 8);
    }

    #[test]
    fn test_string_overflow_is_rejected() {
        let (mut store, handle) = store();
        let too_long = "x".repeat(STRING_REGION_CAPACITY);
        let result = store.put_string(&too_long);
        assert!(matches!(result, Err(Error::RegionOverflow { .. })));
        // Nothing was written.
        assert_eq!(handle.writes_completed(), 0);
    }

    #[test]
    fn test_longest_fitting_string() {
        let (mut store, _handle) = store();
        let text = "x".repeat(STRING_REGION_CAPACITY - 1);
        store.put_string(&text).unwrap();
        assert_eq!(store.get_string(), text);
    }
}
