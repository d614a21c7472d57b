use crate::{
    Result,
    constants::{EEPROM_SIZE, WITHDRAW_AMOUNT},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token balance persisted on the card (0-255).
///
/// The balance only ever changes in two ways: a withdrawal of exactly
/// [`WITHDRAW_AMOUNT`] tokens, applied only when the stored value covers it,
/// and a recharge that overwrites the stored value unconditionally.
///
/// # Examples
///
/// ```
/// use tokengate_core::TokenBalance;
///
/// let balance = TokenBalance::new(8);
/// let rest = balance.withdraw().unwrap();
/// assert_eq!(rest.get(), 6);
///
/// let broke = TokenBalance::new(1);
/// assert!(broke.withdraw().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenBalance(u8);

impl TokenBalance {
    /// Wrap a raw token count. All 256 values are representable.
    #[must_use]
    pub const fn new(tokens: u8) -> Self {
        TokenBalance(tokens)
    }

    /// Get the raw token count.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Whether one withdrawal can be covered.
    #[must_use]
    pub const fn can_withdraw(self) -> bool {
        self.0 >= WITHDRAW_AMOUNT
    }

    /// Apply one withdrawal of [`WITHDRAW_AMOUNT`] tokens.
    ///
    /// Returns the post-withdrawal balance, or `None` when the stored value
    /// does not cover the amount (in which case nothing may be persisted).
    #[must_use]
    pub fn withdraw(self) -> Option<TokenBalance> {
        if self.can_withdraw() {
            Some(TokenBalance(self.0 - WITHDRAW_AMOUNT))
        } else {
            None
        }
    }
}

impl fmt::Display for TokenBalance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} tokens", self.0)
    }
}

/// Validated EEPROM cell address (0..[`EEPROM_SIZE`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EepromAddr(u8);

impl EepromAddr {
    /// Create a new address with range validation.
    ///
    /// # Errors
    /// Returns `Error::AddressOutOfRange` if the address does not fall
    /// inside the cell array.
    pub fn new(addr: u8) -> Result<Self> {
        if (addr as usize) >= EEPROM_SIZE {
            return Err(Error::AddressOutOfRange { addr });
        }
        Ok(EepromAddr(addr))
    }

    /// Get the raw address as u8.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Address `offset` cells above this one.
    ///
    /// # Errors
    /// Returns `Error::AddressOutOfRange` if the result leaves the array.
    pub fn offset(self, offset: u8) -> Result<Self> {
        let addr = self.0.checked_add(offset).unwrap_or(u8::MAX);
        EepromAddr::new(addr)
    }
}

impl fmt::Display for EepromAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2, Some(0))]
    #[case(3, Some(1))]
    #[case(8, Some(6))]
    #[case(255, Some(253))]
    #[case(1, None)]
    #[case(0, None)]
    fn test_withdraw(#[case] start: u8, #[case] expected: Option<u8>) {
        let balance = TokenBalance::new(start);
        assert_eq!(balance.withdraw().map(TokenBalance::get), expected);
    }

    #[test]
    fn test_withdraw_is_exactly_two() {
        for start in 2..=u8::MAX {
            let rest = TokenBalance::new(start).withdraw().unwrap();
            assert_eq!(start - rest.get(), WITHDRAW_AMOUNT);
        }
    }

    #[test]
    fn test_balance_display() {
        assert_eq!(TokenBalance::new(6).to_string(), "6 tokens");
    }

    #[rstest]
    #[case(0, true)]
    #[case(63, true)]
    #[case(64, false)]
    #[case(255, false)]
    fn test_addr_validation(#[case] addr: u8, #[case] ok: bool) {
        assert_eq!(EepromAddr::new(addr).is_ok(), ok);
    }

    #[test]
    fn test_addr_offset() {
        let base = EepromAddr::new(0x10).unwrap();
        assert_eq!(base.offset(5).unwrap().get(), 0x15);
        assert!(base.offset(0x30).is_err());
    }

    #[test]
    fn test_addr_offset_saturates_before_check() {
        let base = EepromAddr::new(0x3F).unwrap();
        assert!(base.offset(u8::MAX).is_err());
    }

    #[test]
    fn test_addr_display() {
        assert_eq!(EepromAddr::new(0x10).unwrap().to_string(), "0x10");
    }
}
