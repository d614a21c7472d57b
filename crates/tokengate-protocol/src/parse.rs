//! Recharge amount parsing.

use crate::line::Line;

/// Parse a line as an unsigned decimal integer, modulo 256.
///
/// Each byte contributes `(byte - b'0') * 10^position` with wrapping
/// 8-bit arithmetic. There is no digit validation and no overflow check:
/// non-digit input produces an undefined-looking but deterministic
/// numeric result rather than a rejection, and multi-digit values reduce
/// modulo 256. Callers that care must pre-validate; the session engine
/// only reaches this after an exact match against the recharge commands.
#[must_use]
pub fn parse_amount(line: &Line) -> u8 {
    let mut sum = 0u8;
    let mut power = 1u8;
    for &byte in line.as_bytes().iter().rev() {
        let digit = byte.wrapping_sub(b'0');
        sum = sum.wrapping_add(digit.wrapping_mul(power));
        power = power.wrapping_mul(10);
    }
    sum
}
