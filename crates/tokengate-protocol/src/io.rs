//! Line-oriented reading and writing over a serial link.

use crate::line::Line;
use tokengate_core::Result;
use tokengate_serial::SerialLink;

/// Receive one line.
///
/// Appends bytes until a carriage return arrives (consumed, not stored) or
/// the 15-byte payload cap is hit, in which case the overflowing byte is
/// consumed and dropped. Input past the cap is silently truncated; nothing
/// is reported or retried. Restartable: call again for the next line.
///
/// A removal sentinel from the link surfaces here as an empty line.
///
/// # Errors
/// Propagates `Error::Disconnected` from the link.
pub async fn read_line<L: SerialLink>(link: &mut L) -> Result<Line> {
    let mut line = Line::empty();
    loop {
        let byte = link.recv_byte().await?;
        if byte == b'\r' || !line.push(byte) {
            return Ok(line);
        }
    }
}

/// Transmit every byte of `text`.
///
/// The terminator convention is carried by the message constants
/// themselves (`"yes\r\n"` and friends); nothing is appended here.
///
/// # Errors
/// Propagates `Error::Disconnected` from the link.
pub async fn write_line<L: SerialLink>(link: &mut L, text: &str) -> Result<()> {
    for &byte in text.as_bytes() {
        link.send_byte(byte).await?;
    }
    Ok(())
}
