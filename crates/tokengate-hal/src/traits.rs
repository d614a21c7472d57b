//! Capability traits for the physical signals of both devices.
//!
//! Each trait wraps exactly one hardware surface (the shared data line, the
//! card-presence input, the grant output, the lock's receive FIFO, the
//! EEPROM cell registers) as explicit get/set operations. Protocol logic
//! depends only on these capabilities, never on memory-mapped state, so any
//! of them can be substituted by the in-memory mocks in [`crate::mock`].
//!
//! The operations here are register-grained and synchronous; everything that
//! *waits* goes through [`BitClock`](crate::clock::BitClock) instead.

/// Logic level of the shared serial wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLevel {
    /// Idle / stop-bit / logical one.
    High,

    /// Start-bit / logical zero.
    Low,
}

impl LineLevel {
    /// Level encoding a single data bit.
    #[must_use]
    pub fn from_bit(bit: bool) -> Self {
        if bit { LineLevel::High } else { LineLevel::Low }
    }

    /// Whether the level is high.
    #[must_use]
    pub fn is_high(self) -> bool {
        matches!(self, LineLevel::High)
    }
}

/// The single half-duplex data wire shared by both devices.
///
/// Both directions use the same physical line; only one side drives it at a
/// time by protocol convention. A released line floats high through the
/// pull-up, which is also the idle state.
pub trait DataLine: Send + Sync {
    /// Actively drive the line to `level`.
    fn drive(&mut self, level: LineLevel);

    /// Stop driving; the pull-up network keeps the line at its idle level.
    fn release(&mut self);

    /// Sample the current line level.
    fn sample(&self) -> LineLevel;
}

/// Card-presence input on the lock side.
pub trait PresenceSense: Send + Sync {
    /// Whether a card is currently seated in the reader.
    fn is_present(&self) -> bool;
}

/// The single boolean grant output on the lock side.
///
/// What the signal actually drives (a strike plate, a relay, an indicator)
/// is outside this core; the lock only engages and disengages it.
pub trait GrantSignal: Send + Sync {
    /// Assert the grant signal.
    fn engage(&mut self);

    /// Deassert the grant signal.
    fn disengage(&mut self);

    /// Current state of the signal.
    fn is_engaged(&self) -> bool;
}

/// Receive FIFO of the lock's hardware-assisted serial port.
///
/// The FIFO holds bytes that arrived while nobody was reading. Because the
/// transmit and receive paths share one wire, the FIFO fills with the lock's
/// own transmissions; purging it through [`set_receiver_enabled`] recycling
/// is part of the protocol (see `recover_overrun` on the serial link).
///
/// [`set_receiver_enabled`]: UartFifo::set_receiver_enabled
pub trait UartFifo: Send + Sync {
    /// Queue one byte for transmission.
    fn write(&mut self, byte: u8);

    /// Pop the oldest received byte, if any.
    fn try_take(&mut self) -> Option<u8>;

    /// Enable or disable the receiver.
    ///
    /// Disabling then re-enabling clears a receiver overrun condition;
    /// while overrun, the receiver drops everything that arrives.
    fn set_receiver_enabled(&mut self, enabled: bool);
}

/// Register surface of the persistent EEPROM cell array.
///
/// Writes go through a deliberate arming dance: latch address and data,
/// enable writes, stage the two-byte unlock sequence, pulse write-start,
/// then poll [`write_done`] until the hardware confirms the cell landed.
/// A write that skips any arming step never completes.
///
/// [`write_done`]: EepromCells::write_done
pub trait EepromCells: Send + Sync {
    /// Latch the cell address for the next read or write.
    fn select(&mut self, addr: u8);

    /// Latch the data byte for the next write.
    fn latch(&mut self, value: u8);

    /// Read the data latch (holds the cell value after a read strobe).
    fn output(&self) -> u8;

    /// Assert or clear the read strobe; asserting loads the data latch
    /// from the selected cell.
    fn set_read_strobe(&mut self, on: bool);

    /// Enable or disable writes.
    fn set_write_enable(&mut self, on: bool);

    /// Stage one byte of the unlock sequence.
    fn push_unlock(&mut self, byte: u8);

    /// Assert or clear write-start. Asserting begins the write cycle if
    /// the unlock sequence was staged while writes were enabled.
    fn set_write_start(&mut self, on: bool);

    /// Whether the hardware has confirmed the current write cycle.
    fn write_done(&self) -> bool;

    /// Clear the completion flag in software.
    fn clear_write_done(&mut self);
}
