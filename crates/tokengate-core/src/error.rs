use thiserror::Error;

/// Errors shared across the Tokengate workspace.
#[derive(Error, Debug)]
pub enum Error {
    /// The serial peer went away (card unpowered, wire dropped).
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// A lock state machine transition that the protocol does not allow.
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    /// EEPROM address outside the addressable cell array.
    #[error("EEPROM address out of range: {addr:#04x}")]
    AddressOutOfRange { addr: u8 },

    /// Persisted string does not fit the string region.
    #[error("String region overflow: {len} bytes exceeds capacity {capacity}")]
    RegionOverflow { len: usize, capacity: usize },

    /// Malformed data handed to a constructor.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// IO errors from host-side plumbing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_display() {
        let error = Error::disconnected("card wire");
        assert!(matches!(error, Error::Disconnected { .. }));
        assert_eq!(error.to_string(), "Device disconnected: card wire");
    }

    #[test]
    fn test_address_out_of_range_display() {
        let error = Error::AddressOutOfRange { addr: 0x40 };
        assert_eq!(error.to_string(), "EEPROM address out of range: 0x40");
    }

    #[test]
    fn test_region_overflow_display() {
        let error = Error::RegionOverflow {
            len: 60,
            capacity: 48,
        };
        assert_eq!(
            error.to_string(),
            "String region overflow: 60 bytes exceeds capacity 48"
        );
    }
}
