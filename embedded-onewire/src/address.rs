use crate::OneWireCrc;
use core::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// 64-bit ROM address of a 1-Wire device.
///
/// | Byte | Description |
/// |------|-------------|
/// | 0 | Family code (e.g., 0x3B for MAX31850) |
/// | 1-6 | Serial number, least significant byte first |
/// | 7 | CRC-8 of bytes 0-6 |
///
/// Bytes are kept in bus order, i.e. the order in which they are written
/// after a Match ROM command.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Address([u8; Address::BYTES]);

impl Address {
    /// The length of a device address in bytes.
    pub const BYTES: usize = 8;

    /// Creates an address from its bytes in bus order.
    pub const fn new(bytes: [u8; Self::BYTES]) -> Self {
        Self(bytes)
    }

    /// Family code of the device.
    pub const fn family(&self) -> u8 {
        self.0[0]
    }

    /// 48-bit serial number, least significant byte first.
    pub fn serial(&self) -> [u8; 6] {
        let mut serial = [0; 6];
        serial.copy_from_slice(&self.0[1..7]);
        serial
    }

    /// CRC byte stored in the address.
    pub const fn crc(&self) -> u8 {
        self.0[7]
    }

    /// Whether the stored CRC matches the first seven bytes.
    pub fn is_crc_valid(&self) -> bool {
        OneWireCrc::validate(&self.0)
    }

    /// The address bytes in bus order.
    pub const fn as_bytes(&self) -> &[u8; Self::BYTES] {
        &self.0
    }
}

impl From<[u8; Address::BYTES]> for Address {
    fn from(bytes: [u8; Address::BYTES]) -> Self {
        Self(bytes)
    }
}

impl From<Address> for [u8; Address::BYTES] {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

/// ROM codes as 64-bit integers have the family code in the lowest byte.
impl From<u64> for Address {
    fn from(rom: u64) -> Self {
        Self(rom.to_le_bytes())
    }
}

impl From<Address> for u64 {
    fn from(addr: Address) -> Self {
        u64::from_le_bytes(addr.0)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Formats as dash separated upper case hex, family code first
/// (`3B-2D-62-18-00-00-00-E8`).
impl Display for Address {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{b:02X}")?;
        }
        Ok(())
    }
}

/// Error returned when parsing an [`Address`] from a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressParseError {
    /// Fewer than 8 bytes were given.
    NotEnough,
    /// More than 8 bytes were given.
    TooMany,
    /// A character is not a hex digit or separator.
    Invalid,
}

impl Display for AddressParseError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(match self {
            Self::NotEnough => "address has fewer than 8 bytes",
            Self::TooMany => "address has more than 8 bytes",
            Self::Invalid => "address contains a non-hex character",
        })
    }
}

impl core::error::Error for AddressParseError {}

/// Accepts 16 hex digits, optionally separated by `-`, `:` or whitespace.
impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; Self::BYTES];
        let mut digits = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ':' && *c != '-');
        for b in bytes.iter_mut() {
            match (digits.next(), digits.next()) {
                (Some(h), Some(l)) => match (h.to_digit(16), l.to_digit(16)) {
                    (Some(h), Some(l)) => *b = ((h << 4) | l) as u8,
                    _ => return Err(AddressParseError::Invalid),
                },
                (Some(h), None) if h.to_digit(16).is_none() => {
                    return Err(AddressParseError::Invalid);
                }
                _ => return Err(AddressParseError::NotEnough),
            }
        }
        if digits.next().is_some() {
            return Err(AddressParseError::TooMany);
        }
        Ok(Self(bytes))
    }
}
