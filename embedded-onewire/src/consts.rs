//! ROM command constants for 1-Wire communication.

/// Command to match a specific ROM address in 1-Wire communication (non-overdrive mode).
///
/// Must be followed by the 8 bytes of the ROM address, family code first.
pub const ONEWIRE_MATCH_ROM_CMD: u8 = 0x55;
