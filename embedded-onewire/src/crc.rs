/// Calculate CRC-8 used in 1-Wire communications.
///
/// This is the Maxim/Dallas CRC-8 (polynomial `x^8 + x^5 + x^4 + 1`), shifted
/// in least significant bit first. It protects ROM addresses as well as the
/// scratchpad of most 1-Wire sensors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OneWireCrc(u8);

impl OneWireCrc {
    /// Feed one byte into the CRC `state` and return the new state.
    ///
    /// Start from state `0` and apply this to every byte of a sequence in
    /// order; the final state is the CRC of the sequence.
    pub const fn checksum(byte: u8, state: u8) -> u8 {
        let mut crc = state;
        let mut byte = byte;
        let mut i = 0;
        while i < 8 {
            let mix = (crc ^ byte) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8c;
            }
            byte >>= 1;
            i += 1;
        }
        crc
    }

    /// Get the current CRC value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Update the CRC with the incoming byte.
    pub fn update(&mut self, byte: u8) {
        #[cfg(feature = "crc-table")]
        {
            self.0 = CRC_TABLE[(self.0 ^ byte) as usize];
        }
        #[cfg(not(feature = "crc-table"))]
        {
            self.0 = Self::checksum(byte, self.0);
        }
    }

    /// Compute the CRC of a sequence of bytes.
    pub fn compute(bytes: &[u8]) -> u8 {
        let mut crc = OneWireCrc::default();
        for &byte in bytes {
            crc.update(byte);
        }
        crc.value()
    }

    /// Validate a sequence of bytes where the last byte is the 1-Wire CRC of
    /// the previous bytes.
    pub fn validate(sequence: &[u8]) -> bool {
        match sequence.split_last() {
            Some((&crc, data)) => Self::compute(data) == crc,
            None => false,
        }
    }
}

// The register only ever depends on `crc ^ byte`, so one lookup replaces the
// eight shift steps.
#[cfg(feature = "crc-table")]
static CRC_TABLE: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = OneWireCrc::checksum(i as u8, 0);
        i += 1;
    }
    table
};
