//! Signed fixed-point fields scattered over scratchpad bytes.
//!
//! A [`FieldMap`] lists which scratchpad bits form the magnitude bits of a
//! value, where its sign bit lives and what each magnitude bit is worth. The
//! bits of a field need not be contiguous nor byte aligned.

use crate::scratchpad::SCRATCHPAD_LEN;

/// Location of a single bit in the scratchpad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitPos {
    /// Scratchpad byte index.
    pub byte: usize,
    /// Bit index within the byte, 0 being the least significant.
    pub bit: u8,
}

impl BitPos {
    /// Bit `bit` of scratchpad byte `byte`.
    pub const fn new(byte: usize, bit: u8) -> Self {
        Self { byte, bit }
    }

    /// Whether this bit is set in `bytes`.
    pub fn is_set(&self, bytes: &[u8; SCRATCHPAD_LEN]) -> bool {
        bytes[self.byte] & (1 << self.bit) != 0
    }
}

/// One scratchpad bit copied into bit `to` of a field's accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitMove {
    /// Where the bit is read from.
    pub from: BitPos,
    /// Accumulator bit it is written to.
    pub to: u8,
}

/// Shorthand for building bit tables.
pub const fn mv(byte: usize, bit: u8, to: u8) -> BitMove {
    BitMove {
        from: BitPos::new(byte, bit),
        to,
    }
}

/// Layout of a sign-magnitude encoded, two's complement fixed-point field.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    bits: &'static [BitMove],
    sign: BitPos,
    weights: &'static [i8],
}

impl FieldMap {
    /// Describes a field.
    ///
    /// `bits` fills an accumulator of `bits.len()` bits, `sign` is the two's
    /// complement sign bit, and `weights[i]` is the power of two that
    /// accumulator bit `i` is worth.
    ///
    /// # Panics
    /// Panics (at compile time when used in a `const`) if the field is wider
    /// than 16 bits, if there is not exactly one weight per bit, or if a bit
    /// lies outside the scratchpad or the accumulator.
    pub const fn new(bits: &'static [BitMove], sign: BitPos, weights: &'static [i8]) -> Self {
        assert!(!bits.is_empty() && bits.len() <= 16, "field must be 1 to 16 bits wide");
        assert!(bits.len() == weights.len(), "need one weight per field bit");
        let mut i = 0;
        while i < bits.len() {
            assert!(bits[i].from.byte < SCRATCHPAD_LEN, "source byte outside the scratchpad");
            assert!(bits[i].from.bit < 8, "source bit outside the byte");
            assert!((bits[i].to as usize) < bits.len(), "destination bit outside the field");
            i += 1;
        }
        assert!(sign.byte < SCRATCHPAD_LEN && sign.bit < 8, "sign bit outside the scratchpad");
        Self {
            bits,
            sign,
            weights,
        }
    }

    /// Number of magnitude bits.
    pub const fn width(&self) -> usize {
        self.bits.len()
    }

    /// Value of the least significant accumulator bit.
    pub fn resolution(&self) -> f64 {
        self.weights.iter().copied().map(pow2).fold(f64::INFINITY, f64::min)
    }

    /// The sign bit of the field.
    pub fn sign(&self) -> BitPos {
        self.sign
    }

    /// Gathers the magnitude bits into an accumulator, sign not included.
    pub fn raw(&self, bytes: &[u8; SCRATCHPAD_LEN]) -> u16 {
        self.bits
            .iter()
            .filter(|m| m.from.is_set(bytes))
            .fold(0, |acc, m| acc | (1 << m.to))
    }

    /// Whether the field's sign bit is set.
    pub fn is_negative(&self, bytes: &[u8; SCRATCHPAD_LEN]) -> bool {
        self.sign.is_set(bytes)
    }

    /// Decodes the field from a scratchpad.
    ///
    /// Negative values are stored as two's complement over the field width; the
    /// magnitude is recovered before weighting. A magnitude of zero is reported
    /// as `0.0` whatever the sign bit says.
    pub fn decode(&self, bytes: &[u8; SCRATCHPAD_LEN]) -> f64 {
        let mask = u16::MAX >> (16 - self.width());
        let negative = self.is_negative(bytes);
        let mut acc = self.raw(bytes);
        if negative {
            acc = (!acc & mask).wrapping_add(1);
        }
        // Folding from +0.0, `Sum` for floats starts at -0.0.
        let magnitude = self
            .weights
            .iter()
            .enumerate()
            .filter(|&(i, _)| acc & (1 << i) != 0)
            .map(|(_, &exp)| pow2(exp))
            .fold(0.0, |sum, w| sum + w);
        if negative && magnitude != 0.0 {
            -magnitude
        } else {
            magnitude
        }
    }
}

/// `2^exp`, exact for every exponent an `i8` can hold.
pub const fn pow2(exp: i8) -> f64 {
    f64::from_bits(((1023 + exp as i64) as u64) << 52)
}
