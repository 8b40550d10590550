use crate::{
    AddressPins, TemperatureReading,
    field::{BitMove, BitPos, FieldMap, mv},
    scratchpad::Scratchpad,
};

/// Everything that distinguishes one scratchpad-based thermocouple converter
/// from another: family code, conversion time and the scratchpad layout.
///
/// The bus protocol is shared; only this table changes between devices.
#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
    /// Human readable part name, used in log messages.
    pub name: &'static str,
    /// 1-Wire family code.
    pub family: u8,
    /// Worst case temperature conversion time.
    pub conversion_time_ms: u32,
    /// Cold-junction compensated thermocouple temperature, in °C.
    pub thermocouple: FieldMap,
    /// Internal cold-junction temperature, in °C.
    pub cold_junction: FieldMap,
    /// Any fault present.
    pub fault: BitPos,
    /// Thermocouple is open.
    pub open_circuit: BitPos,
    /// Thermocouple is shorted to ground.
    pub short_to_ground: BitPos,
    /// Thermocouple is shorted to the supply.
    pub short_to_supply: BitPos,
    /// Board strap pins, AD0 first. These do not take part in bus addressing.
    pub address_pins: [BitPos; 4],
}

impl Descriptor {
    /// Decodes a scratchpad fetched after a temperature conversion.
    pub fn temperature(&self, scratchpad: &Scratchpad) -> TemperatureReading {
        let bytes = scratchpad.bytes();
        TemperatureReading {
            crc_ok: scratchpad.crc_ok(),
            fault: self.fault.is_set(bytes),
            open_circuit: self.open_circuit.is_set(bytes),
            short_to_ground: self.short_to_ground.is_set(bytes),
            short_to_supply: self.short_to_supply.is_set(bytes),
            thermocouple: self.thermocouple.decode(bytes),
            cold_junction: self.cold_junction.decode(bytes),
        }
    }

    /// Reads the address strap pins out of a scratchpad.
    pub fn address_pins(&self, scratchpad: &Scratchpad) -> AddressPins {
        let bytes = scratchpad.bytes();
        AddressPins {
            crc_ok: scratchpad.crc_ok(),
            pins: self.address_pins.map(|pin| pin.is_set(bytes)),
        }
    }
}

// Byte 0 bits 2-7 and byte 1 bits 0-6, sign in byte 1 bit 7. 0.25 °C per LSB.
const THERMOCOUPLE_BITS: [BitMove; 13] = [
    mv(0, 2, 0),
    mv(0, 3, 1),
    mv(0, 4, 2),
    mv(0, 5, 3),
    mv(0, 6, 4),
    mv(0, 7, 5),
    mv(1, 0, 6),
    mv(1, 1, 7),
    mv(1, 2, 8),
    mv(1, 3, 9),
    mv(1, 4, 10),
    mv(1, 5, 11),
    mv(1, 6, 12),
];
const THERMOCOUPLE_WEIGHTS: [i8; 13] = [-2, -1, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

// Byte 2 bits 4-7 and byte 3 bits 0-6, sign in byte 3 bit 7. 0.0625 °C per LSB.
const COLD_JUNCTION_BITS: [BitMove; 11] = [
    mv(2, 4, 0),
    mv(2, 5, 1),
    mv(2, 6, 2),
    mv(2, 7, 3),
    mv(3, 0, 4),
    mv(3, 1, 5),
    mv(3, 2, 6),
    mv(3, 3, 7),
    mv(3, 4, 8),
    mv(3, 5, 9),
    mv(3, 6, 10),
];
const COLD_JUNCTION_WEIGHTS: [i8; 11] = [-4, -3, -2, -1, 0, 1, 2, 3, 4, 5, 6];

pub(crate) const THERMOCOUPLE: FieldMap =
    FieldMap::new(&THERMOCOUPLE_BITS, BitPos::new(1, 7), &THERMOCOUPLE_WEIGHTS);
pub(crate) const COLD_JUNCTION: FieldMap =
    FieldMap::new(&COLD_JUNCTION_BITS, BitPos::new(3, 7), &COLD_JUNCTION_WEIGHTS);

/// Scratchpad layout of the MAX31850/MAX31851.
///
/// | Byte | Contents |
/// |------|----------|
/// | 0 | thermocouple LSB, bit 0 fault |
/// | 1 | thermocouple MSB, bit 7 sign |
/// | 2 | cold junction LSB, bit 0 open circuit, bit 1 short to GND, bit 2 short to VDD |
/// | 3 | cold junction MSB, bit 7 sign |
/// | 4 | configuration, bits 0-3 AD0-AD3 |
/// | 5-7 | reserved |
/// | 8 | CRC |
pub const MAX31850: Descriptor = Descriptor {
    name: "MAX31850",
    family: 0x3b,
    conversion_time_ms: 100,
    thermocouple: THERMOCOUPLE,
    cold_junction: COLD_JUNCTION,
    fault: BitPos::new(0, 0),
    open_circuit: BitPos::new(2, 0),
    short_to_ground: BitPos::new(2, 1),
    short_to_supply: BitPos::new(2, 2),
    address_pins: [
        BitPos::new(4, 0),
        BitPos::new(4, 1),
        BitPos::new(4, 2),
        BitPos::new(4, 3),
    ],
};
