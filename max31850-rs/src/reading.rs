use core::fmt;

/// Result of a temperature conversion.
///
/// Nothing in here can be trusted unless [`crc_ok`](Self::crc_ok) is set.
/// The fault details are only meaningful while [`fault`](Self::fault) is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureReading {
    /// The scratchpad passed its CRC check.
    pub crc_ok: bool,
    /// The device reports a thermocouple fault.
    pub fault: bool,
    /// Thermocouple open (not connected).
    pub open_circuit: bool,
    /// Thermocouple shorted to GND.
    pub short_to_ground: bool,
    /// Thermocouple shorted to VDD.
    pub short_to_supply: bool,
    /// Cold-junction compensated thermocouple temperature in °C.
    pub thermocouple: f64,
    /// Internal cold-junction temperature in °C.
    pub cold_junction: f64,
}

impl TemperatureReading {
    /// CRC passed and no fault is reported, so both temperatures are usable.
    pub fn is_valid(&self) -> bool {
        self.crc_ok && !self.fault
    }
}

impl fmt::Display for TemperatureReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.crc_ok {
            return f.write_str("CRC error");
        }
        if self.fault {
            f.write_str("fault")?;
            let causes = [
                (self.short_to_supply, "short to VDD"),
                (self.short_to_ground, "short to GND"),
                (self.open_circuit, "open circuit"),
            ];
            let mut sep = ": ";
            for (_, cause) in causes.iter().filter(|(set, _)| *set) {
                write!(f, "{sep}{cause}")?;
                sep = ", ";
            }
            return Ok(());
        }
        write!(
            f,
            "thermocouple {} °C, cold junction {} °C",
            self.thermocouple, self.cold_junction
        )
    }
}

/// Levels of the AD0-AD3 strap pins.
///
/// The pins identify the physical location of a sensor on a board; they play
/// no part in addressing it on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressPins {
    /// The scratchpad passed its CRC check.
    pub crc_ok: bool,
    /// AD0 first.
    pub pins: [bool; 4],
}

impl AddressPins {
    /// The pins as a number, AD0 being bit 0.
    pub fn value(&self) -> u8 {
        self.pins
            .iter()
            .enumerate()
            .filter(|&(_, &pin)| pin)
            .fold(0, |acc, (i, _)| acc | (1 << i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading() -> TemperatureReading {
        TemperatureReading {
            crc_ok: true,
            fault: false,
            open_circuit: false,
            short_to_ground: false,
            short_to_supply: false,
            thermocouple: 100.75,
            cold_junction: 25.0625,
        }
    }

    #[test]
    fn narrative() {
        assert_eq!(
            reading().to_string(),
            "thermocouple 100.75 °C, cold junction 25.0625 °C"
        );
        let bad_crc = TemperatureReading {
            crc_ok: false,
            fault: true,
            ..reading()
        };
        assert_eq!(bad_crc.to_string(), "CRC error");
        assert!(!bad_crc.is_valid());
        let open = TemperatureReading {
            fault: true,
            open_circuit: true,
            ..reading()
        };
        assert_eq!(open.to_string(), "fault: open circuit");
        let shorted = TemperatureReading {
            fault: true,
            short_to_ground: true,
            short_to_supply: true,
            ..reading()
        };
        assert_eq!(shorted.to_string(), "fault: short to VDD, short to GND");
        let bare = TemperatureReading {
            fault: true,
            ..reading()
        };
        assert_eq!(bare.to_string(), "fault");
    }

    #[test]
    fn pin_value() {
        let pins = AddressPins {
            crc_ok: true,
            pins: [false, true, false, true],
        };
        assert_eq!(pins.value(), 0b1010);
    }
}
