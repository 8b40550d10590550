#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
//! # max31850
//! Driver for the MAX31850/MAX31851 cold-junction compensated 1-Wire
//! thermocouple-to-digital converter.
//!
//! The device is reached through any bus master implementing
//! [`OneWire`]. Every [`Max31850::get_temperature`] call starts a conversion,
//! blocks for the conversion delay and reads back the 9 byte scratchpad,
//! whose thermocouple and cold-junction fields are then decoded bit by bit
//! according to a [`Descriptor`].
//!
//! ```ignore
//! let mut sensor = Max31850::new(&mut bus, delay, "3B-2D-62-18-00-00-00-E8".parse()?);
//! let reading = sensor.get_temperature()?;
//! if reading.is_valid() {
//!     log::info!("{} °C", reading.thermocouple);
//! }
//! ```

mod descriptor;
pub mod field;
mod reading;
mod scratchpad;
#[cfg(test)]
mod testing;

pub use descriptor::{Descriptor, MAX31850};
pub use embedded_onewire::{Address, OneWire, OneWireError, OneWireResult};
pub use reading::{AddressPins, TemperatureReading};
pub use scratchpad::{SCRATCHPAD_LEN, Scratchpad};

use embedded_hal::delay::DelayNs;

/// Conversion delay used unless configured otherwise.
pub const DEFAULT_CONVERSION_DELAY_MS: u32 = 1000;

/// A MAX31850 (or a device sharing its protocol, see [`Descriptor`]) on a
/// 1-Wire bus.
///
/// Owns a bus master and a delay source; pass `&mut` references to share
/// them with other drivers. No bus traffic happens until a reading is
/// requested.
#[derive(Debug)]
pub struct Max31850<O, D> {
    bus: O,
    delay: D,
    address: Address,
    descriptor: &'static Descriptor,
    conversion_delay_ms: u32,
}

impl<O, D> Max31850<O, D> {
    /// Binds the device with ROM `address` to a bus master.
    pub fn new(bus: O, delay: D, address: Address) -> Self {
        Self::with_descriptor(bus, delay, address, &MAX31850)
    }

    /// Like [`new`](Self::new), for a device with a different scratchpad layout.
    pub fn with_descriptor(
        bus: O,
        delay: D,
        address: Address,
        descriptor: &'static Descriptor,
    ) -> Self {
        Self {
            bus,
            delay,
            address,
            descriptor,
            conversion_delay_ms: DEFAULT_CONVERSION_DELAY_MS.max(descriptor.conversion_time_ms),
        }
    }

    /// Sets how long to wait for a conversion.
    ///
    /// Values below the device's worst case conversion time are raised to it,
    /// a scratchpad read must never overtake the conversion.
    pub fn with_conversion_delay_ms(mut self, delay_ms: u32) -> Self {
        let min = self.descriptor.conversion_time_ms;
        if delay_ms < min {
            log::warn!(
                "{}: conversion delay {delay_ms} ms is below the {min} ms conversion time, using {min} ms",
                self.descriptor.name
            );
        }
        self.conversion_delay_ms = delay_ms.max(min);
        self
    }

    /// ROM address of the device.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// 1-Wire family code of the bound device, `0x3B` for the MAX31850/MAX31851.
    #[inline]
    pub fn family(&self) -> u8 {
        self.descriptor.family
    }

    /// Scratchpad layout in use.
    pub fn descriptor(&self) -> &'static Descriptor {
        self.descriptor
    }

    /// Time waited for each conversion.
    pub fn conversion_delay_ms(&self) -> u32 {
        self.conversion_delay_ms
    }

    /// Gives back the bus master and the delay source.
    pub fn release(self) -> (O, D) {
        (self.bus, self.delay)
    }
}

impl<O: OneWire, D: DelayNs> Max31850<O, D> {
    /// Runs a temperature conversion and reads the result.
    ///
    /// Blocks for the conversion delay on every call. A CRC mismatch is
    /// reported through [`TemperatureReading::crc_ok`]; bus failures are
    /// returned as errors.
    pub fn get_temperature(&mut self) -> OneWireResult<TemperatureReading, O::BusError> {
        let scratchpad = Scratchpad::fetch_after_conversion(
            &mut self.bus,
            &mut self.delay,
            &self.address,
            self.descriptor,
            self.conversion_delay_ms,
        )?;
        let reading = self.descriptor.temperature(&scratchpad);
        log::debug!("{} {}: {reading}", self.descriptor.name, self.address);
        Ok(reading)
    }

    /// Reads the AD0-AD3 strap pins, without starting a conversion.
    pub fn get_address_pins(&mut self) -> OneWireResult<AddressPins, O::BusError> {
        let scratchpad = Scratchpad::fetch_plain(&mut self.bus, &self.address)?;
        let pins = self.descriptor.address_pins(&scratchpad);
        log::debug!(
            "{} {}: address pins {:04b} (crc ok: {})",
            self.descriptor.name,
            self.address,
            pins.value(),
            pins.crc_ok
        );
        Ok(pins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BusFault, Event, FakeBus, FakeDelay, ROM, with_crc};
    use embedded_hal_mock::eh1::delay::NoopDelay;

    // 1000 °C thermocouple, -55 °C cold junction, pins 0b0110.
    const PAD: [u8; 8] = [0b1000_0000, 0b0011_1110, 0b0000_0000, 0b1100_1001, 0b0110, 0, 0, 0];

    fn select() -> Vec<Event> {
        let mut events = vec![Event::Reset, Event::Write(0x55)];
        events.extend(ROM.as_bytes().iter().map(|&b| Event::Write(b)));
        events
    }

    #[test]
    fn family_code() {
        static OTHER: Descriptor = Descriptor {
            name: "other",
            family: 0x42,
            ..MAX31850
        };
        let (bus, _log) = FakeBus::new(with_crc(PAD));
        assert_eq!(Max31850::new(bus, NoopDelay::new(), ROM).family(), 0x3b);
        let (bus, _log) = FakeBus::new(with_crc(PAD));
        let sensor = Max31850::with_descriptor(bus, NoopDelay::new(), ROM, &OTHER);
        assert_eq!(sensor.family(), 0x42);
        assert_eq!(sensor.descriptor().name, "other");
    }

    #[test]
    fn construction_is_silent() {
        let (bus, log) = FakeBus::new(with_crc(PAD));
        let sensor = Max31850::new(bus, NoopDelay::new(), ROM);
        assert_eq!(sensor.address(), &ROM);
        assert_eq!(sensor.conversion_delay_ms(), DEFAULT_CONVERSION_DELAY_MS);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn temperature() {
        let (bus, log) = FakeBus::new(with_crc(PAD));
        let delay = FakeDelay::new(&log);
        let mut sensor = Max31850::new(bus, delay, ROM);
        let reading = sensor.get_temperature().unwrap();
        assert!(reading.crc_ok);
        assert!(reading.is_valid());
        assert_eq!(reading.thermocouple, 1000.0);
        assert_eq!(reading.cold_junction, -55.0);

        let mut expected = select();
        expected.push(Event::Write(0x44));
        expected.push(Event::DelayMs(DEFAULT_CONVERSION_DELAY_MS));
        expected.extend(select());
        expected.push(Event::Write(0xbe));
        expected.extend([Event::Read; SCRATCHPAD_LEN]);
        assert_eq!(*log.borrow(), expected);
    }

    #[test]
    fn zero_reading_is_positive() {
        let (bus, _log) = FakeBus::new(with_crc([0; 8]));
        let mut sensor = Max31850::new(bus, NoopDelay::new(), ROM);
        let reading = sensor.get_temperature().unwrap();
        assert!(reading.thermocouple.is_sign_positive());
        assert!(reading.cold_junction.is_sign_positive());
        assert_eq!(reading.to_string(), "thermocouple 0 °C, cold junction 0 °C");
    }

    #[test]
    fn every_call_converts_again() {
        let (bus, log) = FakeBus::new(with_crc(PAD));
        let delay = FakeDelay::new(&log);
        let mut sensor = Max31850::new(bus, delay, ROM).with_conversion_delay_ms(750);
        sensor.get_temperature().unwrap();
        sensor.get_temperature().unwrap();
        let events = log.borrow();
        assert_eq!(events.iter().filter(|e| **e == Event::Write(0x44)).count(), 2);
        assert_eq!(events.iter().filter(|e| **e == Event::DelayMs(750)).count(), 2);
    }

    #[test]
    fn conversion_delay_is_clamped() {
        let (bus, _log) = FakeBus::new(with_crc(PAD));
        let sensor = Max31850::new(bus, NoopDelay::new(), ROM).with_conversion_delay_ms(10);
        assert_eq!(sensor.conversion_delay_ms(), MAX31850.conversion_time_ms);
    }

    #[test]
    fn address_pins_skip_conversion() {
        let (bus, log) = FakeBus::new(with_crc(PAD));
        let delay = FakeDelay::new(&log);
        let mut sensor = Max31850::new(bus, delay, ROM);
        let pins = sensor.get_address_pins().unwrap();
        assert!(pins.crc_ok);
        assert_eq!(pins.pins, [false, true, true, false]);

        let events = log.borrow();
        assert!(!events.contains(&Event::Write(0x44)));
        assert!(!events.iter().any(|e| matches!(e, Event::DelayMs(_) | Event::DelayNs(_))));
    }

    #[test]
    fn crc_mismatch_is_reported_not_raised() {
        let mut bytes = with_crc(PAD);
        bytes[3] ^= 0x10;
        let (bus, _log) = FakeBus::new(bytes);
        let mut sensor = Max31850::new(bus, NoopDelay::new(), ROM);
        let reading = sensor.get_temperature().unwrap();
        assert!(!reading.crc_ok);
        assert!(!reading.is_valid());
    }

    #[test]
    fn bus_errors_are_surfaced() {
        let (mut bus, _log) = FakeBus::new(with_crc(PAD));
        bus.fail_after_reads = Some(0);
        let mut sensor = Max31850::new(bus, NoopDelay::new(), ROM);
        assert!(matches!(
            sensor.get_temperature(),
            Err(OneWireError::Other(BusFault))
        ));

        let (mut bus, _log) = FakeBus::new(with_crc(PAD));
        bus.presence = false;
        let mut sensor = Max31850::new(bus, NoopDelay::new(), ROM);
        assert!(matches!(
            sensor.get_address_pins(),
            Err(OneWireError::NoDevicePresent)
        ));
    }

    #[test]
    fn borrows_bus_and_delay() {
        let (mut bus, log) = FakeBus::new(with_crc(PAD));
        let mut delay = FakeDelay::new(&log);
        {
            let mut sensor = Max31850::new(&mut bus, &mut delay, ROM);
            assert_eq!(sensor.get_temperature().unwrap().thermocouple, 1000.0);
        }
        assert_eq!(Scratchpad::fetch_plain(&mut bus, &ROM).unwrap().bytes(), &with_crc(PAD));
    }
}
