use crate::Descriptor;
use embedded_hal::delay::DelayNs;
use embedded_onewire::{Address, OneWire, OneWireCrc, OneWireResult};

/// Length of the scratchpad, CRC byte included.
pub const SCRATCHPAD_LEN: usize = 9;

pub(crate) const CONVERT_T_CMD: u8 = 0x44;
pub(crate) const READ_SCRATCHPAD_CMD: u8 = 0xbe;

/// A scratchpad as read from the bus, together with the result of its CRC
/// check.
///
/// A failed CRC does not make the fetch fail: the bytes are kept so the
/// caller can inspect them or simply poll again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scratchpad {
    bytes: [u8; SCRATCHPAD_LEN],
    crc_ok: bool,
}

impl Scratchpad {
    /// Wraps raw scratchpad bytes, checking byte 8 against the CRC of bytes 0-7.
    pub fn from_bytes(bytes: [u8; SCRATCHPAD_LEN]) -> Self {
        Self {
            crc_ok: OneWireCrc::validate(&bytes),
            bytes,
        }
    }

    /// The raw bytes, CRC last.
    pub fn bytes(&self) -> &[u8; SCRATCHPAD_LEN] {
        &self.bytes
    }

    /// Whether the CRC byte matched the contents.
    pub fn crc_ok(&self) -> bool {
        self.crc_ok
    }

    /// Selects the device and reads its scratchpad as it is.
    ///
    /// Bus sequence: reset, Match ROM, Read Scratchpad, 9 reads.
    pub fn fetch_plain<O: OneWire>(
        bus: &mut O,
        rom: &Address,
    ) -> OneWireResult<Self, O::BusError> {
        bus.address(rom)?;
        Self::read(bus, rom)
    }

    /// Starts a conversion on the device, waits `delay_ms` for it to finish,
    /// then reads the scratchpad.
    ///
    /// The wait is never shorter than the conversion time of `descriptor`.
    /// Bus sequence: reset, Match ROM, Convert T, wait, reset, Match ROM,
    /// Read Scratchpad, 9 reads. The device has to be selected again after the
    /// conversion before it answers the read.
    pub fn fetch_after_conversion<O: OneWire, D: DelayNs>(
        bus: &mut O,
        delay: &mut D,
        rom: &Address,
        descriptor: &Descriptor,
        delay_ms: u32,
    ) -> OneWireResult<Self, O::BusError> {
        bus.address(rom)?;
        bus.write_byte(CONVERT_T_CMD)?;
        delay.delay_ms(delay_ms.max(descriptor.conversion_time_ms)); // wait till conversion is finished
        bus.address(rom)?;
        Self::read(bus, rom)
    }

    fn read<O: OneWire>(bus: &mut O, rom: &Address) -> OneWireResult<Self, O::BusError> {
        bus.write_byte(READ_SCRATCHPAD_CMD)?;
        let mut bytes = [0; SCRATCHPAD_LEN];
        bus.read_bytes(&mut bytes)?;
        log::trace!("{rom}: scratchpad {bytes:02x?}");
        let scratchpad = Self::from_bytes(bytes);
        if !scratchpad.crc_ok {
            log::warn!(
                "{rom}: scratchpad CRC mismatch, computed {:#04x}, received {:#04x}",
                OneWireCrc::compute(&bytes[..SCRATCHPAD_LEN - 1]),
                bytes[SCRATCHPAD_LEN - 1]
            );
        }
        Ok(scratchpad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX31850;
    use crate::testing::{BusFault, Event, FakeBus, FakeDelay, ROM, with_crc};
    use embedded_onewire::OneWireError;

    fn select() -> Vec<Event> {
        let mut events = vec![Event::Reset, Event::Write(0x55)];
        events.extend(ROM.as_bytes().iter().map(|&b| Event::Write(b)));
        events
    }

    #[test]
    fn crc_is_checked_on_wrap() {
        let bytes = with_crc([0x90, 0x01, 0x90, 0x64, 0xf0, 0xff, 0xff, 0xff]);
        assert!(Scratchpad::from_bytes(bytes).crc_ok());
        for bit in 0..SCRATCHPAD_LEN * 8 {
            let mut corrupt = bytes;
            corrupt[bit / 8] ^= 1 << (bit % 8);
            assert!(!Scratchpad::from_bytes(corrupt).crc_ok(), "bit {bit}");
        }
    }

    #[test]
    fn plain_fetch_sequence() {
        let bytes = with_crc([0, 0, 0, 0, 0x0a, 0, 0, 0]);
        let (mut bus, log) = FakeBus::new(bytes);
        let pad = Scratchpad::fetch_plain(&mut bus, &ROM).unwrap();
        assert_eq!(pad.bytes(), &bytes);
        assert!(pad.crc_ok());

        let mut expected = select();
        expected.push(Event::Write(READ_SCRATCHPAD_CMD));
        expected.extend([Event::Read; SCRATCHPAD_LEN]);
        assert_eq!(*log.borrow(), expected);
    }

    #[test]
    fn conversion_fetch_sequence() {
        let bytes = with_crc([0x90, 0x01, 0x90, 0x64, 0, 0, 0, 0]);
        let (mut bus, log) = FakeBus::new(bytes);
        let mut delay = FakeDelay::new(&log);
        let pad = Scratchpad::fetch_after_conversion(&mut bus, &mut delay, &ROM, &MAX31850, 1000)
            .unwrap();
        assert_eq!(pad.bytes(), &bytes);

        let mut expected = select();
        expected.push(Event::Write(CONVERT_T_CMD));
        expected.push(Event::DelayMs(1000));
        expected.extend(select());
        expected.push(Event::Write(READ_SCRATCHPAD_CMD));
        expected.extend([Event::Read; SCRATCHPAD_LEN]);
        assert_eq!(*log.borrow(), expected);
    }

    #[test]
    fn conversion_wait_covers_conversion_time() {
        let (mut bus, log) = FakeBus::new(with_crc([0; 8]));
        let mut delay = FakeDelay::new(&log);
        Scratchpad::fetch_after_conversion(&mut bus, &mut delay, &ROM, &MAX31850, 0).unwrap();
        let waits: Vec<_> = log
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::DelayMs(_) | Event::DelayNs(_)))
            .copied()
            .collect();
        assert_eq!(waits, vec![Event::DelayMs(MAX31850.conversion_time_ms)]);
    }

    #[test]
    fn bad_crc_is_not_an_error() {
        let mut bytes = with_crc([0x90, 0x01, 0, 0, 0, 0, 0, 0]);
        bytes[8] ^= 0x01;
        let (mut bus, _log) = FakeBus::new(bytes);
        let pad = Scratchpad::fetch_plain(&mut bus, &ROM).unwrap();
        assert!(!pad.crc_ok());
        assert_eq!(pad.bytes(), &bytes);
    }

    #[test]
    fn missing_device_aborts_before_any_write() {
        let (mut bus, log) = FakeBus::new([0; SCRATCHPAD_LEN]);
        bus.presence = false;
        let res = Scratchpad::fetch_plain(&mut bus, &ROM);
        assert!(matches!(res, Err(OneWireError::NoDevicePresent)));
        assert_eq!(*log.borrow(), vec![Event::Reset]);
    }

    #[test]
    fn read_failure_is_propagated() {
        let (mut bus, log) = FakeBus::new([0; SCRATCHPAD_LEN]);
        bus.fail_after_reads = Some(4);
        let res = Scratchpad::fetch_plain(&mut bus, &ROM);
        assert!(matches!(res, Err(OneWireError::Other(BusFault))));
        let reads = log.borrow().iter().filter(|e| **e == Event::Read).count();
        assert_eq!(reads, 5);
    }
}
