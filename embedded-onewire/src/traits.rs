use crate::{Address, OneWireError, OneWireResult, consts::ONEWIRE_MATCH_ROM_CMD};

/// Status of the 1-Wire bus after a reset.
pub trait OneWireStatus {
    /// Whether a device answered the reset with a presence pulse.
    fn presence(&self) -> bool;

    /// Whether a short circuit was detected on the bus.
    fn shortcircuit(&self) -> bool;

    /// Logic level of the bus, if the bus master can sample it.
    fn logic_level(&self) -> Option<bool> {
        None
    }
}

impl OneWireStatus for bool {
    fn presence(&self) -> bool {
        *self
    }

    fn shortcircuit(&self) -> bool {
        false
    }
}

/// Trait for 1-Wire communication.
/// This trait defines the primitive operations a bus master has to provide:
/// resetting the bus, and writing and reading bytes.
///
/// Bus masters are not re-entrant: a reset/select/read sequence must not be
/// interleaved with another one on the same bus. Holding `&mut` access for the
/// duration of a sequence enforces this.
pub trait OneWire {
    /// The status type returned by the reset operation.
    /// This type must implement the [OneWireStatus] trait.
    type Status: OneWireStatus;
    /// The error type returned by the operations of this trait.
    /// This type is used to indicate errors in the underlying hardware or communication.
    type BusError;

    /// Resets the 1-Wire bus and returns the status of the bus.
    ///
    /// # Errors
    /// This method returns an error if the reset operation fails.
    fn reset(&mut self) -> OneWireResult<Self::Status, Self::BusError>;

    /// Writes a byte to the 1-Wire bus.
    /// # Arguments
    /// * `byte` - The byte to write to the bus.
    ///
    /// # Errors
    /// This method returns an error if the write operation fails.
    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), Self::BusError>;

    /// Reads a byte from the 1-Wire bus.
    ///
    /// # Errors
    /// This method returns an error if the read operation fails.
    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError>;

    /// Writes all `bytes` to the bus, in order.
    fn write_bytes(&mut self, bytes: &[u8]) -> OneWireResult<(), Self::BusError> {
        for &b in bytes {
            self.write_byte(b)?;
        }
        Ok(())
    }

    /// Fills `buf` with bytes read from the bus, in order.
    fn read_bytes(&mut self, buf: &mut [u8]) -> OneWireResult<(), Self::BusError> {
        for b in buf.iter_mut() {
            *b = self.read_byte()?;
        }
        Ok(())
    }

    /// Resets the bus and selects the device with the given ROM address.
    ///
    /// Issues a reset, then the Match ROM command followed by the 8 address bytes.
    /// Subsequent function commands are only answered by that device.
    ///
    /// # Errors
    /// Returns [`OneWireError::ShortCircuit`] or [`OneWireError::NoDevicePresent`]
    /// if the reset status reports so, or any error of the underlying operations.
    fn address(&mut self, rom: &Address) -> OneWireResult<(), Self::BusError> {
        let status = self.reset()?;
        if status.shortcircuit() {
            return Err(OneWireError::ShortCircuit);
        }
        if !status.presence() {
            return Err(OneWireError::NoDevicePresent);
        }
        self.write_byte(ONEWIRE_MATCH_ROM_CMD)?;
        self.write_bytes(rom.as_bytes())
    }
}

impl<T: OneWire + ?Sized> OneWire for &mut T {
    type Status = T::Status;
    type BusError = T::BusError;

    fn reset(&mut self) -> OneWireResult<Self::Status, Self::BusError> {
        T::reset(self)
    }

    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), Self::BusError> {
        T::write_byte(self, byte)
    }

    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError> {
        T::read_byte(self)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> OneWireResult<(), Self::BusError> {
        T::write_bytes(self, bytes)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> OneWireResult<(), Self::BusError> {
        T::read_bytes(self, buf)
    }

    fn address(&mut self, rom: &Address) -> OneWireResult<(), Self::BusError> {
        T::address(self, rom)
    }
}
