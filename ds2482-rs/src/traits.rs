use crate::{Ds2482, Ds2482Result};
use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};

/// Trait for interacting with the registers of the DS2482 I2C 1-Wire master.
pub trait Interact {
    /// Read pointer code selecting this register.
    const READ_PTR: u8;

    /// Read the register value from the DS2482.
    fn read<I: I2c<SevenBitAddress>, D: DelayNs>(
        &mut self,
        dev: &mut Ds2482<I, D>,
    ) -> Ds2482Result<(), I::Error>;
    /// Write the register value to the DS2482.
    fn write<I: I2c<SevenBitAddress>, D: DelayNs>(
        &mut self,
        dev: &mut Ds2482<I, D>,
    ) -> Ds2482Result<(), I::Error>;
}
