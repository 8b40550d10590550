#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

/*! # DS2482
 *
 * Driver for the Analog Devices DS2482-100 single channel I2C to 1-Wire
 * bridge. [`Ds2482`] implements the [`OneWire`] trait, so any driver built
 * on `embedded-onewire` can talk to 1-Wire devices through it.
 */

pub use embedded_onewire::{OneWire, OneWireError, OneWireResult};
mod error;
mod onewire;
mod registers;
mod traits;

pub use error::Ds2482Error;
pub use registers::{
    DS2482_BASE_ADDR, DeviceConfiguration, DeviceStatus, Ds2482Builder, i2c_address,
};
pub use traits::Interact;

/// Results of DS2482-specific function calls.
pub type Ds2482Result<T, E> = Result<T, Ds2482Error<E>>;

/// A DS2482-100 I2C to 1-Wire bridge device.
///
/// Takes ownership of an I2C bus (implementing [`I2c`](embedded_hal::i2c::I2c) trait)
/// and a timer object implementing the [`DelayNs`](embedded_hal::delay::DelayNs) trait.
/// Create one with [`Ds2482Builder`].
pub struct Ds2482<I, D> {
    pub(crate) i2c: I,
    pub(crate) addr: u8,
    pub(crate) delay: D,
    pub(crate) retries: u8,
    pub(crate) reset: bool, // Indicates if the device has been reset
}

impl<I, D> Ds2482<I, D> {
    /// I2C address of the bridge.
    pub fn address(&self) -> u8 {
        self.addr
    }

    /// Releases the I2C bus and the timer.
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }
}
