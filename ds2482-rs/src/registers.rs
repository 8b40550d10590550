use crate::{Ds2482, Ds2482Error, Ds2482Result, traits::Interact};
use bitfield_struct::bitfield;
use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};
use embedded_onewire::OneWireStatus;

pub(crate) const READ_PTR_CMD: u8 = 0xe1; // Set the read pointer
pub(crate) const DEVICE_STATUS_PTR: u8 = 0xf0; // Device status register
pub(crate) const DEVICE_RST_CMD: u8 = 0xf0; // Reset the device
pub(crate) const WRITE_CONFIG_CMD: u8 = 0xd2; // Write the device configuration
pub(crate) const DEVICE_CONFIG_PTR: u8 = 0xc3; // Device configuration register

/// I2C address of a DS2482-100 with both address pins tied low.
pub const DS2482_BASE_ADDR: u8 = 0x18;

/// I2C address selected by the AD0 and AD1 pins of a DS2482-100.
pub const fn i2c_address(ad0: bool, ad1: bool) -> u8 {
    DS2482_BASE_ADDR | (ad0 as u8) | ((ad1 as u8) << 1)
}

/// Builder for creating a [`Ds2482`] instance with custom configuration.
pub struct Ds2482Builder {
    pub(crate) addr: u8,
    pub(crate) retries: u8,
    pub(crate) config: DeviceConfiguration,
}

impl Default for Ds2482Builder {
    fn default() -> Self {
        Ds2482Builder {
            addr: DS2482_BASE_ADDR,
            retries: 100,
            config: DeviceConfiguration::new(),
        }
    }
}

impl Ds2482Builder {
    /// Sets the I2C address from the levels of the AD0 and AD1 pins.
    pub fn with_address_pins(mut self, ad0: bool, ad1: bool) -> Self {
        self.addr = i2c_address(ad0, ad1);
        self
    }

    /// Sets the retry count for the device.
    ///
    /// The retry count is used to determine how long
    /// the host waits before operations on the 1-Wire
    /// or I2C bus time out.
    pub fn with_retries(mut self, retries: u8) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the device configuration.
    pub fn with_config(mut self, config: DeviceConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Builds a new `Ds2482` instance with the specified configuration.
    ///
    /// Resets the bridge and writes the configuration. Fails if the bridge
    /// does not answer on the I2C bus.
    pub fn build<I: I2c<SevenBitAddress>, D: DelayNs>(
        mut self,
        i2c: I,
        delay: D,
    ) -> Ds2482Result<Ds2482<I, D>, I::Error> {
        let mut dev = Ds2482 {
            i2c,
            addr: self.addr,
            delay,
            retries: self.retries,
            reset: false,
        };
        dev.bus_reset()?;
        self.config.write(&mut dev)?;
        log::debug!("DS2482 at {:#04x} configured: {:?}", dev.addr, self.config);
        Ok(dev)
    }
}

impl<I2C: I2c<SevenBitAddress>, D: DelayNs> Ds2482<I2C, D> {
    /// Get the status of the device.
    pub fn get_status(&mut self) -> Ds2482Result<DeviceStatus, I2C::Error> {
        let mut stat = DeviceStatus::default();
        stat.read(self)?;
        Ok(stat)
    }

    /// Read back the active configuration.
    pub fn get_config(&mut self) -> Ds2482Result<DeviceConfiguration, I2C::Error> {
        let mut cfg = DeviceConfiguration::new();
        cfg.read(self)?;
        Ok(cfg)
    }

    /// Reset the device.
    ///
    /// Performs a global reset of device state machine logic. Terminates any ongoing 1-Wire
    /// communication. The configuration has to be written again afterwards.
    pub fn bus_reset(&mut self) -> Ds2482Result<DeviceStatus, I2C::Error> {
        self.i2c.write(self.addr, &[DEVICE_RST_CMD])?;
        self.reset = true;
        let mut tries = 0;
        loop {
            let status = self.read_status_byte()?;
            if status.device_reset() {
                return Ok(status);
            }
            if tries >= self.retries {
                return Err(Ds2482Error::RetriesExceeded);
            }
            tries += 1;
            self.delay.delay_ms(1);
        }
    }

    /// Poll the status register until the 1-Wire line is idle.
    pub(crate) fn onewire_wait(&mut self) -> Ds2482Result<DeviceStatus, I2C::Error> {
        self.i2c
            .write(self.addr, &[READ_PTR_CMD, DEVICE_STATUS_PTR])?;
        let mut tries = 0;
        loop {
            let status = self.read_status_byte()?;
            if !status.onewire_busy() {
                return Ok(status);
            }
            if tries >= self.retries {
                log::warn!("DS2482 at {:#04x} still busy after {tries} polls", self.addr);
                return Err(Ds2482Error::RetriesExceeded);
            }
            tries += 1;
            self.delay.delay_ms(1);
        }
    }

    // The read pointer must already point at the status register.
    fn read_status_byte(&mut self) -> Ds2482Result<DeviceStatus, I2C::Error> {
        let mut buf = [0; 1];
        self.i2c.read(self.addr, &mut buf)?;
        Ok(DeviceStatus::from_bits(buf[0]))
    }
}

/// Status register for DS2482-100.
///
/// The read-only Status register reports bit-type data from the 1-Wire side,
/// the 1-Wire busy status, and the bridge's own reset status. All 1-Wire
/// communication commands and the Device Reset command position the read
/// pointer at the Status register.
#[bitfield(u8)]
pub struct DeviceStatus {
    /// 1WB: the 1-Wire line is busy with a command.
    pub(crate) onewire_busy: bool,
    /// PPD: a presence pulse was detected during the last 1-Wire reset.
    present_pulse_detect: bool,
    /// SD: a short was detected during the last 1-Wire reset.
    pub(crate) short_detect: bool,
    /// LL: logic level of the 1-Wire line, sampled at every status read.
    pub logic_level: bool,
    /// RST: the bridge has performed an internal reset and waits for a
    /// configuration write.
    pub device_reset: bool,
    /// SBR: single bit result of the last single bit or triplet command.
    pub single_bit_result: bool,
    /// TSB: second bit of the last triplet command.
    pub triplet_second_bit: bool,
    /// DIR: branch direction taken by the last triplet command.
    pub branch_dir_taken: bool,
}

impl OneWireStatus for DeviceStatus {
    fn presence(&self) -> bool {
        self.present_pulse_detect()
    }

    fn shortcircuit(&self) -> bool {
        self.short_detect()
    }

    fn logic_level(&self) -> Option<bool> {
        Some(self.logic_level())
    }
}

impl Interact for DeviceStatus {
    const READ_PTR: u8 = DEVICE_STATUS_PTR;

    fn read<I: I2c<SevenBitAddress>, D: DelayNs>(
        &mut self,
        dev: &mut Ds2482<I, D>,
    ) -> Ds2482Result<(), I::Error> {
        let mut buf = [0; 1];
        dev.i2c
            .write_read(dev.addr, &[READ_PTR_CMD, Self::READ_PTR], &mut buf)?;
        *self = Self::from_bits(buf[0]);
        Ok(())
    }

    fn write<I: I2c<SevenBitAddress>, D: DelayNs>(
        &mut self,
        _dev: &mut Ds2482<I, D>,
    ) -> Ds2482Result<(), I::Error> {
        Ok(())
    }
}

/// # Device configuration register
///
/// The DS2482-100 supports four 1-Wire features that are selected through
/// the Device Configuration register:
/// - Active Pullup (APU)
/// - Presence Pulse Masking (PPM)
/// - Strong Pullup (SPU)
/// - 1-Wire Speed (1WS)
///
/// After a device reset (power-up cycle or initiated by the Device Reset
/// command), the Device Configuration register reads 00h.
#[bitfield(u8)]
pub struct DeviceConfiguration {
    /// APU: drive the 1-Wire line high with an active pullup instead of the
    /// passive pullup resistor. Generally recommended.
    pub active_pullup: bool,
    /// PPM: mask the presence pulse of 1-Wire devices. The PPD status bit
    /// always reads 1 while this is set.
    pub presence_pulse_masking: bool,
    /// SPU: apply a strong pullup after the next 1-Wire byte or bit
    /// command, for parasitically powered devices.
    pub strong_pullup: bool,
    /// 1WS: overdrive speed for all 1-Wire communication.
    pub onewire_speed: bool,
    #[bits(4)]
    __: u8,
}

impl DeviceConfiguration {
    // The upper nibble written must be the complement of the lower nibble.
    const fn register_byte(&self) -> u8 {
        let low = self.into_bits() & 0x0f;
        low | (!low << 4)
    }
}

impl Interact for DeviceConfiguration {
    const READ_PTR: u8 = DEVICE_CONFIG_PTR;

    fn read<I: I2c<SevenBitAddress>, D: DelayNs>(
        &mut self,
        dev: &mut Ds2482<I, D>,
    ) -> Ds2482Result<(), I::Error> {
        let mut buf = [0; 1];
        dev.i2c
            .write_read(dev.addr, &[READ_PTR_CMD, Self::READ_PTR], &mut buf)?;
        *self = Self::from_bits(buf[0] & 0x0f);
        Ok(())
    }

    fn write<I: I2c<SevenBitAddress>, D: DelayNs>(
        &mut self,
        dev: &mut Ds2482<I, D>,
    ) -> Ds2482Result<(), I::Error> {
        dev.onewire_wait()?;
        let mut buf = [0; 1];
        dev.i2c
            .write_read(dev.addr, &[WRITE_CONFIG_CMD, self.register_byte()], &mut buf)?;
        if buf[0] & 0x0f != self.into_bits() & 0x0f {
            return Err(Ds2482Error::ConfigurationRejected);
        }
        dev.reset = false; // The bridge is usable again after a configuration write
        Ok(())
    }
}
