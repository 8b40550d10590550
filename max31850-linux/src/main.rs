use clap::Parser;
use ds2482::{DeviceConfiguration, Ds2482Builder};
use max31850::{Address, DEFAULT_CONVERSION_DELAY_MS, MAX31850, Max31850};

/// Poll a MAX31850 thermocouple converter behind a DS2482-100 I2C to 1-Wire bridge
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to I2C bus (e.g., /dev/i2c-1)
    #[arg(short, long)]
    path: String,
    /// AD0 pin of the DS2482-100 is pulled high
    #[arg(long)]
    ad0: bool,
    /// AD1 pin of the DS2482-100 is pulled high
    #[arg(long)]
    ad1: bool,
    /// ROM address of the sensor (e.g., 3B-2D-62-18-00-00-00-E8)
    #[arg(short, long)]
    rom: Address,
    /// Time to wait for each conversion, in milliseconds
    #[arg(long, default_value_t = DEFAULT_CONVERSION_DELAY_MS)]
    conversion_delay_ms: u32,
    /// Number of readings to take, 0 to poll forever
    #[arg(short, long, default_value_t = 0)]
    count: u32,
    /// Read the AD0-AD3 strap pins of the sensor before polling
    #[arg(long)]
    pins: bool,
}

fn main() {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    if !args.rom.is_crc_valid() {
        log::warn!("ROM {} has an invalid CRC byte", args.rom);
    }
    if args.rom.family() != MAX31850.family {
        log::warn!(
            "ROM {} has family code {:#04x}, expected {:#04x}",
            args.rom,
            args.rom.family(),
            MAX31850.family
        );
    }
    // Open the I2C bus
    let mut i2c = linux_embedded_hal::I2cdev::new(&args.path).expect("Failed to open I2C device");
    // Create a DS2482 instance
    let mut ds2482 = Ds2482Builder::default()
        .with_address_pins(args.ad0, args.ad1)
        .with_config(DeviceConfiguration::new().with_active_pullup(true))
        .build(&mut i2c, linux_embedded_hal::Delay)
        .expect("Failed to create DS2482 instance");
    log::info!("DS2482 ready at {:#04x}", ds2482.address());
    match ds2482.get_status() {
        Ok(status) => log::debug!("DS2482 status: {status:?}"),
        Err(e) => log::warn!("DS2482 status unavailable: {e}"),
    }
    match ds2482.get_config() {
        Ok(config) => log::debug!("DS2482 configuration: {config:?}"),
        Err(e) => log::warn!("DS2482 configuration unavailable: {e}"),
    }
    let mut sensor = Max31850::new(&mut ds2482, linux_embedded_hal::Delay, args.rom)
        .with_conversion_delay_ms(args.conversion_delay_ms);
    if args.pins {
        let pins = sensor
            .get_address_pins()
            .expect("Failed to read address pins");
        if pins.crc_ok {
            log::info!("ROM: {}, address pins: {:04b}", args.rom, pins.value());
        } else {
            log::warn!("ROM: {}, address pins unreliable (CRC error)", args.rom);
        }
    }
    let mut taken = 0;
    loop {
        match sensor.get_temperature() {
            Ok(reading) if reading.is_valid() => log::info!("ROM: {}, {}", args.rom, reading),
            Ok(reading) => log::warn!("ROM: {}, {}", args.rom, reading),
            Err(e) => log::error!("ROM: {}, {}", args.rom, e),
        }
        taken += 1;
        if args.count != 0 && taken >= args.count {
            break;
        }
    }
}
