use core::fmt;

/// One wire communication error type.
#[derive(Debug)]
pub enum OneWireError<E> {
    /// Encapsulates the error type from the underlying hardware.
    Other(E),
    /// Indicates that no device is present on the bus.
    NoDevicePresent,
    /// Indicates that a short circuit was detected on the bus.
    ShortCircuit,
    /// The bus master has been reset and not reconfigured since.
    BusUninitialized,
}

impl<E> From<E> for OneWireError<E> {
    fn from(other: E) -> Self {
        Self::Other(other)
    }
}

impl<E: fmt::Debug> fmt::Display for OneWireError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(e) => write!(f, "bus master error: {e:?}"),
            Self::NoDevicePresent => f.write_str("no presence pulse on the 1-Wire bus"),
            Self::ShortCircuit => f.write_str("short circuit on the 1-Wire bus"),
            Self::BusUninitialized => f.write_str("bus master is not configured"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for OneWireError<E> {}
