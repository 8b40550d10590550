use core::fmt;

#[derive(Debug)]
/// DS2482 Hardware Errors
pub enum Ds2482Error<E> {
    /// I2C bus errors.
    I2c(E),
    /// Busy wait retries exceeded.
    RetriesExceeded,
    /// The configuration read back differs from the one written.
    ConfigurationRejected,
}

impl<E> From<E> for Ds2482Error<E> {
    fn from(value: E) -> Self {
        Self::I2c(value)
    }
}

impl<E: fmt::Debug> fmt::Display for Ds2482Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(e) => write!(f, "I2C error: {e:?}"),
            Self::RetriesExceeded => f.write_str("DS2482 stayed busy past the retry limit"),
            Self::ConfigurationRejected => f.write_str("DS2482 did not accept the configuration"),
        }
    }
}
