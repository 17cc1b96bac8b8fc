use core::fmt;

use embedded_hal::digital;

use crate::adc;
use crate::config::ConfigError;
use crate::convert::ConversionError;
use crate::errno::{EINVAL, EIO, ENOENT};

/// Failure of bring-up or of a sample.
///
/// `G` is the error of the gate pin, `A` the error of the ADC driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<G, A> {
    /// Contradictory divider configuration. Bring-up only.
    Config(ConfigError),
    /// The ADC peripheral is not ready. Bring-up only.
    NotReady,
    /// Configuring or driving the gate pin failed.
    Gate(G),
    /// Channel setup or a read failed in the ADC driver.
    Acquisition(A),
    Conversion(ConversionError),
}

impl<G: digital::Error, A: adc::Error> Error<G, A> {
    /// Negative error number for the integer result surface.
    ///
    /// ADC errors keep the code of the driver.
    pub fn code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Conversion(_) => -EINVAL,
            Self::NotReady => -ENOENT,
            Self::Gate(_) => -EIO,
            Self::Acquisition(e) => e.code(),
        }
    }
}

impl<G, A> From<ConfigError> for Error<G, A> {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl<G, A> From<ConversionError> for Error<G, A> {
    fn from(e: ConversionError) -> Self {
        Self::Conversion(e)
    }
}

impl<G: fmt::Debug, A: fmt::Debug> fmt::Display for Error<G, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::NotReady => f.write_str("ADC device is not ready"),
            Self::Gate(e) => write!(f, "power gate write failed: {e:?}"),
            Self::Acquisition(e) => write!(f, "ADC read failed: {e:?}"),
            Self::Conversion(e) => write!(f, "conversion failed: {e}"),
        }
    }
}
