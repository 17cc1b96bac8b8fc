//! Raw code to millivolt conversion and divider scaling.

use core::fmt;

use crate::config::Divider;

/// ADC input gain, as a ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    Gain1_6,
    Gain1_5,
    Gain1_4,
    Gain1_3,
    Gain1_2,
    Gain1,
    Gain2,
    Gain4,
}

impl Gain {
    /// `(numerator, denominator)` of the gain ratio.
    pub const fn ratio(self) -> (u32, u32) {
        match self {
            Self::Gain1_6 => (1, 6),
            Self::Gain1_5 => (1, 5),
            Self::Gain1_4 => (1, 4),
            Self::Gain1_3 => (1, 3),
            Self::Gain1_2 => (1, 2),
            Self::Gain1 => (1, 1),
            Self::Gain2 => (2, 1),
            Self::Gain4 => (4, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionError {
    /// Resolution outside 1..=16 bits.
    Resolution(u8),
    ZeroReference,
    /// Result does not fit the millivolt type.
    Range,
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolution(bits) => write!(f, "unsupported resolution: {bits} bits"),
            Self::ZeroReference => f.write_str("zero reference voltage"),
            Self::Range => f.write_str("converted value out of range"),
        }
    }
}

/// Converts a raw code to millivolts at the ADC input.
///
/// The sign of `raw` is dropped: the input is single ended, so a negative code
/// is noise around zero rather than a negative voltage.
pub fn raw_to_millivolts(
    reference_mv: u16,
    gain: Gain,
    resolution: u8,
    raw: i16,
) -> Result<u32, ConversionError> {
    if resolution == 0 || resolution > 16 {
        return Err(ConversionError::Resolution(resolution));
    }
    if reference_mv == 0 {
        return Err(ConversionError::ZeroReference);
    }

    let (num, den) = gain.ratio();
    let mv = u64::from(raw.unsigned_abs()) * u64::from(reference_mv) * u64::from(den)
        / u64::from(num);
    u32::try_from(mv >> resolution).map_err(|_| ConversionError::Range)
}

/// Scales millivolts at the ADC input back to the source voltage.
///
/// Truncates toward zero and saturates at `u32::MAX`. Without a divider the
/// value passes through.
pub fn scale(input_mv: u32, divider: Option<Divider>) -> u32 {
    match divider {
        Some(divider) => {
            let mv = u64::from(input_mv) * divider.full_ohm() / u64::from(divider.lower_ohm());
            debug!(
                "input {=u32} mV, full {=u64} ohm, output {=u32} ohm => {=u64} mV",
                input_mv,
                divider.full_ohm(),
                divider.lower_ohm(),
                mv
            );
            mv.try_into().unwrap_or(u32::MAX)
        }
        None => input_mv,
    }
}
