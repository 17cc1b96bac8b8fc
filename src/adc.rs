//! ADC acquisition.
//!
//! [`Adc`] is the seam to the platform driver. [`AcquisitionUnit`] owns the
//! fixed channel and sequence parameters and performs one blocking read per
//! call.

use crate::config::Input;
use crate::convert::{self, ConversionError, Gain};

/// Fixed gain, chosen so the input swing can reach the reference.
pub const GAIN: Gain = Gain::Gain1_6;
/// Acquisition time suited to divider impedances up to ~800 kOhm.
pub const ACQUISITION_TIME_US: u16 = 40;
pub const RESOLUTION: u8 = 14;
pub const OVERSAMPLING: u8 = 4;

/// Error reported by a platform ADC driver.
pub trait Error: core::fmt::Debug {
    /// Negative error code, returned unchanged on the integer result surface.
    fn code(&self) -> i32;
}

impl Error for core::convert::Infallible {
    fn code(&self) -> i32 {
        match *self {}
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reference {
    /// Internal bandgap.
    Internal,
    /// A quarter of the supply voltage.
    Vdd1_4,
}

/// Positive input of a single-ended channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputSelector {
    AnalogInput(u8),
    Vdd,
}

impl From<Input> for InputSelector {
    fn from(input: Input) -> Self {
        match input {
            Input::Analog(channel) => Self::AnalogInput(channel),
            Input::InternalVdd => Self::Vdd,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    pub channel_id: u8,
    pub gain: Gain,
    pub reference: Reference,
    pub acquisition_time_us: u16,
    pub input: InputSelector,
}

impl ChannelConfig {
    pub const fn new(channel_id: u8, input: InputSelector) -> Self {
        Self {
            channel_id,
            gain: GAIN,
            reference: Reference::Internal,
            acquisition_time_us: ACQUISITION_TIME_US,
            input,
        }
    }
}

/// Parameters of one read. The destination buffer is passed next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sequence {
    /// Bit mask of the channels to sample.
    pub channels: u32,
    pub oversampling: u8,
    pub resolution: u8,
    pub calibrate: bool,
}

impl Sequence {
    pub const fn new(channel_id: u8) -> Self {
        Self {
            channels: match 1u32.checked_shl(channel_id as u32) {
                Some(mask) => mask,
                None => 0,
            },
            oversampling: OVERSAMPLING,
            resolution: RESOLUTION,
            calibrate: true,
        }
    }
}

/// Blocking single-shot ADC driver.
pub trait Adc {
    type Error: Error;

    /// Whether the peripheral can be used. Consulted once, at bring-up.
    fn is_ready(&self) -> bool;

    fn setup_channel(&mut self, config: &ChannelConfig) -> Result<(), Self::Error>;

    /// Performs one conversion of `sequence` into `buffer`, calibrating first
    /// if `sequence.calibrate` is set.
    fn read(&mut self, sequence: &Sequence, buffer: &mut [i16]) -> Result<(), Self::Error>;

    /// Voltage of `reference` in millivolts.
    fn reference_mv(&self, reference: Reference) -> u16;

    fn raw_to_millivolts(
        &self,
        config: &ChannelConfig,
        resolution: u8,
        raw: i16,
    ) -> Result<u32, ConversionError> {
        convert::raw_to_millivolts(
            self.reference_mv(config.reference),
            config.gain,
            resolution,
            raw,
        )
    }
}

/// Why bring-up of the acquisition unit failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupError<E> {
    NotReady,
    /// Channel does not fit the sequence channel mask.
    InvalidChannel(u8),
    Channel(E),
}

/// An ADC channel configured for divider measurements.
pub struct AcquisitionUnit<A> {
    adc: A,
    channel: ChannelConfig,
    sequence: Sequence,
    raw: i16,
}

impl<A: Adc> AcquisitionUnit<A> {
    pub fn new(
        mut adc: A,
        channel_id: u8,
        input: InputSelector,
    ) -> Result<Self, SetupError<A::Error>> {
        if !adc.is_ready() {
            error!("ADC device is not ready");
            return Err(SetupError::NotReady);
        }

        let sequence = Sequence::new(channel_id);
        if sequence.channels == 0 {
            error!("Invalid ADC channel {=u8}", channel_id);
            return Err(SetupError::InvalidChannel(channel_id));
        }

        let channel = ChannelConfig::new(channel_id, input);
        let result = adc.setup_channel(&channel);
        info!("Setup AIN{=u8} ok: {=bool}", channel_id, result.is_ok());
        result.map_err(SetupError::Channel)?;

        Ok(Self {
            adc,
            channel,
            sequence,
            raw: 0,
        })
    }

    /// Reads one raw code. On error the previous code is kept.
    pub fn acquire(&mut self, calibrate: bool) -> Result<i16, A::Error> {
        self.sequence.calibrate = calibrate;
        let mut buffer = [self.raw];
        self.adc.read(&self.sequence, &mut buffer)?;
        let [raw] = buffer;
        self.raw = raw;
        Ok(raw)
    }

    pub fn raw_to_millivolts(&self, raw: i16) -> Result<u32, ConversionError> {
        self.adc
            .raw_to_millivolts(&self.channel, self.sequence.resolution, raw)
    }

    /// Raw code of the last successful acquisition.
    pub fn raw(&self) -> i16 {
        self.raw
    }

    pub fn release(self) -> A {
        self.adc
    }
}
