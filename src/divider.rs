//! The voltage divider device.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

use crate::adc::{AcquisitionUnit, Adc, InputSelector, SetupError};
use crate::config::{ConfigError, DividerConfig, DividerSettings, Input};
use crate::convert;
use crate::error::Error;
use crate::gate::PowerGate;

/// Error type of a [`VoltageDivider`] built from these parts.
pub type DividerError<A, P> = Error<<P as ErrorType>::Error, <A as Adc>::Error>;

/// A battery or supply voltage measured through an optional divider.
///
/// One instance owns its ADC channel, gate pin and acquisition state.
/// Sampling takes `&mut self`; share an instance behind a mutex if more than
/// one task needs it.
pub struct VoltageDivider<A, P, D> {
    name: &'static str,
    config: DividerConfig,
    unit: AcquisitionUnit<A>,
    gate: PowerGate<P, D>,
    calibrate_next: bool,
}

impl<A, P, D> VoltageDivider<A, P, D>
where
    A: Adc,
    P: OutputPin,
    D: DelayNs,
{
    /// Validates `settings` and brings the device up.
    ///
    /// `gate_pin` must be given exactly when `settings.has_power_gate` is set.
    /// It is driven to its inactive level before this returns.
    pub fn new(
        name: &'static str,
        settings: &DividerSettings,
        adc: A,
        gate_pin: Option<P>,
        delay: D,
    ) -> Result<Self, DividerError<A, P>> {
        let config = DividerConfig::new(settings).inspect_err(|e| {
            error!("{=str}: invalid configuration: {}", name, e);
        })?;

        let gate_pin = match (config.gate(), gate_pin) {
            (Some(gate), Some(pin)) => Some((pin, gate)),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingGatePin.into()),
            (None, Some(_)) => return Err(ConfigError::UnexpectedGatePin.into()),
        };

        let (channel_id, input) = match config.input() {
            Input::Analog(channel) => (channel, InputSelector::AnalogInput(channel)),
            // The supply rail is routed to the same channel slot.
            Input::InternalVdd => (settings.analog_channel, InputSelector::Vdd),
        };
        let unit = AcquisitionUnit::new(adc, channel_id, input).map_err(|e| match e {
            SetupError::NotReady => Error::NotReady,
            SetupError::InvalidChannel(channel) => ConfigError::InvalidChannel(channel).into(),
            SetupError::Channel(e) => Error::Acquisition(e),
        })?;

        let gate = PowerGate::new(gate_pin, delay).map_err(|e| {
            error!("{=str}: failed to configure power gate", name);
            Error::Gate(e)
        })?;

        Ok(Self {
            name,
            config,
            unit,
            gate,
            calibrate_next: true,
        })
    }

    /// Takes one measurement and returns it in millivolts.
    ///
    /// The gate is enabled for the duration of the call and is disabled again
    /// on every path out of it. The ADC calibrates on the first successful
    /// read of the device's lifetime; a failed read leaves calibration pending.
    pub fn sample(&mut self) -> Result<u32, DividerError<A, P>> {
        let guard = self.gate.enable().map_err(Error::Gate)?;

        let raw = self.unit.acquire(self.calibrate_next).map_err(|e| {
            error!("{=str}: ADC read failed", self.name);
            Error::Acquisition(e)
        })?;
        self.calibrate_next = false;

        let input_mv = self.unit.raw_to_millivolts(raw)?;
        let mv = convert::scale(input_mv, self.config.divider());
        debug!(
            "{=str}: raw {=i16} ~ {=u32} mV => {=u32} mV",
            self.name,
            raw,
            input_mv,
            mv
        );

        guard.disable().map_err(Error::Gate)?;
        Ok(mv)
    }

    /// [`sample`](Self::sample) on the integer surface: millivolts, or a
    /// negative error number.
    pub fn sample_code(&mut self) -> i32 {
        match self.sample() {
            Ok(mv) => i32::try_from(mv).unwrap_or(i32::MAX),
            Err(e) => e.code(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn config(&self) -> &DividerConfig {
        &self.config
    }

    /// Whether the next read will calibrate the ADC.
    pub fn calibration_pending(&self) -> bool {
        self.calibrate_next
    }

    /// Raw code of the last successful read.
    pub fn last_raw(&self) -> i16 {
        self.unit.raw()
    }

    pub fn release(self) -> (A, Option<P>, D) {
        let (pin, delay) = self.gate.release();
        (self.unit.release(), pin, delay)
    }
}

/// Object-safe access to a named device, as used by the command surface.
pub trait Sampler {
    fn name(&self) -> &str;

    /// Millivolts, or a negative error number.
    fn sample_code(&mut self) -> i32;
}

impl<A, P, D> Sampler for VoltageDivider<A, P, D>
where
    A: Adc,
    P: OutputPin,
    D: DelayNs,
{
    fn name(&self) -> &str {
        self.name
    }

    fn sample_code(&mut self) -> i32 {
        VoltageDivider::sample_code(self)
    }
}
