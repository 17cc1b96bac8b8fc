//! Power gate of the divider network.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::GateConfig;

/// Pin type for dividers that are always connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoPin;

impl embedded_hal::digital::ErrorType for NoPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

struct GatePin<P> {
    pin: P,
    config: GateConfig,
}

impl<P: OutputPin> GatePin<P> {
    fn drive(&mut self, active: bool) -> Result<(), P::Error> {
        if active != self.config.active_low {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }
}

/// Drives the optional output that lets current flow through the divider.
///
/// Without a pin every operation is a no-op and no settling delay applies.
pub struct PowerGate<P, D> {
    pin: Option<GatePin<P>>,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> PowerGate<P, D> {
    /// Takes the pin and drives it to its inactive level.
    pub fn new(pin: Option<(P, GateConfig)>, delay: D) -> Result<Self, P::Error> {
        let mut gate = Self {
            pin: pin.map(|(pin, config)| GatePin { pin, config }),
            delay,
        };
        if let Some(pin) = gate.pin.as_mut() {
            pin.drive(false)?;
        }
        Ok(gate)
    }

    /// A gate that is never driven.
    pub fn none(delay: D) -> Self {
        Self { pin: None, delay }
    }

    pub fn is_present(&self) -> bool {
        self.pin.is_some()
    }

    /// Energizes or de-energizes the divider.
    ///
    /// Enabling blocks for the startup delay once the pin is driven, so the
    /// divider has settled when this returns.
    pub fn set(&mut self, enabled: bool) -> Result<(), P::Error> {
        let Some(pin) = self.pin.as_mut() else {
            return Ok(());
        };

        debug!("Setting power gate to {=bool}", enabled);
        pin.drive(enabled)?;
        if enabled {
            self.delay.delay_ms(pin.config.startup_delay_ms);
        }
        Ok(())
    }

    /// Enables the gate and returns a guard that disables it when dropped.
    pub fn enable(&mut self) -> Result<GateGuard<'_, P, D>, P::Error> {
        if let Err(e) = self.set(true) {
            // The pin may have been partially driven; leave it off.
            let _ = self.set(false);
            return Err(e);
        }
        Ok(GateGuard { gate: Some(self) })
    }

    pub fn release(self) -> (Option<P>, D) {
        (self.pin.map(|pin| pin.pin), self.delay)
    }
}

/// Keeps the gate enabled for the lifetime of a measurement.
///
/// Dropping the guard disables the gate and discards any write error, so an
/// error already being returned is not replaced. Use [`GateGuard::disable`]
/// to observe the result instead.
pub struct GateGuard<'a, P: OutputPin, D: DelayNs> {
    gate: Option<&'a mut PowerGate<P, D>>,
}

impl<P: OutputPin, D: DelayNs> GateGuard<'_, P, D> {
    pub fn disable(mut self) -> Result<(), P::Error> {
        match self.gate.take() {
            Some(gate) => gate.set(false),
            None => Ok(()),
        }
    }
}

impl<P: OutputPin, D: DelayNs> Drop for GateGuard<'_, P, D> {
    fn drop(&mut self) {
        if let Some(gate) = self.gate.take() {
            if gate.set(false).is_err() {
                warn!("Failed to disable power gate");
            }
        }
    }
}
