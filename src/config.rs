//! Divider configuration and bring-up validation.

use core::fmt;

/// Highest channel that fits the sequence channel mask.
pub const MAX_CHANNEL: u8 = 31;

/// Settling time used when the board does not specify one.
pub const DEFAULT_STARTUP_DELAY_MS: i32 = 10;

/// Raw configuration as supplied by the board description.
///
/// Field for field this matches the binding of the divider node: the ADC
/// channel, the two resistor values and the optional power gate. Nothing is
/// validated here; see [`DividerConfig::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DividerSettings {
    pub analog_channel: u8,
    pub measure_internal_vdd: bool,
    /// Resistance between the measured source and the ADC input.
    pub upper_resistor_ohm: u32,
    /// Resistance between the ADC input and ground.
    pub lower_resistor_ohm: u32,
    pub has_power_gate: bool,
    /// Gate is active when driven low.
    pub power_gate_active_low: bool,
    pub power_startup_delay_ms: i32,
}

impl DividerSettings {
    pub const DEFAULT: Self = Self {
        analog_channel: 0,
        measure_internal_vdd: false,
        upper_resistor_ohm: 0,
        lower_resistor_ohm: 0,
        has_power_gate: false,
        power_gate_active_low: false,
        power_startup_delay_ms: DEFAULT_STARTUP_DELAY_MS,
    };
}

impl Default for DividerSettings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What the ADC samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Input {
    Analog(u8),
    InternalVdd,
}

/// A resistor pair with both values nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Divider {
    upper_ohm: u32,
    lower_ohm: u32,
}

impl Divider {
    /// Returns `None` unless both resistors are nonzero.
    pub const fn new(upper_ohm: u32, lower_ohm: u32) -> Option<Self> {
        if upper_ohm == 0 || lower_ohm == 0 {
            None
        } else {
            Some(Self {
                upper_ohm,
                lower_ohm,
            })
        }
    }

    pub const fn upper_ohm(&self) -> u32 {
        self.upper_ohm
    }

    pub const fn lower_ohm(&self) -> u32 {
        self.lower_ohm
    }

    /// Total resistance of the pair, the numerator of the divider ratio.
    pub const fn full_ohm(&self) -> u64 {
        self.upper_ohm as u64 + self.lower_ohm as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GateConfig {
    pub active_low: bool,
    pub startup_delay_ms: u32,
}

/// Validated, immutable divider configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DividerConfig {
    input: Input,
    divider: Option<Divider>,
    gate: Option<GateConfig>,
}

impl DividerConfig {
    pub fn new(settings: &DividerSettings) -> Result<Self, ConfigError> {
        let (upper, lower) = (settings.upper_resistor_ohm, settings.lower_resistor_ohm);

        // The internal VDD input is routed through the same channel slot.
        if settings.analog_channel > MAX_CHANNEL {
            return Err(ConfigError::InvalidChannel(settings.analog_channel));
        }

        let input = if settings.measure_internal_vdd {
            if upper != 0 || lower != 0 {
                return Err(ConfigError::DividerOnInternalVdd);
            }
            Input::InternalVdd
        } else {
            Input::Analog(settings.analog_channel)
        };

        let divider = match (upper, lower) {
            (0, 0) => None,
            _ => Some(Divider::new(upper, lower).ok_or(ConfigError::LoneResistor)?),
        };

        let startup_delay_ms = u32::try_from(settings.power_startup_delay_ms)
            .map_err(|_| ConfigError::NegativeStartupDelay)?;

        let gate = settings.has_power_gate.then_some(GateConfig {
            active_low: settings.power_gate_active_low,
            startup_delay_ms,
        });

        Ok(Self {
            input,
            divider,
            gate,
        })
    }

    pub const fn input(&self) -> Input {
        self.input
    }

    pub const fn divider(&self) -> Option<Divider> {
        self.divider
    }

    pub const fn gate(&self) -> Option<GateConfig> {
        self.gate
    }
}

impl TryFrom<DividerSettings> for DividerConfig {
    type Error = ConfigError;

    fn try_from(settings: DividerSettings) -> Result<Self, Self::Error> {
        Self::new(&settings)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The internal supply rail never goes through a divider.
    DividerOnInternalVdd,
    /// Exactly one of the two resistors is nonzero.
    LoneResistor,
    NegativeStartupDelay,
    /// Channel number above [`MAX_CHANNEL`].
    InvalidChannel(u8),
    /// A power gate is configured but no pin was supplied.
    MissingGatePin,
    /// A pin was supplied but no power gate is configured.
    UnexpectedGatePin,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DividerOnInternalVdd => f.write_str("internal VDD measured through a divider"),
            Self::LoneResistor => f.write_str("only one divider resistor is set"),
            Self::NegativeStartupDelay => f.write_str("negative power startup delay"),
            Self::InvalidChannel(channel) => write!(f, "invalid ADC channel {channel}"),
            Self::MissingGatePin => f.write_str("power gate configured without a pin"),
            Self::UnexpectedGatePin => f.write_str("pin supplied without a power gate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> DividerSettings {
        DividerSettings {
            analog_channel: 2,
            upper_resistor_ohm: 10_000,
            lower_resistor_ohm: 2_000,
            ..DividerSettings::DEFAULT
        }
    }

    #[test]
    fn divider_on_analog_input() {
        let config = DividerConfig::new(&settings()).unwrap();
        assert_eq!(config.input(), Input::Analog(2));
        let divider = config.divider().unwrap();
        assert_eq!(divider.full_ohm(), 12_000);
        assert_eq!(config.gate(), None);
    }

    #[test]
    fn internal_vdd_without_divider() {
        let config = DividerConfig::new(&DividerSettings {
            measure_internal_vdd: true,
            ..DividerSettings::DEFAULT
        })
        .unwrap();
        assert_eq!(config.input(), Input::InternalVdd);
        assert_eq!(config.divider(), None);
    }

    #[test]
    fn internal_vdd_with_resistor_is_rejected() {
        let result = DividerConfig::new(&DividerSettings {
            measure_internal_vdd: true,
            upper_resistor_ohm: 100,
            ..DividerSettings::DEFAULT
        });
        assert_eq!(result, Err(ConfigError::DividerOnInternalVdd));

        let result = DividerConfig::new(&DividerSettings {
            measure_internal_vdd: true,
            ..settings()
        });
        assert_eq!(result, Err(ConfigError::DividerOnInternalVdd));
    }

    #[test]
    fn lone_resistor_is_rejected() {
        for (upper, lower) in [(100, 0), (0, 100)] {
            let result = DividerConfig::new(&DividerSettings {
                upper_resistor_ohm: upper,
                lower_resistor_ohm: lower,
                ..DividerSettings::DEFAULT
            });
            assert_eq!(result, Err(ConfigError::LoneResistor));
        }
    }

    #[test]
    fn negative_startup_delay_is_rejected() {
        let result = DividerConfig::try_from(DividerSettings {
            has_power_gate: true,
            power_startup_delay_ms: -1,
            ..settings()
        });
        assert_eq!(result, Err(ConfigError::NegativeStartupDelay));
    }

    #[test]
    fn channel_outside_mask_is_rejected() {
        let result = DividerConfig::new(&DividerSettings {
            analog_channel: 40,
            ..settings()
        });
        assert_eq!(result, Err(ConfigError::InvalidChannel(40)));

        let result = DividerConfig::new(&DividerSettings {
            analog_channel: MAX_CHANNEL + 1,
            measure_internal_vdd: true,
            ..DividerSettings::DEFAULT
        });
        assert_eq!(result, Err(ConfigError::InvalidChannel(32)));

        let config = DividerConfig::new(&DividerSettings {
            analog_channel: MAX_CHANNEL,
            ..settings()
        })
        .unwrap();
        assert_eq!(config.input(), Input::Analog(31));
    }

    #[test]
    fn gate_keeps_delay_and_polarity() {
        let config = DividerConfig::new(&DividerSettings {
            has_power_gate: true,
            power_gate_active_low: true,
            power_startup_delay_ms: 0,
            ..settings()
        })
        .unwrap();
        assert_eq!(
            config.gate(),
            Some(GateConfig {
                active_low: true,
                startup_delay_ms: 0,
            })
        );
    }
}
