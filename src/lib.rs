//! Battery and supply voltage measurement through a resistive divider.
//!
//! A [`VoltageDivider`] optionally powers the divider through a gate pin,
//! waits for it to settle, reads the ADC, converts the raw code to millivolts
//! and scales it by the divider ratio. The ADC calibrates once, on the first
//! successful read.
//!
//! ```ignore
//! let settings = DividerSettings {
//!     analog_channel: 0,
//!     upper_resistor_ohm: 2_000_000,
//!     lower_resistor_ohm: 806_000,
//!     has_power_gate: true,
//!     ..DividerSettings::DEFAULT
//! };
//! let mut vbat = VoltageDivider::new("VBAT", &settings, adc, Some(pin), delay)?;
//! let mv = vbat.sample()?;
//! ```
#![cfg_attr(not(test), no_std)]

// This must go first, so the macros are visible to the other modules.
mod fmt;

pub mod adc;
pub mod config;
pub mod convert;
pub mod divider;
pub mod errno;
pub mod error;
pub mod gate;
pub mod shell;

pub use adc::Adc;
pub use config::{DividerConfig, DividerSettings};
pub use divider::{Sampler, VoltageDivider};
pub use error::Error;
pub use gate::NoPin;
