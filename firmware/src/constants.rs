use embassy_time::Duration;
use voltage_divider::DividerSettings;

pub static VOLTAGE_DIVIDER_DEV: &str = "VBAT";

/// Battery divider on AIN0 (P0.02), powered through P0.29.
pub static VBAT: DividerSettings = DividerSettings {
    analog_channel: 0,
    upper_resistor_ohm: 2_000_000,
    lower_resistor_ohm: 806_000,
    has_power_gate: true,
    power_startup_delay_ms: 10,
    ..DividerSettings::DEFAULT
};

// Debug timmings
#[cfg(debug_assertions)]
pub static SAMPLE_RATE: Duration = Duration::from_secs(3);

// Production timmings for power saving
#[cfg(not(debug_assertions))]
pub static SAMPLE_RATE: Duration = Duration::from_secs(60);
