#![no_std]
#![no_main]

mod constants;
mod saadc;

use {defmt_rtt as _, embassy_nrf as _, panic_probe as _};

use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Level, Output, OutputDrive},
    saadc::{ChannelConfig, InterruptHandler, Saadc, VddInput},
};
use embassy_time::{Delay, Timer};
use voltage_divider::{adc, config::Input, DividerConfig, VoltageDivider};

use crate::constants::{SAMPLE_RATE, VBAT, VOLTAGE_DIVIDER_DEV};
use crate::saadc::BlockingSaadc;

bind_interrupts!(struct Irqs {
    SAADC => InterruptHandler;
});

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    defmt::info!("Voltage divider start");
    defmt::info!(
        "Version {}, built for {} by {}.",
        built_info::PKG_VERSION,
        built_info::TARGET,
        built_info::RUSTC_VERSION
    );
    if let (Some(version), Some(hash), Some(dirty)) = (
        built_info::GIT_VERSION,
        built_info::GIT_COMMIT_HASH_SHORT,
        built_info::GIT_DIRTY,
    ) {
        defmt::info!("Git version: {} ({}) dirty: {}", version, hash, dirty);
    }

    let p = embassy_nrf::init(Default::default());

    // The SAADC channel is fixed at construction, so build it from the same
    // parameters the divider will request.
    let config = defmt::unwrap!(DividerConfig::new(&VBAT));
    let channel = adc::ChannelConfig::new(VBAT.analog_channel, config.input().into());
    let sequence = adc::Sequence::new(VBAT.analog_channel);
    let input = match config.input() {
        Input::InternalVdd => ChannelConfig::single_ended(VddInput),
        // AIN0
        Input::Analog(_) => ChannelConfig::single_ended(p.P0_02),
    };
    let saadc = Saadc::new(
        p.SAADC,
        Irqs,
        saadc::config(&sequence),
        [saadc::channel_config(&channel, input)],
    );

    let gate = Output::new(p.P0_29, Level::Low, OutputDrive::Standard);
    let mut vbat = defmt::unwrap!(VoltageDivider::new(
        VOLTAGE_DIVIDER_DEV,
        &VBAT,
        BlockingSaadc::new(saadc, channel),
        Some(gate),
        Delay,
    ));

    loop {
        match vbat.sample() {
            Ok(mv) => defmt::info!("{} voltage: {} mV", VOLTAGE_DIVIDER_DEV, mv),
            Err(e) => defmt::error!("voltage_divider_sample, err: {}", e.code()),
        }
        Timer::after(SAMPLE_RATE).await;
    }
}

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
