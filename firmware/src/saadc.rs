use embassy_futures::block_on;
use embassy_nrf::saadc::{self, Saadc};
use voltage_divider::adc::{self, ChannelConfig, Reference, Sequence};
use voltage_divider::convert::Gain;
use voltage_divider::errno::EINVAL;

static ADC_REF_VOLTAGE: u16 = 600;
// VDD/4 with the nominal 3.3 V supply
static ADC_VDD1_4_VOLTAGE: u16 = 825;

/// SAADC configuration for `sequence`.
pub fn config(sequence: &Sequence) -> saadc::Config {
    let mut config = saadc::Config::default();
    config.resolution = match sequence.resolution {
        8 => saadc::Resolution::_8BIT,
        10 => saadc::Resolution::_10BIT,
        12 => saadc::Resolution::_12BIT,
        _ => saadc::Resolution::_14BIT,
    };
    config.oversample = match sequence.oversampling {
        0 | 1 => saadc::Oversample::BYPASS,
        2 => saadc::Oversample::OVER2X,
        4 => saadc::Oversample::OVER4X,
        8 => saadc::Oversample::OVER8X,
        _ => saadc::Oversample::OVER16X,
    };
    config
}

/// Applies gain, reference and acquisition time of `channel` to `config`.
pub fn channel_config<'d>(
    channel: &ChannelConfig,
    mut config: saadc::ChannelConfig<'d>,
) -> saadc::ChannelConfig<'d> {
    config.gain = match channel.gain {
        Gain::Gain1_6 => saadc::Gain::GAIN1_6,
        Gain::Gain1_5 => saadc::Gain::GAIN1_5,
        Gain::Gain1_4 => saadc::Gain::GAIN1_4,
        Gain::Gain1_3 => saadc::Gain::GAIN1_3,
        Gain::Gain1_2 => saadc::Gain::GAIN1_2,
        Gain::Gain1 => saadc::Gain::GAIN1,
        Gain::Gain2 => saadc::Gain::GAIN2,
        Gain::Gain4 => saadc::Gain::GAIN4,
    };
    config.reference = match channel.reference {
        Reference::Internal => saadc::Reference::INTERNAL,
        Reference::Vdd1_4 => saadc::Reference::VDD1_4,
    };
    config.time = match channel.acquisition_time_us {
        0..=3 => saadc::Time::_3US,
        4..=5 => saadc::Time::_5US,
        6..=10 => saadc::Time::_10US,
        11..=15 => saadc::Time::_15US,
        16..=20 => saadc::Time::_20US,
        _ => saadc::Time::_40US,
    };
    config
}

/// The requested channel differs from the one the SAADC was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct ChannelMismatch;

impl adc::Error for ChannelMismatch {
    fn code(&self) -> i32 {
        -EINVAL
    }
}

/// Blocking single-channel access to the SAADC.
///
/// The channel is fixed when the SAADC is built, so `setup_channel` only
/// checks that the requested configuration is the one in use.
pub struct BlockingSaadc<'d> {
    saadc: Saadc<'d, 1>,
    channel: ChannelConfig,
}

impl<'d> BlockingSaadc<'d> {
    pub fn new(saadc: Saadc<'d, 1>, channel: ChannelConfig) -> Self {
        Self { saadc, channel }
    }
}

impl adc::Adc for BlockingSaadc<'_> {
    type Error = ChannelMismatch;

    fn is_ready(&self) -> bool {
        true
    }

    fn setup_channel(&mut self, config: &ChannelConfig) -> Result<(), Self::Error> {
        if *config != self.channel {
            defmt::error!(
                "SAADC built for {}, requested {}",
                self.channel,
                config
            );
            return Err(ChannelMismatch);
        }
        Ok(())
    }

    fn read(&mut self, sequence: &Sequence, buffer: &mut [i16]) -> Result<(), Self::Error> {
        let mut buf = [0; 1];
        block_on(async {
            if sequence.calibrate {
                defmt::debug!("Calibrating SAADC");
                self.saadc.calibrate().await;
            }
            self.saadc.sample(&mut buf).await;
        });
        let [raw] = buf;
        buffer[0] = raw;
        Ok(())
    }

    fn reference_mv(&self, reference: Reference) -> u16 {
        match reference {
            Reference::Internal => ADC_REF_VOLTAGE,
            Reference::Vdd1_4 => ADC_VDD1_4_VOLTAGE,
        }
    }
}
