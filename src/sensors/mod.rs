//! Sensor subsystem: IR beam channels and the aggregating [`SensorHub`].
//!
//! The hub owns both beam channels and produces a [`SensorSnapshot`] each
//! tick that the sort controller consumes.

pub mod ir_channel;

use embedded_hal::delay::DelayNs;

use crate::config::SorterConfig;
use crate::fsm::context::SensorSnapshot;
use ir_channel::{ChannelId, IrChannel};

/// Raw analog sample provider.  Out-of-range readings are clamped by the
/// hardware layer, so sampling is infallible.
pub trait AnalogSource {
    fn sample(&mut self, channel: ChannelId) -> u16;
}

/// Aggregates the arrival and height channels into a unified snapshot.
pub struct SensorHub {
    pub arrival: IrChannel,
    pub height: IrChannel,
}

impl SensorHub {
    pub fn new(arrival: IrChannel, height: IrChannel) -> Self {
        Self { arrival, height }
    }

    /// Build both channels from the configured thresholds and averaging.
    pub fn from_config(config: &SorterConfig) -> Self {
        Self::new(
            IrChannel::new(
                ChannelId::Arrival,
                config.arrival_threshold,
                config.samples_per_read,
                config.sample_gap_us,
            ),
            IrChannel::new(
                ChannelId::Height,
                config.height_threshold,
                config.samples_per_read,
                config.sample_gap_us,
            ),
        )
    }

    /// Read both channels back to back and return a unified snapshot.
    pub fn read_all(
        &self,
        source: &mut impl AnalogSource,
        delay: &mut impl DelayNs,
    ) -> SensorSnapshot {
        let arrival = self.arrival.read(source, delay);
        let height = self.height.read(source, delay);

        SensorSnapshot {
            arrival_blocked: arrival.blocked,
            height_blocked: height.blocked,
            arrival_raw: arrival.raw,
            height_raw: height.raw,
        }
    }
}
