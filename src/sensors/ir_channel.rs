//! Reflective IR beam sensor channel.
//!
//! Each channel reads an analog IR receiver, optionally averages a burst
//! of samples to reject transient noise, and compares the result against
//! a fixed threshold.  An item in the beam pulls the reading low, so
//! `blocked = average < threshold`.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`Adc1Source`] reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: [`Adc1Source`] reads from static `AtomicU16`s for injection.

use core::sync::atomic::{AtomicU16, Ordering};

use embedded_hal::delay::DelayNs;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

use super::AnalogSource;

// Unobstructed beam reads high on the reference receivers.
static SIM_ARRIVAL_ADC: AtomicU16 = AtomicU16::new(1000);
static SIM_HEIGHT_ADC: AtomicU16 = AtomicU16::new(1000);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_raw(channel: ChannelId, raw: u16) {
    match channel {
        ChannelId::Arrival => SIM_ARRIVAL_ADC.store(raw, Ordering::Relaxed),
        ChannelId::Height => SIM_HEIGHT_ADC.store(raw, Ordering::Relaxed),
    }
}

/// Which physical beam a channel is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelId {
    /// Low-mounted beam at the entry of the detection zone.
    Arrival,
    /// High-mounted beam that decides the classification.
    Height,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelReading {
    pub channel: ChannelId,
    /// Averaged raw reading.
    pub raw: u16,
    pub blocked: bool,
}

pub struct IrChannel {
    id: ChannelId,
    threshold: u16,
    samples: u8,
    sample_gap_us: u32,
}

impl IrChannel {
    /// `samples` is clamped to at least 1 (a single, unaveraged read).
    pub fn new(id: ChannelId, threshold: u16, samples: u8, sample_gap_us: u32) -> Self {
        Self {
            id,
            threshold,
            samples: samples.max(1),
            sample_gap_us,
        }
    }

    /// Sample the channel fresh and threshold the average.
    ///
    /// Blocks for `(samples - 1) * sample_gap_us` inside `delay`.
    pub fn read(&self, source: &mut impl AnalogSource, delay: &mut impl DelayNs) -> ChannelReading {
        let mut sum: u32 = 0;
        for i in 0..self.samples {
            if i > 0 && self.sample_gap_us > 0 {
                delay.delay_us(self.sample_gap_us);
            }
            sum += u32::from(source.sample(self.id));
        }
        let raw = (sum / u32::from(self.samples)) as u16;

        ChannelReading {
            channel: self.id,
            raw,
            blocked: raw < self.threshold,
        }
    }
}

/// ADC1 oneshot source for both beams.
pub struct Adc1Source;

impl Adc1Source {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Adc1Source {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalogSource for Adc1Source {
    #[cfg(target_os = "espidf")]
    fn sample(&mut self, channel: ChannelId) -> u16 {
        let adc_channel = match channel {
            ChannelId::Arrival => pins::ARRIVAL_ADC_CHANNEL,
            ChannelId::Height => pins::HEIGHT_ADC_CHANNEL,
        };
        hw_init::adc1_read(adc_channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn sample(&mut self, channel: ChannelId) -> u16 {
        match channel {
            ChannelId::Arrival => SIM_ARRIVAL_ADC.load(Ordering::Relaxed),
            ChannelId::Height => SIM_HEIGHT_ADC.load(Ordering::Relaxed),
        }
    }
}
