//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`], the ADC source and the servo driver, exposing
//! them through [`SensorPort`] and [`ActuatorPort`].  This is the only
//! module in the system that touches actual hardware.  On non-espidf
//! targets, the ADC source reads cfg-gated simulation values.

use embedded_hal::delay::DelayNs;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::servo::ServoDriver;
use crate::fsm::context::{SensorSnapshot, ServoCommand};
use crate::sensors::ir_channel::Adc1Source;
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<D: DelayNs> {
    sensor_hub: SensorHub,
    source: Adc1Source,
    delay: D,
    servo: ServoDriver,
}

impl<D: DelayNs> HardwareAdapter<D> {
    pub fn new(sensor_hub: SensorHub, delay: D, servo: ServoDriver) -> Self {
        Self {
            sensor_hub,
            source: Adc1Source::new(),
            delay,
            servo,
        }
    }

    pub fn servo(&self) -> &ServoDriver {
        &self.servo
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<D: DelayNs> SensorPort for HardwareAdapter<D> {
    fn read_all(&mut self) -> SensorSnapshot {
        self.sensor_hub.read_all(&mut self.source, &mut self.delay)
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<D: DelayNs> ActuatorPort for HardwareAdapter<D> {
    fn set_position(&mut self, command: ServoCommand) {
        self.servo.set_position(command);
    }
}
