//! Deflector servo driver (SG90-class hobby servo).
//!
//! Position is set by the width of a 50 Hz pulse: 500 µs at 0° up to
//! 2500 µs at 180°, generated by LEDC channel 0 at 14-bit resolution.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real PWM via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::error::ActuatorError;
use crate::fsm::context::ServoCommand;
use crate::pins;

const PULSE_MIN_US: u32 = 500;
const PULSE_MAX_US: u32 = 2500;
const MAX_ANGLE_DEG: u8 = 180;
const FRAME_US: u32 = 1_000_000 / pins::SERVO_PWM_FREQ_HZ;

pub struct ServoDriver {
    push_angle: u8,
    idle_angle: u8,
    angle: u8,
    position: ServoCommand,
    hw_duty: u32,
}

impl ServoDriver {
    /// Bind the two calibrated angles.  Does not move the servo; call
    /// [`set_position`](Self::set_position) with `Idle` at power-on.
    pub fn new(push_angle: u8, idle_angle: u8) -> Result<Self, ActuatorError> {
        if push_angle > MAX_ANGLE_DEG || idle_angle > MAX_ANGLE_DEG {
            return Err(ActuatorError::AngleOutOfRange);
        }
        Ok(Self {
            push_angle,
            idle_angle,
            angle: idle_angle,
            position: ServoCommand::Idle,
            hw_duty: 0,
        })
    }

    pub fn set_position(&mut self, position: ServoCommand) {
        let angle = match position {
            ServoCommand::Push => self.push_angle,
            ServoCommand::Idle => self.idle_angle,
        };
        self.write_angle_hw(angle);
        self.position = position;
    }

    fn write_angle_hw(&mut self, angle: u8) {
        let duty = angle_to_duty(angle);
        hw_init::ledc_set(hw_init::LEDC_CH_SERVO, duty);
        self.angle = angle;
        self.hw_duty = duty;
    }

    pub fn position(&self) -> ServoCommand {
        self.position
    }

    pub fn angle(&self) -> u8 {
        self.angle
    }

    pub fn current_duty(&self) -> u32 {
        self.hw_duty
    }
}

/// Pulse width for `angle`, clamped to 0–180°.
pub fn angle_to_pulse_us(angle: u8) -> u32 {
    let angle = u32::from(angle.min(MAX_ANGLE_DEG));
    PULSE_MIN_US + angle * (PULSE_MAX_US - PULSE_MIN_US) / u32::from(MAX_ANGLE_DEG)
}

/// LEDC duty count for `angle` at the configured resolution.
pub fn angle_to_duty(angle: u8) -> u32 {
    let full_scale = 1u32 << pins::SERVO_PWM_RESOLUTION_BITS;
    angle_to_pulse_us(angle) * full_scale / FRAME_US
}
