//! System configuration parameters
//!
//! All tunable parameters for the HeightSort line. Values are fixed at
//! build time; recalibrate `travel_ms` whenever belt speed or sensor
//! placement changes.

use serde::{Deserialize, Serialize};

/// Longest duration accepted by [`SorterConfig::validate`].  Elapsed-time
/// checks use `wrapping_sub` on `u32` milliseconds, which is only
/// unambiguous below half the counter range.
pub const MAX_DURATION_MS: u32 = i32::MAX as u32;

/// Raw value reported for a failed ADC read.  Beams block on *low*
/// readings, so full scale reads as clear under any threshold.
pub const ADC_FAILED_READING: u16 = u16::MAX;

/// Core sorter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SorterConfig {
    // --- Sensors ---
    /// Raw reading below which the arrival sensor counts as blocked
    pub arrival_threshold: u16,
    /// Raw reading below which the height sensor counts as blocked
    pub height_threshold: u16,
    /// Samples averaged per channel read (1 = no averaging)
    pub samples_per_read: u8,
    /// Delay between consecutive samples (microseconds)
    pub sample_gap_us: u32,

    // --- Cycle timing ---
    /// Wait after arrival before the height reading is trusted (ms)
    pub settle_ms: u32,
    /// Window after classification during which new arrivals are ignored (ms).
    /// Must exceed `settle_ms`; an item still under the arrival beam is
    /// detected again once it lapses.
    pub suppress_ms: u32,
    /// Belt travel time from the detection point to the actuator (ms)
    pub travel_ms: u32,
    /// Time the actuator holds the push position (ms)
    pub dwell_ms: u32,

    // --- Actuator ---
    /// Servo angle that deflects an item off the line (degrees)
    pub push_angle_deg: u8,
    /// Servo rest angle (degrees)
    pub idle_angle_deg: u8,

    // --- Enable button ---
    /// Level must be stable this long before a button change is accepted (ms)
    pub button_debounce_ms: u32,
    /// Enable flag at power-on
    pub start_enabled: bool,

    // --- Loop ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Status heartbeat interval while disabled (milliseconds)
    pub status_interval_ms: u32,
}

impl Default for SorterConfig {
    fn default() -> Self {
        Self {
            // Sensors: no item ~900-1000, item present < 100
            arrival_threshold: 500,
            height_threshold: 500,
            samples_per_read: 10,
            sample_gap_us: 100,

            // Cycle timing
            settle_ms: 100,
            suppress_ms: 1000,
            travel_ms: 0, // actuator co-located with the sensors
            dwell_ms: 200,

            // Actuator
            push_angle_deg: 65,
            idle_angle_deg: 0,

            // Enable button
            button_debounce_ms: 50,
            start_enabled: false,

            // Loop
            control_loop_interval_ms: 5,
            status_interval_ms: 1000,
        }
    }
}

/// Errors from [`SorterConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl core::error::Error for ConfigError {}

impl SorterConfig {
    /// Reject values the controller cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arrival_threshold == 0 || self.height_threshold == 0 {
            return Err(ConfigError::ValidationFailed(
                "sensor thresholds must be non-zero (channel could never block)",
            ));
        }
        if self.samples_per_read == 0 {
            return Err(ConfigError::ValidationFailed("samples_per_read must be >= 1"));
        }
        if self.dwell_ms == 0 {
            return Err(ConfigError::ValidationFailed("dwell_ms must be > 0"));
        }
        if self.suppress_ms <= self.settle_ms {
            return Err(ConfigError::ValidationFailed(
                "suppress_ms must exceed settle_ms (item would re-trigger)",
            ));
        }
        if self.push_angle_deg > 180 || self.idle_angle_deg > 180 {
            return Err(ConfigError::ValidationFailed("servo angles must be 0-180"));
        }
        if self.push_angle_deg == self.idle_angle_deg {
            return Err(ConfigError::ValidationFailed(
                "push and idle angles must differ",
            ));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "control_loop_interval_ms must be > 0",
            ));
        }
        let durations = [
            self.settle_ms,
            self.suppress_ms,
            self.travel_ms,
            self.dwell_ms,
            self.button_debounce_ms,
            self.status_interval_ms,
        ];
        if durations.iter().any(|d| *d > MAX_DURATION_MS) {
            return Err(ConfigError::ValidationFailed(
                "durations must stay below 2^31 ms",
            ));
        }
        Ok(())
    }
}
