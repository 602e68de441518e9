//! GPIO / peripheral pin assignments for the HeightSort controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// IR reflective sensors: Analog (ADC1)
// ---------------------------------------------------------------------------

/// Arrival sensor, mounted low at the start of the detection zone.
/// ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const ARRIVAL_ADC_GPIO: i32 = 1;
/// Height sensor, mounted above the arrival sensor.
/// ADC1 channel 1 (GPIO 2 on ESP32-S3).
pub const HEIGHT_ADC_GPIO: i32 = 2;

/// ADC1 channel numbers matching the GPIOs above.
pub const ARRIVAL_ADC_CHANNEL: u32 = 0;
pub const HEIGHT_ADC_CHANNEL: u32 = 1;

// ---------------------------------------------------------------------------
// Deflector servo (SG90-class, 50 Hz)
// ---------------------------------------------------------------------------

/// LEDC PWM output for the deflector servo signal line.
pub const SERVO_PWM_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// User button (active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button toggling the sorter on and off.
pub const BUTTON_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  14-bit gives ~1.2 µs steps at 50 Hz.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;
/// Hobby servo frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
