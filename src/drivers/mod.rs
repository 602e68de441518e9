//! Actuator drivers, hardware initialisation, and the enable button.

pub mod button;
pub mod hw_init;
pub mod servo;
