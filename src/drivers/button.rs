//! Polled, debounced on/off push-button.
//!
//! ## Hardware
//!
//! Active-low momentary switch with internal pull-up.  The main loop
//! samples the pin every control tick and feeds the level into
//! [`ButtonDriver::tick`], which runs a non-blocking debounce.
//!
//! ## Debounce
//!
//! A level change is only accepted once the new level has been seen
//! continuously for `debounce_ms`.  A bounce back to the old level
//! inside that window discards the change.  Each accepted press edge
//! is reported once; the caller toggles the sorter on it.

/// Button events emitted after debounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Stable,
    Changing { since_ms: u32 },
}

pub struct ButtonDriver {
    gpio: i32,
    debounce_ms: u32,
    pressed: bool,
    state: DebounceState,
}

impl ButtonDriver {
    pub fn new(gpio: i32, debounce_ms: u32) -> Self {
        Self {
            gpio,
            debounce_ms,
            pressed: false,
            state: DebounceState::Stable,
        }
    }

    /// GPIO pin this button is attached to.
    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    /// Debounced level.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Call from the main loop at each control tick with the raw level.
    /// `now_ms` is the current monotonic time in milliseconds.
    pub fn tick(&mut self, now_ms: u32, raw_pressed: bool) -> Option<ButtonEvent> {
        match self.state {
            DebounceState::Stable => {
                if raw_pressed != self.pressed {
                    self.state = DebounceState::Changing { since_ms: now_ms };
                }
                None
            }

            DebounceState::Changing { since_ms } => {
                if raw_pressed == self.pressed {
                    // Bounced back before the window elapsed.
                    self.state = DebounceState::Stable;
                    return None;
                }
                if now_ms.wrapping_sub(since_ms) < self.debounce_ms {
                    return None;
                }

                self.pressed = raw_pressed;
                self.state = DebounceState::Stable;
                if raw_pressed {
                    Some(ButtonEvent::Pressed)
                } else {
                    Some(ButtonEvent::Released)
                }
            }
        }
    }

    /// Raw pin level, active-low.
    #[cfg(target_os = "espidf")]
    pub fn is_pressed_hw(&self) -> bool {
        !crate::drivers::hw_init::gpio_read(self.gpio)
    }
}
