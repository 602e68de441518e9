//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (the on/off
//! button, a test harness) that the
//! [`SortController`](super::service::SortController) interprets.

use crate::drivers::button::ButtonEvent;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SorterCommand {
    /// Start sorting.
    Enable,
    /// Stop sorting; abort any cycle in progress.
    Disable,
    /// Flip the enable flag.
    Toggle,
}

impl SorterCommand {
    /// Map a debounced button edge to a command.  Only presses toggle.
    pub fn from_button(event: ButtonEvent) -> Option<Self> {
        match event {
            ButtonEvent::Pressed => Some(Self::Toggle),
            ButtonEvent::Released => None,
        }
    }
}
