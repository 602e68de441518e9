//! Outbound application events.
//!
//! The [`SortController`](super::service::SortController) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them.

use serde::Serialize;

use crate::events::SortEvent;
use crate::fsm::context::SortStats;
use crate::fsm::ControllerState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The controller has started; servo is at rest.
    Started { enabled: bool },

    /// A sort cycle transition.
    Sort(SortEvent),

    /// The enable flag changed.
    EnableChanged { enabled: bool },

    /// Periodic heartbeat while the sorter is off.
    Status(StatusData),
}

/// Point-in-time controller status suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusData {
    pub enabled: bool,
    pub state: ControllerState,
    pub stats: SortStats,
}
