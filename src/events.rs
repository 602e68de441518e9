//! Sort cycle events.
//!
//! Every FSM transition emits exactly one [`SortEvent`], in the order the
//! transitions happened within a tick.  Events carry the tick timestamp so
//! a sink can reconstruct the cycle timeline without its own clock.
//!
//! ```text
//!  ItemDetected ─▶ Classified ─┬─▶ ActuatorFired ─▶ ActuatorRetracted ─┬─▶ CycleDone
//!                              └─▶ Passed ─────────────────────────────┘
//!
//!  (disable while busy) ─▶ CycleAborted
//! ```

use serde::Serialize;

use crate::control::classifier::Classification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortEvent {
    /// Arrival sensor went blocked while the line was idle.
    ItemDetected { at_ms: u32 },
    /// Height read after settle produced a verdict.
    Classified { classification: Classification, at_ms: u32 },
    /// Servo commanded to the push position.
    ActuatorFired { at_ms: u32 },
    /// Short item reached the actuator point and was let through.
    Passed { at_ms: u32 },
    /// Servo commanded back to rest after the dwell.
    ActuatorRetracted { at_ms: u32 },
    /// Suppression window lapsed; the line re-arms.
    CycleDone { at_ms: u32 },
    /// The cycle in progress was dropped because the sorter was disabled.
    CycleAborted { at_ms: u32 },
}

impl SortEvent {
    /// Timestamp of the tick that produced the event.
    pub fn at_ms(&self) -> u32 {
        match *self {
            Self::ItemDetected { at_ms }
            | Self::Classified { at_ms, .. }
            | Self::ActuatorFired { at_ms }
            | Self::Passed { at_ms }
            | Self::ActuatorRetracted { at_ms }
            | Self::CycleDone { at_ms }
            | Self::CycleAborted { at_ms } => at_ms,
        }
    }

    /// Short tag used as the log line prefix.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ItemDetected { .. } => "DETECT",
            Self::Classified { .. } => "CLASS",
            Self::ActuatorFired { .. } => "ACTION",
            Self::Passed { .. } => "PASS",
            Self::ActuatorRetracted { .. } => "RETRACT",
            Self::CycleDone { .. } => "DONE",
            Self::CycleAborted { .. } => "ABORT",
        }
    }
}
