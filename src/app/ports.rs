//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SortController (domain)
//! ```
//!
//! Driven adapters (beam sensors, servo, event sinks) implement these
//! traits.  The [`SortController`](super::service::SortController) consumes
//! them via generics, so the domain core never touches hardware directly.

use crate::fsm::context::{SensorSnapshot, ServoCommand};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per enabled tick.
pub trait SensorPort {
    /// Read both beam sensors and return a unified snapshot.
    fn read_all(&mut self) -> SensorSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to move the diverter.
/// Fire-and-forget; there is no position feedback.
pub trait ActuatorPort {
    fn set_position(&mut self, command: ServoCommand);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
