//! Application service: the hexagonal core.
//!
//! [`SortController`] owns the FSM, the shared context and the enable
//! flag.  It exposes a clean, hardware-agnostic API.  All I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!                 │     SortController      │
//! ActuatorPort ◀──│  FSM · enable · stats   │
//!                 └─────────────────────────┘
//! ```
//!
//! Two layers of API:
//!
//! - [`step`](SortController::step) / [`set_enabled`](SortController::set_enabled)
//!   are pure: snapshot and timestamp in, [`TickOutcome`] out.
//! - [`tick`](SortController::tick) / [`handle_command`](SortController::handle_command)
//!   wrap them with port I/O for the firmware loop.

use heapless::Vec;
use log::{info, warn};

use crate::config::{ConfigError, SorterConfig};
use crate::events::SortEvent;
use crate::fsm::context::{
    elapsed_ms, FsmContext, ItemInProcess, SensorSnapshot, ServoCommand, SortStats,
    MAX_EVENTS_PER_TICK,
};
use crate::fsm::states::build_state_table;
use crate::fsm::{ControllerState, Fsm, StateId};

use super::commands::SorterCommand;
use super::events::{AppEvent, StatusData};
use super::ports::{ActuatorPort, EventSink, SensorPort};

/// What one controller step asks of the outside world.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Servo command to apply, if the position must change.
    pub command: Option<ServoCommand>,
    /// Transitions taken, in order.
    pub events: Vec<SortEvent, MAX_EVENTS_PER_TICK>,
}

// ───────────────────────────────────────────────────────────────
// SortController
// ───────────────────────────────────────────────────────────────

pub struct SortController {
    fsm: Fsm,
    ctx: FsmContext,
    /// Timestamp of the last status heartbeat.
    last_status_at: u32,
}

impl SortController {
    /// Construct the controller from a validated configuration.
    ///
    /// Does **not** start the FSM: call [`start`](Self::start) next.
    pub fn new(config: SorterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let ctx = FsmContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Idle);
        Ok(Self {
            fsm,
            ctx,
            last_status_at: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the servo to rest and start the FSM in `Idle`.
    pub fn start(&mut self, now_ms: u32, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        self.ctx.now_ms = now_ms;
        self.fsm.start(&mut self.ctx);
        self.last_status_at = now_ms;
        hw.set_position(ServoCommand::Idle);
        sink.emit(&AppEvent::Started {
            enabled: self.ctx.enabled,
        });
        info!(
            "SortController started (enabled={}, travel={}ms)",
            self.ctx.enabled, self.ctx.config.travel_ms
        );
    }

    // ── Pure core ─────────────────────────────────────────────

    /// Advance the state machine with one sensor snapshot.
    ///
    /// While disabled this is a no-op that returns an empty outcome.
    pub fn step(&mut self, snapshot: SensorSnapshot, now_ms: u32) -> TickOutcome {
        self.ctx.begin_tick(now_ms, snapshot);
        if self.ctx.enabled {
            self.fsm.tick(&mut self.ctx);
        }
        self.take_outcome()
    }

    /// Change the enable flag.
    ///
    /// Disabling aborts the cycle in progress: the item is dropped, the
    /// FSM returns to `Idle` and the servo is always commanded to rest.
    /// Setting the flag to its current value returns an empty outcome.
    pub fn set_enabled(&mut self, enabled: bool, now_ms: u32) -> TickOutcome {
        self.ctx.now_ms = now_ms;
        self.ctx.command = None;
        self.ctx.events.clear();

        if enabled == self.ctx.enabled {
            return TickOutcome::default();
        }
        self.ctx.enabled = enabled;

        if enabled {
            info!("Sorter enabled @{}ms", now_ms);
            return self.take_outcome();
        }

        let busy = self.fsm.current_state() != StateId::Idle;
        if busy {
            warn!(
                "Sorter disabled during {}, aborting cycle",
                self.fsm.current_name()
            );
            self.fsm.force_transition(StateId::Idle, &mut self.ctx);
            self.ctx.stats.aborted = self.ctx.stats.aborted.wrapping_add(1);
            self.ctx.emit(SortEvent::CycleAborted { at_ms: now_ms });
        } else {
            info!("Sorter disabled @{}ms", now_ms);
        }
        self.ctx.command = Some(ServoCommand::Idle);
        self.last_status_at = now_ms;
        self.take_outcome()
    }

    // ── Port-driven wrappers ──────────────────────────────────

    /// Run one control cycle: read sensors → FSM → actuator → events.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    ///
    /// While disabled, sensors are not read and only the status
    /// heartbeat is emitted.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        if !self.ctx.enabled {
            self.emit_status_if_due(now_ms, sink);
            return;
        }

        let snapshot = hw.read_all();
        let outcome = self.step(snapshot, now_ms);
        Self::apply(outcome, hw, sink);
    }

    /// Process an external command (button, test harness).
    pub fn handle_command(
        &mut self,
        cmd: SorterCommand,
        now_ms: u32,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        let enabled = match cmd {
            SorterCommand::Enable => true,
            SorterCommand::Disable => false,
            SorterCommand::Toggle => !self.ctx.enabled,
        };
        if enabled == self.ctx.enabled {
            return;
        }

        let outcome = self.set_enabled(enabled, now_ms);
        Self::apply(outcome, hw, sink);
        sink.emit(&AppEvent::EnableChanged { enabled });
    }

    // ── Queries ───────────────────────────────────────────────

    /// Coarse controller state.
    pub fn state(&self) -> ControllerState {
        self.fsm.current_state().controller_state()
    }

    /// Fine-grained FSM state.
    pub fn state_id(&self) -> StateId {
        self.fsm.current_state()
    }

    /// The item in flight, present only while awaiting actuation.
    pub fn item(&self) -> Option<ItemInProcess> {
        self.ctx.item
    }

    pub fn is_enabled(&self) -> bool {
        self.ctx.enabled
    }

    pub fn stats(&self) -> &SortStats {
        &self.ctx.stats
    }

    pub fn config(&self) -> &SorterConfig {
        &self.ctx.config
    }

    /// Current status snapshot.
    pub fn status(&self) -> StatusData {
        StatusData {
            enabled: self.ctx.enabled,
            state: self.state(),
            stats: self.ctx.stats,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn take_outcome(&mut self) -> TickOutcome {
        TickOutcome {
            command: self.ctx.command.take(),
            events: core::mem::take(&mut self.ctx.events),
        }
    }

    fn apply(outcome: TickOutcome, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        if let Some(command) = outcome.command {
            hw.set_position(command);
        }
        for event in outcome.events {
            sink.emit(&AppEvent::Sort(event));
        }
    }

    fn emit_status_if_due(&mut self, now_ms: u32, sink: &mut impl EventSink) {
        if elapsed_ms(now_ms, self.last_status_at) < self.ctx.config.status_interval_ms {
            return;
        }
        self.last_status_at = now_ms;
        sink.emit(&AppEvent::Status(self.status()));
    }
}
