//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to.  It contains the latest sensor snapshot, the tick timestamp,
//! the item-in-flight slot, the servo command output and the events
//! produced during the current tick.  Think of it as the "blackboard" in
//! a blackboard architecture.

use heapless::Vec;
use log::warn;
use serde::Serialize;

use crate::config::SorterConfig;
use crate::control::classifier::Classification;
use crate::events::SortEvent;

/// Upper bound on events produced by one tick.  A zero-wait chain from
/// `Idle` through a short item to `Idle` emits five.
pub const MAX_EVENTS_PER_TICK: usize = 8;

// ---------------------------------------------------------------------------
// Sensor snapshot (read-only to state handlers; written by sensor hub)
// ---------------------------------------------------------------------------

/// A point-in-time snapshot of both beam sensors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorSnapshot {
    /// Arrival beam interrupted.
    pub arrival_blocked: bool,
    /// Height beam interrupted.
    pub height_blocked: bool,
    /// Averaged raw arrival reading.
    pub arrival_raw: u16,
    /// Averaged raw height reading.
    pub height_raw: u16,
}

impl SensorSnapshot {
    /// Snapshot with only the blocked flags set; raw values are zero.
    pub fn from_beams(arrival_blocked: bool, height_blocked: bool) -> Self {
        Self {
            arrival_blocked,
            height_blocked,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator command (written by state handlers; consumed by the controller)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServoCommand {
    /// Move to the push angle.
    Push,
    /// Return to the rest angle.
    Idle,
}

// ---------------------------------------------------------------------------
// Item in flight
// ---------------------------------------------------------------------------

/// The one item currently between classification and re-arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemInProcess {
    pub classification: Classification,
    /// Timestamp of the tick on which the item was classified.  Travel and
    /// suppression are measured from here.
    pub detected_at: u32,
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SortStats {
    pub detected: u32,
    pub tall: u32,
    pub short: u32,
    pub pushes: u32,
    pub aborted: u32,
    /// Most recent classification.
    pub last: Option<Classification>,
}

/// Milliseconds from `since` to `now` on a wrapping `u32` clock.
#[inline]
pub fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Timestamp of the tick being processed.
    pub now_ms: u32,

    // -- Inputs --
    /// Latest sensor readings.  Updated before each FSM tick.
    pub sensors: SensorSnapshot,
    /// Sorter enable flag.  Idle ignores arrivals while false.
    pub enabled: bool,

    // -- Configuration --
    pub config: SorterConfig,

    // -- Cycle data --
    /// When the current arrival was first seen.
    pub arrived_at: u32,
    /// Present from classification until the suppression window lapses.
    pub item: Option<ItemInProcess>,
    /// When the servo was last commanded to push.
    pub pushed_at: u32,

    // -- Outputs --
    /// Servo command requested during this tick, if any.
    pub command: Option<ServoCommand>,
    /// Events produced during this tick, in transition order.
    pub events: Vec<SortEvent, MAX_EVENTS_PER_TICK>,
    pub stats: SortStats,
}

impl FsmContext {
    pub fn new(config: SorterConfig) -> Self {
        Self {
            now_ms: 0,
            sensors: SensorSnapshot::default(),
            enabled: config.start_enabled,
            config,
            arrived_at: 0,
            item: None,
            pushed_at: 0,
            command: None,
            events: Vec::new(),
            stats: SortStats::default(),
        }
    }

    /// Load the inputs for a new tick and clear last tick's outputs.
    pub fn begin_tick(&mut self, now_ms: u32, sensors: SensorSnapshot) {
        self.now_ms = now_ms;
        self.sensors = sensors;
        self.command = None;
        self.events.clear();
    }

    /// Queue an event for this tick.
    pub fn emit(&mut self, event: SortEvent) {
        if self.events.push(event).is_err() {
            warn!("event buffer full, dropping {:?}", event);
        }
    }

    /// Milliseconds since `since`, relative to the current tick.
    pub fn elapsed_since(&self, since: u32) -> u32 {
        elapsed_ms(self.now_ms, since)
    }
}
