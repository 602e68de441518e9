//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call and every sensor read so tests can assert
//! on the full history without touching real ADC/PWM registers.  Sensor
//! values come from whatever the test last set with [`MockHardware::set_beams`].

use heightsort::app::events::AppEvent;
use heightsort::app::ports::{ActuatorPort, EventSink, SensorPort};
use heightsort::events::SortEvent;
use heightsort::fsm::context::{SensorSnapshot, ServoCommand};

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub snapshot: SensorSnapshot,
    pub calls: Vec<ServoCommand>,
    pub reads: usize,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            snapshot: SensorSnapshot::default(),
            calls: Vec::new(),
            reads: 0,
        }
    }

    pub fn set_beams(&mut self, arrival: bool, height: bool) {
        self.snapshot = SensorSnapshot::from_beams(arrival, height);
    }

    pub fn last_call(&self) -> Option<ServoCommand> {
        self.calls.last().copied()
    }

    pub fn push_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == ServoCommand::Push).count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_all(&mut self) -> SensorSnapshot {
        self.reads += 1;
        self.snapshot
    }
}

impl ActuatorPort for MockHardware {
    fn set_position(&mut self, command: ServoCommand) {
        self.calls.push(command);
    }
}

// ── Recording event sink ──────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort events only, in emission order.
    pub fn sort_events(&self) -> Vec<SortEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Sort(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&SortEvent) -> bool) -> usize {
        self.sort_events().iter().filter(|e| pred(*e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
