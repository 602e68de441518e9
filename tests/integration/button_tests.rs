//! Integration tests for the on/off button → SortController path.
//!
//! Mirrors the firmware loop: sample the raw level, debounce it, map the
//! edge to a command and hand it to the controller.

use crate::mock_hw::{MockHardware, RecordingSink};

use heightsort::app::commands::SorterCommand;
use heightsort::app::events::AppEvent;
use heightsort::app::service::SortController;
use heightsort::config::SorterConfig;
use heightsort::drivers::button::ButtonDriver;
use heightsort::pins;

struct Rig {
    controller: SortController,
    button: ButtonDriver,
    hw: MockHardware,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        let config = SorterConfig::default();
        let button = ButtonDriver::new(pins::BUTTON_GPIO, config.button_debounce_ms);
        let mut controller = SortController::new(config).unwrap();
        let mut hw = MockHardware::new();
        let mut sink = RecordingSink::new();
        controller.start(0, &mut hw, &mut sink);
        Self { controller, button, hw, sink }
    }

    /// Hold the raw button level for `[from, to)` at 5 ms ticks.
    fn hold(&mut self, pressed: bool, from: u32, to: u32) {
        let mut now = from;
        while now < to {
            if let Some(cmd) = self
                .button
                .tick(now, pressed)
                .and_then(SorterCommand::from_button)
            {
                self.controller
                    .handle_command(cmd, now, &mut self.hw, &mut self.sink);
            }
            now += 5;
        }
    }

    fn toggles(&self) -> usize {
        self.sink
            .events
            .iter()
            .filter(|e| matches!(e, AppEvent::EnableChanged { .. }))
            .count()
    }
}

#[test]
fn powers_on_disabled() {
    let rig = Rig::new();
    assert!(!rig.controller.is_enabled());
    assert_eq!(rig.sink.events, vec![AppEvent::Started { enabled: false }]);
}

#[test]
fn clean_press_toggles_on_once() {
    let mut rig = Rig::new();
    rig.hold(true, 100, 400);
    rig.hold(false, 400, 600);
    assert!(rig.controller.is_enabled());
    assert_eq!(rig.toggles(), 1);
}

#[test]
fn glitch_shorter_than_debounce_is_ignored() {
    let mut rig = Rig::new();
    rig.hold(true, 100, 130);
    rig.hold(false, 130, 300);
    assert!(!rig.controller.is_enabled());
    assert_eq!(rig.toggles(), 0);
}

#[test]
fn bouncy_contact_counts_as_one_press() {
    let mut rig = Rig::new();
    // Contact chatter: level flips every tick for 40 ms, then settles low.
    for i in 0..8u32 {
        rig.hold(i % 2 == 0, 100 + i * 5, 105 + i * 5);
    }
    rig.hold(true, 140, 400);
    assert_eq!(rig.toggles(), 1);
    assert!(rig.controller.is_enabled());
}

#[test]
fn second_press_turns_sorter_off() {
    let mut rig = Rig::new();
    rig.hold(true, 0, 200);
    rig.hold(false, 200, 400);
    rig.hold(true, 400, 600);
    rig.hold(false, 600, 800);
    assert!(!rig.controller.is_enabled());
    assert_eq!(
        rig.sink.events.last(),
        Some(&AppEvent::EnableChanged { enabled: false })
    );
}
