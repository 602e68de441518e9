//! Integration tests for the SortController → FSM → servo pipeline.
//!
//! These run on the host and drive the controller through its port API
//! with a recording mock, stepping a virtual millisecond clock the way the
//! firmware loop does.

use crate::mock_hw::{MockHardware, RecordingSink};

use heightsort::app::commands::SorterCommand;
use heightsort::app::events::AppEvent;
use heightsort::app::service::SortController;
use heightsort::config::SorterConfig;
use heightsort::control::classifier::Classification;
use heightsort::events::SortEvent;
use heightsort::fsm::context::ServoCommand;
use heightsort::fsm::ControllerState;

const LOOP_MS: u32 = 5;

fn make_controller(config: SorterConfig) -> (SortController, MockHardware, RecordingSink) {
    let config = SorterConfig { start_enabled: true, ..config };
    let mut controller = SortController::new(config).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    controller.start(0, &mut hw, &mut sink);
    (controller, hw, sink)
}

/// Tick every `LOOP_MS` from `from` (inclusive) up to `to` (exclusive).
fn run(
    controller: &mut SortController,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
    from: u32,
    to: u32,
) {
    let mut now = from;
    while now < to {
        controller.tick(now, hw, sink);
        now = now.wrapping_add(LOOP_MS);
    }
}

// ── Power-on ──────────────────────────────────────────────────

#[test]
fn start_rests_servo_and_reports_ready() {
    let (controller, hw, sink) = make_controller(SorterConfig::default());
    assert_eq!(hw.calls, vec![ServoCommand::Idle]);
    assert_eq!(sink.events, vec![AppEvent::Started { enabled: true }]);
    assert_eq!(controller.state(), ControllerState::Idle);
}

// ── End-to-end: tall item ─────────────────────────────────────

#[test]
fn tall_item_pushed_after_travel_then_released() {
    let travel = 400;
    let (mut c, mut hw, mut sink) =
        make_controller(SorterConfig { travel_ms: travel, ..SorterConfig::default() });

    hw.set_beams(true, false);
    c.tick(0, &mut hw, &mut sink);
    assert_eq!(c.state(), ControllerState::Settling);

    hw.set_beams(true, true);
    run(&mut c, &mut hw, &mut sink, LOOP_MS, 100);
    assert_eq!(c.state(), ControllerState::Settling);
    c.tick(100, &mut hw, &mut sink);
    assert_eq!(c.state(), ControllerState::AwaitingActuation);
    assert_eq!(
        c.item().map(|i| (i.classification, i.detected_at)),
        Some((Classification::Tall, 100))
    );

    // Nothing moves until 100 + travel.
    hw.set_beams(false, false);
    run(&mut c, &mut hw, &mut sink, 105, 100 + travel);
    assert_eq!(hw.push_count(), 0);
    c.tick(100 + travel, &mut hw, &mut sink);
    assert_eq!(hw.last_call(), Some(ServoCommand::Push));

    // Released once after the dwell.
    run(&mut c, &mut hw, &mut sink, 505, 700);
    assert_eq!(hw.last_call(), Some(ServoCommand::Push));
    c.tick(700, &mut hw, &mut sink);
    assert_eq!(hw.last_call(), Some(ServoCommand::Idle));
    assert_eq!(hw.calls, vec![ServoCommand::Idle, ServoCommand::Push, ServoCommand::Idle]);

    // Idle again once the suppression window from classification lapses.
    run(&mut c, &mut hw, &mut sink, 705, 1100);
    assert_eq!(c.state(), ControllerState::AwaitingActuation);
    c.tick(1100, &mut hw, &mut sink);
    assert_eq!(c.state(), ControllerState::Idle);
    assert!(c.item().is_none());

    assert_eq!(
        sink.sort_events(),
        vec![
            SortEvent::ItemDetected { at_ms: 0 },
            SortEvent::Classified { classification: Classification::Tall, at_ms: 100 },
            SortEvent::ActuatorFired { at_ms: 500 },
            SortEvent::ActuatorRetracted { at_ms: 700 },
            SortEvent::CycleDone { at_ms: 1100 },
        ]
    );
}

// ── End-to-end: short item ────────────────────────────────────

#[test]
fn short_item_never_commands_actuator() {
    let (mut c, mut hw, mut sink) =
        make_controller(SorterConfig { travel_ms: 250, ..SorterConfig::default() });

    hw.set_beams(true, false);
    run(&mut c, &mut hw, &mut sink, 0, 1105);

    assert_eq!(hw.calls, vec![ServoCommand::Idle]);
    let events = sink.sort_events();
    assert_eq!(events[1], SortEvent::Classified { classification: Classification::Short, at_ms: 100 });
    assert_eq!(events[2], SortEvent::Passed { at_ms: 350 });
    assert_eq!(events[3], SortEvent::CycleDone { at_ms: 1100 });
    assert_eq!(c.stats().short, 1);
    assert_eq!(c.stats().pushes, 0);
}

// ── Zero travel delay ─────────────────────────────────────────

#[test]
fn zero_travel_pushes_on_classification_tick() {
    let (mut c, mut hw, mut sink) = make_controller(SorterConfig::default());

    hw.set_beams(true, true);
    run(&mut c, &mut hw, &mut sink, 0, 100);
    assert_eq!(hw.push_count(), 0);

    c.tick(100, &mut hw, &mut sink);
    assert_eq!(hw.last_call(), Some(ServoCommand::Push));
    let events = sink.sort_events();
    assert_eq!(
        &events[1..],
        &[
            SortEvent::Classified { classification: Classification::Tall, at_ms: 100 },
            SortEvent::ActuatorFired { at_ms: 100 },
        ]
    );
}

// ── Re-trigger suppression ────────────────────────────────────

#[test]
fn second_arrival_during_cycle_is_ignored() {
    let (mut c, mut hw, mut sink) = make_controller(SorterConfig::default());

    hw.set_beams(true, true);
    c.tick(0, &mut hw, &mut sink);

    // Beam flickers while the first item is in flight.
    for (i, now) in (LOOP_MS..1100).step_by(LOOP_MS as usize).enumerate() {
        hw.set_beams(i % 2 == 0, true);
        c.tick(now, &mut hw, &mut sink);
    }
    assert_eq!(sink.count(|e| matches!(e, SortEvent::ItemDetected { .. })), 1);
    assert_eq!(hw.push_count(), 1);
}

#[test]
fn stuck_blocked_arrival_retriggers_after_suppression() {
    let (mut c, mut hw, mut sink) = make_controller(SorterConfig::default());

    hw.set_beams(true, false);
    run(&mut c, &mut hw, &mut sink, 0, 1105);

    // CycleDone at 1100 re-arms; the still-blocked beam starts a new cycle
    // on the next tick, not the same one.
    assert_eq!(
        sink.sort_events().last(),
        Some(&SortEvent::CycleDone { at_ms: 1100 })
    );
    assert_eq!(sink.count(|e| matches!(e, SortEvent::ItemDetected { .. })), 1);
    c.tick(1105, &mut hw, &mut sink);
    assert_eq!(c.state(), ControllerState::Settling);
    assert_eq!(
        sink.sort_events().last(),
        Some(&SortEvent::ItemDetected { at_ms: 1105 })
    );
}

#[test]
fn stuck_unblocked_arrival_never_leaves_idle() {
    let (mut c, mut hw, mut sink) = make_controller(SorterConfig::default());

    hw.set_beams(false, true);
    run(&mut c, &mut hw, &mut sink, 0, 5000);
    assert_eq!(c.state(), ControllerState::Idle);
    assert!(sink.sort_events().is_empty());
    assert_eq!(hw.calls, vec![ServoCommand::Idle]);
}

// ── Enable / disable ──────────────────────────────────────────

#[test]
fn disable_mid_cycle_aborts_and_commands_idle() {
    let (mut c, mut hw, mut sink) = make_controller(SorterConfig::default());

    hw.set_beams(true, true);
    run(&mut c, &mut hw, &mut sink, 0, 105);
    assert_eq!(hw.last_call(), Some(ServoCommand::Push));

    c.handle_command(SorterCommand::Toggle, 150, &mut hw, &mut sink);
    assert!(!c.is_enabled());
    assert_eq!(c.state(), ControllerState::Idle);
    assert!(c.item().is_none());
    assert_eq!(hw.last_call(), Some(ServoCommand::Idle));
    assert_eq!(
        &sink.events[sink.events.len() - 3..],
        &[
            AppEvent::Sort(SortEvent::ActuatorRetracted { at_ms: 150 }),
            AppEvent::Sort(SortEvent::CycleAborted { at_ms: 150 }),
            AppEvent::EnableChanged { enabled: false },
        ]
    );
    assert_eq!(c.stats().aborted, 1);
}

#[test]
fn disabled_controller_ignores_sensors_and_heartbeats() {
    let (mut c, mut hw, mut sink) = make_controller(SorterConfig::default());
    c.handle_command(SorterCommand::Disable, 0, &mut hw, &mut sink);
    sink.clear();
    let reads_before = hw.reads;

    hw.set_beams(true, true);
    run(&mut c, &mut hw, &mut sink, 5, 3005);

    assert_eq!(hw.reads, reads_before);
    assert!(sink.sort_events().is_empty());
    let heartbeats: Vec<_> = sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::Status(s) if !s.enabled))
        .collect();
    assert_eq!(heartbeats.len(), 3);
}

#[test]
fn reenable_resumes_sorting() {
    let (mut c, mut hw, mut sink) = make_controller(SorterConfig::default());
    c.handle_command(SorterCommand::Disable, 0, &mut hw, &mut sink);
    c.handle_command(SorterCommand::Toggle, 500, &mut hw, &mut sink);
    assert!(c.is_enabled());
    assert_eq!(sink.events.last(), Some(&AppEvent::EnableChanged { enabled: true }));

    hw.set_beams(true, false);
    c.tick(505, &mut hw, &mut sink);
    assert_eq!(c.state(), ControllerState::Settling);
}

#[test]
fn redundant_commands_emit_nothing() {
    let (mut c, mut hw, mut sink) = make_controller(SorterConfig::default());
    sink.clear();
    c.handle_command(SorterCommand::Enable, 10, &mut hw, &mut sink);
    assert!(sink.events.is_empty());
    assert_eq!(hw.calls.len(), 1);
}

// ── Clock wraparound ──────────────────────────────────────────

#[test]
fn full_cycle_across_timer_wrap() {
    let (mut c, mut hw, mut sink) =
        make_controller(SorterConfig { travel_ms: 300, ..SorterConfig::default() });
    let t0 = u32::MAX - 150;

    hw.set_beams(true, true);
    c.tick(t0, &mut hw, &mut sink);
    c.tick(t0.wrapping_add(100), &mut hw, &mut sink);
    assert_eq!(c.item().map(|i| i.detected_at), Some(t0.wrapping_add(100)));

    c.tick(t0.wrapping_add(399), &mut hw, &mut sink);
    assert_eq!(hw.push_count(), 0);
    c.tick(t0.wrapping_add(400), &mut hw, &mut sink);
    assert_eq!(hw.last_call(), Some(ServoCommand::Push));
    c.tick(t0.wrapping_add(600), &mut hw, &mut sink);
    assert_eq!(hw.last_call(), Some(ServoCommand::Idle));
    c.tick(t0.wrapping_add(1100), &mut hw, &mut sink);
    assert_eq!(c.state(), ControllerState::Idle);
}
