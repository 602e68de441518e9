//! Fuzz target: `SortController::step` / `set_enabled`
//!
//! Decodes the input as a stream of 3-byte operations and drives the
//! controller with them, asserting:
//! - No panics under any byte sequence
//! - An item exists exactly while the controller awaits actuation
//! - The servo is never commanded to push twice without an idle between
//!
//! cargo fuzz run fuzz_sort_controller

#![no_main]

use heightsort::app::service::SortController;
use heightsort::config::SorterConfig;
use heightsort::fsm::context::{SensorSnapshot, ServoCommand};
use heightsort::fsm::ControllerState;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let config = SorterConfig { start_enabled: true, ..SorterConfig::default() };
    let Ok(mut controller) = SortController::new(config) else {
        return;
    };

    let mut now: u32 = 0;
    let mut extended = false;

    for op in data.chunks_exact(3) {
        // Byte 0: flags (bit0 arrival, bit1 height, bit7 toggle enable).
        // Bytes 1-2: milliseconds to advance.
        let flags = op[0];
        let dt = u16::from_le_bytes([op[1], op[2]]) as u32;
        now = now.wrapping_add(dt);

        let out = if flags & 0x80 != 0 {
            let enabled = !controller.is_enabled();
            controller.set_enabled(enabled, now)
        } else {
            let snap = SensorSnapshot::from_beams(flags & 0x01 != 0, flags & 0x02 != 0);
            controller.step(snap, now)
        };

        match out.command {
            Some(ServoCommand::Push) => {
                assert!(!extended, "push while extended");
                extended = true;
            }
            Some(ServoCommand::Idle) => extended = false,
            None => {}
        }

        assert_eq!(
            controller.item().is_some(),
            controller.state() == ControllerState::AwaitingActuation
        );
    }
});
