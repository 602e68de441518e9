//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one line per application event to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! Status heartbeats are logged as JSON for easy scraping.

use log::{info, warn};

use crate::app::events::{AppEvent, StatusData};
use crate::app::ports::EventSink;
use crate::events::SortEvent;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        let line = format_event(event);
        match event {
            AppEvent::Sort(SortEvent::CycleAborted { .. }) => warn!("{}", line),
            _ => info!("{}", line),
        }
    }
}

/// Render one event as a single console line.
pub fn format_event(event: &AppEvent) -> String {
    match event {
        AppEvent::Started { enabled } => {
            format!("START | SYSTEM READY | sorter {}", on_off(*enabled))
        }
        AppEvent::EnableChanged { enabled } => format!("ENABLE | SYSTEM {}", on_off(*enabled)),
        AppEvent::Sort(e) => format_sort_event(e),
        AppEvent::Status(s) => format_status(s),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "ON" } else { "OFF" }
}

fn format_sort_event(event: &SortEvent) -> String {
    let tag = event.tag();
    match event {
        SortEvent::ItemDetected { at_ms } => format!("{tag} | item entered @{at_ms}ms"),
        SortEvent::Classified { classification, at_ms } => {
            format!("{tag} | {classification:?} @{at_ms}ms")
        }
        SortEvent::ActuatorFired { at_ms } => format!("{tag} | tall item pushed @{at_ms}ms"),
        SortEvent::Passed { at_ms } => format!("{tag} | short item passed @{at_ms}ms"),
        SortEvent::ActuatorRetracted { at_ms } => {
            format!("{tag} | actuator back to rest @{at_ms}ms")
        }
        SortEvent::CycleDone { at_ms } => format!("{tag} | ready for next item @{at_ms}ms"),
        SortEvent::CycleAborted { at_ms } => {
            format!("{tag} | cycle dropped on disable @{at_ms}ms")
        }
    }
}

fn format_status(status: &StatusData) -> String {
    match serde_json::to_string(status) {
        Ok(json) => format!("STATUS | {json}"),
        Err(e) => format!("STATUS | serialize failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::classifier::Classification;
    use crate::fsm::context::SortStats;
    use crate::fsm::ControllerState;

    #[test]
    fn status_serializes_to_json() {
        let status = StatusData {
            enabled: false,
            state: ControllerState::Idle,
            stats: SortStats {
                detected: 3,
                tall: 1,
                short: 2,
                pushes: 1,
                aborted: 0,
                last: Some(Classification::Short),
            },
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.starts_with(r#"{"enabled":false,"state":"Idle""#));
        assert!(json.contains(r#""last":"Short""#));
    }

    #[test]
    fn lifecycle_lines_show_enable_state() {
        assert_eq!(
            format_event(&AppEvent::Started { enabled: true }),
            "START | SYSTEM READY | sorter ON"
        );
        assert_eq!(
            format_event(&AppEvent::EnableChanged { enabled: false }),
            "ENABLE | SYSTEM OFF"
        );
    }

    #[test]
    fn sort_lines_are_tagged_and_timestamped() {
        let line = format_event(&AppEvent::Sort(SortEvent::Classified {
            classification: Classification::Tall,
            at_ms: 1100,
        }));
        assert_eq!(line, "CLASS | Tall @1100ms");

        let line = format_event(&AppEvent::Sort(SortEvent::CycleAborted { at_ms: 5 }));
        assert_eq!(line, "ABORT | cycle dropped on disable @5ms");
    }

    #[test]
    fn status_line_embeds_json() {
        let status = StatusData {
            enabled: true,
            state: ControllerState::Settling,
            stats: SortStats::default(),
        };
        let line = format_event(&AppEvent::Status(status));
        assert!(line.starts_with(r#"STATUS | {"enabled":true,"state":"Settling""#), "{line}");
    }
}
