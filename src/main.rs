//! HeightSort Firmware: Main Entry Point
//!
//! Hexagonal architecture with a fixed-rate polling loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  HardwareAdapter        LogEventSink      Esp32TimeAdapter   │
//! │  (Sensor+Actuator)      (EventSink)       (ms clock)         │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ─────────────────       │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │           SortController (pure logic)                  │  │
//! │  │  FSM · enable flag · stats                             │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  ButtonDriver (debounced on/off toggle)                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::hal::delay::{Ets, FreeRtos};
use log::{error, info};

use heightsort::adapters::hardware::HardwareAdapter;
use heightsort::adapters::log_sink::LogEventSink;
use heightsort::adapters::time::Esp32TimeAdapter;
use heightsort::app::commands::SorterCommand;
use heightsort::app::service::SortController;
use heightsort::config::SorterConfig;
use heightsort::drivers::button::ButtonDriver;
use heightsort::drivers::hw_init;
use heightsort::drivers::servo::ServoDriver;
use heightsort::error::Error;
use heightsort::pins;
use heightsort::sensors::SensorHub;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  HeightSort v{}                   ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SorterConfig::default();
    config.validate().map_err(Error::from)?;
    info!(
        "Config: settle={}ms travel={}ms dwell={}ms suppress={}ms push={}deg",
        config.settle_ms, config.travel_ms, config.dwell_ms, config.suppress_ms,
        config.push_angle_deg
    );

    // ── 3. Initialise hardware peripherals ───────────────────
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {}", e);
        return Err(Error::from(e).into());
    }

    // ── 4. Construct adapters ─────────────────────────────────
    let time = Esp32TimeAdapter::new();
    let servo = ServoDriver::new(config.push_angle_deg, config.idle_angle_deg)
        .map_err(Error::from)?;
    let mut hw = HardwareAdapter::new(SensorHub::from_config(&config), Ets, servo);
    let mut sink = LogEventSink::new();
    let mut button = ButtonDriver::new(pins::BUTTON_GPIO, config.button_debounce_ms);
    info!("Enable button on GPIO{}", button.gpio());

    // ── 5. Application core ───────────────────────────────────
    let mut controller = SortController::new(config).map_err(Error::from)?;
    let loop_ms = controller.config().control_loop_interval_ms;
    controller.start(time.uptime_ms(), &mut hw, &mut sink);

    info!("System ready. Entering control loop ({}ms).", loop_ms);

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        let now = time.uptime_ms();

        let raw_pressed = button.is_pressed_hw();
        if let Some(cmd) = button
            .tick(now, raw_pressed)
            .and_then(SorterCommand::from_button)
        {
            controller.handle_command(cmd, now, &mut hw, &mut sink);
        }

        controller.tick(now, &mut hw, &mut sink);

        FreeRtos::delay_ms(loop_ms);
    }
}
