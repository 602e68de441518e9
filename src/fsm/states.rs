//! Concrete state handler functions and table builder.
//!
//! Each state is defined by three plain `fn` pointers: no closures, no
//! dynamic dispatch, no heap.  All waits are deadline checks against
//! `ctx.now_ms`; no handler blocks.
//!
//! ```text
//!  IDLE ──[arrival blocked]──▶ SETTLING ──[settle_ms]──▶ TRAVELLING
//!    ▲                                                    │      │
//!    │                                   [travel_ms, Tall]│      │[travel_ms, Short]
//!    │                                                    ▼      │
//!    │                                                 PUSHING   │
//!    │                                                    │      │
//!    │                                           [dwell_ms]      │
//!    │                                                    ▼      ▼
//!    └──────────────[suppress_ms since classify]────── CLEARING
//! ```

use super::context::{FsmContext, ItemInProcess, ServoCommand};
use super::{StateDescriptor, StateId};
use crate::control::classifier::{classify, Classification};
use crate::events::SortEvent;
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: Settling
        StateDescriptor {
            id: StateId::Settling,
            name: "Settling",
            on_enter: Some(settling_enter),
            on_exit: None,
            on_update: settling_update,
        },
        // Index 2: Travelling
        StateDescriptor {
            id: StateId::Travelling,
            name: "Travelling",
            on_enter: Some(travelling_enter),
            on_exit: None,
            on_update: travelling_update,
        },
        // Index 3: Pushing
        StateDescriptor {
            id: StateId::Pushing,
            name: "Pushing",
            on_enter: Some(pushing_enter),
            on_exit: Some(pushing_exit),
            on_update: pushing_update,
        },
        // Index 4: Clearing
        StateDescriptor {
            id: StateId::Clearing,
            name: "Clearing",
            on_enter: None,
            on_exit: None,
            on_update: clearing_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state: waiting for an arrival
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut FsmContext) {
    // Entered on re-arm and on abort; either way the slot is released.
    ctx.item = None;
    debug!("IDLE: armed");
}

fn idle_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.enabled && ctx.sensors.arrival_blocked {
        return Some(StateId::Settling);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  SETTLING state: arrival seen, height not yet trusted
// ═══════════════════════════════════════════════════════════════════════════

fn settling_enter(ctx: &mut FsmContext) {
    ctx.arrived_at = ctx.now_ms;
    ctx.stats.detected = ctx.stats.detected.wrapping_add(1);
    ctx.emit(SortEvent::ItemDetected { at_ms: ctx.now_ms });
    info!(
        "SETTLING: item entered (arrival={}), waiting {}ms",
        ctx.sensors.arrival_raw, ctx.config.settle_ms
    );
}

fn settling_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.elapsed_since(ctx.arrived_at) >= ctx.config.settle_ms {
        return Some(StateId::Travelling);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  TRAVELLING state: classified, belt carrying it to the actuator
// ═══════════════════════════════════════════════════════════════════════════

fn travelling_enter(ctx: &mut FsmContext) {
    let classification = classify(ctx.sensors.arrival_blocked, ctx.sensors.height_blocked);
    ctx.item = Some(ItemInProcess {
        classification,
        detected_at: ctx.now_ms,
    });

    match classification {
        Classification::Tall => ctx.stats.tall = ctx.stats.tall.wrapping_add(1),
        Classification::Short => ctx.stats.short = ctx.stats.short.wrapping_add(1),
    }
    ctx.stats.last = Some(classification);

    ctx.emit(SortEvent::Classified {
        classification,
        at_ms: ctx.now_ms,
    });
    info!(
        "TRAVELLING: {:?} (height={}), actuator in {}ms",
        classification, ctx.sensors.height_raw, ctx.config.travel_ms
    );
}

fn travelling_update(ctx: &mut FsmContext) -> Option<StateId> {
    let item = ctx.item?;
    if ctx.elapsed_since(item.detected_at) < ctx.config.travel_ms {
        return None;
    }

    if item.classification.is_reject() {
        Some(StateId::Pushing)
    } else {
        ctx.emit(SortEvent::Passed { at_ms: ctx.now_ms });
        Some(StateId::Clearing)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  PUSHING state: servo extended for the dwell
// ═══════════════════════════════════════════════════════════════════════════

fn pushing_enter(ctx: &mut FsmContext) {
    ctx.pushed_at = ctx.now_ms;
    ctx.command = Some(ServoCommand::Push);
    ctx.stats.pushes = ctx.stats.pushes.wrapping_add(1);
    ctx.emit(SortEvent::ActuatorFired { at_ms: ctx.now_ms });
    info!("PUSHING: servo out for {}ms", ctx.config.dwell_ms);
}

fn pushing_exit(ctx: &mut FsmContext) {
    // Runs on abort too: the servo must never be left extended.
    ctx.command = Some(ServoCommand::Idle);
    ctx.emit(SortEvent::ActuatorRetracted { at_ms: ctx.now_ms });
}

fn pushing_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.elapsed_since(ctx.pushed_at) >= ctx.config.dwell_ms {
        return Some(StateId::Clearing);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  CLEARING state: remainder of the suppression window
// ═══════════════════════════════════════════════════════════════════════════

fn clearing_update(ctx: &mut FsmContext) -> Option<StateId> {
    let item = ctx.item?;
    if ctx.elapsed_since(item.detected_at) < ctx.config.suppress_ms {
        return None;
    }
    ctx.emit(SortEvent::CycleDone { at_ms: ctx.now_ms });
    info!("CLEARING: suppression lapsed, re-arming");
    Some(StateId::Idle)
}
