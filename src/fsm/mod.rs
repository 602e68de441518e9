//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  StateTable                                                 │
//! │  ┌────────────┬───────────┬──────────┬───────────────────┐  │
//! │  │ StateId    │ on_enter  │ on_exit  │ on_update         │  │
//! │  ├────────────┼───────────┼──────────┼───────────────────┤  │
//! │  │ Idle       │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  │ Settling   │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  │ Travelling │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  │ Pushing    │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │  │
//! │  │ Clearing   │ -         │ -        │ fn(ctx)->Option<> │  │
//! │  └────────────┴───────────┴──────────┴───────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next, and updates the
//! current pointer.  Waits of zero length are resolved on the same tick:
//! the engine keeps updating the new state until one stays put or the
//! machine is back in `Idle`.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;
use serde::Serialize;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all possible controller states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    Settling = 1,
    Travelling = 2,
    Pushing = 3,
    Clearing = 4,
}

impl StateId {
    /// Total number of states: used to size the table array.
    pub const COUNT: usize = 5;

    /// Convert a `u8` index back to `StateId`.  Panics on out-of-range in
    /// debug builds; returns `Idle` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Settling,
            2 => Self::Travelling,
            3 => Self::Pushing,
            4 => Self::Clearing,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }

    /// Coarse controller state this fine-grained state belongs to.
    pub fn controller_state(self) -> ControllerState {
        match self {
            Self::Idle => ControllerState::Idle,
            Self::Settling => ControllerState::Settling,
            Self::Travelling | Self::Pushing | Self::Clearing => {
                ControllerState::AwaitingActuation
            }
        }
    }
}

/// Externally visible controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ControllerState {
    /// Waiting for an arrival.
    Idle,
    /// Arrival seen; waiting out the settle delay before reading height.
    Settling,
    /// An item is classified and in flight; covers travel, dwell and
    /// re-trigger suppression.
    AwaitingActuation,
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array: no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table and the index of the active state.  The mutable
/// [`FsmContext`] is threaded through every handler call by the owner.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.id as usize == i),
            "state table out of order"
        );
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// 1. Call `on_update` for the current state.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    /// 3. Repeat from 1 for the new state, unless it is `Idle`.
    ///
    /// At most [`StateId::COUNT`] transitions run per tick.
    pub fn tick(&mut self, ctx: &mut FsmContext) {
        for _ in 0..StateId::COUNT {
            let Some(next_id) = (self.table[self.current].on_update)(ctx) else {
                break;
            };
            self.transition(next_id, ctx);
            if next_id == StateId::Idle {
                break;
            }
        }
    }

    /// Force an immediate transition regardless of what `on_update` would
    /// return.  Used to abort a cycle when the sorter is disabled.
    pub fn force_transition(&mut self, next: StateId, ctx: &mut FsmContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    /// Human-readable name of the current state.
    pub fn current_name(&self) -> &'static str {
        self.table[self.current].name
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {} @{}ms",
            self.table[self.current].name, self.table[next_idx].name, ctx.now_ms
        );

        // Exit current state
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        // Enter new state
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
