//! Two-sensor height classifier.
//!
//! The height sensor sits above the arrival sensor.  Once an item has
//! settled in the detection zone, a blocked height beam means the item
//! reaches that height and must be rejected.

use serde::Serialize;

/// Sorting decision for one item.  Computed once, never revised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Classification {
    /// Reaches the height sensor: deflect off the line.
    Tall,
    /// Passes under the height sensor: leave on the line.
    Short,
}

impl Classification {
    /// Whether this item gets pushed by the actuator.
    pub fn is_reject(self) -> bool {
        matches!(self, Self::Tall)
    }
}

/// Classify an item from the two beam states read at settle time.
///
/// Only the height beam decides.  `start_blocked` is accepted so callers
/// pass the full simultaneous reading; an item that has already cleared the
/// arrival beam is still classified by height alone.
pub fn classify(start_blocked: bool, height_blocked: bool) -> Classification {
    let _ = start_blocked;
    if height_blocked {
        Classification::Tall
    } else {
        Classification::Short
    }
}
