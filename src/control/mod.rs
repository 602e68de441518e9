//! Decision logic shared by the sort state machine.

pub mod classifier;
