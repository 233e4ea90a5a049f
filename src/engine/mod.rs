//! Countdown engine, repeat scheduler and the async controller driving them.
//!
//! - [`countdown`]: remaining-time arithmetic over monotonic instants
//! - [`schedule`]: what follows a cycle boundary
//! - [`TimerEngine`]: synchronous state machine, fed explicit instants
//! - [`TimerController`]: owns the engine and its single tick loop

pub mod countdown;
mod controller;
mod error;
pub mod schedule;
mod timer;

pub use controller::TimerController;
pub use countdown::{remaining_seconds, ClockAnchor, Countdown, TICK_INTERVAL};
pub use error::TimerError;
pub use schedule::{decide, CycleDecision};
pub use timer::{TickOutcome, TimerEngine, TimerEvent};
