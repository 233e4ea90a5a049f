//! Repeat scheduling: what happens when a cycle reaches zero.

use tracing::debug;

use crate::types::TimerConfig;

/// Outcome of a cycle boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDecision {
    /// Start another cycle with the per-cycle duration
    Continue {
        /// Zero-based index of the cycle about to start
        next_cycle: u32,
    },
    /// The run is over
    Finish,
}

impl CycleDecision {
    /// Returns true if the run ends at this boundary.
    pub fn is_finish(&self) -> bool {
        matches!(self, CycleDecision::Finish)
    }
}

/// Decides what follows the end of cycle `cycle_index`.
///
/// Another cycle starts only while repeating and fewer than `repeat_count`
/// cycles have run. A zero per-cycle duration always finishes the run so a
/// reconfigured timer cannot spin on empty cycles.
#[must_use]
pub fn decide(config: &TimerConfig, cycle_index: u32) -> CycleDecision {
    let next_cycle = cycle_index.saturating_add(1);
    let decision = if config.repeat_enabled
        && next_cycle < config.repeat_count.get()
        && config.duration_seconds > 0
    {
        CycleDecision::Continue { next_cycle }
    } else {
        CycleDecision::Finish
    };

    debug!("Cycle {} ended: {:?}", cycle_index, decision);
    decision
}
