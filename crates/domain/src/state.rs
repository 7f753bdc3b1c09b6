//! Automation state: the single mutable record driven by the step machine.

use std::time::{Duration, Instant};

use crate::step::Step;

/// Mutable progress record of one running automation.
///
/// Holds only plain values: no node handles are ever stored here, since
/// host trees are rebuilt between ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationState {
    /// Current step of the cycle.
    pub step: Step,
    /// Monotonic time of the last successful transition.
    pub last_step_time: Option<Instant>,
    /// Monotonic time a matching group was first seen in step 0;
    /// `None` until observed.
    pub group_detected_time: Option<Instant>,
    /// Delay before the next tick, as last chosen by the interval policy.
    pub poll_interval: Duration,
}

impl Default for AutomationState {
    fn default() -> Self {
        Self {
            step: Step::Detect,
            last_step_time: None,
            group_detected_time: None,
            poll_interval: Duration::ZERO,
        }
    }
}

impl AutomationState {
    /// Move to `step`, recording `now` as the transition time.
    pub fn advance_to(&mut self, step: Step, now: Instant) {
        self.step = step;
        self.last_step_time = Some(now);
    }

    /// Forget any pending group detection.
    pub fn clear_detection(&mut self) {
        self.group_detected_time = None;
    }
}
