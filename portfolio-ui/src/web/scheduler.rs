use gloo_timers::callback::Timeout;

use crate::scheduler::{Scheduler, Task};

/// Runs tasks on `setTimeout`. Scheduled tasks cannot be cancelled; callers
/// hold weak references and re-check their own state when a task fires.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) {
        Timeout::new(delay_ms, task).forget();
    }
}
