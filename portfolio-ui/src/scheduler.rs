use std::cell::{Cell, RefCell};

/// Deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Timer seam for retry delays, cool-downs and settle checks.
///
/// The browser implementation is backed by `setTimeout`; tests drive a
/// [`ManualScheduler`] by hand.
pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Task);
}

struct Pending {
    due_ms: u64,
    seq: u64,
    task: Task,
}

/// Scheduler with a virtual clock that only moves when told to.
#[derive(Default)]
pub struct ManualScheduler {
    now_ms: Cell<u64>,
    next_seq: Cell<u64>,
    queue: RefCell<Vec<Pending>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Move the clock forward by `ms`, running every task that falls due in
    /// deadline order, including tasks scheduled by tasks run along the way.
    /// Returns how many tasks ran.
    pub fn advance(&self, ms: u32) -> usize {
        let target = self.now_ms.get() + u64::from(ms);
        let mut ran = 0;
        while let Some(pending) = self.pop_due(target) {
            self.now_ms.set(pending.due_ms.max(self.now_ms.get()));
            (pending.task)();
            ran += 1;
        }
        self.now_ms.set(target);
        ran
    }

    /// Run tasks until the queue is empty, jumping the clock to each deadline.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while let Some(pending) = self.pop_due(u64::MAX) {
            self.now_ms.set(pending.due_ms.max(self.now_ms.get()));
            (pending.task)();
            ran += 1;
        }
        ran
    }

    fn pop_due(&self, limit: u64) -> Option<Pending> {
        let mut queue = self.queue.borrow_mut();
        let position = queue
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= limit)
            .min_by_key(|(_, p)| (p.due_ms, p.seq))
            .map(|(i, _)| i)?;
        Some(queue.remove(position))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.queue.borrow_mut().push(Pending {
            due_ms: self.now_ms.get() + u64::from(delay_ms),
            seq,
            task,
        });
    }
}
