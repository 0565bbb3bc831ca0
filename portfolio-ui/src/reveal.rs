use std::cell::RefCell;
use std::rc::Rc;

use crate::context::AppContext;

/// Allowance for the ratio the browser reports right at the threshold.
const RATIO_EPSILON: f64 = 0.005;

/// DOM side of the reveal observer. Elements are addressed by registration
/// order.
pub trait RevealSurface {
    fn mark_revealed(&self, key: usize, animate: bool);
    fn unobserve(&self, key: usize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Watching,
    Revealed,
}

/// One-shot reveal of elements as they first scroll into view.
pub struct RevealObserver {
    threshold: f64,
    immediate: bool,
    states: RefCell<Vec<RevealState>>,
    surface: Rc<dyn RevealSurface>,
}

impl RevealObserver {
    /// Reduced motion, or a browser without intersection observers, reveals
    /// everything at registration time.
    pub fn new(ctx: &AppContext, surface: Rc<dyn RevealSurface>) -> Self {
        let env = ctx.env();
        Self {
            threshold: ctx.config().reveal.threshold,
            immediate: env.prefers_reduced_motion || !env.supports_intersection_observer,
            states: RefCell::new(Vec::new()),
            surface,
        }
    }

    /// Whether registered elements need a viewport watcher at all.
    pub fn needs_observation(&self) -> bool {
        !self.immediate
    }

    /// Register `count` more elements. Returns the key range assigned.
    pub fn register(&self, count: usize) -> std::ops::Range<usize> {
        let start = self.states.borrow().len();
        let end = start + count;
        for key in start..end {
            self.states.borrow_mut().push(RevealState::Watching);
            if self.immediate {
                self.reveal(key, false);
            }
        }
        start..end
    }

    /// Feed one intersection report. Returns true if it revealed the element.
    pub fn on_intersection(&self, key: usize, is_intersecting: bool, ratio: f64) -> bool {
        if !is_intersecting || ratio + RATIO_EPSILON < self.threshold {
            return false;
        }
        match self.state(key) {
            Some(RevealState::Watching) => {
                self.reveal(key, true);
                self.surface.unobserve(key);
                true
            }
            Some(RevealState::Revealed) | None => false,
        }
    }

    pub fn state(&self, key: usize) -> Option<RevealState> {
        self.states.borrow().get(key).copied()
    }

    pub fn revealed_count(&self) -> usize {
        self.states
            .borrow()
            .iter()
            .filter(|s| **s == RevealState::Revealed)
            .count()
    }

    fn reveal(&self, key: usize, animate: bool) {
        if let Some(state) = self.states.borrow_mut().get_mut(key) {
            *state = RevealState::Revealed;
        }
        self.surface.mark_revealed(key, animate);
    }
}
