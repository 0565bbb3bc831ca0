//! Bounded wait for the external slider library.
//!
//! The widget script loads independently of this module, so the adapter
//! checks for it a fixed number of times, a fixed delay apart. The loader only
//! decides what happens next; the caller owns the timer.

use crate::config::CarouselConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    /// `attempts` checks have failed so far
    Waiting { attempts: u32 },
    Ready,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderStep {
    /// Construct the widget now.
    Ready,
    /// Probe again after this many milliseconds.
    RetryAfter(u32),
    /// Budget exhausted; switch to the manual slide-show.
    Fallback,
    /// Already settled; nothing to do.
    Finished,
}

#[derive(Debug, Clone)]
pub struct WidgetLoader {
    state: LoaderState,
    max_attempts: u32,
    retry_delay_ms: u32,
}

impl WidgetLoader {
    /// `max_attempts` is clamped to at least one check.
    pub fn new(max_attempts: u32, retry_delay_ms: u32) -> Self {
        Self {
            state: LoaderState::Waiting { attempts: 0 },
            max_attempts: max_attempts.max(1),
            retry_delay_ms,
        }
    }

    pub fn from_config(config: &CarouselConfig) -> Self {
        Self::new(config.max_attempts, config.retry_delay_ms)
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self.state, LoaderState::Waiting { .. })
    }

    /// Record the outcome of one availability check.
    pub fn poll(&mut self, available: bool) -> LoaderStep {
        let LoaderState::Waiting { attempts } = self.state else {
            return LoaderStep::Finished;
        };

        let attempts = attempts + 1;
        if available {
            self.state = LoaderState::Ready;
            LoaderStep::Ready
        } else if attempts >= self.max_attempts {
            self.state = LoaderState::Fallback;
            LoaderStep::Fallback
        } else {
            self.state = LoaderState::Waiting { attempts };
            LoaderStep::RetryAfter(self.retry_delay_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_on_first_success() {
        let mut loader = WidgetLoader::new(10, 500);
        assert_eq!(loader.poll(false), LoaderStep::RetryAfter(500));
        assert_eq!(loader.poll(true), LoaderStep::Ready);
        assert_eq!(loader.state(), LoaderState::Ready);
        assert_eq!(loader.poll(true), LoaderStep::Finished);
    }

    #[test]
    fn test_fallback_after_exactly_max_attempts() {
        for max in 1..=12 {
            let mut loader = WidgetLoader::new(max, 200);
            let mut checks = 0;
            let mut fallbacks = 0;
            loop {
                checks += 1;
                match loader.poll(false) {
                    LoaderStep::RetryAfter(200) => continue,
                    LoaderStep::Fallback => {
                        fallbacks += 1;
                        break;
                    }
                    other => panic!("unexpected step {other:?}"),
                }
            }
            assert_eq!(checks, max);
            assert_eq!(fallbacks, 1);
            assert_eq!(loader.poll(false), LoaderStep::Finished);
            assert_eq!(loader.poll(true), LoaderStep::Finished);
        }
    }

    #[test]
    fn test_zero_attempts_still_checks_once() {
        let mut loader = WidgetLoader::new(0, 500);
        assert_eq!(loader.max_attempts(), 1);
        assert_eq!(loader.poll(false), LoaderStep::Fallback);
        assert!(loader.is_settled());
    }
}
