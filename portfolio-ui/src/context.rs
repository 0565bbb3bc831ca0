use std::rc::Rc;

use crate::config::PortfolioConfig;
use crate::events::{EventBus, PageEvent};

/// Browser capability and preference signals sampled at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    /// `(prefers-color-scheme: dark)`
    pub prefers_dark: bool,
    /// `(prefers-reduced-motion: reduce)`
    pub prefers_reduced_motion: bool,
    pub supports_intersection_observer: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            prefers_dark: false,
            prefers_reduced_motion: false,
            supports_intersection_observer: true,
        }
    }
}

/// Shared application context, built once at startup and handed to every
/// component that needs configuration, environment signals or the bus.
#[derive(Clone)]
pub struct AppContext {
    config: Rc<PortfolioConfig>,
    env: Environment,
    bus: EventBus,
}

impl AppContext {
    pub fn new(config: PortfolioConfig, env: Environment) -> Self {
        Self {
            config: Rc::new(config),
            env,
            bus: EventBus::new(),
        }
    }

    pub fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    pub fn env(&self) -> Environment {
        self.env
    }

    pub fn reduced_motion(&self) -> bool {
        self.env.prefers_reduced_motion
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn emit(&self, event: PageEvent) {
        self.bus.publish(event);
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(PortfolioConfig::default(), Environment::default())
    }
}
