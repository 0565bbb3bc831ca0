//! Page event bus - typed publish/subscribe on the UI thread
//!
//! Components publish [`PageEvent`]s instead of calling each other. Handlers
//! subscribe by topic name (`"themeChanged"`) or wildcard (`"*"`), and are
//! detached explicitly with [`EventBus::unsubscribe`].
//!
//! Everything here is single-threaded: handlers run synchronously inside
//! `publish`, in subscription order, and may themselves publish or
//! (un)subscribe.

use std::cell::RefCell;
use std::rc::Rc;

use portfolio_types::{ActiveSection, ThemePreference};
use serde_json::json;

pub const TOPIC_THEME_CHANGED: &str = "themeChanged";
pub const TOPIC_SECTION_CHANGED: &str = "sectionChanged";
pub const TOPIC_SLIDE_CHANGED: &str = "slideChanged";
pub const TOPIC_MENU_TOGGLED: &str = "menuToggled";

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    ThemeChanged { theme: ThemePreference },
    SectionChanged { section: ActiveSection },
    SlideChanged { index: usize },
    MenuToggled { open: bool },
}

impl PageEvent {
    /// Topic name, also used as the DOM `CustomEvent` type.
    pub fn topic(&self) -> &'static str {
        match self {
            PageEvent::ThemeChanged { .. } => TOPIC_THEME_CHANGED,
            PageEvent::SectionChanged { .. } => TOPIC_SECTION_CHANGED,
            PageEvent::SlideChanged { .. } => TOPIC_SLIDE_CHANGED,
            PageEvent::MenuToggled { .. } => TOPIC_MENU_TOGGLED,
        }
    }

    /// Payload for the DOM event's `detail` field.
    pub fn detail(&self) -> serde_json::Value {
        match self {
            PageEvent::ThemeChanged { theme } => json!({ "theme": theme }),
            PageEvent::SectionChanged { section } => json!({ "section": section.as_str() }),
            PageEvent::SlideChanged { index } => json!({ "index": index }),
            PageEvent::MenuToggled { open } => json!({ "open": open }),
        }
    }

    /// Whether other page scripts should see this event as a DOM event.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            PageEvent::ThemeChanged { .. } | PageEvent::SectionChanged { .. }
        )
    }

    pub fn matches_topic(&self, pattern: &str) -> bool {
        pattern == "*" || pattern == self.topic()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Rc<dyn Fn(&PageEvent)>;

struct Subscription {
    id: SubscriptionId,
    pattern: String,
    handler: Handler,
}

#[derive(Default)]
struct BusState {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

/// Cheaply cloneable handle; clones share the same subscriber list.
#[derive(Clone, Default)]
pub struct EventBus {
    state: Rc<RefCell<BusState>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, pattern: impl Into<String>, handler: F) -> SubscriptionId
    where
        F: Fn(&PageEvent) + 'static,
    {
        let mut state = self.state.borrow_mut();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.subscriptions.push(Subscription {
            id,
            pattern: pattern.into(),
            handler: Rc::new(handler),
        });
        id
    }

    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.subscriptions.len();
        state.subscriptions.retain(|s| s.id != id);
        state.subscriptions.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().subscriptions.len()
    }

    /// Deliver `event` to every matching handler. Returns how many ran.
    pub fn publish(&self, event: PageEvent) -> usize {
        log::debug!("Publishing {} event", event.topic());

        // Snapshot so handlers can touch the bus without a double borrow.
        let handlers: Vec<Handler> = self
            .state
            .borrow()
            .subscriptions
            .iter()
            .filter(|s| event.matches_topic(&s.pattern))
            .map(|s| s.handler.clone())
            .collect();

        for handler in &handlers {
            handler(&event);
        }
        handlers.len()
    }
}
