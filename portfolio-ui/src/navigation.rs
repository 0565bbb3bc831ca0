//! In-page navigation: smooth scrolling to anchors under a fixed header and
//! tracking which section is in view.
//!
//! Each click runs a small state machine:
//!
//! ```text
//! Idle --click--> Scrolling --settle check--> Settled
//! ```
//!
//! The settle check fires once after `settle_delay_ms`; if the smooth scroll
//! ended more than `settle_tolerance_px` away from the target (late layout
//! shifts, lazy images), one instant corrective scroll is made. A newer click
//! supersedes the pending check of an older one.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use portfolio_types::ActiveSection;

use crate::context::AppContext;
use crate::events::PageEvent;
use crate::menu::MobileMenu;
use crate::scheduler::Scheduler;

/// Window and document measurements plus link highlighting.
pub trait ScrollSurface {
    /// Absolute document offset of the element with `id`, if it exists.
    fn section_offset(&self, id: &str) -> Option<f64>;
    fn header_height(&self) -> f64;
    fn scroll_y(&self) -> f64;
    fn scroll_to(&self, y: f64, smooth: bool);
    /// Mark the navigation link for `section` active and clear the others.
    fn highlight(&self, section: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavPhase {
    Idle,
    Scrolling { section: String, target_y: f64 },
    Settled { section: String, target_y: f64 },
}

/// Fragment of a same-page link: `"#about"` gives `Some("about")`. A bare
/// `"#"` or anything that is not a fragment link gives `None`.
pub fn fragment_of(href: &str) -> Option<&str> {
    let fragment = href.strip_prefix('#')?;
    if fragment.is_empty() {
        None
    } else {
        Some(fragment)
    }
}

/// Scroll position that puts a section just below the fixed header.
pub fn scroll_target(offset_top: f64, header_height: f64, padding: f64) -> f64 {
    (offset_top - header_height - padding).max(0.0)
}

struct NavState {
    ctx: AppContext,
    surface: Rc<dyn ScrollSurface>,
    scheduler: Rc<dyn Scheduler>,
    phase: RefCell<NavPhase>,
    click_seq: Cell<u64>,
    active: RefCell<Option<ActiveSection>>,
    menu: RefCell<Option<Rc<MobileMenu>>>,
}

#[derive(Clone)]
pub struct NavigationController {
    state: Rc<NavState>,
}

impl NavigationController {
    pub fn new(
        ctx: AppContext,
        surface: Rc<dyn ScrollSurface>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            state: Rc::new(NavState {
                ctx,
                surface,
                scheduler,
                phase: RefCell::new(NavPhase::Idle),
                click_seq: Cell::new(0),
                active: RefCell::new(None),
                menu: RefCell::new(None),
            }),
        }
    }

    pub fn phase(&self) -> NavPhase {
        self.state.phase.borrow().clone()
    }

    pub fn active_section(&self) -> Option<ActiveSection> {
        self.state.active.borrow().clone()
    }

    /// Menu to close whenever a link starts a scroll. The menu boots after
    /// navigation, so it is attached late.
    pub fn attach_menu(&self, menu: Rc<MobileMenu>) {
        *self.state.menu.borrow_mut() = Some(menu);
    }

    /// Handle activation of a link with `href`. Returns true if a scroll was
    /// started.
    pub fn handle_link(&self, href: &str) -> bool {
        let Some(section) = fragment_of(href) else {
            return false;
        };
        let state = &self.state;
        let Some(offset_top) = state.surface.section_offset(section) else {
            log::warn!("Navigation target #{} not found", section);
            return false;
        };

        let padding = state.ctx.config().navigation.scroll_padding_px;
        let target_y = scroll_target(offset_top, state.surface.header_height(), padding);

        let seq = state.click_seq.get() + 1;
        state.click_seq.set(seq);
        *state.phase.borrow_mut() = NavPhase::Scrolling {
            section: section.to_string(),
            target_y,
        };
        state.surface.scroll_to(target_y, true);
        log::debug!("Scrolling to #{} at {}px", section, target_y);

        let menu = state.menu.borrow().clone();
        if let Some(menu) = menu {
            menu.close();
        }

        let weak: Weak<NavState> = Rc::downgrade(state);
        let delay = state.ctx.config().navigation.settle_delay_ms;
        state.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(state) = weak.upgrade() {
                    Self::settle(&state, seq);
                }
            }),
        );
        true
    }

    fn settle(state: &NavState, seq: u64) {
        if state.click_seq.get() != seq {
            return;
        }
        let (section, target_y) = match &*state.phase.borrow() {
            NavPhase::Scrolling { section, target_y } => (section.clone(), *target_y),
            _ => return,
        };

        let tolerance = state.ctx.config().navigation.settle_tolerance_px;
        let landed = state.surface.scroll_y();
        if (landed - target_y).abs() > tolerance {
            log::debug!(
                "Scroll to #{} landed at {}px, correcting to {}px",
                section,
                landed,
                target_y
            );
            state.surface.scroll_to(target_y, false);
        }
        *state.phase.borrow_mut() = NavPhase::Settled { section, target_y };
    }

    /// Feed a visibility report for a section. Returns true if the active
    /// section changed.
    pub fn on_section_visibility(&self, id: &str, ratio: f64) -> bool {
        let state = &self.state;
        if ratio < state.ctx.config().navigation.section_threshold {
            return false;
        }
        if state.active.borrow().as_ref().map(ActiveSection::as_str) == Some(id) {
            return false;
        }

        let section = ActiveSection::new(id);
        *state.active.borrow_mut() = Some(section.clone());
        state.surface.highlight(id);
        state.ctx.emit(PageEvent::SectionChanged { section });
        true
    }
}
