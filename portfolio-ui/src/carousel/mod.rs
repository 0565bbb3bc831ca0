//! Project carousel
//!
//! Wraps the external slider widget. The adapter renders the deck, waits a
//! bounded time for the widget library, and either drives the widget or falls
//! back to [`FallbackSlideshow`]. Previous/next controls always route through
//! [`CarouselAdapter::prev`] / [`CarouselAdapter::next`], which never fail.

mod fallback;
mod options;
mod retry;

pub use fallback::FallbackSlideshow;
pub use options::{
    Autoplay, AutoplayOptions, BreakpointOptions, NavigationOptions, PaginationOptions,
    WidgetOptions, NAV_DISABLED_CLASS, NAV_LOCK_CLASS,
};
pub use retry::{LoaderState, LoaderStep, WidgetLoader};

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use portfolio_types::CarouselState;

use crate::context::AppContext;
use crate::deck::SlideDeck;
use crate::error::PortfolioError;
use crate::events::PageEvent;
use crate::scheduler::Scheduler;

/// DOM side of the carousel: the slide container and the two controls.
pub trait CarouselHost {
    /// Replace the container content with `markup` in a single assignment.
    fn replace_slides(&self, markup: &str) -> Result<(), PortfolioError>;
    fn slide_count(&self) -> usize;
    fn set_slide_visible(&self, index: usize, visible: bool);
    /// Clear any disabled state left on the previous/next controls.
    fn enable_controls(&self);
}

/// Imperative surface of a constructed slider widget.
pub trait CarouselWidget {
    fn slide_prev(&self);
    fn slide_next(&self);
    fn destroy(&self);
}

/// Lifecycle notifications the widget reports back to the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetNotice {
    Init { index: usize },
    SlideChange { index: usize },
    Update,
}

pub type NoticeSink = Rc<dyn Fn(WidgetNotice)>;

/// Locates and constructs the external widget.
pub trait WidgetFactory {
    fn is_available(&self) -> bool;
    fn construct(
        &self,
        options: &WidgetOptions,
        notices: NoticeSink,
    ) -> Result<Box<dyn CarouselWidget>, PortfolioError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselMode {
    Pending,
    Widget,
    Fallback,
    Destroyed,
}

enum Driver {
    Pending,
    Widget(Box<dyn CarouselWidget>),
    Fallback(FallbackSlideshow),
    Destroyed,
}

impl Driver {
    fn mode(&self) -> CarouselMode {
        match self {
            Driver::Pending => CarouselMode::Pending,
            Driver::Widget(_) => CarouselMode::Widget,
            Driver::Fallback(_) => CarouselMode::Fallback,
            Driver::Destroyed => CarouselMode::Destroyed,
        }
    }
}

struct AdapterState {
    ctx: AppContext,
    host: Rc<dyn CarouselHost>,
    factory: Rc<dyn WidgetFactory>,
    scheduler: Rc<dyn Scheduler>,
    driver: RefCell<Driver>,
    loader: RefCell<WidgetLoader>,
    position: Cell<CarouselState>,
    fallback_activations: Cell<u32>,
}

/// Cloneable handle to the page's carousel.
#[derive(Clone)]
pub struct CarouselAdapter {
    state: Rc<AdapterState>,
}

impl CarouselAdapter {
    pub fn new(
        ctx: AppContext,
        host: Rc<dyn CarouselHost>,
        factory: Rc<dyn WidgetFactory>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        let loader = WidgetLoader::from_config(&ctx.config().carousel);
        let loop_enabled = ctx.config().carousel.loop_enabled;
        Self {
            state: Rc::new(AdapterState {
                ctx,
                host,
                factory,
                scheduler,
                driver: RefCell::new(Driver::Pending),
                loader: RefCell::new(loader),
                position: Cell::new(CarouselState::new(0, loop_enabled)),
                fallback_activations: Cell::new(0),
            }),
        }
    }

    pub fn mode(&self) -> CarouselMode {
        self.state
            .driver
            .try_borrow()
            .map(|driver| driver.mode())
            .unwrap_or(CarouselMode::Pending)
    }

    pub fn state(&self) -> CarouselState {
        self.state.position.get()
    }

    pub fn loader_state(&self) -> LoaderState {
        self.state.loader.borrow().state()
    }

    /// How many times the manual slide-show has been switched on.
    pub fn fallback_activations(&self) -> u32 {
        self.state.fallback_activations.get()
    }

    /// Render the deck into the slide container. Returns the slide count.
    ///
    /// A running fallback slide-show restarts on the new deck at slide 0.
    pub fn render(&self, deck: &SlideDeck) -> Result<usize, PortfolioError> {
        let state = &self.state;
        state.host.replace_slides(&deck.render())?;
        let loop_enabled = state.ctx.config().carousel.loop_enabled;
        state
            .position
            .set(CarouselState::new(deck.len(), loop_enabled));

        match state.driver.try_borrow_mut() {
            Ok(mut driver) => {
                if let Driver::Fallback(slideshow) = &mut *driver {
                    *slideshow = FallbackSlideshow::new(deck.len());
                    slideshow.show_slide(0, state.host.as_ref());
                    state.position.set(slideshow.state());
                }
            }
            Err(_) => log::warn!("Carousel busy while re-rendering slides"),
        }

        log::debug!("Rendered {} project slides", deck.len());
        Ok(deck.len())
    }

    /// Start waiting for the widget library. The first check runs now.
    pub fn initialize(&self) {
        if self.state.loader.borrow().is_settled() {
            log::debug!("Carousel already initialized");
            return;
        }
        Self::attempt(&self.state);
    }

    pub fn next(&self) {
        self.navigate(Direction::Next);
    }

    pub fn prev(&self) {
        self.navigate(Direction::Prev);
    }

    /// Tear down the widget. Later navigation calls are ignored.
    pub fn destroy(&self) {
        let previous = match self.state.driver.try_borrow_mut() {
            Ok(mut driver) => std::mem::replace(&mut *driver, Driver::Destroyed),
            Err(_) => {
                log::warn!("Carousel busy, destroy skipped");
                return;
            }
        };
        if let Driver::Widget(widget) = previous {
            widget.destroy();
        }
        log::info!("Carousel destroyed");
    }

    fn attempt(state: &Rc<AdapterState>) {
        if matches!(
            state.driver.try_borrow().map(|driver| driver.mode()),
            Ok(CarouselMode::Destroyed)
        ) {
            return;
        }

        let available = state.factory.is_available();
        let step = state.loader.borrow_mut().poll(available);
        match step {
            LoaderStep::Ready => Self::construct_widget(state),
            LoaderStep::RetryAfter(delay_ms) => {
                log::debug!("Waiting for slider library, retrying in {}ms", delay_ms);
                let weak: Weak<AdapterState> = Rc::downgrade(state);
                state.scheduler.schedule(
                    delay_ms,
                    Box::new(move || {
                        if let Some(state) = weak.upgrade() {
                            Self::attempt(&state);
                        }
                    }),
                );
            }
            LoaderStep::Fallback => {
                let attempts = state.loader.borrow().max_attempts();
                log::error!("{}", PortfolioError::WidgetUnavailable { attempts });
                Self::activate_fallback(state);
            }
            LoaderStep::Finished => {}
        }
    }

    fn construct_widget(state: &Rc<AdapterState>) {
        let ctx = &state.ctx;
        let options = WidgetOptions::new(
            &ctx.config().carousel,
            &ctx.config().selectors,
            ctx.reduced_motion(),
        );

        let weak = Rc::downgrade(state);
        let notices: NoticeSink = Rc::new(move |notice| {
            if let Some(state) = weak.upgrade() {
                Self::on_notice(&state, notice);
            }
        });

        // The widget may report `Init` from inside its constructor, so no
        // borrow of `driver` is held across `construct`.
        match state.factory.construct(&options, notices) {
            Ok(widget) => {
                *state.driver.borrow_mut() = Driver::Widget(widget);
                state.host.enable_controls();
                log::info!("Carousel widget initialized");
            }
            Err(e) => {
                log::error!("{}", e);
                Self::activate_fallback(state);
            }
        }
    }

    fn activate_fallback(state: &Rc<AdapterState>) {
        let mut driver = state.driver.borrow_mut();
        if matches!(*driver, Driver::Fallback(_) | Driver::Destroyed) {
            return;
        }

        let rendered = state.position.get().total_slides;
        let total = if rendered > 0 {
            rendered
        } else {
            state.host.slide_count()
        };
        let mut slideshow = FallbackSlideshow::new(total);
        slideshow.show_slide(0, state.host.as_ref());
        state.position.set(slideshow.state());
        *driver = Driver::Fallback(slideshow);
        drop(driver);

        state
            .fallback_activations
            .set(state.fallback_activations.get() + 1);
        state.host.enable_controls();
        log::warn!("Carousel running in fallback mode with {} slides", total);
    }

    fn on_notice(state: &Rc<AdapterState>, notice: WidgetNotice) {
        match notice {
            WidgetNotice::Init { index } | WidgetNotice::SlideChange { index } => {
                let mut position = state.position.get();
                let before = position.current_index;
                let current = position.go_to(index);
                state.position.set(position);
                state.host.enable_controls();
                if current != before {
                    state.ctx.emit(PageEvent::SlideChanged { index: current });
                }
            }
            WidgetNotice::Update => state.host.enable_controls(),
        }
    }

    fn navigate(&self, direction: Direction) {
        let state = &self.state;
        let Ok(mut driver) = state.driver.try_borrow_mut() else {
            log::debug!("Carousel navigation ignored while busy");
            return;
        };

        let moved = match &mut *driver {
            Driver::Widget(widget) => {
                // Position updates arrive through `SlideChange` notices.
                match direction {
                    Direction::Next => widget.slide_next(),
                    Direction::Prev => widget.slide_prev(),
                }
                None
            }
            Driver::Fallback(slideshow) => {
                let index = match direction {
                    Direction::Next => slideshow.next(state.host.as_ref()),
                    Direction::Prev => slideshow.prev(state.host.as_ref()),
                };
                state.position.set(slideshow.state());
                Some(index)
            }
            Driver::Pending | Driver::Destroyed => {
                log::debug!("Carousel not ready, {:?} ignored", direction);
                return;
            }
        };
        drop(driver);

        state.host.enable_controls();
        if let Some(index) = moved {
            state.ctx.emit(PageEvent::SlideChanged { index });
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Next,
    Prev,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PortfolioConfig;
    use crate::context::Environment;
    use crate::events::TOPIC_SLIDE_CHANGED;
    use crate::scheduler::ManualScheduler;
    use crate::test_support::{FakeCarouselHost, FakeWidgetFactory};

    struct Harness {
        ctx: AppContext,
        host: Rc<FakeCarouselHost>,
        factory: Rc<FakeWidgetFactory>,
        scheduler: Rc<ManualScheduler>,
        adapter: CarouselAdapter,
    }

    fn harness(factory: FakeWidgetFactory, reduced_motion: bool) -> Harness {
        let env = Environment {
            prefers_reduced_motion: reduced_motion,
            ..Environment::default()
        };
        let ctx = AppContext::new(PortfolioConfig::default(), env);
        let host = Rc::new(FakeCarouselHost::default());
        let factory = Rc::new(factory);
        let scheduler = Rc::new(ManualScheduler::new());
        let adapter = CarouselAdapter::new(
            ctx.clone(),
            host.clone(),
            factory.clone(),
            scheduler.clone(),
        );
        adapter.render(&SlideDeck::default()).unwrap();
        Harness {
            ctx,
            host,
            factory,
            scheduler,
            adapter,
        }
    }

    #[test]
    fn test_render_replaces_container_once() {
        let h = harness(FakeWidgetFactory::never(), false);
        assert_eq!(h.host.replace_count(), 1);
        assert_eq!(h.host.slide_count(), 4);
        assert_eq!(h.adapter.state().total_slides, 4);
    }

    #[test]
    fn test_widget_constructed_when_available() {
        let h = harness(FakeWidgetFactory::after(3), false);
        h.adapter.initialize();
        assert_eq!(h.adapter.mode(), CarouselMode::Pending);

        h.scheduler.run_until_idle();

        assert_eq!(h.adapter.mode(), CarouselMode::Widget);
        assert_eq!(h.factory.checks(), 3);
        assert_eq!(h.adapter.fallback_activations(), 0);
        assert_eq!(h.scheduler.now_ms(), 1000);
    }

    #[test]
    fn test_fallback_exactly_once_after_budget() {
        let h = harness(FakeWidgetFactory::never(), false);
        h.adapter.initialize();
        h.scheduler.run_until_idle();

        assert_eq!(h.adapter.mode(), CarouselMode::Fallback);
        assert_eq!(h.factory.checks(), 10);
        assert_eq!(h.adapter.fallback_activations(), 1);
        assert_eq!(h.adapter.loader_state(), LoaderState::Fallback);
        assert_eq!(h.host.visible_slides(), vec![0]);

        // A late initialize does not check again.
        h.adapter.initialize();
        h.scheduler.run_until_idle();
        assert_eq!(h.factory.checks(), 10);
        assert_eq!(h.adapter.fallback_activations(), 1);
    }

    #[test]
    fn test_construction_error_falls_back() {
        let h = harness(FakeWidgetFactory::throwing(), false);
        h.adapter.initialize();
        assert_eq!(h.adapter.mode(), CarouselMode::Fallback);
        assert_eq!(h.adapter.fallback_activations(), 1);
    }

    #[test]
    fn test_controls_drive_widget() {
        let h = harness(FakeWidgetFactory::after(1), false);
        h.adapter.initialize();

        h.adapter.next();
        h.adapter.next();
        h.adapter.prev();

        assert_eq!(h.factory.calls(), vec!["next", "next", "prev"]);
        assert_eq!(h.adapter.state().current_index, 1);
        assert!(h.host.enable_count() >= 3);
    }

    #[test]
    fn test_controls_before_ready_are_no_ops() {
        let h = harness(FakeWidgetFactory::never(), false);
        h.adapter.next();
        h.adapter.prev();
        assert_eq!(h.adapter.state().current_index, 0);
        assert!(h.host.visible_slides().is_empty());
    }

    #[test]
    fn test_fallback_navigation_wraps_and_publishes() {
        let h = harness(FakeWidgetFactory::never(), false);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        h.ctx.bus().subscribe(TOPIC_SLIDE_CHANGED, move |event| {
            if let PageEvent::SlideChanged { index } = event {
                s.borrow_mut().push(*index);
            }
        });

        h.adapter.initialize();
        h.scheduler.run_until_idle();
        h.adapter.prev();
        h.adapter.next();
        h.adapter.next();

        assert_eq!(*seen.borrow(), vec![3, 0, 1]);
        assert_eq!(h.host.visible_slides(), vec![1]);
    }

    #[test]
    fn test_rerender_restarts_fallback_on_new_deck() {
        let h = harness(FakeWidgetFactory::never(), false);
        h.adapter.initialize();
        h.scheduler.run_until_idle();
        h.adapter.next();
        h.adapter.next();
        assert_eq!(h.adapter.state().current_index, 2);

        let smaller = SlideDeck::new(portfolio_types::default_projects()[..2].to_vec());
        assert_eq!(h.adapter.render(&smaller).unwrap(), 2);

        assert_eq!(h.adapter.mode(), CarouselMode::Fallback);
        assert_eq!(h.adapter.state().total_slides, 2);
        assert_eq!(h.adapter.state().current_index, 0);
        assert_eq!(h.host.visible_slides(), vec![0]);

        h.adapter.next();
        assert_eq!(h.adapter.state().current_index, 1);
        assert_eq!(h.adapter.state().total_slides, 2);
        assert_eq!(h.host.visible_slides(), vec![1]);
        h.adapter.next();
        assert_eq!(h.adapter.state().current_index, 0);
    }

    #[test]
    fn test_reduced_motion_turns_autoplay_off() {
        let h = harness(FakeWidgetFactory::after(1), true);
        h.adapter.initialize();
        let options = h.factory.last_options().unwrap();
        assert_eq!(options.autoplay, Autoplay::Disabled);

        let h = harness(FakeWidgetFactory::after(1), false);
        h.adapter.initialize();
        assert!(matches!(
            h.factory.last_options().unwrap().autoplay,
            Autoplay::Enabled(_)
        ));
    }

    #[test]
    fn test_destroy_tears_down_widget() {
        let h = harness(FakeWidgetFactory::after(1), false);
        h.adapter.initialize();
        h.adapter.destroy();
        h.adapter.next();

        assert_eq!(h.adapter.mode(), CarouselMode::Destroyed);
        assert_eq!(h.factory.calls(), vec!["destroy"]);
    }

    #[test]
    fn test_destroy_while_waiting_stops_fallback() {
        let h = harness(FakeWidgetFactory::never(), false);
        h.adapter.initialize();
        h.adapter.destroy();
        h.scheduler.run_until_idle();

        assert_eq!(h.adapter.mode(), CarouselMode::Destroyed);
        assert_eq!(h.adapter.fallback_activations(), 0);
    }
}
