//! In-memory stand-ins for the DOM-facing traits.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use portfolio_types::ThemePreference;

use crate::carousel::{
    CarouselHost, CarouselWidget, NoticeSink, WidgetFactory, WidgetNotice, WidgetOptions,
};
use crate::error::PortfolioError;
use crate::menu::MenuSurface;
use crate::navigation::ScrollSurface;
use crate::reveal::RevealSurface;
use crate::theme::{Palette, PreferenceStore, ThemeSurface};

pub struct FailingStore;

impl PreferenceStore for FailingStore {
    fn load(&self, _key: &str) -> Result<Option<String>, PortfolioError> {
        Err(PortfolioError::Storage("SecurityError".to_string()))
    }

    fn save(&self, _key: &str, _value: &str) -> Result<(), PortfolioError> {
        Err(PortfolioError::Storage("QuotaExceededError".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingThemeSurface {
    applied: RefCell<Vec<(ThemePreference, Palette)>>,
}

impl RecordingThemeSurface {
    pub fn applied_count(&self) -> usize {
        self.applied.borrow().len()
    }

    pub fn last(&self) -> Option<(ThemePreference, Palette)> {
        self.applied.borrow().last().copied()
    }
}

impl ThemeSurface for RecordingThemeSurface {
    fn apply(&self, theme: ThemePreference, palette: Palette) -> Result<(), PortfolioError> {
        self.applied.borrow_mut().push((theme, palette));
        Ok(())
    }
}

/// Document without a root element.
pub struct FailingThemeSurface;

impl ThemeSurface for FailingThemeSurface {
    fn apply(&self, _theme: ThemePreference, _palette: Palette) -> Result<(), PortfolioError> {
        Err(PortfolioError::MissingElement("html".to_string()))
    }
}

#[derive(Default)]
pub struct FakeCarouselHost {
    slides: Cell<usize>,
    replaced: Cell<usize>,
    enabled: Cell<usize>,
    visibility: RefCell<BTreeMap<usize, bool>>,
}

impl FakeCarouselHost {
    pub fn with_slides(count: usize) -> Self {
        let host = Self::default();
        host.slides.set(count);
        host
    }

    pub fn replace_count(&self) -> usize {
        self.replaced.get()
    }

    pub fn enable_count(&self) -> usize {
        self.enabled.get()
    }

    pub fn visible_slides(&self) -> Vec<usize> {
        self.visibility
            .borrow()
            .iter()
            .filter(|(_, visible)| **visible)
            .map(|(index, _)| *index)
            .collect()
    }
}

impl CarouselHost for FakeCarouselHost {
    fn replace_slides(&self, markup: &str) -> Result<(), PortfolioError> {
        self.slides
            .set(markup.matches(r#"class="swiper-slide""#).count());
        self.replaced.set(self.replaced.get() + 1);
        self.visibility.borrow_mut().clear();
        Ok(())
    }

    fn slide_count(&self) -> usize {
        self.slides.get()
    }

    fn set_slide_visible(&self, index: usize, visible: bool) {
        self.visibility.borrow_mut().insert(index, visible);
    }

    fn enable_controls(&self) {
        self.enabled.set(self.enabled.get() + 1);
    }
}

#[derive(Clone, Copy)]
enum Availability {
    Never,
    /// Available from this check number onward (1-based)
    From(u32),
    Throws,
}

/// Widget factory whose library shows up on a chosen check.
pub struct FakeWidgetFactory {
    availability: Availability,
    checks: Cell<u32>,
    calls: Rc<RefCell<Vec<&'static str>>>,
    last_options: RefCell<Option<WidgetOptions>>,
}

impl FakeWidgetFactory {
    fn with(availability: Availability) -> Self {
        Self {
            availability,
            checks: Cell::new(0),
            calls: Rc::new(RefCell::new(Vec::new())),
            last_options: RefCell::new(None),
        }
    }

    pub fn never() -> Self {
        Self::with(Availability::Never)
    }

    pub fn after(check: u32) -> Self {
        Self::with(Availability::From(check))
    }

    pub fn throwing() -> Self {
        Self::with(Availability::Throws)
    }

    pub fn checks(&self) -> u32 {
        self.checks.get()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    pub fn last_options(&self) -> Option<WidgetOptions> {
        self.last_options.borrow().clone()
    }
}

impl WidgetFactory for FakeWidgetFactory {
    fn is_available(&self) -> bool {
        let check = self.checks.get() + 1;
        self.checks.set(check);
        match self.availability {
            Availability::Never => false,
            Availability::From(first) => check >= first,
            Availability::Throws => true,
        }
    }

    fn construct(
        &self,
        options: &WidgetOptions,
        notices: NoticeSink,
    ) -> Result<Box<dyn CarouselWidget>, PortfolioError> {
        *self.last_options.borrow_mut() = Some(options.clone());
        if let Availability::Throws = self.availability {
            return Err(PortfolioError::WidgetConstruction(
                "TypeError: Swiper is not a constructor".to_string(),
            ));
        }
        notices(WidgetNotice::Init { index: 0 });
        Ok(Box::new(FakeWidget {
            total: 4,
            index: Cell::new(0),
            notices,
            calls: self.calls.clone(),
        }))
    }
}

struct FakeWidget {
    total: usize,
    index: Cell<usize>,
    notices: NoticeSink,
    calls: Rc<RefCell<Vec<&'static str>>>,
}

impl CarouselWidget for FakeWidget {
    fn slide_prev(&self) {
        self.calls.borrow_mut().push("prev");
        self.index.set((self.index.get() + self.total - 1) % self.total);
        (self.notices)(WidgetNotice::SlideChange {
            index: self.index.get(),
        });
    }

    fn slide_next(&self) {
        self.calls.borrow_mut().push("next");
        self.index.set((self.index.get() + 1) % self.total);
        (self.notices)(WidgetNotice::SlideChange {
            index: self.index.get(),
        });
    }

    fn destroy(&self) {
        self.calls.borrow_mut().push("destroy");
    }
}

#[derive(Default)]
pub struct RecordingRevealSurface {
    revealed: RefCell<Vec<(usize, bool)>>,
    unobserved: RefCell<Vec<usize>>,
}

impl RecordingRevealSurface {
    pub fn revealed(&self) -> Vec<(usize, bool)> {
        self.revealed.borrow().clone()
    }

    pub fn unobserved(&self) -> Vec<usize> {
        self.unobserved.borrow().clone()
    }
}

impl RevealSurface for RecordingRevealSurface {
    fn mark_revealed(&self, key: usize, animate: bool) {
        self.revealed.borrow_mut().push((key, animate));
    }

    fn unobserve(&self, key: usize) {
        self.unobserved.borrow_mut().push(key);
    }
}

pub struct FakeScrollSurface {
    header_height: f64,
    sections: HashMap<String, f64>,
    current_y: Cell<f64>,
    landing: Cell<Option<f64>>,
    scrolls: RefCell<Vec<(f64, bool)>>,
    highlighted: RefCell<Vec<String>>,
}

impl FakeScrollSurface {
    pub fn new(header_height: f64, sections: &[(&str, f64)]) -> Self {
        Self {
            header_height,
            sections: sections
                .iter()
                .map(|(id, offset)| (id.to_string(), *offset))
                .collect(),
            current_y: Cell::new(0.0),
            landing: Cell::new(None),
            scrolls: RefCell::new(Vec::new()),
            highlighted: RefCell::new(Vec::new()),
        }
    }

    /// Force where scrolling appears to end up, regardless of the request.
    pub fn set_landing(&self, y: Option<f64>) {
        self.landing.set(y);
    }

    pub fn scrolls(&self) -> Vec<(f64, bool)> {
        self.scrolls.borrow().clone()
    }

    pub fn highlighted(&self) -> Vec<String> {
        self.highlighted.borrow().clone()
    }
}

impl ScrollSurface for FakeScrollSurface {
    fn section_offset(&self, id: &str) -> Option<f64> {
        self.sections.get(id).copied()
    }

    fn header_height(&self) -> f64 {
        self.header_height
    }

    fn scroll_y(&self) -> f64 {
        self.landing.get().unwrap_or(self.current_y.get())
    }

    fn scroll_to(&self, y: f64, smooth: bool) {
        self.scrolls.borrow_mut().push((y, smooth));
        self.current_y.set(y);
    }

    fn highlight(&self, section: &str) {
        self.highlighted.borrow_mut().push(section.to_string());
    }
}

#[derive(Default)]
pub struct RecordingMenuSurface {
    states: RefCell<Vec<bool>>,
}

impl RecordingMenuSurface {
    pub fn states(&self) -> Vec<bool> {
        self.states.borrow().clone()
    }
}

impl MenuSurface for RecordingMenuSurface {
    fn set_open(&self, open: bool) {
        self.states.borrow_mut().push(open);
    }
}
