use web_sys::{Document, Element};

use super::dom::{query, query_all_in, require, set_style, Listener, Listeners};
use crate::carousel::{CarouselAdapter, CarouselHost, NAV_DISABLED_CLASS, NAV_LOCK_CLASS};
use crate::config::Selectors;
use crate::error::PortfolioError;

const STOCK_DISABLED_CLASSES: [&str; 4] = [
    "swiper-button-disabled",
    "swiper-button-lock",
    NAV_DISABLED_CLASS,
    NAV_LOCK_CLASS,
];

/// The slide container and the previous/next buttons.
pub struct DomCarouselHost {
    container: Element,
    controls: Vec<Element>,
}

impl DomCarouselHost {
    pub fn new(container: Element, controls: Vec<Element>) -> Self {
        Self {
            container,
            controls,
        }
    }

    fn slides(&self) -> Vec<Element> {
        query_all_in(&self.container, ".swiper-slide")
    }
}

impl CarouselHost for DomCarouselHost {
    fn replace_slides(&self, markup: &str) -> Result<(), PortfolioError> {
        self.container.set_inner_html(markup);
        Ok(())
    }

    fn slide_count(&self) -> usize {
        self.slides().len()
    }

    fn set_slide_visible(&self, index: usize, visible: bool) {
        if let Some(slide) = self.slides().get(index) {
            set_style(slide, "display", if visible { "block" } else { "none" });
        }
    }

    fn enable_controls(&self) {
        for control in &self.controls {
            for class in STOCK_DISABLED_CLASSES {
                let _ = control.class_list().remove_1(class);
            }
            let _ = control.remove_attribute("disabled");
            let _ = control.remove_attribute("tabindex");
            let _ = control.set_attribute("aria-disabled", "false");
            set_style(control, "pointer-events", "auto");
            set_style(control, "cursor", "pointer");
            set_style(control, "opacity", "1");
        }
    }
}

pub struct CarouselElements {
    pub container: Element,
    pub widget_root: Element,
    pub prev: Option<Element>,
    pub next: Option<Element>,
}

impl CarouselElements {
    /// The slide container and widget root are required; the controls are
    /// optional.
    pub fn locate(document: &Document, selectors: &Selectors) -> Result<Self, PortfolioError> {
        let container = require(document, &selectors.slides_container)?;
        let widget_root = require(document, &selectors.carousel)?;
        let prev = query(document, &selectors.prev_control);
        let next = query(document, &selectors.next_control);
        if prev.is_none() || next.is_none() {
            log::warn!("Carousel controls missing, arrows disabled");
        }
        Ok(Self {
            container,
            widget_root,
            prev,
            next,
        })
    }

    pub fn controls(&self) -> Vec<Element> {
        self.prev.iter().chain(self.next.iter()).cloned().collect()
    }
}

/// Previous/next buttons routed through the adapter.
///
/// Registered before the widget is constructed, so these run first and stop
/// the event before the widget's own button handlers step a second time.
pub fn bind_controls(
    adapter: &CarouselAdapter,
    prev: Option<&Element>,
    next: Option<&Element>,
) -> Listeners {
    let mut listeners = Listeners::default();
    if let Some(prev) = prev {
        let adapter = adapter.clone();
        listeners.push(Listener::new(prev, "click", move |event| {
            event.prevent_default();
            event.stop_immediate_propagation();
            adapter.prev();
        }));
    }
    if let Some(next) = next {
        let adapter = adapter.clone();
        listeners.push(Listener::new(next, "click", move |event| {
            event.prevent_default();
            event.stop_immediate_propagation();
            adapter.next();
        }));
    }
    listeners
}

/// The page's carousel with its control listeners.
pub struct CarouselRuntime {
    pub adapter: CarouselAdapter,
    controls: Listeners,
}

impl CarouselRuntime {
    pub fn new(adapter: CarouselAdapter, controls: Listeners) -> Self {
        Self { adapter, controls }
    }

    /// Detach the control listeners, then tear down the widget.
    pub fn destroy(&mut self) {
        self.controls.clear();
        self.adapter.destroy();
    }
}
