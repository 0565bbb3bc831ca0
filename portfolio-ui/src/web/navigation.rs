use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, ScrollBehavior, ScrollToOptions, Window,
};

use super::dom::{js_error, query, query_all, Listener, Listeners};
use crate::config::PortfolioConfig;
use crate::error::PortfolioError;
use crate::navigation::{NavigationController, ScrollSurface};

pub struct DomScrollSurface {
    window: Window,
    document: Document,
    header_selector: String,
    fallback_header_height: f64,
    active_class: String,
    links: Vec<Element>,
}

impl DomScrollSurface {
    pub fn new(window: Window, document: Document, config: &PortfolioConfig) -> Self {
        let links = query_all(&document, &config.selectors.anchors);
        Self {
            window,
            document,
            header_selector: config.selectors.header.clone(),
            fallback_header_height: config.navigation.fallback_header_height_px,
            active_class: config.navigation.active_class.clone(),
            links,
        }
    }
}

impl ScrollSurface for DomScrollSurface {
    fn section_offset(&self, id: &str) -> Option<f64> {
        let target = self.document.get_element_by_id(id)?;
        Some(target.get_bounding_client_rect().top() + self.scroll_y())
    }

    fn header_height(&self) -> f64 {
        query(&self.document, &self.header_selector)
            .and_then(|header| header.dyn_into::<HtmlElement>().ok())
            .map(|header| f64::from(header.offset_height()))
            .unwrap_or(self.fallback_header_height)
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&self, y: f64, smooth: bool) {
        let options = ScrollToOptions::new();
        options.set_top(y);
        options.set_behavior(if smooth {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Instant
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn highlight(&self, section: &str) {
        let href = format!("#{}", section);
        for link in &self.links {
            let active = link.get_attribute("href").as_deref() == Some(href.as_str());
            let _ = link
                .class_list()
                .toggle_with_force(&self.active_class, active);
        }
    }
}

type EntryCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// Anchor click handlers and the section visibility watcher.
pub struct NavigationRuntime {
    pub controller: NavigationController,
    _anchors: Listeners,
    _sections: Option<(IntersectionObserver, EntryCallback)>,
}

impl NavigationRuntime {
    pub fn bind(
        document: &Document,
        config: &PortfolioConfig,
        controller: NavigationController,
    ) -> Self {
        let mut anchors = Listeners::default();
        for anchor in query_all(document, &config.selectors.anchors) {
            let nav = controller.clone();
            let link = anchor.clone();
            anchors.push(Listener::new(&anchor, "click", move |event| {
                let Some(href) = link.get_attribute("href") else {
                    return;
                };
                if nav.handle_link(&href) {
                    event.prevent_default();
                }
            }));
        }
        log::info!("Smooth scrolling bound to {} links", anchors.len());

        let sections = match Self::watch_sections(document, config, &controller) {
            Ok(sections) => Some(sections),
            Err(e) => {
                log::warn!("Active section tracking disabled: {}", e);
                None
            }
        };

        Self {
            controller,
            _anchors: anchors,
            _sections: sections,
        }
    }

    fn watch_sections(
        document: &Document,
        config: &PortfolioConfig,
        controller: &NavigationController,
    ) -> Result<(IntersectionObserver, EntryCallback), PortfolioError> {
        let nav = controller.clone();
        let callback: EntryCallback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if entry.is_intersecting() {
                        nav.on_section_visibility(&entry.target().id(), entry.intersection_ratio());
                    }
                }
            },
        )
            as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(config.navigation.section_threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(|e| PortfolioError::Dom(js_error(e)))?;

        for section in query_all(document, &config.selectors.sections) {
            observer.observe(&section);
        }
        Ok((observer, callback))
    }
}
