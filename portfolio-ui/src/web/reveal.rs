use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::dom::{js_error, query_all, set_style};
use crate::context::AppContext;
use crate::error::PortfolioError;
use crate::reveal::{RevealObserver, RevealState, RevealSurface};

const KEY_ATTRIBUTE: &str = "data-reveal-key";

type EntryCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

struct DomRevealSurface {
    class: String,
    elements: RefCell<Vec<Element>>,
    observer: RefCell<Option<IntersectionObserver>>,
}

impl RevealSurface for DomRevealSurface {
    fn mark_revealed(&self, key: usize, animate: bool) {
        let elements = self.elements.borrow();
        let Some(element) = elements.get(key) else {
            return;
        };
        if !animate {
            set_style(element, "transition", "none");
        }
        let _ = element.class_list().add_1(&self.class);
    }

    fn unobserve(&self, key: usize) {
        let elements = self.elements.borrow();
        if let (Some(element), Some(observer)) = (elements.get(key), &*self.observer.borrow()) {
            observer.unobserve(element);
        }
    }
}

/// Reveal candidates and the intersection observer watching them.
pub struct RevealRuntime {
    pub observer: Rc<RevealObserver>,
    surface: Rc<DomRevealSurface>,
    _callback: Option<EntryCallback>,
}

impl RevealRuntime {
    pub fn bind(ctx: &AppContext, document: &Document) -> Result<Self, PortfolioError> {
        let config = &ctx.config().reveal;
        let surface = Rc::new(DomRevealSurface {
            class: config.revealed_class.clone(),
            elements: RefCell::new(Vec::new()),
            observer: RefCell::new(None),
        });
        let observer = Rc::new(RevealObserver::new(ctx, surface.clone()));

        let callback = if observer.needs_observation() {
            let handler = observer.clone();
            let callback: EntryCallback = Closure::wrap(Box::new(
                move |entries: js_sys::Array, _observer: IntersectionObserver| {
                    for entry in entries.iter() {
                        let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                            continue;
                        };
                        let key = entry
                            .target()
                            .get_attribute(KEY_ATTRIBUTE)
                            .and_then(|raw| raw.parse::<usize>().ok());
                        if let Some(key) = key {
                            handler.on_intersection(
                                key,
                                entry.is_intersecting(),
                                entry.intersection_ratio(),
                            );
                        }
                    }
                },
            )
                as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

            let init = IntersectionObserverInit::new();
            init.set_threshold(&JsValue::from_f64(config.threshold));
            init.set_root_margin(&config.root_margin);
            let io = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(|e| PortfolioError::Dom(js_error(e)))?;
            *surface.observer.borrow_mut() = Some(io);
            Some(callback)
        } else {
            None
        };

        let runtime = Self {
            observer,
            surface,
            _callback: callback,
        };
        let count = runtime.track(query_all(document, &ctx.config().selectors.reveal_candidates));
        log::info!("Tracking {} elements for reveal", count);
        Ok(runtime)
    }

    /// Register elements created after startup, such as rendered project
    /// cards. Elements already carrying a key are skipped.
    pub fn track(&self, elements: Vec<Element>) -> usize {
        let fresh: Vec<Element> = elements
            .into_iter()
            .filter(|element| !element.has_attribute(KEY_ATTRIBUTE))
            .collect();

        self.surface.elements.borrow_mut().extend(fresh.iter().cloned());
        let keys = self.observer.register(fresh.len());
        let io = self.surface.observer.borrow();
        for (key, element) in keys.zip(fresh.iter()) {
            let _ = element.set_attribute(KEY_ATTRIBUTE, &key.to_string());
            if let Some(io) = io.as_ref() {
                if self.observer.state(key) == Some(RevealState::Watching) {
                    io.observe(element);
                }
            }
        }
        fresh.len()
    }
}

/// `IntersectionObserver` exists on the global object.
pub fn intersection_observer_supported() -> bool {
    js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str("IntersectionObserver"))
        .unwrap_or(false)
}
