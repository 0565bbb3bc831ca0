use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, KeyboardEvent};

use super::dom::{require, Listener, Listeners};
use crate::config::Selectors;
use crate::context::AppContext;
use crate::error::PortfolioError;
use crate::menu::{MenuSurface, MobileMenu};

const OPEN_CLASS: &str = "is-open";

struct DomMenuSurface {
    toggle: Element,
    nav: Element,
}

impl MenuSurface for DomMenuSurface {
    fn set_open(&self, open: bool) {
        let _ = self
            .toggle
            .set_attribute("aria-expanded", if open { "true" } else { "false" });
        let _ = self.toggle.class_list().toggle_with_force(OPEN_CLASS, open);
        let _ = self.nav.class_list().toggle_with_force(OPEN_CLASS, open);
    }
}

pub struct MenuRuntime {
    pub menu: Rc<MobileMenu>,
    _listeners: Listeners,
}

impl MenuRuntime {
    pub fn bind(ctx: &AppContext, document: &Document) -> Result<Self, PortfolioError> {
        let selectors: &Selectors = &ctx.config().selectors;
        let toggle = require(document, &selectors.menu_toggle)?;
        let nav = require(document, &selectors.nav_links)?;

        let menu = Rc::new(MobileMenu::new(
            ctx.clone(),
            Rc::new(DomMenuSurface {
                toggle: toggle.clone(),
                nav,
            }),
        ));

        let mut listeners = Listeners::default();
        let m = menu.clone();
        listeners.attach(Listener::new(&toggle, "click", move |event| {
            event.prevent_default();
            m.toggle();
        })?);
        let m = menu.clone();
        listeners.attach(Listener::new(document, "keydown", move |event| {
            if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                m.on_key(&key.key());
            }
        })?);

        Ok(Self {
            menu,
            _listeners: listeners,
        })
    }
}
