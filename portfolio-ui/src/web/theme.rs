use std::rc::Rc;

use portfolio_types::ThemePreference;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent, MediaQueryList, MediaQueryListEvent, Window};

use super::dom::{js_error, Listener, Listeners};
use crate::error::PortfolioError;
use crate::theme::{Palette, ThemeController, ThemeOutcome, ThemeSurface};

pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

/// Writes the theme onto `<html>` and `<body>`.
pub struct DocumentThemeSurface {
    document: Document,
    toggle: Option<Element>,
}

impl DocumentThemeSurface {
    pub fn new(document: Document, toggle: Option<Element>) -> Self {
        Self { document, toggle }
    }
}

impl ThemeSurface for DocumentThemeSurface {
    fn apply(&self, theme: ThemePreference, palette: Palette) -> Result<(), PortfolioError> {
        let root = self
            .document
            .document_element()
            .ok_or_else(|| PortfolioError::MissingElement("html".to_string()))?;

        root.set_attribute("data-theme", theme.as_str())
            .map_err(|e| PortfolioError::Dom(js_error(e)))?;
        if let Some(body) = self.document.body() {
            body.set_attribute("data-theme", theme.as_str())
                .map_err(|e| PortfolioError::Dom(js_error(e)))?;
        }

        if let Some(root) = root.dyn_ref::<HtmlElement>() {
            let style = root.style();
            for (property, value) in palette {
                style
                    .set_property(property, value)
                    .map_err(|e| PortfolioError::Dom(js_error(e)))?;
            }
        }

        root.class_list()
            .toggle_with_force("dark", theme.is_dark())
            .map_err(|e| PortfolioError::Dom(js_error(e)))?;

        if let Some(toggle) = &self.toggle {
            let pressed = if theme.is_dark() { "true" } else { "false" };
            let _ = toggle.set_attribute("aria-pressed", pressed);
        }
        Ok(())
    }
}

/// Click and Enter/Space on the toggle, plus OS colour-scheme changes.
pub fn bind(
    window: &Window,
    toggle: Option<&Element>,
    controller: Rc<ThemeController>,
) -> Listeners {
    let mut listeners = Listeners::default();

    if let Some(toggle) = toggle {
        let c = controller.clone();
        listeners.push(Listener::new(toggle, "click", move |event| {
            event.prevent_default();
            report(c.toggle_theme());
        }));

        let c = controller.clone();
        listeners.push(Listener::new(toggle, "keydown", move |event| {
            let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if matches!(key_event.key().as_str(), "Enter" | " ") {
                event.prevent_default();
                report(c.toggle_theme());
            }
        }));
    } else {
        log::warn!("Theme toggle not found, theme switching disabled");
    }

    match window.match_media(DARK_SCHEME_QUERY) {
        Ok(Some(list)) => {
            let c = controller;
            listeners.push(scheme_listener(&list, move |prefers_dark| {
                if let Some(outcome) = c.follow_system(prefers_dark) {
                    log::info!("Following OS colour scheme: {:?}", outcome);
                }
            }));
        }
        Ok(None) => {}
        Err(e) => log::debug!("matchMedia unavailable: {}", js_error(e)),
    }

    listeners
}

fn scheme_listener<F>(list: &MediaQueryList, on_change: F) -> Result<Listener, PortfolioError>
where
    F: Fn(bool) + 'static,
{
    Listener::new(list, "change", move |event| {
        if let Some(event) = event.dyn_ref::<MediaQueryListEvent>() {
            on_change(event.matches());
        }
    })
}

fn report(outcome: ThemeOutcome) {
    match outcome {
        ThemeOutcome::Applied(theme) => log::info!("Theme switched to {}", theme),
        ThemeOutcome::Busy => log::debug!("Theme toggle ignored, transition in progress"),
    }
}
