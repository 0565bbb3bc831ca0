use web_sys::{Document, Element};

use super::dom::{query_all, Listener, Listeners};

const HOVER_CLASS: &str = "is-hover";
const ACTIVE_CLASS: &str = "is-active";

/// Pointer marker classes on buttons and button-like links.
pub fn bind(document: &Document, selector: &str) -> Listeners {
    let mut listeners = Listeners::default();
    for button in query_all(document, selector) {
        listeners.push(marker(&button, "pointerenter", HOVER_CLASS, true));
        listeners.push(marker(&button, "pointerleave", HOVER_CLASS, false));
        listeners.push(marker(&button, "pointerleave", ACTIVE_CLASS, false));
        listeners.push(marker(&button, "pointerdown", ACTIVE_CLASS, true));
        listeners.push(marker(&button, "pointerup", ACTIVE_CLASS, false));
    }
    listeners
}

fn marker(
    button: &Element,
    event: &'static str,
    class: &'static str,
    on: bool,
) -> Result<Listener, crate::error::PortfolioError> {
    let target = button.clone();
    Listener::new(button, event, move |_| {
        let _ = target.class_list().toggle_with_force(class, on);
    })
}
