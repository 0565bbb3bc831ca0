//! Browser bindings
//!
//! Implements the controller traits with `web-sys` and wires everything to
//! the live document. Each feature boots independently: a missing element or a
//! failed binding is logged and the remaining features still start.

mod buttons;
mod carousel;
mod dom;
mod menu;
mod navigation;
mod reveal;
mod scheduler;
mod storage;
mod swiper;
mod theme;

pub use dom::Listener;
pub use scheduler::TimeoutScheduler;
pub use storage::LocalStorageStore;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit, Document, Element, Window};

use self::carousel::{bind_controls, CarouselElements, CarouselRuntime, DomCarouselHost};
use self::dom::{js_error, media_matches, query, query_all_in, Listeners};
use self::menu::MenuRuntime;
use self::navigation::{DomScrollSurface, NavigationRuntime};
use self::reveal::{intersection_observer_supported, RevealRuntime};
use self::swiper::SwiperFactory;
use self::theme::{DocumentThemeSurface, DARK_SCHEME_QUERY};
use crate::carousel::CarouselAdapter;
use crate::config::{PortfolioConfig, Selectors, CONFIG_ELEMENT_ID, PROJECTS_ELEMENT_ID};
use crate::context::{AppContext, Environment};
use crate::deck::SlideDeck;
use crate::error::PortfolioError;
use crate::events::{PageEvent, SubscriptionId};
use crate::navigation::NavigationController;
use crate::scheduler::Scheduler;
use crate::theme::{MemoryStore, PreferenceStore, ThemeController};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

/// Everything that must live as long as the page.
struct Runtime {
    _ctx: AppContext,
    _forwarding: SubscriptionId,
    _theme: Option<(Rc<ThemeController>, Listeners)>,
    _navigation: NavigationRuntime,
    _reveal: Option<RevealRuntime>,
    carousel: Option<CarouselRuntime>,
    _menu: Option<MenuRuntime>,
    _buttons: Listeners,
}

/// Boot the page runtime once the document has been parsed.
#[wasm_bindgen(js_name = startPortfolio)]
pub fn start() {
    let (window, document) = match dom::window().and_then(|w| dom::document(&w).map(|d| (w, d))) {
        Ok(pair) => pair,
        Err(e) => {
            log::error!("Portfolio runtime unavailable: {}", e);
            return;
        }
    };

    if document.ready_state() != "loading" {
        run(&window, &document);
        return;
    }

    let target = document.clone();
    let on_ready = Closure::once_into_js(move || run(&window, &document));
    if let Err(e) = target.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref()) {
        log::error!("Failed to wait for DOMContentLoaded: {}", js_error(e));
    }
}

/// Tear down the carousel widget and its control listeners.
#[wasm_bindgen(js_name = destroyCarousel)]
pub fn destroy_carousel() {
    RUNTIME.with(|slot| {
        if let Some(carousel) = slot.borrow_mut().as_mut().and_then(|rt| rt.carousel.as_mut()) {
            carousel.destroy();
        }
    });
}

fn run(window: &Window, document: &Document) {
    let runtime = boot(window, document);
    RUNTIME.with(|slot| *slot.borrow_mut() = Some(runtime));
    log::info!("Portfolio initialized");
}

fn boot(window: &Window, document: &Document) -> Runtime {
    let config = load_config(document);
    let env = Environment {
        prefers_dark: media_matches(window, DARK_SCHEME_QUERY),
        prefers_reduced_motion: media_matches(window, REDUCED_MOTION_QUERY),
        supports_intersection_observer: intersection_observer_supported(),
    };
    log::debug!("Environment: {:?}", env);
    let ctx = AppContext::new(config, env);
    let scheduler: Rc<dyn Scheduler> = Rc::new(TimeoutScheduler);

    let forwarding = forward_public_events(&ctx, document);
    let theme = match boot_theme(&ctx, window, document, scheduler.clone()) {
        Ok(theme) => Some(theme),
        Err(e) => {
            log::error!("Theme controller failed to start: {}", e);
            install_minimal_theme_toggle(document, &ctx.config().selectors);
            None
        }
    };

    let navigation = NavigationRuntime::bind(
        document,
        ctx.config(),
        NavigationController::new(
            ctx.clone(),
            Rc::new(DomScrollSurface::new(window.clone(), document.clone(), ctx.config())),
            scheduler.clone(),
        ),
    );

    let reveal = RevealRuntime::bind(&ctx, document)
        .map_err(|e| log::warn!("Reveal animations disabled: {}", e))
        .ok();

    let carousel = boot_carousel(&ctx, document, scheduler, reveal.as_ref())
        .map_err(|e| log::warn!("Project carousel disabled: {}", e))
        .ok();

    let menu = match MenuRuntime::bind(&ctx, document) {
        Ok(menu) => Some(menu),
        Err(e @ PortfolioError::MissingElement(_)) => {
            log::warn!("Mobile menu disabled: {}", e);
            None
        }
        Err(e) => {
            log::error!("Mobile menu failed to start: {}", e);
            install_minimal_menu(document, &ctx.config().selectors);
            None
        }
    };
    if let Some(menu) = &menu {
        navigation.controller.attach_menu(menu.menu.clone());
    }

    let buttons = buttons::bind(document, &ctx.config().selectors.buttons);

    Runtime {
        _ctx: ctx,
        _forwarding: forwarding,
        _theme: theme,
        _navigation: navigation,
        _reveal: reveal,
        carousel,
        _menu: menu,
        _buttons: buttons,
    }
}

/// Defaults, overridden by the page's JSON block when it parses and
/// validates.
fn load_config(document: &Document) -> PortfolioConfig {
    let Some(raw) = page_json(document, CONFIG_ELEMENT_ID) else {
        return PortfolioConfig::default();
    };
    match PortfolioConfig::from_json(&raw) {
        Ok(config) => {
            log::info!("Loaded page configuration");
            config
        }
        Err(e) => {
            log::warn!("Ignoring page configuration: {}", e);
            PortfolioConfig::default()
        }
    }
}

fn page_json(document: &Document, id: &str) -> Option<String> {
    document
        .get_element_by_id(id)
        .and_then(|element| element.text_content())
        .filter(|text| !text.trim().is_empty())
}

fn boot_theme(
    ctx: &AppContext,
    window: &Window,
    document: &Document,
    scheduler: Rc<dyn Scheduler>,
) -> Result<(Rc<ThemeController>, Listeners), PortfolioError> {
    let store: Rc<dyn PreferenceStore> = match LocalStorageStore::open(window) {
        Ok(store) => Rc::new(store),
        Err(e) => {
            log::debug!("Theme preference kept for this session only: {}", e);
            Rc::new(MemoryStore::new())
        }
    };

    let toggle = query(document, &ctx.config().selectors.theme_toggle);
    let surface = Rc::new(DocumentThemeSurface::new(document.clone(), toggle.clone()));
    let controller = Rc::new(ThemeController::new(ctx.clone(), store, surface, scheduler));
    controller.init()?;

    let listeners = theme::bind(window, toggle.as_ref(), controller.clone());
    Ok((controller, listeners))
}

fn boot_carousel(
    ctx: &AppContext,
    document: &Document,
    scheduler: Rc<dyn Scheduler>,
    reveal: Option<&RevealRuntime>,
) -> Result<CarouselRuntime, PortfolioError> {
    let elements = CarouselElements::locate(document, &ctx.config().selectors)?;
    let deck = SlideDeck::from_page_json(page_json(document, PROJECTS_ELEMENT_ID).as_deref());

    let host = Rc::new(DomCarouselHost::new(elements.container.clone(), elements.controls()));
    let factory = Rc::new(SwiperFactory::new(elements.widget_root.clone()));
    let adapter = CarouselAdapter::new(ctx.clone(), host, factory, scheduler);
    adapter.render(&deck)?;
    if let Some(reveal) = reveal {
        let cards = query_all_in(&elements.container, &ctx.config().selectors.reveal_candidates);
        reveal.track(cards);
    }

    let controls = bind_controls(&adapter, elements.prev.as_ref(), elements.next.as_ref());
    adapter.initialize();
    Ok(CarouselRuntime::new(adapter, controls))
}

/// Re-dispatch public bus events on `document` for other page scripts.
fn forward_public_events(ctx: &AppContext, document: &Document) -> SubscriptionId {
    let document = document.clone();
    ctx.bus().subscribe("*", move |event: &PageEvent| {
        if !event.is_public() {
            return;
        }
        if let Err(e) = dispatch(&document, event) {
            log::debug!("Failed to dispatch {}: {}", event.topic(), e);
        }
    })
}

fn dispatch(document: &Document, event: &PageEvent) -> Result<(), PortfolioError> {
    let detail = js_sys::JSON::parse(&event.detail().to_string())
        .map_err(|e| PortfolioError::Dom(js_error(e)))?;
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    let custom = CustomEvent::new_with_event_init_dict(event.topic(), &init)
        .map_err(|e| PortfolioError::Dom(js_error(e)))?;
    document
        .dispatch_event(&custom)
        .map_err(|e| PortfolioError::Dom(js_error(e)))?;
    Ok(())
}

/// Theme toggle wired without the controller: flips `data-theme` on whatever
/// of `<html>` and `<body>` exists.
fn install_minimal_theme_toggle(document: &Document, selectors: &Selectors) {
    let Some(toggle) = query(document, &selectors.theme_toggle) else {
        return;
    };
    let doc = document.clone();
    let on_click = Closure::wrap(Box::new(move || {
        let targets: Vec<Element> = doc
            .document_element()
            .into_iter()
            .chain(doc.body().map(Element::from))
            .collect();
        let Some(first) = targets.first() else {
            return;
        };
        let next = match first.get_attribute("data-theme").as_deref() {
            Some("dark") => "light",
            _ => "dark",
        };
        for target in &targets {
            let _ = target.set_attribute("data-theme", next);
        }
    }) as Box<dyn FnMut()>);
    if toggle
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        .is_ok()
    {
        on_click.forget();
        log::warn!("Minimal theme toggle installed");
    }
}

/// Menu button wired without the controller.
fn install_minimal_menu(document: &Document, selectors: &Selectors) {
    let (Some(button), Some(nav)) = (
        query(document, &selectors.menu_toggle),
        query(document, &selectors.nav_links),
    ) else {
        return;
    };
    let on_click = Closure::wrap(Box::new(move || {
        let _ = nav.class_list().toggle("is-open");
    }) as Box<dyn FnMut()>);
    if button
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        .is_ok()
    {
        on_click.forget();
        log::warn!("Minimal menu toggle installed");
    }
}
