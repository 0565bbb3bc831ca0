//! Binding to the global `Swiper` class loaded from a CDN script tag.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use super::dom::js_error;
use crate::carousel::{CarouselWidget, NoticeSink, WidgetFactory, WidgetNotice, WidgetOptions};
use crate::error::PortfolioError;

#[wasm_bindgen]
extern "C" {
    type Swiper;

    #[wasm_bindgen(constructor, catch)]
    fn new(container: &Element, options: &JsValue) -> Result<Swiper, JsValue>;

    #[wasm_bindgen(method, js_name = slidePrev)]
    fn slide_prev(this: &Swiper);

    #[wasm_bindgen(method, js_name = slideNext)]
    fn slide_next(this: &Swiper);

    #[wasm_bindgen(method)]
    fn destroy(this: &Swiper, delete_instance: bool, clean_styles: bool);
}

/// Constructs Swiper on the carousel element once the library has loaded.
pub struct SwiperFactory {
    container: Element,
}

impl SwiperFactory {
    pub fn new(container: Element) -> Self {
        Self { container }
    }
}

impl WidgetFactory for SwiperFactory {
    fn is_available(&self) -> bool {
        js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("Swiper"))
            .map(|value| value.is_function())
            .unwrap_or(false)
    }

    fn construct(
        &self,
        options: &WidgetOptions,
        notices: NoticeSink,
    ) -> Result<Box<dyn CarouselWidget>, PortfolioError> {
        let js_options = js_sys::JSON::parse(&options.to_json()?)
            .map_err(|e| PortfolioError::WidgetConstruction(js_error(e)))?;

        let callbacks = SwiperCallbacks::new(notices);
        let on = js_sys::Object::new();
        set(&on, "init", callbacks.on_init.as_ref())?;
        set(&on, "slideChange", callbacks.on_slide_change.as_ref())?;
        set(&on, "update", callbacks.on_update.as_ref())?;
        set(&js_options, "on", &on)?;

        let swiper = Swiper::new(&self.container, &js_options)
            .map_err(|e| PortfolioError::WidgetConstruction(js_error(e)))?;

        let viewport = web_sys::window()
            .and_then(|window| window.inner_width().ok())
            .and_then(|width| width.as_f64())
            .unwrap_or(0.0);
        log::debug!(
            "Swiper constructed, {} slides per view at {}px",
            options.slides_per_view_at(viewport.max(0.0) as u32),
            viewport
        );

        Ok(Box::new(SwiperWidget {
            swiper,
            _callbacks: callbacks,
        }))
    }
}

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), PortfolioError> {
    js_sys::Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|e| PortfolioError::WidgetConstruction(js_error(e)))
}

/// Swiper passes the instance as the first handler argument.
fn real_index(swiper: &JsValue) -> usize {
    js_sys::Reflect::get(swiper, &JsValue::from_str("realIndex"))
        .ok()
        .and_then(|value| value.as_f64())
        .map(|index| index.max(0.0) as usize)
        .unwrap_or(0)
}

struct SwiperCallbacks {
    on_init: Closure<dyn FnMut(JsValue)>,
    on_slide_change: Closure<dyn FnMut(JsValue)>,
    on_update: Closure<dyn FnMut(JsValue)>,
}

impl SwiperCallbacks {
    fn new(notices: NoticeSink) -> Self {
        let sink = Rc::clone(&notices);
        let on_init = Closure::wrap(Box::new(move |swiper: JsValue| {
            sink(WidgetNotice::Init {
                index: real_index(&swiper),
            });
        }) as Box<dyn FnMut(JsValue)>);

        let sink = Rc::clone(&notices);
        let on_slide_change = Closure::wrap(Box::new(move |swiper: JsValue| {
            sink(WidgetNotice::SlideChange {
                index: real_index(&swiper),
            });
        }) as Box<dyn FnMut(JsValue)>);

        let on_update = Closure::wrap(Box::new(move |_swiper: JsValue| {
            notices(WidgetNotice::Update);
        }) as Box<dyn FnMut(JsValue)>);

        Self {
            on_init,
            on_slide_change,
            on_update,
        }
    }
}

struct SwiperWidget {
    swiper: Swiper,
    // Keep closures alive as long as Swiper can call them.
    _callbacks: SwiperCallbacks,
}

impl CarouselWidget for SwiperWidget {
    fn slide_prev(&self) {
        self.swiper.slide_prev();
    }

    fn slide_next(&self) {
        self.swiper.slide_next();
    }

    fn destroy(&self) {
        self.swiper.destroy(true, true);
    }
}
