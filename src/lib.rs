#![cfg(target_arch = "wasm32")]
use crate::fluid::ScrollVelocity;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod background;
mod constants;
mod dom;
mod events;
mod fluid;
mod frame;
mod render;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("contour-backdrop loaded");
    Ok(())
}

// ---------------- Scroll velocity ----------------

thread_local! {
    static SHARED_SCROLL: RefCell<Option<ScrollVelocityService>> = const { RefCell::new(None) };
}

/// Page-wide scroll velocity, fed by a single window scroll listener.
#[wasm_bindgen]
#[derive(Clone)]
pub struct ScrollVelocityService {
    inner: Rc<RefCell<ScrollVelocity>>,
}

#[wasm_bindgen]
impl ScrollVelocityService {
    /// The one instance for this page; the scroll listener is wired on first use.
    pub fn shared() -> ScrollVelocityService {
        SHARED_SCROLL.with(|slot| {
            slot.borrow_mut()
                .get_or_insert_with(|| {
                    let service = ScrollVelocityService {
                        inner: Rc::new(RefCell::new(ScrollVelocity::new())),
                    };
                    service.wire_scroll_listener();
                    service
                })
                .clone()
        })
    }

    pub fn velocity(&self) -> f32 {
        self.inner.borrow().sample(js_sys::Date::now()).velocity
    }

    pub fn strength(&self) -> f32 {
        self.inner.borrow().sample(js_sys::Date::now()).strength
    }
}

impl ScrollVelocityService {
    fn wire_scroll_listener(&self) {
        let Some(window) = web::window() else {
            return;
        };
        let inner = self.inner.clone();
        let window_cb = window.clone();
        let closure = Closure::wrap(Box::new(move || {
            let y = window_cb.scroll_y().unwrap_or(0.0);
            inner.borrow_mut().on_scroll(y, js_sys::Date::now());
        }) as Box<dyn FnMut()>);
        let opts = web::AddEventListenerOptions::new();
        opts.set_passive(true);
        _ = window.add_event_listener_with_callback_and_add_event_listener_options(
            constants::EVENT_SCROLL,
            closure.as_ref().unchecked_ref(),
            &opts,
        );
        // Lives as long as the page, like the service itself
        closure.forget();
    }
}

// ---------------- Fluid background ----------------

#[wasm_bindgen]
#[derive(Clone, Debug, Default)]
pub struct MountOptions {
    class_name: String,
    defer: bool,
}

#[wasm_bindgen]
impl MountOptions {
    #[wasm_bindgen(constructor)]
    pub fn new() -> MountOptions {
        MountOptions::default()
    }

    #[wasm_bindgen(getter, js_name = className)]
    pub fn class_name(&self) -> String {
        self.class_name.clone()
    }

    #[wasm_bindgen(setter, js_name = className)]
    pub fn set_class_name(&mut self, class_name: String) {
        self.class_name = class_name;
    }

    /// Hold initialization until `ready()` is called.
    #[wasm_bindgen(getter)]
    pub fn defer(&self) -> bool {
        self.defer
    }

    #[wasm_bindgen(setter)]
    pub fn set_defer(&mut self, defer: bool) {
        self.defer = defer;
    }
}

#[wasm_bindgen]
pub struct FluidBackground {
    inner: background::Background,
    defer: bool,
}

#[wasm_bindgen]
impl FluidBackground {
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: web::HtmlElement,
        options: &MountOptions,
        scroll: &ScrollVelocityService,
    ) -> Result<FluidBackground, JsValue> {
        let inner =
            background::Background::mount(container, &options.class_name, scroll.inner.clone())
                .map_err(|e| JsValue::from_str(&format!("{:?}", e)))?;
        Ok(FluidBackground {
            inner,
            defer: options.defer,
        })
    }

    pub fn start(&self) -> Result<String, JsValue> {
        self.inner
            .start(self.defer)
            .map(|p| p.as_str().to_string())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// The page entrance finished; a deferred background may initialize.
    pub fn ready(&self) {
        self.inner.ready();
    }

    pub fn pause(&self) {
        self.inner.pause();
    }

    pub fn resume(&self) {
        self.inner.resume();
    }

    pub fn dispose(&self) {
        self.inner.dispose();
    }

    pub fn phase(&self) -> String {
        self.inner.phase().as_str().to_string()
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> u32 {
        self.inner.particle_count()
    }

    #[wasm_bindgen(js_name = listenerCount)]
    pub fn listener_count(&self) -> usize {
        self.inner.listener_count()
    }
}
