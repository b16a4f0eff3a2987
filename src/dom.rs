use crate::constants::{CANVAS_STYLE, IDLE_FALLBACK_MS, REDUCED_MOTION_QUERY, THEME_DARK_CLASS};
use crate::fluid::palette::{css_rgb, Palette};
use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<(web::Window, web::Document)> {
    let window = web::window()?;
    let document = window.document()?;
    Some((window, document))
}

pub fn prefers_reduced_motion(window: &web::Window) -> bool {
    window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .map(|m| m.matches())
        .unwrap_or(false)
}

pub fn user_agent(window: &web::Window) -> String {
    window.navigator().user_agent().unwrap_or_default()
}

/// Dark theme is on while `<html>` carries the dark class.
pub fn is_dark(document: &web::Document) -> bool {
    document
        .document_element()
        .map(|el| el.class_list().contains(THEME_DARK_CLASS))
        .unwrap_or(false)
}

/// Layout viewport in CSS pixels.
pub fn viewport_size(window: &web::Window) -> Vec2 {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    Vec2::new(dim(window.inner_width()), dim(window.inner_height()))
}

/// CSS size of an element's border box.
pub fn element_size(el: &web::Element) -> Vec2 {
    let rect = el.get_bounding_client_rect();
    Vec2::new(rect.width() as f32, rect.height() as f32)
}

pub fn add_class_tokens(el: &web::Element, class_name: &str) {
    let list = el.class_list();
    for token in class_name.split_whitespace() {
        _ = list.add_1(token);
    }
}

/// Static colour shown under the canvas, and instead of it when motion is off.
pub fn set_fallback_background(el: &web::HtmlElement, dark: bool) {
    let palette = if dark { Palette::DARK } else { Palette::LIGHT };
    _ = el
        .style()
        .set_property("background-color", &css_rgb(palette.background));
}

pub fn create_canvas(
    document: &web::Document,
    container: &web::HtmlElement,
) -> anyhow::Result<web::HtmlCanvasElement> {
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("create canvas: {:?}", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    let style = canvas.style();
    for (prop, value) in CANVAS_STYLE {
        _ = style.set_property(prop, value);
    }
    _ = canvas.set_attribute("aria-hidden", "true");
    container
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("append canvas: {:?}", e))?;
    Ok(canvas)
}

/// Size the drawing buffer to `css_size * ratio` and return it in device pixels.
pub fn sync_canvas_backing_size(
    canvas: &web::HtmlCanvasElement,
    css_size: Vec2,
    ratio: f64,
) -> (u32, u32) {
    let w_px = ((css_size.x as f64 * ratio) as u32).max(1);
    let h_px = ((css_size.y as f64 * ratio) as u32).max(1);
    if canvas.width() != w_px {
        canvas.set_width(w_px);
    }
    if canvas.height() != h_px {
        canvas.set_height(h_px);
    }
    (w_px, h_px)
}

#[derive(Clone, Copy, Debug)]
pub enum IdleHandle {
    Idle(u32),
    Timeout(i32),
}

/// Run `callback` when the browser is idle, or after a short timer where
/// `requestIdleCallback` is unavailable.
pub fn request_idle(window: &web::Window, callback: &js_sys::Function) -> Option<IdleHandle> {
    let has_idle = js_sys::Reflect::has(window, &JsValue::from_str("requestIdleCallback"))
        .unwrap_or(false);
    if has_idle {
        if let Ok(id) = window.request_idle_callback(callback) {
            return Some(IdleHandle::Idle(id));
        }
    }
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(callback, IDLE_FALLBACK_MS) {
        Ok(id) => Some(IdleHandle::Timeout(id)),
        Err(e) => {
            log::error!("[dom] cannot schedule init: {:?}", e);
            None
        }
    }
}

pub fn cancel_idle(window: &web::Window, handle: IdleHandle) {
    match handle {
        IdleHandle::Idle(id) => window.cancel_idle_callback(id),
        IdleHandle::Timeout(id) => window.clear_timeout_with_handle(id),
    }
}
