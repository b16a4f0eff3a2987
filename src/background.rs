use crate::constants::*;
use crate::dom;
use crate::events::Listeners;
use crate::fluid::{
    is_mobile_user_agent, DeviceProfile, FluidScene, Host, Lifecycle, LifecycleError, Phase,
    ScrollVelocity, StartOptions,
};
use crate::frame::{FrameContext, FrameStatus};
use crate::render;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

type Shared = Rc<RefCell<Lifecycle<WebHost>>>;
type WeakShared = Weak<RefCell<Lifecycle<WebHost>>>;

/// Run `f` against the lifecycle if the background is still alive.
fn with_lifecycle(this: &WeakShared, f: impl FnOnce(&mut Lifecycle<WebHost>)) {
    let Some(rc) = this.upgrade() else {
        return;
    };
    let Ok(mut lc) = rc.try_borrow_mut() else {
        log::warn!("[fluid] re-entrant callback ignored");
        return;
    };
    f(&mut lc);
}

/// Browser side of the lifecycle: canvas, idle init, animation frames,
/// listeners and the GPU state.
pub struct WebHost {
    this: WeakShared,
    window: web::Window,
    document: web::Document,
    container: web::HtmlElement,
    is_mobile: bool,
    canvas: Option<web::HtmlCanvasElement>,
    frame: FrameContext,
    listeners: Listeners,
    init_cb: Option<Closure<dyn FnMut()>>,
    idle: Option<dom::IdleHandle>,
    tick: Option<Closure<dyn FnMut()>>,
    raf_id: Option<i32>,
    rebuilding: bool,
}

impl WebHost {
    fn current_profile(&self) -> DeviceProfile {
        let viewport = dom::viewport_size(&self.window);
        DeviceProfile::detect(viewport.x as f64, self.is_mobile)
    }

    fn mount_canvas(&mut self) -> anyhow::Result<web::HtmlCanvasElement> {
        let canvas = dom::create_canvas(&self.document, &self.container)?;
        self.canvas = Some(canvas.clone());
        self.resize();
        Ok(canvas)
    }

    /// Match the drawing buffer to the container. A zero-sized container
    /// leaves everything as it was.
    fn resize(&mut self) {
        let css = dom::element_size(&self.container);
        if css.x <= 0.0 || css.y <= 0.0 {
            return;
        }
        let profile = self.current_profile();
        self.frame.scene.set_profile(profile);
        let ratio = profile.pixel_ratio(self.window.device_pixel_ratio());
        if let Some(canvas) = &self.canvas {
            let (w, h) = dom::sync_canvas_backing_size(canvas, css, ratio);
            self.frame.resize(w, h);
        }
    }

    fn apply_theme(&mut self) {
        let dark = dom::is_dark(&self.document);
        self.frame.scene.set_dark(dark);
        dom::set_fallback_background(&self.container, dark);
    }

    /// Drop the GPU state and build a fresh one on the same canvas. The
    /// lifecycle stays context-lost until the new device is adopted.
    fn rebuild_gpu(&mut self) {
        if self.rebuilding {
            return;
        }
        let Some(canvas) = self.canvas.clone() else {
            return;
        };
        self.rebuilding = true;
        self.frame.gpu = None;
        let this = self.this.clone();
        spawn_local(async move {
            let gpu = render::GpuState::new(canvas).await;
            with_lifecycle(&this, |lc| {
                lc.host_mut().rebuilding = false;
                if !matches!(lc.phase(), Phase::Running | Phase::Suspended) {
                    return;
                }
                match gpu {
                    Ok(gpu) => {
                        log::info!("[gpu] device rebuilt; resuming");
                        lc.host_mut().frame.gpu = Some(gpu);
                        lc.context_restored();
                    }
                    Err(e) => log::error!("[gpu] rebuild failed; staying suspended: {:?}", e),
                }
            });
        });
    }

    fn wire_listeners(&mut self) -> anyhow::Result<()> {
        let this = self.this.clone();
        self.listeners
            .add(&self.document, EVENT_POINTER_MOVE, true, move |ev| {
                let Some(ev) = ev.dyn_ref::<web::MouseEvent>() else {
                    return;
                };
                let client = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
                with_lifecycle(&this, |lc| {
                    let host = lc.host_mut();
                    let viewport = dom::viewport_size(&host.window);
                    host.frame.pointer_moved(client, viewport);
                });
            })?;

        let this = self.this.clone();
        self.listeners.add(&self.window, EVENT_RESIZE, true, move |_| {
            with_lifecycle(&this, |lc| lc.host_mut().resize());
        })?;

        let this = self.this.clone();
        self.listeners
            .add(&self.document, EVENT_VISIBILITY_CHANGE, false, move |_| {
                with_lifecycle(&this, |lc| {
                    let hidden = lc.host().document.hidden();
                    lc.set_hidden(hidden);
                });
            })?;

        if let Some(canvas) = self.canvas.clone() {
            let this = self.this.clone();
            self.listeners
                .add(&canvas, EVENT_CONTEXT_LOST, false, move |ev| {
                    // Without this the browser never restores the context
                    ev.prevent_default();
                    log::warn!("[gpu] context lost");
                    with_lifecycle(&this, |lc| lc.context_lost());
                })?;

            let this = self.this.clone();
            self.listeners
                .add(&canvas, EVENT_CONTEXT_RESTORED, false, move |_| {
                    with_lifecycle(&this, |lc| lc.host_mut().rebuild_gpu());
                })?;
        }

        if let Some(root) = self.document.document_element() {
            let this = self.this.clone();
            self.listeners.observe_class(&root, move || {
                with_lifecycle(&this, |lc| lc.host_mut().apply_theme());
            })?;
        }
        Ok(())
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Host for WebHost {
    fn schedule_init(&mut self) {
        let this = self.this.clone();
        let cb = self
            .init_cb
            .get_or_insert_with(|| Closure::wrap(Box::new(move || run_init(&this)) as Box<dyn FnMut()>));
        self.idle = dom::request_idle(&self.window, cb.as_ref().unchecked_ref());
    }

    fn cancel_init(&mut self) {
        if let Some(handle) = self.idle.take() {
            dom::cancel_idle(&self.window, handle);
        }
    }

    fn request_frame(&mut self) {
        let this = self.this.clone();
        let tick = self
            .tick
            .get_or_insert_with(|| Closure::wrap(Box::new(move || on_tick(&this)) as Box<dyn FnMut()>));
        match self
            .window
            .request_animation_frame(tick.as_ref().unchecked_ref())
        {
            Ok(id) => self.raf_id = Some(id),
            Err(e) => log::error!("[fluid] requestAnimationFrame failed: {:?}", e),
        }
    }

    fn cancel_frame(&mut self) {
        if let Some(id) = self.raf_id.take() {
            _ = self.window.cancel_animation_frame(id);
        }
    }

    fn attach_listeners(&mut self) {
        if let Err(e) = self.wire_listeners() {
            log::warn!("[fluid] listener setup incomplete: {:?}", e);
        }
        log::debug!("[fluid] {} listeners attached", self.listeners.len());
    }

    fn detach_listeners(&mut self) {
        self.listeners.clear();
    }

    fn release_surface(&mut self) {
        self.frame.gpu = None;
        if let Some(canvas) = self.canvas.take() {
            canvas.remove();
        }
    }
}

fn run_init(this: &WeakShared) {
    let Some(rc) = this.upgrade() else {
        return;
    };
    let canvas = {
        let Ok(mut lc) = rc.try_borrow_mut() else {
            return;
        };
        lc.host_mut().idle = None;
        if !lc.begin_init() {
            return;
        }
        match lc.host_mut().mount_canvas() {
            Ok(canvas) => canvas,
            Err(e) => {
                log::error!("[fluid] canvas setup failed: {:?}", e);
                lc.surface_ready(false);
                return;
            }
        }
    };
    let this = this.clone();
    spawn_local(async move {
        let gpu = render::GpuState::new(canvas).await;
        with_lifecycle(&this, |lc| match gpu {
            Ok(gpu) => {
                if lc.phase() != Phase::Initializing {
                    return;
                }
                let hidden = lc.host().document.hidden();
                lc.host_mut().frame.gpu = Some(gpu);
                lc.set_hidden(hidden);
                lc.surface_ready(true);
                log::info!("[fluid] started ({})", lc.phase().as_str());
            }
            Err(e) => {
                log::warn!("[gpu] init failed: {:?}", e);
                lc.surface_ready(false);
            }
        });
    });
}

fn on_tick(this: &WeakShared) {
    with_lifecycle(this, |lc| {
        lc.host_mut().raf_id = None;
        if !lc.on_frame() {
            return;
        }
        if lc.host_mut().frame.draw() == FrameStatus::DeviceLost {
            lc.context_lost();
            lc.host_mut().rebuild_gpu();
        }
    });
}

/// Owning handle behind the exported `FluidBackground`.
pub struct Background {
    shared: Shared,
    reduced_motion: bool,
}

impl Background {
    pub fn mount(
        container: web::HtmlElement,
        class_name: &str,
        scroll: Rc<RefCell<ScrollVelocity>>,
    ) -> anyhow::Result<Self> {
        let (window, document) =
            dom::window_document().ok_or_else(|| anyhow::anyhow!("no window/document"))?;
        dom::add_class_tokens(&container, class_name);
        let dark = dom::is_dark(&document);
        dom::set_fallback_background(&container, dark);

        let is_mobile = is_mobile_user_agent(&dom::user_agent(&window));
        let viewport = dom::viewport_size(&window);
        let profile = DeviceProfile::detect(viewport.x as f64, is_mobile);
        let reduced_motion = dom::prefers_reduced_motion(&window);
        log::info!(
            "[fluid] mount mobile={} trail={} particles={} reduced_motion={}",
            is_mobile,
            profile.trail_capacity,
            profile.particle_count,
            reduced_motion
        );

        let scene = FluidScene::new(profile, dark);
        let shared: Shared = Rc::new_cyclic(|weak| {
            RefCell::new(Lifecycle::new(WebHost {
                this: weak.clone(),
                window,
                document,
                container,
                is_mobile,
                canvas: None,
                frame: FrameContext::new(scene, scroll),
                listeners: Listeners::default(),
                init_cb: None,
                idle: None,
                tick: None,
                raf_id: None,
                rebuilding: false,
            }))
        });
        Ok(Self {
            shared,
            reduced_motion,
        })
    }

    pub fn start(&self, defer: bool) -> Result<Phase, LifecycleError> {
        self.shared.borrow_mut().start(StartOptions {
            reduced_motion: self.reduced_motion,
            defer,
        })
    }

    pub fn ready(&self) {
        self.shared.borrow_mut().signal_ready();
    }

    pub fn pause(&self) {
        self.shared.borrow_mut().pause();
    }

    pub fn resume(&self) {
        self.shared.borrow_mut().resume();
    }

    pub fn dispose(&self) {
        self.shared.borrow_mut().dispose();
    }

    pub fn phase(&self) -> Phase {
        self.shared.borrow().phase()
    }

    pub fn particle_count(&self) -> u32 {
        self.shared.borrow().host().frame.scene.profile().particle_count
    }

    pub fn listener_count(&self) -> usize {
        self.shared.borrow().host().listener_count()
    }
}

impl Drop for Background {
    fn drop(&mut self) {
        if let Ok(mut lc) = self.shared.try_borrow_mut() {
            lc.dispose();
        }
    }
}
