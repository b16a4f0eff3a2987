use crate::fluid::trail::normalize_pointer;
use crate::fluid::{FluidScene, ScrollVelocity};
use crate::render;
use glam::Vec2;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    Drawn,
    Skipped,
    DeviceLost,
}

/// Everything one animation frame touches.
pub struct FrameContext {
    pub scene: FluidScene,
    pub gpu: Option<render::GpuState>,
    scroll: Rc<RefCell<ScrollVelocity>>,
    epoch: Instant,
}

impl FrameContext {
    pub fn new(scene: FluidScene, scroll: Rc<RefCell<ScrollVelocity>>) -> Self {
        Self {
            scene,
            gpu: None,
            scroll,
            epoch: Instant::now(),
        }
    }

    /// Seconds since mount; pointer samples and frames share this clock.
    #[inline]
    pub fn now(&self) -> f32 {
        self.epoch.elapsed().as_secs_f32()
    }

    pub fn pointer_moved(&mut self, client_px: Vec2, viewport: Vec2) {
        let now = self.now();
        if let Some(pos) = normalize_pointer(client_px, viewport) {
            self.scene.pointer_moved(pos, now);
        }
    }

    /// New drawing-buffer size in device pixels.
    pub fn resize(&mut self, width_px: u32, height_px: u32) {
        if !self.scene.resize(width_px as f32, height_px as f32) {
            return;
        }
        if let Some(g) = &mut self.gpu {
            g.resize(width_px, height_px);
        }
    }

    pub fn draw(&mut self) -> FrameStatus {
        let now = self.now();
        let Some(gpu) = self.gpu.as_mut() else {
            return FrameStatus::Skipped;
        };
        if gpu.is_lost() {
            return FrameStatus::DeviceLost;
        }
        let scroll = self.scroll.borrow().sample(js_sys::Date::now());
        let uniforms = self.scene.step(now, scroll);
        match gpu.render(uniforms) {
            Ok(()) => FrameStatus::Drawn,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::info!("[gpu] surface outdated; reconfiguring");
                gpu.reconfigure();
                FrameStatus::Skipped
            }
            Err(e) => {
                log::warn!("[gpu] frame skipped: {:?}", e);
                FrameStatus::Skipped
            }
        }
    }
}
