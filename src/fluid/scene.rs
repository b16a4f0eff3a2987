// Per-frame state of one background and the uniform block it produces.

use super::constants::*;
use super::device::DeviceProfile;
use super::field::{self, HoleIntensity};
use super::noise::{noise_field, pointer_offset};
use super::palette::{compose, Palette, ThemeMix};
use super::scroll::ScrollSample;
use super::trail::{SampleOutcome, TrailSnapshot, TrailTracker};
use glam::{Vec2, Vec3};

/// GPU uniform block; layout matches `Uniforms` in `shaders/fluid.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FluidUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub dark_mode: f32,
    pub pointer: [f32; 2],
    pub velocity: [f32; 2],
    pub pointer_influence: f32,
    pub hole_intensity: f32,
    pub trail_count: u32,
    pub scroll_drift: f32,
    pub trail_points: [[f32; 4]; TRAIL_SLOTS],
    pub trail_fades: [[f32; 4]; TRAIL_SLOTS / 4],
}

impl Default for FluidUniforms {
    fn default() -> Self {
        let mut u = <Self as bytemuck::Zeroable>::zeroed();
        u.resolution = [1.0, 1.0];
        u.pointer = [0.5, 0.5];
        u.pointer_influence = POINTER_INFLUENCE;
        u.trail_points = [TRAIL_SENTINEL; TRAIL_SLOTS];
        u
    }
}

impl FluidUniforms {
    fn pack_fades(fades: &[f32; TRAIL_SLOTS]) -> [[f32; 4]; TRAIL_SLOTS / 4] {
        let mut packed = [[0.0; 4]; TRAIL_SLOTS / 4];
        for (dst, src) in packed.iter_mut().zip(fades.chunks_exact(4)) {
            dst.copy_from_slice(src);
        }
        packed
    }

    #[inline]
    pub fn fade(&self, slot: usize) -> f32 {
        self.trail_fades[slot / 4][slot % 4]
    }

    /// The trail as the field functions see it.
    pub fn trail(&self) -> TrailSnapshot {
        let mut fades = [0.0; TRAIL_SLOTS];
        for (i, f) in fades.iter_mut().enumerate() {
            *f = self.fade(i);
        }
        TrailSnapshot {
            points: self.trail_points,
            fades,
            live: self.trail_count as usize,
        }
    }

    /// CPU evaluation of the fragment program at pixel `frag` (origin bottom-left).
    pub fn shade(&self, frag: Vec2) -> Vec3 {
        let res = Vec2::from(self.resolution);
        let aspect = res.x / res.y;
        let uv = frag / res;
        let pointer = Vec2::from(self.pointer);

        let noise_at = |uv: Vec2| {
            let uv_aspect = Vec2::new(uv.x * aspect, uv.y + self.scroll_drift);
            let pointer_aspect = Vec2::new(pointer.x * aspect, pointer.y + self.scroll_drift);
            let offset = pointer_offset(uv_aspect, pointer_aspect, self.pointer_influence);
            noise_field(uv_aspect + offset, self.time)
        };
        let noise = noise_at(uv);
        // One-pixel finite differences stand in for fwidth()
        let px = Vec2::ONE / res;
        let fwidth = (noise_at(uv + Vec2::new(px.x, 0.0)) - noise).abs()
            + (noise_at(uv + Vec2::new(0.0, px.y)) - noise).abs();

        let shape = field::sample(
            uv,
            aspect,
            &self.trail(),
            pointer,
            Vec2::from(self.velocity),
            self.hole_intensity,
            self.time,
        );
        compose(noise, fwidth, shape, &Palette::mix(self.dark_mode))
    }
}

/// Drawing-buffer size. Zero or non-finite sizes are ignored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    width: f32,
    height: f32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
        }
    }
}

impl Resolution {
    /// Returns false (and keeps the last valid size) for a degenerate size.
    pub fn update(&mut self, width: f32, height: f32) -> bool {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    #[inline]
    pub fn as_array(&self) -> [f32; 2] {
        [self.width, self.height]
    }
}

/// Everything that changes from frame to frame, owned by one background.
#[derive(Clone, Debug)]
pub struct FluidScene {
    tracker: TrailTracker,
    hole: HoleIntensity,
    theme: ThemeMix,
    resolution: Resolution,
    profile: DeviceProfile,
    pointer: Vec2,
    scroll_drift: f32,
    last_time: Option<f32>,
    uniforms: FluidUniforms,
}

impl FluidScene {
    pub fn new(profile: DeviceProfile, dark: bool) -> Self {
        Self {
            tracker: TrailTracker::new(profile.trail_capacity),
            hole: HoleIntensity::default(),
            theme: ThemeMix::new(dark),
            resolution: Resolution::default(),
            profile,
            pointer: Vec2::splat(0.5),
            scroll_drift: 0.0,
            last_time: None,
            uniforms: FluidUniforms::default(),
        }
    }

    /// Stage a pointer sample; never draws.
    pub fn pointer_moved(&mut self, pos: Vec2, now: f32) -> SampleOutcome {
        self.tracker.on_pointer_move(pos, now)
    }

    pub fn set_dark(&mut self, dark: bool) {
        self.theme.set_dark(dark);
    }

    pub fn resize(&mut self, width_px: f32, height_px: f32) -> bool {
        self.resolution.update(width_px, height_px)
    }

    pub fn set_profile(&mut self, profile: DeviceProfile) {
        if profile.trail_capacity != self.profile.trail_capacity {
            self.tracker.set_capacity(profile.trail_capacity);
        }
        self.profile = profile;
    }

    /// Advance one frame: trail aging first, then smoothing, then the uniform block.
    pub fn step(&mut self, now: f32, scroll: ScrollSample) -> &FluidUniforms {
        let now = match self.last_time {
            Some(last) => now.max(last),
            None => now,
        };
        let dt = self.last_time.map_or(0.0, |last| now - last);
        self.last_time = Some(now);

        self.tracker.update(now);
        let trail = self.tracker.snapshot(now);

        let open = HoleIntensity::should_open(self.tracker.velocity(), !self.tracker.is_empty());
        let hole = self.hole.step(open);
        self.pointer = self.pointer.lerp(self.tracker.target(), POINTER_LERP);
        let dark = self.theme.step(dt);
        self.scroll_drift += scroll.velocity * SCROLL_DRIFT_RATE * dt;

        let velocity = self.tracker.velocity() * POINTER_VELOCITY_UPLOAD_SCALE;
        self.uniforms = FluidUniforms {
            resolution: self.resolution.as_array(),
            time: now,
            dark_mode: dark,
            pointer: self.pointer.to_array(),
            velocity: velocity.to_array(),
            pointer_influence: POINTER_INFLUENCE,
            hole_intensity: hole,
            trail_count: trail.live as u32,
            scroll_drift: self.scroll_drift,
            trail_points: trail.points,
            trail_fades: FluidUniforms::pack_fades(&trail.fades),
        };
        &self.uniforms
    }

    #[inline]
    pub fn uniforms(&self) -> &FluidUniforms {
        &self.uniforms
    }

    #[inline]
    pub fn tracker(&self) -> &TrailTracker {
        &self.tracker
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    #[inline]
    pub fn profile(&self) -> DeviceProfile {
        self.profile
    }
}
