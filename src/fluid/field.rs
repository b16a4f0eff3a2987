// Metaball blob built from the trail, and the hole cut through it.

use super::constants::*;
use super::math::smoothstep;
use super::noise::{domain_warp, fluid_distort};
use super::trail::TrailSnapshot;
use glam::Vec2;

/// Smooth cubic falloff: 1 at the centre, 0 at `radius` and beyond.
#[inline]
pub fn metaball(dist: f32, radius: f32) -> f32 {
    if dist >= radius {
        return 0.0;
    }
    let t = dist / radius;
    let t2 = t * t;
    1.0 - t2 * t2 * (3.0 - 2.0 * t2)
}

/// Accumulate one contribution without saturating where metaballs overlap.
#[inline]
pub fn blend(acc: f32, contribution: f32) -> f32 {
    acc + contribution - acc * contribution * METABALL_BLEND_K
}

/// Normalized distance to a comet-shaped blob: a rounder head in the direction
/// of travel and a longer, narrower tail behind it. 1.0 is the blob surface.
pub fn organic_distance(
    uv: Vec2,
    center: Vec2,
    velocity: Vec2,
    size: f32,
    time: f32,
    seed: f32,
) -> f32 {
    let speed = velocity.length();
    let dir = if speed > 0.0003 { velocity / speed } else { Vec2::X };
    let perp = dir.perp();

    let warp_offset = Vec2::new(seed * 5.0, seed * 11.0);
    let warp = domain_warp(uv, 0.4, time * 0.3 + seed, warp_offset) * 0.05;
    let to_center = uv - center + warp;

    let along = to_center.dot(dir);
    let across = to_center.dot(perp);

    let front_scale = 1.05;
    let back_scale = (1.3 + speed * 1.5).min(2.0);
    let scaled_along = if along > 0.0 {
        along / front_scale
    } else {
        along / back_scale
    };

    let mut taper = 1.2;
    if along < 0.0 && speed > 0.1 {
        let tail = -along / size;
        taper = (1.2 + tail * speed * 1.5).min(2.0);
    }

    Vec2::new(scaled_along, across * taper).length() / size
}

/// Blob coverage in [0, 1] at `uv` (0..1 viewport space).
pub fn blob_field(uv: Vec2, aspect: f32, trail: &TrailSnapshot, time: f32) -> f32 {
    if trail.live == 0 {
        return 0.0;
    }
    let uv_aspect = Vec2::new(uv.x * aspect, uv.y);
    let fluid_uv = uv_aspect + fluid_distort(uv_aspect, time * 0.06, 0.15);

    let mut total = 0.0;
    let slots = trail.points.iter().zip(trail.fades.iter());
    for (i, (slot, fade)) in slots.enumerate().take(trail.live) {
        if TrailSnapshot::is_sentinel(slot) {
            continue;
        }
        let fade = fade * fade;
        if fade < BLOB_MIN_FADE {
            continue;
        }
        let pos = Vec2::new(slot[0] * aspect, slot[1]);
        let vel = Vec2::new(slot[2], slot[3]);
        let speed = vel.length();
        let seed = i as f32 * 1.7 + 0.3;

        let head_tail = BLOB_TAIL_RATIO + fade * (1.0 - BLOB_TAIL_RATIO);
        let boost = (speed * BLOB_SPEED_BOOST).min(BLOB_SPEED_BOOST_MAX);
        let size = (BLOB_BASE_SIZE + boost) * head_tail;

        let dist = organic_distance(fluid_uv, pos, vel, size, time * 0.04, seed);
        total = blend(total, metaball(dist, 1.0) * fade);
    }
    smoothstep(BLOB_EDGE.0, BLOB_EDGE.1, total)
}

/// Hole coverage in [0, 1]: an ellipse at the pointer stretched along its motion.
///
/// `velocity` is the uploaded pointer velocity (already scaled by
/// `POINTER_VELOCITY_UPLOAD_SCALE`).
pub fn hole_field(
    uv: Vec2,
    aspect: f32,
    pointer: Vec2,
    velocity: Vec2,
    intensity: f32,
    time: f32,
) -> f32 {
    let uv_aspect = Vec2::new(uv.x * aspect, uv.y);
    let fluid_uv = uv_aspect + fluid_distort(uv_aspect, time * 0.06, 0.15);

    let vel = velocity * 100.0;
    let speed = vel.length();
    let dir = if speed > 0.01 { vel / speed } else { Vec2::X };
    let perp = dir.perp();

    let size = 0.05 + (speed * 0.08).min(0.05);
    let pointer_aspect = Vec2::new(pointer.x * aspect, pointer.y);
    let warp_time = time * 0.012 + 50.0;
    let warp = domain_warp(fluid_uv, 0.4, warp_time, Vec2::new(250.0, 550.0)) * 0.04;
    let to_hole = fluid_uv - pointer_aspect + warp;

    let elongation = (1.3 + speed).min(2.0);
    let along = to_hole.dot(dir) / elongation;
    let across = to_hole.dot(perp) * 1.25;

    let dist = Vec2::new(along, across).length() / size;
    smoothstep(HOLE_EDGE.0, HOLE_EDGE.1, metaball(dist, 1.0)) * intensity
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BlobSample {
    pub blob: f32,
    pub hole: f32,
}

/// Evaluate blob and hole for one pixel. The hole only exists inside a visible blob.
pub fn sample(
    uv: Vec2,
    aspect: f32,
    trail: &TrailSnapshot,
    pointer: Vec2,
    velocity: Vec2,
    hole_intensity: f32,
    time: f32,
) -> BlobSample {
    let blob = blob_field(uv, aspect, trail, time);
    let hole = if hole_intensity > HOLE_MIN_INTENSITY && blob > BLOB_VISIBLE {
        hole_field(uv, aspect, pointer, velocity, hole_intensity, time)
    } else {
        0.0
    };
    BlobSample { blob, hole }
}

/// Per-frame smoothing of the hole visibility with separate attack and release steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoleIntensity {
    value: f32,
    attack: f32,
    release: f32,
}

impl Default for HoleIntensity {
    fn default() -> Self {
        Self::new(HOLE_ATTACK_PER_FRAME, HOLE_RELEASE_PER_FRAME)
    }
}

impl HoleIntensity {
    pub fn new(attack: f32, release: f32) -> Self {
        Self {
            value: 0.0,
            attack,
            release,
        }
    }

    /// Opens while the pointer moves forward (rightward) with a live trail.
    #[inline]
    pub fn should_open(pointer_velocity: Vec2, has_trail: bool) -> bool {
        has_trail && pointer_velocity.x * POINTER_VELOCITY_UPLOAD_SCALE > HOLE_VELOCITY_GATE
    }

    pub fn step(&mut self, open: bool) -> f32 {
        self.value = if open {
            (self.value + self.attack).min(1.0)
        } else {
            (self.value - self.release).max(0.0)
        };
        self.value
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }
}
