// Host-side tests for per-frame uniform assembly.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod fluid {
    pub mod constants {
        include!("../src/fluid/constants.rs");
    }
    pub mod math {
        include!("../src/fluid/math.rs");
    }
    pub mod noise {
        include!("../src/fluid/noise.rs");
    }
    pub mod trail {
        include!("../src/fluid/trail.rs");
    }
    pub mod field {
        include!("../src/fluid/field.rs");
    }
    pub mod palette {
        include!("../src/fluid/palette.rs");
    }
    pub mod device {
        include!("../src/fluid/device.rs");
    }
    pub mod scroll {
        include!("../src/fluid/scroll.rs");
    }
    pub mod scene {
        include!("../src/fluid/scene.rs");
    }
}

use fluid::constants::*;
use fluid::device::DeviceProfile;
use fluid::scene::*;
use fluid::scroll::ScrollSample;
use glam::Vec2;

const FRAME: f32 = 1.0 / 60.0;

fn desktop_scene() -> FluidScene {
    let mut scene = FluidScene::new(DeviceProfile::detect(1440.0, false), false);
    assert!(scene.resize(2880.0, 1800.0));
    scene
}

/// Sweep the pointer rightward at `speed` units/s for `frames` frames.
fn sweep_right(scene: &mut FluidScene, t: &mut f32, x: &mut f32, speed: f32, frames: usize) {
    for _ in 0..frames {
        *x += speed * FRAME;
        scene.pointer_moved(Vec2::new(*x, 0.5), *t);
        scene.step(*t, ScrollSample::default());
        *t += FRAME;
    }
}

#[test]
fn uniform_block_layout() {
    // Four 16-byte header rows, 24 trail points, 6 packed fade rows
    assert_eq!(std::mem::size_of::<FluidUniforms>(), 528);
    assert_eq!(std::mem::size_of::<FluidUniforms>() % 16, 0);
    let u = FluidUniforms::default();
    assert_eq!(u.trail_count, 0);
    assert!(u.trail_points.iter().all(|p| *p == TRAIL_SENTINEL));
}

#[test]
fn zero_sized_resize_keeps_last_resolution() {
    let mut scene = desktop_scene();
    assert!(!scene.resize(0.0, 900.0));
    assert!(!scene.resize(1600.0, 0.0));
    assert!(!scene.resize(f32::NAN, 900.0));
    assert_eq!(scene.resolution().as_array(), [2880.0, 1800.0]);
    let u = scene.step(0.0, ScrollSample::default());
    assert_eq!(u.resolution, [2880.0, 1800.0]);
    assert!(u.resolution[0] > 0.0 && u.resolution[1] > 0.0);
}

#[test]
fn time_never_runs_backwards() {
    let mut scene = desktop_scene();
    scene.step(2.0, ScrollSample::default());
    let u = scene.step(1.5, ScrollSample::default());
    assert_eq!(u.time, 2.0);
    let u = scene.step(2.1, ScrollSample::default());
    assert!((u.time - 2.1).abs() < 1e-6);
}

#[test]
fn pointer_follows_with_lerp() {
    let mut scene = desktop_scene();
    scene.pointer_moved(Vec2::new(1.0, 1.0), 0.0);
    let u = scene.step(0.0, ScrollSample::default());
    let expected = 0.5 + 0.5 * POINTER_LERP;
    assert!((u.pointer[0] - expected).abs() < 1e-6);
    assert!((u.pointer[1] - expected).abs() < 1e-6);
}

#[test]
fn trail_slots_past_live_count_hold_the_sentinel() {
    let mut scene = desktop_scene();
    let (mut t, mut x) = (0.0, 0.1);
    sweep_right(&mut scene, &mut t, &mut x, 0.5, 12);
    let u = *scene.uniforms();
    let live = u.trail_count as usize;
    assert!(live > 0);
    assert_eq!(live, scene.tracker().len());
    for i in 0..TRAIL_SLOTS {
        if i < live {
            assert!(u.trail_points[i][0] >= 0.0);
            assert!(u.fade(i) > 0.0 && u.fade(i) <= 1.0);
        } else {
            assert_eq!(u.trail_points[i], TRAIL_SENTINEL);
            assert_eq!(u.fade(i), 0.0);
        }
    }
}

#[test]
fn hole_opens_with_rightward_motion_and_closes_after() {
    let mut scene = desktop_scene();
    let (mut t, mut x) = (0.0, 0.1);
    sweep_right(&mut scene, &mut t, &mut x, 0.5, 30);
    assert_eq!(scene.uniforms().hole_intensity, 1.0);
    assert!(scene.uniforms().velocity[0] > HOLE_VELOCITY_GATE);

    for _ in 0..120 {
        scene.step(t, ScrollSample::default());
        t += FRAME;
    }
    let u = scene.uniforms();
    assert_eq!(u.hole_intensity, 0.0);
    assert_eq!(u.trail_count, 0);
}

#[test]
fn leftward_motion_never_opens_the_hole() {
    let mut scene = desktop_scene();
    let (mut t, mut x) = (0.0, 0.9);
    sweep_right(&mut scene, &mut t, &mut x, -0.5, 40);
    assert!(scene.uniforms().trail_count > 0);
    assert_eq!(scene.uniforms().hole_intensity, 0.0);
}

#[test]
fn theme_toggle_fades_without_touching_resolution() {
    let mut scene = desktop_scene();
    let mut t = 0.0;
    scene.step(t, ScrollSample::default());
    scene.set_dark(true);
    t += FRAME;
    let first = scene.step(t, ScrollSample::default()).dark_mode;
    assert!(first > 0.0 && first < 1.0);
    for _ in 0..120 {
        t += FRAME;
        scene.step(t, ScrollSample::default());
    }
    assert_eq!(scene.uniforms().dark_mode, 1.0);
    assert_eq!(scene.uniforms().resolution, [2880.0, 1800.0]);
}

#[test]
fn scroll_velocity_drifts_the_field() {
    let mut scene = desktop_scene();
    scene.step(0.0, ScrollSample::default());
    let scroll = ScrollSample {
        velocity: 1.0,
        strength: 1.0,
    };
    let u = scene.step(1.0, scroll);
    assert!((u.scroll_drift - SCROLL_DRIFT_RATE).abs() < 1e-6);
    let u = scene.step(2.0, ScrollSample::default());
    assert!((u.scroll_drift - SCROLL_DRIFT_RATE).abs() < 1e-6);
}

#[test]
fn switching_to_a_mobile_profile_shrinks_the_trail() {
    let mut scene = desktop_scene();
    let (mut t, mut x) = (0.0, 0.05);
    // Fast enough that points outlive the buffer
    sweep_right(&mut scene, &mut t, &mut x, 0.6, 24);
    assert!(scene.tracker().len() > TRAIL_CAPACITY_MOBILE);
    scene.set_profile(DeviceProfile::detect(390.0, true));
    assert_eq!(scene.tracker().len(), TRAIL_CAPACITY_MOBILE);
    assert_eq!(scene.profile().particle_count, PARTICLE_COUNT_MOBILE);
}

#[test]
fn shaded_pixels_are_valid_colours() {
    let mut scene = desktop_scene();
    let (mut t, mut x) = (0.0, 0.2);
    sweep_right(&mut scene, &mut t, &mut x, 0.5, 20);
    let u = *scene.uniforms();
    for gy in 0..6 {
        for gx in 0..6 {
            let frag = Vec2::new(gx as f32 * 500.0 + 10.0, gy as f32 * 300.0 + 10.0);
            let c = u.shade(frag);
            assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0, "{:?}", c);
        }
    }
}

#[test]
fn dark_mode_shades_darker() {
    let mut scene = desktop_scene();
    let light = *scene.step(3.0, ScrollSample::default());
    let mut dark = light;
    dark.dark_mode = 1.0;
    let frag = Vec2::new(700.0, 400.0);
    assert!(dark.shade(frag).length() < light.shade(frag).length());
}
