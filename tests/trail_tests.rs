// Host-side tests for the pointer trail tracker.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod fluid {
    pub mod constants {
        include!("../src/fluid/constants.rs");
    }
    pub mod trail {
        include!("../src/fluid/trail.rs");
    }
}

use fluid::constants::*;
use fluid::trail::*;
use glam::Vec2;

/// Move the pointer `n` times from `start` by `step` every `dt` seconds,
/// starting at `t0`. Returns the time of the last sample.
fn drive(tracker: &mut TrailTracker, start: Vec2, step: Vec2, t0: f32, dt: f32, n: usize) -> f32 {
    let mut t = t0;
    for i in 0..n {
        t = t0 + i as f32 * dt;
        tracker.on_pointer_move(start + step * i as f32, t);
    }
    t
}

#[test]
fn first_sample_has_no_velocity_and_leaves_no_point() {
    let mut tracker = TrailTracker::new(TRAIL_CAPACITY_DESKTOP);
    let outcome = tracker.on_pointer_move(Vec2::new(0.2, 0.5), 0.0);
    assert_eq!(outcome, SampleOutcome::TooSlow);
    assert!(tracker.is_empty());
    assert_eq!(tracker.target(), Vec2::new(0.2, 0.5));
}

#[test]
fn steady_motion_is_accepted() {
    let mut tracker = TrailTracker::new(TRAIL_CAPACITY_DESKTOP);
    tracker.on_pointer_move(Vec2::new(0.1, 0.5), 0.0);
    let outcome = tracker.on_pointer_move(Vec2::new(0.11, 0.5), 0.04);
    assert_eq!(outcome, SampleOutcome::Accepted);
    assert_eq!(tracker.len(), 1);
    assert!(tracker.velocity().x > 0.0);
}

#[test]
fn steady_rightward_sweep_fills_the_trail() {
    let mut tracker = TrailTracker::new(TRAIL_CAPACITY_DESKTOP);
    let dt = 1.0 / 60.0;
    let mut max_len = 0;
    // One second at 60 Hz, half a screen per second
    for i in 0..60 {
        let now = i as f32 * dt;
        tracker.on_pointer_move(Vec2::new(0.2 + 0.5 * now, 0.5), now);
        tracker.update(now);
        max_len = max_len.max(tracker.len());
    }
    assert_eq!(max_len, tracker.buffer().capacity());
    assert_eq!(tracker.len(), TRAIL_CAPACITY_DESKTOP);
    for p in tracker.buffer().iter() {
        assert!(p.vel.x > 0.0, "{:?}", p);
        assert!(p.vel.y.abs() < 1e-6, "{:?}", p);
        assert!(!p.is_fading());
    }
}

#[test]
fn samples_inside_the_interval_are_throttled() {
    let mut tracker = TrailTracker::new(TRAIL_CAPACITY_DESKTOP);
    tracker.on_pointer_move(Vec2::new(0.1, 0.5), 0.0);
    assert_eq!(
        tracker.on_pointer_move(Vec2::new(0.11, 0.5), 0.04),
        SampleOutcome::Accepted
    );
    // 10 ms after the accepted point
    assert_eq!(
        tracker.on_pointer_move(Vec2::new(0.12, 0.5), 0.05),
        SampleOutcome::Throttled
    );
    assert_eq!(tracker.len(), 1);
    // The throttled sample still moves the follow target
    assert_eq!(tracker.target(), Vec2::new(0.12, 0.5));
}

#[test]
fn no_two_points_closer_than_the_minimum_interval() {
    let mut tracker = TrailTracker::new(TRAIL_SLOTS);
    drive(&mut tracker, Vec2::new(0.0, 0.5), Vec2::new(0.004, 0.0), 0.0, 0.01, 60);
    let borns: Vec<f32> = tracker.buffer().iter().map(|p| p.born).collect();
    assert!(borns.len() > 1);
    for pair in borns.windows(2) {
        assert!(pair[1] - pair[0] >= MIN_POINT_INTERVAL_SEC - 1e-6);
    }
}

#[test]
fn slow_motion_leaves_no_trail() {
    let mut tracker = TrailTracker::new(TRAIL_CAPACITY_DESKTOP);
    // 0.01 units/s, well under the speed gate
    drive(&mut tracker, Vec2::new(0.5, 0.5), Vec2::new(0.0004, 0.0), 0.0, 0.04, 20);
    assert!(tracker.is_empty());
}

#[test]
fn buffer_evicts_oldest_at_capacity() {
    let mut tracker = TrailTracker::new(TRAIL_CAPACITY_DESKTOP);
    drive(&mut tracker, Vec2::new(0.1, 0.5), Vec2::new(0.01, 0.0), 0.0, 0.04, 30);
    assert_eq!(tracker.len(), TRAIL_CAPACITY_DESKTOP);
    let xs: Vec<f32> = tracker.buffer().iter().map(|p| p.pos.x).collect();
    // Newest sample is x = 0.1 + 29 * 0.01; survivors are the last twelve
    assert!((xs[xs.len() - 1] - 0.39).abs() < 1e-5);
    assert!((xs[0] - (0.39 - 0.01 * (TRAIL_CAPACITY_DESKTOP - 1) as f32)).abs() < 1e-5);
}

#[test]
fn buffer_capacity_is_clamped_to_slots() {
    let buffer = TrailBuffer::new(100);
    assert_eq!(buffer.capacity(), TRAIL_SLOTS);
    let buffer = TrailBuffer::new(0);
    assert_eq!(buffer.capacity(), 1);
}

#[test]
fn shrinking_capacity_drops_oldest() {
    let mut tracker = TrailTracker::new(TRAIL_CAPACITY_DESKTOP);
    drive(&mut tracker, Vec2::new(0.1, 0.5), Vec2::new(0.01, 0.0), 0.0, 0.04, 20);
    let newest = tracker.buffer().iter().last().map(|p| p.born);
    tracker.set_capacity(TRAIL_CAPACITY_MOBILE);
    assert_eq!(tracker.len(), TRAIL_CAPACITY_MOBILE);
    assert_eq!(tracker.buffer().iter().last().map(|p| p.born), newest);
}

#[test]
fn fade_decreases_monotonically() {
    let point = TrailPoint {
        pos: Vec2::splat(0.5),
        vel: Vec2::ZERO,
        born: 0.0,
        fade_start: None,
    };
    let mut prev = point.fade(0.0);
    assert_eq!(prev, 1.0);
    for i in 1..=60 {
        let f = point.fade(i as f32 * 0.01);
        assert!(f <= prev);
        assert!((0.0..=1.0).contains(&f));
        prev = f;
    }
    assert_eq!(prev, 0.0);
}

#[test]
fn direction_fade_never_raises_the_fade() {
    // Fast fade starts at 0.2 s, when the normal fade is already 0.6
    let point = TrailPoint {
        pos: Vec2::splat(0.5),
        vel: Vec2::ZERO,
        born: 0.0,
        fade_start: Some(0.2),
    };
    let mut prev = point.fade(0.0);
    for i in 1..=60 {
        let f = point.fade(i as f32 * 0.01);
        assert!(f <= prev, "fade rose at step {}", i);
        prev = f;
    }
    assert!(point.is_expired(0.51));
}

#[test]
fn points_expire_after_the_decay_window() {
    let point = TrailPoint {
        pos: Vec2::splat(0.5),
        vel: Vec2::ZERO,
        born: 1.0,
        fade_start: None,
    };
    assert!(!point.is_expired(1.0 + NORMAL_DECAY_SEC - 0.01));
    assert!(point.is_expired(1.0 + NORMAL_DECAY_SEC));

    let fading = TrailPoint {
        fade_start: Some(1.0),
        ..point
    };
    assert!(!fading.is_expired(1.0 + DIRECTION_FADE_SEC - 0.01));
    assert!(fading.is_expired(1.0 + DIRECTION_FADE_SEC + 0.01));
}

#[test]
fn update_removes_decayed_points() {
    let mut tracker = TrailTracker::new(TRAIL_CAPACITY_DESKTOP);
    let last = drive(&mut tracker, Vec2::new(0.1, 0.5), Vec2::new(0.01, 0.0), 0.0, 0.04, 8);
    assert!(!tracker.is_empty());
    tracker.update(last + NORMAL_DECAY_SEC + 0.01);
    assert!(tracker.is_empty());
}

#[test]
fn update_advances_points_with_friction() {
    let mut tracker = TrailTracker::new(TRAIL_CAPACITY_DESKTOP);
    tracker.on_pointer_move(Vec2::new(0.1, 0.5), 0.0);
    tracker.on_pointer_move(Vec2::new(0.11, 0.5), 0.04);
    let before = *tracker.buffer().iter().next().unwrap();
    tracker.update(0.05);
    let after = *tracker.buffer().iter().next().unwrap();
    assert!((after.pos - (before.pos + before.vel)).length() < 1e-6);
    assert!((after.vel - before.vel * POINT_FRICTION).length() < 1e-6);
    assert!(before.vel.length() <= POINT_VELOCITY_MAX + 1e-6);
}

#[test]
fn pointer_velocity_is_damped_each_frame() {
    let mut tracker = TrailTracker::new(TRAIL_CAPACITY_DESKTOP);
    drive(&mut tracker, Vec2::new(0.1, 0.5), Vec2::new(0.01, 0.0), 0.0, 0.04, 5);
    let v0 = tracker.velocity();
    tracker.update(0.2);
    assert!((tracker.velocity() - v0 * POINTER_VELOCITY_DAMPING).length() < 1e-6);
}

#[test]
fn reversal_marks_existing_points_and_they_expire_quickly() {
    let mut tracker = TrailTracker::new(TRAIL_CAPACITY_DESKTOP);
    let last = drive(&mut tracker, Vec2::new(0.1, 0.5), Vec2::new(0.01, 0.0), 0.0, 0.04, 6);
    let before = tracker.len();
    assert!(before > 1);

    // Sharp move back to the left
    let t_rev = last + 0.04;
    let outcome = tracker.on_pointer_move(Vec2::new(0.1, 0.5), t_rev);
    assert_eq!(outcome, SampleOutcome::Reversed);
    let fading = tracker.buffer().iter().filter(|p| p.is_fading()).count();
    assert_eq!(fading, before);
    assert_eq!(tracker.len(), before + 1);

    // All marked points are gone within the fast-fade window
    tracker.update(t_rev + DIRECTION_FADE_SEC + 0.01);
    assert_eq!(tracker.len(), 1);
    assert!(tracker.buffer().iter().all(|p| !p.is_fading()));
}

#[test]
fn snapshot_pads_with_sentinels() {
    let mut tracker = TrailTracker::new(TRAIL_CAPACITY_DESKTOP);
    let last = drive(&mut tracker, Vec2::new(0.1, 0.5), Vec2::new(0.01, 0.0), 0.0, 0.04, 4);
    let snap = tracker.snapshot(last);
    assert_eq!(snap.live, tracker.len());
    for i in 0..TRAIL_SLOTS {
        if i < snap.live {
            assert!(!TrailSnapshot::is_sentinel(&snap.points[i]));
            assert!(snap.fades[i] > 0.0);
        } else {
            assert_eq!(snap.points[i], TRAIL_SENTINEL);
            assert_eq!(snap.fades[i], 0.0);
        }
    }
    // Velocities are uploaded scaled
    let first = tracker.buffer().iter().next().unwrap();
    assert!((snap.points[0][2] - first.vel.x * TRAIL_VELOCITY_UPLOAD_SCALE).abs() < 1e-5);
}

#[test]
fn empty_snapshot_is_all_sentinels() {
    let tracker = TrailTracker::new(TRAIL_CAPACITY_MOBILE);
    let snap = tracker.snapshot(0.0);
    assert_eq!(snap.live, 0);
    assert!(snap.points.iter().all(TrailSnapshot::is_sentinel));
}

#[test]
fn pointer_normalization_flips_y() {
    let vp = Vec2::new(800.0, 600.0);
    assert_eq!(normalize_pointer(Vec2::new(0.0, 0.0), vp), Some(Vec2::new(0.0, 1.0)));
    assert_eq!(normalize_pointer(Vec2::new(400.0, 600.0), vp), Some(Vec2::new(0.5, 0.0)));
    assert_eq!(normalize_pointer(Vec2::new(10.0, 10.0), Vec2::new(0.0, 600.0)), None);
}
