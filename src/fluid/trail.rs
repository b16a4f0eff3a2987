// Pointer trail: rate-limited pointer samples with time-based decay.

use super::constants::*;
use glam::Vec2;
use std::collections::VecDeque;

/// One accepted pointer sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
    /// Per-frame displacement applied by [`TrailTracker::update`].
    pub vel: Vec2,
    pub born: f32,
    /// Set when a direction change was detected; the point then decays on the
    /// shorter window measured from this instant.
    pub fade_start: Option<f32>,
}

impl TrailPoint {
    #[inline]
    fn normal_fade(&self, now: f32) -> f32 {
        1.0 - (now - self.born) / NORMAL_DECAY_SEC
    }

    #[inline]
    fn direction_fade(&self, now: f32) -> Option<f32> {
        self.fade_start.map(|t| 1.0 - (now - t) / DIRECTION_FADE_SEC)
    }

    // The faster of the two decays wins, so a fade never jumps back up.
    #[inline]
    fn raw_fade(&self, now: f32) -> f32 {
        let normal = self.normal_fade(now);
        match self.direction_fade(now) {
            Some(fast) => normal.min(fast),
            None => normal,
        }
    }

    /// 1 when fresh, 0 when fully decayed.
    pub fn fade(&self, now: f32) -> f32 {
        self.raw_fade(now).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn is_fading(&self) -> bool {
        self.fade_start.is_some()
    }

    /// A point expires exactly when its fade would reach zero.
    #[inline]
    pub fn is_expired(&self, now: f32) -> bool {
        self.raw_fade(now) <= 0.0
    }
}

/// Fixed-capacity FIFO of trail points. Pushing beyond capacity evicts the oldest.
#[derive(Clone, Debug)]
pub struct TrailBuffer {
    points: VecDeque<TrailPoint>,
    capacity: usize,
}

impl TrailBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, TRAIL_SLOTS);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Live points, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    pub fn push(&mut self, point: TrailPoint) {
        while self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.clamp(1, TRAIL_SLOTS);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    fn retain(&mut self, keep: impl FnMut(&TrailPoint) -> bool) {
        self.points.retain(keep);
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut TrailPoint> {
        self.points.iter_mut()
    }

    /// Write live points into the first slots and the sentinel into the rest.
    pub fn fill_slots(
        &self,
        now: f32,
        points: &mut [[f32; 4]; TRAIL_SLOTS],
        fades: &mut [f32; TRAIL_SLOTS],
    ) -> usize {
        let live = self.points.len().min(TRAIL_SLOTS);
        let slots = points.iter_mut().zip(fades.iter_mut());
        for (i, (slot, fade)) in slots.enumerate() {
            match self.points.get(i) {
                Some(p) if i < live => {
                    *slot = [
                        p.pos.x,
                        p.pos.y,
                        p.vel.x * TRAIL_VELOCITY_UPLOAD_SCALE,
                        p.vel.y * TRAIL_VELOCITY_UPLOAD_SCALE,
                    ];
                    *fade = p.fade(now);
                }
                _ => {
                    *slot = TRAIL_SENTINEL;
                    *fade = 0.0;
                }
            }
        }
        live
    }
}

/// What happened to a pointer sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleOutcome {
    /// Within the minimum interval of the last accepted point.
    Throttled,
    /// Pointer moving too slowly to leave a trail.
    TooSlow,
    Accepted,
    /// Accepted, and the direction change started a fast fade on the existing trail.
    Reversed,
}

/// Snapshot of the trail in GPU slot layout. Slots past `live` hold the sentinel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailSnapshot {
    pub points: [[f32; 4]; TRAIL_SLOTS],
    pub fades: [f32; TRAIL_SLOTS],
    pub live: usize,
}

impl Default for TrailSnapshot {
    fn default() -> Self {
        Self {
            points: [TRAIL_SENTINEL; TRAIL_SLOTS],
            fades: [0.0; TRAIL_SLOTS],
            live: 0,
        }
    }
}

impl TrailSnapshot {
    #[inline]
    pub fn is_sentinel(slot: &[f32; 4]) -> bool {
        slot[0] < 0.0
    }
}

/// Map a pointer position in CSS pixels to normalized viewport space (y up).
pub fn normalize_pointer(px: Vec2, viewport: Vec2) -> Option<Vec2> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(px.x / viewport.x, 1.0 - px.y / viewport.y))
}

/// Tracks the pointer and owns the trail buffer.
#[derive(Clone, Debug)]
pub struct TrailTracker {
    buffer: TrailBuffer,
    velocity: Vec2,
    last_pos: Option<Vec2>,
    last_sample: f32,
    last_point: Option<f32>,
    last_direction: Option<Vec2>,
    target: Vec2,
}

impl TrailTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: TrailBuffer::new(capacity),
            velocity: Vec2::ZERO,
            last_pos: None,
            last_sample: 0.0,
            last_point: None,
            last_direction: None,
            target: Vec2::splat(0.5),
        }
    }

    pub fn on_pointer_move(&mut self, pos: Vec2, now: f32) -> SampleOutcome {
        if let Some(prev) = self.last_pos {
            let dt = now - self.last_sample;
            if dt > 0.0 && dt < VELOCITY_SAMPLE_MAX_DT {
                let raw = (pos - prev) / dt;
                let keep = VELOCITY_EMA_KEEP;
                self.velocity = self.velocity * keep + raw * (1.0 - keep);
            }
        }
        self.last_pos = Some(pos);
        self.last_sample = now;
        self.target = pos;

        if let Some(t) = self.last_point {
            if now - t < MIN_POINT_INTERVAL_SEC {
                return SampleOutcome::Throttled;
            }
        }
        let speed = self.velocity.length();
        if speed < MIN_POINT_SPEED {
            return SampleOutcome::TooSlow;
        }
        self.last_point = Some(now);

        let dir = self.velocity / speed;
        let mut outcome = SampleOutcome::Accepted;
        if let Some(prev_dir) = self.last_direction {
            if dir.dot(prev_dir) < DIRECTION_CHANGE_COS {
                for p in self.buffer.iter_mut().filter(|p| !p.is_fading()) {
                    p.fade_start = Some(now);
                }
                outcome = SampleOutcome::Reversed;
            }
        }
        self.last_direction = Some(dir);

        let vel_scale = (speed * POINT_VELOCITY_SCALE).min(POINT_VELOCITY_MAX);
        self.buffer.push(TrailPoint {
            pos,
            vel: dir * vel_scale,
            born: now,
            fade_start: None,
        });
        outcome
    }

    /// Per-frame aging: cull expired points, then advance the survivors.
    pub fn update(&mut self, now: f32) {
        self.buffer.retain(|p| !p.is_expired(now));
        for p in self.buffer.iter_mut() {
            p.pos += p.vel;
            p.vel *= POINT_FRICTION;
        }
        self.velocity *= POINTER_VELOCITY_DAMPING;
    }

    pub fn snapshot(&self, now: f32) -> TrailSnapshot {
        let mut snap = TrailSnapshot::default();
        snap.live = self.buffer.fill_slots(now, &mut snap.points, &mut snap.fades);
        snap
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.buffer.set_capacity(capacity);
    }

    #[inline]
    pub fn buffer(&self) -> &TrailBuffer {
        &self.buffer
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Smoothed pointer velocity in normalized units per second.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Latest raw pointer position, the cursor-follow target.
    #[inline]
    pub fn target(&self) -> Vec2 {
        self.target
    }
}
