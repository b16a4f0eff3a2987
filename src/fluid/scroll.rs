// Scroll velocity shared by every renderer on the page.
//
// A stronger scroll impulse replaces the current one, which then eases back to
// rest over `SCROLL_DECAY_MS`. Times are milliseconds on the page clock.

use super::constants::{SCROLL_CLAMP_PX_PER_SEC, SCROLL_DECAY_MS, SCROLL_NORM_PX_PER_SEC};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollSample {
    /// Signed, normalized velocity in [-2, 2] (positive scrolls down).
    pub velocity: f32,
    /// Impulse strength in [0, 1].
    pub strength: f32,
}

#[derive(Clone, Copy, Debug, Default)]
struct Impulse {
    velocity: f64,
    strength: f64,
    at_ms: f64,
}

#[derive(Clone, Debug, Default)]
pub struct ScrollVelocity {
    last: Option<(f64, f64)>,
    impulse: Option<Impulse>,
}

// sine.inOut
#[inline]
fn ease_sine_in_out(t: f64) -> f64 {
    -((std::f64::consts::PI * t).cos() - 1.0) / 2.0
}

impl ScrollVelocity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_scroll(&mut self, scroll_y: f64, now_ms: f64) {
        let Some((last_y, last_ms)) = self.last else {
            self.last = Some((scroll_y, now_ms));
            return;
        };
        let dt = now_ms - last_ms;
        if dt <= 0.0 {
            return;
        }
        let raw = ((scroll_y - last_y) / dt * 1000.0)
            .clamp(-SCROLL_CLAMP_PX_PER_SEC, SCROLL_CLAMP_PX_PER_SEC);
        let norm = raw / SCROLL_NORM_PX_PER_SEC;
        let strength = norm.abs().min(1.0);
        if strength > self.sample(now_ms).strength as f64 {
            self.impulse = Some(Impulse {
                velocity: norm,
                strength,
                at_ms: now_ms,
            });
        }
        self.last = Some((scroll_y, now_ms));
    }

    pub fn sample(&self, now_ms: f64) -> ScrollSample {
        let Some(imp) = self.impulse else {
            return ScrollSample::default();
        };
        let t = ((now_ms - imp.at_ms) / SCROLL_DECAY_MS).clamp(0.0, 1.0);
        let remain = 1.0 - ease_sine_in_out(t);
        ScrollSample {
            velocity: (imp.velocity * remain) as f32,
            strength: (imp.strength * remain) as f32,
        }
    }
}
