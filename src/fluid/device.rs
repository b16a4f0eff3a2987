// Device-class detection feeding pixel ratio, trail size and particle counts.

use super::constants::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceProfile {
    pub pixel_ratio_cap: f64,
    pub trail_capacity: usize,
    pub particle_count: u32,
    pub is_mobile: bool,
}

impl DeviceProfile {
    /// Pure function of viewport width (CSS px) and the mobile classification.
    pub fn detect(viewport_width: f64, is_mobile: bool) -> Self {
        let narrow = viewport_width <= NARROW_VIEWPORT_MAX_WIDTH;
        let (pixel_ratio_cap, trail_capacity) = if is_mobile {
            (PIXEL_RATIO_CAP_MOBILE, TRAIL_CAPACITY_MOBILE)
        } else {
            (PIXEL_RATIO_CAP_DESKTOP, TRAIL_CAPACITY_DESKTOP)
        };
        let particle_count = if is_mobile || narrow {
            PARTICLE_COUNT_MOBILE
        } else {
            PARTICLE_COUNT_DESKTOP
        };
        Self {
            pixel_ratio_cap,
            trail_capacity,
            particle_count,
            is_mobile,
        }
    }

    /// Effective pixel ratio for the canvas backing store.
    pub fn pixel_ratio(&self, device_pixel_ratio: f64) -> f64 {
        if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
            return 1.0;
        }
        device_pixel_ratio.min(self.pixel_ratio_cap)
    }
}

/// User-agent sniff for phones and tablets.
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    MOBILE_UA_TOKENS.iter().any(|t| ua.contains(t))
}
