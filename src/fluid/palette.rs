// Contour lines, the filled band, and the light/dark palettes.

use super::constants::*;
use super::field::BlobSample;
use super::math::smoothstep;
use glam::Vec3;

/// The four colours of the background, linear 0..1 RGB.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub background: Vec3,
    pub line: Vec3,
    pub blob: Vec3,
    pub fill: Vec3,
}

impl Palette {
    // Stone scale: 100 background, 300 lines
    pub const LIGHT: Palette = Palette {
        background: Vec3::new(0.961, 0.961, 0.957),
        line: Vec3::new(0.839, 0.827, 0.820),
        blob: Vec3::new(0.873, 0.863, 0.857),
        fill: Vec3::new(0.749, 0.731, 0.720),
    };

    // Stone scale: 950 background, 700 lines
    pub const DARK: Palette = Palette {
        background: Vec3::new(0.047, 0.039, 0.035),
        line: Vec3::new(0.267, 0.251, 0.235),
        blob: Vec3::new(0.090, 0.078, 0.071),
        fill: Vec3::new(0.267, 0.251, 0.235),
    };

    /// Interpolate between the light (0) and dark (1) palettes.
    pub fn mix(dark: f32) -> Palette {
        let t = dark.clamp(0.0, 1.0);
        let (l, d) = (Self::LIGHT, Self::DARK);
        Palette {
            background: l.background.lerp(d.background, t),
            line: l.line.lerp(d.line, t),
            blob: l.blob.lerp(d.blob, t),
            fill: l.fill.lerp(d.fill, t),
        }
    }
}

/// Antialiased contour at `threshold`. `fwidth` is the screen-space rate of
/// change of `value` (what the shader gets from `fwidth()`).
#[inline]
pub fn isoline(value: f32, threshold: f32, fwidth: f32, line_width: f32) -> f32 {
    let edge = (fwidth * line_width).max(f32::EPSILON);
    smoothstep(threshold - edge, threshold, value) - smoothstep(threshold, threshold + edge, value)
}

/// Soft mask for the band between the first two contours.
#[inline]
pub fn band(value: f32) -> f32 {
    let low = smoothstep(BAND_LOW.0, BAND_LOW.1, value);
    let high = 1.0 - smoothstep(BAND_HIGH.0, BAND_HIGH.1, value);
    low * high
}

/// Final pixel colour. Layers, back to front: background, blob, band fill
/// inside the blob, background again inside the hole, contour lines.
pub fn compose(noise: f32, fwidth: f32, shape: BlobSample, palette: &Palette) -> Vec3 {
    let mut color = palette.background;

    if shape.blob > BLOB_VISIBLE {
        color = color.lerp(palette.blob, shape.blob);
        let region = band(noise);
        if region > BLOB_VISIBLE {
            color = color.lerp(palette.fill, region * shape.blob * BAND_FILL_STRENGTH);
        }
    }

    if shape.hole > BLOB_VISIBLE {
        color = color.lerp(palette.background, shape.hole);
    }

    for threshold in ISOLINE_THRESHOLDS {
        let line = isoline(noise, threshold, fwidth, ISOLINE_WIDTH);
        color = color.lerp(palette.line, line);
    }
    color
}

/// CSS `rgb()` string for a colour, used as the container fallback.
pub fn css_rgb(c: Vec3) -> String {
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("rgb({}, {}, {})", to_u8(c.x), to_u8(c.y), to_u8(c.z))
}

/// Light/dark mix factor that eases toward the theme the page reports.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThemeMix {
    value: f32,
    target: f32,
}

impl ThemeMix {
    /// Start settled on the current theme; no fade on first paint.
    pub fn new(dark: bool) -> Self {
        let v = if dark { 1.0 } else { 0.0 };
        Self {
            value: v,
            target: v,
        }
    }

    pub fn set_dark(&mut self, dark: bool) {
        self.target = if dark { 1.0 } else { 0.0 };
    }

    #[inline]
    pub fn is_dark(&self) -> bool {
        self.target > 0.5
    }

    pub fn step(&mut self, dt_sec: f32) -> f32 {
        let alpha = 1.0 - (-dt_sec.max(0.0) / THEME_FADE_TAU_SEC).exp();
        self.value += (self.target - self.value) * alpha;
        if (self.target - self.value).abs() < THEME_SNAP_EPSILON {
            self.value = self.target;
        }
        self.value
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }
}
