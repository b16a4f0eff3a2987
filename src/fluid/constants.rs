// Tuning constants for the fluid contour background.
//
// Time values are seconds, positions are normalized viewport units (0..1, y up)
// unless stated otherwise.

// ---------------- Trail buffer ----------------
// Fixed number of trail slots uploaded to the GPU each frame.
pub const TRAIL_SLOTS: usize = 24;
pub const TRAIL_CAPACITY_DESKTOP: usize = 12;
pub const TRAIL_CAPACITY_MOBILE: usize = 8;
// Unused slots carry this position; field functions skip anything negative.
pub const TRAIL_SENTINEL: [f32; 4] = [-1.0, -1.0, 0.0, 0.0];

// ---------------- Pointer sampling ----------------
pub const MIN_POINT_INTERVAL_SEC: f32 = 0.03;
pub const MIN_POINT_SPEED: f32 = 0.05;
// Velocity EMA: v = keep * v + (1 - keep) * raw
pub const VELOCITY_EMA_KEEP: f32 = 0.6;
// Raw samples further apart than this are not used for velocity
pub const VELOCITY_SAMPLE_MAX_DT: f32 = 0.1;
// Per-frame damping of the pointer velocity EMA
pub const POINTER_VELOCITY_DAMPING: f32 = 0.92;
// cos(60°): direction changes sharper than this start a fast fade
pub const DIRECTION_CHANGE_COS: f32 = 0.5;

// ---------------- Trail point motion ----------------
pub const NORMAL_DECAY_SEC: f32 = 0.5;
pub const DIRECTION_FADE_SEC: f32 = 0.3;
pub const POINT_FRICTION: f32 = 0.98;
pub const POINT_VELOCITY_SCALE: f32 = 0.004;
pub const POINT_VELOCITY_MAX: f32 = 0.012;
// Trail velocities are scaled up before they reach the field functions
pub const TRAIL_VELOCITY_UPLOAD_SCALE: f32 = 100.0;

// ---------------- Pointer follow ----------------
pub const POINTER_LERP: f32 = 0.15;
pub const POINTER_INFLUENCE: f32 = 0.03;
pub const POINTER_INFLUENCE_RADIUS: f32 = 0.3;
pub const POINTER_VELOCITY_UPLOAD_SCALE: f32 = 0.01;

// ---------------- Hole ----------------
pub const HOLE_ATTACK_PER_FRAME: f32 = 0.15;
pub const HOLE_RELEASE_PER_FRAME: f32 = 0.055;
pub const HOLE_VELOCITY_GATE: f32 = 0.001;
pub const HOLE_MIN_INTENSITY: f32 = 0.02;
pub const HOLE_EDGE: (f32, f32) = (0.2, 0.4);

// ---------------- Blob ----------------
pub const BLOB_BASE_SIZE: f32 = 0.16;
pub const BLOB_SPEED_BOOST: f32 = 0.25;
pub const BLOB_SPEED_BOOST_MAX: f32 = 0.08;
pub const BLOB_TAIL_RATIO: f32 = 0.4;
pub const BLOB_MIN_FADE: f32 = 0.02;
pub const BLOB_EDGE: (f32, f32) = (0.25, 0.45);
pub const BLOB_VISIBLE: f32 = 0.1;
// Overlap damping in the metaball blend: acc + c - acc * c * k
pub const METABALL_BLEND_K: f32 = 0.6;

// ---------------- Noise field ----------------
pub const NOISE_TIME_SCALE: f32 = 0.08;
pub const NOISE_FIELD_SCALE: f32 = 1.5;
pub const WARP_SCALE: f32 = 0.8;
pub const WARP_AMOUNT: f32 = 0.4;
// Vertical noise drift per unit of normalized scroll velocity per second
pub const SCROLL_DRIFT_RATE: f32 = 0.05;

// ---------------- Contours ----------------
pub const ISOLINE_THRESHOLDS: [f32; 3] = [0.40, 0.55, 0.70];
pub const ISOLINE_WIDTH: f32 = 1.5;
pub const BAND_LOW: (f32, f32) = (0.38, 0.42);
pub const BAND_HIGH: (f32, f32) = (0.53, 0.57);
pub const BAND_FILL_STRENGTH: f32 = 0.85;

// ---------------- Theme ----------------
pub const THEME_FADE_TAU_SEC: f32 = 0.18;
pub const THEME_SNAP_EPSILON: f32 = 1e-3;

// ---------------- Device ----------------
pub const PIXEL_RATIO_CAP_DESKTOP: f64 = 2.0;
pub const PIXEL_RATIO_CAP_MOBILE: f64 = 1.5;
pub const PARTICLE_COUNT_DESKTOP: u32 = 99;
pub const PARTICLE_COUNT_MOBILE: u32 = 33;
pub const NARROW_VIEWPORT_MAX_WIDTH: f64 = 768.0;
pub const MOBILE_UA_TOKENS: [&str; 4] = ["android", "iphone", "ipad", "ipod"];

// ---------------- Scroll velocity ----------------
pub const SCROLL_CLAMP_PX_PER_SEC: f64 = 2000.0;
pub const SCROLL_NORM_PX_PER_SEC: f64 = 1000.0;
pub const SCROLL_DECAY_MS: f64 = 800.0;
