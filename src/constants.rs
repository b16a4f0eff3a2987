// DOM-facing names and timings for the browser binding.
//
// Tuning of the effect itself lives in `fluid::constants`; these are the
// strings and delays the web layer hands to the platform.

// Event names
pub const EVENT_POINTER_MOVE: &str = "pointermove";
pub const EVENT_RESIZE: &str = "resize";
pub const EVENT_VISIBILITY_CHANGE: &str = "visibilitychange";
pub const EVENT_SCROLL: &str = "scroll";
pub const EVENT_CONTEXT_LOST: &str = "webglcontextlost";
pub const EVENT_CONTEXT_RESTORED: &str = "webglcontextrestored";

// Theme is signalled by this class on <html>
pub const THEME_DARK_CLASS: &str = "dark";
pub const THEME_ATTRIBUTE: &str = "class";

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// Init runs from requestIdleCallback, or this timer where it is missing (ms)
pub const IDLE_FALLBACK_MS: i32 = 150;

// Canvas styling: fills the container, never intercepts input
pub const CANVAS_STYLE: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("inset", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("display", "block"),
    ("pointer-events", "none"),
];
