pub mod constants;
pub mod device;
pub mod field;
pub mod lifecycle;
pub mod math;
pub mod noise;
pub mod palette;
pub mod scene;
pub mod scroll;
pub mod trail;

pub use device::*;
pub use lifecycle::*;
pub use palette::{Palette, ThemeMix};
pub use scene::*;
pub use scroll::*;
pub use trail::*;

// Shader bundled as a string constant
pub static FLUID_WGSL: &str = include_str!("../../shaders/fluid.wgsl");
