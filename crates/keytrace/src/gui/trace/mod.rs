pub mod view;

pub use view::{CairoSurface, draw};

/// Under-strokes used to approximate a blurred glow.
pub const GLOW_PASSES: u32 = 4;
/// Combined alpha of all glow passes.
pub const GLOW_ALPHA: f64 = 0.35;
