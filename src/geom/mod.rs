mod sample;
mod viewport;

pub use sample::{SampleArea, extent, fallback_fan, sample_points};
pub use viewport::{Viewport, resolution};
