//! Raster output: the star chart itself and the captioned composite.

pub mod chart;
pub mod compositor;

pub use chart::ChartRenderer;
pub use compositor::{Caption, Compositor};
