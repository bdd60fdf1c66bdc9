mod helpers;
mod icons;
mod markers;
mod renderer;
mod sphere;
pub mod texture;

pub static PANORAMA_WGSL: &str = include_str!("../shaders/panorama.wgsl");
pub static MARKER_WGSL: &str = include_str!("../shaders/marker.wgsl");

pub use icons::{IconRequests, IconState};
pub use markers::{marker_instances, tint_for, MarkerInstance};
pub use renderer::{Globals, Renderer};
