pub mod camera;
pub mod collab;
pub mod config;
pub mod constants;
pub mod edit;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod markers;
pub mod model;
pub mod navigation;
pub mod picking;
pub mod session;
pub mod tween;

pub use camera::*;
pub use collab::*;
pub use config::*;
pub use edit::*;
pub use error::*;
pub use loader::*;
pub use markers::*;
pub use model::*;
pub use navigation::*;
pub use picking::*;
pub use session::*;
pub use tween::*;
