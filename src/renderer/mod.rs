//! Camera, picking and egui-painter rendering of the scene

mod camera;
mod earth_texture;
mod lighting;
mod painter;
mod picking;
mod stars;

pub use camera::*;
pub use earth_texture::*;
pub use lighting::*;
pub use painter::*;
pub use picking::*;
pub use stars::*;
