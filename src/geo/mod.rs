//! Geographic coordinates and their render-space projection

mod projection;

pub use projection::*;
