//! Scene graph: celestial bodies, their renderables and lookup tables

mod celestial;
mod graph;
mod registry;

pub use celestial::*;
pub use graph::*;
pub use registry::*;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("an object named {0:?} is already registered")]
    DuplicateName(String),
    #[error("scene already has a primary body ({0:?})")]
    PrimaryExists(String),
}
