//! Satellite synchronisation: desired ids -> fetched TLEs -> scene objects

mod controller;
mod worker;

pub use controller::*;
pub use worker::*;

use thiserror::Error;

use crate::data::FetchError;
use crate::propagation::SubpointError;
use crate::scene::SceneError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Subpoint(#[from] SubpointError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("could not start fetch thread: {0}")]
    Spawn(#[from] std::io::Error),
}
