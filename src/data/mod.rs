//! TLE lookup and the cache of resolved satellites

mod satellite_data;
mod tle_client;

pub use satellite_data::*;
pub use tle_client::*;
