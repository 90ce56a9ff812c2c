//! Orbital propagation
//!
//! Satellites are positioned once, when their TLE arrives, at the point on the
//! ground directly below them. SGP4 (via satkit) gives the TEME position,
//! which is rotated into the Earth-fixed frame by satkit's Greenwich mean
//! sidereal time.

mod subpoint;

pub use subpoint::*;
