//! satglobe - interactive 3D Earth with live satellite positions
//!
//! Satellites are looked up by catalogue number from a public TLE API,
//! propagated to "now" with SGP4 and placed above their sub-satellite point
//! on a globe drawn with egui.

pub mod config;
pub mod data;
pub mod geo;
pub mod propagation;
pub mod renderer;
pub mod scene;
pub mod sync;
pub mod ui;
pub mod viewer;
