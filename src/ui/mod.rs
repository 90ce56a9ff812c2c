//! User interface panels

mod panels;

pub use panels::*;
