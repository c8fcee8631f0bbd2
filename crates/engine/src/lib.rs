//! Command-level helpers on top of the core engine
//!
//! - [`place`]: placement by pool index, with optional rotation and wire error codes
//! - [`autoplay`]: headless player that always takes the best move

pub mod autoplay;
pub mod place;

pub use blockdoku_core as core;
pub use blockdoku_types as types;

pub use autoplay::{AutoplayReport, Autoplayer};
pub use place::{apply_place, apply_place_rotated, CommandError};
