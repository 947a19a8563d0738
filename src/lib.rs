//! Density-weighted grass scatter over a chunked level surface.
//!
//! The grid partitions the level bounds into uniform chunks, only the
//! chunks near a moving reference position are activated, and each
//! activated chunk gets a batch of instance placements drawn by
//! rejection sampling against a 2D density field.

pub mod activate;
pub mod config;
pub mod density;
pub mod error;
pub mod export;
pub mod grid;
pub mod math;
pub mod placement;
pub mod render;
pub mod scatter;
pub mod seeds;
pub mod system;
