//! Scatter subsystem configuration.
//!
//! All values are validated once at setup; an invalid configuration
//! disables the subsystem without taking the host down.

use crate::error::ScatterError;

/// Placements with sampled density above this are discarded.
pub const REJECTION_THRESHOLD: f32 = 0.8;
/// Uniform scale range for accepted instances.
pub const SCALE_MIN: f32 = 0.8;
pub const SCALE_MAX: f32 = 1.5;
/// Fixed vertical offset applied to every instance.
pub const HEIGHT_OFFSET: f32 = 0.1;

/// Tunable parameters for the scatter system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterConfig {
    /// Side length of a square chunk in world units. Must be > 0.
    pub chunk_size: f32,
    /// Placement draws attempted per chunk. The accepted count can be
    /// lower after density rejection.
    pub instance_count: usize,
    /// Master seed for reproducible placement. `None` draws a random
    /// seed at setup.
    pub seed: Option<u64>,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        ScatterConfig {
            chunk_size: 50.0,
            instance_count: 100,
            seed: None,
        }
    }
}

impl ScatterConfig {
    pub fn new(chunk_size: f32, instance_count: usize) -> Self {
        ScatterConfig {
            chunk_size,
            instance_count,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the configuration. Called once when the system is built.
    pub fn validate(&self) -> Result<(), ScatterError> {
        if !self.chunk_size.is_finite() || self.chunk_size <= 0.0 {
            return Err(ScatterError::Configuration(format!(
                "chunk_size must be a positive finite number, got {}",
                self.chunk_size
            )));
        }
        Ok(())
    }
}
