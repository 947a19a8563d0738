//! Error types for the scatter subsystem.
//!
//! Setup-time configuration problems are terminal for the subsystem
//! only; per-chunk sampling failures are caught at the activation
//! boundary and leave the chunk eligible for retry.

use std::error::Error;
use std::fmt;

/// All failures the scatter core can produce.
#[derive(Clone, Debug, PartialEq)]
pub enum ScatterError {
    /// Invalid setup value or missing required collaborator. The host
    /// should log this, drop the subsystem, and keep running.
    Configuration(String),
    /// The sampler was invoked without a density field wired in.
    MissingDensityField,
    /// Level bounds with a zero (or non-finite) horizontal extent;
    /// normalizing sample positions would divide by zero.
    DegenerateLevelBounds { width: f32, depth: f32 },
    /// A sample position mapped to a pixel outside the density field.
    /// Only produced by the strict sampling entry point; the default
    /// path clamps instead.
    OutOfRangeSample {
        px: i64,
        py: i64,
        width: u32,
        height: u32,
    },
}

impl fmt::Display for ScatterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScatterError::Configuration(msg) => write!(f, "configuration error: {}", msg),
            ScatterError::MissingDensityField => write!(f, "no density field available"),
            ScatterError::DegenerateLevelBounds { width, depth } => write!(
                f,
                "level bounds have a degenerate horizontal extent ({} x {})",
                width, depth
            ),
            ScatterError::OutOfRangeSample {
                px,
                py,
                width,
                height,
            } => write!(
                f,
                "density sample ({}, {}) outside field resolution {}x{}",
                px, py, width, height
            ),
        }
    }
}

impl Error for ScatterError {}
