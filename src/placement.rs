//! Placement data model: one decorative instance inside a chunk.

use serde::{Deserialize, Serialize};

use crate::density::Rgba;
use crate::math::Vec2;

/// One instance's offset, scale and tint within its chunk.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Offset from the chunk's world origin, in [0, chunk_size) per
    /// axis.
    pub local_offset: Vec2,
    /// Fixed vertical lift above the ground plane.
    pub height_offset: f32,
    /// Uniform instance scale.
    pub scale: f32,
    /// Tint: red varies in [0, 1], green 1.0, blue 0.0, alpha 1.0.
    pub color: Rgba,
}

/// Render-ready transform for one instance: uniform scale applied
/// before translation, so the local offset itself is never scaled.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstanceTransform {
    pub translation: [f32; 3],
    pub scale: f32,
}

impl InstanceTransform {
    /// Identity transform; the default for slots whose draw was
    /// rejected.
    pub const IDENTITY: InstanceTransform = InstanceTransform {
        translation: [0.0; 3],
        scale: 1.0,
    };
}

impl Placement {
    /// World position of this placement on the horizontal plane.
    pub fn world_position(&self, chunk_origin: Vec2) -> Vec2 {
        chunk_origin.add(self.local_offset)
    }

    /// Full instance transform for this placement.
    pub fn instance_transform(&self, chunk_origin: Vec2) -> InstanceTransform {
        let pos = self.world_position(chunk_origin);
        InstanceTransform {
            translation: [pos.x, self.height_offset, pos.z],
            scale: self.scale,
        }
    }
}
