//! Horizontal world-space math and chunk coordinate indexing.
//!
//! The scatter system works on the horizontal x/z plane; vertical
//! placement is a fixed height offset applied per instance.

use serde::{Deserialize, Serialize};

use crate::grid::ChunkCoord;

/// A horizontal world-space vector (x/z plane).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub z: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, z: 0.0 };

    pub fn new(x: f32, z: f32) -> Self {
        Vec2 { x, z }
    }

    pub fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.z + other.z)
    }
}

/// Axis-aligned world-space bounds of the level surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldBounds {
    /// Minimum corner (x, y, z).
    pub origin: [f32; 3],
    /// Extent along each axis (x, y, z).
    pub size: [f32; 3],
}

impl WorldBounds {
    pub fn new(origin: [f32; 3], size: [f32; 3]) -> Self {
        WorldBounds { origin, size }
    }

    /// Bounds spanning `width` x `depth` on the ground plane.
    pub fn flat(width: f32, depth: f32) -> Self {
        WorldBounds {
            origin: [0.0; 3],
            size: [width, 0.0, depth],
        }
    }

    /// Horizontal extents (width along x, depth along z).
    pub fn horizontal_size(&self) -> (f32, f32) {
        (self.size[0], self.size[2])
    }
}

/// Map a world position to the chunk coordinate used for proximity
/// lookups.
///
/// Uses ceiling division per axis. Grid generation iterates 0-based
/// cells instead (see `ChunkGrid::generate`); the two conventions are
/// intentionally asymmetric and together define which chunks count as
/// "near" a position. Do not change either without changing both
/// consumers.
pub fn chunk_coord_at(world_pos: Vec2, world_offset: Vec2, chunk_size: f32) -> ChunkCoord {
    let cx = ((world_pos.x + world_offset.x) / chunk_size).ceil() as i32;
    let cz = ((world_pos.z + world_offset.z) / chunk_size).ceil() as i32;
    ChunkCoord::new(cx, cz)
}
