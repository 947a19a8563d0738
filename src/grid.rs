//! Chunk grid: coordinate keys, chunk records and the proximity set.
//!
//! The grid covers the level bounds with fixed-size square chunks and
//! tracks each chunk's activation state. Chunks are only ever added;
//! there is no eviction, so the map (and the render batches hanging
//! off it) grows as the reference point roams. Known limitation until
//! an eviction policy exists.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::math::{chunk_coord_at, Vec2, WorldBounds};
use crate::placement::Placement;
use crate::render::BatchHandle;

/// Neighbor offsets probed around the target chunk, in fixed order.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (1, -1),
    (1, 0),
    (1, 1),
    (0, -1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Integer grid position of a chunk; the unique chunk key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    pub fn offset(self, dx: i32, dz: i32) -> Self {
        ChunkCoord::new(self.x + dx, self.z + dz)
    }
}

/// Population state of a chunk. The transition to `Activated` happens
/// exactly once and never reverses.
#[derive(Clone, Debug, PartialEq)]
pub enum ChunkState {
    Unpopulated,
    Activated {
        batch: BatchHandle,
        /// Placement slots, aligned with instance indices in the
        /// batch. Rejected slots stay `None`.
        placements: Vec<Option<Placement>>,
    },
}

/// One grid cell with its world origin and population state.
#[derive(Clone, Debug)]
pub struct Chunk {
    pub coord: ChunkCoord,
    /// World position of the chunk's minimum corner.
    pub world_origin: Vec2,
    pub state: ChunkState,
}

impl Chunk {
    pub fn is_activated(&self) -> bool {
        matches!(self.state, ChunkState::Activated { .. })
    }
}

/// Uniform grid of chunks over the level surface.
#[derive(Clone, Debug)]
pub struct ChunkGrid {
    /// Horizontal position of the level object; added to chunk
    /// origins and to positions before indexing.
    pub world_offset: Vec2,
    pub chunk_size: f32,
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl ChunkGrid {
    pub fn new(world_offset: Vec2, chunk_size: f32) -> Self {
        ChunkGrid {
            world_offset,
            chunk_size,
            chunks: HashMap::new(),
        }
    }

    /// Create any chunks needed to cover `bounds`. Existing chunks are
    /// left untouched, so re-invocation is idempotent and growing
    /// bounds only ever add cells. Only non-negative coordinates are
    /// generated; terrain extending in the negative direction relative
    /// to the world offset is not covered.
    pub fn generate(&mut self, bounds: &WorldBounds) {
        let (width, depth) = bounds.horizontal_size();
        let chunks_x = (width / self.chunk_size).ceil() as i32;
        let chunks_z = (depth / self.chunk_size).ceil() as i32;

        for cx in 0..chunks_x {
            for cz in 0..chunks_z {
                let coord = ChunkCoord::new(cx, cz);
                self.chunks.entry(coord).or_insert_with(|| Chunk {
                    coord,
                    world_origin: Vec2::new(
                        cx as f32 * self.chunk_size + self.world_offset.x,
                        cz as f32 * self.chunk_size + self.world_offset.z,
                    ),
                    state: ChunkState::Unpopulated,
                });
            }
        }
    }

    /// Chunk coordinates considered near `reference`: the target cell
    /// plus up to 8 neighbors. Neighbors that would land on a negative
    /// coordinate are dropped, not clamped; the grid never generates
    /// negative cells, so a clamped duplicate would be wrong anyway.
    pub fn proximity_set(&self, reference: Vec2) -> Vec<ChunkCoord> {
        let target = chunk_coord_at(reference, self.world_offset, self.chunk_size);
        let mut near = Vec::with_capacity(9);
        near.push(target);
        for (dx, dz) in NEIGHBOR_OFFSETS {
            let candidate = target.offset(dx, dz);
            if candidate.x >= 0 && candidate.z >= 0 {
                near.push(candidate);
            }
        }
        near
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Chunks in deterministic coordinate order, for exports and
    /// summaries.
    pub fn iter_sorted(&self) -> Vec<&Chunk> {
        let mut chunks: Vec<&Chunk> = self.chunks.values().collect();
        chunks.sort_by_key(|c| c.coord);
        chunks
    }
}
