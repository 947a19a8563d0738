//! One-time chunk activation.
//!
//! Activation samples the chunk's placements, allocates an instance
//! batch sized for the full request, writes the accepted slots, and
//! flips the chunk to `Activated`. A sampling failure leaves the chunk
//! `Unpopulated`, so it stays eligible for retry on a later pass.

use log::debug;
use rand::Rng;

use crate::density::DensityField;
use crate::error::ScatterError;
use crate::grid::{Chunk, ChunkState};
use crate::math::WorldBounds;
use crate::render::{MaterialHandle, RenderSink};
use crate::scatter::ScatterSampler;

/// Populates chunks on their first appearance in a proximity set.
#[derive(Clone, Debug)]
pub struct ChunkActivator {
    /// Batch capacity and requested placement count per chunk.
    pub instance_count: usize,
    pub material: MaterialHandle,
}

impl ChunkActivator {
    pub fn new(instance_count: usize, material: MaterialHandle) -> Self {
        ChunkActivator {
            instance_count,
            material,
        }
    }

    /// Activate `chunk` if it is not activated yet.
    ///
    /// Returns `Ok(true)` when the chunk was populated by this call,
    /// `Ok(false)` when it already was. Instance indices in the batch
    /// match placement slot indices; rejected slots keep the batch's
    /// allocation defaults rather than being compacted away.
    pub fn activate<R: Rng>(
        &self,
        chunk: &mut Chunk,
        sampler: &ScatterSampler,
        field: &dyn DensityField,
        bounds: &WorldBounds,
        sink: &mut dyn RenderSink,
        rng: &mut R,
    ) -> Result<bool, ScatterError> {
        if chunk.is_activated() {
            return Ok(false);
        }

        // Sample first: a failing chunk must not leave an orphaned
        // batch behind.
        let placements = sampler.sample(
            chunk.world_origin,
            self.instance_count,
            field,
            bounds,
            rng,
        )?;

        let name = format!("grass_chunk_{}_{}", chunk.coord.x, chunk.coord.z);
        let handle = sink.create_instance_batch(
            &name,
            [chunk.world_origin.x, 0.0, chunk.world_origin.z],
            &self.material,
            self.instance_count,
        );

        let mut accepted = 0usize;
        for (index, slot) in placements.iter().enumerate() {
            if let Some(placement) = slot {
                sink.set_instance(
                    handle,
                    index,
                    placement.instance_transform(chunk.world_origin),
                    placement.color,
                );
                accepted += 1;
            }
        }

        sink.attach_to_scene(handle);
        chunk.state = ChunkState::Activated {
            batch: handle,
            placements,
        };
        debug!(
            "activated {} with {}/{} placements",
            name, accepted, self.instance_count
        );
        Ok(true)
    }
}
