//! Update-pass orchestration.
//!
//! One synchronous pass regenerates the grid against the current level
//! bounds, computes the proximity set around the reference position,
//! and activates every near chunk that is still unpopulated. The pass
//! runs to completion on the calling thread; embedding hosts that
//! update from multiple threads need one lock around the whole system.

use log::warn;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::activate::ChunkActivator;
use crate::config::ScatterConfig;
use crate::density::DensityField;
use crate::error::ScatterError;
use crate::grid::ChunkGrid;
use crate::math::{Vec2, WorldBounds};
use crate::render::{MaterialHandle, RenderSink};
use crate::scatter::ScatterSampler;
use crate::seeds::ScatterSeeds;

/// Supplies the level's world bounds and horizontal offset.
pub trait LevelBoundsProvider {
    fn world_bounds(&self) -> WorldBounds;
    fn world_offset(&self) -> Vec2;
}

/// Supplies the moving reference position chunks are activated
/// around. Absence of a position is treated as the world origin.
pub trait ReferencePositionProvider {
    fn reference_position(&self) -> Option<Vec2>;
}

/// Outcome counts for one update pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Chunks newly created by grid generation.
    pub generated: usize,
    /// Chunks activated during this pass.
    pub activated: usize,
    /// Near chunks whose activation failed; they stay unpopulated and
    /// will be retried on the next pass.
    pub failed: usize,
}

/// The grass scatter subsystem: grid, sampler and activator behind a
/// single update entry point.
#[derive(Debug)]
pub struct ScatterSystem {
    config: ScatterConfig,
    grid: ChunkGrid,
    sampler: ScatterSampler,
    activator: ChunkActivator,
    seeds: ScatterSeeds,
}

impl ScatterSystem {
    /// Build the subsystem. The world offset is fixed for the session,
    /// matching the grid's lifecycle. A configuration error here means
    /// the host should log, drop the subsystem and carry on.
    pub fn new(
        config: ScatterConfig,
        material: MaterialHandle,
        world_offset: Vec2,
    ) -> Result<Self, ScatterError> {
        config.validate()?;
        let seeds = match config.seed {
            Some(master) => ScatterSeeds::from_master(master),
            None => ScatterSeeds::default(),
        };
        Ok(ScatterSystem {
            grid: ChunkGrid::new(world_offset, config.chunk_size),
            sampler: ScatterSampler::new(config.chunk_size),
            activator: ChunkActivator::new(config.instance_count, material),
            seeds,
            config,
        })
    }

    pub fn config(&self) -> &ScatterConfig {
        &self.config
    }

    pub fn grid(&self) -> &ChunkGrid {
        &self.grid
    }

    pub fn master_seed(&self) -> u64 {
        self.seeds.master
    }

    /// Run one update pass.
    ///
    /// Per-chunk activation failures are logged and counted but never
    /// abort the pass; the failing chunks stay unpopulated for retry.
    pub fn update(
        &mut self,
        bounds_provider: &dyn LevelBoundsProvider,
        reference_provider: Option<&dyn ReferencePositionProvider>,
        field: Option<&dyn DensityField>,
        sink: &mut dyn RenderSink,
    ) -> UpdateReport {
        let bounds = bounds_provider.world_bounds();
        let before = self.grid.len();
        self.grid.generate(&bounds);

        let reference = reference_provider
            .and_then(|p| p.reference_position())
            .unwrap_or(Vec2::ZERO);

        let mut report = UpdateReport {
            generated: self.grid.len() - before,
            ..UpdateReport::default()
        };

        for coord in self.grid.proximity_set(reference) {
            // Near coordinates outside the generated grid have no
            // chunk to activate.
            let Some(chunk) = self.grid.get_mut(coord) else {
                continue;
            };
            if chunk.is_activated() {
                continue;
            }

            let result = match field {
                None => Err(ScatterError::MissingDensityField),
                Some(field) => {
                    let mut rng = ChaCha8Rng::seed_from_u64(self.seeds.chunk_seed(coord));
                    self.activator
                        .activate(chunk, &self.sampler, field, &bounds, sink, &mut rng)
                }
            };
            match result {
                Ok(true) => report.activated += 1,
                Ok(false) => {}
                Err(err) => {
                    warn!(
                        "activation of chunk ({}, {}) failed: {}",
                        coord.x, coord.z, err
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }
}
