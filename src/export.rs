//! Debug exports: JSON placement dumps and a density/placement
//! overview PNG.

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use serde::Serialize;

use crate::density::DensityField;
use crate::grid::{ChunkCoord, ChunkGrid, ChunkState};
use crate::math::{Vec2, WorldBounds};

/// One accepted placement in world space.
#[derive(Serialize)]
struct PlacementRecord {
    slot: usize,
    world_position: Vec2,
    height_offset: f32,
    scale: f32,
    color: [f32; 4],
}

/// One chunk's state and accepted placements.
#[derive(Serialize)]
struct ChunkRecord {
    coord: ChunkCoord,
    world_origin: Vec2,
    activated: bool,
    requested: usize,
    accepted: usize,
    placements: Vec<PlacementRecord>,
}

#[derive(Serialize)]
struct ScatterDump {
    master_seed: u64,
    chunk_size: f32,
    chunks: Vec<ChunkRecord>,
}

/// Write every chunk's placements as JSON, in coordinate order.
pub fn export_placements_json<P: AsRef<Path>>(
    grid: &ChunkGrid,
    master_seed: u64,
    path: P,
) -> Result<(), Box<dyn Error>> {
    let chunks = grid
        .iter_sorted()
        .into_iter()
        .map(|chunk| {
            let (requested, placements) = match &chunk.state {
                ChunkState::Unpopulated => (0, Vec::new()),
                ChunkState::Activated { placements, .. } => {
                    let records = placements
                        .iter()
                        .enumerate()
                        .filter_map(|(slot, p)| {
                            p.map(|p| PlacementRecord {
                                slot,
                                world_position: p.world_position(chunk.world_origin),
                                height_offset: p.height_offset,
                                scale: p.scale,
                                color: p.color,
                            })
                        })
                        .collect();
                    (placements.len(), records)
                }
            };
            ChunkRecord {
                coord: chunk.coord,
                world_origin: chunk.world_origin,
                activated: chunk.is_activated(),
                requested,
                accepted: placements.len(),
                placements,
            }
        })
        .collect();

    let dump = ScatterDump {
        master_seed,
        chunk_size: grid.chunk_size,
        chunks,
    };
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, &dump)?;
    Ok(())
}

/// Write an overview PNG at the density field's resolution: the red
/// channel as grayscale background, chunk borders in dark gray, and
/// accepted placements as green dots.
pub fn export_debug_map<P: AsRef<Path>>(
    field: &dyn DensityField,
    grid: &ChunkGrid,
    bounds: &WorldBounds,
    path: P,
) -> Result<(), image::ImageError> {
    let (img_w, img_h) = field.resolution();
    let mut img: RgbImage = ImageBuffer::new(img_w, img_h);

    for py in 0..img_h {
        for px in 0..img_w {
            let v = (field.sample(px, py)[0] * 255.0) as u8;
            img.put_pixel(px, py, Rgb([v, v, v]));
        }
    }

    let (width, depth) = bounds.horizontal_size();
    let to_pixel = |pos: Vec2| -> Option<(u32, u32)> {
        let px = (pos.x / width * img_w as f32).floor();
        let py = (pos.z / depth * img_h as f32).floor();
        if px >= 0.0 && py >= 0.0 && px < img_w as f32 && py < img_h as f32 {
            Some((px as u32, py as u32))
        } else {
            None
        }
    };

    // Chunk borders.
    for chunk in grid.iter() {
        if let Some((px0, py0)) = to_pixel(chunk.world_origin) {
            for px in 0..img_w {
                img.put_pixel(px, py0, Rgb([64, 64, 64]));
            }
            for py in 0..img_h {
                img.put_pixel(px0, py, Rgb([64, 64, 64]));
            }
        }
    }

    // Accepted placements.
    for chunk in grid.iter() {
        if let ChunkState::Activated { placements, .. } = &chunk.state {
            for p in placements.iter().flatten() {
                if let Some((px, py)) = to_pixel(p.world_position(chunk.world_origin)) {
                    img.put_pixel(px, py, Rgb([40, 220, 40]));
                }
            }
        }
    }

    img.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activate::ChunkActivator;
    use crate::density::GridDensityField;
    use crate::render::{MaterialHandle, RecordingSink};
    use crate::scatter::ScatterSampler;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn activated_grid() -> (ChunkGrid, GridDensityField, WorldBounds) {
        let bounds = WorldBounds::flat(100.0, 100.0);
        let mut grid = ChunkGrid::new(Vec2::ZERO, 50.0);
        grid.generate(&bounds);
        let field = GridDensityField::new_with(16, 16, 0.0);
        let activator = ChunkActivator::new(5, MaterialHandle::named("grass"));
        let sampler = ScatterSampler::new(50.0);
        let mut sink = RecordingSink::new();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let coord = ChunkCoord::new(0, 0);
        activator
            .activate(
                grid.get_mut(coord).unwrap(),
                &sampler,
                &field,
                &bounds,
                &mut sink,
                &mut rng,
            )
            .unwrap();
        (grid, field, bounds)
    }

    #[test]
    fn json_dump_lists_activated_placements() {
        let (grid, _, _) = activated_grid();
        let dir = std::env::temp_dir().join("grass_scatter_test_json");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("placements.json");

        export_placements_json(&grid, 7, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["master_seed"], 7);
        let chunks = value["chunks"].as_array().unwrap();
        assert_eq!(chunks.len(), 4);
        // iter_sorted puts (0,0) first; it is the activated one.
        assert_eq!(chunks[0]["activated"], true);
        assert_eq!(chunks[0]["accepted"], 5);
        assert_eq!(chunks[1]["activated"], false);
    }

    #[test]
    fn debug_map_writes_a_png_at_field_resolution() {
        let (grid, field, bounds) = activated_grid();
        let dir = std::env::temp_dir().join("grass_scatter_test_png");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("debug.png");

        export_debug_map(&field, &grid, &bounds, &path).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 16);
        assert_eq!(img.height(), 16);
    }
}
