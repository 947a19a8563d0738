use clap::Parser;
use log::{error, info};

use grass_scatter::config::ScatterConfig;
use grass_scatter::density::{DensityField, ImageDensityField, NoiseDensityField};
use grass_scatter::export;
use grass_scatter::grid::ChunkState;
use grass_scatter::math::{Vec2, WorldBounds};
use grass_scatter::render::{MaterialHandle, RecordingSink};
use grass_scatter::system::{
    LevelBoundsProvider, ReferencePositionProvider, ScatterSystem,
};

#[derive(Parser, Debug)]
#[command(name = "grass_scatter")]
#[command(about = "Scatter grass placements over a chunked level against a density map")]
struct Args {
    /// Level width in world units
    #[arg(short = 'W', long, default_value = "400.0")]
    width: f32,

    /// Level depth in world units
    #[arg(short = 'D', long, default_value = "400.0")]
    depth: f32,

    /// Chunk side length in world units
    #[arg(long, default_value = "50.0")]
    chunk_size: f32,

    /// Placement draws per chunk
    #[arg(short = 'c', long, default_value = "100")]
    count: usize,

    /// Master seed (random if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Density map PNG; the red channel is read. A procedural noise
    /// field is used when omitted.
    #[arg(long)]
    density: Option<String>,

    /// Update passes to run while walking the reference point
    #[arg(long, default_value = "8")]
    steps: usize,

    /// World units the reference point advances per step (diagonal walk)
    #[arg(long, default_value = "35.0")]
    stride: f32,

    /// Write all placements to a JSON file
    #[arg(long)]
    export_json: Option<String>,

    /// Write a density/placement overview PNG
    #[arg(long)]
    export_map: Option<String>,
}

struct Level {
    bounds: WorldBounds,
}

impl LevelBoundsProvider for Level {
    fn world_bounds(&self) -> WorldBounds {
        self.bounds
    }

    fn world_offset(&self) -> Vec2 {
        Vec2::ZERO
    }
}

struct WalkingReference {
    position: Vec2,
}

impl ReferencePositionProvider for WalkingReference {
    fn reference_position(&self) -> Option<Vec2> {
        Some(self.position)
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let field: Box<dyn DensityField> = match &args.density {
        Some(path) => match ImageDensityField::open(path) {
            Ok(field) => Box::new(field),
            Err(err) => {
                error!("{}", err);
                std::process::exit(1);
            }
        },
        None => {
            let seed = args.seed.unwrap_or(0) as u32;
            Box::new(NoiseDensityField::new(seed, 256, 256, 0.02))
        }
    };
    let (fw, fh) = field.resolution();
    info!("density field {}x{}", fw, fh);

    let mut config = ScatterConfig::new(args.chunk_size, args.count);
    config.seed = args.seed;
    let level = Level {
        bounds: WorldBounds::flat(args.width, args.depth),
    };

    let mut system =
        match ScatterSystem::new(config, MaterialHandle::named("grass"), level.world_offset()) {
            Ok(system) => system,
            Err(err) => {
                // Setup failure disables the subsystem; nothing to run.
                error!("{}", err);
                std::process::exit(1);
            }
        };

    println!("Master seed: {}", system.master_seed());

    let mut sink = RecordingSink::new();
    let mut reference = WalkingReference {
        position: Vec2::ZERO,
    };
    for step in 0..args.steps {
        let report = system.update(&level, Some(&reference), Some(field.as_ref()), &mut sink);
        println!(
            "step {:>3}  reference ({:>7.1}, {:>7.1})  +{} chunks, {} activated, {} failed",
            step, reference.position.x, reference.position.z, report.generated, report.activated,
            report.failed
        );
        reference.position = reference.position.add(Vec2::new(args.stride, args.stride));
    }

    let mut activated = 0usize;
    let mut accepted = 0usize;
    let mut requested = 0usize;
    for chunk in system.grid().iter() {
        if let ChunkState::Activated { placements, .. } = &chunk.state {
            activated += 1;
            requested += placements.len();
            accepted += placements.iter().filter(|p| p.is_some()).count();
        }
    }
    println!(
        "{} chunks total, {} activated; {}/{} placements accepted ({} rejected by density)",
        system.grid().len(),
        activated,
        accepted,
        requested,
        requested - accepted
    );

    if let Some(path) = &args.export_json {
        if let Err(err) = export::export_placements_json(system.grid(), system.master_seed(), path)
        {
            error!("JSON export failed: {}", err);
            std::process::exit(1);
        }
        println!("Placements written to {}", path);
    }

    if let Some(path) = &args.export_map {
        if let Err(err) =
            export::export_debug_map(field.as_ref(), system.grid(), &level.bounds, path)
        {
            error!("map export failed: {}", err);
            std::process::exit(1);
        }
        println!("Overview map written to {}", path);
    }
}
