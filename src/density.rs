//! Density field abstraction and backing stores.
//!
//! A density field is a 2D image-like weight map in [0, 1] that the
//! sampler reads per pixel; dense regions exclude placements. The
//! backing storage must be readable pixel by pixel, so compressed or
//! GPU-resident formats have to be decoded before they get here.

use std::path::Path;

use image::RgbaImage;
use noise::{Fbm, NoiseFn, Perlin};

use crate::error::ScatterError;

/// One pixel, channels in [0, 1] each.
pub type Rgba = [f32; 4];

/// Per-pixel readable 2D weight map.
pub trait DensityField {
    /// Field resolution as (width, height) in pixels.
    fn resolution(&self) -> (u32, u32);

    /// Read the pixel at (px, py). Callers pass coordinates inside
    /// the resolution; implementations may panic outside it.
    fn sample(&self, px: u32, py: u32) -> Rgba;
}

/// In-memory density grid, row-major.
///
/// The simplest backing store; tests and procedural callers fill it
/// directly.
#[derive(Clone)]
pub struct GridDensityField {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl GridDensityField {
    /// Create a grid filled with a constant density.
    pub fn new_with(width: u32, height: u32, value: f32) -> Self {
        GridDensityField {
            width,
            height,
            data: vec![value; (width * height) as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Fill an axis-aligned pixel rectangle with a density value.
    /// The rectangle is clipped to the grid.
    pub fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, value: f32) {
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                self.set(x, y, value);
            }
        }
    }
}

impl DensityField for GridDensityField {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn sample(&self, px: u32, py: u32) -> Rgba {
        let d = self.get(px, py);
        [d, d, d, 1.0]
    }
}

/// Density field backed by a decoded RGBA image.
#[derive(Clone, Debug)]
pub struct ImageDensityField {
    image: RgbaImage,
}

impl ImageDensityField {
    /// Load and decode an image file. Decode failures are setup-time
    /// configuration errors.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ScatterError> {
        let image = image::open(path.as_ref())
            .map_err(|e| {
                ScatterError::Configuration(format!(
                    "failed to load density map {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?
            .to_rgba8();
        Ok(ImageDensityField { image })
    }

    pub fn from_image(image: RgbaImage) -> Self {
        ImageDensityField { image }
    }
}

impl DensityField for ImageDensityField {
    fn resolution(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn sample(&self, px: u32, py: u32) -> Rgba {
        let p = self.image.get_pixel(px, py).0;
        [
            p[0] as f32 / 255.0,
            p[1] as f32 / 255.0,
            p[2] as f32 / 255.0,
            p[3] as f32 / 255.0,
        ]
    }
}

/// Procedural density field sampled from fractal noise over a virtual
/// pixel resolution. Noise output is remapped from [-1, 1] to [0, 1]
/// and clamped; fBm octave sums can overshoot slightly.
pub struct NoiseDensityField {
    fbm: Fbm<Perlin>,
    width: u32,
    height: u32,
    /// Noise-space distance covered per pixel.
    frequency: f64,
}

impl NoiseDensityField {
    pub fn new(seed: u32, width: u32, height: u32, frequency: f64) -> Self {
        NoiseDensityField {
            fbm: Fbm::<Perlin>::new(seed),
            width,
            height,
            frequency,
        }
    }
}

impl DensityField for NoiseDensityField {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn sample(&self, px: u32, py: u32) -> Rgba {
        let n = self
            .fbm
            .get([px as f64 * self.frequency, py as f64 * self.frequency]);
        let d = ((n as f32) * 0.5 + 0.5).clamp(0.0, 1.0);
        [d, d, d, 1.0]
    }
}
