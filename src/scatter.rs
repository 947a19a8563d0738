//! Rejection sampler for chunk placements.
//!
//! For each requested slot the sampler draws a uniform position inside
//! the chunk, looks the position up in the density field, and either
//! emits a placement or leaves the slot empty. Rejected draws are not
//! retried and the output is never compacted: slot i of the result
//! always corresponds to request i, which is what keeps instance
//! indices stable in the render batch.

use rand::Rng;

use crate::config::{HEIGHT_OFFSET, REJECTION_THRESHOLD, SCALE_MAX, SCALE_MIN};
use crate::density::DensityField;
use crate::error::ScatterError;
use crate::math::{Vec2, WorldBounds};
use crate::placement::Placement;

/// How to treat sample positions that map outside the density field.
///
/// Grid generation rounds the chunk count up, so the last row and
/// column of chunks overhang the level bounds whenever the extent is
/// not a multiple of the chunk size. Clamping keeps those edge chunks
/// populated from the nearest border pixel; `Strict` surfaces the
/// overhang as an error instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EdgePolicy {
    Clamp,
    Strict,
}

/// Draws placements for one chunk against a density field.
#[derive(Clone, Copy, Debug)]
pub struct ScatterSampler {
    /// Side length of a chunk in world units.
    pub chunk_size: f32,
}

impl ScatterSampler {
    pub fn new(chunk_size: f32) -> Self {
        ScatterSampler { chunk_size }
    }

    /// Sample `requested` placement slots for the chunk at
    /// `chunk_origin`. Out-of-field positions are clamped to the
    /// nearest border pixel.
    ///
    /// The result has exactly `requested` entries; rejected slots are
    /// `None`.
    pub fn sample<R: Rng>(
        &self,
        chunk_origin: Vec2,
        requested: usize,
        field: &dyn DensityField,
        bounds: &WorldBounds,
        rng: &mut R,
    ) -> Result<Vec<Option<Placement>>, ScatterError> {
        self.sample_inner(chunk_origin, requested, field, bounds, rng, EdgePolicy::Clamp)
    }

    /// Like [`sample`](Self::sample), but fails with
    /// [`ScatterError::OutOfRangeSample`] when a draw maps outside the
    /// field resolution instead of clamping.
    pub fn sample_strict<R: Rng>(
        &self,
        chunk_origin: Vec2,
        requested: usize,
        field: &dyn DensityField,
        bounds: &WorldBounds,
        rng: &mut R,
    ) -> Result<Vec<Option<Placement>>, ScatterError> {
        self.sample_inner(chunk_origin, requested, field, bounds, rng, EdgePolicy::Strict)
    }

    fn sample_inner<R: Rng>(
        &self,
        chunk_origin: Vec2,
        requested: usize,
        field: &dyn DensityField,
        bounds: &WorldBounds,
        rng: &mut R,
        policy: EdgePolicy,
    ) -> Result<Vec<Option<Placement>>, ScatterError> {
        let (width, depth) = bounds.horizontal_size();
        if !(width > 0.0) || !(depth > 0.0) || !width.is_finite() || !depth.is_finite() {
            return Err(ScatterError::DegenerateLevelBounds { width, depth });
        }

        let (field_w, field_h) = field.resolution();
        if field_w == 0 || field_h == 0 {
            return Err(ScatterError::Configuration(format!(
                "density field has zero resolution ({}x{})",
                field_w, field_h
            )));
        }
        let mut slots = Vec::with_capacity(requested);

        for _ in 0..requested {
            let x = rng.gen_range(0.0..self.chunk_size);
            let z = rng.gen_range(0.0..self.chunk_size);
            let world = chunk_origin.add(Vec2::new(x, z));

            // Normalize against the horizontal extents only.
            let u = world.x / width;
            let v = world.z / depth;
            let px = (u * field_w as f32).floor() as i64;
            let py = (v * field_h as f32).floor() as i64;

            let (px, py) = match policy {
                EdgePolicy::Clamp => (
                    px.clamp(0, field_w as i64 - 1) as u32,
                    py.clamp(0, field_h as i64 - 1) as u32,
                ),
                EdgePolicy::Strict => {
                    if px < 0 || py < 0 || px >= field_w as i64 || py >= field_h as i64 {
                        return Err(ScatterError::OutOfRangeSample {
                            px,
                            py,
                            width: field_w,
                            height: field_h,
                        });
                    }
                    (px as u32, py as u32)
                }
            };

            let density = field.sample(px, py)[0];
            if density > REJECTION_THRESHOLD {
                // Discard without retry; the slot stays empty.
                slots.push(None);
                continue;
            }

            let scale = rng.gen_range(SCALE_MIN..=SCALE_MAX);
            let tint: f32 = rng.gen();
            slots.push(Some(Placement {
                local_offset: Vec2::new(x, z),
                height_offset: HEIGHT_OFFSET,
                scale,
                color: [tint, 1.0, 0.0, 1.0],
            }));
        }

        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::GridDensityField;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn dense_field_rejects_every_slot() {
        let field = GridDensityField::new_with(4, 4, 0.9);
        let bounds = WorldBounds::flat(40.0, 40.0);
        let sampler = ScatterSampler::new(10.0);
        let slots = sampler
            .sample(Vec2::ZERO, 1, &field, &bounds, &mut rng())
            .unwrap();
        assert_eq!(slots.len(), 1);
        assert!(slots[0].is_none());
    }

    #[test]
    fn empty_field_accepts_all_slots_inside_the_chunk() {
        let field = GridDensityField::new_with(4, 4, 0.0);
        let bounds = WorldBounds::flat(400.0, 400.0);
        let sampler = ScatterSampler::new(10.0);
        let slots = sampler
            .sample(Vec2::new(100.0, 200.0), 3, &field, &bounds, &mut rng())
            .unwrap();
        assert_eq!(slots.len(), 3);
        for slot in &slots {
            let p = slot.expect("zero density must accept every draw");
            let pos = p.world_position(Vec2::new(100.0, 200.0));
            assert!((100.0..110.0).contains(&pos.x), "x = {}", pos.x);
            assert!((200.0..210.0).contains(&pos.z), "z = {}", pos.z);
        }
    }

    #[test]
    fn density_exactly_at_threshold_is_accepted() {
        // The rule is strictly-greater-than, so 0.8 itself passes.
        let field = GridDensityField::new_with(4, 4, REJECTION_THRESHOLD);
        let bounds = WorldBounds::flat(40.0, 40.0);
        let sampler = ScatterSampler::new(10.0);
        let slots = sampler
            .sample(Vec2::ZERO, 5, &field, &bounds, &mut rng())
            .unwrap();
        assert!(slots.iter().all(|s| s.is_some()));
    }

    #[test]
    fn accepted_placements_have_bounded_scale_and_tint() {
        let field = GridDensityField::new_with(4, 4, 0.0);
        let bounds = WorldBounds::flat(100.0, 100.0);
        let sampler = ScatterSampler::new(25.0);
        let slots = sampler
            .sample(Vec2::ZERO, 200, &field, &bounds, &mut rng())
            .unwrap();
        for p in slots.iter().flatten() {
            assert!((SCALE_MIN..=SCALE_MAX).contains(&p.scale));
            assert!((0.0..=1.0).contains(&p.color[0]));
            assert_eq!(p.color[1], 1.0);
            assert_eq!(p.color[2], 0.0);
            assert_eq!(p.color[3], 1.0);
            assert_eq!(p.height_offset, HEIGHT_OFFSET);
        }
    }

    #[test]
    fn accepted_positions_requery_below_threshold() {
        // Left half of the field is too dense, right half open.
        let mut field = GridDensityField::new_with(10, 10, 0.0);
        field.fill_rect(0, 0, 5, 10, 0.95);
        let bounds = WorldBounds::flat(100.0, 100.0);
        let sampler = ScatterSampler::new(100.0);
        let slots = sampler
            .sample(Vec2::ZERO, 300, &field, &bounds, &mut rng())
            .unwrap();

        let accepted: Vec<_> = slots.iter().flatten().collect();
        assert!(!accepted.is_empty());
        assert!(accepted.len() < 300, "the dense half must reject draws");
        for p in accepted {
            let pos = p.world_position(Vec2::ZERO);
            let px = (pos.x / 100.0 * 10.0).floor() as u32;
            let py = (pos.z / 100.0 * 10.0).floor() as u32;
            assert!(field.sample(px, py)[0] <= REJECTION_THRESHOLD);
        }
    }

    #[test]
    fn degenerate_bounds_are_rejected_up_front() {
        let field = GridDensityField::new_with(4, 4, 0.0);
        let sampler = ScatterSampler::new(10.0);
        let err = sampler
            .sample(
                Vec2::ZERO,
                1,
                &field,
                &WorldBounds::flat(0.0, 300.0),
                &mut rng(),
            )
            .unwrap_err();
        assert!(matches!(err, ScatterError::DegenerateLevelBounds { .. }));

        let err = sampler
            .sample(
                Vec2::ZERO,
                1,
                &field,
                &WorldBounds::flat(400.0, f32::NAN),
                &mut rng(),
            )
            .unwrap_err();
        assert!(matches!(err, ScatterError::DegenerateLevelBounds { .. }));
    }

    #[test]
    fn overhanging_chunk_clamps_to_border_pixels() {
        // Chunk entirely past the level bounds: u >= 1 for every draw.
        let field = GridDensityField::new_with(10, 10, 0.0);
        let bounds = WorldBounds::flat(100.0, 100.0);
        let sampler = ScatterSampler::new(10.0);
        let slots = sampler
            .sample(Vec2::new(100.0, 100.0), 4, &field, &bounds, &mut rng())
            .unwrap();
        assert!(slots.iter().all(|s| s.is_some()));
    }

    #[test]
    fn strict_mode_reports_out_of_range_samples() {
        let field = GridDensityField::new_with(10, 10, 0.0);
        let bounds = WorldBounds::flat(100.0, 100.0);
        let sampler = ScatterSampler::new(10.0);
        let err = sampler
            .sample_strict(Vec2::new(100.0, 100.0), 1, &field, &bounds, &mut rng())
            .unwrap_err();
        match err {
            ScatterError::OutOfRangeSample { px, py, .. } => {
                assert!(px >= 10 || py >= 10);
            }
            other => panic!("expected OutOfRangeSample, got {:?}", other),
        }
    }

    #[test]
    fn zero_resolution_field_is_a_configuration_error() {
        let field = GridDensityField::new_with(0, 0, 0.0);
        let bounds = WorldBounds::flat(100.0, 100.0);
        let sampler = ScatterSampler::new(10.0);
        let err = sampler
            .sample(Vec2::ZERO, 1, &field, &bounds, &mut rng())
            .unwrap_err();
        assert!(matches!(err, ScatterError::Configuration(_)));
    }

    #[test]
    fn zero_requested_yields_empty_output() {
        let field = GridDensityField::new_with(4, 4, 0.0);
        let bounds = WorldBounds::flat(40.0, 40.0);
        let sampler = ScatterSampler::new(10.0);
        let slots = sampler
            .sample(Vec2::ZERO, 0, &field, &bounds, &mut rng())
            .unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn identical_seeds_reproduce_identical_placements() {
        let field = GridDensityField::new_with(8, 8, 0.0);
        let bounds = WorldBounds::flat(200.0, 200.0);
        let sampler = ScatterSampler::new(50.0);
        let a = sampler
            .sample(
                Vec2::new(50.0, 50.0),
                20,
                &field,
                &bounds,
                &mut ChaCha8Rng::seed_from_u64(99),
            )
            .unwrap();
        let b = sampler
            .sample(
                Vec2::new(50.0, 50.0),
                20,
                &field,
                &bounds,
                &mut ChaCha8Rng::seed_from_u64(99),
            )
            .unwrap();
        assert_eq!(a, b);
    }
}
