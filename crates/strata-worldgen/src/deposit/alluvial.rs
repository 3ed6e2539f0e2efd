//! Alluvial deposits: sediment sheets that hug the terrain surface.

use strata_assets::{DepositDef, GradeDistribution};
use strata_maps::interp::smoothstep;
use strata_noise::{ChunkRand, NatFloat, round_random};

use crate::access::{ChunkRect, WorldBlocks};
use crate::registry::AIR;

use super::{EdgeDistortion, MAX_RADIUS, PlacementTable, pick_grade};

/// Relative map height splitting the sand-favored uplands from the
/// gravel-favored lowlands.
const SEDIMENT_HEIGHT_SPLIT: f32 = 0.5;
/// Sand probability when the deposit center sits above the split.
const SAND_BIAS_ABOVE: f32 = 0.75;
/// Sand probability below the split.
const SAND_BIAS_BELOW: f32 = 0.25;

/// Sediment sheet generator. Placement always follows the terrain height
/// map directly (no vertical placement policy), and a single per-deposit
/// coin flip, biased by the center column's elevation, decides between the
/// sand and gravel outcomes.
pub struct AlluvialDeposit {
    code: String,
    radius: NatFloat,
    thickness: NatFloat,
    grade: GradeDistribution,
    sand_table: PlacementTable,
    gravel_table: PlacementTable,
    distortion: EdgeDistortion,
}

impl AlluvialDeposit {
    pub(crate) fn new(
        def: &DepositDef,
        radius: NatFloat,
        sand_table: PlacementTable,
        gravel_table: PlacementTable,
        world_seed: i64,
    ) -> Self {
        Self {
            code: def.code.clone(),
            radius,
            thickness: def.thickness,
            grade: def.grade_distribution,
            sand_table,
            gravel_table,
            distortion: EdgeDistortion::new(world_seed.wrapping_add(0x5ED1)),
        }
    }

    /// Variant name, for log messages.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Generate one sediment sheet centered at a column, writing only cells
    /// inside `target`.
    pub fn generate(
        &self,
        world: &mut dyn WorldBlocks,
        target: ChunkRect,
        center_x: i32,
        center_z: i32,
        rng: &mut ChunkRand,
    ) -> u32 {
        let radius = self.radius.next_float(rng).min(MAX_RADIUS);
        if radius < 1.0 {
            return 0;
        }
        let radius_x = f64::from(radius * (1.0 + 0.25 * (2.0 * rng.next_float() - 1.0)));
        let radius_z = f64::from(radius * (1.0 + 0.25 * (2.0 * rng.next_float() - 1.0)));
        let reach_x = radius_x.ceil() as i32;
        let reach_z = radius_z.ceil() as i32;
        if !target.intersects_box(
            center_x - reach_x,
            center_z - reach_z,
            center_x + reach_x,
            center_z + reach_z,
        ) {
            return 0;
        }

        let center_surface = f32::from(world.terrain_height(center_x, center_z));
        let above = center_surface > SEDIMENT_HEIGHT_SPLIT * world.map_height() as f32;
        let sand_bias = if above { SAND_BIAS_ABOVE } else { SAND_BIAS_BELOW };
        let table = if rng.next_float() < sand_bias {
            &self.sand_table
        } else {
            &self.gravel_table
        };

        let base_thickness = self.thickness.next_float(rng);
        if base_thickness <= 0.0 {
            return 0;
        }
        let col_stream_seed =
            (i64::from(rng.next_int(1 << 30)) << 31) ^ i64::from(rng.next_int(1 << 30));
        let mut col_rng = ChunkRand::new(col_stream_seed);

        let x_min = (center_x - reach_x).max(target.min_x());
        let x_max = (center_x + reach_x).min(target.max_x());
        let z_min = (center_z - reach_z).max(target.min_z());
        let z_max = (center_z + reach_z).min(target.max_z());

        let mut placed = 0;
        for z in z_min..=z_max {
            for x in x_min..=x_max {
                let dx = f64::from(x - center_x);
                let dz = f64::from(z - center_z);
                let dist = (dx * dx) / (radius_x * radius_x) + (dz * dz) / (radius_z * radius_z);
                let edge = self.distortion.edge(x, z);
                let signal = edge - dist;
                if signal <= 0.0 {
                    continue;
                }

                col_rng.init_position_seed(x, z);
                let taper = (signal / edge).clamp(0.0, 1.0);
                let thickness = round_random(
                    &mut col_rng,
                    base_thickness * (0.55 + 0.45 * smoothstep(taper) as f32),
                );
                if thickness <= 0 {
                    continue;
                }

                let surface = i32::from(world.terrain_height(x, z));
                for step in 0..thickness {
                    let y = surface - step;
                    if y < 1 {
                        break;
                    }
                    let host = world.block(x, y, z);
                    let Some(variants) = table.get(&host) else {
                        continue;
                    };
                    let relative_depth = (surface - y) as f32 / surface.max(1) as f32;
                    let id = pick_grade(variants, self.grade, &mut col_rng, relative_depth);
                    world.set_block(x, y, z, id);
                    world.set_fluid(x, y, z, AIR);
                    placed += 1;
                }
            }
        }
        placed
    }
}
