//! Child deposits: small satellite pockets seeded from parent deposit
//! cells, placed by rejection sampling instead of disc geometry.

use strata_assets::{ChildDepositDef, GradeDistribution};
use strata_noise::{ChunkRand, NatFloat};
use tracing::warn;

use crate::access::{BlockPos, ChunkRect, WorldBlocks};
use crate::registry::{AIR, BlockRegistry};

use super::{PlacementTable, pick_grade};

/// Satellite pocket generator. Ignores radius/ellipse logic entirely:
/// `attempts` random points are sampled inside a cube around the parent
/// cell and each is accepted only if the block already there matches a
/// resolved in-block.
pub struct ChildDeposit {
    code: String,
    radius: NatFloat,
    attempts: u32,
    grade: GradeDistribution,
    table: PlacementTable,
}

impl ChildDeposit {
    /// Resolve a child definition; an unresolvable place-block disables it.
    pub(crate) fn resolve(def: &ChildDepositDef, registry: &BlockRegistry) -> Option<Self> {
        let place = registry.search(&def.place_block);
        if place.is_empty() {
            warn!(
                child = %def.code,
                pattern = %def.place_block,
                "child place-block pattern matches no registered blocks; child disabled"
            );
            return None;
        }
        let table = super::placement_table(registry, &def.in_block_codes, &place, &def.code);
        Some(Self {
            code: def.code.clone(),
            radius: def.radius,
            attempts: def.attempts,
            grade: def.grade_distribution,
            table,
        })
    }

    /// Variant name, for log messages.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Place one child pocket around `pos`, restricted to `target`.
    pub fn generate(
        &self,
        world: &mut dyn WorldBlocks,
        target: ChunkRect,
        pos: BlockPos,
        rng: &mut ChunkRand,
    ) -> u32 {
        let half = self.radius.next_float(rng).round().max(1.0) as i32;
        let span = 2 * half + 1;
        let mut placed = 0;
        for _ in 0..self.attempts {
            let x = pos.x + rng.next_int(span) - half;
            let y = pos.y + rng.next_int(span) - half;
            let z = pos.z + rng.next_int(span) - half;
            if y < 1 || y >= world.map_height() || !target.contains(x, z) {
                continue;
            }
            let host = world.block(x, y, z);
            let Some(variants) = self.table.get(&host) else {
                continue;
            };
            let surface = i32::from(world.terrain_height(x, z));
            let relative_depth = (surface - y) as f32 / surface.max(1) as f32;
            let id = pick_grade(variants, self.grade, rng, relative_depth);
            world.set_block(x, y, z, id);
            world.set_fluid(x, y, z, AIR);
            placed += 1;
        }
        placed
    }
}
