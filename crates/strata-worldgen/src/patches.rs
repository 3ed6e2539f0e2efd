//! Climate-gated decorative block patches.
//!
//! Patches run after terrain and deposits: each chunk gets its own ChaCha8
//! stream derived from the world seed and chunk coordinate, and every
//! candidate column is accepted only if the region maps' climate readings
//! fall inside the variant's configured bands.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strata_assets::BlockPatchDef;
use strata_maps::climate::{descale_temperature, rainfall, temperature};
use strata_noise::NatFloat;
use tracing::warn;

use crate::access::{CHUNK_SIZE, ChunkRect, WorldBlocks};
use crate::context::WorldGenContext;
use crate::region::RegionMaps;
use crate::registry::{AIR, BlockId, BlockRegistry};

/// A patch variant with its block codes resolved.
pub struct ResolvedPatch {
    pub code: String,
    blocks: Vec<BlockId>,
    chance: f32,
    quantity: NatFloat,
    min_temp: f32,
    max_temp: f32,
    min_rain: f32,
    max_rain: f32,
    min_forest: f32,
    max_forest: f32,
}

impl ResolvedPatch {
    /// Resolve a patch definition; a variant whose block codes all fail to
    /// resolve is logged and dropped.
    pub fn resolve(def: &BlockPatchDef, registry: &BlockRegistry) -> Option<Self> {
        let mut blocks = Vec::new();
        for pattern in &def.block_codes {
            let mut found = registry.search(pattern);
            if found.is_empty() {
                warn!(patch = %def.code, pattern = %pattern, "patch block pattern matches nothing");
            }
            blocks.append(&mut found);
        }
        if blocks.is_empty() {
            warn!(patch = %def.code, "no placeable blocks resolved; patch disabled");
            return None;
        }
        Some(Self {
            code: def.code.clone(),
            blocks,
            chance: def.chance,
            quantity: def.quantity,
            min_temp: def.min_temp,
            max_temp: def.max_temp,
            min_rain: def.min_rain,
            max_rain: def.max_rain,
            min_forest: def.min_forest,
            max_forest: def.max_forest,
        })
    }
}

/// Derive the decoration seed for a chunk from the world seed and chunk
/// coordinates.
fn derive_chunk_seed(world_seed: i64, chunk_x: i32, chunk_z: i32) -> u64 {
    let mut hasher = DefaultHasher::new();
    world_seed.hash(&mut hasher);
    chunk_x.hash(&mut hasher);
    chunk_z.hash(&mut hasher);
    hasher.finish()
}

/// Place every patch variant's blocks for one chunk. Returns the number of
/// blocks placed.
pub(crate) fn generate_chunk_patches(
    ctx: &WorldGenContext,
    world: &mut dyn WorldBlocks,
    maps: &RegionMaps,
    chunk: ChunkRect,
) -> u32 {
    let mut rng = ChaCha8Rng::seed_from_u64(derive_chunk_seed(ctx.seed, chunk.chunk_x, chunk.chunk_z));
    let mut placed = 0;
    for patch in &ctx.patches {
        if rng.random::<f32>() >= patch.chance {
            continue;
        }
        let count = patch
            .quantity
            .sample_with(|| rng.random::<f32>())
            .round()
            .max(0.0) as i32;
        for _ in 0..count {
            let x = chunk.min_x() + rng.random_range(0..CHUNK_SIZE as i32);
            let z = chunk.min_z() + rng.random_range(0..CHUNK_SIZE as i32);

            let climate = maps.climate_at(x, z);
            let temp = descale_temperature(f32::from(temperature(climate)));
            let rain = f32::from(rainfall(climate)) / 255.0;
            let forest = maps.forest_at(x, z);
            if temp < patch.min_temp
                || temp > patch.max_temp
                || rain < patch.min_rain
                || rain > patch.max_rain
                || forest < patch.min_forest
                || forest > patch.max_forest
            {
                continue;
            }

            // Plants sit on the rain-permeable surface.
            let surface = i32::from(world.rain_height(x, z));
            let y = surface + 1;
            if y >= world.map_height()
                || world.block(x, y, z) != AIR
                || !ctx.registry.is_solid(world.block(x, surface, z))
            {
                continue;
            }
            let block = patch.blocks[rng.random_range(0..patch.blocks.len())];
            world.set_block(x, y, z, block);
            placed += 1;
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::MemoryWorld;
    use crate::context::{WorldGenConfig, WorldGenContext};
    use strata_assets::WorldGenAssets;

    fn registry() -> BlockRegistry {
        let mut reg = BlockRegistry::new();
        for code in ["rock-granite", "flower-poppy", "flower-lily"] {
            reg.register(code, true).unwrap();
        }
        reg
    }

    fn patch_def(code: &str, min_temp: f32, max_temp: f32) -> BlockPatchDef {
        BlockPatchDef {
            code: code.into(),
            block_codes: vec!["flower-*".into()],
            chance: 1.0,
            quantity: NatFloat::create_uniform(12.0, 0.0),
            min_temp,
            max_temp,
            ..BlockPatchDef::default()
        }
    }

    fn context(patches: Vec<BlockPatchDef>) -> WorldGenContext {
        let assets = WorldGenAssets {
            patches,
            ..WorldGenAssets::default()
        };
        WorldGenContext::new(42, WorldGenConfig::default(), registry(), &assets)
    }

    #[test]
    fn test_patches_sit_on_the_surface() {
        let ctx = context(vec![patch_def("flowers", -20.0, 40.0)]);
        let maps = ctx.generate_region(0, 0);
        let reg = registry();
        let stone = reg.lookup("rock-granite").unwrap();
        let flowers = reg.search("flower-*");
        let mut world = MemoryWorld::flat(128, 60, 70, stone);
        let placed = ctx.generate_chunk_patches(&mut world, &maps, ChunkRect::new(0, 0));
        assert!(placed > 0, "open climate bands placed nothing");

        let mut found = 0;
        for x in 0..32 {
            for z in 0..32 {
                for y in 0..128 {
                    if flowers.contains(&world.block(x, y, z)) {
                        assert_eq!(y, 71, "patch block not directly above the surface");
                        found += 1;
                    }
                }
            }
        }
        assert_eq!(found, placed as usize);
    }

    #[test]
    fn test_impossible_climate_band_blocks_placement() {
        // A band outside the representable temperature range can never be
        // satisfied.
        let ctx = context(vec![patch_def("ghost", 100.0, 120.0)]);
        let maps = ctx.generate_region(0, 0);
        let reg = registry();
        let stone = reg.lookup("rock-granite").unwrap();
        let mut world = MemoryWorld::flat(128, 60, 70, stone);
        let placed = ctx.generate_chunk_patches(&mut world, &maps, ChunkRect::new(0, 0));
        assert_eq!(placed, 0);
    }

    #[test]
    fn test_chunk_stream_is_deterministic() {
        let ctx = context(vec![patch_def("flowers", -20.0, 40.0)]);
        let maps = ctx.generate_region(0, 0);
        let reg = registry();
        let stone = reg.lookup("rock-granite").unwrap();
        let flowers = reg.search("flower-*");

        let run = || {
            let mut world = MemoryWorld::flat(128, 60, 70, stone);
            ctx.generate_chunk_patches(&mut world, &maps, ChunkRect::new(2, 2));
            let mut cells = Vec::new();
            for x in 64..96 {
                for z in 64..96 {
                    let b = world.block(x, 71, z);
                    if flowers.contains(&b) {
                        cells.push((x, z, b));
                    }
                }
            }
            cells
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_unresolvable_patch_is_dropped() {
        let reg = registry();
        let def = BlockPatchDef {
            code: "ghost".into(),
            block_codes: vec!["mushroom-*".into()],
            ..BlockPatchDef::default()
        };
        assert!(ResolvedPatch::resolve(&def, &reg).is_none());
    }

    #[test]
    fn test_different_chunks_place_differently() {
        let ctx = context(vec![patch_def("flowers", -20.0, 40.0)]);
        let maps = ctx.generate_region(0, 0);
        let reg = registry();
        let stone = reg.lookup("rock-granite").unwrap();
        let flowers = reg.search("flower-*");
        let mut world = MemoryWorld::flat(128, 60, 70, stone);
        ctx.generate_chunk_patches(&mut world, &maps, ChunkRect::new(0, 0));
        ctx.generate_chunk_patches(&mut world, &maps, ChunkRect::new(1, 0));

        let columns = |x0: i32| -> Vec<(i32, i32)> {
            let mut out = Vec::new();
            for x in x0..x0 + 32 {
                for z in 0..32 {
                    if flowers.contains(&world.block(x, 71, z)) {
                        out.push((x - x0, z));
                    }
                }
            }
            out
        };
        assert_ne!(
            columns(0),
            columns(32),
            "two chunks produced identical patch layouts"
        );
    }
}
