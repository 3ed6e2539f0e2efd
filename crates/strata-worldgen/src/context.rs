//! The world-generation context: lifecycle-scoped owner of every piece of
//! state generation needs.
//!
//! Nothing here is process-global. A context is built per world from the
//! seed, the config, the block registry, and the loaded variant tables, and
//! torn down with the world; two contexts never share mutable state, so
//! repeated or parallel world generations (including tests) are isolated.

use serde::Deserialize;
use strata_assets::WorldGenAssets;
use strata_maps::climate::{ClimateSource, NoiseClimatePatchy, NoiseClimateRealistic, SubSampledClimate};
use strata_maps::{BoxBlur, FuzzyZoom, GenLayer, NoiseIndex, NoiseOcean, PerlinWobble};
use strata_noise::{ChunkRand, NormalizedOctaveNoise, round_random};
use tracing::info;

use crate::access::{CHUNK_SIZE, ChunkRect, WorldBlocks};
use crate::deposit::{DepositKind, MAX_RADIUS, ResolvedDeposit};
use crate::patches::ResolvedPatch;
use crate::region::RegionMaps;
use crate::registry::BlockRegistry;

/// Climate model selection.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClimateMode {
    /// Independent random climate patches.
    Patchy,
    /// Latitude-banded temperature with a spawn temperature band.
    Realistic {
        /// Equator-to-pole distance in blocks.
        half_range: i32,
        /// Coldest acceptable spawn temperature, degrees Celsius.
        spawn_min_temp: f32,
        /// Warmest acceptable spawn temperature, degrees Celsius.
        spawn_max_temp: f32,
    },
}

/// World-generation tunables, deserialized from the world config asset.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorldGenConfig {
    /// World height in blocks.
    pub map_height: i32,
    /// Sea level in blocks.
    pub sea_level: i32,
    /// Region edge length in chunks.
    pub region_chunks: usize,
    /// Blocks per region-map cell.
    pub map_cell: usize,
    /// Approximate land fraction of the world.
    pub land_cover: f64,
    /// Climate model.
    pub climate: ClimateMode,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            map_height: 256,
            sea_level: 110,
            region_chunks: 16,
            map_cell: 8,
            land_cover: 0.65,
            climate: ClimateMode::Patchy,
        }
    }
}

// Per-concern seed offsets decorrelating layers that share the world seed.
const SEED_CLIMATE: i64 = 1;
const SEED_CLIMATE_WOBBLE: i64 = 2;
const SEED_LANDFORM: i64 = 3;
const SEED_LANDFORM_ZOOM_A: i64 = 4;
const SEED_LANDFORM_ZOOM_B: i64 = 5;
const SEED_LANDFORM_WOBBLE: i64 = 6;
const SEED_PROVINCE: i64 = 7;
const SEED_PROVINCE_ZOOM: i64 = 8;
const SEED_PROVINCE_WOBBLE: i64 = 9;
const SEED_OCEAN: i64 = 10;
const SEED_OCEAN_WOBBLE: i64 = 11;
const SEED_FOREST: i64 = 12;
const SEED_SHRUB: i64 = 13;
const SEED_ORE_FACTOR: i64 = 14;
const SEED_ORE_DISTORT_TOP: i64 = 15;
const SEED_ORE_DISTORT_BOTTOM: i64 = 16;
const SEED_DEPOSIT_STREAM: i64 = 17;
const SEED_DEPOSIT_VARIANT_BASE: i64 = 1000;
const SEED_CHILD_BASE: i64 = 2000;

/// Climate lattice spacing in map cells.
const CLIMATE_SUB_SCALE: usize = 4;

/// Owns the layer chains, resolved variant tables, and registry for one
/// world's generation.
pub struct WorldGenContext {
    pub seed: i64,
    pub config: WorldGenConfig,
    pub registry: BlockRegistry,
    pub deposits: Vec<ResolvedDeposit>,
    pub patches: Vec<ResolvedPatch>,
    pub(crate) climate_chain: Box<dyn GenLayer>,
    pub(crate) landform_chain: Box<dyn GenLayer>,
    pub(crate) province_chain: Box<dyn GenLayer>,
    pub(crate) ocean_chain: Box<dyn GenLayer>,
    pub(crate) forest_noise: NormalizedOctaveNoise,
    pub(crate) shrub_noise: NormalizedOctaveNoise,
    pub(crate) ore_factor_noise: NormalizedOctaveNoise,
    pub(crate) distort_top_noise: NormalizedOctaveNoise,
    pub(crate) distort_bottom_noise: NormalizedOctaveNoise,
    /// Kept for latitude queries (calendar day length); present only in
    /// realistic climate mode.
    realistic_climate: Option<NoiseClimateRealistic>,
}

impl WorldGenContext {
    /// Assemble a context. Deposit and patch variants that fail to resolve
    /// against the registry are logged and dropped; everything else
    /// proceeds.
    pub fn new(
        seed: i64,
        config: WorldGenConfig,
        registry: BlockRegistry,
        assets: &WorldGenAssets,
    ) -> Self {
        let make_realistic = |half_range: i32, min_temp: f32, max_temp: f32| {
            NoiseClimateRealistic::new(
                seed.wrapping_add(SEED_CLIMATE),
                (half_range / config.map_cell as i32).max(1),
                min_temp,
                max_temp,
            )
        };
        let (climate_source, realistic_climate): (Box<dyn ClimateSource>, _) = match &config.climate
        {
            ClimateMode::Patchy => (
                Box::new(NoiseClimatePatchy::new(seed.wrapping_add(SEED_CLIMATE))),
                None,
            ),
            ClimateMode::Realistic {
                half_range,
                spawn_min_temp,
                spawn_max_temp,
            } => (
                Box::new(make_realistic(*half_range, *spawn_min_temp, *spawn_max_temp)),
                Some(make_realistic(*half_range, *spawn_min_temp, *spawn_max_temp)),
            ),
        };

        let climate_chain: Box<dyn GenLayer> = Box::new(BoxBlur::new(
            Box::new(PerlinWobble::new(
                Box::new(SubSampledClimate::new(climate_source, CLIMATE_SUB_SCALE)),
                seed.wrapping_add(SEED_CLIMATE_WOBBLE),
                3.0,
            )),
            3,
        ));

        let landform_weights: Vec<i32> = assets.landforms.iter().map(|l| l.weight).collect();
        let landform_chain: Box<dyn GenLayer> = Box::new(PerlinWobble::new(
            Box::new(FuzzyZoom::new(
                Box::new(FuzzyZoom::new(
                    Box::new(NoiseIndex::new(
                        seed.wrapping_add(SEED_LANDFORM),
                        landform_weights,
                    )),
                    seed.wrapping_add(SEED_LANDFORM_ZOOM_A),
                )),
                seed.wrapping_add(SEED_LANDFORM_ZOOM_B),
            )),
            seed.wrapping_add(SEED_LANDFORM_WOBBLE),
            2.5,
        ));

        let province_weights: Vec<i32> = assets.provinces.iter().map(|p| p.weight).collect();
        let province_chain: Box<dyn GenLayer> = Box::new(PerlinWobble::new(
            Box::new(FuzzyZoom::new(
                Box::new(NoiseIndex::new(
                    seed.wrapping_add(SEED_PROVINCE),
                    province_weights,
                )),
                seed.wrapping_add(SEED_PROVINCE_ZOOM),
            )),
            seed.wrapping_add(SEED_PROVINCE_WOBBLE),
            2.0,
        ));

        let ocean_chain: Box<dyn GenLayer> = Box::new(PerlinWobble::new(
            Box::new(NoiseOcean::new(
                seed.wrapping_add(SEED_OCEAN),
                config.land_cover,
                48.0,
            )),
            seed.wrapping_add(SEED_OCEAN_WOBBLE),
            3.0,
        ));

        let deposits: Vec<ResolvedDeposit> = assets
            .deposits
            .iter()
            .filter_map(|def| ResolvedDeposit::resolve(def, &registry, seed))
            .collect();
        let patches: Vec<ResolvedPatch> = assets
            .patches
            .iter()
            .filter_map(|def| ResolvedPatch::resolve(def, &registry))
            .collect();

        info!(
            deposits = deposits.len(),
            patches = patches.len(),
            landforms = assets.landforms.len(),
            provinces = assets.provinces.len(),
            "world-generation context ready"
        );

        Self {
            seed,
            config,
            registry,
            deposits,
            patches,
            climate_chain,
            landform_chain,
            province_chain,
            ocean_chain,
            forest_noise: NormalizedOctaveNoise::from_default_octaves(
                seed.wrapping_add(SEED_FOREST),
                4,
                0.6,
                16.0,
            ),
            shrub_noise: NormalizedOctaveNoise::from_default_octaves(
                seed.wrapping_add(SEED_SHRUB),
                4,
                0.6,
                16.0,
            ),
            ore_factor_noise: NormalizedOctaveNoise::from_default_octaves(
                seed.wrapping_add(SEED_ORE_FACTOR),
                3,
                0.5,
                24.0,
            ),
            distort_top_noise: NormalizedOctaveNoise::from_default_octaves(
                seed.wrapping_add(SEED_ORE_DISTORT_TOP),
                3,
                0.5,
                12.0,
            ),
            distort_bottom_noise: NormalizedOctaveNoise::from_default_octaves(
                seed.wrapping_add(SEED_ORE_DISTORT_BOTTOM),
                3,
                0.5,
                12.0,
            ),
            realistic_climate,
        }
    }

    /// Compute the cached maps for a region. Call once per region and share
    /// the result read-only with every chunk worker.
    pub fn generate_region(&self, rx: i32, rz: i32) -> RegionMaps {
        RegionMaps::generate(self, rx, rz)
    }

    /// Latitude at a world-Z block coordinate (realistic climate only):
    /// -1 at the south pole, 0 at the equator, +1 at the north pole.
    pub fn latitude(&self, z: i32) -> Option<f64> {
        self.realistic_climate
            .as_ref()
            .map(|c| c.latitude(f64::from(z) / self.config.map_cell as f64))
    }

    /// Generate all deposits affecting one chunk.
    ///
    /// Candidate deposit centers are drawn for every source chunk within
    /// reach of the maximum radius; each candidate's own draws are seeded
    /// from its center position, so the cells a border-straddling deposit
    /// places are identical from every requesting chunk.
    pub fn generate_chunk_deposits(
        &self,
        world: &mut dyn WorldBlocks,
        maps: &RegionMaps,
        chunk: ChunkRect,
    ) -> u32 {
        let cs = CHUNK_SIZE as i32;
        let scan = (MAX_RADIUS as u32).div_ceil(cs as u32) as i32;
        let mut total = 0;
        let mut children = Vec::new();

        for source_cz in (chunk.chunk_z - scan)..=(chunk.chunk_z + scan) {
            for source_cx in (chunk.chunk_x - scan)..=(chunk.chunk_x + scan) {
                let mut placement_rng = ChunkRand::new(self.seed.wrapping_add(SEED_DEPOSIT_STREAM));
                placement_rng.init_position_seed(source_cx, source_cz);

                for (variant, deposit) in self.deposits.iter().enumerate() {
                    let tries_float = deposit.tries_per_chunk.next_float(&mut placement_rng);
                    let tries = round_random(&mut placement_rng, tries_float);
                    for _ in 0..tries {
                        let x = source_cx * cs + placement_rng.next_int(cs);
                        let z = source_cz * cs + placement_rng.next_int(cs);
                        // The gate draw always happens so the stream length
                        // never depends on the ore map.
                        let gate = placement_rng.next_float();
                        let mut ore_factor = 1.0f32;
                        if deposit.with_ore_map {
                            let factor = self.ore_factor_noise.noise(
                                f64::from(x) / self.config.map_cell as f64,
                                f64::from(z) / self.config.map_cell as f64,
                            ) as f32;
                            if gate > factor {
                                continue;
                            }
                            ore_factor = factor;
                        }

                        let mut deposit_rng = ChunkRand::new(
                            self.seed
                                .wrapping_add(SEED_DEPOSIT_VARIANT_BASE)
                                .wrapping_add(variant as i64),
                        );
                        deposit_rng.init_position_seed(x, z);

                        children.clear();
                        total += match &deposit.kind {
                            DepositKind::Disc(disc) => disc.generate(
                                world,
                                &self.registry,
                                Some(maps),
                                chunk,
                                x,
                                z,
                                &mut deposit_rng,
                                ore_factor,
                                &mut children,
                            ),
                            DepositKind::Alluvial(alluvial) => {
                                alluvial.generate(world, chunk, x, z, &mut deposit_rng)
                            }
                        };

                        // Children run only after the parent finished.
                        for request in children.drain(..) {
                            let child = &deposit.children[request.child];
                            let mut child_rng = ChunkRand::new(
                                self.seed
                                    .wrapping_add(SEED_CHILD_BASE)
                                    .wrapping_add(request.child as i64),
                            );
                            child_rng.init_position_seed(
                                request.pos.x.wrapping_add(request.pos.y.wrapping_mul(7919)),
                                request.pos.z,
                            );
                            total += child.generate(world, chunk, request.pos, &mut child_rng);
                        }
                    }
                }
            }
        }
        total
    }

    /// Place climate-gated decorative patches in one chunk.
    pub fn generate_chunk_patches(
        &self,
        world: &mut dyn WorldBlocks,
        maps: &RegionMaps,
        chunk: ChunkRect,
    ) -> u32 {
        crate::patches::generate_chunk_patches(self, world, maps, chunk)
    }
}
