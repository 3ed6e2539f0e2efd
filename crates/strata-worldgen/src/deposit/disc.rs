//! Disc deposit generator: distorted elliptical ore bodies with pluggable
//! vertical placement policies.

use strata_assets::{DepositDef, GradeDistribution, Placement};
use strata_maps::interp::smoothstep;
use strata_noise::{ChunkRand, NatFloat, round_random};

use crate::access::{BlockPos, CHUNK_SIZE, ChunkRect, WorldBlocks};
use crate::region::RegionMaps;
use crate::registry::{AIR, BlockId, BlockRegistry};

use super::{ChildRequest, EdgeDistortion, MAX_RADIUS, PlacementTable, pick_grade};

/// Vertical placement resolved for one deposit instance.
///
/// Computed once from the deposit-level RNG stream before any per-cell work,
/// then read immutably by every column; no scratch state survives the call.
#[derive(Clone, Copy, Debug)]
enum PlacementProfile {
    /// A fixed center Y (anywhere / sea-level policies).
    Fixed(i32),
    /// Y as a fraction of each column's terrain height.
    SurfaceFraction(f32),
    /// Y a fixed number of blocks below each column's terrain height.
    SurfaceBelow(i32),
}

impl PlacementProfile {
    fn column_y(&self, surface: i32) -> i32 {
        match *self {
            PlacementProfile::Fixed(y) => y,
            PlacementProfile::SurfaceFraction(frac) => (surface as f32 * frac) as i32,
            PlacementProfile::SurfaceBelow(depth) => surface - depth,
        }
    }
}

/// Per-cell chance scale of surface co-deposits.
const SURFACE_DEPOSIT_CHANCE: f32 = 0.25;
/// Depth in blocks at which surface co-deposits stop appearing.
const SURFACE_DEPOSIT_FALLOFF: f32 = 8.0;

/// Distorted elliptical disc of ore replacing matching host rock.
pub struct DiscDeposit {
    code: String,
    placement: Placement,
    radius: NatFloat,
    thickness: NatFloat,
    y_rel: NatFloat,
    depth: NatFloat,
    grade: GradeDistribution,
    table: PlacementTable,
    surface_block: Option<BlockId>,
    /// Expected child triggers per chunk, aligned with the parent's resolved
    /// child list.
    child_tries: Vec<NatFloat>,
    distortion: EdgeDistortion,
}

impl DiscDeposit {
    pub(crate) fn new(
        def: &DepositDef,
        radius: NatFloat,
        table: PlacementTable,
        surface_block: Option<BlockId>,
        child_tries: Vec<NatFloat>,
        world_seed: i64,
    ) -> Self {
        Self {
            code: def.code.clone(),
            placement: def.placement,
            radius,
            thickness: def.thickness,
            y_rel: def.y_rel,
            depth: def.depth,
            grade: def.grade_distribution,
            table,
            surface_block,
            child_tries,
            distortion: EdgeDistortion::new(world_seed.wrapping_add(hash_code(&def.code))),
        }
    }

    /// Variant name, for log messages.
    pub fn code(&self) -> &str {
        &self.code
    }

    fn profile(&self, world: &dyn WorldBlocks, rng: &mut ChunkRand) -> PlacementProfile {
        match self.placement {
            Placement::Anywhere => {
                PlacementProfile::Fixed(1 + rng.next_int(world.map_height().max(3) - 2))
            }
            Placement::FollowSealevel => {
                let y = (self.y_rel.next_float(rng) * world.sea_level() as f32) as i32;
                PlacementProfile::Fixed(y.max(1))
            }
            Placement::FollowSurface => PlacementProfile::SurfaceFraction(self.y_rel.next_float(rng)),
            Placement::FollowSurfaceBelow => {
                let depth = self.depth.next_float(rng).round().max(1.0) as i32;
                PlacementProfile::SurfaceBelow(depth)
            }
        }
    }

    /// Generate one deposit instance centered at a column, writing only
    /// cells inside `target`. Returns the number of cells placed and pushes
    /// deferred child requests.
    ///
    /// `ore_factor` scales the child trigger rates (1.0 when the variant
    /// carries no ore map).
    #[allow(clippy::too_many_arguments)]
    pub fn generate(
        &self,
        world: &mut dyn WorldBlocks,
        registry: &BlockRegistry,
        maps: Option<&RegionMaps>,
        target: ChunkRect,
        center_x: i32,
        center_z: i32,
        rng: &mut ChunkRand,
        ore_factor: f32,
        children_out: &mut Vec<ChildRequest>,
    ) -> u32 {
        let radius = self.radius.next_float(rng).min(MAX_RADIUS);
        if radius < 1.0 {
            return 0;
        }
        // Deform the two axes independently so deposits are never perfect
        // circles.
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

        let profile = self.profile(world, rng);
        let base_thickness = self.thickness.next_float(rng);
        if base_thickness <= 0.0 {
            return 0;
        }
        let child_rates: Vec<f32> = self
            .child_tries
            .iter()
            .map(|t| t.next_float(rng).max(0.0) * ore_factor / (CHUNK_SIZE * CHUNK_SIZE) as f32)
            .collect();

        // Per-column draws come from a stream re-seeded at each column, so
        // the cells of a border-straddling deposit are identical no matter
        // which chunk requested them.
        let col_stream_seed =
            (i64::from(rng.next_int(1 << 30)) << 31) ^ i64::from(rng.next_int(1 << 30));
        let mut col_rng = ChunkRand::new(col_stream_seed);

        let map_height = world.map_height();
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
                let mut y_top = profile.column_y(surface);
                if let Some(maps) = maps {
                    y_top += maps.vertical_distortion(x, z, y_top, map_height);
                }
                if y_top < 1 {
                    continue;
                }
                y_top = y_top.min(map_height - 1);

                placed += self.fill_column(
                    world,
                    registry,
                    x,
                    z,
                    y_top,
                    thickness,
                    surface,
                    &child_rates,
                    &mut col_rng,
                    children_out,
                );
            }
        }
        placed
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_column(
        &self,
        world: &mut dyn WorldBlocks,
        registry: &BlockRegistry,
        x: i32,
        z: i32,
        y_top: i32,
        thickness: i32,
        surface: i32,
        child_rates: &[f32],
        rng: &mut ChunkRand,
        children_out: &mut Vec<ChildRequest>,
    ) -> u32 {
        let mut placed = 0;
        for step in 0..thickness {
            let y = y_top - step;
            if y < 1 {
                break;
            }
            let host = world.block(x, y, z);
            let Some(variants) = self.table.get(&host) else {
                continue;
            };
            let relative_depth = (surface - y) as f32 / surface.max(1) as f32;
            let id = pick_grade(variants, self.grade, rng, relative_depth);
            world.set_block(x, y, z, id);
            world.set_fluid(x, y, z, AIR);
            placed += 1;

            for (child, rate) in child_rates.iter().enumerate() {
                if rng.next_float() < *rate {
                    children_out.push(ChildRequest {
                        child,
                        pos: BlockPos::new(x, y, z),
                    });
                }
            }

            if let Some(surface_block) = self.surface_block {
                let depth_below = (surface - y) as f32;
                let chance = SURFACE_DEPOSIT_CHANCE * (1.0 - depth_below / SURFACE_DEPOSIT_FALLOFF);
                if chance > 0.0 && rng.next_float() < chance {
                    let above = surface + 1;
                    if world.block(x, above, z) == AIR
                        && registry.is_solid(world.block(x, surface, z))
                    {
                        world.set_block(x, above, z, surface_block);
                    }
                }
            }
        }
        placed
    }
}

/// Small stable hash decorrelating per-variant noise from the world seed.
fn hash_code(code: &str) -> i64 {
    code.bytes()
        .fold(0i64, |acc, b| acc.wrapping_mul(31).wrapping_add(i64::from(b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::MemoryWorld;

    fn registry() -> BlockRegistry {
        let mut reg = BlockRegistry::new();
        for code in [
            "rock-granite",
            "ore-tin-poor",
            "ore-tin-rich",
            "nugget-tin",
            "soil-loam",
        ] {
            reg.register(code, true).unwrap();
        }
        reg
    }

    fn disc(def: &DepositDef, reg: &BlockRegistry, seed: i64) -> DiscDeposit {
        let place = reg.search(&def.place_block);
        let mut table = PlacementTable::new();
        for pattern in &def.in_block_codes {
            for host in reg.search(pattern) {
                table.insert(host, place.clone());
            }
        }
        let surface = def.surface_block.as_deref().and_then(|c| reg.lookup(c));
        DiscDeposit::new(def, def.radius, table, surface, Vec::new(), seed)
    }

    fn uniform_def(radius: f32, thickness: f32) -> DepositDef {
        DepositDef {
            code: "tin".into(),
            radius: NatFloat::create_uniform(radius, 0.0),
            thickness: NatFloat::create_uniform(thickness, 0.0),
            placement: Placement::FollowSurfaceBelow,
            depth: NatFloat::create_uniform(6.0, 0.0),
            in_block_codes: vec!["rock-*".into()],
            place_block: "ore-tin-*".into(),
            ..DepositDef::default()
        }
    }

    fn seeded_rng(seed: i64, x: i32, z: i32) -> ChunkRand {
        let mut rng = ChunkRand::new(seed);
        rng.init_position_seed(x, z);
        rng
    }

    #[test]
    fn test_containment_within_deformed_radius() {
        let reg = registry();
        let stone = reg.lookup("rock-granite").unwrap();
        let def = uniform_def(5.0, 2.0);

        for trial in 0..40 {
            let generator = disc(&def, &reg, trial);
            let mut world = MemoryWorld::flat(128, 60, 70, stone);
            let center = (8 + trial as i32 % 16, 8 + trial as i32 % 16);
            let mut rng = seeded_rng(trial, center.0, center.1);
            generator.generate(
                &mut world,
                &reg,
                None,
                ChunkRect::new(0, 0),
                center.0,
                center.1,
                &mut rng,
                1.0,
                &mut Vec::new(),
            );

            // Max reach: radius 5 deformed by up to +25%, ceil -> 7.
            let ores = reg.search("ore-tin-*");
            for x in 0..32 {
                for z in 0..32 {
                    for y in 0..128 {
                        if ores.contains(&world.block(x, y, z)) {
                            assert!(
                                (x - center.0).abs() <= 7 && (z - center.1).abs() <= 7,
                                "trial {trial}: ore at ({x}, {y}, {z}) beyond deformed radius"
                            );
                            assert!(
                                (58..=64).contains(&y),
                                "trial {trial}: ore at y={y} outside thickness band"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_host_material_gating() {
        let reg = registry();
        let stone = reg.lookup("rock-granite").unwrap();
        let soil = reg.lookup("soil-loam").unwrap();
        let def = uniform_def(6.0, 3.0);
        let generator = disc(&def, &reg, 5);

        let mut world = MemoryWorld::flat(128, 60, 70, stone);
        // Swap a patch of the host layer for soil the variant must not touch.
        for x in 0..16 {
            for z in 0..32 {
                for y in 55..=70 {
                    world.set_block(x, y, z, soil);
                }
            }
        }
        let mut rng = seeded_rng(5, 16, 16);
        generator.generate(
            &mut world,
            &reg,
            None,
            ChunkRect::new(0, 0),
            16,
            16,
            &mut rng,
            1.0,
            &mut Vec::new(),
        );
        assert_eq!(
            world.count_blocks(soil),
            16 * 32 * 16,
            "deposit overwrote a non-host block"
        );
    }

    #[test]
    fn test_deposit_is_idempotent_across_target_chunks() {
        let reg = registry();
        let stone = reg.lookup("rock-granite").unwrap();
        let def = uniform_def(8.0, 2.0);
        let generator = disc(&def, &reg, 9);
        let ores = reg.search("ore-tin-*");

        // Center on the border between chunks (0,0) and (1,0); generate each
        // side from its own chunk request and compare against one pass.
        let center = (32, 16);
        let mut split = MemoryWorld::flat(128, 60, 70, stone);
        for chunk in [ChunkRect::new(0, 0), ChunkRect::new(1, 0)] {
            let mut rng = seeded_rng(9, center.0, center.1);
            generator.generate(
                &mut split,
                &reg,
                None,
                chunk,
                center.0,
                center.1,
                &mut rng,
                1.0,
                &mut Vec::new(),
            );
        }

        // Same deposit, opposite chunk order: the result must be identical.
        let mut whole = MemoryWorld::flat(128, 60, 70, stone);
        for chunk in [ChunkRect::new(1, 0), ChunkRect::new(0, 0)] {
            let mut rng = seeded_rng(9, center.0, center.1);
            generator.generate(
                &mut whole,
                &reg,
                None,
                chunk,
                center.0,
                center.1,
                &mut rng,
                1.0,
                &mut Vec::new(),
            );
        }

        for x in 16..48 {
            for z in 0..32 {
                for y in 50..80 {
                    assert_eq!(
                        split.block(x, y, z),
                        whole.block(x, y, z),
                        "cell ({x}, {y}, {z}) depends on chunk generation order"
                    );
                }
            }
        }
        assert!(
            (0..32).any(|x| (0..32).any(|z| (50..80).any(|y| ores.contains(&split.block(x, y, z))))),
            "border deposit never reached the left chunk"
        );
        assert!(
            (32..48).any(|x| (0..32).any(|z| (50..80).any(|y| ores.contains(&split.block(x, y, z))))),
            "border deposit never reached the right chunk"
        );
    }

    #[test]
    fn test_rejects_deposit_outside_chunk() {
        let reg = registry();
        let stone = reg.lookup("rock-granite").unwrap();
        let def = uniform_def(5.0, 2.0);
        let generator = disc(&def, &reg, 2);
        let mut world = MemoryWorld::flat(128, 60, 70, stone);
        let mut rng = seeded_rng(2, 200, 200);
        let placed = generator.generate(
            &mut world,
            &reg,
            None,
            ChunkRect::new(0, 0),
            200,
            200,
            &mut rng,
            1.0,
            &mut Vec::new(),
        );
        assert_eq!(placed, 0, "deposit far outside the chunk placed cells");
    }

    #[test]
    fn test_zero_thickness_skips_silently() {
        let reg = registry();
        let stone = reg.lookup("rock-granite").unwrap();
        let mut def = uniform_def(5.0, 2.0);
        def.thickness = NatFloat::ZERO;
        let generator = disc(&def, &reg, 3);
        let mut world = MemoryWorld::flat(128, 60, 70, stone);
        let mut rng = seeded_rng(3, 8, 8);
        let placed = generator.generate(
            &mut world,
            &reg,
            None,
            ChunkRect::new(0, 0),
            8,
            8,
            &mut rng,
            1.0,
            &mut Vec::new(),
        );
        assert_eq!(placed, 0);
    }

    #[test]
    fn test_never_places_below_y_one() {
        let reg = registry();
        let stone = reg.lookup("rock-granite").unwrap();
        let mut def = uniform_def(6.0, 40.0);
        def.placement = Placement::FollowSurfaceBelow;
        def.depth = NatFloat::create_uniform(68.0, 0.0);
        let generator = disc(&def, &reg, 4);
        let mut world = MemoryWorld::flat(128, 60, 70, stone);
        let mut rng = seeded_rng(4, 8, 8);
        generator.generate(
            &mut world,
            &reg,
            None,
            ChunkRect::new(0, 0),
            8,
            8,
            &mut rng,
            1.0,
            &mut Vec::new(),
        );
        let ores = reg.search("ore-tin-*");
        for x in 0..32 {
            for z in 0..32 {
                assert!(
                    !ores.contains(&world.block(x, 0, z)),
                    "ore placed at bedrock level y=0"
                );
            }
        }
    }

    #[test]
    fn test_surface_co_deposit_sits_on_surface() {
        let reg = registry();
        let stone = reg.lookup("rock-granite").unwrap();
        let nugget = reg.lookup("nugget-tin").unwrap();
        let mut def = uniform_def(10.0, 3.0);
        def.surface_block = Some("nugget-tin".into());
        def.depth = NatFloat::create_uniform(2.0, 0.0);
        let generator = disc(&def, &reg, 6);
        let mut world = MemoryWorld::flat(128, 60, 70, stone);
        let mut rng = seeded_rng(6, 16, 16);
        generator.generate(
            &mut world,
            &reg,
            None,
            ChunkRect::new(0, 0),
            16,
            16,
            &mut rng,
            1.0,
            &mut Vec::new(),
        );

        let mut found = 0;
        for x in 0..32 {
            for z in 0..32 {
                for y in 0..128 {
                    if world.block(x, y, z) == nugget {
                        assert_eq!(y, 71, "nugget not directly above the surface");
                        found += 1;
                    }
                }
            }
        }
        assert!(found > 0, "shallow deposit produced no surface nuggets");
    }

    #[test]
    fn test_child_requests_reference_placed_cells() {
        let reg = registry();
        let stone = reg.lookup("rock-granite").unwrap();
        let def = uniform_def(8.0, 3.0);
        let mut generator = disc(&def, &reg, 7);
        generator.child_tries = vec![NatFloat::create_uniform(600.0, 0.0)];
        let ores = reg.search("ore-tin-*");

        let mut world = MemoryWorld::flat(128, 60, 70, stone);
        let mut rng = seeded_rng(7, 16, 16);
        let mut requests = Vec::new();
        generator.generate(
            &mut world,
            &reg,
            None,
            ChunkRect::new(0, 0),
            16,
            16,
            &mut rng,
            1.0,
            &mut requests,
        );
        assert!(!requests.is_empty(), "high trigger rate produced no children");
        for req in &requests {
            assert_eq!(req.child, 0);
            assert!(
                ores.contains(&world.block(req.pos.x, req.pos.y, req.pos.z)),
                "child request at a cell the parent never placed"
            );
        }
    }
}
