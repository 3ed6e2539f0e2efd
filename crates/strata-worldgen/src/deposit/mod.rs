//! Mineral deposit generators.
//!
//! Each deposit variant is resolved once at init (wildcard block codes into
//! concrete ID tables) and then invoked per chunk with per-call RNG streams.
//! Deposit-level draws come from a stream seeded at the deposit center, and
//! per-column draws from a stream re-seeded at each column, so a deposit
//! straddling a chunk border produces identical cells no matter which chunk
//! requested generation.

mod alluvial;
mod child;
mod disc;

pub use alluvial::AlluvialDeposit;
pub use child::ChildDeposit;
pub use disc::DiscDeposit;

use hashbrown::HashMap;
use strata_assets::{DepositDef, DepositShape, GradeDistribution};
use strata_maps::interp::smoothstep;
use strata_noise::{ChunkRand, NatFloat, NormalizedOctaveNoise, round_random};
use tracing::warn;

use crate::access::BlockPos;
use crate::registry::{BlockId, BlockRegistry};

/// Radii are capped at 64 blocks; the cross-chunk candidate scan depends on
/// this bound.
pub const MAX_RADIUS: f32 = 64.0;

/// Fallback radius when a variant is configured without one.
const DEFAULT_RADIUS: f32 = 10.0;

/// Host block ID to the graded list of placeable blocks.
pub(crate) type PlacementTable = HashMap<BlockId, Vec<BlockId>>;

/// A deferred child-deposit placement, executed after its parent finishes so
/// a child cannot overwrite cells the parent has not placed yet.
#[derive(Clone, Copy, Debug)]
pub struct ChildRequest {
    /// Index into the parent's resolved child list.
    pub child: usize,
    /// The parent cell that triggered the request.
    pub pos: BlockPos,
}

/// One deposit variant with every block code resolved, ready to generate.
pub struct ResolvedDeposit {
    pub code: String,
    pub tries_per_chunk: NatFloat,
    pub with_ore_map: bool,
    pub kind: DepositKind,
    pub children: Vec<ChildDeposit>,
}

/// Generator family dispatch.
pub enum DepositKind {
    Disc(DiscDeposit),
    Alluvial(AlluvialDeposit),
}

impl ResolvedDeposit {
    /// Resolve a variant definition against the live block registry.
    ///
    /// Misconfiguration never aborts: a missing radius falls back to a
    /// uniform default, and a place-block pattern matching nothing turns
    /// the variant into a logged no-op (`None`).
    pub fn resolve(def: &DepositDef, registry: &BlockRegistry, world_seed: i64) -> Option<Self> {
        let place = registry.search(&def.place_block);
        if place.is_empty() {
            warn!(
                variant = %def.code,
                pattern = %def.place_block,
                "place-block pattern matches no registered blocks; variant disabled"
            );
            return None;
        }

        let radius = checked_radius(&def.code, def.radius);
        let table = placement_table(registry, &def.in_block_codes, &place, &def.code);
        let surface_block = def.surface_block.as_deref().and_then(|code| {
            let id = registry.lookup(code);
            if id.is_none() {
                warn!(variant = %def.code, code, "surface block not registered; skipping it");
            }
            id
        });

        let mut children = Vec::new();
        let mut child_tries = Vec::new();
        for child_def in &def.child_deposits {
            if let Some(resolved) = ChildDeposit::resolve(child_def, registry) {
                children.push(resolved);
                child_tries.push(child_def.tries_per_chunk);
            }
        }

        let kind = match def.shape {
            DepositShape::Disc => DepositKind::Disc(DiscDeposit::new(
                def,
                radius,
                table,
                surface_block,
                child_tries,
                world_seed,
            )),
            DepositShape::Alluvial => {
                let alt_table = match def.alt_place_block.as_deref() {
                    Some(pattern) => {
                        let alt = registry.search(pattern);
                        if alt.is_empty() {
                            warn!(
                                variant = %def.code,
                                pattern,
                                "alternate place-block matches nothing; using primary for both outcomes"
                            );
                            table.clone()
                        } else {
                            placement_table(registry, &def.in_block_codes, &alt, &def.code)
                        }
                    }
                    None => table.clone(),
                };
                DepositKind::Alluvial(AlluvialDeposit::new(def, radius, table, alt_table, world_seed))
            }
        };

        Some(Self {
            code: def.code.clone(),
            tries_per_chunk: def.tries_per_chunk,
            with_ore_map: def.with_ore_map,
            kind,
            children,
        })
    }
}

/// Replace a degenerate radius with the uniform default, logging once at
/// resolution time.
fn checked_radius(variant: &str, radius: NatFloat) -> NatFloat {
    if radius.avg <= 0.0 {
        warn!(
            variant,
            "deposit has no usable radius; falling back to uniform {DEFAULT_RADIUS}"
        );
        NatFloat::create_uniform(DEFAULT_RADIUS, 0.0)
    } else {
        radius
    }
}

/// Build the host-to-placeable map for a set of in-block patterns.
fn placement_table(
    registry: &BlockRegistry,
    in_block_codes: &[String],
    place: &[BlockId],
    variant: &str,
) -> PlacementTable {
    let mut table = PlacementTable::new();
    for pattern in in_block_codes {
        let hosts = registry.search(pattern);
        if hosts.is_empty() {
            warn!(variant, pattern = %pattern, "in-block pattern matches no registered blocks");
        }
        for host in hosts {
            table.insert(host, place.to_vec());
        }
    }
    if table.is_empty() {
        warn!(variant, "no host blocks resolved; deposit can never place");
    }
    table
}

/// Pick a graded variant for one placed cell.
///
/// `relative_depth` is the cell's depth below the terrain surface as a
/// fraction of the surface height; the depth bonus shifts shallow cells
/// toward richer grades.
pub(crate) fn pick_grade(
    variants: &[BlockId],
    grade: GradeDistribution,
    rng: &mut ChunkRand,
    relative_depth: f32,
) -> BlockId {
    let len = variants.len() as i32;
    let mut index = rng.next_int(len);
    if grade == GradeDistribution::RandomPlusDepthBonus {
        let bonus = round_random(rng, (1.0 - relative_depth).clamp(0.0, 1.0));
        index = (index + bonus).min(len - 1);
    }
    variants[index as usize]
}

/// Lattice step of the deposit edge-distortion noise, in blocks.
const DISTORT_STEP: f64 = 4.0;

/// Smoothed 2D noise used to distort deposit edges.
///
/// The raw field is sampled on a coarse lattice and interpolated with
/// smoothstep-eased bilinear blending, which anti-aliases the ellipse edge
/// instead of dithering it per cell.
pub(crate) struct EdgeDistortion {
    noise: NormalizedOctaveNoise,
}

impl EdgeDistortion {
    pub(crate) fn new(seed: i64) -> Self {
        Self {
            noise: NormalizedOctaveNoise::from_default_octaves(seed, 2, 0.5, 7.0),
        }
    }

    fn smooth_noise(&self, x: i32, z: i32) -> f64 {
        let fx = f64::from(x) / DISTORT_STEP;
        let fz = f64::from(z) / DISTORT_STEP;
        let x0 = fx.floor();
        let z0 = fz.floor();
        let tx = smoothstep(fx - x0);
        let tz = smoothstep(fz - z0);
        let n00 = self.noise.noise(x0, z0);
        let n10 = self.noise.noise(x0 + 1.0, z0);
        let n01 = self.noise.noise(x0, z0 + 1.0);
        let n11 = self.noise.noise(x0 + 1.0, z0 + 1.0);
        let top = n00 + (n10 - n00) * tx;
        let bottom = n01 + (n11 - n01) * tx;
        top + (bottom - top) * tz
    }

    /// The distorted squared-ellipse boundary at a column. The exact curve
    /// is a compatibility contract; do not retune it.
    pub(crate) fn edge(&self, x: i32, z: i32) -> f64 {
        1.0 - self.smooth_noise(x, z) * 0.2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_registry() -> BlockRegistry {
        let mut reg = BlockRegistry::new();
        for code in [
            "rock-granite",
            "rock-basalt",
            "ore-tin-poor",
            "ore-tin-rich",
        ] {
            reg.register(code, true).unwrap();
        }
        reg
    }

    #[test]
    fn test_unresolvable_place_block_disables_variant() {
        let reg = test_registry();
        let def = DepositDef {
            code: "ghost".into(),
            place_block: "ore-unobtainium-*".into(),
            in_block_codes: vec!["rock-*".into()],
            ..DepositDef::default()
        };
        assert!(ResolvedDeposit::resolve(&def, &reg, 1).is_none());
    }

    #[test]
    fn test_missing_radius_falls_back() {
        let radius = checked_radius("x", NatFloat::ZERO);
        assert_eq!(radius.avg, DEFAULT_RADIUS);
        assert_eq!(radius.var, 0.0);
    }

    #[test]
    fn test_placement_table_covers_all_hosts() {
        let reg = test_registry();
        let place = reg.search("ore-tin-*");
        let table = placement_table(&reg, &["rock-*".into()], &place, "tin");
        assert_eq!(table.len(), 2);
        for hosts in table.values() {
            assert_eq!(hosts.len(), 2);
        }
    }

    #[test]
    fn test_grade_depth_bonus_prefers_rich_when_shallow() {
        let reg = test_registry();
        let variants = reg.search("ore-tin-*");
        let mut rng = ChunkRand::new(3);
        rng.init_position_seed(0, 0);
        let rich = variants[1];

        let mut rich_shallow = 0;
        let mut rich_deep = 0;
        let trials = 4000;
        for _ in 0..trials {
            if pick_grade(&variants, GradeDistribution::RandomPlusDepthBonus, &mut rng, 0.05) == rich
            {
                rich_shallow += 1;
            }
            if pick_grade(&variants, GradeDistribution::RandomPlusDepthBonus, &mut rng, 0.95) == rich
            {
                rich_deep += 1;
            }
        }
        assert!(
            rich_shallow > rich_deep + trials / 4,
            "depth bonus had no effect: shallow {rich_shallow}, deep {rich_deep}"
        );
    }

    #[test]
    fn test_edge_distortion_bounded_and_smooth() {
        let edge = EdgeDistortion::new(42);
        let mut prev = edge.edge(0, 0);
        for x in 1..500 {
            let v = edge.edge(x, 17);
            assert!(
                (0.8..=1.0).contains(&v),
                "edge value {v} escaped the distortion band"
            );
            assert!(
                (v - prev).abs() < 0.1,
                "edge jumped by {} between adjacent columns",
                (v - prev).abs()
            );
            prev = v;
        }
    }
}
