//! Deposit variant tables: immutable runtime configuration for the deposit
//! generators, deserialized once at world-generation init.

use serde::Deserialize;
use strata_noise::NatFloat;

/// Which generator family realizes a deposit variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositShape {
    /// Distorted elliptical disc of ore inside host rock.
    #[default]
    Disc,
    /// River/lake sediment sheet following the terrain surface.
    Alluvial,
}

/// Vertical placement policy for disc deposits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    /// Center Y uniform over the full map height.
    #[default]
    Anywhere,
    /// Center Y is a percentage of the terrain height at each column.
    FollowSurface,
    /// Center Y is the terrain height minus an absolute block count.
    FollowSurfaceBelow,
    /// Center Y is relative to the configured sea level.
    FollowSealevel,
}

/// How ore grades are assigned to placed cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GradeDistribution {
    /// Uniform random among the place-block's graded variants.
    #[default]
    Random,
    /// Uniform plus a bonus toward higher grades the shallower the deposit.
    RandomPlusDepthBonus,
}

/// A child deposit spawned from cells of its parent, placed by rejection
/// sampling inside a cube around the triggering cell.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChildDepositDef {
    /// Variant name, used in log messages.
    pub code: String,
    /// Expected number of child placements per chunk; divided by the chunk
    /// area to get the per-placed-cell trigger chance.
    pub tries_per_chunk: NatFloat,
    /// Half-extent of the sampling cube around the triggering cell.
    pub radius: NatFloat,
    /// Number of sample points attempted per triggered placement.
    pub attempts: u32,
    /// Block code pattern placed (wildcards expand to graded variants).
    pub place_block: String,
    /// Host block code patterns the child may replace.
    pub in_block_codes: Vec<String>,
    /// Grade assignment for placed cells.
    pub grade_distribution: GradeDistribution,
}

impl Default for ChildDepositDef {
    fn default() -> Self {
        Self {
            code: String::new(),
            tries_per_chunk: NatFloat::ZERO,
            radius: NatFloat::create_uniform(3.0, 1.0),
            attempts: 12,
            place_block: String::new(),
            in_block_codes: Vec::new(),
            grade_distribution: GradeDistribution::Random,
        }
    }
}

/// One deposit variant as loaded from a variant table file.
///
/// Code patterns are unresolved here; the world-gen context resolves them
/// against the live block registry once and warns about patterns that match
/// nothing (the variant then never spawns, but never aborts generation).
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DepositDef {
    /// Variant name, used in log messages.
    pub code: String,
    /// Generator family.
    pub shape: DepositShape,
    /// Vertical placement policy (disc shapes only).
    pub placement: Placement,
    /// Disc radius distribution, in blocks.
    pub radius: NatFloat,
    /// Vertical thickness distribution, in blocks.
    pub thickness: NatFloat,
    /// Relative Y for `FollowSurface` (fraction of terrain height) and
    /// `FollowSealevel` (fraction of sea level).
    pub y_rel: NatFloat,
    /// Absolute depth below the surface for `FollowSurfaceBelow`, in blocks.
    pub depth: NatFloat,
    /// Host block code patterns this deposit may replace.
    pub in_block_codes: Vec<String>,
    /// Block code pattern placed (wildcards expand to graded variants,
    /// ordered from poorest to richest).
    pub place_block: String,
    /// Alternate place-block pattern; alluvial deposits use it for the
    /// gravel outcome of the sediment coin flip.
    pub alt_place_block: Option<String>,
    /// Block stamped one cell above the surface over placed cells.
    pub surface_block: Option<String>,
    /// Grade assignment for placed cells.
    pub grade_distribution: GradeDistribution,
    /// Expected number of deposits of this variant per chunk.
    pub tries_per_chunk: NatFloat,
    /// Scale deposit density by the region ore map at the deposit center.
    pub with_ore_map: bool,
    /// Child deposits spawned from placed cells.
    pub child_deposits: Vec<ChildDepositDef>,
}

impl Default for DepositDef {
    fn default() -> Self {
        Self {
            code: String::new(),
            shape: DepositShape::Disc,
            placement: Placement::Anywhere,
            radius: NatFloat::ZERO,
            thickness: NatFloat::create_uniform(2.0, 1.0),
            y_rel: NatFloat::create_uniform(0.5, 0.5),
            depth: NatFloat::ZERO,
            in_block_codes: Vec::new(),
            place_block: String::new(),
            alt_place_block: None,
            surface_block: None,
            grade_distribution: GradeDistribution::Random,
            tries_per_chunk: NatFloat::ZERO,
            with_ore_map: false,
            child_deposits: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_noise::Distribution;

    #[test]
    fn test_full_variant_deserializes() {
        let json = r#"{
            "code": "iron",
            "shape": "disc",
            "placement": "followSurfaceBelow",
            "radius": {"avg": 8.0, "var": 3.0, "dist": "gauss"},
            "thickness": {"avg": 3.0, "var": 1.0},
            "depth": {"avg": 20.0, "var": 10.0},
            "inBlockCodes": ["rock-*"],
            "placeBlock": "ore-iron-*",
            "gradeDistribution": "randomPlusDepthBonus",
            "triesPerChunk": {"avg": 0.5, "var": 0.0},
            "withOreMap": true,
            "childDeposits": [
                {
                    "code": "iron-sliver",
                    "triesPerChunk": {"avg": 3.0},
                    "radius": {"avg": 2.0, "var": 1.0},
                    "attempts": 8,
                    "placeBlock": "ore-iron-sliver",
                    "inBlockCodes": ["rock-*"]
                }
            ]
        }"#;
        let def: DepositDef = serde_json::from_str(json).expect("valid deposit json");
        assert_eq!(def.code, "iron");
        assert_eq!(def.placement, Placement::FollowSurfaceBelow);
        assert_eq!(def.radius.dist, Distribution::Gauss);
        assert_eq!(def.grade_distribution, GradeDistribution::RandomPlusDepthBonus);
        assert!(def.with_ore_map);
        assert_eq!(def.child_deposits.len(), 1);
        assert_eq!(def.child_deposits[0].attempts, 8);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let def: DepositDef = serde_json::from_str(r#"{"code": "bare"}"#).expect("minimal json");
        assert_eq!(def.shape, DepositShape::Disc);
        assert_eq!(def.placement, Placement::Anywhere);
        assert_eq!(def.radius, NatFloat::ZERO);
        assert!(def.child_deposits.is_empty());
    }

    #[test]
    fn test_alluvial_shape_parses() {
        let def: DepositDef = serde_json::from_str(
            r#"{"code": "sediment", "shape": "alluvial", "placeBlock": "sand", "altPlaceBlock": "gravel"}"#,
        )
        .expect("alluvial json");
        assert_eq!(def.shape, DepositShape::Alluvial);
        assert_eq!(def.alt_place_block.as_deref(), Some("gravel"));
    }
}
