//! Built-in demo registry and variant tables, used when no asset directory
//! is supplied on the command line.

use hashbrown::HashMap;
use strata_assets::{
    BlockPatchDef, ChildDepositDef, DepositDef, DepositShape, GradeDistribution, LandformDef,
    Placement, ProvinceDef, WorldGenAssets,
};
use strata_noise::NatFloat;
use strata_worldgen::{BlockId, BlockRegistry};

/// A small registry with rocks, graded ores, sediments, and flowers.
pub fn builtin_registry() -> BlockRegistry {
    let mut registry = BlockRegistry::new();
    let blocks = [
        ("rock-granite", true),
        ("rock-basalt", true),
        ("rock-limestone", true),
        ("soil-loam", true),
        ("sand", true),
        ("gravel", true),
        ("ore-copper-poor", true),
        ("ore-copper-medium", true),
        ("ore-copper-rich", true),
        ("ore-iron-poor", true),
        ("ore-iron-rich", true),
        ("ore-tin-sliver", true),
        ("nugget-copper", true),
        ("flower-poppy", true),
        ("flower-lily", true),
    ];
    for (code, solid) in blocks {
        // The codes are distinct literals; registration cannot collide.
        let _ = registry.register(code, solid);
    }
    registry
}

/// The rock the demo's flat test world is made of.
pub fn demo_stone(registry: &BlockRegistry) -> BlockId {
    registry.lookup("rock-granite").unwrap_or(BlockId(1))
}

/// Render colors for the demo ore blocks.
pub fn ore_palette(registry: &BlockRegistry) -> HashMap<BlockId, (u8, u8, u8)> {
    let entries = [
        ("ore-copper-poor", (170, 110, 60)),
        ("ore-copper-medium", (200, 130, 60)),
        ("ore-copper-rich", (240, 150, 50)),
        ("ore-iron-poor", (150, 90, 90)),
        ("ore-iron-rich", (200, 90, 80)),
        ("ore-tin-sliver", (170, 170, 200)),
        ("nugget-copper", (255, 190, 90)),
        ("sand", (220, 200, 130)),
        ("gravel", (130, 130, 130)),
    ];
    let mut palette = HashMap::new();
    for (code, color) in entries {
        if let Some(id) = registry.lookup(code) {
            palette.insert(id, color);
        }
    }
    palette
}

/// Variant tables exercising every generator family: a disc deposit with a
/// child and a surface nugget, a sea-level iron deposit gated by the ore
/// map, an alluvial sediment sheet, and two climate-gated flower patches.
pub fn builtin_assets() -> WorldGenAssets {
    WorldGenAssets {
        landforms: vec![
            LandformDef {
                code: "plains".into(),
                weight: 45,
                map_color: Some("#60a040".into()),
            },
            LandformDef {
                code: "hills".into(),
                weight: 30,
                map_color: Some("#8a9a50".into()),
            },
            LandformDef {
                code: "highlands".into(),
                weight: 18,
                map_color: Some("#9a8a70".into()),
            },
            LandformDef {
                code: "peaks".into(),
                weight: 7,
                map_color: Some("#d0d0d8".into()),
            },
        ],
        provinces: vec![
            ProvinceDef {
                code: "sedimentary".into(),
                weight: 55,
                map_color: Some("#c0b080".into()),
            },
            ProvinceDef {
                code: "metamorphic".into(),
                weight: 30,
                map_color: Some("#8080a0".into()),
            },
            ProvinceDef {
                code: "volcanic".into(),
                weight: 15,
                map_color: Some("#a05040".into()),
            },
        ],
        deposits: vec![
            DepositDef {
                code: "copper".into(),
                shape: DepositShape::Disc,
                placement: Placement::FollowSurfaceBelow,
                radius: NatFloat::create_uniform(7.0, 3.0),
                thickness: NatFloat::create_uniform(3.0, 1.0),
                depth: NatFloat::create_uniform(8.0, 5.0),
                in_block_codes: vec!["rock-*".into()],
                place_block: "ore-copper-*".into(),
                surface_block: Some("nugget-copper".into()),
                grade_distribution: GradeDistribution::RandomPlusDepthBonus,
                tries_per_chunk: NatFloat::create_uniform(1.2, 0.5),
                child_deposits: vec![ChildDepositDef {
                    code: "tin-sliver".into(),
                    tries_per_chunk: NatFloat::create_uniform(8.0, 2.0),
                    radius: NatFloat::create_uniform(3.0, 1.0),
                    attempts: 10,
                    place_block: "ore-tin-sliver".into(),
                    in_block_codes: vec!["rock-*".into()],
                    grade_distribution: GradeDistribution::Random,
                }],
                ..DepositDef::default()
            },
            DepositDef {
                code: "iron".into(),
                shape: DepositShape::Disc,
                placement: Placement::FollowSealevel,
                radius: NatFloat::create_gauss(9.0, 4.0),
                thickness: NatFloat::create_uniform(4.0, 2.0),
                y_rel: NatFloat::create_uniform(0.4, 0.3),
                in_block_codes: vec!["rock-*".into()],
                place_block: "ore-iron-*".into(),
                tries_per_chunk: NatFloat::create_uniform(0.8, 0.4),
                with_ore_map: true,
                ..DepositDef::default()
            },
            DepositDef {
                code: "sediment".into(),
                shape: DepositShape::Alluvial,
                radius: NatFloat::create_uniform(10.0, 4.0),
                thickness: NatFloat::create_uniform(2.0, 1.0),
                in_block_codes: vec!["rock-*".into(), "soil-*".into()],
                place_block: "sand".into(),
                alt_place_block: Some("gravel".into()),
                tries_per_chunk: NatFloat::create_uniform(0.5, 0.3),
                ..DepositDef::default()
            },
        ],
        patches: vec![
            BlockPatchDef {
                code: "poppies".into(),
                block_codes: vec!["flower-poppy".into()],
                chance: 0.6,
                quantity: NatFloat::create_uniform(8.0, 5.0),
                min_temp: 0.0,
                max_temp: 32.0,
                min_rain: 0.25,
                max_rain: 1.0,
                ..BlockPatchDef::default()
            },
            BlockPatchDef {
                code: "lilies".into(),
                block_codes: vec!["flower-lily".into()],
                chance: 0.35,
                quantity: NatFloat::create_uniform(5.0, 3.0),
                min_temp: 12.0,
                max_temp: 40.0,
                min_rain: 0.55,
                max_rain: 1.0,
                min_forest: 0.2,
                max_forest: 1.0,
                ..BlockPatchDef::default()
            },
        ],
    }
}
