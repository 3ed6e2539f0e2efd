//! Block patch variant tables: climate-gated decorative surface content.

use serde::Deserialize;
use strata_noise::NatFloat;

/// One decorative patch variant (flower clusters, boulders, reeds).
///
/// A patch is attempted per chunk behind a `chance` gate; each attempt
/// places `quantity` blocks at random columns whose climate readings fall
/// inside every configured band.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockPatchDef {
    /// Variant name, used in log messages.
    pub code: String,
    /// Block code patterns placed; one is picked per patch instance.
    pub block_codes: Vec<String>,
    /// Per-chunk chance this patch is attempted at all.
    pub chance: f32,
    /// Blocks placed per attempted patch.
    pub quantity: NatFloat,
    /// Temperature band in degrees Celsius.
    pub min_temp: f32,
    pub max_temp: f32,
    /// Rainfall band, normalized `0..=1`.
    pub min_rain: f32,
    pub max_rain: f32,
    /// Forest-density band, normalized `0..=1`.
    pub min_forest: f32,
    pub max_forest: f32,
}

impl Default for BlockPatchDef {
    fn default() -> Self {
        Self {
            code: String::new(),
            block_codes: Vec::new(),
            chance: 1.0,
            quantity: NatFloat::create_uniform(6.0, 4.0),
            min_temp: -20.0,
            max_temp: 40.0,
            min_rain: 0.0,
            max_rain: 1.0,
            min_forest: 0.0,
            max_forest: 1.0,
        }
    }
}
