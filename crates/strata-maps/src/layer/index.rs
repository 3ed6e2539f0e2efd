//! Weighted-index domain leaf.
//!
//! The landform, geologic-province, and ore layers are all instances of this
//! leaf: each cell independently picks a variant index from an externally
//! loaded weight table, using position-seeded randomness.

use strata_noise::ChunkRand;
use tracing::warn;

use super::GenLayer;

/// Domain leaf that assigns each cell a variant index drawn from a weight
/// table.
///
/// Selection subtracts weights in canonical iteration order from a single
/// `next_int(weight_sum)` draw; ties are broken by iteration order, not by
/// weight magnitude, so reordering the table changes the world.
pub struct NoiseIndex {
    world_seed: i64,
    weights: Vec<i32>,
    weight_sum: i32,
}

impl NoiseIndex {
    /// Build from a variant weight table.
    ///
    /// Non-positive weights are kept in the table (they occupy an index but
    /// can never be picked). An entirely empty or zero-weight table is a
    /// misconfiguration: it is logged and every cell resolves to index 0.
    pub fn new(world_seed: i64, weights: Vec<i32>) -> Self {
        let weight_sum = weights.iter().filter(|w| **w > 0).sum();
        if weight_sum <= 0 {
            warn!(
                variants = weights.len(),
                "weight table has no positive weights; all cells will use variant 0"
            );
        }
        Self {
            world_seed,
            weights,
            weight_sum,
        }
    }

    /// Number of variants in the table.
    pub fn variant_count(&self) -> usize {
        self.weights.len()
    }

    /// Pick a variant index from an already-positioned RNG stream.
    pub fn pick(&self, rng: &mut ChunkRand) -> i32 {
        if self.weight_sum <= 0 {
            return 0;
        }
        let mut rest = rng.next_int(self.weight_sum);
        for (index, weight) in self.weights.iter().enumerate() {
            if *weight <= 0 {
                continue;
            }
            rest -= weight;
            if rest < 0 {
                return index as i32;
            }
        }
        (self.weights.len() - 1) as i32
    }
}

impl GenLayer for NoiseIndex {
    fn gen_layer(&self, x: i32, z: i32, size_x: usize, size_z: usize) -> Vec<i32> {
        let mut rng = ChunkRand::new(self.world_seed);
        let mut out = Vec::with_capacity(size_x * size_z);
        for iz in 0..size_z {
            for ix in 0..size_x {
                rng.init_position_seed(x + ix as i32, z + iz as i32);
                out.push(self.pick(&mut rng));
            }
        }
        out
    }
}
