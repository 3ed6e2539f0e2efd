//! Fuzzy-zoom transform: doubles resolution with randomized cell picks.

use strata_noise::ChunkRand;

use super::GenLayer;

/// Doubles the parent's resolution. Each output cell inside a 2x2 block
/// either keeps the block's parent cell (even offsets) or randomly picks
/// between it and the next neighbor along the odd axis, using one
/// position-seeded draw per block so adjacent windows agree.
pub struct FuzzyZoom {
    parent: Box<dyn GenLayer>,
    world_seed: i64,
}

impl FuzzyZoom {
    pub fn new(parent: Box<dyn GenLayer>, world_seed: i64) -> Self {
        Self { parent, world_seed }
    }
}

impl GenLayer for FuzzyZoom {
    fn gen_layer(&self, x: i32, z: i32, size_x: usize, size_z: usize) -> Vec<i32> {
        let px = x.div_euclid(2);
        let pz = z.div_euclid(2);
        let padded_x = size_x / 2 + 3;
        let padded_z = size_z / 2 + 3;
        let parent = self.parent.gen_layer(px, pz, padded_x, padded_z);

        let mut rng = ChunkRand::new(self.world_seed);
        let mut out = Vec::with_capacity(size_x * size_z);
        for iz in 0..size_z {
            for ix in 0..size_x {
                let wx = x + ix as i32;
                let wz = z + iz as i32;
                let bx = wx.div_euclid(2);
                let bz = wz.div_euclid(2);

                rng.init_position_seed(bx * 2, bz * 2);
                let pick = rng.next_int_fast(3);
                let dx = if wx.rem_euclid(2) == 1 { pick & 1 } else { 0 };
                let dz = if wz.rem_euclid(2) == 1 { (pick >> 1) & 1 } else { 0 };

                let sx = (bx - px + dx) as usize;
                let sz = (bz - pz + dz) as usize;
                out.push(parent[sz * padded_x + sx]);
            }
        }
        out
    }
}
