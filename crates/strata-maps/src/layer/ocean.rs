//! Ocean mask domain leaf.

use strata_noise::NormalizedOctaveNoise;

use super::GenLayer;

/// Cell value for open water.
pub const OCEAN: i32 = 255;
/// Cell value for land.
pub const LAND: i32 = 0;

const OCEAN_OCTAVES: usize = 4;
const OCEAN_PERSISTENCE: f64 = 0.55;

/// Thresholded-noise ocean mask: contiguous water bodies whose share of the
/// map is controlled by `land_cover`.
pub struct NoiseOcean {
    noise: NormalizedOctaveNoise,
    land_cover: f64,
    scale: f64,
}

impl NoiseOcean {
    /// `land_cover` is the approximate land fraction in `[0, 1]`; `scale`
    /// is the feature size of coastlines in cells.
    pub fn new(seed: i64, land_cover: f64, scale: f64) -> Self {
        Self {
            noise: NormalizedOctaveNoise::from_default_octaves(
                seed,
                OCEAN_OCTAVES,
                OCEAN_PERSISTENCE,
                scale,
            ),
            land_cover: land_cover.clamp(0.0, 1.0),
            scale,
        }
    }

    /// Coastline feature size in cells.
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl GenLayer for NoiseOcean {
    fn gen_layer(&self, x: i32, z: i32, size_x: usize, size_z: usize) -> Vec<i32> {
        let mut out = Vec::with_capacity(size_x * size_z);
        for iz in 0..size_z {
            for ix in 0..size_x {
                let wx = f64::from(x + ix as i32);
                let wz = f64::from(z + iz as i32);
                let cell = if self.noise.noise(wx, wz) > self.land_cover {
                    OCEAN
                } else {
                    LAND
                };
                out.push(cell);
            }
        }
        out
    }
}
