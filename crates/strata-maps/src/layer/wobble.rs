//! Perlin-wobble transform: domain-warps the parent grid to break up the
//! straight edges that cell-granular leaves produce.

use strata_noise::NormalizedOctaveNoise;

use super::GenLayer;

const WOBBLE_OCTAVES: usize = 3;
const WOBBLE_PERSISTENCE: f64 = 0.6;
const WOBBLE_SCALE: f64 = 24.0;

/// Offsets each output cell's source coordinate by `intensity * noise` in
/// both axes independently, with separate seed-decorrelated noise fields per
/// axis. Out-of-range source indices wrap modulo the padded parent window
/// rather than clamping.
pub struct PerlinWobble {
    parent: Box<dyn GenLayer>,
    noise_x: NormalizedOctaveNoise,
    noise_z: NormalizedOctaveNoise,
    intensity: f64,
    margin: usize,
}

impl PerlinWobble {
    /// Wrap `parent`, displacing source lookups by up to `intensity` cells.
    pub fn new(parent: Box<dyn GenLayer>, seed: i64, intensity: f64) -> Self {
        let margin = intensity.abs().ceil() as usize + 1;
        Self {
            parent,
            noise_x: NormalizedOctaveNoise::from_default_octaves(
                seed,
                WOBBLE_OCTAVES,
                WOBBLE_PERSISTENCE,
                WOBBLE_SCALE,
            ),
            noise_z: NormalizedOctaveNoise::from_default_octaves(
                seed.wrapping_add(1),
                WOBBLE_OCTAVES,
                WOBBLE_PERSISTENCE,
                WOBBLE_SCALE,
            ),
            intensity,
            margin,
        }
    }
}

impl GenLayer for PerlinWobble {
    fn gen_layer(&self, x: i32, z: i32, size_x: usize, size_z: usize) -> Vec<i32> {
        let margin = self.margin as i32;
        let padded_x = size_x + 2 * self.margin;
        let padded_z = size_z + 2 * self.margin;
        let parent = self.parent.gen_layer(x - margin, z - margin, padded_x, padded_z);

        let mut out = Vec::with_capacity(size_x * size_z);
        for iz in 0..size_z {
            for ix in 0..size_x {
                let wx = f64::from(x + ix as i32);
                let wz = f64::from(z + iz as i32);
                let dx = self.intensity * (2.0 * self.noise_x.noise(wx, wz) - 1.0);
                let dz = self.intensity * (2.0 * self.noise_z.noise(wx, wz) - 1.0);
                let sx = (ix as i32 + margin + dx.round() as i32).rem_euclid(padded_x as i32);
                let sz = (iz as i32 + margin + dz.round() as i32).rem_euclid(padded_z as i32);
                out.push(parent[sz as usize * padded_x + sx as usize]);
            }
        }
        out
    }
}
