//! Multi-octave simplex noise fields.
//!
//! Composites one simplex generator per octave with explicit per-octave
//! amplitude and frequency arrays, so callers control the spectrum directly
//! instead of only through octave-count/persistence pairs.

use noise::{NoiseFn, Simplex};

/// Multi-octave 2D simplex noise built from explicit amplitude and frequency
/// arrays.
///
/// Each octave owns its own [`Simplex`] generator, seeded by an incremental
/// offset from the base seed so octaves stay decorrelated. Same seed + same
/// coordinates produce the same value, forever.
pub struct OctaveNoise {
    octaves: Vec<Simplex>,
    amplitudes: Vec<f64>,
    frequencies: Vec<f64>,
}

impl OctaveNoise {
    /// Build from explicit per-octave amplitude and frequency arrays.
    ///
    /// # Panics
    ///
    /// Panics if the arrays differ in length — octave counts are a
    /// construction-time programming decision, not runtime data.
    pub fn new(seed: i64, amplitudes: Vec<f64>, frequencies: Vec<f64>) -> Self {
        assert_eq!(
            amplitudes.len(),
            frequencies.len(),
            "one amplitude and one frequency per octave"
        );
        let octaves = (0..amplitudes.len())
            .map(|i| Simplex::new(seed.wrapping_add(i as i64) as u32))
            .collect();
        Self {
            octaves,
            amplitudes,
            frequencies,
        }
    }

    /// Convenience constructor: `amplitude[i] = persistence^i`,
    /// `frequency[i] = 3^i / scale`.
    pub fn from_default_octaves(seed: i64, octaves: usize, persistence: f64, scale: f64) -> Self {
        let mut amplitudes = Vec::with_capacity(octaves);
        let mut frequencies = Vec::with_capacity(octaves);
        let mut amp = 1.0;
        let mut freq = 1.0 / scale;
        for _ in 0..octaves {
            amplitudes.push(amp);
            frequencies.push(freq);
            amp *= persistence;
            freq *= 3.0;
        }
        Self::new(seed, amplitudes, frequencies)
    }

    /// Continuous noise value at (x, z); range is `[-max_amplitude, +max_amplitude]`.
    pub fn noise(&self, x: f64, z: f64) -> f64 {
        let mut total = 0.0;
        for i in 0..self.octaves.len() {
            let f = self.frequencies[i];
            total += self.amplitudes[i] * self.octaves[i].get([x * f, z * f]);
        }
        total
    }

    /// Sum of the octave amplitudes, bounding `|noise()|`.
    pub fn max_amplitude(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.abs()).sum()
    }
}

/// [`OctaveNoise`] rescaled so output lands in `[0, 1]`.
///
/// Used wherever downstream code expects a normalized field (climate channel
/// perturbation, deposit edge distortion, ore vertical distortion).
pub struct NormalizedOctaveNoise {
    inner: OctaveNoise,
    inv_max: f64,
}

impl NormalizedOctaveNoise {
    /// Wrap an [`OctaveNoise`], normalizing by its amplitude sum.
    pub fn new(inner: OctaveNoise) -> Self {
        let max = inner.max_amplitude();
        let inv_max = if max > 0.0 { 1.0 / max } else { 0.0 };
        Self { inner, inv_max }
    }

    /// Convenience constructor mirroring [`OctaveNoise::from_default_octaves`].
    pub fn from_default_octaves(seed: i64, octaves: usize, persistence: f64, scale: f64) -> Self {
        Self::new(OctaveNoise::from_default_octaves(
            seed,
            octaves,
            persistence,
            scale,
        ))
    }

    /// Noise value in `[0, 1]`.
    pub fn noise(&self, x: f64, z: f64) -> f64 {
        (self.inner.noise(x, z) * self.inv_max + 1.0) * 0.5
    }

    /// Noise value in `[0, mul]`, for consumers working in byte ranges.
    pub fn noise_scaled(&self, x: f64, z: f64, mul: f64) -> f64 {
        self.noise(x, z) * mul
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism_across_instances() {
        let a = OctaveNoise::from_default_octaves(42, 4, 0.6, 100.0);
        let b = OctaveNoise::from_default_octaves(42, 4, 0.6, 100.0);
        for i in 0..200 {
            let (x, z) = (i as f64 * 13.7, i as f64 * -3.1);
            assert_eq!(
                a.noise(x, z),
                b.noise(x, z),
                "Same seed must be bit-identical at ({x}, {z})"
            );
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = OctaveNoise::from_default_octaves(1, 4, 0.6, 100.0);
        let b = OctaveNoise::from_default_octaves(2, 4, 0.6, 100.0);
        let mut differing = 0;
        for i in 0..100 {
            let (x, z) = (i as f64 * 7.3, i as f64 * 2.9);
            if a.noise(x, z) != b.noise(x, z) {
                differing += 1;
            }
        }
        assert!(differing > 90, "only {differing}/100 samples differed");
    }

    #[test]
    fn test_output_bounded_by_amplitude_sum() {
        let n = OctaveNoise::new(
            7,
            vec![2.0, 1.0, 0.5],
            vec![1.0 / 64.0, 3.0 / 64.0, 9.0 / 64.0],
        );
        let max = n.max_amplitude();
        assert_eq!(max, 3.5);
        for i in 0..2000 {
            let v = n.noise(i as f64 * 0.37, i as f64 * -0.91);
            assert!(v.abs() <= max, "noise {v} exceeds amplitude sum {max}");
        }
    }

    #[test]
    fn test_default_octaves_spectrum() {
        let n = OctaveNoise::from_default_octaves(0, 3, 0.5, 90.0);
        assert_eq!(n.amplitudes, vec![1.0, 0.5, 0.25]);
        assert_eq!(n.frequencies, vec![1.0 / 90.0, 3.0 / 90.0, 9.0 / 90.0]);
    }

    #[test]
    fn test_normalized_stays_in_unit_interval() {
        let n = NormalizedOctaveNoise::from_default_octaves(42, 5, 0.7, 40.0);
        for i in 0..2000 {
            let v = n.noise(i as f64 * 1.7, i as f64 * 0.3);
            assert!((0.0..=1.0).contains(&v), "normalized noise {v} escaped [0, 1]");
        }
    }

    #[test]
    fn test_normalized_scaled_range() {
        let n = NormalizedOctaveNoise::from_default_octaves(9, 3, 0.5, 25.0);
        for i in 0..500 {
            let v = n.noise_scaled(i as f64, i as f64 * 2.0, 255.0);
            assert!((0.0..=255.0).contains(&v), "scaled noise {v} escaped [0, 255]");
        }
    }

    #[test]
    fn test_field_is_not_constant() {
        let n = NormalizedOctaveNoise::from_default_octaves(3, 4, 0.6, 30.0);
        let first = n.noise(0.0, 0.0);
        let varying = (1..100).any(|i| (n.noise(i as f64 * 11.0, 0.0) - first).abs() > 1e-6);
        assert!(varying, "noise field degenerated to a constant");
    }
}
