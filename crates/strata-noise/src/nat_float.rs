//! Natural-feeling random value distributions.
//!
//! A [`NatFloat`] is an immutable descriptor (average, variance, distribution
//! shape) deserialized from variant tables and sampled against a
//! [`ChunkRand`] stream. Deposit radii, thicknesses, and patch quantities are
//! all described this way.

use serde::{Deserialize, Serialize};

use crate::chunk_rand::ChunkRand;

/// Shape of the random distribution a [`NatFloat`] samples from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    /// Flat over `[avg - var, avg + var]`.
    #[default]
    Uniform,
    /// Peaked at `avg`, falling off linearly toward `avg ± var`.
    Triangle,
    /// Bell-shaped around `avg` (sum of three uniform draws).
    Gauss,
    /// Tighter bell (sum of six uniform draws).
    NarrowGauss,
    /// Bell folded outward: values cluster near `avg ± var`, rare at `avg`.
    InverseGauss,
    /// Always exactly `avg`.
    Dirac,
}

/// A serializable random-value descriptor: average, variance, and shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NatFloat {
    /// Center of the distribution.
    pub avg: f32,
    /// Half-width of the distribution. Zero makes every draw return `avg`.
    pub var: f32,
    /// Distribution shape.
    pub dist: Distribution,
}

impl NatFloat {
    /// The constant-zero descriptor, used as the safe fallback for missing
    /// or misconfigured variant fields.
    pub const ZERO: NatFloat = NatFloat {
        avg: 0.0,
        var: 0.0,
        dist: Distribution::Uniform,
    };

    /// Flat distribution over `[avg - var, avg + var]`.
    pub fn create_uniform(avg: f32, var: f32) -> Self {
        Self {
            avg,
            var,
            dist: Distribution::Uniform,
        }
    }

    /// Bell-shaped distribution around `avg`.
    pub fn create_gauss(avg: f32, var: f32) -> Self {
        Self {
            avg,
            var,
            dist: Distribution::Gauss,
        }
    }

    /// Draw one sample using a positional RNG stream.
    pub fn next_float(&self, rng: &mut ChunkRand) -> f32 {
        self.sample_with(|| rng.next_float())
    }

    /// Draw one sample from any source of uniform `[0, 1)` floats.
    ///
    /// Decoration placement runs on a different RNG family than the map
    /// layers; this keeps the distribution shape independent of the stream
    /// behind it.
    pub fn sample_with<F: FnMut() -> f32>(&self, mut draw: F) -> f32 {
        if self.var == 0.0 {
            return self.avg;
        }
        let spread = match self.dist {
            Distribution::Uniform => 2.0 * draw() - 1.0,
            Distribution::Triangle => draw() - draw(),
            Distribution::Gauss => {
                let g = (draw() + draw() + draw()) / 3.0;
                2.0 * g - 1.0
            }
            Distribution::NarrowGauss => {
                let g = (0..6).map(|_| draw()).sum::<f32>() / 6.0;
                2.0 * g - 1.0
            }
            Distribution::InverseGauss => {
                let g = (draw() + draw() + draw()) / 3.0;
                let folded = if g > 0.5 { g - 0.5 } else { g + 0.5 };
                2.0 * folded - 1.0
            }
            Distribution::Dirac => 0.0,
        };
        self.avg + self.var * spread
    }
}

impl Default for NatFloat {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> ChunkRand {
        let mut r = ChunkRand::new(42);
        r.init_position_seed(12, -7);
        r
    }

    #[test]
    fn test_zero_variance_is_constant() {
        let mut r = rng();
        for dist in [
            Distribution::Uniform,
            Distribution::Triangle,
            Distribution::Gauss,
            Distribution::NarrowGauss,
            Distribution::InverseGauss,
            Distribution::Dirac,
        ] {
            let nf = NatFloat {
                avg: 5.0,
                var: 0.0,
                dist,
            };
            for _ in 0..20 {
                assert_eq!(nf.next_float(&mut r), 5.0, "{dist:?} with var 0 drifted");
            }
        }
    }

    #[test]
    fn test_uniform_stays_within_bounds() {
        let nf = NatFloat::create_uniform(10.0, 3.0);
        let mut r = rng();
        for _ in 0..5000 {
            let v = nf.next_float(&mut r);
            assert!((7.0..=13.0).contains(&v), "uniform draw {v} out of range");
        }
    }

    #[test]
    fn test_all_shapes_stay_within_bounds() {
        let mut r = rng();
        for dist in [
            Distribution::Triangle,
            Distribution::Gauss,
            Distribution::NarrowGauss,
            Distribution::InverseGauss,
        ] {
            let nf = NatFloat {
                avg: 0.0,
                var: 1.0,
                dist,
            };
            for _ in 0..5000 {
                let v = nf.next_float(&mut r);
                assert!(
                    (-1.0..=1.0).contains(&v),
                    "{dist:?} draw {v} escaped [avg - var, avg + var]"
                );
            }
        }
    }

    #[test]
    fn test_gauss_clusters_near_average() {
        let nf = NatFloat::create_gauss(0.0, 1.0);
        let mut r = rng();
        let mut near = 0;
        let trials = 10_000;
        for _ in 0..trials {
            if nf.next_float(&mut r).abs() < 0.35 {
                near += 1;
            }
        }
        // A uniform distribution would put ~35% of draws within +-0.35.
        assert!(
            near > trials / 2,
            "gauss should concentrate near avg, got {near}/{trials} within +-0.35"
        );
    }

    #[test]
    fn test_inverse_gauss_avoids_average() {
        let nf = NatFloat {
            avg: 0.0,
            var: 1.0,
            dist: Distribution::InverseGauss,
        };
        let mut r = rng();
        let mut near = 0;
        let trials = 10_000;
        for _ in 0..trials {
            if nf.next_float(&mut r).abs() < 0.35 {
                near += 1;
            }
        }
        assert!(
            near < trials / 5,
            "inverse gauss should avoid avg, got {near}/{trials} within +-0.35"
        );
    }

    #[test]
    fn test_deserialize_from_variant_table_json() {
        let nf: NatFloat = serde_json::from_str(r#"{"avg": 7.0, "var": 2.0, "dist": "gauss"}"#)
            .expect("valid NatFloat json");
        assert_eq!(nf.avg, 7.0);
        assert_eq!(nf.var, 2.0);
        assert_eq!(nf.dist, Distribution::Gauss);

        let defaulted: NatFloat = serde_json::from_str(r#"{"avg": 3.0}"#).expect("partial json");
        assert_eq!(defaulted.var, 0.0);
        assert_eq!(defaulted.dist, Distribution::Uniform);
    }
}
