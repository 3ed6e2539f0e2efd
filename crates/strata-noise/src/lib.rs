//! Deterministic randomness primitives for world generation: a positional
//! LCG, natural-value distributions, and multi-octave simplex noise fields.

mod chunk_rand;
mod nat_float;
mod octave;

pub use chunk_rand::{ChunkRand, round_random};
pub use nat_float::{Distribution, NatFloat};
pub use octave::{NormalizedOctaveNoise, OctaveNoise};
