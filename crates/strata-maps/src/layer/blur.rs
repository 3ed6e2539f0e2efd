//! Two-pass box blur over packed byte channels.

use tracing::warn;

use super::GenLayer;

/// Box-blurs the parent grid with an odd window `range`, each of the packed
/// byte channels (shifts 16, 8, 0) independently.
///
/// Both passes use a sliding-window sum with incremental add/remove at the
/// window edges, so cost is O(cells) rather than O(cells * range). A range
/// of 1 is the identity transform.
pub struct BoxBlur {
    parent: Box<dyn GenLayer>,
    range: usize,
}

impl BoxBlur {
    /// Wrap `parent` with a blur window of `range` cells.
    ///
    /// An even range has no center cell; it is widened by one and logged.
    pub fn new(parent: Box<dyn GenLayer>, range: usize) -> Self {
        let range = if range % 2 == 0 {
            warn!(range, "blur range must be odd; widening by one");
            range + 1
        } else {
            range
        };
        Self { parent, range }
    }

    fn blur_channel(&self, parent: &[i32], shift: u32, size_x: usize, size_z: usize) -> Vec<u32> {
        let half = self.range / 2;
        let padded_x = size_x + 2 * half;
        let padded_z = size_z + 2 * half;
        let range = self.range as u32;

        // Horizontal pass: padded height, cropped width.
        let mut horizontal = vec![0u32; size_x * padded_z];
        for z in 0..padded_z {
            let row = &parent[z * padded_x..(z + 1) * padded_x];
            let mut sum: u32 = row[..self.range]
                .iter()
                .map(|v| ((*v >> shift) & 0xff) as u32)
                .sum();
            horizontal[z * size_x] = sum / range;
            for x in 1..size_x {
                sum += ((row[x + self.range - 1] >> shift) & 0xff) as u32;
                sum -= ((row[x - 1] >> shift) & 0xff) as u32;
                horizontal[z * size_x + x] = sum / range;
            }
        }

        // Vertical pass: cropped to the requested window.
        let mut out = vec![0u32; size_x * size_z];
        for x in 0..size_x {
            let mut sum: u32 = (0..self.range).map(|z| horizontal[z * size_x + x]).sum();
            out[x] = sum / range;
            for z in 1..size_z {
                sum += horizontal[(z + self.range - 1) * size_x + x];
                sum -= horizontal[(z - 1) * size_x + x];
                out[z * size_x + x] = sum / range;
            }
        }
        out
    }
}

impl GenLayer for BoxBlur {
    fn gen_layer(&self, x: i32, z: i32, size_x: usize, size_z: usize) -> Vec<i32> {
        if self.range == 1 {
            return self.parent.gen_layer(x, z, size_x, size_z);
        }
        let half = self.range as i32 / 2;
        let padded_x = size_x + self.range - 1;
        let padded_z = size_z + self.range - 1;
        let parent = self.parent.gen_layer(x - half, z - half, padded_x, padded_z);

        let mut out = vec![0i32; size_x * size_z];
        for shift in [16u32, 8, 0] {
            let channel = self.blur_channel(&parent, shift, size_x, size_z);
            for (cell, value) in out.iter_mut().zip(channel) {
                *cell |= (value as i32) << shift;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::NoiseIndex;

    struct Constant(i32);
    impl GenLayer for Constant {
        fn gen_layer(&self, _x: i32, _z: i32, size_x: usize, size_z: usize) -> Vec<i32> {
            vec![self.0; size_x * size_z]
        }
    }

    #[test]
    fn test_range_one_is_identity() {
        let leaf = NoiseIndex::new(5, vec![7, 7, 7]);
        let expected = leaf.gen_layer(-8, 4, 24, 12);
        let blur = BoxBlur::new(Box::new(NoiseIndex::new(5, vec![7, 7, 7])), 1);
        assert_eq!(blur.gen_layer(-8, 4, 24, 12), expected);
    }

    #[test]
    fn test_constant_field_unchanged() {
        let value = (200 << 16) | (150 << 8) | 33;
        let blur = BoxBlur::new(Box::new(Constant(value)), 5);
        let grid = blur.gen_layer(0, 0, 10, 10);
        assert!(grid.iter().all(|v| *v == value));
    }

    #[test]
    fn test_channels_blur_independently() {
        // A vertical stripe in one channel must not disturb the others.
        struct Stripe;
        impl GenLayer for Stripe {
            fn gen_layer(&self, x: i32, _z: i32, size_x: usize, size_z: usize) -> Vec<i32> {
                let mut out = Vec::with_capacity(size_x * size_z);
                for _ in 0..size_z {
                    for ix in 0..size_x {
                        let rain = if (x + ix as i32).rem_euclid(2) == 0 { 0 } else { 200 };
                        out.push((40 << 16) | (rain << 8) | 90);
                    }
                }
                out
            }
        }
        let blur = BoxBlur::new(Box::new(Stripe), 3);
        let grid = blur.gen_layer(0, 0, 8, 8);
        for v in &grid {
            assert_eq!((v >> 16) & 0xff, 40, "temperature channel disturbed");
            assert_eq!(v & 0xff, 90, "third channel disturbed");
            let rain = (v >> 8) & 0xff;
            assert!(
                (60..=140).contains(&rain),
                "rain stripe not averaged: {rain}"
            );
        }
    }

    #[test]
    fn test_even_range_widens_to_odd() {
        let expected = BoxBlur::new(Box::new(NoiseIndex::new(2, vec![1, 1])), 5).gen_layer(0, 0, 8, 8);
        let widened = BoxBlur::new(Box::new(NoiseIndex::new(2, vec![1, 1])), 4).gen_layer(0, 0, 8, 8);
        assert_eq!(widened, expected);
    }

    #[test]
    fn test_blur_windows_tile_seamlessly() {
        let make = || BoxBlur::new(Box::new(NoiseIndex::new(31, vec![3, 1, 2])), 5);
        let wide = make().gen_layer(-4, -4, 16, 8);
        let right = make().gen_layer(4, -4, 8, 8);
        for z in 0..8 {
            for x in 0..8 {
                assert_eq!(
                    wide[z * 16 + x + 8],
                    right[z * 8 + x],
                    "blur margin mismatch at ({x}, {z})"
                );
            }
        }
    }
}
