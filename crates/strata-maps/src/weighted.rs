//! Smoothed per-point index distributions over a discrete grid.
//!
//! Turns a per-cell index grid into, per query point, a small set of
//! (index, weight) pairs whose weights sum to one. This is what makes
//! landform and province boundaries gradual instead of hard-edged: a point
//! near a boundary sees both neighbors with partial weights.

use hashbrown::HashMap;

use crate::grid::IntMap;

/// One (index, weight) pair of a query result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedIndex {
    pub index: usize,
    pub weight: f32,
}

/// A 2D map from fractional coordinates to weighted index distributions,
/// backed by a per-cell set of weighted indices that queries blend
/// bilinearly.
pub struct LerpedWeightedIndex2DMap {
    size_x: usize,
    size_z: usize,
    groups: Vec<Vec<WeightedIndex>>,
    max_index: usize,
}

impl LerpedWeightedIndex2DMap {
    /// Build directly from a discrete index grid: each cell becomes its own
    /// singleton distribution with weight 1.
    pub fn from_grid(grid: &IntMap) -> Self {
        let mut max_index = 0;
        let groups = grid
            .data
            .iter()
            .map(|v| {
                let index = (*v).max(0) as usize;
                max_index = max_index.max(index);
                vec![WeightedIndex { index, weight: 1.0 }]
            })
            .collect();
        Self {
            size_x: grid.size_x,
            size_z: grid.size_z,
            groups,
            max_index,
        }
    }

    /// Build from a raw index grid plus a box-blur radius: each cell's
    /// distribution is the frequency of values seen in its blur window,
    /// weighted by one over the (border-clipped) window area.
    pub fn from_grid_blurred(grid: &IntMap, blur_radius: usize) -> Self {
        if blur_radius == 0 {
            return Self::from_grid(grid);
        }
        let r = blur_radius as i32;
        let mut max_index = 0;
        let mut groups = Vec::with_capacity(grid.data.len());
        let mut counts: HashMap<usize, u32> = HashMap::new();
        for z in 0..grid.size_z as i32 {
            for x in 0..grid.size_x as i32 {
                counts.clear();
                let x_min = (x - r).max(0);
                let x_max = (x + r).min(grid.size_x as i32 - 1);
                let z_min = (z - r).max(0);
                let z_max = (z + r).min(grid.size_z as i32 - 1);
                let area = ((x_max - x_min + 1) * (z_max - z_min + 1)) as f32;
                for wz in z_min..=z_max {
                    for wx in x_min..=x_max {
                        let index = grid.get(wx as usize, wz as usize).max(0) as usize;
                        *counts.entry(index).or_insert(0) += 1;
                    }
                }
                let mut group: Vec<WeightedIndex> = counts
                    .iter()
                    .map(|(index, count)| WeightedIndex {
                        index: *index,
                        weight: *count as f32 / area,
                    })
                    .collect();
                // Canonical ordering keeps query output independent of hash
                // iteration order.
                group.sort_by_key(|wi| wi.index);
                if let Some(m) = group.iter().map(|wi| wi.index).max() {
                    max_index = max_index.max(m);
                }
                groups.push(group);
            }
        }
        Self {
            size_x: grid.size_x,
            size_z: grid.size_z,
            groups,
            max_index,
        }
    }

    /// Largest index that can appear in any query result; dense scratch
    /// buffers must hold `max_index() + 1` slots.
    pub fn max_index(&self) -> usize {
        self.max_index
    }

    /// The four lattice cells surrounding a query point (offset by -0.5 so
    /// cell centers align with integer coordinates) and the bilinear basis
    /// coefficients.
    fn corners(&self, x: f32, z: f32) -> ([usize; 4], [f32; 4]) {
        let fx = x - 0.5;
        let fz = z - 0.5;
        let xf = fx.floor();
        let zf = fz.floor();
        let tx = if xf < 0.0 || xf >= (self.size_x - 1) as f32 {
            0.0
        } else {
            fx - xf
        };
        let tz = if zf < 0.0 || zf >= (self.size_z - 1) as f32 {
            0.0
        } else {
            fz - zf
        };
        let x0 = xf.clamp(0.0, (self.size_x - 1) as f32) as usize;
        let z0 = zf.clamp(0.0, (self.size_z - 1) as f32) as usize;
        let x1 = (x0 + 1).min(self.size_x - 1);
        let z1 = (z0 + 1).min(self.size_z - 1);
        (
            [
                z0 * self.size_x + x0,
                z0 * self.size_x + x1,
                z1 * self.size_x + x0,
                z1 * self.size_x + x1,
            ],
            [
                (1.0 - tx) * (1.0 - tz),
                tx * (1.0 - tz),
                (1.0 - tx) * tz,
                tx * tz,
            ],
        )
    }

    /// Dense query: writes each index's blended weight into `out[index]`,
    /// zeroing the buffer first. Fast path for callers holding a scratch
    /// buffer across many queries.
    ///
    /// # Panics
    ///
    /// Panics if `out.len() <= max_index()`.
    pub fn weights_at(&self, x: f32, z: f32, out: &mut [f32]) {
        assert!(out.len() > self.max_index, "scratch buffer too small");
        out.fill(0.0);
        let (cells, basis) = self.corners(x, z);
        for (cell, b) in cells.into_iter().zip(basis) {
            if b == 0.0 {
                continue;
            }
            for wi in &self.groups[cell] {
                out[wi.index] += wi.weight * b;
            }
        }
    }

    /// Sparse query: returns the merged (index, weight) pairs for the point,
    /// duplicate indices across the four corners accumulated together.
    /// Equivalent to [`weights_at`](Self::weights_at) restricted to nonzero
    /// entries.
    pub fn indices_at(&self, x: f32, z: f32) -> Vec<WeightedIndex> {
        let (cells, basis) = self.corners(x, z);
        let mut merged: HashMap<usize, f32> = HashMap::new();
        for (cell, b) in cells.into_iter().zip(basis) {
            if b == 0.0 {
                continue;
            }
            for wi in &self.groups[cell] {
                *merged.entry(wi.index).or_insert(0.0) += wi.weight * b;
            }
        }
        let mut out: Vec<WeightedIndex> = merged
            .into_iter()
            .map(|(index, weight)| WeightedIndex { index, weight })
            .collect();
        out.sort_by_key(|wi| wi.index);
        out
    }
}
