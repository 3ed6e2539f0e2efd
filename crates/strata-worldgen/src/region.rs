//! Region-cached maps: climate, forest, shrub, ocean, landform, province,
//! and ore maps computed once per map region and read-only thereafter.
//!
//! Region generation runs before any chunk generation that consumes it; the
//! maps are plain data with no interior mutability, so publishing a
//! `RegionMaps` value is all the synchronization chunk workers need.

use strata_maps::climate::{rainfall, temperature};
use strata_maps::interp::lerp;
use strata_maps::{IntMap, LerpedWeightedIndex2DMap, RegionMap};

use crate::access::CHUNK_SIZE;
use crate::context::WorldGenContext;

/// Border cells kept around each region map for bilinear reads.
const MAP_PADDING: usize = 1;

/// Every per-region map chunk generation reads.
pub struct RegionMaps {
    /// World X of the region's first block.
    origin_x: i32,
    /// World Z of the region's first block.
    origin_z: i32,
    /// Blocks per map cell.
    cell: usize,
    pub climate: RegionMap,
    pub forest: RegionMap,
    pub shrub: RegionMap,
    pub oceans: RegionMap,
    pub landforms: RegionMap,
    pub provinces: RegionMap,
    pub ore_factor: RegionMap,
    pub ore_distort_top: RegionMap,
    pub ore_distort_bottom: RegionMap,
}

impl RegionMaps {
    /// Compute all maps for region (rx, rz). Called once per region; the
    /// result is immutable.
    pub fn generate(ctx: &WorldGenContext, rx: i32, rz: i32) -> Self {
        let cell = ctx.config.map_cell;
        let region_blocks = ctx.config.region_chunks * CHUNK_SIZE;
        let inner = region_blocks / cell;
        let size = inner + 2 * MAP_PADDING;
        let x0 = rx * inner as i32 - MAP_PADDING as i32;
        let z0 = rz * inner as i32 - MAP_PADDING as i32;

        let climate_grid = ctx.climate_chain.gen_layer(x0, z0, size, size);
        let landform_grid = ctx.landform_chain.gen_layer(x0, z0, size, size);
        let province_grid = ctx.province_chain.gen_layer(x0, z0, size, size);
        let ocean_grid = ctx.ocean_chain.gen_layer(x0, z0, size, size);

        // Forest and shrub density derive from the climate cells, perturbed
        // by their own noise fields.
        let mut forest_grid = Vec::with_capacity(size * size);
        let mut shrub_grid = Vec::with_capacity(size * size);
        let mut ore_grid = Vec::with_capacity(size * size);
        let mut distort_top_grid = Vec::with_capacity(size * size);
        let mut distort_bottom_grid = Vec::with_capacity(size * size);
        for iz in 0..size {
            for ix in 0..size {
                let cx = f64::from(x0 + ix as i32);
                let cz = f64::from(z0 + iz as i32);
                let cell_value = climate_grid[iz * size + ix];
                let temp = f64::from(temperature(cell_value)) / 255.0;
                let rain = f64::from(rainfall(cell_value)) / 255.0;

                let forest_suit = (rain * (1.0 - (temp - 0.65).abs() * 1.6)).clamp(0.0, 1.0);
                let forest_noise = ctx.forest_noise.noise(cx, cz);
                forest_grid
                    .push(((forest_suit * 0.75 + forest_noise * 0.25) * 255.0).round() as i32);

                let shrub_suit = ((1.0 - rain * 0.5) * (1.0 - (temp - 0.75).abs() * 1.4))
                    .clamp(0.0, 1.0);
                let shrub_noise = ctx.shrub_noise.noise(cx, cz);
                shrub_grid.push(((shrub_suit * 0.6 + shrub_noise * 0.4) * 255.0).round() as i32);

                ore_grid.push(ctx.ore_factor_noise.noise_scaled(cx, cz, 255.0).round() as i32);
                distort_top_grid
                    .push(ctx.distort_top_noise.noise_scaled(cx, cz, 255.0).round() as i32);
                distort_bottom_grid
                    .push(ctx.distort_bottom_noise.noise_scaled(cx, cz, 255.0).round() as i32);
            }
        }

        Self {
            origin_x: rx * region_blocks as i32,
            origin_z: rz * region_blocks as i32,
            cell,
            climate: RegionMap::new(climate_grid, inner, MAP_PADDING),
            forest: RegionMap::new(forest_grid, inner, MAP_PADDING),
            shrub: RegionMap::new(shrub_grid, inner, MAP_PADDING),
            oceans: RegionMap::new(ocean_grid, inner, MAP_PADDING),
            landforms: RegionMap::new(landform_grid, inner, MAP_PADDING),
            provinces: RegionMap::new(province_grid, inner, MAP_PADDING),
            ore_factor: RegionMap::new(ore_grid, inner, MAP_PADDING),
            ore_distort_top: RegionMap::new(distort_top_grid, inner, MAP_PADDING),
            ore_distort_bottom: RegionMap::new(distort_bottom_grid, inner, MAP_PADDING),
        }
    }

    /// World block coordinates to fractional map-cell coordinates.
    #[inline]
    fn map_coord(&self, x: i32, z: i32) -> (f64, f64) {
        (
            f64::from(x - self.origin_x) / self.cell as f64,
            f64::from(z - self.origin_z) / self.cell as f64,
        )
    }

    /// Packed climate cell at a world column, channel-wise interpolated.
    pub fn climate_at(&self, x: i32, z: i32) -> i32 {
        let (mx, mz) = self.map_coord(x, z);
        self.climate.lerped_packed(mx, mz)
    }

    /// Forest density at a world column, `0..=1`.
    pub fn forest_at(&self, x: i32, z: i32) -> f32 {
        let (mx, mz) = self.map_coord(x, z);
        (self.forest.lerped(mx, mz) / 255.0).clamp(0.0, 1.0) as f32
    }

    /// Shrub density at a world column, `0..=1`.
    pub fn shrub_at(&self, x: i32, z: i32) -> f32 {
        let (mx, mz) = self.map_coord(x, z);
        (self.shrub.lerped(mx, mz) / 255.0).clamp(0.0, 1.0) as f32
    }

    /// Whether a world column is open ocean.
    pub fn ocean_at(&self, x: i32, z: i32) -> bool {
        let (mx, mz) = self.map_coord(x, z);
        self.oceans.lerped(mx, mz) > 127.0
    }

    /// Landform variant index at a world column (nearest cell; indices do
    /// not interpolate).
    pub fn landform_at(&self, x: i32, z: i32) -> i32 {
        let (mx, mz) = self.map_coord(x, z);
        let inner = self.landforms.inner_size() as f64;
        let cx = mx.round().clamp(0.0, inner - 1.0) as usize;
        let cz = mz.round().clamp(0.0, inner - 1.0) as usize;
        self.landforms.unpadded(cx, cz)
    }

    /// Geologic-province variant index at a world column (nearest cell).
    pub fn province_at(&self, x: i32, z: i32) -> i32 {
        let (mx, mz) = self.map_coord(x, z);
        let inner = self.provinces.inner_size() as f64;
        let cx = mx.round().clamp(0.0, inner - 1.0) as usize;
        let cz = mz.round().clamp(0.0, inner - 1.0) as usize;
        self.provinces.unpadded(cx, cz)
    }

    /// Ore density factor at a world column, `0..=1`.
    pub fn ore_factor_at(&self, x: i32, z: i32) -> f32 {
        let (mx, mz) = self.map_coord(x, z);
        (self.ore_factor.lerped(mx, mz) / 255.0).clamp(0.0, 1.0) as f32
    }

    /// Vertical offset applied to deposit Y positions, blended between the
    /// bottom and top distortion maps by the cell's relative height.
    pub fn vertical_distortion(&self, x: i32, z: i32, y: i32, map_height: i32) -> i32 {
        let (mx, mz) = self.map_coord(x, z);
        let top = (self.ore_distort_top.lerped(mx, mz) - 128.0) / 4.0;
        let bottom = (self.ore_distort_bottom.lerped(mx, mz) - 128.0) / 4.0;
        let t = (f64::from(y) / f64::from(map_height.max(1))).clamp(0.0, 1.0);
        lerp(bottom, top, t).round() as i32
    }

    /// Smoothed landform distribution for blending landform parameters at
    /// arbitrary query resolution.
    pub fn landform_blend(&self, blur_radius: usize) -> LerpedWeightedIndex2DMap {
        self.blend_of(&self.landforms, blur_radius)
    }

    /// Smoothed geologic-province distribution.
    pub fn province_blend(&self, blur_radius: usize) -> LerpedWeightedIndex2DMap {
        self.blend_of(&self.provinces, blur_radius)
    }

    fn blend_of(&self, map: &RegionMap, blur_radius: usize) -> LerpedWeightedIndex2DMap {
        let inner = map.inner_size();
        let mut grid = IntMap::new(inner, inner);
        for z in 0..inner {
            for x in 0..inner {
                grid.set(x, z, map.unpadded(x, z));
            }
        }
        LerpedWeightedIndex2DMap::from_grid_blurred(&grid, blur_radius)
    }
}
