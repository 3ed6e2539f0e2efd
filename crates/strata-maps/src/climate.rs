//! Climate cells: three byte channels (temperature, rainfall, geologic
//! activity) packed into one grid integer, plus the climate domain leaves
//! and the sub-scale upsampling shared by fresh generation and cached reads.

use strata_noise::ChunkRand;

use crate::interp::biserp_packed;
use crate::layer::GenLayer;

/// Pack the three climate channels into one cell value.
#[inline]
pub fn pack_climate(temp: u8, rain: u8, geo: u8) -> i32 {
    (i32::from(temp) << 16) | (i32::from(rain) << 8) | i32::from(geo)
}

/// Temperature channel, `0..=255`.
#[inline]
pub fn temperature(cell: i32) -> u8 {
    ((cell >> 16) & 0xff) as u8
}

/// Rainfall channel, `0..=255`.
#[inline]
pub fn rainfall(cell: i32) -> u8 {
    ((cell >> 8) & 0xff) as u8
}

/// Geologic-activity channel, `0..=255`.
#[inline]
pub fn geologic_activity(cell: i32) -> u8 {
    (cell & 0xff) as u8
}

/// Map degrees Celsius in `[-20, 40]` onto the `0..=255` channel scale.
#[inline]
pub fn scale_temperature(deg_c: f32) -> f32 {
    ((deg_c + 20.0) * (255.0 / 60.0)).clamp(0.0, 255.0)
}

/// Inverse of [`scale_temperature`].
#[inline]
pub fn descale_temperature(scaled: f32) -> f32 {
    scaled * (60.0 / 255.0) - 20.0
}

/// A climate field queryable at a single cell coordinate.
///
/// Both climate leaves implement this; the sub-sampling layer and the
/// region-map generator are written against it.
pub trait ClimateSource: Send + Sync {
    /// Packed climate cell at (x, z).
    fn climate_at(&self, x: i32, z: i32) -> i32;
}

const GEO_DRAW_MAX: i32 = 256;

#[inline]
fn draw_cell(rng: &mut ChunkRand, temp: i32) -> i32 {
    let rain = rng.next_int(256);
    let geo_raw = rng.next_int(GEO_DRAW_MAX);
    // Square the draw so high geologic activity stays rare.
    let geo = (geo_raw * geo_raw) >> 8;
    pack_climate(temp as u8, rain as u8, geo as u8)
}

/// Patchy climate: every cell draws all three channels independently from
/// position-seeded randomness. Downstream wobble and blur turn the white
/// noise into climate patches.
pub struct NoiseClimatePatchy {
    world_seed: i64,
}

impl NoiseClimatePatchy {
    pub fn new(world_seed: i64) -> Self {
        Self { world_seed }
    }
}

impl ClimateSource for NoiseClimatePatchy {
    fn climate_at(&self, x: i32, z: i32) -> i32 {
        let mut rng = ChunkRand::new(self.world_seed);
        rng.init_position_seed(x, z);
        let temp = rng.next_int(256);
        draw_cell(&mut rng, temp)
    }
}

/// Latitude-banded climate: temperature follows a triangular wave in
/// world-Z, offset so the spawn column lands inside a configured
/// temperature band. The identical wave and offset also produce the
/// latitude value used for day-length purposes, keeping the two in sync.
pub struct NoiseClimateRealistic {
    world_seed: i64,
    half_range: i32,
    z_offset: f64,
    temp_spread: i32,
}

impl NoiseClimateRealistic {
    /// `half_range` is the equator-to-pole distance in the same coordinate
    /// units this source is queried with. The spawn band is given in
    /// degrees Celsius; the concrete spawn temperature is drawn once per
    /// world from the world seed.
    pub fn new(world_seed: i64, half_range: i32, spawn_min_temp: f32, spawn_max_temp: f32) -> Self {
        let mut rng = ChunkRand::new(world_seed);
        let band_min = scale_temperature(spawn_min_temp.min(spawn_max_temp)) as i32;
        let band_max = scale_temperature(spawn_min_temp.max(spawn_max_temp)) as i32;
        let spawn_temp = band_min + rng.next_int(band_max - band_min + 1);

        // Invert the wave so latitude(0) yields the chosen spawn
        // temperature on the ascending branch.
        let spawn_lat = 1.0 - f64::from(spawn_temp) / 255.0;
        let z_offset = (spawn_lat + 1.0) * 0.5 * f64::from(half_range);

        Self {
            world_seed,
            half_range,
            z_offset,
            temp_spread: 10,
        }
    }

    /// Latitude at world-Z: -1 at the south pole, 0 at the equator, +1 at
    /// the north pole, triangular with period `2 * half_range`.
    pub fn latitude(&self, z: f64) -> f64 {
        let half = f64::from(self.half_range);
        let period = 2.0 * half;
        let phase = (z + self.z_offset).rem_euclid(period);
        if phase < half {
            phase / half * 2.0 - 1.0
        } else {
            1.0 - (phase - half) / half * 2.0
        }
    }

    /// Channel-scaled temperature at world-Z before per-cell variation.
    pub fn temperature_scaled_at(&self, z: f64) -> i32 {
        (255.0 * (1.0 - self.latitude(z).abs())).round() as i32
    }
}

impl ClimateSource for NoiseClimateRealistic {
    fn climate_at(&self, x: i32, z: i32) -> i32 {
        let center = self.temperature_scaled_at(f64::from(z));
        let mut rng = ChunkRand::new(self.world_seed);
        rng.init_position_seed(x, z);
        let spread = self.temp_spread;
        let temp = (center - spread + rng.next_int(2 * spread + 1)).clamp(0, 255);
        draw_cell(&mut rng, temp)
    }
}

/// Computes climate on a coarse lattice (every `sub_scale` cells) and
/// bilinearly interpolates each byte channel up to full resolution.
///
/// The same fetch-and-interpolate code path serves fresh generation and
/// cached-region reads, so both agree bit-for-bit.
pub struct SubSampledClimate {
    source: Box<dyn ClimateSource>,
    sub_scale: usize,
}

impl SubSampledClimate {
    pub fn new(source: Box<dyn ClimateSource>, sub_scale: usize) -> Self {
        assert!(sub_scale >= 1, "sub-scale of zero cannot form a lattice");
        Self { source, sub_scale }
    }

    /// Interpolated cell at (x, z) via any lattice fetch function.
    ///
    /// `fetch` is called with lattice coordinates (units of `sub_scale`
    /// cells); cached readers pass a closure over the region map, fresh
    /// generation passes the climate source.
    pub fn upsample_at<F: Fn(i32, i32) -> i32>(sub_scale: usize, fetch: &F, x: i32, z: i32) -> i32 {
        let sub = sub_scale as i32;
        let lx = x.div_euclid(sub);
        let lz = z.div_euclid(sub);
        let tx = f64::from(x.rem_euclid(sub)) / f64::from(sub);
        let tz = f64::from(z.rem_euclid(sub)) / f64::from(sub);
        biserp_packed(
            fetch(lx, lz),
            fetch(lx + 1, lz),
            fetch(lx, lz + 1),
            fetch(lx + 1, lz + 1),
            tx,
            tz,
        )
    }
}

impl GenLayer for SubSampledClimate {
    fn gen_layer(&self, x: i32, z: i32, size_x: usize, size_z: usize) -> Vec<i32> {
        let fetch = |lx: i32, lz: i32| {
            let sub = self.sub_scale as i32;
            self.source.climate_at(lx * sub, lz * sub)
        };
        let mut out = Vec::with_capacity(size_x * size_z);
        for iz in 0..size_z {
            for ix in 0..size_x {
                out.push(Self::upsample_at(
                    self.sub_scale,
                    &fetch,
                    x + ix as i32,
                    z + iz as i32,
                ));
            }
        }
        out
    }
}
