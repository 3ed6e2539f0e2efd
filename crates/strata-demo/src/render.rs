//! Map rendering: RGBA buffers and color ramps for the world-gen maps,
//! written out as PNG.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use strata_maps::climate::{rainfall, temperature};

/// A 2D image stored as row-major RGBA pixels.
pub struct MapImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl MapImage {
    /// Create a new opaque-black image.
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = vec![0; (width * height * 4) as usize];
        for a in pixels.iter_mut().skip(3).step_by(4) {
            *a = 255;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Set one pixel.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: (u8, u8, u8)) {
        let idx = ((y * self.width + x) * 4) as usize;
        self.pixels[idx] = rgb.0;
        self.pixels[idx + 1] = rgb.1;
        self.pixels[idx + 2] = rgb.2;
    }

    /// Encode as PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut png_writer = encoder.write_header()?;
        png_writer.write_image_data(&self.pixels)?;
        Ok(())
    }
}

/// Map a packed climate cell to a color: cold blue-white through temperate
/// green to hot orange, darkened by dryness.
pub fn climate_color(cell: i32) -> (u8, u8, u8) {
    let temp = f64::from(temperature(cell)) / 255.0;
    let rain = f64::from(rainfall(cell)) / 255.0;

    let (r, g, b) = if temp < 0.35 {
        let t = temp / 0.35;
        (210.0 - t * 100.0, 225.0 - t * 45.0, 255.0 - t * 75.0)
    } else if temp < 0.7 {
        let t = (temp - 0.35) / 0.35;
        (110.0 - t * 30.0, 180.0 + t * 10.0, 180.0 - t * 110.0)
    } else {
        let t = (temp - 0.7) / 0.3;
        (80.0 + t * 160.0, 190.0 - t * 80.0, 70.0 - t * 30.0)
    };
    let dryness = 0.55 + 0.45 * rain;
    ((r * dryness) as u8, (g * dryness) as u8, (b * dryness) as u8)
}

/// Color for a variant index: an explicit `#rrggbb` table color when the
/// variant carries one, otherwise a stable golden-ratio palette entry.
pub fn index_color(index: usize, table_color: Option<&str>) -> (u8, u8, u8) {
    if let Some(hex) = table_color.and_then(parse_hex_color) {
        return hex;
    }
    let hue = (index as f64 * 0.618_033_988_749_895).fract();
    hsv_to_rgb(hue, 0.55, 0.85)
}

/// Shade for terrain height, dark at bedrock to light at the map ceiling.
pub fn height_shade(y: i32, map_height: i32) -> (u8, u8, u8) {
    let t = (f64::from(y) / f64::from(map_height.max(1))).clamp(0.0, 1.0);
    let v = (60.0 + t * 170.0) as u8;
    (v, v, v)
}

fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (u8, u8, u8) {
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match (i as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    ((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}
