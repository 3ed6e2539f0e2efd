//! Map-rendering CLI for inspecting world generation output.
//!
//! Renders climate, landform, province, ocean, and deposit maps to PNG for
//! a given seed. Variant tables are loaded from an asset directory when one
//! is supplied; otherwise a small built-in demo set is used.

mod demo_assets;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hashbrown::HashMap;
use strata_assets::WorldGenAssets;
use strata_worldgen::{
    CHUNK_SIZE, ChunkRect, ClimateMode, MemoryWorld, RegionMaps, WorldBlocks, WorldGenConfig,
    WorldGenContext,
};
use tracing::info;

use render::{MapImage, climate_color, height_shade, index_color};

#[derive(Parser)]
#[command(name = "strata-demo", about = "Render strata world-generation maps to PNG")]
struct Cli {
    /// World seed.
    #[arg(long, default_value_t = 42)]
    seed: i64,
    /// Optional asset directory with variant tables (see strata-assets).
    #[arg(long)]
    assets: Option<PathBuf>,
    /// Use the latitude-banded climate model instead of patchy.
    #[arg(long)]
    realistic: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the packed climate map.
    Climate {
        #[arg(long, default_value_t = 512)]
        size: u32,
        #[arg(long, default_value = "climate.png")]
        out: PathBuf,
    },
    /// Render the landform index map.
    Landforms {
        #[arg(long, default_value_t = 512)]
        size: u32,
        #[arg(long, default_value = "landforms.png")]
        out: PathBuf,
    },
    /// Render the geologic-province index map.
    Provinces {
        #[arg(long, default_value_t = 512)]
        size: u32,
        #[arg(long, default_value = "provinces.png")]
        out: PathBuf,
    },
    /// Render the ocean mask.
    Oceans {
        #[arg(long, default_value_t = 512)]
        size: u32,
        #[arg(long, default_value = "oceans.png")]
        out: PathBuf,
    },
    /// Generate deposits into a flat test world and render a top-down view.
    Deposits {
        /// Edge length of the generated area, in chunks.
        #[arg(long, default_value_t = 8)]
        chunks: u32,
        #[arg(long, default_value = "deposits.png")]
        out: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    strata_log::init_logging("info");
    let cli = Cli::parse();

    let assets = match &cli.assets {
        Some(dir) => WorldGenAssets::load_dir(dir)?,
        None => demo_assets::builtin_assets(),
    };
    let registry = demo_assets::builtin_registry();
    let mut config = WorldGenConfig::default();
    if cli.realistic {
        config.climate = ClimateMode::Realistic {
            half_range: 100_000,
            spawn_min_temp: 5.0,
            spawn_max_temp: 20.0,
        };
    }
    let ctx = WorldGenContext::new(cli.seed, config, registry, &assets);

    match cli.command {
        Command::Climate { size, out } => {
            let image = render_columns(&ctx, size, |maps, x, z| {
                climate_color(maps.climate_at(x, z))
            });
            image.save_png(&out)?;
            info!(path = %out.display(), "climate map written");
        }
        Command::Landforms { size, out } => {
            let colors: Vec<Option<String>> =
                assets.landforms.iter().map(|l| l.map_color.clone()).collect();
            let image = render_columns(&ctx, size, |maps, x, z| {
                let idx = maps.landform_at(x, z).max(0) as usize;
                index_color(idx, colors.get(idx).and_then(|c| c.as_deref()))
            });
            image.save_png(&out)?;
            info!(path = %out.display(), "landform map written");
        }
        Command::Provinces { size, out } => {
            let colors: Vec<Option<String>> =
                assets.provinces.iter().map(|p| p.map_color.clone()).collect();
            let image = render_columns(&ctx, size, |maps, x, z| {
                let idx = maps.province_at(x, z).max(0) as usize;
                index_color(idx, colors.get(idx).and_then(|c| c.as_deref()))
            });
            image.save_png(&out)?;
            info!(path = %out.display(), "province map written");
        }
        Command::Oceans { size, out } => {
            let image = render_columns(&ctx, size, |maps, x, z| {
                if maps.ocean_at(x, z) {
                    (20, 50, 180)
                } else {
                    (100, 160, 80)
                }
            });
            image.save_png(&out)?;
            info!(path = %out.display(), "ocean mask written");
        }
        Command::Deposits { chunks, out } => {
            let image = render_deposits(&ctx, chunks);
            image.save_png(&out)?;
            info!(path = %out.display(), chunks, "deposit map written");
        }
    }
    Ok(())
}

/// Render one pixel per world column, generating region maps on demand.
fn render_columns(
    ctx: &WorldGenContext,
    size: u32,
    color: impl Fn(&RegionMaps, i32, i32) -> (u8, u8, u8),
) -> MapImage {
    let region_blocks = (ctx.config.region_chunks * CHUNK_SIZE) as i32;
    let mut regions: HashMap<(i32, i32), RegionMaps> = HashMap::new();
    let mut image = MapImage::new(size, size);
    for pz in 0..size {
        for px in 0..size {
            let (x, z) = (px as i32, pz as i32);
            let key = (x.div_euclid(region_blocks), z.div_euclid(region_blocks));
            let maps = regions
                .entry(key)
                .or_insert_with(|| ctx.generate_region(key.0, key.1));
            image.set_pixel(px, pz, color(maps, x, z));
        }
    }
    image
}

/// Generate deposits for an area of flat terrain and render the shallowest
/// ore found in each column, shaded by depth where there is none.
fn render_deposits(ctx: &WorldGenContext, chunks: u32) -> MapImage {
    let stone = demo_assets::demo_stone(&ctx.registry);
    let surface = (ctx.config.sea_level - 10).max(8) as u16;
    let mut world = MemoryWorld::flat(ctx.config.map_height, ctx.config.sea_level, surface, stone);

    let mut total = 0;
    let mut region_cache: HashMap<(i32, i32), RegionMaps> = HashMap::new();
    for cz in 0..chunks as i32 {
        for cx in 0..chunks as i32 {
            let region_blocks = (ctx.config.region_chunks * CHUNK_SIZE) as i32;
            let key = (
                (cx * CHUNK_SIZE as i32).div_euclid(region_blocks),
                (cz * CHUNK_SIZE as i32).div_euclid(region_blocks),
            );
            let maps = region_cache
                .entry(key)
                .or_insert_with(|| ctx.generate_region(key.0, key.1));
            let chunk = ChunkRect::new(cx, cz);
            total += ctx.generate_chunk_deposits(&mut world, maps, chunk);
            ctx.generate_chunk_patches(&mut world, maps, chunk);
        }
    }
    info!(cells = total, "deposit cells placed");

    let size = chunks * CHUNK_SIZE as u32;
    let mut image = MapImage::new(size, size);
    let ore_palette = demo_assets::ore_palette(&ctx.registry);
    for pz in 0..size {
        for px in 0..size {
            let (x, z) = (px as i32, pz as i32);
            let mut pixel = None;
            for y in (1..=i32::from(surface) + 1).rev() {
                if let Some(color) = ore_palette.get(&world.block(x, y, z)) {
                    pixel = Some(*color);
                    break;
                }
            }
            let color =
                pixel.unwrap_or_else(|| height_shade(i32::from(surface), ctx.config.map_height));
            image.set_pixel(px, pz, color);
        }
    }
    image
}
