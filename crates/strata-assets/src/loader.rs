//! Lenient directory loader for world-generation variant tables.
//!
//! A single malformed file is logged and skipped; world creation never
//! aborts over one bad definition.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::deposit::DepositDef;
use crate::error::AssetError;
use crate::patch::BlockPatchDef;
use crate::terrain::{LandformDef, ProvinceDef, VariantsFile};

/// All variant tables consumed by world generation, loaded once at init.
#[derive(Debug, Default)]
pub struct WorldGenAssets {
    pub landforms: Vec<LandformDef>,
    pub provinces: Vec<ProvinceDef>,
    pub deposits: Vec<DepositDef>,
    pub patches: Vec<BlockPatchDef>,
}

impl WorldGenAssets {
    /// Load from an asset directory laid out as:
    ///
    /// ```text
    /// worldgen/
    ///   landforms.json      {"variants": [...]}
    ///   provinces.json      {"variants": [...]}
    ///   deposits/*.json     [DepositDef, ...]
    ///   patches/*.json      [BlockPatchDef, ...]
    /// ```
    ///
    /// Missing files yield empty tables; unreadable or unparsable files are
    /// logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::ReadError`] only if `dir` itself does not
    /// exist or cannot be listed.
    pub fn load_dir(dir: &Path) -> Result<Self, AssetError> {
        fs::metadata(dir).map_err(|source| AssetError::ReadError {
            path: dir.display().to_string(),
            source,
        })?;

        let landforms = read_optional::<VariantsFile<LandformDef>>(&dir.join("landforms.json"))
            .map(|f| f.variants)
            .unwrap_or_default();
        let provinces = read_optional::<VariantsFile<ProvinceDef>>(&dir.join("provinces.json"))
            .map(|f| f.variants)
            .unwrap_or_default();
        let deposits = read_table_dir::<DepositDef>(&dir.join("deposits"));
        let patches = read_table_dir::<BlockPatchDef>(&dir.join("patches"));

        debug!(
            landforms = landforms.len(),
            provinces = provinces.len(),
            deposits = deposits.len(),
            patches = patches.len(),
            "loaded world-generation variant tables"
        );

        Ok(Self {
            landforms,
            provinces,
            deposits,
            patches,
        })
    }
}

/// Parse one JSON file, returning `None` (with a log line) when it is
/// missing or malformed.
fn read_optional<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "variant table not present");
            return None;
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "skipping unreadable variant table");
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "skipping malformed variant table");
            None
        }
    }
}

/// Concatenate every `*.json` array in a directory, sorted by file name so
/// variant indices stay stable across platforms.
fn read_table_dir<T: DeserializeOwned>(dir: &Path) -> Vec<T> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => {
            debug!(path = %dir.display(), "variant table directory not present");
            return Vec::new();
        }
    };
    let mut paths: Vec<_> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut out = Vec::new();
    for path in paths {
        if let Some(mut defs) = read_optional::<Vec<T>>(&path) {
            out.append(&mut defs);
        }
    }
    out
}
