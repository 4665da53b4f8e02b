//! Terrain settings files (`.ron`) and the height maps they reference.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use procgen::HeightMap;
use terrain_core::TerrainSettings;

/// Load settings from a RON file. Missing fields take their defaults.
pub fn load_settings(path: &Path) -> Result<TerrainSettings> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading terrain settings {:?}", path))?;
    let settings: TerrainSettings =
        ron::from_str(&data).with_context(|| format!("parsing terrain settings {:?}", path))?;
    Ok(settings)
}

/// Height maps are referenced relative to the settings file that names them.
pub fn height_map_path(settings_path: &Path, settings: &TerrainSettings) -> Result<PathBuf> {
    if settings.height_map.is_empty() {
        bail!("terrain settings {:?} do not reference a height map", settings_path);
    }
    let dir = settings_path.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(settings.height_map.as_str()))
}

pub fn load_height_map(settings_path: &Path, settings: &TerrainSettings) -> Result<HeightMap> {
    let path = height_map_path(settings_path, settings)?;
    let map = HeightMap::open(&path).with_context(|| format!("loading height map {:?}", path))?;
    log::info!("Loaded height map {:?}", path);
    Ok(map)
}

/// Terrain name used for every output file: the settings file stem.
pub fn terrain_name(settings_path: &Path) -> Result<String> {
    settings_path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_owned)
        .with_context(|| format!("cannot derive a terrain name from {:?}", settings_path))
}
