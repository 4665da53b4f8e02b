//! Writes generated terrain to disk: the mesh as Wavefront OBJ, the terrain grid as a
//! RON cache, and a small scene descriptor tying the mesh to its material.
//!
//! Layout under the output root:
//! - `meshes/<name>.obj`
//! - `terrains/<name>.ron`
//! - `prefabs/<name>.ron`

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use procgen::{OutputSink, TerrainGrid};
use serde::{Deserialize, Serialize};
use terrain_core::{AssetRef, MeshData, TerrainSettings};

/// Scene-side description of a generated terrain: what to render and with which material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    pub name: String,
    pub mesh: PathBuf,
    pub grid: PathBuf,
    pub material: AssetRef,
}

/// Output paths for one named terrain.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub mesh: PathBuf,
    pub grid: PathBuf,
    pub prefab: PathBuf,
}

impl AssetPaths {
    pub fn new(root: &Path, name: &str) -> Self {
        Self {
            mesh: root.join("meshes").join(format!("{name}.obj")),
            grid: root.join("terrains").join(format!("{name}.ron")),
            prefab: root.join("prefabs").join(format!("{name}.ron")),
        }
    }

    fn all(&self) -> [&Path; 3] {
        [self.mesh.as_path(), self.grid.as_path(), self.prefab.as_path()]
    }
}

/// [`OutputSink`] that persists to an asset directory.
#[derive(Debug)]
pub struct AssetSink {
    name: String,
    paths: AssetPaths,
}

impl AssetSink {
    pub fn new(root: impl AsRef<Path>, name: impl Into<String>) -> Self {
        let name = name.into();
        let paths = AssetPaths::new(root.as_ref(), &name);
        Self { name, paths }
    }

    pub fn paths(&self) -> &AssetPaths {
        &self.paths
    }

    /// Delete outputs left by an earlier run so a failed export never mixes generations.
    pub fn remove_stale(&self) -> Result<()> {
        for path in self.paths.all() {
            match std::fs::remove_file(path) {
                Ok(()) => log::debug!("Removed stale {:?}", path),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e).with_context(|| format!("removing stale {:?}", path)),
            }
        }
        Ok(())
    }

    /// Read back a grid cache written by an earlier export.
    pub fn load_grid(&self) -> Result<TerrainGrid> {
        let data = std::fs::read_to_string(&self.paths.grid)
            .with_context(|| format!("reading terrain grid {:?}", self.paths.grid))?;
        ron::from_str(&data).with_context(|| format!("parsing terrain grid {:?}", self.paths.grid))
    }
}

impl OutputSink for AssetSink {
    type Error = anyhow::Error;

    fn accept(
        &mut self,
        mesh: &MeshData,
        grid: &TerrainGrid,
        settings: &TerrainSettings,
    ) -> Result<()> {
        self.remove_stale()?;

        write_obj(&self.paths.mesh, &self.name, mesh)?;
        write_ron(&self.paths.grid, grid)?;
        write_ron(
            &self.paths.prefab,
            &SceneDescriptor {
                name: self.name.clone(),
                mesh: self.paths.mesh.clone(),
                grid: self.paths.grid.clone(),
                material: settings.material.clone(),
            },
        )?;

        log::info!("Saved terrain '{}' to {:?}", self.name, self.paths.mesh);
        Ok(())
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {:?}", dir))?;
    }
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    Ok(BufWriter::new(file))
}

fn write_ron<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
        .with_context(|| format!("serialising {:?}", path))?;
    let mut out = create(path)?;
    out.write_all(text.as_bytes())
        .and_then(|_| out.flush())
        .with_context(|| format!("writing {:?}", path))
}

/// Wavefront OBJ with positions, UVs and normals; faces are 1-based `v/vt/vn` triples.
fn write_obj(path: &Path, name: &str, mesh: &MeshData) -> Result<()> {
    let mut out = create(path)?;
    encode_obj(&mut out, name, mesh)
        .and_then(|_| out.flush())
        .with_context(|| format!("writing {:?}", path))
}

fn encode_obj(out: &mut impl Write, name: &str, mesh: &MeshData) -> std::io::Result<()> {
    writeln!(out, "# torus terrain")?;
    writeln!(out, "o {name}")?;
    for p in &mesh.positions {
        writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for uv in &mesh.uvs {
        writeln!(out, "vt {} {}", uv.x, uv.y)?;
    }
    for n in &mesh.normals {
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    for [a, b, c] in mesh.triangles() {
        let (a, b, c) = (a + 1, b + 1, c + 1);
        writeln!(out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::HeightMap;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("torus-terrain-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn small_settings() -> TerrainSettings {
        TerrainSettings {
            x_cells: 2,
            y_cells: 3,
            material: AssetRef::new("materials/grass_rock_snow"),
            ..Default::default()
        }
    }

    #[test]
    fn obj_lists_every_vertex_and_face() {
        let out = procgen::generate(&small_settings(), HeightMap::constant(4, 4, 0.5)).unwrap();
        let mut buf = Vec::new();
        encode_obj(&mut buf, "ring", &out.mesh).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 36);
        assert_eq!(text.lines().filter(|l| l.starts_with("vt ")).count(), 36);
        assert_eq!(text.lines().filter(|l| l.starts_with("vn ")).count(), 36);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 12);
        assert!(text.contains("f 1/1/1 2/2/2 3/3/3"));
    }

    #[test]
    fn sink_writes_all_assets_and_grid_reloads() {
        let root = scratch_dir("sink");
        let settings = small_settings();
        let mut sink = AssetSink::new(&root, "ring");
        let generated =
            procgen::generate_into(&settings, HeightMap::constant(4, 4, 0.5), &mut sink).unwrap();

        for path in sink.paths().all() {
            assert!(path.exists(), "{:?} missing", path);
        }

        assert_eq!(sink.load_grid().unwrap(), generated.grid);

        let prefab: SceneDescriptor =
            ron::from_str(&std::fs::read_to_string(&sink.paths().prefab).unwrap()).unwrap();
        assert_eq!(prefab.name, "ring");
        assert_eq!(prefab.material, settings.material);

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn reloaded_grid_only_regenerates_with_its_own_settings() {
        let root = scratch_dir("cache");
        let settings = small_settings();
        let mut sink = AssetSink::new(&root, "ring");
        let generated =
            procgen::generate_into(&settings, HeightMap::constant(4, 4, 0.5), &mut sink).unwrap();

        let grid = sink.load_grid().unwrap();
        assert_eq!(procgen::regenerate(&grid, &settings).unwrap(), generated.mesh);

        let edited = TerrainSettings {
            height: settings.height * 2.0,
            ..settings.clone()
        };
        assert!(procgen::regenerate(&grid, &edited).is_err());

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn stale_outputs_are_removed() {
        let root = scratch_dir("stale");
        let sink = AssetSink::new(&root, "ring");
        std::fs::create_dir_all(sink.paths().mesh.parent().unwrap()).unwrap();
        std::fs::write(&sink.paths().mesh, "stale").unwrap();

        sink.remove_stale().unwrap();
        assert!(!sink.paths().mesh.exists());
        // Nothing to remove is not an error.
        sink.remove_stale().unwrap();

        std::fs::remove_dir_all(&root).unwrap();
    }
}
