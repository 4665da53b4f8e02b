//! Generation pipeline: settings + height field -> terrain grid -> mesh -> output sink.

use terrain_core::{MeshData, TerrainError, TerrainResult, TerrainSettings};

use crate::grid::TerrainGrid;
use crate::height::HeightField;
use crate::tessellator::MeshTessellator;

/// Everything one generation run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTerrain {
    pub grid: TerrainGrid,
    pub mesh: MeshData,
}

/// Receives finished generation results, e.g. to persist them or place them in a scene.
/// Called once per run, only after the mesh and grid are complete.
pub trait OutputSink {
    type Error: From<TerrainError>;

    fn accept(
        &mut self,
        mesh: &MeshData,
        grid: &TerrainGrid,
        settings: &TerrainSettings,
    ) -> Result<(), Self::Error>;
}

/// Build the grid and tessellate it. Fails before sampling on invalid input.
pub fn generate<F: HeightField>(
    settings: &TerrainSettings,
    field: F,
) -> TerrainResult<GeneratedTerrain> {
    let tessellator = MeshTessellator::new(settings)?;
    let grid = TerrainGrid::build(settings, field)?;
    let mesh = tessellator.tessellate(&grid);

    log::info!(
        "Generated torus terrain: {}x{} cells, {} vertices, {} triangles",
        grid.x_cells(),
        grid.y_cells(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    Ok(GeneratedTerrain { grid, mesh })
}

/// Re-tessellate a cached grid without touching any height field.
/// `settings` must describe the grid size and torus the grid was built with.
pub fn regenerate(grid: &TerrainGrid, settings: &TerrainSettings) -> TerrainResult<MeshData> {
    let tessellator = MeshTessellator::new(settings)?;
    grid.check_matches(settings)?;
    Ok(tessellator.tessellate(grid))
}

/// [`generate`], then hand the result to `sink`. On a configuration error the sink is
/// never called.
pub fn generate_into<F, S>(
    settings: &TerrainSettings,
    field: F,
    sink: &mut S,
) -> Result<GeneratedTerrain, S::Error>
where
    F: HeightField,
    S: OutputSink,
{
    let generated = generate(settings, field)?;
    sink.accept(&generated.mesh, &generated.grid, settings)?;
    Ok(generated)
}

/// One result captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub struct SinkRecord {
    pub mesh: MeshData,
    pub grid: TerrainGrid,
    pub settings: TerrainSettings,
}

/// Keeps every accepted result in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<SinkRecord>,
}

impl OutputSink for MemorySink {
    type Error = TerrainError;

    fn accept(
        &mut self,
        mesh: &MeshData,
        grid: &TerrainGrid,
        settings: &TerrainSettings,
    ) -> Result<(), Self::Error> {
        self.records.push(SinkRecord {
            mesh: mesh.clone(),
            grid: grid.clone(),
            settings: settings.clone(),
        });
        Ok(())
    }
}
