//! Turns a terrain grid into a triangle mesh with height-banded UVs.

use glam::Vec2;
use terrain_core::{MeshData, TerrainResult, TerrainSettings};

use crate::grid::TerrainGrid;
use crate::toroidal::ToroidalCoordinate;

/// U coordinates of the stripe sampled by every triangle.
const STRIPE_U: [f32; 2] = [0.4, 0.5];
/// Height of a stripe in V.
const STRIPE_HEIGHT: f32 = 0.05;

/// Quantise an average normalised height into one of four texture bands
/// (half-open intervals, so boundaries resolve to the upper band).
#[inline]
pub fn height_band(average: f32) -> f32 {
    if average < 0.25 {
        0.15
    } else if average < 0.5 {
        0.40
    } else if average < 0.75 {
        0.65
    } else {
        0.90
    }
}

/// UVs for the three corners of a triangle in emission order.
#[inline]
pub fn band_uvs(band: f32) -> [Vec2; 3] {
    [
        Vec2::new(STRIPE_U[0], band),
        Vec2::new(STRIPE_U[1], band),
        Vec2::new(STRIPE_U[0], band - STRIPE_HEIGHT),
    ]
}

/// Emits two unshared triangles per cell.
///
/// Triangle A is `v0, v1, v2`; triangle B covers `v1, v2, v3` and is emitted as
/// `v1, v3, v2` so both face outward (counter-clockwise seen from outside the torus).
#[derive(Debug, Clone, Copy)]
pub struct MeshTessellator {
    small_radius: f32,
    height: f32,
}

impl MeshTessellator {
    pub fn new(settings: &TerrainSettings) -> TerrainResult<Self> {
        settings.validate()?;
        Ok(Self {
            small_radius: settings.small_radius,
            height: settings.height,
        })
    }

    /// Average normalised height of a triangle, recovered from its displaced radii.
    /// A flat torus (`height == 0`) has average height 0 everywhere.
    pub fn average_height(&self, corners: &[ToroidalCoordinate; 3]) -> f32 {
        if self.height == 0.0 {
            return 0.0;
        }
        let sum: f32 = corners.iter().map(|c| c.displaced_radius()).sum();
        (sum - 3.0 * self.small_radius) / (3.0 * self.height)
    }

    pub fn tessellate(&self, grid: &TerrainGrid) -> MeshData {
        let mut mesh = MeshData::with_capacity(grid.len() * 6);

        for cell in grid.cells() {
            self.emit_triangle(&mut mesh, [cell.v0, cell.v1, cell.v2]);
            self.emit_triangle(&mut mesh, [cell.v1, cell.v3, cell.v2]);
        }

        mesh.recalculate_normals();

        log::debug!(
            "Tessellated {}x{} grid into {} triangles",
            grid.x_cells(),
            grid.y_cells(),
            mesh.triangle_count()
        );
        mesh
    }

    fn emit_triangle(&self, mesh: &mut MeshData, corners: [ToroidalCoordinate; 3]) {
        let band = height_band(self.average_height(&corners));
        let base = mesh.positions.len() as u32;

        for (corner, uv) in corners.iter().zip(band_uvs(band)) {
            mesh.positions.push(corner.to_cartesian());
            mesh.uvs.push(uv);
        }
        mesh.indices.extend([base, base + 1, base + 2]);
    }
}
