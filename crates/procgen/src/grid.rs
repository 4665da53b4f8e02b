//! Terrain grid: the cached parametric geometry of every cell.
//!
//! The grid is the only stage that reads the height field. It is serialisable so it
//! can be stored next to the mesh and re-tessellated later without the source image.

use serde::{Deserialize, Serialize};
use terrain_core::{ConfigIssue, TerrainResult, TerrainSettings};

use crate::height::{HeightField, HeightSampler};
use crate::toroidal::ToroidalCoordinate;

/// One grid quad. Corners: `v0 (i, j)`, `v1 (i+1, j)`, `v2 (i, j+1)`, `v3 (i+1, j+1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub v0: ToroidalCoordinate,
    pub v1: ToroidalCoordinate,
    pub v2: ToroidalCoordinate,
    pub v3: ToroidalCoordinate,
}

impl Cell {
    /// Evaluate the four corners of cell `(i, j)`. Pure in its inputs, so cells can be
    /// built in any order or in parallel.
    pub fn build<F: HeightField>(
        i: u32,
        j: u32,
        settings: &TerrainSettings,
        sampler: &HeightSampler<F>,
    ) -> Self {
        Self {
            v0: ToroidalCoordinate::build(i, j, settings, sampler),
            v1: ToroidalCoordinate::build(i + 1, j, settings, sampler),
            v2: ToroidalCoordinate::build(i, j + 1, settings, sampler),
            v3: ToroidalCoordinate::build(i + 1, j + 1, settings, sampler),
        }
    }

    pub fn corners(&self) -> [ToroidalCoordinate; 4] {
        [self.v0, self.v1, self.v2, self.v3]
    }
}

/// `x_cells * y_cells` cells stored row-major by `i`, then `j`, together with the
/// torus parameters they were evaluated with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct TerrainGrid {
    x_cells: u32,
    y_cells: u32,
    small_radius: f32,
    big_radius: f32,
    height: f32,
    cells: Vec<Cell>,
}

/// Unchecked on-disk form; converted through `TryFrom` so a truncated or corrupted
/// cache is rejected.
#[derive(Deserialize)]
struct RawGrid {
    x_cells: u32,
    y_cells: u32,
    small_radius: f32,
    big_radius: f32,
    height: f32,
    cells: Vec<Cell>,
}

impl TryFrom<RawGrid> for TerrainGrid {
    type Error = String;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        let expected = raw.x_cells as usize * raw.y_cells as usize;
        if raw.x_cells == 0 || raw.y_cells == 0 || raw.cells.len() != expected {
            return Err(format!(
                "terrain grid {}x{} holds {} cells, expected {}",
                raw.x_cells,
                raw.y_cells,
                raw.cells.len(),
                expected
            ));
        }
        let radii_ok = raw.small_radius.is_finite()
            && raw.small_radius > 0.0
            && raw.big_radius.is_finite()
            && raw.big_radius > 0.0;
        if !radii_ok || !raw.height.is_finite() || raw.height < 0.0 {
            return Err(format!(
                "terrain grid has invalid parameters: small_radius {}, big_radius {}, height {}",
                raw.small_radius, raw.big_radius, raw.height
            ));
        }
        Ok(Self {
            x_cells: raw.x_cells,
            y_cells: raw.y_cells,
            small_radius: raw.small_radius,
            big_radius: raw.big_radius,
            height: raw.height,
            cells: raw.cells,
        })
    }
}

impl TerrainGrid {
    /// Validate `settings` and `field`, then evaluate every cell.
    /// Nothing is sampled unless validation passes.
    pub fn build<F: HeightField>(settings: &TerrainSettings, field: F) -> TerrainResult<Self> {
        settings.validate()?;
        let sampler = HeightSampler::new(field, settings.x_cells, settings.y_cells)?;

        if settings.is_self_intersecting() {
            log::warn!(
                "big_radius {} <= small_radius {} + height {}: tube may self-intersect",
                settings.big_radius,
                settings.small_radius,
                settings.height
            );
        }

        Ok(Self::from_sampler(settings, &sampler))
    }

    /// Evaluate every cell with an already validated sampler.
    pub fn from_sampler<F: HeightField>(
        settings: &TerrainSettings,
        sampler: &HeightSampler<F>,
    ) -> Self {
        let (x_cells, y_cells) = (settings.x_cells, settings.y_cells);
        let mut cells = Vec::with_capacity(x_cells as usize * y_cells as usize);
        for i in 0..x_cells {
            for j in 0..y_cells {
                cells.push(Cell::build(i, j, settings, sampler));
            }
        }
        log::debug!(
            "Built {}x{} terrain grid ({:?} seam)",
            x_cells,
            y_cells,
            settings.seam
        );
        Self {
            x_cells,
            y_cells,
            small_radius: settings.small_radius,
            big_radius: settings.big_radius,
            height: settings.height,
            cells,
        }
    }

    /// Fails unless `settings` describe the same grid size and torus this grid was
    /// built with.
    pub fn check_matches(&self, settings: &TerrainSettings) -> TerrainResult<()> {
        if (self.x_cells, self.y_cells) != (settings.x_cells, settings.y_cells) {
            return Err(ConfigIssue::CachedGridSize {
                cached_x: self.x_cells,
                cached_y: self.y_cells,
                x_cells: settings.x_cells,
                y_cells: settings.y_cells,
            }
            .into());
        }
        let parameters = [
            ("small_radius", self.small_radius, settings.small_radius),
            ("big_radius", self.big_radius, settings.big_radius),
            ("height", self.height, settings.height),
        ];
        for (name, cached, requested) in parameters {
            if cached != requested {
                return Err(ConfigIssue::CachedParameter {
                    name,
                    cached,
                    requested,
                }
                .into());
            }
        }
        Ok(())
    }

    pub fn x_cells(&self) -> u32 {
        self.x_cells
    }

    pub fn y_cells(&self) -> u32 {
        self.y_cells
    }

    pub fn small_radius(&self) -> f32 {
        self.small_radius
    }

    pub fn big_radius(&self) -> f32 {
        self.big_radius
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, i: u32, j: u32) -> Option<&Cell> {
        if i >= self.x_cells || j >= self.y_cells {
            return None;
        }
        self.cells.get(i as usize * self.y_cells as usize + j as usize)
    }

    /// Cells with their `(i, j)` indices, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &Cell)> + '_ {
        let y_cells = self.y_cells as usize;
        self.cells.iter().enumerate().map(move |(n, cell)| {
            let (i, j) = (n / y_cells, n % y_cells);
            (i as u32, j as u32, cell)
        })
    }
}
