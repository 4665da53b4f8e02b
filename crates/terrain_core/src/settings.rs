//! Terrain settings: the immutable parameter bag consumed by generation.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigIssue, GridAxis, TerrainResult};

/// Every grid cell emits two unshared triangles.
pub const VERTICES_PER_CELL: u64 = 6;

/// Opaque reference to an external asset (height-map image, material).
/// Generation never dereferences it; the authoring tool decides what it means.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(pub String);

impl AssetRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How grid vertices on the wrap boundary (`i == x_cells`, `j == y_cells`) are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeamMode {
    /// Evaluate boundary vertices at their own index: angle `2π` and the clamped last
    /// texel. Matches historical output but may leave a visible seam.
    #[default]
    Recompute,
    /// Alias boundary indices to `0` so both sides of the seam are bit-identical.
    Wrap,
}

impl SeamMode {
    /// Map a logical grid index to the index actually evaluated.
    #[inline]
    pub fn resolve(self, index: u32, cells: u32) -> u32 {
        match self {
            SeamMode::Recompute => index,
            SeamMode::Wrap => index % cells,
        }
    }
}

/// Configuration for torus terrain generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Cells around the tube (small circle).
    pub x_cells: u32,
    /// Cells around the torus (big circle).
    pub y_cells: u32,
    /// Maximum radial displacement added by the height field.
    pub height: f32,
    /// Base tube radius.
    pub small_radius: f32,
    /// Distance from the torus centre to the tube's centre circle.
    pub big_radius: f32,
    /// Grayscale height-field source.
    pub height_map: AssetRef,
    /// Passed through to the scene descriptor, never read by generation.
    pub material: AssetRef,
    pub seam: SeamMode,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            x_cells: 64,
            y_cells: 128,
            height: 0.5,
            small_radius: 1.0,
            big_radius: 4.0,
            height_map: AssetRef::default(),
            material: AssetRef::default(),
            seam: SeamMode::Recompute,
        }
    }
}

impl TerrainSettings {
    /// Check everything that can be checked without the height field.
    pub fn validate(&self) -> TerrainResult<()> {
        if self.x_cells == 0 {
            return Err(ConfigIssue::ZeroCells { axis: GridAxis::X }.into());
        }
        if self.y_cells == 0 {
            return Err(ConfigIssue::ZeroCells { axis: GridAxis::Y }.into());
        }

        for (name, value) in [
            ("height", self.height),
            ("small_radius", self.small_radius),
            ("big_radius", self.big_radius),
        ] {
            if !value.is_finite() {
                return Err(ConfigIssue::NonFinite { name }.into());
            }
        }

        if self.small_radius <= 0.0 {
            return Err(ConfigIssue::NonPositiveRadius {
                name: "small_radius",
                value: self.small_radius,
            }
            .into());
        }
        if self.big_radius <= 0.0 {
            return Err(ConfigIssue::NonPositiveRadius {
                name: "big_radius",
                value: self.big_radius,
            }
            .into());
        }
        if self.height < 0.0 {
            return Err(ConfigIssue::NegativeHeight(self.height).into());
        }

        let vertices = self.vertex_count();
        if vertices > u64::from(u32::MAX) {
            return Err(ConfigIssue::TooManyVertices {
                x_cells: self.x_cells,
                y_cells: self.y_cells,
                vertices,
            }
            .into());
        }

        Ok(())
    }

    /// Number of mesh vertices (and indices) these settings produce.
    pub fn vertex_count(&self) -> u64 {
        VERTICES_PER_CELL * u64::from(self.x_cells) * u64::from(self.y_cells)
    }

    /// Whether the tallest tube can reach past the torus axis.
    pub fn is_self_intersecting(&self) -> bool {
        self.big_radius <= self.small_radius + self.height
    }
}
