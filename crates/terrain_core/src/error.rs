//! Error types for terrain generation.

use thiserror::Error;

/// Which axis of the cell grid a configuration problem refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAxis {
    X,
    Y,
}

impl std::fmt::Display for GridAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridAxis::X => f.write_str("x"),
            GridAxis::Y => f.write_str("y"),
        }
    }
}

/// A single reason a terrain configuration was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigIssue {
    #[error("{axis}_cells must be positive")]
    ZeroCells { axis: GridAxis },

    #[error("height field is empty ({width}x{height})")]
    EmptyHeightField { width: u32, height: u32 },

    #[error("{name} must be positive, got {value}")]
    NonPositiveRadius { name: &'static str, value: f32 },

    #[error("height must not be negative, got {0}")]
    NegativeHeight(f32),

    #[error("{name} is not a finite number")]
    NonFinite { name: &'static str },

    #[error("{x_cells}x{y_cells} cells need {vertices} vertices, more than 32-bit indices can address")]
    TooManyVertices {
        x_cells: u32,
        y_cells: u32,
        vertices: u64,
    },

    #[error("cached grid has {cached_x}x{cached_y} cells but settings ask for {x_cells}x{y_cells}")]
    CachedGridSize {
        cached_x: u32,
        cached_y: u32,
        x_cells: u32,
        y_cells: u32,
    },

    #[error("cached grid was built with {name} {cached}, settings ask for {requested}")]
    CachedParameter {
        name: &'static str,
        cached: f32,
        requested: f32,
    },
}

/// Errors raised by terrain generation. Always detected before any sampling happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    #[error("invalid terrain configuration: {0}")]
    InvalidConfiguration(#[from] ConfigIssue),
}

pub type TerrainResult<T> = Result<T, TerrainError>;
