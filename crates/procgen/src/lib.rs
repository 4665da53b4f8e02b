//! Procedural generation of height-displaced torus terrain.
//!
//! Settings + height field -> [`TerrainGrid`] (parametric geometry cache)
//! -> [`MeshTessellator`] (unshared-vertex triangle mesh with banded UVs).

pub mod grid;
pub mod height;
pub mod pipeline;
pub mod tessellator;
pub mod toroidal;

pub use grid::*;
pub use height::*;
pub use pipeline::*;
pub use tessellator::*;
pub use toroidal::*;
