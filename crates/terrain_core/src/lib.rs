//! Core types shared by the torus terrain generator.
//!
//! This crate provides the foundational types used by generation and tooling:
//! - Terrain settings and asset references
//! - The configuration error taxonomy
//! - The output mesh value object and its normal/weld post-processes

pub mod error;
pub mod mesh;
pub mod settings;

pub use error::*;
pub use mesh::*;
pub use settings::*;

// Re-export commonly used types
pub use glam::{Vec2, Vec3};
