//! Points on a height-displaced torus in parametric form.

use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use terrain_core::TerrainSettings;

use crate::height::{HeightField, HeightSampler};

/// A torus surface point: tube radius at this point, torus radius, and the angles
/// around the tube (`angle_x`) and around the torus axis (`angle_y`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToroidalCoordinate {
    displaced_radius: f32,
    big_radius: f32,
    angle_x: f32,
    angle_y: f32,
}

impl ToroidalCoordinate {
    pub fn new(displaced_radius: f32, big_radius: f32, angle_x: f32, angle_y: f32) -> Self {
        Self {
            displaced_radius,
            big_radius,
            angle_x,
            angle_y,
        }
    }

    /// Evaluate grid vertex `(ti, tj)`. This is the only place height data enters the
    /// geometry. Boundary indices are resolved through `settings.seam` first.
    pub fn build<F: HeightField>(
        ti: u32,
        tj: u32,
        settings: &TerrainSettings,
        sampler: &HeightSampler<F>,
    ) -> Self {
        let ti = settings.seam.resolve(ti, settings.x_cells);
        let tj = settings.seam.resolve(tj, settings.y_cells);
        let h = sampler.sample(ti, tj);
        Self {
            displaced_radius: settings.small_radius + h * settings.height,
            big_radius: settings.big_radius,
            angle_x: ti as f32 * (TAU / settings.x_cells as f32),
            angle_y: tj as f32 * (TAU / settings.y_cells as f32),
        }
    }

    pub fn displaced_radius(&self) -> f32 {
        self.displaced_radius
    }

    pub fn big_radius(&self) -> f32 {
        self.big_radius
    }

    pub fn angle_x(&self) -> f32 {
        self.angle_x
    }

    pub fn angle_y(&self) -> f32 {
        self.angle_y
    }

    /// Cartesian position; the torus axis is +Y.
    pub fn to_cartesian(&self) -> Vec3 {
        let (sin_x, cos_x) = self.angle_x.sin_cos();
        let (sin_y, cos_y) = self.angle_y.sin_cos();
        let ring = self.big_radius + self.displaced_radius * cos_x;
        Vec3::new(ring * cos_y, self.displaced_radius * sin_x, ring * sin_y)
    }
}

impl From<ToroidalCoordinate> for Vec3 {
    fn from(coord: ToroidalCoordinate) -> Self {
        coord.to_cartesian()
    }
}
