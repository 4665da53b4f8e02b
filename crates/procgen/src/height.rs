//! Height fields and nearest-neighbour height sampling over the cell grid.

use std::path::Path;

use image::DynamicImage;
use terrain_core::{ConfigIssue, GridAxis, TerrainResult};

/// A 2D grayscale pixel source.
pub trait HeightField {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Intensity of pixel `(x, y)` in `[0, 1]`. Callers keep `x < width` and `y < height`.
    fn intensity(&self, x: u32, y: u32) -> f32;
}

impl<T: HeightField + ?Sized> HeightField for &T {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn intensity(&self, x: u32, y: u32) -> f32 {
        (**self).intensity(x, y)
    }
}

/// Owned grayscale height field. Row 0 is the bottom edge (texture-space v = 0).
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMap {
    width: u32,
    height: u32,
    samples: Vec<f32>,
}

impl HeightMap {
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> f32) -> Self {
        let mut samples = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                samples.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            samples,
        }
    }

    pub fn constant(width: u32, height: u32, value: f32) -> Self {
        Self::from_fn(width, height, |_, _| value)
    }

    /// Convert an image using luma weights 0.299 / 0.587 / 0.114.
    /// Image rows are stored top-down, so they are flipped to put row 0 at the bottom.
    pub fn from_image(image: &DynamicImage) -> Self {
        let rgb = image.to_rgb32f();
        let (width, height) = rgb.dimensions();
        Self::from_fn(width, height, |x, y| {
            let [r, g, b] = rgb.get_pixel(x, height - 1 - y).0;
            (0.299 * r + 0.587 * g + 0.114 * b).clamp(0.0, 1.0)
        })
    }

    /// Load and convert an image file (PNG or JPEG).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, image::ImageError> {
        let image = image::open(path)?;
        Ok(Self::from_image(&image))
    }
}

impl HeightField for HeightMap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn intensity(&self, x: u32, y: u32) -> f32 {
        self.samples[y as usize * self.width as usize + x as usize]
    }
}

/// Maps logical grid coordinates `(ti, tj)`, `0 <= ti <= x_cells`, `0 <= tj <= y_cells`,
/// onto height-field pixels without interpolation.
#[derive(Debug, Clone)]
pub struct HeightSampler<F> {
    field: F,
    x_cells: u32,
    y_cells: u32,
}

impl<F: HeightField> HeightSampler<F> {
    /// Fails before touching any pixel if the grid or the field is empty.
    pub fn new(field: F, x_cells: u32, y_cells: u32) -> TerrainResult<Self> {
        if x_cells == 0 {
            return Err(ConfigIssue::ZeroCells { axis: GridAxis::X }.into());
        }
        if y_cells == 0 {
            return Err(ConfigIssue::ZeroCells { axis: GridAxis::Y }.into());
        }
        let (width, height) = (field.width(), field.height());
        if width == 0 || height == 0 {
            return Err(ConfigIssue::EmptyHeightField { width, height }.into());
        }
        Ok(Self {
            field,
            x_cells,
            y_cells,
        })
    }

    /// Pixel read for grid coordinate `(ti, tj)`. Clamped to the field, so the seam
    /// coordinate `ti == x_cells` reads the last column instead of overrunning.
    pub fn pixel(&self, ti: u32, tj: u32) -> (u32, u32) {
        let (width, height) = (self.field.width(), self.field.height());
        let x = (ti as f32 / self.x_cells as f32 * width as f32).floor() as u32;
        let y = (tj as f32 / self.y_cells as f32 * height as f32).floor() as u32;
        (x.min(width - 1), y.min(height - 1))
    }

    /// Normalised height in `[0, 1]` at grid coordinate `(ti, tj)`.
    pub fn sample(&self, ti: u32, tj: u32) -> f32 {
        let (x, y) = self.pixel(ti, tj);
        self.field.intensity(x, y).clamp(0.0, 1.0)
    }
}
