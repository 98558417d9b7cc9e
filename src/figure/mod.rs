//! Figure rendering with `plotters`
//!
//! Structure:
//! - `ticks.rs`: scientific tick labels shared by the 2D and 3D charts
//! - `projections.rs`: 2×2 figure with x-y, x-z, y-z projections and the metadata table
//! - `orbit3d.rs`: 3D orbit scene with the Earth sphere and equal-aspect bounds

pub mod orbit3d;
pub mod projections;
pub mod ticks;

pub use orbit3d::{BoundingBox, OrbitScene, SphereMesh, ViewAngle, EARTH_RADIUS_KM};
pub use projections::{render_projections, Projection};
pub use ticks::SciScale;

/// Default figure width in inches
pub const FIGURE_WIDTH_IN: f64 = 6.4;

/// Default figure height in inches
pub const FIGURE_HEIGHT_IN: f64 = 4.8;

/// Font used for every label and table cell
pub const FONT_FAMILY: &str = "sans-serif";

/// Physical figure size and resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSize {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: f64,
}

impl FigureSize {
    pub fn new(width_in: f64, height_in: f64, dpi: f64) -> Self {
        Self {
            width_in,
            height_in,
            dpi,
        }
    }

    /// Default-sized figure at the given resolution
    pub fn with_dpi(dpi: f64) -> Self {
        Self::new(FIGURE_WIDTH_IN, FIGURE_HEIGHT_IN, dpi)
    }

    /// Raster size in pixels
    pub fn pixels(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi).round().max(1.0) as u32,
            (self.height_in * self.dpi).round().max(1.0) as u32,
        )
    }

    /// Points to pixels (1 pt = 1/72 in)
    pub fn pt(&self, points: f64) -> f64 {
        points * self.dpi / 72.0
    }

    /// Points to whole pixels, at least one
    pub fn pt_px(&self, points: f64) -> u32 {
        self.pt(points).round().max(1.0) as u32
    }
}
