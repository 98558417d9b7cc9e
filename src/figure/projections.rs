//! 2D projection figure
//!
//! Layout (2×2):
//! ```text
//! +---------+---------+
//! |  x - y  |  x - z  |
//! +---------+---------+
//! |  y - z  |  table  |
//! +---------+---------+
//! ```
//! Each projection marks the origin (centre of the central body) with a blue
//! dot and draws the trajectory as a connected black line.

use super::ticks::SciScale;
use super::{FigureSize, FONT_FAMILY};
use crate::data::{Metadata, MetadataRow, StateHistory};
use crate::error::{PlotError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;
use std::path::Path;
use tracing::debug;

/// Table font size in points
const TABLE_FONT_PT: f64 = 10.0;

/// Height of one table row as a fraction of the panel height
const TABLE_ROW_HEIGHT: f64 = 0.09;

/// Column widths as fractions of the panel width: label, value, unit
const TABLE_COLUMN_WIDTHS: [f64; 3] = [0.22, 0.36, 0.2];

/// Relative padding added around each projection's data range
const RANGE_PADDING: f64 = 0.05;

/// One orthogonal view of the trajectory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    XY,
    XZ,
    YZ,
}

impl Projection {
    /// Projections in panel order
    pub const ALL: [Projection; 3] = [Projection::XY, Projection::XZ, Projection::YZ];

    pub fn axis_labels(self) -> (&'static str, &'static str) {
        match self {
            Projection::XY => ("x [km]", "y [km]"),
            Projection::XZ => ("x [km]", "z [km]"),
            Projection::YZ => ("y [km]", "z [km]"),
        }
    }

    /// Horizontal and vertical coordinates of every sample
    pub fn coordinates(self, history: &StateHistory) -> (Vec<f64>, Vec<f64>) {
        match self {
            Projection::XY => (history.xs(), history.ys()),
            Projection::XZ => (history.xs(), history.zs()),
            Projection::YZ => (history.ys(), history.zs()),
        }
    }
}

/// Render the projection figure to `path`
///
/// The raster format follows the file extension. Returns the figure size that
/// was written.
pub fn render_projections(
    history: &StateHistory,
    metadata: &Metadata,
    path: &Path,
    dpi: f64,
) -> Result<FigureSize> {
    let size = FigureSize::with_dpi(dpi);
    let (width, height) = size.pixels();
    debug!("Projection figure: {}×{} px at {} dpi", width, height, dpi);

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    draw_projection_figure(&root, history, metadata, &size)?;
    root.present().map_err(PlotError::render)?;

    Ok(size)
}

/// Draw all four panels onto an existing drawing area
pub fn draw_projection_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    history: &StateHistory,
    metadata: &Metadata,
    size: &FigureSize,
) -> Result<()> {
    root.fill(&WHITE).map_err(PlotError::render)?;

    let panels = root.split_evenly((2, 2));
    for (panel, projection) in panels.iter().zip(Projection::ALL) {
        draw_projection(panel, history, projection, size)?;
    }
    draw_metadata_table(&panels[3], &metadata.table_rows(), size)?;

    Ok(())
}

fn draw_projection<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    history: &StateHistory,
    projection: Projection,
    size: &FigureSize,
) -> Result<()> {
    let (xs, ys) = projection.coordinates(history);
    let (x_label, y_label) = projection.axis_labels();

    let x_range = padded_range(&xs);
    let y_range = padded_range(&ys);
    let x_scale = SciScale::for_range(x_range.start, x_range.end);
    let y_scale = SciScale::for_range(y_range.start, y_range.end);

    let mut chart = ChartBuilder::on(area)
        .margin(size.pt_px(6.0))
        .x_label_area_size(size.pt_px(26.0))
        .y_label_area_size(size.pt_px(30.0))
        .build_cartesian_2d(x_range, y_range)
        .map_err(PlotError::render)?;

    let x_formatter = |v: &f64| x_scale.format_tick(*v);
    let y_formatter = |v: &f64| y_scale.format_tick(*v);
    chart
        .configure_mesh()
        .x_desc(x_scale.caption(x_label))
        .y_desc(y_scale.caption(y_label))
        .x_labels(6)
        .y_labels(6)
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .label_style((FONT_FAMILY, size.pt(7.0)))
        .axis_desc_style((FONT_FAMILY, size.pt(8.0)))
        .bold_line_style(BLACK.mix(0.15))
        .max_light_lines(0)
        .draw()
        .map_err(PlotError::render)?;

    chart
        .draw_series(std::iter::once(Circle::new(
            (0.0, 0.0),
            size.pt_px(2.5),
            BLUE.filled(),
        )))
        .map_err(PlotError::render)?;

    chart
        .draw_series(LineSeries::new(
            xs.into_iter().zip(ys),
            BLACK.stroke_width(size.pt_px(0.8)),
        ))
        .map_err(PlotError::render)?;

    Ok(())
}

/// Range enclosing the data and the origin, padded on both sides
pub fn padded_range(values: &[f64]) -> Range<f64> {
    let (min, max) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let span = max - min;
    if span <= 0.0 {
        return (min - 1.0)..(max + 1.0);
    }

    let pad = span * RANGE_PADDING;
    (min - pad)..(max + pad)
}

/// Render the metadata rows as a centred three-column table without axes
fn draw_metadata_table<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rows: &[MetadataRow],
    size: &FigureSize,
) -> Result<()> {
    let (width, height) = area.dim_in_pixel();
    let (width, height) = (width as f64, height as f64);

    let column_widths: Vec<f64> = TABLE_COLUMN_WIDTHS.iter().map(|w| w * width).collect();
    let table_width: f64 = column_widths.iter().sum();
    let row_height = TABLE_ROW_HEIGHT * height;
    let table_height = row_height * rows.len() as f64;

    let left = (width - table_width) / 2.0;
    let top = (height - table_height) / 2.0;

    let text_style = TextStyle::from((FONT_FAMILY, size.pt(TABLE_FONT_PT)).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    let border = BLACK.stroke_width(1);

    for (row_idx, row) in rows.iter().enumerate() {
        let y0 = top + row_idx as f64 * row_height;
        let y1 = y0 + row_height;
        let cells = [
            row.label.to_string(),
            format_metadata_value(row.value),
            row.unit.to_string(),
        ];

        let mut x0 = left;
        for (cell, cell_width) in cells.into_iter().zip(&column_widths) {
            let x1 = x0 + cell_width;

            area.draw(&Rectangle::new(
                [(x0 as i32, y0 as i32), (x1 as i32, y1 as i32)],
                border,
            ))
            .map_err(PlotError::render)?;

            let center = (((x0 + x1) / 2.0) as i32, ((y0 + y1) / 2.0) as i32);
            area.draw(&Text::new(cell, center, text_style.clone()))
                .map_err(PlotError::render)?;

            x0 = x1;
        }
    }

    Ok(())
}

/// Plain decimal for moderate magnitudes, exponent form otherwise
pub fn format_metadata_value(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-3..1e7).contains(&magnitude) {
        format!("{:.6e}", value)
    } else {
        format!("{}", value)
    }
}
