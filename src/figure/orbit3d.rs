//! 3D orbit scene
//!
//! The scene holds the trajectory, a shaded Earth sphere and an equal-aspect
//! bounding box. `plotters` treats its second axis as "up", so orbit
//! coordinates `(x, y, z)` are drawn as chart coordinates `(x, z, y)`.

use super::ticks::SciScale;
use super::FONT_FAMILY;
use crate::data::{Extent, StateHistory};
use crate::error::{PlotError, Result};
use plotters::coord::ranged3d::Cartesian3d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::cmp::Reverse;
use std::f64::consts::PI;
use std::ops::Range;
use std::path::Path;

/// Mean Earth radius [km]
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Samples along longitude and colatitude
pub const SPHERE_SAMPLES: usize = 100;

/// Row/column stride when turning the sphere grid into quads
pub const SPHERE_STRIDE: usize = 4;

/// Half-range used when every trajectory coordinate is constant [km]
const MIN_HALF_RANGE: f64 = 1.0;

/// Direction the sphere is lit from (orbit frame, need not be unit length)
const LIGHT_DIRECTION: [f64; 3] = [-1.0, 1.0, 1.0];

const EARTH_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Chart coordinates of the scene: (x, z, y) in orbit terms
type SceneCoord = Cartesian3d<RangedCoordf64, RangedCoordf64, RangedCoordf64>;

/// Evenly spaced samples over `[start, end]`, both ends included
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Axis limits spanning the same range on all three axes
///
/// The half-range is half of the largest coordinate span, and each axis is
/// centred on the mean of its samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub center: [f64; 3],
    pub half_range: f64,
}

impl BoundingBox {
    pub fn equal_aspect(extent: &Extent) -> Self {
        let max_span = extent
            .x
            .span()
            .max(extent.y.span())
            .max(extent.z.span());
        let half_range = if max_span.is_finite() && max_span > 0.0 {
            max_span / 2.0
        } else {
            MIN_HALF_RANGE
        };

        Self {
            center: [extent.x.mean, extent.y.mean, extent.z.mean],
            half_range,
        }
    }

    /// Limits of axis `i` (0 = x, 1 = y, 2 = z)
    pub fn limits(&self, axis: usize) -> Range<f64> {
        let c = self.center[axis];
        (c - self.half_range)..(c + self.half_range)
    }
}

/// Sphere sampled on a longitude × colatitude grid
#[derive(Debug, Clone)]
pub struct SphereMesh {
    /// `grid[i][j]` is the point at longitude `u_i` and colatitude `v_j`
    grid: Vec<Vec<[f64; 3]>>,
}

impl SphereMesh {
    pub fn new(radius: f64, samples: usize) -> Self {
        let u = linspace(0.0, 2.0 * PI, samples);
        let v = linspace(0.0, PI, samples);

        let grid = u
            .iter()
            .map(|&ui| {
                v.iter()
                    .map(|&vj| {
                        [
                            radius * ui.cos() * vj.sin(),
                            radius * ui.sin() * vj.sin(),
                            radius * vj.cos(),
                        ]
                    })
                    .collect()
            })
            .collect();

        Self { grid }
    }

    pub fn earth() -> Self {
        Self::new(EARTH_RADIUS_KM, SPHERE_SAMPLES)
    }

    pub fn grid(&self) -> &[Vec<[f64; 3]>] {
        &self.grid
    }

    /// Quads between every `stride`-th grid line; the last line is always kept
    pub fn quads(&self, stride: usize) -> Vec<[[f64; 3]; 4]> {
        let rows = stride_indices(self.grid.len(), stride);
        let cols = stride_indices(self.grid.first().map_or(0, |r| r.len()), stride);

        let mut quads = Vec::new();
        for r in rows.windows(2) {
            for c in cols.windows(2) {
                quads.push([
                    self.grid[r[0]][c[0]],
                    self.grid[r[1]][c[0]],
                    self.grid[r[1]][c[1]],
                    self.grid[r[0]][c[1]],
                ]);
            }
        }
        quads
    }
}

/// `0, stride, 2*stride, …` plus the last index
fn stride_indices(n: usize, stride: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    let mut indices: Vec<usize> = (0..n).step_by(stride.max(1)).collect();
    if indices.last() != Some(&(n - 1)) {
        indices.push(n - 1);
    }
    indices
}

/// Lambert shade of a quad facing outwards from the sphere centre, in [0.35, 1]
fn shade(quad: &[[f64; 3]; 4]) -> f64 {
    let centroid = centroid(quad);
    let norm = |v: [f64; 3]| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();

    let n = norm(centroid);
    let l = norm(LIGHT_DIRECTION);
    if n == 0.0 {
        return 1.0;
    }

    let cos = (centroid[0] * LIGHT_DIRECTION[0]
        + centroid[1] * LIGHT_DIRECTION[1]
        + centroid[2] * LIGHT_DIRECTION[2])
        / (n * l);
    0.35 + 0.65 * cos.max(0.0)
}

fn centroid(quad: &[[f64; 3]; 4]) -> [f64; 3] {
    let mut c = [0.0; 3];
    for p in quad {
        for axis in 0..3 {
            c[axis] += p[axis] / 4.0;
        }
    }
    c
}

/// Camera orientation in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewAngle {
    pub yaw: f64,
    pub pitch: f64,
}

impl Default for ViewAngle {
    fn default() -> Self {
        Self {
            yaw: 0.7,
            pitch: 0.45,
        }
    }
}

impl ViewAngle {
    /// Rotate by a drag of `dx`, `dy` pixels
    pub fn dragged(self, dx: f64, dy: f64) -> Self {
        const RADIANS_PER_PIXEL: f64 = 0.01;
        Self {
            yaw: self.yaw + dx * RADIANS_PER_PIXEL,
            pitch: (self.pitch + dy * RADIANS_PER_PIXEL).clamp(-PI / 2.0, PI / 2.0),
        }
    }
}

/// Everything needed to draw the 3D orbit view
#[derive(Debug, Clone)]
pub struct OrbitScene {
    trajectory: Vec<(f64, f64, f64)>,
    bounds: BoundingBox,
    sphere: Vec<([[f64; 3]; 4], RGBColor)>,
}

impl OrbitScene {
    pub fn new(history: &StateHistory) -> Self {
        let bounds = BoundingBox::equal_aspect(&history.extent());
        let sphere = SphereMesh::earth()
            .quads(SPHERE_STRIDE)
            .into_iter()
            .map(|quad| {
                let s = shade(&quad);
                let color = RGBColor(
                    (EARTH_COLOR.0 as f64 * s) as u8,
                    (EARTH_COLOR.1 as f64 * s) as u8,
                    (EARTH_COLOR.2 as f64 * s) as u8,
                );
                (quad, color)
            })
            .collect();

        Self {
            trajectory: history.points(),
            bounds,
            sphere,
        }
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn trajectory(&self) -> &[(f64, f64, f64)] {
        &self.trajectory
    }

    pub fn sphere_quads(&self) -> usize {
        self.sphere.len()
    }

    /// Draw the scene onto an existing drawing area
    pub fn draw<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        view: ViewAngle,
    ) -> Result<()> {
        area.fill(&WHITE).map_err(PlotError::render)?;

        let (width, height) = area.dim_in_pixel();
        let font_px = (width.min(height) as f64 / 45.0).max(8.0);

        let x_limits = self.bounds.limits(0);
        let y_limits = self.bounds.limits(1);
        let z_limits = self.bounds.limits(2);
        let x_scale = SciScale::for_range(x_limits.start, x_limits.end);
        let y_scale = SciScale::for_range(y_limits.start, y_limits.end);
        let z_scale = SciScale::for_range(z_limits.start, z_limits.end);

        let mut chart = self.build_chart(area, view, (font_px * 2.0) as u32)?;

        let x_formatter = |v: &f64| x_scale.format_tick(*v);
        let y_formatter = |v: &f64| z_scale.format_tick(*v);
        let z_formatter = |v: &f64| y_scale.format_tick(*v);
        chart
            .configure_axes()
            .label_style((FONT_FAMILY, font_px * 0.8))
            .x_formatter(&x_formatter)
            .y_formatter(&y_formatter)
            .z_formatter(&z_formatter)
            .light_grid_style(BLACK.mix(0.08))
            .max_light_lines(3)
            .draw()
            .map_err(PlotError::render)?;

        let axis_style = TextStyle::from((FONT_FAMILY, font_px).into_font()).color(&BLACK);
        let captions = [
            (
                x_scale.caption("x [km]"),
                (x_limits.end, z_limits.start, y_limits.start),
            ),
            (
                y_scale.caption("y [km]"),
                (x_limits.start, z_limits.start, y_limits.end),
            ),
            (
                z_scale.caption("z [km]"),
                (x_limits.start, z_limits.end, y_limits.start),
            ),
        ];
        chart
            .draw_series(
                captions
                    .into_iter()
                    .map(|(text, at)| Text::new(text, at, axis_style.clone())),
            )
            .map_err(PlotError::render)?;

        let quads = self.sphere_in_draw_order(&chart);
        chart
            .draw_series(quads.into_iter().map(|(quad, color)| {
                Polygon::new(
                    quad.iter().map(|p| (p[0], p[2], p[1])).collect::<Vec<_>>(),
                    color.filled(),
                )
            }))
            .map_err(PlotError::render)?;

        chart
            .draw_series(LineSeries::new(
                self.trajectory.iter().map(|&(x, y, z)| (x, z, y)),
                BLACK.stroke_width(2),
            ))
            .map_err(PlotError::render)?;

        Ok(())
    }

    /// Chart over the equal-aspect box, seen from `view`
    fn build_chart<'a, DB: DrawingBackend>(
        &self,
        area: &'a DrawingArea<DB, Shift>,
        view: ViewAngle,
        margin: u32,
    ) -> Result<ChartContext<'a, DB, SceneCoord>> {
        // Chart axes: (x, z, y) so that orbit z points up.
        let mut chart = ChartBuilder::on(area)
            .margin(margin)
            .build_cartesian_3d(
                self.bounds.limits(0),
                self.bounds.limits(2),
                self.bounds.limits(1),
            )
            .map_err(PlotError::render)?;

        chart.with_projection(|mut pb| {
            pb.yaw = view.yaw;
            pb.pitch = view.pitch;
            pb.scale = 0.8;
            pb.into_matrix()
        });
        Ok(chart)
    }

    /// Sphere quads in painter's order under the chart's projection.
    /// Larger projected depth is farther from the viewer, so it goes first.
    fn sphere_in_draw_order<DB: DrawingBackend>(
        &self,
        chart: &ChartContext<DB, SceneCoord>,
    ) -> Vec<&([[f64; 3]; 4], RGBColor)> {
        let coord = chart.as_coord_spec();
        let mut quads: Vec<&([[f64; 3]; 4], RGBColor)> = self.sphere.iter().collect();
        quads.sort_by_key(|(quad, _)| {
            let c = centroid(quad);
            Reverse(coord.projected_depth(&c[0], &c[2], &c[1]))
        });
        quads
    }

    /// Render into a packed RGB buffer of `width × height` pixels
    pub fn render_rgb(&self, width: u32, height: u32, view: ViewAngle) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            self.draw(&root, view)?;
            root.present().map_err(PlotError::render)?;
        }
        Ok(buffer)
    }

    /// Render to an image file; the format follows the extension
    pub fn render_to_file(&self, path: &Path, size: (u32, u32), view: ViewAngle) -> Result<()> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        self.draw(&root, view)?;
        root.present().map_err(PlotError::render)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StateRecord;

    fn history(points: &[(f64, f64, f64)]) -> StateHistory {
        StateHistory::from_records(
            points
                .iter()
                .map(|&(x, y, z)| StateRecord {
                    time: None,
                    x,
                    y,
                    z,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_equal_aspect_uses_largest_span() {
        // x-range 10, y-range 4, z-range 2
        let h = history(&[(0.0, 0.0, 0.0), (10.0, 4.0, 2.0), (2.0, 2.0, 1.0)]);
        let bounds = BoundingBox::equal_aspect(&h.extent());

        assert_eq!(bounds.half_range, 5.0);
        assert_eq!(bounds.center, [4.0, 2.0, 1.0]);
        assert_eq!(bounds.limits(0), -1.0..9.0);
        assert_eq!(bounds.limits(1), -3.0..7.0);
        assert_eq!(bounds.limits(2), -4.0..6.0);
    }

    #[test]
    fn test_equal_aspect_degenerate() {
        let h = history(&[(5.0, 5.0, 5.0)]);
        let bounds = BoundingBox::equal_aspect(&h.extent());
        assert_eq!(bounds.half_range, MIN_HALF_RANGE);
        assert_eq!(bounds.center, [5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_sphere_grid_on_radius() {
        let mesh = SphereMesh::earth();
        assert_eq!(mesh.grid().len(), SPHERE_SAMPLES);
        assert!(mesh.grid().iter().all(|row| row.len() == SPHERE_SAMPLES));

        for row in mesh.grid() {
            for p in row {
                let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
                assert!((r - EARTH_RADIUS_KM).abs() < 1e-6);
            }
        }

        // Poles at colatitude 0 and pi
        assert!((mesh.grid()[0][0][2] - EARTH_RADIUS_KM).abs() < 1e-9);
        assert!((mesh.grid()[0][SPHERE_SAMPLES - 1][2] + EARTH_RADIUS_KM).abs() < 1e-9);
    }

    #[test]
    fn test_stride_keeps_last_line() {
        assert_eq!(stride_indices(10, 4), vec![0, 4, 8, 9]);
        assert_eq!(stride_indices(9, 4), vec![0, 4, 8]);
        assert_eq!(stride_indices(100, 4).len(), 26);
        assert_eq!(SphereMesh::earth().quads(SPHERE_STRIDE).len(), 25 * 25);
    }

    #[test]
    fn test_shade_range() {
        let mesh = SphereMesh::earth();
        for quad in mesh.quads(SPHERE_STRIDE) {
            let s = shade(&quad);
            assert!((0.35..=1.0).contains(&s));
        }
    }

    #[test]
    fn test_view_drag_clamps_pitch() {
        let view = ViewAngle::default().dragged(100.0, 10_000.0);
        assert_eq!(view.pitch, PI / 2.0);
        assert!((view.yaw - (ViewAngle::default().yaw + 1.0)).abs() < 1e-12);
    }

    fn circular_scene() -> OrbitScene {
        OrbitScene::new(&history(&[
            (7000.0, 0.0, 0.0),
            (0.0, 7000.0, 500.0),
            (-7000.0, 0.0, 0.0),
            (0.0, -7000.0, -500.0),
        ]))
    }

    #[test]
    fn test_sphere_order_follows_projection() {
        let scene = circular_scene();
        for view in [
            ViewAngle::default(),
            ViewAngle { yaw: 2.0, pitch: 0.3 },
            ViewAngle { yaw: 2.0, pitch: -0.3 },
            ViewAngle { yaw: 3.0, pitch: 0.45 },
        ] {
            let mut buffer = vec![0u8; 200 * 150 * 3];
            let root = BitMapBackend::with_buffer(&mut buffer, (200, 150)).into_drawing_area();
            let chart = scene.build_chart(&root, view, 10).unwrap();
            let coord = chart.as_coord_spec();
            let depth = |q: &[[f64; 3]; 4]| {
                let c = centroid(q);
                coord.projected_depth(&c[0], &c[2], &c[1])
            };

            let order = scene.sphere_in_draw_order(&chart);
            let first = &order[0].0;
            let last = &order[order.len() - 1].0;
            let centre = coord.projected_depth(&0.0, &0.0, &0.0);

            // Far hemisphere first, near hemisphere last
            assert!(depth(first) > centre, "{:?}", view);
            assert!(depth(last) < centre, "{:?}", view);
            assert!(order.iter().all(|(q, _)| depth(q) >= depth(last)));

            let (a, b) = (centroid(first), centroid(last));
            assert!(a[0] * b[0] + a[1] * b[1] + a[2] * b[2] < 0.0, "{:?}", view);
        }
    }

    #[test]
    fn test_turning_around_swaps_near_side() {
        let scene = circular_scene();
        let nearest = |view: ViewAngle| {
            let mut buffer = vec![0u8; 200 * 150 * 3];
            let root = BitMapBackend::with_buffer(&mut buffer, (200, 150)).into_drawing_area();
            let chart = scene.build_chart(&root, view, 10).unwrap();
            let order = scene.sphere_in_draw_order(&chart);
            centroid(&order[order.len() - 1].0)
        };

        let front = nearest(ViewAngle { yaw: 2.0, pitch: 0.0 });
        let back = nearest(ViewAngle {
            yaw: 2.0 + PI,
            pitch: 0.0,
        });
        assert!(front[0] * back[0] + front[1] * back[1] + front[2] * back[2] < 0.0);
    }

    #[test]
    fn test_scene_render_rgb() {
        let scene = circular_scene();
        assert_eq!(scene.trajectory().len(), 4);
        assert_eq!(scene.sphere_quads(), 625);

        let buffer = scene.render_rgb(320, 240, ViewAngle::default()).unwrap();
        assert_eq!(buffer.len(), 320 * 240 * 3);
        // Some of the sphere is visible
        assert!(buffer
            .chunks(3)
            .any(|px| px[2] as i32 > px[0] as i32 + 40));
    }
}
