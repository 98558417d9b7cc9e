//! Interactive 3D orbit window
//!
//! The scene is rendered with `plotters` into an RGB buffer and shown as an
//! `egui` texture. Dragging with the mouse changes yaw and pitch and triggers a
//! re-render. `show` returns once the window is closed.

use super::SceneDisplay;
use crate::error::{PlotError, Result};
use crate::figure::{OrbitScene, ViewAngle};
use tracing::{info, warn};

/// Smallest texture side rendered, in pixels
const MIN_SIDE: f32 = 64.0;

#[derive(Debug, Clone)]
pub struct WindowDisplay {
    pub title: String,
    pub size: [f32; 2],
}

impl Default for WindowDisplay {
    fn default() -> Self {
        Self {
            title: "Scarab - 3D orbit".to_string(),
            size: [900.0, 700.0],
        }
    }
}

impl SceneDisplay for WindowDisplay {
    fn show(&mut self, scene: &OrbitScene) -> Result<()> {
        info!("Opening 3D view, close the window to continue");

        let native_options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(self.size)
                .with_min_inner_size([320.0, 240.0])
                .with_title(&self.title),
            ..Default::default()
        };

        let viewer = OrbitViewer::new(scene.clone());
        eframe::run_native(
            &self.title,
            native_options,
            Box::new(move |_cc| Ok(Box::new(viewer))),
        )
        .map_err(|e| PlotError::Display(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "window"
    }
}

struct OrbitViewer {
    scene: OrbitScene,
    view: ViewAngle,
    texture: Option<egui::TextureHandle>,
    /// View and size the current texture was rendered for
    rendered: Option<(ViewAngle, [usize; 2])>,
    error: Option<String>,
}

impl OrbitViewer {
    fn new(scene: OrbitScene) -> Self {
        Self {
            scene,
            view: ViewAngle::default(),
            texture: None,
            rendered: None,
            error: None,
        }
    }

    fn refresh(&mut self, ctx: &egui::Context, size: [usize; 2]) {
        match self
            .scene
            .render_rgb(size[0] as u32, size[1] as u32, self.view)
        {
            Ok(rgb) => {
                let image = egui::ColorImage::from_rgb(size, &rgb);
                self.texture =
                    Some(ctx.load_texture("orbit_scene", image, egui::TextureOptions::LINEAR));
                self.error = None;
            }
            Err(e) => {
                warn!("3D render failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
        self.rendered = Some((self.view, size));
    }
}

impl eframe::App for OrbitViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::bottom("view_info").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Drag to rotate");
                ui.separator();
                ui.label(format!("yaw {:.2} rad", self.view.yaw));
                ui.label(format!("pitch {:.2} rad", self.view.pitch));
                if ui.button("Reset view").clicked() {
                    self.view = ViewAngle::default();
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let size = [
                available.x.max(MIN_SIDE) as usize,
                available.y.max(MIN_SIDE) as usize,
            ];

            if self.rendered != Some((self.view, size)) {
                self.refresh(ctx, size);
            }

            if let Some(error) = &self.error {
                ui.colored_label(egui::Color32::RED, error);
                return;
            }

            if let Some(texture) = &self.texture {
                let response = ui.add(egui::Image::new(texture).sense(egui::Sense::drag()));
                let delta = response.drag_delta();
                if delta != egui::Vec2::ZERO {
                    self.view = self.view.dragged(delta.x as f64, delta.y as f64);
                    ctx.request_repaint();
                }
            }
        });
    }
}
