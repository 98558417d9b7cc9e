//! Presentation of the 3D orbit scene
//!
//! The pipeline never opens a window itself; it hands the finished scene to a
//! [`SceneDisplay`]. Implementations:
//! - `NoopDisplay`: logs and returns (tests, headless runs, `--no-window`)
//! - `SnapshotDisplay`: writes one still image of the scene (`--snapshot`)
//! - `WindowDisplay`: interactive `eframe` window, blocks until closed
//!   (feature `viewer`)

use crate::error::Result;
use crate::figure::{OrbitScene, ViewAngle};
use std::path::PathBuf;
use tracing::info;

#[cfg(feature = "viewer")]
mod window;

#[cfg(feature = "viewer")]
pub use window::WindowDisplay;

/// Something that can present a 3D orbit scene
pub trait SceneDisplay {
    /// Present the scene; may block until the user is done with it
    fn show(&mut self, scene: &OrbitScene) -> Result<()>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Display that shows nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDisplay;

impl SceneDisplay for NoopDisplay {
    fn show(&mut self, scene: &OrbitScene) -> Result<()> {
        info!(
            "3D view skipped ({} trajectory points, half-range {:.3e} km)",
            scene.trajectory().len(),
            scene.bounds().half_range
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Display that renders the scene to an image file at the default view
#[derive(Debug, Clone)]
pub struct SnapshotDisplay {
    pub path: PathBuf,
    pub size: (u32, u32),
}

impl SnapshotDisplay {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size: (960, 720),
        }
    }
}

impl SceneDisplay for SnapshotDisplay {
    fn show(&mut self, scene: &OrbitScene) -> Result<()> {
        scene.render_to_file(&self.path, self.size, ViewAngle::default())?;
        info!("3D view written to {}", self.path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "snapshot"
    }
}

/// Interactive display when requested
#[cfg(feature = "viewer")]
pub fn default_display(interactive: bool) -> Box<dyn SceneDisplay> {
    if interactive {
        Box::new(WindowDisplay::default())
    } else {
        Box::new(NoopDisplay)
    }
}

/// Built without the viewer: always the no-op display
#[cfg(not(feature = "viewer"))]
pub fn default_display(interactive: bool) -> Box<dyn SceneDisplay> {
    if interactive {
        tracing::warn!("Built without the 'viewer' feature, 3D window disabled");
    }
    Box::new(NoopDisplay)
}
