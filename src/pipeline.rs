//! Plot generation pipeline
//!
//! The pipeline:
//! 1. Reads the metadata and state history named in the config
//! 2. Renders the 2D projection figure to disk
//! 3. Builds the 3D orbit scene and hands it to the display (if enabled)
//!
//! A failure in any step ends the run; in particular the 3D view is only
//! shown after the 2D figure has been written.

use crate::config::PlotConfig;
use crate::data::{Metadata, StateHistory};
use crate::display::SceneDisplay;
use crate::error::{PlotError, Result};
use crate::figure::{render_projections, OrbitScene};
use crate::profile::Stopwatch;
use std::path::PathBuf;
use tracing::debug;

/// What a pipeline run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Path of the projection figure
    pub figure: PathBuf,
    /// Size of the written figure file in bytes
    pub figure_bytes: u64,
    /// Raster size of the figure
    pub figure_pixels: (u32, u32),
    /// Number of trajectory samples plotted
    pub samples: usize,
    /// Whether the 3D scene was handed to the display
    pub scene_shown: bool,
}

/// Run the whole pipeline for one config
pub fn run(config: &PlotConfig, display: &mut dyn SceneDisplay) -> Result<RunSummary> {
    let mut watch = Stopwatch::started("pipeline START");

    println!("[1/3] Reading input data files...");
    let metadata = Metadata::from_path(&config.metadata)?;
    let history = StateHistory::from_path(&config.state_history)?;
    println!(
        "  Metadata: {} fields from {}",
        metadata.table_rows().len(),
        config.metadata.display()
    );
    println!(
        "  State history: {} samples from {}",
        history.len(),
        config.state_history.display()
    );
    if let Some((start, end)) = history.time_span() {
        println!("  Time span: {} s to {} s", start, end);
    }
    debug!("{}", history.extent());
    println!("✓ Input data files read");
    watch.lap("Input data read");

    println!("\n[2/3] Generating projection figure...");
    let size = render_projections(&history, &metadata, &config.figure, config.figure_dpi)?;
    let figure_bytes = std::fs::metadata(&config.figure)
        .map_err(|e| PlotError::io(&config.figure, e))?
        .len();
    let figure_pixels = size.pixels();
    println!(
        "✓ Figure written to {} ({} bytes, {}×{} px at {} dpi)",
        config.figure.display(),
        figure_bytes,
        figure_pixels.0,
        figure_pixels.1,
        config.figure_dpi
    );
    watch.lap("Projection figure written");

    println!("\n[3/3] 3D orbit view...");
    let scene_shown = if config.show_3d_figure {
        let scene = OrbitScene::new(&history);
        let bounds = scene.bounds();
        debug!(
            "Equal-aspect box: centre ({:.3e}, {:.3e}, {:.3e}) km, half-range {:.3e} km",
            bounds.center[0], bounds.center[1], bounds.center[2], bounds.half_range
        );
        println!("  Display: {}", display.name());
        display.show(&scene)?;
        println!("✓ 3D view closed");
        true
    } else {
        println!("  Disabled in configuration");
        false
    };
    watch.lap("3D view done");

    Ok(RunSummary {
        figure: config.figure.clone(),
        figure_bytes,
        figure_pixels,
        samples: history.len(),
        scene_shown,
    })
}
