//! End-to-end runs of the plot pipeline against files on disk

use scarab_plot::display::{NoopDisplay, SceneDisplay, SnapshotDisplay};
use scarab_plot::figure::OrbitScene;
use scarab_plot::sample::{config_text, write_state_history, SampleOrbit};
use scarab_plot::{pipeline, PlotConfig, PlotError};
use std::fs;
use std::path::Path;

/// Display that only records what it was given
#[derive(Default)]
struct RecordingDisplay {
    shown: Vec<usize>,
}

impl SceneDisplay for RecordingDisplay {
    fn show(&mut self, scene: &OrbitScene) -> scarab_plot::Result<()> {
        self.shown.push(scene.trajectory().len());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

const METADATA_9_ROWS: &str = "\
gravitational_parameter,398600.4418,km^3 s^-2
initial_x,7000,km
initial_y,0,km
initial_z,0,km
initial_vx,0,km s^-1
initial_vy,7.546,km s^-1
initial_vz,0,km s^-1
start_time,0,s
end_time,100,s
";

const STATE_HISTORY: &str = "\
x,y,z,time
7000,0,0,0
6999.6,75.46,0,10
6998.4,150.9,0,20
6996.4,226.3,10,30
";

fn write_inputs(dir: &Path, metadata: &str, dpi: f64, show_3d: bool) -> PlotConfig {
    let config = PlotConfig {
        metadata: dir.join("metadata.csv"),
        state_history: dir.join("state_history.csv"),
        figure: dir.join("out.png"),
        figure_dpi: dpi,
        show_3d_figure: show_3d,
    };
    fs::write(&config.metadata, metadata).unwrap();
    fs::write(&config.state_history, STATE_HISTORY).unwrap();
    config
}

#[test]
fn test_projection_figure_written() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_inputs(dir.path(), METADATA_9_ROWS, 150.0, false);

    let summary = pipeline::run(&config, &mut NoopDisplay).unwrap();

    let written = fs::metadata(dir.path().join("out.png")).unwrap();
    assert!(written.len() > 0);
    assert_eq!(summary.figure_bytes, written.len());
    assert_eq!(summary.figure_pixels, (960, 720));
    assert_eq!(summary.samples, 4);
    assert!(!summary.scene_shown);
}

#[test]
fn test_disabled_3d_view_never_reaches_display() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_inputs(dir.path(), METADATA_9_ROWS, 72.0, false);

    let mut display = RecordingDisplay::default();
    pipeline::run(&config, &mut display).unwrap();

    assert!(display.shown.is_empty());
}

#[test]
fn test_enabled_3d_view_shown_after_figure() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_inputs(dir.path(), METADATA_9_ROWS, 72.0, true);

    let mut display = RecordingDisplay::default();
    let summary = pipeline::run(&config, &mut display).unwrap();

    assert_eq!(display.shown, vec![4]);
    assert!(summary.scene_shown);
    assert!(config.figure.exists());
}

#[test]
fn test_snapshot_display_writes_3d_image() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_inputs(dir.path(), METADATA_9_ROWS, 72.0, true);

    let snapshot = dir.path().join("orbit3d.png");
    let mut display = SnapshotDisplay::new(&snapshot);
    display.size = (320, 240);
    pipeline::run(&config, &mut display).unwrap();

    assert!(fs::metadata(&snapshot).unwrap().len() > 0);
}

#[test]
fn test_short_metadata_fails_without_figure() {
    let dir = tempfile::tempdir().unwrap();
    let eight_rows: String = METADATA_9_ROWS.lines().take(8).map(|l| format!("{l}\n")).collect();
    let config = write_inputs(dir.path(), &eight_rows, 72.0, true);

    let mut display = RecordingDisplay::default();
    let err = pipeline::run(&config, &mut display).unwrap_err();

    assert!(matches!(
        err,
        PlotError::MissingMetadataField { field: "end_time" }
    ));
    assert!(!config.figure.exists());
    assert!(display.shown.is_empty());
}

#[test]
fn test_missing_state_history_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_inputs(dir.path(), METADATA_9_ROWS, 72.0, false);
    fs::remove_file(&config.state_history).unwrap();

    let err = pipeline::run(&config, &mut NoopDisplay).unwrap_err();
    assert!(matches!(err, PlotError::Io { .. }));
    assert!(!config.figure.exists());
}

#[test]
fn test_config_with_comments_drives_run() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), METADATA_9_ROWS, 72.0, false);

    let config_path = dir.path().join("config.json");
    let text = format!(
        r#"{{
    // simulator output
    "metadata": "{}",
    "state_history": "{}",
    /* figure */
    "figure": "{}",
    "figure_dpi": 100,
    "show_3D_figure": false
}}"#,
        dir.path().join("metadata.csv").display(),
        dir.path().join("state_history.csv").display(),
        dir.path().join("out.png").display(),
    );
    fs::write(&config_path, text).unwrap();

    let config = PlotConfig::from_path(&config_path).unwrap();
    assert_eq!(config.figure_dpi, 100.0);

    let summary = pipeline::run(&config, &mut NoopDisplay).unwrap();
    assert_eq!(summary.figure_pixels, (640, 480));
}

#[test]
fn test_sample_generator_output_plots() {
    let dir = tempfile::tempdir().unwrap();
    let orbit = SampleOrbit::circular(7000.0, 51.6);
    let states = orbit.propagate().unwrap();

    let config = PlotConfig {
        metadata: dir.path().join("metadata.csv"),
        state_history: dir.path().join("state_history.csv"),
        figure: dir.path().join("orbit.png"),
        figure_dpi: 72.0,
        show_3d_figure: true,
    };

    let mut metadata = Vec::new();
    orbit.write_metadata(&mut metadata).unwrap();
    fs::write(&config.metadata, metadata).unwrap();
    let history = fs::File::create(&config.state_history).unwrap();
    write_state_history(history, &states).unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, config_text(&config)).unwrap();

    let loaded = PlotConfig::from_path(&config_path).unwrap();
    let mut display = RecordingDisplay::default();
    let summary = pipeline::run(&loaded, &mut display).unwrap();

    assert_eq!(summary.samples, states.len());
    assert_eq!(display.shown, vec![states.len()]);
}
