//! Sample data generator
//!
//! Writes a metadata file, a state history and a plot config for a circular
//! orbit, so `scarab_plot` can be tried without running the simulator.
//!
//! Usage:
//! ```bash
//! cargo run --bin sample_orbit -- --output-dir sample
//! cargo run --bin scarab_plot -- sample/config.json
//! ```

use anyhow::Context;
use clap::Parser;
use scarab_plot::profile::Stopwatch;
use scarab_plot::sample::{config_text, write_state_history, SampleOrbit};
use scarab_plot::PlotConfig;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sample_orbit", about = "Write sample Scarab simulator output")]
struct Args {
    /// Directory receiving metadata.csv, state_history.csv and config.json
    #[arg(short, long, default_value = "sample")]
    output_dir: PathBuf,

    /// Orbit radius [km]
    #[arg(long, default_value_t = 7000.0)]
    radius: f64,

    /// Inclination [deg]
    #[arg(long, default_value_t = 51.6)]
    inclination: f64,

    /// Integration step [s]
    #[arg(long, default_value_t = 10.0)]
    step: f64,

    /// Resolution written into the config
    #[arg(long, default_value_t = 300.0)]
    dpi: f64,

    /// Set show_3D_figure in the config
    #[arg(long)]
    show_3d: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let mut watch = Stopwatch::started("sample_orbit START");

    println!("=== Sample orbit ===\n");
    println!("Configuration:");
    println!("  Output directory: {}", args.output_dir.display());
    println!("  Radius: {} km", args.radius);
    println!("  Inclination: {} deg", args.inclination);
    println!("  Step: {} s", args.step);
    println!();

    let mut orbit = SampleOrbit::circular(args.radius, args.inclination);
    orbit.step = args.step;

    let states = orbit.propagate().context("propagating sample orbit")?;
    println!("✓ Propagated {} samples over {:.1} s", states.len(), orbit.end_time);
    watch.lap("Propagation");

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;

    let metadata_path = args.output_dir.join("metadata.csv");
    let mut metadata_file = BufWriter::new(
        File::create(&metadata_path)
            .with_context(|| format!("creating {}", metadata_path.display()))?,
    );
    orbit
        .write_metadata(&mut metadata_file)
        .and_then(|_| metadata_file.flush())
        .with_context(|| format!("writing {}", metadata_path.display()))?;
    info!("Wrote {}", metadata_path.display());

    let history_path = args.output_dir.join("state_history.csv");
    let history_file = File::create(&history_path)
        .with_context(|| format!("creating {}", history_path.display()))?;
    write_state_history(BufWriter::new(history_file), &states)
        .with_context(|| format!("writing {}", history_path.display()))?;
    info!("Wrote {}", history_path.display());

    let config = PlotConfig {
        metadata: metadata_path,
        state_history: history_path,
        figure: args.output_dir.join("orbit.png"),
        figure_dpi: args.dpi,
        show_3d_figure: args.show_3d,
    };
    config.validate()?;

    let config_path = args.output_dir.join("config.json");
    fs::write(&config_path, config_text(&config))
        .with_context(|| format!("writing {}", config_path.display()))?;
    info!("Wrote {}", config_path.display());
    watch.lap("Files written");

    println!("✓ Sample written, plot it with:");
    println!("  scarab_plot {}", config_path.display());
    Ok(())
}
