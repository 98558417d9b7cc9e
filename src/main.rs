//! Scarab plot - main entry point
//!
//! Reads a JSON config (comments allowed) naming the simulator's metadata and
//! state history files, writes the 2D projection figure and optionally opens
//! the interactive 3D orbit view.
//!
//! Usage:
//! ```bash
//! scarab_plot config/plot.json
//! scarab_plot --no-window -v config/plot.json
//! scarab_plot --snapshot orbit3d.png config/plot.json
//! ```

use anyhow::Context;
use clap::Parser;
use scarab_plot::config::{echo, raw_from_path};
use scarab_plot::display::{default_display, NoopDisplay, SceneDisplay, SnapshotDisplay};
use scarab_plot::profile::{format_seconds, Stopwatch};
use scarab_plot::{pipeline, PlotConfig, RunSummary};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "jemalloc")]
use tikv_jemallocator::Jemalloc;

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

const RULE: &str = "------------------------------------------------------------------";
const STARS: &str = "******************************************************************";

#[derive(Parser, Debug)]
#[command(name = "scarab_plot", version, about = "Plot a Scarab simulation run")]
struct Args {
    /// JSON config file (comments allowed)
    config: PathBuf,

    /// Never open the interactive 3D window
    #[arg(long)]
    no_window: bool,

    /// Write the 3D view to this image file instead of opening a window
    /// (only when the config enables show_3D_figure)
    #[arg(long, value_name = "PATH", conflicts_with = "no_window")]
    snapshot: Option<PathBuf>,

    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    // Usage errors exit here, before any file is touched
    let args = Args::parse();
    init_logging(args.verbose);

    print_banner();
    let stopwatch = Stopwatch::start();

    match run(&args) {
        Ok(summary) => {
            println!("Figures generated successfully!");
            println!("  {} samples plotted", summary.samples);
            println!();
            println!(
                "Script time: {}s",
                format_seconds(stopwatch.elapsed().as_secs_f64())
            );
            println!();
            println!("{}", RULE);
            println!("                         Exited successfully!                     ");
            println!("{}", RULE);
            println!();
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("\n✗ Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<RunSummary> {
    print_section("Input parameters");
    let origin = args.config.display().to_string();
    let raw = raw_from_path(&args.config).with_context(|| format!("loading config {}", origin))?;
    println!("{}", echo(&raw));
    let config =
        PlotConfig::from_value(raw, &origin).with_context(|| format!("loading config {}", origin))?;

    print_section("Operations");
    let mut display = choose_display(args, &config);
    let summary = pipeline::run(&config, display.as_mut()).context("plot pipeline failed")?;
    println!();
    Ok(summary)
}

fn choose_display(args: &Args, config: &PlotConfig) -> Box<dyn SceneDisplay> {
    match (&args.snapshot, args.no_window) {
        (Some(path), _) if !config.show_3d_figure => {
            warn!(
                "show_3D_figure is false in the config, no snapshot written to {}",
                path.display()
            );
            Box::new(NoopDisplay)
        }
        (Some(path), _) => Box::new(SnapshotDisplay::new(path)),
        (None, true) => Box::new(NoopDisplay),
        (None, false) => default_display(config.show_3d_figure),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_banner() {
    println!();
    println!("{}", RULE);
    println!("                             Scarab                               ");
    println!("        Simulator for close-range removal of Ariane bodies        ");
    println!(
        "                              {:<36}",
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", RULE);
    println!();
}

fn print_section(title: &str) {
    println!();
    println!("{}", STARS);
    println!("{:^66}", title);
    println!("{}", STARS);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_config_argument_rejected() {
        assert!(Args::try_parse_from(["scarab_plot"]).is_err());
    }

    #[test]
    fn test_two_config_arguments_rejected() {
        assert!(Args::try_parse_from(["scarab_plot", "a.json", "b.json"]).is_err());
    }

    #[test]
    fn test_single_config_argument() {
        let args = Args::try_parse_from(["scarab_plot", "a.json"]).unwrap();
        assert_eq!(args.config, PathBuf::from("a.json"));
        assert!(!args.no_window);
        assert!(args.snapshot.is_none());
    }

    fn config(show_3d: bool) -> PlotConfig {
        PlotConfig {
            metadata: PathBuf::from("m.csv"),
            state_history: PathBuf::from("s.csv"),
            figure: PathBuf::from("f.png"),
            figure_dpi: 100.0,
            show_3d_figure: show_3d,
        }
    }

    #[test]
    fn test_snapshot_needs_3d_enabled() {
        let args = Args::try_parse_from(["scarab_plot", "--snapshot", "o.png", "a.json"]).unwrap();
        assert_eq!(choose_display(&args, &config(true)).name(), "snapshot");
        assert_eq!(choose_display(&args, &config(false)).name(), "none");
    }

    #[test]
    fn test_no_window_display() {
        let args = Args::try_parse_from(["scarab_plot", "--no-window", "a.json"]).unwrap();
        assert_eq!(choose_display(&args, &config(true)).name(), "none");
    }

    #[test]
    fn test_snapshot_conflicts_with_no_window() {
        let both = ["scarab_plot", "--no-window", "--snapshot", "o.png", "a.json"];
        assert!(Args::try_parse_from(both).is_err());

        let args = Args::try_parse_from(["scarab_plot", "--snapshot", "o.png", "a.json"]).unwrap();
        assert_eq!(args.snapshot, Some(PathBuf::from("o.png")));
    }
}
