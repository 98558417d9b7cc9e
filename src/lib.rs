//! Scarab plot library
//!
//! Reads the metadata and state history written by the Scarab simulator and
//! renders a 2D projection figure plus an optional interactive 3D orbit view.
//! Used by the `scarab_plot` and `sample_orbit` binaries and the integration tests.

pub mod config;
pub mod data;
pub mod display;
pub mod error;
pub mod figure;
pub mod pipeline;
pub mod profile;
pub mod sample;

pub use config::PlotConfig;
pub use error::{PlotError, Result};
pub use pipeline::{run, RunSummary};
