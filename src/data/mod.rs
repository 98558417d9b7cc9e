//! Simulator output readers
//!
//! - `metadata.rs`: initial conditions and physical parameters of a run
//! - `state_history.rs`: sampled trajectory positions

pub mod metadata;
pub mod state_history;

pub use metadata::{Metadata, MetadataField, MetadataRow};
pub use state_history::{AxisExtent, Extent, StateHistory, StateRecord};
