//! Simulation metadata reader
//!
//! The simulator writes one row per field, `name, value, unit`, each cell
//! left-aligned and padded to 25 characters:
//!
//! ```text
//! gravitational_parameter  ,398600.4418              ,km^3 s^-2
//! initial_x                ,6778.137                 ,km
//! ```
//!
//! When column 0 carries these names the rows are matched by name, in any
//! order. Files without names fall back to the row order of [`MetadataField::ALL`].

use crate::error::{PlotError, Result};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One metadata field of a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    GravitationalParameter,
    InitialX,
    InitialY,
    InitialZ,
    InitialVx,
    InitialVy,
    InitialVz,
    StartTime,
    EndTime,
    InitialStep,
}

impl MetadataField {
    /// All fields in file row order
    pub const ALL: [MetadataField; 10] = [
        MetadataField::GravitationalParameter,
        MetadataField::InitialX,
        MetadataField::InitialY,
        MetadataField::InitialZ,
        MetadataField::InitialVx,
        MetadataField::InitialVy,
        MetadataField::InitialVz,
        MetadataField::StartTime,
        MetadataField::EndTime,
        MetadataField::InitialStep,
    ];

    /// Number of fields every metadata file must provide
    pub const REQUIRED: usize = 9;

    /// Name written by the simulator in column 0
    pub fn key(self) -> &'static str {
        match self {
            Self::GravitationalParameter => "gravitational_parameter",
            Self::InitialX => "initial_x",
            Self::InitialY => "initial_y",
            Self::InitialZ => "initial_z",
            Self::InitialVx => "initial_vx",
            Self::InitialVy => "initial_vy",
            Self::InitialVz => "initial_vz",
            Self::StartTime => "start_time",
            Self::EndTime => "end_time",
            Self::InitialStep => "initial_step",
        }
    }

    /// Symbol shown in the figure table
    pub fn label(self) -> &'static str {
        match self {
            Self::GravitationalParameter => "μ",
            Self::InitialX => "x₀",
            Self::InitialY => "y₀",
            Self::InitialZ => "z₀",
            Self::InitialVx => "Vx₀",
            Self::InitialVy => "Vy₀",
            Self::InitialVz => "Vz₀",
            Self::StartTime => "t₀",
            Self::EndTime => "t_f",
            Self::InitialStep => "Δt₀",
        }
    }

    /// Physical unit shown in the figure table
    pub fn unit(self) -> &'static str {
        match self {
            Self::GravitationalParameter => "km³ s⁻²",
            Self::InitialX | Self::InitialY | Self::InitialZ => "km",
            Self::InitialVx | Self::InitialVy | Self::InitialVz => "km s⁻¹",
            Self::StartTime | Self::EndTime | Self::InitialStep => "s",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn is_required(self) -> bool {
        self.position() < Self::REQUIRED
    }
}

/// Initial conditions and parameters of a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    /// Gravitational parameter of the central body [km^3 s^-2]
    pub gravitational_parameter: f64,
    /// Initial position [km]
    pub initial_position: [f64; 3],
    /// Initial velocity [km/s]
    pub initial_velocity: [f64; 3],
    /// Start epoch [s]
    pub start_time: f64,
    /// End epoch [s]
    pub end_time: f64,
    /// Initial integrator step [s], absent in older files
    pub initial_step: Option<f64>,
}

/// A row of the rendered metadata table
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRow {
    pub label: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

struct RawRow {
    key: String,
    value: Option<String>,
}

impl Metadata {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PlotError::io(path, e))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a headerless `name, value[, unit]` table
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(RawRow {
                key: record.get(0).unwrap_or_default().to_string(),
                value: record.get(1).map(|v| v.to_string()),
            });
        }

        let by_name = rows.iter().any(|r| MetadataField::from_key(&r.key).is_some());

        let mut values = [None; 10];
        for field in MetadataField::ALL {
            let row = if by_name {
                rows.iter().find(|r| r.key == field.key())
            } else {
                rows.get(field.position())
            };

            let raw = match row.and_then(|r| r.value.as_deref()) {
                Some(raw) if !raw.is_empty() => raw,
                _ if field.is_required() => {
                    return Err(PlotError::MissingMetadataField { field: field.key() })
                }
                _ => continue,
            };

            let value = raw
                .parse::<f64>()
                .map_err(|_| PlotError::InvalidMetadataValue {
                    field: field.key(),
                    value: raw.to_string(),
                })?;
            values[field.position()] = Some(value);
        }

        let get = |field: MetadataField| {
            values[field.position()].ok_or(PlotError::MissingMetadataField { field: field.key() })
        };

        Ok(Metadata {
            gravitational_parameter: get(MetadataField::GravitationalParameter)?,
            initial_position: [
                get(MetadataField::InitialX)?,
                get(MetadataField::InitialY)?,
                get(MetadataField::InitialZ)?,
            ],
            initial_velocity: [
                get(MetadataField::InitialVx)?,
                get(MetadataField::InitialVy)?,
                get(MetadataField::InitialVz)?,
            ],
            start_time: get(MetadataField::StartTime)?,
            end_time: get(MetadataField::EndTime)?,
            initial_step: values[MetadataField::InitialStep.position()],
        })
    }

    pub fn value(&self, field: MetadataField) -> Option<f64> {
        match field {
            MetadataField::GravitationalParameter => Some(self.gravitational_parameter),
            MetadataField::InitialX => Some(self.initial_position[0]),
            MetadataField::InitialY => Some(self.initial_position[1]),
            MetadataField::InitialZ => Some(self.initial_position[2]),
            MetadataField::InitialVx => Some(self.initial_velocity[0]),
            MetadataField::InitialVy => Some(self.initial_velocity[1]),
            MetadataField::InitialVz => Some(self.initial_velocity[2]),
            MetadataField::StartTime => Some(self.start_time),
            MetadataField::EndTime => Some(self.end_time),
            MetadataField::InitialStep => self.initial_step,
        }
    }

    /// Label / value / unit rows in display order, skipping absent fields
    pub fn table_rows(&self) -> Vec<MetadataRow> {
        MetadataField::ALL
            .iter()
            .filter_map(|&field| {
                self.value(field).map(|value| MetadataRow {
                    label: field.label(),
                    value,
                    unit: field.unit(),
                })
            })
            .collect()
    }
}
