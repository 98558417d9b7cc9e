use crate::error::{PlotError, Result};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Columns a state history must provide
const REQUIRED_COLUMNS: [&str; 3] = ["x", "y", "z"];

/// One sampled trajectory point
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct StateRecord {
    /// Epoch [s]; the simulator names this column `t`
    #[serde(default, alias = "t")]
    pub time: Option<f64>,

    /// Position [km]
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Ordered trajectory samples, in file order
#[derive(Debug, Clone, PartialEq)]
pub struct StateHistory {
    records: Vec<StateRecord>,
}

impl StateHistory {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PlotError::io(path, e))?;
        Self::from_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Parse a headered CSV; `origin` names the source in errors
    pub fn from_reader<R: Read>(reader: R, origin: &str) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(PlotError::MissingColumn(column));
            }
        }

        let mut records = Vec::new();
        for result in csv_reader.deserialize() {
            let record: StateRecord = result?;
            records.push(record);
        }

        Self::from_records(records).map_err(|_| PlotError::EmptyStateHistory(origin.to_string()))
    }

    pub fn from_records(records: Vec<StateRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(PlotError::EmptyStateHistory(String::from("<memory>")));
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[StateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.y).collect()
    }

    pub fn zs(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.z).collect()
    }

    /// Positions as (x, y, z) tuples
    pub fn points(&self) -> Vec<(f64, f64, f64)> {
        self.records.iter().map(|r| (r.x, r.y, r.z)).collect()
    }

    /// Time span covered by the samples, if the file has a time column
    pub fn time_span(&self) -> Option<(f64, f64)> {
        let first = self.records.first()?.time?;
        let last = self.records.last()?.time?;
        Some((first, last))
    }

    pub fn extent(&self) -> Extent {
        Extent {
            x: AxisExtent::of(self.records.iter().map(|r| r.x)),
            y: AxisExtent::of(self.records.iter().map(|r| r.y)),
            z: AxisExtent::of(self.records.iter().map(|r| r.z)),
        }
    }
}

/// Min, max and mean of one coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisExtent {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl AxisExtent {
    pub fn of(values: impl Iterator<Item = f64>) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;

        for v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
        }

        if count == 0 {
            return Self {
                min: 0.0,
                max: 0.0,
                mean: 0.0,
            };
        }

        Self {
            min,
            max,
            mean: sum / count as f64,
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Per-axis extents of a trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x: AxisExtent,
    pub y: AxisExtent,
    pub z: AxisExtent,
}

impl std::fmt::Display for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Extent {{ x: [{:.3e}, {:.3e}], y: [{:.3e}, {:.3e}], z: [{:.3e}, {:.3e}] }}",
            self.x.min, self.x.max, self.y.min, self.y.max, self.z.min, self.z.max
        )
    }
}
