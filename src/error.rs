use thiserror::Error;

/// Errors that can occur while loading inputs or rendering figures
#[derive(Debug, Error)]
pub enum PlotError {
    /// Filesystem error, with the path that failed
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON (after comment stripping)
    #[error("Failed to parse config '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Config parsed but holds an unusable value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// CSV reader or row deserialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required metadata field has no row
    #[error("Metadata field '{field}' is missing")]
    MissingMetadataField { field: &'static str },

    /// A metadata value does not parse as a number
    #[error("Metadata field '{field}' has non-numeric value '{value}'")]
    InvalidMetadataValue { field: &'static str, value: String },

    /// State history header lacks a required column
    #[error("State history is missing column '{0}'")]
    MissingColumn(&'static str),

    /// State history has a header but no samples
    #[error("State history '{0}' contains no samples")]
    EmptyStateHistory(String),

    /// Drawing backend error
    #[error("Render error: {0}")]
    Render(String),

    /// Interactive display could not be opened
    #[error("Display error: {0}")]
    Display(String),
}

impl PlotError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        PlotError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Wrap any drawing backend error
    pub fn render(err: impl std::fmt::Display) -> Self {
        PlotError::Render(err.to_string())
    }
}

/// Type alias for Results using PlotError
pub type Result<T> = std::result::Result<T, PlotError>;
