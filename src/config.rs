//! Plot configuration from a JSON config file
//!
//! The config file is plain JSON that may carry `//` and `/* */` comments, the
//! same file format the simulator reads its own settings from. Comments are
//! stripped with `json_comments` before `serde_json` sees the text.
//!
//! Example:
//! ```json
//! {
//!     // Simulator output
//!     "metadata"       : "metadata.csv",
//!     "state_history"  : "state_history.csv",
//!
//!     // Figure output
//!     "figure"         : "orbit.png",
//!     "figure_dpi"     : 300,
//!     "show_3D_figure" : false
//! }
//! ```

use crate::error::{PlotError, Result};
use json_comments::StripComments;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlotConfig {
    /// Simulation metadata file (headerless CSV: name, value, unit)
    pub metadata: PathBuf,

    /// State history file (CSV with header, at least x, y, z)
    pub state_history: PathBuf,

    /// Output path of the 2D projection figure
    pub figure: PathBuf,

    /// Resolution of the 2D figure in dots per inch
    pub figure_dpi: f64,

    /// Open the interactive 3D orbit view after writing the figure
    #[serde(rename = "show_3D_figure")]
    pub show_3d_figure: bool,
}

impl PlotConfig {
    /// Load and validate a config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::from_value(raw_from_path(path)?, &path.display().to_string())
    }

    /// Parse a config from any reader; `origin` names the source in errors
    pub fn from_reader<R: Read>(reader: R, origin: &str) -> Result<Self> {
        Self::from_value(raw_from_reader(reader, origin)?, origin)
    }

    /// Typed config from already parsed JSON
    pub fn from_value(raw: Value, origin: &str) -> Result<Self> {
        let config: PlotConfig =
            serde_json::from_value(raw).map_err(|source| PlotError::ConfigParse {
                path: origin.to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot produce a figure
    pub fn validate(&self) -> Result<()> {
        if !(self.figure_dpi.is_finite() && self.figure_dpi > 0.0) {
            return Err(PlotError::InvalidConfig(format!(
                "figure_dpi must be a positive number, got {}",
                self.figure_dpi
            )));
        }

        for (key, path) in [
            ("metadata", &self.metadata),
            ("state_history", &self.state_history),
            ("figure", &self.figure),
        ] {
            if path.as_os_str().is_empty() {
                return Err(PlotError::InvalidConfig(format!("'{}' must not be empty", key)));
            }
        }

        Ok(())
    }

}

/// Config file as untyped JSON, comments stripped
pub fn raw_from_path(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PlotError::io(path, e))?;
    raw_from_reader(BufReader::new(file), &path.display().to_string())
}

pub fn raw_from_reader<R: Read>(reader: R, origin: &str) -> Result<Value> {
    serde_json::from_reader(StripComments::new(reader)).map_err(|source| PlotError::ConfigParse {
        path: origin.to_string(),
        source,
    })
}

/// Pretty echo of the config with numbers as written in the file
pub fn echo(raw: &Value) -> String {
    serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<PlotConfig> {
        PlotConfig::from_reader(text.as_bytes(), "test.json")
    }

    #[test]
    fn test_parse_plain_json() {
        let config = parse(
            r#"{"metadata":"m.csv","state_history":"s.csv","figure":"out.png","figure_dpi":150,"show_3D_figure":false}"#,
        )
        .unwrap();

        assert_eq!(config.metadata, PathBuf::from("m.csv"));
        assert_eq!(config.state_history, PathBuf::from("s.csv"));
        assert_eq!(config.figure, PathBuf::from("out.png"));
        assert_eq!(config.figure_dpi, 150.0);
        assert!(!config.show_3d_figure);
    }

    #[test]
    fn test_parse_with_comments() {
        let config = parse(
            r#"
            // Scarab plot settings
            {
                "metadata"       : "metadata.csv",   // simulator output
                "state_history"  : "state_history.csv",
                /* figure output */
                "figure"         : "orbit.png",
                "figure_dpi"     : 300,
                "show_3D_figure" : true
            }
            "#,
        )
        .unwrap();

        assert_eq!(config.figure_dpi, 300.0);
        assert!(config.show_3d_figure);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = parse(
            r#"{"metadata":"m.csv","state_history":"s.csv","figure":"f.png","figure_dpi":72,"show_3D_figure":false,"integrator":"rk4"}"#,
        );
        assert!(config.is_ok());
    }

    #[test]
    fn test_missing_key_is_named() {
        let err = parse(r#"{"metadata":"m.csv","figure":"f.png","figure_dpi":72,"show_3D_figure":false}"#)
            .unwrap_err();
        assert!(matches!(err, PlotError::ConfigParse { .. }));
        assert!(err.to_string().contains("state_history"));
    }

    #[test]
    fn test_invalid_dpi_rejected() {
        let err = parse(
            r#"{"metadata":"m.csv","state_history":"s.csv","figure":"f.png","figure_dpi":0,"show_3D_figure":false}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PlotError::InvalidConfig(_)));
    }

    #[test]
    fn test_empty_path_rejected() {
        let err = parse(
            r#"{"metadata":"","state_history":"s.csv","figure":"f.png","figure_dpi":100,"show_3D_figure":false}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("metadata"));
    }

    #[test]
    fn test_not_json() {
        let err = parse("metadata = m.csv").unwrap_err();
        assert!(matches!(err, PlotError::ConfigParse { .. }));
    }

    #[test]
    fn test_echo_keeps_values_as_written() {
        let text = r#"{
            // dpi as an integer
            "show_3D_figure": true, "figure_dpi": 150,
            "metadata": "m.csv", "state_history": "s.csv", "figure": "f.png"
        }"#;
        let raw = raw_from_reader(text.as_bytes(), "test.json").unwrap();
        let echoed = echo(&raw);

        assert!(echoed.contains("\"show_3D_figure\": true"));
        assert!(echoed.contains("\"figure_dpi\": 150,"));
        assert!(!echoed.contains("150.0"));

        let config = PlotConfig::from_value(raw, "test.json").unwrap();
        assert_eq!(config.figure_dpi, 150.0);
    }
}
