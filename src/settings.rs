//! Settings file for the SMART logger
//!
//! ```toml
//! [vtview]
//! run_time_hours = 20.0
//! record_frequency_hours = 10.0
//! output_file = "burn-in.txt"
//! test_name = "burn-in"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Cannot read settings file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid settings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid setting {key}: {value} (must be a non-negative number of hours)")]
    Hours { key: &'static str, value: f64 },
}

/// Top level of the settings file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub vtview: VtviewSettings,
}

/// `[vtview]` table, every key optional
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VtviewSettings {
    pub run_time_hours: Option<f64>,
    pub record_frequency_hours: Option<f64>,
    pub output_file: Option<PathBuf>,
    pub test_name: Option<String>,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            SettingsError::Parse { source, .. } => SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse settings from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content).map_err(|source| SettingsError::Parse {
            path: PathBuf::new(),
            source,
        })?;

        let vt = &settings.vtview;
        for (key, value) in [
            ("run_time_hours", vt.run_time_hours),
            ("record_frequency_hours", vt.record_frequency_hours),
        ] {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(SettingsError::Hours { key, value });
                }
            }
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_table() {
        let settings = Settings::from_toml_str(
            r#"
            [vtview]
            run_time_hours = 100.0
            record_frequency_hours = 0.25
            output_file = "burn-in.txt"
            test_name = "burn-in-at-(-40)"
            "#,
        )
        .unwrap();
        assert_eq!(settings.vtview.run_time_hours, Some(100.0));
        assert_eq!(settings.vtview.record_frequency_hours, Some(0.25));
        assert_eq!(settings.vtview.output_file, Some(PathBuf::from("burn-in.txt")));
        assert_eq!(settings.vtview.test_name.as_deref(), Some("burn-in-at-(-40)"));
    }

    #[test]
    fn test_empty_file_is_default() {
        let settings = Settings::from_toml_str("").unwrap();
        assert!(settings.vtview.run_time_hours.is_none());
        assert!(settings.vtview.test_name.is_none());
    }

    #[test]
    fn test_rejects_unknown_key_and_negative_hours() {
        assert!(matches!(
            Settings::from_toml_str("[vtview]\nruntime = 3.0\n"),
            Err(SettingsError::Parse { .. })
        ));
        assert!(matches!(
            Settings::from_toml_str("[vtview]\nrun_time_hours = -2.0\n"),
            Err(SettingsError::Hours { key: "run_time_hours", .. })
        ));
    }

    #[test]
    fn test_from_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[vtview]\ntest_name = \"soak\"").unwrap();
        let settings = Settings::from_toml_file(file.path()).unwrap();
        assert_eq!(settings.vtview.test_name.as_deref(), Some("soak"));

        let err = Settings::from_toml_file("/nonexistent/vtnvme.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/vtnvme.toml"));
    }
}
