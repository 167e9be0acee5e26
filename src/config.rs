//! Parser settings loaded from `~/.config/schedule-parser/config.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Datelike;
use serde::Deserialize;

/// Default vertical tolerance for merging wrapped lines, in first-line heights.
pub const DEFAULT_MULTILINE_THRESHOLD: f32 = 1.0;

/// Per-invocation parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Reference year for resolving `dd.mm` dates.
    pub schedule_year: i32,
    /// Vertical gap, in first-line heights, still treated as one cell.
    pub multiline_threshold: f32,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            schedule_year: chrono::Local::now().year(),
            multiline_threshold: DEFAULT_MULTILINE_THRESHOLD,
        }
    }
}

impl ParserSettings {
    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, year: Option<i32>, threshold: Option<f32>) -> Self {
        if let Some(year) = year {
            self.schedule_year = year;
        }
        if let Some(threshold) = threshold {
            self.multiline_threshold = threshold;
        }
        self
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    parser: ParserSettings,
}

/// Load settings from the default config file.
///
/// Returns defaults if the file doesn't exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_settings() -> Result<ParserSettings> {
    load_settings_from(&config_path())
}

/// Load settings from `path`, falling back to defaults when it is absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_settings_from(path: &Path) -> Result<ParserSettings> {
    if !path.exists() {
        return Ok(ParserSettings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let file: ConfigFile =
        toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))?;

    Ok(file.parser)
}

/// Return the path to the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("schedule-parser")
        .join("config.toml")
}
