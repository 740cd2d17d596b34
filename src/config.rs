// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::locale::Language;
use crate::selection::{DEFAULT_SECTION_TEMPLATE, SelectionLimits};
use anyhow::{Context, Error, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

fn default_archive_threshold_days() -> i64 {
    14
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub language: Language,
    /// Rows that ended more than this many days ago are archived.
    #[serde(default = "default_archive_threshold_days")]
    pub archive_threshold_days: i64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Wiki section template with `{next_dates}` / `{prev_dates}` slots.
    #[serde(default)]
    pub section_template: Option<PathBuf>,
    #[serde(default)]
    pub selection: SelectionLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::default(),
            archive_threshold_days: default_archive_threshold_days(),
            log_level: default_log_level(),
            section_template: None,
            selection: SelectionLimits::default(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(config) => Ok(config),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::debug!("No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Whether `err` means the config file does not exist, as opposed to
    /// being unreadable or malformed.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }
        err.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
        })
    }

    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&path, toml_str)
            .with_context(|| format!("Failed to write config file '{}'", path.display()))?;
        Ok(())
    }

    /// Unknown level names fall back to `warn`.
    pub fn log_level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Warn)
    }

    /// The configured template file's contents, or the built-in template.
    pub fn section_template(&self) -> Result<String> {
        match &self.section_template {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read section template '{}'", path.display())),
            None => Ok(DEFAULT_SECTION_TEMPLATE.to_string()),
        }
    }
}
