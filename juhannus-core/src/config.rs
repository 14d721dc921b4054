//! Juhannus configuration.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{JuhannusError, JuhannusResult};
use crate::schedule::Schedule;

static DEFAULT_TIMEZONE: &str = "Europe/Helsinki";
static DEFAULT_DATA_DIR: &str = "~/.local/share/juhannus";

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn is_default_timezone(tz: &String) -> bool {
    tz == DEFAULT_TIMEZONE
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn is_default_data_dir(p: &PathBuf) -> bool {
    *p == default_data_dir()
}

/// Configuration at ~/.config/juhannus/config.toml
///
/// Any key can be overridden with a `JUHANNUS_`-prefixed environment
/// variable, e.g. `JUHANNUS_TIMEZONE=Europe/Stockholm`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct JuhannusConfig {
    /// IANA zone all deadlines are computed in.
    #[serde(default = "default_timezone", skip_serializing_if = "is_default_timezone")]
    pub timezone: String,

    #[serde(default = "default_data_dir", skip_serializing_if = "is_default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for JuhannusConfig {
    fn default() -> Self {
        JuhannusConfig {
            timezone: default_timezone(),
            data_dir: default_data_dir(),
        }
    }
}

impl JuhannusConfig {
    pub fn config_path() -> JuhannusResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| JuhannusError::Config("Could not determine config directory".into()))?
            .join("juhannus");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented-out default
    /// file first if none exists.
    pub fn load() -> JuhannusResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> JuhannusResult<Self> {
        let config: JuhannusConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("JUHANNUS"))
            .build()
            .map_err(|e| JuhannusError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| JuhannusError::Config(e.to_string()))?;

        // Fail on a bad zone now rather than on first use
        config.tz()?;
        Ok(config)
    }

    pub fn tz(&self) -> JuhannusResult<Tz> {
        self.timezone
            .parse()
            .map_err(|e| JuhannusError::Config(format!("Unknown timezone '{}': {e}", self.timezone)))
    }

    pub fn schedule(&self) -> JuhannusResult<Schedule> {
        Ok(Schedule::new(self.tz()?))
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn save_to(&self, path: &Path) -> JuhannusResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| JuhannusError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| JuhannusError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> JuhannusResult<()> {
        let contents = format!(
            "\
# juhannus configuration

# Timezone used for midsummer deadlines:
# timezone = \"{DEFAULT_TIMEZONE}\"

# Where events and votes are stored:
# data_dir = \"{DEFAULT_DATA_DIR}\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                JuhannusError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| JuhannusError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
