use crate::commands::{Preset, SortField};
use crate::error::{Result, WherekitError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Demo configuration, stored in `<data dir>/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WherekitConfig {
    /// Sort field used by `list` when none is given
    #[serde(default = "default_sort")]
    pub default_sort: String,

    /// Row limit used by `list` when none is given (0 means unlimited)
    #[serde(default)]
    pub default_limit: usize,

    /// Preset used by `list` and `count` when no filter is given
    #[serde(default = "default_filter")]
    pub default_filter: String,
}

fn default_sort() -> String {
    SortField::Date.name().to_string()
}

fn default_filter() -> String {
    Preset::All.name().to_string()
}

impl Default for WherekitConfig {
    fn default() -> Self {
        Self {
            default_sort: default_sort(),
            default_limit: 0,
            default_filter: default_filter(),
        }
    }
}

impl WherekitConfig {
    pub const KEYS: [&'static str; 3] = ["default_sort", "default_limit", "default_filter"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(WherekitError::Io)?;
        let config: WherekitConfig =
            serde_json::from_str(&content).map_err(WherekitError::Serialization)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(WherekitError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(WherekitError::Serialization)?;
        fs::write(config_path, content).map_err(WherekitError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default_sort" => Some(self.default_sort.clone()),
            "default_limit" => Some(self.default_limit.to_string()),
            "default_filter" => Some(self.default_filter.clone()),
            _ => None,
        }
    }

    /// Set a key from its textual form, validating the value.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "default_sort" => {
                let field: SortField = value.parse().map_err(|e: WherekitError| e.to_string())?;
                self.default_sort = field.name().to_string();
            }
            "default_limit" => {
                self.default_limit = value
                    .parse()
                    .map_err(|_| format!("Invalid limit: {}", value))?;
            }
            "default_filter" => {
                let preset: Preset = value.parse().map_err(|e: WherekitError| e.to_string())?;
                self.default_filter = preset.name().to_string();
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }

    pub fn sort_field(&self) -> Result<SortField> {
        self.default_sort.parse()
    }

    pub fn filter_preset(&self) -> Result<Preset> {
        self.default_filter.parse()
    }

    pub fn limit(&self) -> Option<usize> {
        (self.default_limit > 0).then_some(self.default_limit)
    }
}
