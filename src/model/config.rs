use serde::{Deserialize, Serialize};

/// Configuration from taskman.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the JSON data file, relative to the working directory
    #[serde(default = "default_data_file")]
    pub file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            file: default_data_file(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Titles longer than this are cut in the task table
    #[serde(default = "default_title_width")]
    pub title_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            title_width: default_title_width(),
        }
    }
}

fn default_data_file() -> String {
    "tasks.json".to_string()
}

fn default_title_width() -> usize {
    18
}
