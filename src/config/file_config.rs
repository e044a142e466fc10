use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_path: Option<String>,
    pub fanart_dir: Option<String>,
    pub banners_dir: Option<String>,
    pub config_mode: Option<bool>,
    pub thumbnail_width: Option<u32>,
    pub thumbnail_height: Option<u32>,

    /// Values written to the options table on startup.
    pub options: Option<OptionsConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct OptionsConfig {
    pub random_fanart: Option<bool>,
    pub random_banner: Option<bool>,
    pub show_hidden_items: Option<bool>,
    pub only_show_local_files: Option<bool>,
    pub sort_special_season_last: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
