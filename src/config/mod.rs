mod file_config;

pub use file_config::{FileConfig, OptionsConfig};

use crate::catalog_store::{CatalogSettings, DEFAULT_THUMBNAIL_HEIGHT, DEFAULT_THUMBNAIL_WIDTH};
use crate::options::{OptionKey, OptionsStore};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub fanart_dir: Option<PathBuf>,
    pub banners_dir: Option<PathBuf>,
    pub config_mode: bool,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            fanart_dir: None,
            banners_dir: None,
            config_mode: false,
            thumbnail_width: DEFAULT_THUMBNAIL_WIDTH,
            thumbnail_height: DEFAULT_THUMBNAIL_HEIGHT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub fanart_dir: PathBuf,
    pub banners_dir: PathBuf,
    pub config_mode: bool,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,

    /// Options to store before the catalog is used, in declaration order.
    pub options: Vec<(OptionKey, bool)>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified via --db-path or in config file")
            })?;
        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }

        // Artwork folders default to siblings of the database
        let db_dir = db_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        let fanart_dir = file
            .fanart_dir
            .map(PathBuf::from)
            .or_else(|| cli.fanart_dir.clone())
            .unwrap_or_else(|| db_dir.join("fanart"));
        let banners_dir = file
            .banners_dir
            .map(PathBuf::from)
            .or_else(|| cli.banners_dir.clone())
            .unwrap_or_else(|| db_dir.join("banners"));

        let config_mode = file.config_mode.unwrap_or(cli.config_mode);
        let thumbnail_width = file.thumbnail_width.unwrap_or(cli.thumbnail_width);
        let thumbnail_height = file.thumbnail_height.unwrap_or(cli.thumbnail_height);
        if thumbnail_width == 0 || thumbnail_height == 0 {
            bail!(
                "Thumbnail size must be positive, got {}x{}",
                thumbnail_width,
                thumbnail_height
            );
        }

        let options = file
            .options
            .map(|o| {
                [
                    (OptionKey::RandomFanart, o.random_fanart),
                    (OptionKey::RandomBanner, o.random_banner),
                    (OptionKey::ShowHiddenItems, o.show_hidden_items),
                    (OptionKey::OnlyShowLocalFiles, o.only_show_local_files),
                    (OptionKey::SortSpecialSeasonLast, o.sort_special_season_last),
                ]
                .into_iter()
                .filter_map(|(key, value)| value.map(|v| (key, v)))
                .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            db_path,
            fanart_dir,
            banners_dir,
            config_mode,
            thumbnail_width,
            thumbnail_height,
            options,
        })
    }

    pub fn catalog_settings(&self) -> CatalogSettings {
        CatalogSettings {
            banners_dir: self.banners_dir.clone(),
            fanart_dir: self.fanart_dir.clone(),
            config_mode: self.config_mode,
            thumbnail_width: self.thumbnail_width,
            thumbnail_height: self.thumbnail_height,
        }
    }

    pub fn apply_options(&self, store: &OptionsStore) -> Result<()> {
        for (key, value) in &self.options {
            store
                .set_bool(*key, *value)
                .with_context(|| format!("Failed to store option {}", key.as_str()))?;
        }
        Ok(())
    }
}
