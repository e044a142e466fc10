//! Test fixture creation for the catalog database and the fanart folder

use super::constants::*;
use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tvseries_catalog::catalog_store::{Catalog, CatalogSettings, Episode, Season, Series};

/// A catalog backed by a database file in a temporary directory, with its
/// own fanart and banner folders.
pub struct TestCatalog {
    pub dir: TempDir,
    pub db_path: PathBuf,
    pub catalog: Catalog,
}

#[allow(dead_code)]
impl TestCatalog {
    pub fn settings(dir: &Path) -> CatalogSettings {
        CatalogSettings {
            banners_dir: dir.join("banners"),
            fanart_dir: dir.join("fanart"),
            config_mode: false,
            thumbnail_width: 40,
            thumbnail_height: 20,
        }
    }

    pub fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("tvseries.db");
        let catalog = Catalog::open_path(&db_path, Self::settings(dir.path())).unwrap();
        Self {
            dir,
            db_path,
            catalog,
        }
    }

    /// Series 1 with:
    /// - season 0 (specials): one local episode
    /// - season 1: two local episodes, the first one watched
    /// - season 2: one episode known only online
    /// - season 3: hidden, one local episode
    pub fn with_seasons() -> Self {
        let test = Self::empty();
        let catalog = &test.catalog;
        catalog
            .series()
            .commit(&mut Series::new(SERIES_1_ID, SERIES_1_NAME))
            .unwrap();
        catalog
            .series()
            .commit(&mut Series::new(SERIES_2_ID, SERIES_2_NAME))
            .unwrap();

        test.add_episode(SERIES_1_ID, 0, 1, false, true);
        test.add_episode(SERIES_1_ID, 1, 1, true, true);
        test.add_episode(SERIES_1_ID, 1, 2, false, true);
        test.add_episode(SERIES_1_ID, 2, 1, false, false);
        test.add_episode(SERIES_1_ID, 3, 1, false, true);

        for index in 0..=3 {
            let mut season = Season::new(SERIES_1_ID, index);
            season.has_online_episodes = true;
            season.hidden = index == 3;
            season.title = format!("Season {}", index);
            catalog.seasons().commit(&mut season).unwrap();
        }
        test
    }

    pub fn add_episode(
        &self,
        series_id: i64,
        season: i32,
        index: i32,
        watched: bool,
        local: bool,
    ) -> Episode {
        let mut episode = Episode::new(series_id, season, index);
        episode.name = format!("Episode {}x{}", season, index);
        episode.watched = watched;
        if local {
            let path = self
                .dir
                .path()
                .join("media")
                .join(format!("{}_{}x{}.mkv", series_id, season, index));
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"video").unwrap();
            episode.filename = path.to_string_lossy().into_owned();
        }
        self.catalog.episodes().commit(&mut episode).unwrap();
        episode
    }

    pub fn fanart_dir(&self) -> PathBuf {
        self.dir.path().join("fanart")
    }

    pub fn fanart_path(&self, relative: &str) -> PathBuf {
        self.fanart_dir().join(relative)
    }

    /// Writes a real JPEG into the fanart folder.
    pub fn write_fanart(&self, relative: &str) -> PathBuf {
        let path = self.fanart_path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbImage::from_pixel(
            FANART_IMAGE_WIDTH,
            FANART_IMAGE_HEIGHT,
            image::Rgb([30, 60, 90]),
        )
        .save(&path)
        .unwrap();
        path
    }

    /// Opens the database again, as a new process start would.
    pub fn reopen(&mut self) {
        self.catalog = Catalog::open_path(&self.db_path, Self::settings(self.dir.path())).unwrap();
    }
}
