use super::episode::{Episode, EpisodeField};
use super::migrations::SEASON_MIGRATION;
use super::season::{Season, SeasonField};
use super::series::{Series, SeriesField};
use crate::fanart::{FanartCache, FanartRecord, ImageThumbnailer, LocalFilesystem};
use crate::migration::MigrationOutcome;
use crate::options::{OptionKey, OptionsStore};
use crate::sqlite_persistence::{
    Condition, ConditionOp, EntityTable, SqliteExecutor, StorageExecutor, StoreError,
};
use anyhow::{Context, Result};
use clap::ValueEnum;
use rand::{rng, Rng};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 400;
pub const DEFAULT_THUMBNAIL_HEIGHT: u32 = 225;

#[derive(Debug, Clone)]
pub struct CatalogSettings {
    /// Root of the downloaded series and season banners.
    pub banners_dir: PathBuf,
    /// Root scanned for fanart images.
    pub fanart_dir: PathBuf,
    /// Configuration tooling mode, disables viewer-only query filters.
    pub config_mode: bool,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            banners_dir: PathBuf::from("banners"),
            fanart_dir: PathBuf::from("fanart"),
            config_mode: false,
            thumbnail_width: DEFAULT_THUMBNAIL_WIDTH,
            thumbnail_height: DEFAULT_THUMBNAIL_HEIGHT,
        }
    }
}

/// What [`Catalog::delete_season`] removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeleteScope {
    /// Local episode files only, database rows are kept.
    Disk,
    /// Database rows only, files stay on disk.
    Database,
    DiskAndDatabase,
}

impl DeleteScope {
    fn includes_disk(self) -> bool {
        matches!(self, DeleteScope::Disk | DeleteScope::DiskAndDatabase)
    }

    fn includes_database(self) -> bool {
        matches!(self, DeleteScope::Database | DeleteScope::DiskAndDatabase)
    }
}

/// Composition root for the catalog: owns the options store, one table per
/// entity type and the fanart cache, all sharing one executor.
///
/// The season schema migration runs inside [`Catalog::open`], so no caller
/// can observe season rows before it completed.
pub struct Catalog {
    options: Arc<OptionsStore>,
    series: EntityTable<Series>,
    seasons: EntityTable<Season>,
    episodes: EntityTable<Episode>,
    fanart: FanartCache,
    settings: CatalogSettings,
    migration: Option<MigrationOutcome>,
}

impl Catalog {
    pub fn open(executor: Arc<dyn StorageExecutor>, settings: CatalogSettings) -> Result<Self> {
        let options = Arc::new(
            OptionsStore::open(executor.clone(), settings.config_mode)
                .context("Failed to open options table")?,
        );
        let series = EntityTable::open(executor.clone(), options.clone())
            .context("Failed to open series table")?;
        let seasons = EntityTable::open(executor.clone(), options.clone())
            .context("Failed to open season table")?;
        let episodes = EntityTable::open(executor.clone(), options.clone())
            .context("Failed to open episode table")?;
        let fanart_records: EntityTable<FanartRecord> =
            EntityTable::open(executor, options.clone())
                .context("Failed to open fanart table")?;

        let fanart = FanartCache::new(
            fanart_records,
            options.clone(),
            Arc::new(LocalFilesystem),
            Arc::new(ImageThumbnailer::new(
                settings.thumbnail_width,
                settings.thumbnail_height,
            )),
            settings.fanart_dir.clone(),
        );

        let mut catalog = Self {
            options,
            series,
            seasons,
            episodes,
            fanart,
            settings,
            migration: None,
        };

        match SEASON_MIGRATION.run(&catalog, &catalog.options) {
            Ok(outcome) => catalog.migration = Some(outcome),
            // Seasons stay usable on the pre-migration data.
            Err(e) => error!("Season migration halted: {:#}", e),
        }
        Ok(catalog)
    }

    pub fn open_path<P: AsRef<Path>>(db_path: P, settings: CatalogSettings) -> Result<Self> {
        let db_path = db_path.as_ref();
        info!("Opening catalog database at {:?}...", db_path);
        let executor = SqliteExecutor::open(db_path)
            .with_context(|| format!("Failed to open catalog database {:?}", db_path))?;
        Self::open(Arc::new(executor), settings)
    }

    pub fn options(&self) -> &Arc<OptionsStore> {
        &self.options
    }

    pub fn series(&self) -> &EntityTable<Series> {
        &self.series
    }

    pub fn seasons(&self) -> &EntityTable<Season> {
        &self.seasons
    }

    pub fn episodes(&self) -> &EntityTable<Episode> {
        &self.episodes
    }

    pub fn fanart(&self) -> &FanartCache {
        &self.fanart
    }

    /// Outcome of the season migration run by [`Catalog::open`], `None` when
    /// it halted on a failing step.
    pub fn last_migration(&self) -> Option<&MigrationOutcome> {
        self.migration.as_ref()
    }

    fn sort_specials_last(&self) -> bool {
        self.options
            .get_bool(OptionKey::SortSpecialSeasonLast)
            .unwrap_or_else(|e| {
                warn!("Failed to read specials ordering option: {}", e);
                true
            })
    }

    // ------------------------------------------------------------------
    // Seasons
    // ------------------------------------------------------------------

    /// Loads the season of `series_id` with the given index. A season that
    /// doesn't exist yet comes back with default values, and its series is
    /// flagged so banners get downloaded again.
    pub fn season(&self, series_id: i64, index: i32) -> Result<Season, StoreError> {
        let mut season = Season::default();
        let key = Season::composite_key(series_id, index);
        if !self.seasons.read_primary(&mut season, &key)? {
            debug!("Season {} is new, resetting series banners", key);
            let mut series = self
                .series
                .get_by_key(&series_id.to_string())?
                .unwrap_or_else(|| Series::new(series_id, ""));
            series.banners_downloaded = false;
            self.series.commit(&mut series)?;
        }
        season.series_id = series_id;
        season.index = index;
        season.id = key;
        Ok(season)
    }

    /// The stored season, ignoring the standard conditions.
    pub fn season_raw(&self, series_id: i64, index: i32) -> Result<Option<Season>, StoreError> {
        Ok(self
            .seasons
            .get_with(&Season::by_index(series_id, index), false)?
            .into_iter()
            .next())
    }

    /// Seasons matching `condition` and the standard conditions. A
    /// `series_id` of 0 doesn't restrict the series.
    pub fn seasons_of_series(
        &self,
        series_id: i64,
        condition: &Condition,
    ) -> Result<Vec<Season>, StoreError> {
        let mut condition = condition.clone();
        if series_id != 0 {
            condition.add(SeasonField::SeriesId, series_id, ConditionOp::Equal);
        }
        self.seasons.get(&condition)
    }

    /// Sorts seasons for display, honoring the specials ordering option.
    pub fn sort_seasons(&self, seasons: &mut [Season]) {
        let specials_last = self.sort_specials_last();
        seasons.sort_by(|a, b| a.compare(b, specials_last));
    }

    /// Copies `season` under `new_series_id`. Returns false and writes
    /// nothing when the target season already exists.
    pub fn change_series_id(&self, season: &Season, new_series_id: i64) -> Result<bool, StoreError> {
        let key = Season::composite_key(new_series_id, season.index);
        if self.seasons.get_by_key(&key)?.is_some() {
            return Ok(false);
        }
        let mut moved = season.clone();
        moved.series_id = new_series_id;
        self.seasons.commit(&mut moved)?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Banners
    // ------------------------------------------------------------------

    fn custom_artwork_path(&self, series_name: &str, index: i32) -> PathBuf {
        self.settings
            .banners_dir
            .join(clean_local_path(series_name))
            .join("seasons")
            .join(format!("custom-{}.jpg", index))
    }

    fn relative_to_banners(&self, path: &Path) -> String {
        path.strip_prefix(&self.settings.banners_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }

    /// Absolute banner paths of `season`: user artwork first when present,
    /// then the downloaded banners.
    pub fn banner_list(&self, season: &Season) -> Result<Vec<PathBuf>, StoreError> {
        let mut banners = Vec::new();
        if let Some(series) = self.series.get_by_key(&season.series_id.to_string())? {
            let custom = self.custom_artwork_path(&series.pretty_name, season.index);
            if custom.is_file() {
                banners.push(custom);
            }
        }
        banners.extend(
            season
                .banner_file_names
                .split('|')
                .filter(|name| !name.is_empty())
                .map(|name| self.settings.banners_dir.join(name)),
        );
        Ok(banners)
    }

    pub fn set_banner_list(&self, season: &mut Season, banners: &[PathBuf]) {
        season.banner_file_names = banners
            .iter()
            .map(|path| self.relative_to_banners(path))
            .collect::<Vec<_>>()
            .join("|");
    }

    /// Banner to display for `season`: a random one from the banner list when
    /// random banners are enabled, otherwise the current banner if it exists.
    pub fn current_banner(&self, season: &Season) -> Result<Option<PathBuf>, StoreError> {
        if self.options.get_bool(OptionKey::RandomBanner)? {
            let banners = self.banner_list(season)?;
            if banners.is_empty() {
                return Ok(None);
            }
            let pick = rng().random_range(0..banners.len());
            return Ok(banners.into_iter().nth(pick));
        }

        if season.current_banner_file_name.is_empty() {
            return Ok(None);
        }
        let stored = Path::new(&season.current_banner_file_name);
        let path = if stored.is_absolute() {
            stored.to_path_buf()
        } else {
            self.settings.banners_dir.join(stored)
        };
        Ok(path.is_file().then_some(path))
    }

    pub fn set_current_banner(&self, season: &mut Season, banner: &Path) {
        season.current_banner_file_name = self.relative_to_banners(banner);
    }

    // ------------------------------------------------------------------
    // Episode derived values
    // ------------------------------------------------------------------

    pub fn episodes_of_season(
        &self,
        series_id: i64,
        index: i32,
    ) -> Result<Vec<Episode>, StoreError> {
        self.episodes.get(&Episode::of_season(series_id, index))
    }

    pub fn first_unwatched(
        &self,
        series_id: i64,
        index: i32,
    ) -> Result<Option<Episode>, StoreError> {
        let mut condition = Episode::of_season(series_id, index);
        condition
            .add(EpisodeField::Watched, false, ConditionOp::Equal)
            .set_limit(1);
        Ok(self.episodes.get(&condition)?.into_iter().next())
    }

    /// `(total, unwatched)` over the visible episodes of one season.
    pub fn season_episode_counts(
        &self,
        series_id: i64,
        index: i32,
    ) -> Result<(i64, i64), StoreError> {
        Ok(count_episodes(&self.episodes_of_season(series_id, index)?))
    }

    pub fn series_episode_counts(&self, series_id: i64) -> Result<(i64, i64), StoreError> {
        let episodes = self.episodes.get(&Condition::with(
            EpisodeField::SeriesId,
            series_id,
            ConditionOp::Equal,
        ))?;
        Ok(count_episodes(&episodes))
    }

    /// Recomputes the unwatched flag of the season holding `episode`.
    pub fn update_unwatched(&self, episode: &Episode) -> Result<Season, StoreError> {
        let mut season = self.season(episode.series_id, episode.season_index)?;
        season.unwatched_items = self
            .first_unwatched(season.series_id, season.index)?
            .is_some();
        self.seasons.commit(&mut season)?;
        Ok(season)
    }

    /// Recomputes the episode counters of `season`, then of its series.
    pub fn update_episode_counts(
        &self,
        series: &mut Series,
        season: &mut Season,
    ) -> Result<(), StoreError> {
        let (total, unwatched) = self.season_episode_counts(season.series_id, season.index)?;
        season.episode_count = total;
        season.episodes_unwatched = unwatched;
        season.unwatched_items = unwatched > 0;
        self.seasons.commit(season)?;

        let (total, unwatched) = self.series_episode_counts(series.id)?;
        series.episode_count = total;
        series.episodes_unwatched = unwatched;
        series.unwatched_items = unwatched > 0;
        self.series.commit(series)
    }

    // ------------------------------------------------------------------
    // Hide and delete
    // ------------------------------------------------------------------

    pub fn hide_season(&self, season: &mut Season, hide: bool) -> Result<(), StoreError> {
        info!(
            "{} series {}, season {} from view",
            if hide { "Hiding" } else { "Unhiding" },
            season.series_id,
            season.index
        );
        let episodes = self
            .episodes
            .get_with(&Episode::of_season(season.series_id, season.index), false)?;
        for mut episode in episodes {
            episode.hidden = hide;
            self.episodes.commit(&mut episode)?;
        }
        season.hidden = hide;
        self.seasons.commit(season)
    }

    /// Deletes the episodes of `season` from disk and/or the database.
    ///
    /// Returns one message per file that couldn't be removed; database rows
    /// are only cleared when every file went away. When the series is left
    /// without episodes its seasons and series row are removed too.
    pub fn delete_season(
        &self,
        season: &mut Season,
        scope: DeleteScope,
    ) -> Result<Vec<String>, StoreError> {
        let season_episodes = Episode::of_season(season.series_id, season.index);
        let episodes = self.episodes.get_with(&season_episodes, false)?;
        let mut failures = Vec::new();

        if scope.includes_disk() {
            for mut episode in episodes.into_iter().filter(Episode::has_local_file) {
                match std::fs::remove_file(&episode.filename) {
                    Ok(()) => info!("Deleted {}", episode.filename),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        debug!("{} was already gone", episode.filename)
                    }
                    Err(e) => {
                        warn!("Failed to delete {}: {}", episode.filename, e);
                        failures.push(format!("{}: {}", episode.filename, e));
                        continue;
                    }
                }
                if !scope.includes_database() {
                    episode.filename.clear();
                    self.episodes.commit(&mut episode)?;
                }
            }
        }
        if !failures.is_empty() {
            return Ok(failures);
        }

        if scope.includes_database() {
            self.episodes.clear(&season_episodes)?;
            self.seasons
                .clear(&Season::by_index(season.series_id, season.index))?;
        } else {
            season.has_local_files = false;
            self.seasons.commit(season)?;
        }

        if scope.includes_disk() {
            let local = self
                .episodes
                .get(&Condition::with(
                    EpisodeField::SeriesId,
                    season.series_id,
                    ConditionOp::Equal,
                ))?
                .iter()
                .any(Episode::has_local_file);
            if !local {
                if let Some(mut series) = self.series.get_by_key(&season.series_id.to_string())? {
                    series.has_local_files = false;
                    self.series.commit(&mut series)?;
                }
            }
        }

        if scope.includes_database() {
            let remaining = self.episodes.get_with(
                &Condition::with(EpisodeField::SeriesId, season.series_id, ConditionOp::Equal),
                false,
            )?;
            if remaining.is_empty() {
                info!("Series {} has no episodes left, removing it", season.series_id);
                self.seasons.clear(&Condition::with(
                    SeasonField::SeriesId,
                    season.series_id,
                    ConditionOp::Equal,
                ))?;
                self.series.clear(&Condition::with(
                    SeriesField::Id,
                    season.series_id.to_string(),
                    ConditionOp::Equal,
                ))?;
            }
        }
        Ok(failures)
    }
}

fn count_episodes(episodes: &[Episode]) -> (i64, i64) {
    let unwatched = episodes.iter().filter(|e| !e.watched).count();
    (episodes.len() as i64, unwatched as i64)
}

/// Replaces characters that can't appear in a file name.
fn clean_local_path(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}
