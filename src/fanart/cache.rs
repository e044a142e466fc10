use super::discovery::FanartDiscovery;
use super::models::{FanartField, FanartRecord, Rgb};
use super::thumbnail::Thumbnailer;
use super::FanartError;
use crate::options::{OptionKey, OptionsStore};
use crate::sqlite_persistence::{Condition, ConditionOp, EntityTable};
use rand::{rng, Rng};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

const CACHE_DIR_MARKER: &str = "_cache";
const LIGHT_MARKER: &str = "_light_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FanartKey {
    pub series_id: i64,
    /// Set for season fanart.
    pub season_index: Option<i32>,
}

impl FanartKey {
    pub fn series(series_id: i64) -> Self {
        Self {
            series_id,
            season_index: None,
        }
    }

    pub fn season(series_id: i64, season_index: i32) -> Self {
        Self {
            series_id,
            season_index: Some(season_index),
        }
    }

    fn series_pattern(&self) -> String {
        format!("*{}*.*", self.series_id)
    }

    fn season_pattern(&self, season_index: i32) -> String {
        format!("*{}S{}*.*", self.series_id, season_index)
    }
}

/// Collaborators shared by every cache entry.
struct FanartContext {
    records: EntityTable<FanartRecord>,
    options: Arc<OptionsStore>,
    discovery: Arc<dyn FanartDiscovery>,
    thumbnailer: Arc<dyn Thumbnailer>,
    fanart_dir: PathBuf,
}

impl FanartContext {
    fn records_of(&self, series_id: i64) -> Result<Vec<FanartRecord>, FanartError> {
        Ok(self.records.get(&Condition::with(
            FanartField::SeriesId,
            series_id,
            ConditionOp::Equal,
        ))?)
    }

    /// Whether the image of `record` is on disk. A record whose file is gone
    /// gets its local path cleared and stored.
    fn is_available(&self, record: &mut FanartRecord) -> bool {
        let Some(path) = record.full_local_path(&self.fanart_dir) else {
            return false;
        };
        if self.discovery.exists(&path) {
            return true;
        }
        info!(
            "Fanart {:?} of series {} is no longer on disk",
            path, record.series_id
        );
        record.local_path.clear();
        if let Err(e) = self.records.commit(record) {
            warn!("Failed to store pruned fanart {}: {}", record.id, e);
        }
        false
    }

    /// Persisted records that can be shown, in stored order.
    fn usable_records(&self, series_id: i64) -> Vec<FanartRecord> {
        let records = match self.records_of(series_id) {
            Ok(records) => records,
            Err(e) => {
                warn!("Failed to read fanart of series {}: {}", series_id, e);
                return Vec::new();
            }
        };
        records
            .into_iter()
            .filter_map(|mut record| {
                (self.is_available(&mut record) && !record.disabled).then_some(record)
            })
            .collect()
    }

    fn random_enabled(&self) -> bool {
        self.options
            .get_bool(OptionKey::RandomFanart)
            .unwrap_or_else(|e| {
                warn!("Failed to read random fanart option: {}", e);
                false
            })
    }
}

#[derive(Debug, Default)]
struct FanartState {
    files: Vec<PathBuf>,
    random_pick: Option<PathBuf>,
    is_light: Option<bool>,
    /// Persisted record picked by the last non-random resolution.
    chosen: Option<FanartRecord>,
    thumbnail: Option<PathBuf>,
}

/// Cached fanart of one series, or of one season of a series.
pub struct Fanart {
    key: FanartKey,
    context: Arc<FanartContext>,
    state: Mutex<FanartState>,
}

impl Fanart {
    fn new(key: FanartKey, context: Arc<FanartContext>) -> Self {
        let fanart = Self {
            key,
            context,
            state: Mutex::new(FanartState::default()),
        };
        {
            let mut state = fanart.state.lock().unwrap();
            fanart.discover(&mut state);
        }
        fanart
    }

    pub fn key(&self) -> FanartKey {
        self.key
    }

    pub fn season_mode(&self) -> bool {
        self.key.season_index.is_some()
    }

    /// Whether the last scan found any file.
    pub fn found(&self) -> bool {
        !self.state.lock().unwrap().files.is_empty()
    }

    /// Files found by the last scan.
    pub fn files(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().files.clone()
    }

    fn scan(&self) -> Result<Vec<PathBuf>, FanartError> {
        let ctx = &self.context;
        let root = ctx.fanart_dir.as_path();

        let mut files = match self.key.season_index {
            Some(index) => {
                let season = ctx
                    .discovery
                    .list_files(root, &self.key.season_pattern(index), true)?;
                if season.is_empty() {
                    debug!(
                        "No season fanart for series {} season {}, looking for series fanart",
                        self.key.series_id, index
                    );
                    ctx.discovery
                        .list_files(root, &self.key.series_pattern(), true)?
                } else {
                    season
                }
            }
            None => ctx
                .discovery
                .list_files(root, &self.key.series_pattern(), true)?,
        };

        let season_marker = format!("{}s", self.key.series_id);
        files.retain(|path| {
            if path.to_string_lossy().contains(CACHE_DIR_MARKER) {
                return false;
            }
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            self.season_mode() || !name.contains(&season_marker)
        });
        Ok(files)
    }

    fn discover(&self, state: &mut FanartState) {
        match self.scan() {
            Ok(files) => {
                debug!(
                    "Found {} fanart files for {:?}",
                    files.len(),
                    self.key
                );
                state.files = files;
            }
            Err(e) => {
                warn!("Failed to look for fanart of {:?}: {}", self.key, e);
                state.files.clear();
            }
        }
    }

    /// Scans the fanart folder again, keeping the current random pick.
    pub fn refresh(&self) {
        let mut state = self.state.lock().unwrap();
        self.discover(&mut state);
    }

    /// Drops the memoized random pick so the next lookup rolls again.
    pub fn force_new_pick(&self) {
        let mut state = self.state.lock().unwrap();
        state.random_pick = None;
        state.is_light = None;
    }

    fn resolve(&self, state: &mut FanartState) -> Option<PathBuf> {
        if state.files.is_empty() {
            self.discover(state);
            if state.files.is_empty() {
                return None;
            }
        }

        let ctx = &self.context;
        if ctx.random_enabled() {
            state.chosen = None;
            if let Some(pick) = &state.random_pick {
                return Some(pick.clone());
            }
            let candidates: Vec<PathBuf> = ctx
                .usable_records(self.key.series_id)
                .iter()
                .filter_map(|record| record.full_local_path(&ctx.fanart_dir))
                .collect();
            let pool = if candidates.is_empty() {
                &state.files
            } else {
                &candidates
            };
            let pick = pool[rng().random_range(0..pool.len())].clone();
            state.random_pick = Some(pick.clone());
            return Some(pick);
        }

        let usable = ctx.usable_records(self.key.series_id);
        let chosen = usable
            .iter()
            .find(|record| record.chosen)
            .or_else(|| usable.first())
            .cloned();
        match chosen {
            Some(record) => {
                let path = record.full_local_path(&ctx.fanart_dir);
                state.chosen = Some(record);
                path
            }
            None => {
                state.chosen = None;
                state.files.first().cloned()
            }
        }
    }

    /// Full size image to show, `None` when nothing is available.
    ///
    /// Without random selection this is the chosen persisted image, then the
    /// first usable persisted one, then the first file found on disk. With
    /// random selection the pick is remembered until [`Fanart::force_new_pick`].
    pub fn filename(&self) -> Option<PathBuf> {
        let mut state = self.state.lock().unwrap();
        self.resolve(&mut state)
    }

    pub fn random_pick_is_light(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        if let Some(is_light) = state.is_light {
            return is_light;
        }
        let is_light = self
            .resolve(&mut state)
            .map(|path| path.to_string_lossy().contains(LIGHT_MARKER))
            .unwrap_or(false);
        state.is_light = Some(is_light);
        is_light
    }

    /// Palette of the persisted image picked by the last resolution.
    pub fn colors(&self) -> Option<[Rgb; 3]> {
        let state = self.state.lock().unwrap();
        state
            .chosen
            .as_ref()
            .filter(|record| record.has_color_info())
            .and_then(FanartRecord::palette)
    }

    /// Small version of the fanart, generated from the full size image when
    /// it isn't cached yet.
    pub fn thumbnail_filename(&self) -> Option<PathBuf> {
        let mut state = self.state.lock().unwrap();
        if let Some(thumbnail) = &state.thumbnail {
            return Some(thumbnail.clone());
        }

        let ctx = &self.context;
        let records = match ctx.records_of(self.key.series_id) {
            Ok(records) => records,
            Err(e) => {
                warn!("Failed to read fanart of series {}: {}", self.key.series_id, e);
                return None;
            }
        };
        let record = records
            .iter()
            .find(|record| record.chosen)
            .or_else(|| records.first())?;
        if record.thumbnail_path.is_empty() {
            return None;
        }
        let thumbnail = ctx.fanart_dir.join(&record.thumbnail_path);

        if !ctx.discovery.exists(&thumbnail) {
            let full_size = self
                .resolve(&mut state)
                .filter(|path| ctx.discovery.exists(path))?;
            if let Err(e) = ctx.thumbnailer.create(&full_size, &thumbnail) {
                error!(
                    "Failed to create fanart thumbnail {:?} from {:?}: {}",
                    thumbnail, full_size, e
                );
                return None;
            }
        }
        state.thumbnail = Some(thumbnail.clone());
        Some(thumbnail)
    }

    fn forget_thumbnail(&self) {
        self.state.lock().unwrap().thumbnail = None;
    }
}

/// Process wide fanart cache, one entry per series or season.
///
/// The map lock only covers lookup and insertion; scanning and resolution
/// run under the lock of the entry.
pub struct FanartCache {
    context: Arc<FanartContext>,
    entries: Mutex<HashMap<FanartKey, Arc<Fanart>>>,
}

impl FanartCache {
    pub fn new(
        records: EntityTable<FanartRecord>,
        options: Arc<OptionsStore>,
        discovery: Arc<dyn FanartDiscovery>,
        thumbnailer: Arc<dyn Thumbnailer>,
        fanart_dir: PathBuf,
    ) -> Self {
        Self {
            context: Arc::new(FanartContext {
                records,
                options,
                discovery,
                thumbnailer,
                fanart_dir,
            }),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn records(&self) -> &EntityTable<FanartRecord> {
        &self.context.records
    }

    fn lookup(&self, key: FanartKey) -> Arc<Fanart> {
        let cached = self.entries.lock().unwrap().get(&key).cloned();
        if let Some(fanart) = cached {
            fanart.force_new_pick();
            return fanart;
        }

        let created = Arc::new(Fanart::new(key, self.context.clone()));
        self.entries
            .lock()
            .unwrap()
            .entry(key)
            .or_insert(created)
            .clone()
    }

    /// Fanart of a series. A cached entry rolls a new random pick.
    pub fn fanart(&self, series_id: i64) -> Arc<Fanart> {
        self.lookup(FanartKey::series(series_id))
    }

    /// Fanart of one season, falling back to the series images when the
    /// season has none.
    pub fn season_fanart(&self, series_id: i64, season_index: i32) -> Arc<Fanart> {
        self.lookup(FanartKey::season(series_id, season_index))
    }

    /// Rescans the cached series entry. Returns false when the series has
    /// no entry yet.
    pub fn refresh(&self, series_id: i64) -> bool {
        self.refresh_key(FanartKey::series(series_id))
    }

    pub fn refresh_season(&self, series_id: i64, season_index: i32) -> bool {
        self.refresh_key(FanartKey::season(series_id, season_index))
    }

    fn refresh_key(&self, key: FanartKey) -> bool {
        let cached = self.entries.lock().unwrap().get(&key).cloned();
        match cached {
            Some(fanart) => {
                fanart.refresh();
                true
            }
            None => false,
        }
    }

    /// Deletes the cached thumbnails of a series and its persisted fanart
    /// records, so both get downloaded again. Returns the number of deleted
    /// thumbnails.
    pub fn clear_thumbnail_cache(&self, series_id: i64) -> Result<usize, FanartError> {
        let ctx = &self.context;
        let cache_dir = ctx
            .fanart_dir
            .join(CACHE_DIR_MARKER)
            .join("fanart")
            .join("original");

        let mut deleted = 0;
        for file in ctx
            .discovery
            .list_files(&cache_dir, &format!("{}*.jpg", series_id), false)?
        {
            info!("Deleting cached fanart thumbnail {:?}", file);
            match ctx.discovery.delete(&file) {
                Ok(()) => deleted += 1,
                Err(e) => warn!("Failed to delete cached fanart thumbnail: {}", e),
            }
        }

        ctx.records.clear(&Condition::with(
            FanartField::SeriesId,
            series_id,
            ConditionOp::Equal,
        ))?;

        let entries: Vec<Arc<Fanart>> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, _)| key.series_id == series_id)
            .map(|(_, fanart)| fanart.clone())
            .collect();
        for fanart in entries {
            fanart.forget_thumbnail();
        }
        Ok(deleted)
    }
}
