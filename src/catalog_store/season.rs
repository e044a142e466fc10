use super::episode::{Episode, EpisodeField};
use super::schema::SEASON_TABLE;
use crate::entity_fields;
use crate::sqlite_persistence::{
    Condition, ConditionOp, Entity, EntityField, FieldValue, QueryContext, Table,
};
use std::cmp::Ordering;

entity_fields! {
    pub enum SeasonField in "season" {
        Id => "ID",
        SeriesId => "SeriesID",
        Index => "SeasonIndex",
        BannerFileNames => "BannerFileNames",
        CurrentBannerFileName => "CurrentBannerFileName",
        HasLocalFiles => "HasLocalFiles",
        HasLocalFilesTemp => "HasLocalFilesTemp",
        HasOnlineEpisodes => "HasOnlineEpisodes",
        HasOnlineEpisodesTemp => "HasOnlineEpisodesTemp",
        Hidden => "Hidden",
        ForomSubtitleRoot => "ForomSubtitleRoot",
        UnwatchedItems => "UnwatchedItems",
        EpisodeCount => "EpisodeCount",
        EpisodesUnWatched => "EpisodesUnWatched",
        Summary => "Summary",
        Title => "Title",
        Rating => "Rating",
        RatingCount => "RatingCount",
        MyRating => "myRating",
        MyRatingAt => "myRatingAt",
    }
}

/// Sort position given to the specials season when it goes last.
const SPECIALS_LAST_POSITION: i32 = 9999;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Season {
    pub id: String,
    pub series_id: i64,
    pub index: i32,
    /// Pipe separated banner paths, relative to the banners folder.
    pub banner_file_names: String,
    pub current_banner_file_name: String,
    pub has_local_files: bool,
    pub has_local_files_temp: bool,
    pub has_online_episodes: bool,
    pub has_online_episodes_temp: bool,
    pub hidden: bool,
    pub forom_subtitle_root: String,
    pub unwatched_items: bool,
    pub episode_count: i64,
    pub episodes_unwatched: i64,
    pub summary: String,
    pub title: String,
    pub rating: String,
    pub rating_count: i64,
    pub my_rating: String,
    pub my_rating_at: String,
}

impl Season {
    pub fn new(series_id: i64, index: i32) -> Self {
        let mut season = Self {
            series_id,
            index,
            ..Default::default()
        };
        season.sync_primary_key();
        season
    }

    pub fn composite_key(series_id: i64, index: i32) -> String {
        format!("{}_s{}", series_id, index)
    }

    /// Condition selecting one season of a series by its natural key.
    pub fn by_index(series_id: i64, index: i32) -> Condition {
        let mut condition = Condition::with(SeasonField::SeriesId, series_id, ConditionOp::Equal);
        condition.add(SeasonField::Index, index, ConditionOp::Equal);
        condition
    }

    pub fn is_specials(&self) -> bool {
        self.index == 0
    }

    fn sort_position(&self, sort_specials_last: bool) -> i32 {
        if self.is_specials() && sort_specials_last {
            SPECIALS_LAST_POSITION
        } else {
            self.index
        }
    }

    /// Orders seasons by index. The specials season (index 0) goes after
    /// every regular season when `sort_specials_last` is set, first otherwise.
    pub fn compare(&self, other: &Season, sort_specials_last: bool) -> Ordering {
        self.sort_position(sort_specials_last)
            .cmp(&other.sort_position(sort_specials_last))
    }

    /// Display label for a season column name, falling back to the name itself.
    pub fn pretty_field_name(column: &str) -> &str {
        match SeasonField::from_column_name(column) {
            Some(SeasonField::Id) => "Composite Season ID",
            Some(SeasonField::SeriesId) => "Series ID",
            Some(SeasonField::Index) => "Season Index",
            Some(SeasonField::EpisodeCount) => "Episodes",
            Some(SeasonField::EpisodesUnWatched) => "Episodes UnWatched",
            _ => column,
        }
    }
}

impl Entity for Season {
    type Field = SeasonField;
    const TABLE: &'static Table = &SEASON_TABLE;

    fn primary_field() -> SeasonField {
        SeasonField::Id
    }

    fn get(&self, field: SeasonField) -> FieldValue {
        match field {
            SeasonField::Id => self.id.clone().into(),
            SeasonField::SeriesId => self.series_id.into(),
            SeasonField::Index => self.index.into(),
            SeasonField::BannerFileNames => self.banner_file_names.clone().into(),
            SeasonField::CurrentBannerFileName => self.current_banner_file_name.clone().into(),
            SeasonField::HasLocalFiles => self.has_local_files.into(),
            SeasonField::HasLocalFilesTemp => self.has_local_files_temp.into(),
            SeasonField::HasOnlineEpisodes => self.has_online_episodes.into(),
            SeasonField::HasOnlineEpisodesTemp => self.has_online_episodes_temp.into(),
            SeasonField::Hidden => self.hidden.into(),
            SeasonField::ForomSubtitleRoot => self.forom_subtitle_root.clone().into(),
            SeasonField::UnwatchedItems => self.unwatched_items.into(),
            SeasonField::EpisodeCount => self.episode_count.into(),
            SeasonField::EpisodesUnWatched => self.episodes_unwatched.into(),
            SeasonField::Summary => self.summary.clone().into(),
            SeasonField::Title => self.title.clone().into(),
            SeasonField::Rating => self.rating.clone().into(),
            SeasonField::RatingCount => self.rating_count.into(),
            SeasonField::MyRating => self.my_rating.clone().into(),
            SeasonField::MyRatingAt => self.my_rating_at.clone().into(),
        }
    }

    fn set(&mut self, field: SeasonField, value: FieldValue) {
        match field {
            SeasonField::Id => self.id = value.as_string(),
            SeasonField::SeriesId => self.series_id = value.as_i64(),
            SeasonField::Index => self.index = value.as_i32(),
            SeasonField::BannerFileNames => self.banner_file_names = value.as_string(),
            SeasonField::CurrentBannerFileName => {
                self.current_banner_file_name = value.as_string()
            }
            SeasonField::HasLocalFiles => self.has_local_files = value.as_bool(),
            SeasonField::HasLocalFilesTemp => self.has_local_files_temp = value.as_bool(),
            SeasonField::HasOnlineEpisodes => self.has_online_episodes = value.as_bool(),
            SeasonField::HasOnlineEpisodesTemp => {
                self.has_online_episodes_temp = value.as_bool()
            }
            SeasonField::Hidden => self.hidden = value.as_bool(),
            SeasonField::ForomSubtitleRoot => self.forom_subtitle_root = value.as_string(),
            SeasonField::UnwatchedItems => self.unwatched_items = value.as_bool(),
            SeasonField::EpisodeCount => self.episode_count = value.as_i64(),
            SeasonField::EpisodesUnWatched => self.episodes_unwatched = value.as_i64(),
            SeasonField::Summary => self.summary = value.as_string(),
            SeasonField::Title => self.title = value.as_string(),
            SeasonField::Rating => self.rating = value.as_string(),
            SeasonField::RatingCount => self.rating_count = value.as_i64(),
            SeasonField::MyRating => self.my_rating = value.as_string(),
            SeasonField::MyRatingAt => self.my_rating_at = value.as_string(),
        }
    }

    fn sync_primary_key(&mut self) {
        self.id = Self::composite_key(self.series_id, self.index);
    }

    fn default_order() -> Option<String> {
        Some(SeasonField::Index.qualified())
    }

    fn standard_conditions(ctx: &QueryContext) -> Condition {
        let mut condition = Condition::new();
        if !ctx.config_mode {
            condition.add(SeasonField::HasOnlineEpisodes, 1, ConditionOp::Equal);
        }
        if !ctx.show_hidden_items {
            condition.add(SeasonField::Hidden, 0, ConditionOp::Equal);
        }
        if !ctx.config_mode && ctx.only_show_local_files {
            let mut episodes = Condition::new();
            episodes
                .add_custom_compare(
                    &EpisodeField::SeriesId.qualified(),
                    &SeasonField::SeriesId.qualified(),
                    ConditionOp::Equal,
                )
                .add_custom_compare(
                    &EpisodeField::SeasonIndex.qualified(),
                    &SeasonField::Index.qualified(),
                    ConditionOp::Equal,
                );
            condition.add_custom(format!(
                "exists ({})",
                Episode::select_sql(&episodes, true, ctx)
            ));
        }
        condition
    }
}
