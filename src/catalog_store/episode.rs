use super::schema::EPISODE_TABLE;
use crate::entity_fields;
use crate::sqlite_persistence::{
    Condition, ConditionOp, Entity, EntityField, FieldValue, QueryContext, Table,
};

entity_fields! {
    pub enum EpisodeField in "online_episodes" {
        CompositeId => "CompositeID",
        SeriesId => "SeriesID",
        SeasonIndex => "SeasonIndex",
        EpisodeIndex => "EpisodeIndex",
        EpisodeName => "EpisodeName",
        Watched => "Watched",
        Hidden => "Hidden",
        Filename => "EpisodeFilename",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Episode {
    pub composite_id: String,
    pub series_id: i64,
    pub season_index: i32,
    pub episode_index: i32,
    pub name: String,
    pub watched: bool,
    pub hidden: bool,
    /// Local media file, empty when the episode is only known online.
    pub filename: String,
}

impl Episode {
    pub fn new(series_id: i64, season_index: i32, episode_index: i32) -> Self {
        let mut episode = Self {
            series_id,
            season_index,
            episode_index,
            ..Default::default()
        };
        episode.sync_primary_key();
        episode
    }

    pub fn composite_key(series_id: i64, season_index: i32, episode_index: i32) -> String {
        format!("{}_{}x{}", series_id, season_index, episode_index)
    }

    pub fn has_local_file(&self) -> bool {
        !self.filename.is_empty()
    }

    /// Condition selecting every episode of one season.
    pub fn of_season(series_id: i64, season_index: i32) -> Condition {
        let mut condition = Condition::with(EpisodeField::SeriesId, series_id, ConditionOp::Equal);
        condition.add(EpisodeField::SeasonIndex, season_index, ConditionOp::Equal);
        condition
    }
}

impl Entity for Episode {
    type Field = EpisodeField;
    const TABLE: &'static Table = &EPISODE_TABLE;

    fn primary_field() -> EpisodeField {
        EpisodeField::CompositeId
    }

    fn get(&self, field: EpisodeField) -> FieldValue {
        match field {
            EpisodeField::CompositeId => self.composite_id.clone().into(),
            EpisodeField::SeriesId => self.series_id.into(),
            EpisodeField::SeasonIndex => self.season_index.into(),
            EpisodeField::EpisodeIndex => self.episode_index.into(),
            EpisodeField::EpisodeName => self.name.clone().into(),
            EpisodeField::Watched => self.watched.into(),
            EpisodeField::Hidden => self.hidden.into(),
            EpisodeField::Filename => self.filename.clone().into(),
        }
    }

    fn set(&mut self, field: EpisodeField, value: FieldValue) {
        match field {
            EpisodeField::CompositeId => self.composite_id = value.as_string(),
            EpisodeField::SeriesId => self.series_id = value.as_i64(),
            EpisodeField::SeasonIndex => self.season_index = value.as_i32(),
            EpisodeField::EpisodeIndex => self.episode_index = value.as_i32(),
            EpisodeField::EpisodeName => self.name = value.as_string(),
            EpisodeField::Watched => self.watched = value.as_bool(),
            EpisodeField::Hidden => self.hidden = value.as_bool(),
            EpisodeField::Filename => self.filename = value.as_string(),
        }
    }

    fn sync_primary_key(&mut self) {
        self.composite_id =
            Self::composite_key(self.series_id, self.season_index, self.episode_index);
    }

    fn default_order() -> Option<String> {
        Some(format!(
            "{}, {}",
            EpisodeField::SeasonIndex.qualified(),
            EpisodeField::EpisodeIndex.qualified()
        ))
    }

    fn standard_conditions(ctx: &QueryContext) -> Condition {
        let mut condition = Condition::new();
        if !ctx.show_hidden_items {
            condition.add(EpisodeField::Hidden, 0, ConditionOp::Equal);
        }
        if !ctx.config_mode && ctx.only_show_local_files {
            condition.add(EpisodeField::Filename, "", ConditionOp::NotEqual);
        }
        condition
    }
}
