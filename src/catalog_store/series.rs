use super::schema::SERIES_TABLE;
use crate::entity_fields;
use crate::sqlite_persistence::{Entity, FieldValue, Table};

entity_fields! {
    pub enum SeriesField in "online_series" {
        Id => "ID",
        PrettyName => "Pretty_Name",
        HasLocalFiles => "HasLocalFiles",
        Hidden => "Hidden",
        GetEpisodesTimeStamp => "GetEpisodesTimeStamp",
        BannersDownloaded => "BannersDownloaded",
        EpisodeCount => "EpisodeCount",
        EpisodesUnWatched => "EpisodesUnWatched",
        UnwatchedItems => "UnwatchedItems",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Series {
    pub id: i64,
    pub pretty_name: String,
    pub has_local_files: bool,
    pub hidden: bool,
    pub get_episodes_timestamp: i64,
    pub banners_downloaded: bool,
    pub episode_count: i64,
    pub episodes_unwatched: i64,
    pub unwatched_items: bool,
}

impl Series {
    pub fn new(id: i64, pretty_name: impl Into<String>) -> Self {
        Self {
            id,
            pretty_name: pretty_name.into(),
            ..Default::default()
        }
    }
}

impl Entity for Series {
    type Field = SeriesField;
    const TABLE: &'static Table = &SERIES_TABLE;

    fn primary_field() -> SeriesField {
        SeriesField::Id
    }

    fn get(&self, field: SeriesField) -> FieldValue {
        match field {
            // Keys are text so every table can hold composite ids.
            SeriesField::Id => self.id.to_string().into(),
            SeriesField::PrettyName => self.pretty_name.clone().into(),
            SeriesField::HasLocalFiles => self.has_local_files.into(),
            SeriesField::Hidden => self.hidden.into(),
            SeriesField::GetEpisodesTimeStamp => self.get_episodes_timestamp.into(),
            SeriesField::BannersDownloaded => self.banners_downloaded.into(),
            SeriesField::EpisodeCount => self.episode_count.into(),
            SeriesField::EpisodesUnWatched => self.episodes_unwatched.into(),
            SeriesField::UnwatchedItems => self.unwatched_items.into(),
        }
    }

    fn set(&mut self, field: SeriesField, value: FieldValue) {
        match field {
            SeriesField::Id => self.id = value.as_i64(),
            SeriesField::PrettyName => self.pretty_name = value.as_string(),
            SeriesField::HasLocalFiles => self.has_local_files = value.as_bool(),
            SeriesField::Hidden => self.hidden = value.as_bool(),
            SeriesField::GetEpisodesTimeStamp => self.get_episodes_timestamp = value.as_i64(),
            SeriesField::BannersDownloaded => self.banners_downloaded = value.as_bool(),
            SeriesField::EpisodeCount => self.episode_count = value.as_i64(),
            SeriesField::EpisodesUnWatched => self.episodes_unwatched = value.as_i64(),
            SeriesField::UnwatchedItems => self.unwatched_items = value.as_bool(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_definition_matches_fields() {
        crate::sqlite_persistence::entity::assert_fields_match_table::<Series>();
    }

    #[test]
    fn test_key_is_series_id_text() {
        let series = Series::new(81189, "Breaking Bad");
        assert_eq!(series.primary_key(), "81189");
    }
}
