use crate::entity_fields;
use crate::sqlite_column;
use crate::sqlite_persistence::{Entity, FieldValue, SqlType, Table};
use std::path::{Path, PathBuf};

pub const FANART_TABLE: Table = Table {
    name: "fanart",
    columns: &[
        sqlite_column!("id", SqlType::Text, is_primary_key = true),
        sqlite_column!("seriesID", SqlType::Integer),
        sqlite_column!("Chosen", SqlType::Integer),
        // relative to the fanart folder, empty once the file is gone
        sqlite_column!("LocalPath", SqlType::Text),
        sqlite_column!("BannerPath", SqlType::Text),
        sqlite_column!("ThumbnailPath", SqlType::Text),
        // "|r,g,b|r,g,b|r,g,b|"
        sqlite_column!("Colors", SqlType::Text),
        sqlite_column!("Disabled", SqlType::Integer),
    ],
    indices: &[("idx_fanart_series", "seriesID")],
};

entity_fields! {
    pub enum FanartField in "fanart" {
        Id => "id",
        SeriesId => "seriesID",
        Chosen => "Chosen",
        LocalPath => "LocalPath",
        BannerPath => "BannerPath",
        ThumbnailPath => "ThumbnailPath",
        Colors => "Colors",
        Disabled => "Disabled",
    }
}

/// Persisted metadata of one fanart image of a series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanartRecord {
    pub id: String,
    pub series_id: i64,
    pub chosen: bool,
    pub local_path: String,
    /// Online location the image was downloaded from.
    pub banner_path: String,
    pub thumbnail_path: String,
    pub colors: String,
    pub disabled: bool,
}

impl FanartRecord {
    pub fn new(id: impl Into<String>, series_id: i64) -> Self {
        Self {
            id: id.into(),
            series_id,
            ..Default::default()
        }
    }

    pub fn full_local_path(&self, fanart_dir: &Path) -> Option<PathBuf> {
        (!self.local_path.is_empty()).then(|| fanart_dir.join(&self.local_path))
    }

    pub fn has_color_info(&self) -> bool {
        !self.colors.trim_matches('|').is_empty()
    }

    /// The stored palette, `None` unless all three colours parse.
    pub fn palette(&self) -> Option<[Rgb; 3]> {
        let colors: Vec<Rgb> = self
            .colors
            .split('|')
            .filter(|part| !part.is_empty())
            .map(Rgb::parse)
            .collect::<Option<_>>()?;
        colors.try_into().ok()
    }

    pub fn set_palette(&mut self, palette: &[Rgb; 3]) {
        let parts: Vec<String> = palette
            .iter()
            .map(|c| format!("{},{},{}", c.r, c.g, c.b))
            .collect();
        self.colors = format!("|{}|", parts.join("|"));
    }
}

impl Entity for FanartRecord {
    type Field = FanartField;
    const TABLE: &'static Table = &FANART_TABLE;

    fn primary_field() -> FanartField {
        FanartField::Id
    }

    fn get(&self, field: FanartField) -> FieldValue {
        match field {
            FanartField::Id => self.id.clone().into(),
            FanartField::SeriesId => self.series_id.into(),
            FanartField::Chosen => self.chosen.into(),
            FanartField::LocalPath => self.local_path.clone().into(),
            FanartField::BannerPath => self.banner_path.clone().into(),
            FanartField::ThumbnailPath => self.thumbnail_path.clone().into(),
            FanartField::Colors => self.colors.clone().into(),
            FanartField::Disabled => self.disabled.into(),
        }
    }

    fn set(&mut self, field: FanartField, value: FieldValue) {
        match field {
            FanartField::Id => self.id = value.as_string(),
            FanartField::SeriesId => self.series_id = value.as_i64(),
            FanartField::Chosen => self.chosen = value.as_bool(),
            FanartField::LocalPath => self.local_path = value.as_string(),
            FanartField::BannerPath => self.banner_path = value.as_string(),
            FanartField::ThumbnailPath => self.thumbnail_path = value.as_string(),
            FanartField::Colors => self.colors = value.as_string(),
            FanartField::Disabled => self.disabled = value.as_bool(),
        }
    }

    /// Insertion order, commits update rows in place.
    fn default_order() -> Option<String> {
        Some(FANART_TABLE.qualified("rowid"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn parse(value: &str) -> Option<Self> {
        let mut channels = value.split(',').map(|c| c.trim().parse::<u8>().ok());
        let rgb = Self::new(channels.next()??, channels.next()??, channels.next()??);
        channels.next().is_none().then_some(rgb)
    }

    /// `rrggbb`, without alpha.
    pub fn to_hex(&self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
