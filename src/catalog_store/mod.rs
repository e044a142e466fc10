mod catalog;
mod episode;
mod migrations;
mod schema;
mod season;
mod series;

pub use catalog::{
    Catalog, CatalogSettings, DeleteScope, DEFAULT_THUMBNAIL_HEIGHT, DEFAULT_THUMBNAIL_WIDTH,
};
pub use episode::{Episode, EpisodeField};
pub use migrations::SEASON_MIGRATION;
pub use schema::{EPISODE_TABLE, SEASON_DB_VERSION, SEASON_TABLE, SERIES_TABLE};
pub use season::{Season, SeasonField};
pub use series::{Series, SeriesField};
