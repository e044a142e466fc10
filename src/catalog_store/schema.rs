//! Table definitions for the catalog entities.

use crate::sqlite_column;
use crate::sqlite_persistence::{SqlType, Table};

/// Schema version the season table is migrated to on open.
pub const SEASON_DB_VERSION: i64 = 5;

pub const SERIES_TABLE: Table = Table {
    name: "online_series",
    columns: &[
        sqlite_column!("ID", SqlType::Text, is_primary_key = true),
        sqlite_column!("Pretty_Name", SqlType::Text),
        sqlite_column!("HasLocalFiles", SqlType::Integer),
        sqlite_column!("Hidden", SqlType::Integer),
        sqlite_column!("GetEpisodesTimeStamp", SqlType::Integer),
        sqlite_column!("BannersDownloaded", SqlType::Integer),
        sqlite_column!("EpisodeCount", SqlType::Integer),
        sqlite_column!("EpisodesUnWatched", SqlType::Integer),
        sqlite_column!("UnwatchedItems", SqlType::Integer),
    ],
    indices: &[],
};

pub const SEASON_TABLE: Table = Table {
    name: "season",
    columns: &[
        // "<series id>_s<season index>"
        sqlite_column!("ID", SqlType::Text, is_primary_key = true),
        sqlite_column!("SeriesID", SqlType::Integer),
        sqlite_column!("SeasonIndex", SqlType::Integer),
        sqlite_column!("BannerFileNames", SqlType::Text),
        sqlite_column!("CurrentBannerFileName", SqlType::Text),
        sqlite_column!("HasLocalFiles", SqlType::Integer),
        sqlite_column!("HasLocalFilesTemp", SqlType::Integer),
        sqlite_column!("HasOnlineEpisodes", SqlType::Integer),
        sqlite_column!("HasOnlineEpisodesTemp", SqlType::Integer),
        sqlite_column!("Hidden", SqlType::Integer),
        sqlite_column!("ForomSubtitleRoot", SqlType::Text),
        sqlite_column!("UnwatchedItems", SqlType::Integer),
        sqlite_column!("EpisodeCount", SqlType::Integer),
        sqlite_column!("EpisodesUnWatched", SqlType::Integer),
        sqlite_column!("Summary", SqlType::Text),
        sqlite_column!("Title", SqlType::Text),
        sqlite_column!("Rating", SqlType::Text),
        sqlite_column!("RatingCount", SqlType::Integer),
        sqlite_column!("myRating", SqlType::Text),
        sqlite_column!("myRatingAt", SqlType::Text),
    ],
    indices: &[("idx_season_series", "SeriesID, SeasonIndex")],
};

pub const EPISODE_TABLE: Table = Table {
    name: "online_episodes",
    columns: &[
        // "<series id>_<season index>x<episode index>"
        sqlite_column!("CompositeID", SqlType::Text, is_primary_key = true),
        sqlite_column!("SeriesID", SqlType::Integer),
        sqlite_column!("SeasonIndex", SqlType::Integer),
        sqlite_column!("EpisodeIndex", SqlType::Integer),
        sqlite_column!("EpisodeName", SqlType::Text),
        sqlite_column!("Watched", SqlType::Integer),
        sqlite_column!("Hidden", SqlType::Integer),
        sqlite_column!("EpisodeFilename", SqlType::Text),
    ],
    indices: &[("idx_online_episodes_season", "SeriesID, SeasonIndex")],
};
