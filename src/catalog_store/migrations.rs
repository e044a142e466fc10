//! Upgrade steps of the season table.

use super::catalog::Catalog;
use super::schema::SEASON_DB_VERSION;
use super::season::SeasonField;
use super::series::SeriesField;
use crate::migration::{MigrationPlan, MigrationStep, StepKind};
use crate::options::OptionKey;
use crate::sqlite_persistence::Condition;
use anyhow::{Context, Result};

pub const SEASON_MIGRATION: MigrationPlan<Catalog> = MigrationPlan {
    name: "season",
    version_key: OptionKey::DbSeasonVersion,
    target_version: SEASON_DB_VERSION,
    steps: &[
        MigrationStep {
            from_version: 1,
            kind: StepKind::TableReset,
            description: "drop the season table, the series table format changed",
            apply: reset_season_table,
        },
        MigrationStep {
            from_version: 2,
            kind: StepKind::BulkUpdate,
            description: "unhide seasons and reset episode timestamps",
            apply: unhide_seasons,
        },
        MigrationStep {
            from_version: 3,
            kind: StepKind::RowRecompute,
            description: "derive unwatched flags from episodes",
            apply: derive_unwatched_flags,
        },
        MigrationStep {
            from_version: 4,
            kind: StepKind::RowRecompute,
            description: "count watched and unwatched episodes",
            apply: derive_episode_counts,
        },
    ],
};

fn reset_season_table(catalog: &Catalog) -> Result<()> {
    catalog.seasons().reset_table()?;
    Ok(())
}

fn unhide_seasons(catalog: &Catalog) -> Result<()> {
    catalog
        .seasons()
        .global_set(SeasonField::Hidden, false, &Condition::new())?;
    catalog
        .series()
        .global_set(SeriesField::GetEpisodesTimeStamp, 0, &Condition::new())?;
    Ok(())
}

fn derive_unwatched_flags(catalog: &Catalog) -> Result<()> {
    for mut season in catalog.seasons().get_all_for_migration()? {
        season.unwatched_items = catalog
            .first_unwatched(season.series_id, season.index)?
            .is_some();
        catalog
            .seasons()
            .commit(&mut season)
            .with_context(|| format!("Failed to store season {}", season.id))?;
    }
    Ok(())
}

fn derive_episode_counts(catalog: &Catalog) -> Result<()> {
    for mut season in catalog.seasons().get_all_for_migration()? {
        let (total, unwatched) = catalog.season_episode_counts(season.series_id, season.index)?;
        season.episode_count = total;
        season.episodes_unwatched = unwatched;
        catalog
            .seasons()
            .commit(&mut season)
            .with_context(|| format!("Failed to store season {}", season.id))?;
    }
    Ok(())
}
