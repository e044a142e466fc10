//! End-to-end tests for season records
//!
//! Tests the season table through the catalog: composite keys, standard
//! conditions driven by the options table, ordering and commit listeners.

mod common;

use common::{TestCatalog, SERIES_1_ID, SERIES_2_ID};
use std::sync::{Arc, Mutex};
use tvseries_catalog::catalog_store::{Catalog, Season, SeasonField};
use tvseries_catalog::options::OptionKey;
use tvseries_catalog::sqlite_persistence::{Condition, ConditionOp};

fn indices(seasons: &[Season]) -> Vec<i32> {
    seasons.iter().map(|s| s.index).collect()
}

fn visible_seasons(catalog: &Catalog) -> Vec<i32> {
    indices(
        &catalog
            .seasons_of_series(SERIES_1_ID, &Condition::new())
            .unwrap(),
    )
}

#[test]
fn test_commit_then_read_round_trips_every_field() {
    let test = TestCatalog::empty();
    let mut season = Season::new(SERIES_2_ID, 4);
    season.banner_file_names = "a.jpg|b.jpg".to_string();
    season.current_banner_file_name = "a.jpg".to_string();
    season.has_local_files = true;
    season.has_local_files_temp = true;
    season.has_online_episodes = true;
    season.has_online_episodes_temp = true;
    season.hidden = true;
    season.forom_subtitle_root = "chuck".to_string();
    season.unwatched_items = true;
    season.episode_count = 13;
    season.episodes_unwatched = 2;
    season.summary = "It's the \"last\" one".to_string();
    season.title = "Season 4".to_string();
    season.rating = "8.5".to_string();
    season.rating_count = 120;
    season.my_rating = "9".to_string();
    season.my_rating_at = "2011-05-16".to_string();
    test.catalog.seasons().commit(&mut season).unwrap();

    let loaded = test
        .catalog
        .seasons()
        .get_by_key(&format!("{}_s4", SERIES_2_ID))
        .unwrap()
        .unwrap();
    assert_eq!(loaded, season);

    // committing again without changes keeps one readable row
    test.catalog.seasons().commit(&mut season).unwrap();
    let all = test
        .catalog
        .seasons()
        .get_with(&Condition::new(), false)
        .unwrap();
    assert_eq!(all, vec![season]);
}

#[test]
fn test_missing_season_reads_as_defaults() {
    let test = TestCatalog::empty();
    let mut season = Season::new(SERIES_1_ID, 1);
    season.title = "stale".to_string();

    let found = test
        .catalog
        .seasons()
        .read_primary(&mut season, "1_s1")
        .unwrap();
    assert!(!found);
    assert_eq!(season, Season::default());
    assert_eq!(test.catalog.season_raw(SERIES_1_ID, 1).unwrap(), None);
}

#[test]
fn test_standard_conditions_hide_hidden_seasons() {
    let test = TestCatalog::with_seasons();
    assert_eq!(visible_seasons(&test.catalog), vec![0, 1, 2]);

    test.catalog
        .options()
        .set_bool(OptionKey::ShowHiddenItems, true)
        .unwrap();
    assert_eq!(visible_seasons(&test.catalog), vec![0, 1, 2, 3]);
}

#[test]
fn test_only_local_files_requires_a_local_episode() {
    let test = TestCatalog::with_seasons();
    test.catalog
        .options()
        .set_bool(OptionKey::OnlyShowLocalFiles, true)
        .unwrap();
    assert_eq!(visible_seasons(&test.catalog), vec![0, 1]);

    test.add_episode(SERIES_1_ID, 2, 2, false, true);
    assert_eq!(visible_seasons(&test.catalog), vec![0, 1, 2]);
}

#[test]
fn test_config_mode_shows_seasons_without_online_episodes() {
    let mut test = TestCatalog::with_seasons();
    let mut offline = Season::new(SERIES_1_ID, 5);
    offline.has_online_episodes = false;
    test.catalog.seasons().commit(&mut offline).unwrap();
    test.catalog
        .options()
        .set_bool(OptionKey::OnlyShowLocalFiles, true)
        .unwrap();
    assert_eq!(visible_seasons(&test.catalog), vec![0, 1]);

    let mut settings = TestCatalog::settings(test.dir.path());
    settings.config_mode = true;
    test.catalog = Catalog::open_path(&test.db_path, settings).unwrap();
    // hidden rows still follow the option
    assert_eq!(visible_seasons(&test.catalog), vec![0, 1, 2, 5]);
}

#[test]
fn test_custom_order_and_limit() {
    let test = TestCatalog::with_seasons();
    let mut condition = Condition::new();
    condition
        .set_order("season.SeasonIndex desc")
        .set_limit(2);
    let seasons = test
        .catalog
        .seasons_of_series(SERIES_1_ID, &condition)
        .unwrap();
    assert_eq!(indices(&seasons), vec![2, 1]);
}

#[test]
fn test_specials_sort_last_unless_disabled() {
    let test = TestCatalog::with_seasons();
    let mut seasons = test
        .catalog
        .seasons_of_series(SERIES_1_ID, &Condition::new())
        .unwrap();

    test.catalog.sort_seasons(&mut seasons);
    assert_eq!(indices(&seasons), vec![1, 2, 0]);

    test.catalog
        .options()
        .set_bool(OptionKey::SortSpecialSeasonLast, false)
        .unwrap();
    test.catalog.sort_seasons(&mut seasons);
    assert_eq!(indices(&seasons), vec![0, 1, 2]);
}

#[test]
fn test_commit_listeners_see_committed_season() {
    let test = TestCatalog::empty();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    test.catalog.seasons().subscribe(move |season: &Season| {
        sink.lock().unwrap().push(season.id.clone());
    });

    test.catalog
        .seasons()
        .commit(&mut Season::new(SERIES_1_ID, 2))
        .unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["79126_s2".to_string()]);
}

#[test]
fn test_global_set_and_clear() {
    let test = TestCatalog::with_seasons();
    let updated = test
        .catalog
        .seasons()
        .global_set(SeasonField::Hidden, false, &Condition::new())
        .unwrap();
    assert_eq!(updated, 4);
    assert_eq!(visible_seasons(&test.catalog), vec![0, 1, 2, 3]);

    let removed = test
        .catalog
        .seasons()
        .clear(&Condition::with(SeasonField::Index, 1, ConditionOp::GreaterThan))
        .unwrap();
    assert_eq!(removed, 2);
    assert_eq!(visible_seasons(&test.catalog), vec![0, 1]);
}

#[test]
fn test_episode_counts_and_hiding() {
    let test = TestCatalog::with_seasons();
    let catalog = &test.catalog;

    let mut series = catalog.series().get_by_key("79126").unwrap().unwrap();
    let mut season = catalog.season(SERIES_1_ID, 1).unwrap();
    catalog.update_episode_counts(&mut series, &mut season).unwrap();
    assert_eq!((season.episode_count, season.episodes_unwatched), (2, 1));
    // hiding a season doesn't hide its episodes from the series totals
    assert_eq!((series.episode_count, series.episodes_unwatched), (5, 4));

    catalog.hide_season(&mut season, true).unwrap();
    assert_eq!(visible_seasons(catalog), vec![0, 2]);
    assert!(catalog.episodes_of_season(SERIES_1_ID, 1).unwrap().is_empty());

    catalog.hide_season(&mut season, false).unwrap();
    assert_eq!(visible_seasons(catalog), vec![0, 1, 2]);
    assert_eq!(catalog.episodes_of_season(SERIES_1_ID, 1).unwrap().len(), 2);
}
