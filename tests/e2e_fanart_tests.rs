//! End-to-end tests for fanart resolution
//!
//! Uses real image files in the catalog's fanart folder and the fanart
//! records stored next to the season data.

mod common;

use common::*;
use image::GenericImageView;
use tvseries_catalog::fanart::{FanartRecord, Rgb};
use tvseries_catalog::options::OptionKey;

fn store_record(test: &TestCatalog, id: &str, local_path: &str, chosen: bool) -> FanartRecord {
    let mut record = FanartRecord::new(id, SERIES_1_ID);
    record.local_path = local_path.to_string();
    record.chosen = chosen;
    test.catalog.fanart().records().commit(&mut record).unwrap();
    record
}

fn records_of_series_1(test: &TestCatalog) -> Vec<FanartRecord> {
    test.catalog
        .fanart()
        .records()
        .get_with(&tvseries_catalog::Condition::new(), false)
        .unwrap()
        .into_iter()
        .filter(|record| record.series_id == SERIES_1_ID)
        .collect()
}

#[test]
fn test_discovery_skips_cache_and_season_images() {
    let test = TestCatalog::empty();
    test.write_fanart(FANART_1);
    test.write_fanart(FANART_2);
    test.write_fanart(FANART_SEASON_1);
    test.write_fanart(FANART_CACHED_THUMB);
    test.write_fanart("original/80348-1.jpg");

    let fanart = test.catalog.fanart().fanart(SERIES_1_ID);
    assert!(fanart.found());
    assert_eq!(
        fanart.files(),
        vec![test.fanart_path(FANART_1), test.fanart_path(FANART_2)]
    );
}

#[test]
fn test_season_fanart_prefers_season_images() {
    let test = TestCatalog::empty();
    test.write_fanart(FANART_1);
    test.write_fanart(FANART_SEASON_1);
    test.write_fanart(FANART_CACHED_THUMB);

    let season_1 = test.catalog.fanart().season_fanart(SERIES_1_ID, 1);
    assert!(season_1.season_mode());
    assert_eq!(season_1.files(), vec![test.fanart_path(FANART_SEASON_1)]);
    assert_eq!(season_1.filename(), Some(test.fanart_path(FANART_SEASON_1)));

    // no images for season 2: every series image qualifies
    let season_2 = test.catalog.fanart().season_fanart(SERIES_1_ID, 2);
    assert_eq!(
        season_2.files(),
        vec![test.fanart_path(FANART_1), test.fanart_path(FANART_SEASON_1)]
    );
}

#[test]
fn test_chosen_record_wins_and_carries_colors() {
    let test = TestCatalog::empty();
    test.write_fanart(FANART_1);
    test.write_fanart(FANART_2);
    store_record(&test, "1", FANART_1, false);
    let mut chosen = FanartRecord::new("2", SERIES_1_ID);
    chosen.local_path = FANART_2.to_string();
    chosen.chosen = true;
    chosen.set_palette(&[Rgb::new(255, 0, 0), Rgb::new(0, 128, 0), Rgb::new(10, 20, 30)]);
    test.catalog.fanart().records().commit(&mut chosen).unwrap();

    let fanart = test.catalog.fanart().fanart(SERIES_1_ID);
    assert_eq!(fanart.filename(), Some(test.fanart_path(FANART_2)));
    let colors = fanart.colors().unwrap();
    assert_eq!(colors[1].to_hex(), "008000");
}

#[test]
fn test_first_usable_record_then_first_file() {
    let test = TestCatalog::empty();
    test.write_fanart(FANART_1);
    test.write_fanart(FANART_2);

    let fanart = test.catalog.fanart().fanart(SERIES_1_ID);
    assert_eq!(fanart.filename(), Some(test.fanart_path(FANART_1)));
    assert_eq!(fanart.colors(), None);

    let mut disabled = FanartRecord::new("1", SERIES_1_ID);
    disabled.local_path = FANART_1.to_string();
    disabled.disabled = true;
    test.catalog.fanart().records().commit(&mut disabled).unwrap();
    store_record(&test, "2", FANART_2, false);
    assert_eq!(fanart.filename(), Some(test.fanart_path(FANART_2)));
}

#[test]
fn test_record_of_removed_file_is_pruned() {
    let test = TestCatalog::empty();
    test.write_fanart(FANART_1);
    store_record(&test, "9", "original/79126-9.jpg", true);

    let fanart = test.catalog.fanart().fanart(SERIES_1_ID);
    assert_eq!(fanart.filename(), Some(test.fanart_path(FANART_1)));

    let records = records_of_series_1(&test);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].local_path, "");
    assert!(records[0].chosen);
}

#[test]
fn test_random_pick_is_stable_until_next_lookup() {
    let test = TestCatalog::empty();
    test.write_fanart(FANART_1);
    test.write_fanart(FANART_2);
    test.write_fanart(FANART_LIGHT);
    test.catalog
        .options()
        .set_bool(OptionKey::RandomFanart, true)
        .unwrap();

    let fanart = test.catalog.fanart().fanart(SERIES_1_ID);
    let first = fanart.filename().unwrap();
    for _ in 0..10 {
        assert_eq!(fanart.filename(), Some(first.clone()));
    }
    assert!(fanart.files().contains(&first));
    assert_eq!(
        fanart.random_pick_is_light(),
        first.to_string_lossy().contains("_light_")
    );
}

#[test]
fn test_random_pick_prefers_usable_records() {
    let test = TestCatalog::empty();
    test.write_fanart(FANART_1);
    test.write_fanart(FANART_2);
    store_record(&test, "2", FANART_2, false);
    test.catalog
        .options()
        .set_bool(OptionKey::RandomFanart, true)
        .unwrap();

    for _ in 0..10 {
        let fanart = test.catalog.fanart().fanart(SERIES_1_ID);
        assert_eq!(fanart.filename(), Some(test.fanart_path(FANART_2)));
    }
}

#[test]
fn test_light_image_is_flagged() {
    let test = TestCatalog::empty();
    test.write_fanart(FANART_LIGHT);

    let fanart = test.catalog.fanart().fanart(SERIES_1_ID);
    assert!(fanart.random_pick_is_light());
}

#[test]
fn test_missing_fanart_is_found_after_it_appears() {
    let test = TestCatalog::empty();
    let fanart = test.catalog.fanart().fanart(SERIES_1_ID);
    assert!(!fanart.found());
    assert_eq!(fanart.filename(), None);
    assert_eq!(fanart.thumbnail_filename(), None);

    test.write_fanart(FANART_1);
    assert_eq!(fanart.filename(), Some(test.fanart_path(FANART_1)));
    assert!(fanart.found());
}

#[test]
fn test_refresh_picks_up_new_files() {
    let test = TestCatalog::empty();
    test.write_fanart(FANART_1);
    assert!(!test.catalog.fanart().refresh(SERIES_1_ID));

    let fanart = test.catalog.fanart().fanart(SERIES_1_ID);
    assert_eq!(fanart.files().len(), 1);

    test.write_fanart(FANART_2);
    assert_eq!(fanart.files().len(), 1);
    assert!(test.catalog.fanart().refresh(SERIES_1_ID));
    assert_eq!(fanart.files().len(), 2);
}

#[test]
fn test_thumbnail_is_generated_and_cache_cleared() {
    let test = TestCatalog::empty();
    test.write_fanart(FANART_1);
    let mut record = FanartRecord::new("1", SERIES_1_ID);
    record.local_path = FANART_1.to_string();
    record.thumbnail_path = FANART_CACHED_THUMB.to_string();
    record.chosen = true;
    test.catalog.fanart().records().commit(&mut record).unwrap();

    let fanart = test.catalog.fanart().fanart(SERIES_1_ID);
    let thumbnail = fanart.thumbnail_filename().unwrap();
    assert_eq!(thumbnail, test.fanart_path(FANART_CACHED_THUMB));
    let image = image::open(&thumbnail).unwrap();
    assert_eq!((image.width(), image.height()), (40, 20));

    let deleted = test
        .catalog
        .fanart()
        .clear_thumbnail_cache(SERIES_1_ID)
        .unwrap();
    assert_eq!(deleted, 1);
    assert!(!thumbnail.exists());
    assert!(records_of_series_1(&test).is_empty());
    // the record is gone, nothing to regenerate from
    assert_eq!(fanart.thumbnail_filename(), None);
}

#[test]
fn test_existing_thumbnail_is_reused() {
    let test = TestCatalog::empty();
    let cached = test.write_fanart(FANART_CACHED_THUMB);
    let mut record = FanartRecord::new("1", SERIES_1_ID);
    record.thumbnail_path = FANART_CACHED_THUMB.to_string();
    test.catalog.fanart().records().commit(&mut record).unwrap();

    let fanart = test.catalog.fanart().fanart(SERIES_1_ID);
    // no full size image on disk, the cached thumbnail is served as-is
    assert_eq!(fanart.thumbnail_filename(), Some(cached.clone()));
    let image = image::open(&cached).unwrap();
    assert_eq!(
        (image.width(), image.height()),
        (FANART_IMAGE_WIDTH, FANART_IMAGE_HEIGHT)
    );
}

#[test]
fn test_recommitted_record_keeps_its_rank() {
    let test = TestCatalog::empty();
    test.write_fanart(FANART_1);
    test.write_fanart(FANART_2);
    let mut first = store_record(&test, "1", FANART_1, false);
    store_record(&test, "2", FANART_2, false);

    let fanart = test.catalog.fanart().fanart(SERIES_1_ID);
    assert_eq!(fanart.filename(), Some(test.fanart_path(FANART_1)));

    test.catalog.fanart().records().commit(&mut first).unwrap();
    assert_eq!(fanart.filename(), Some(test.fanart_path(FANART_1)));
    let ids: Vec<String> = records_of_series_1(&test)
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(ids, vec!["1", "2"]);
}
