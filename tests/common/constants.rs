//! Shared constants for end-to-end tests
//!
//! When test data changes (series ids, file names), update only this file.

// ============================================================================
// Test Series
// ============================================================================

/// Series with two regular seasons and a specials season
pub const SERIES_1_ID: i64 = 79126;

pub const SERIES_1_NAME: &str = "The Wire";

/// Series without any fanart on disk
pub const SERIES_2_ID: i64 = 80348;

pub const SERIES_2_NAME: &str = "Chuck";

// ============================================================================
// Test Fanart Files (relative to the fanart folder)
// ============================================================================

pub const FANART_1: &str = "original/79126-1.jpg";

pub const FANART_2: &str = "original/79126-2.jpg";

/// Light image, recognized by its file name
pub const FANART_LIGHT: &str = "original/79126_light_3.jpg";

/// Season 1 fanart
pub const FANART_SEASON_1: &str = "original/79126S1-1.jpg";

/// Cached thumbnail, never a fanart candidate
pub const FANART_CACHED_THUMB: &str = "_cache/fanart/original/79126-1.jpg";

pub const FANART_IMAGE_WIDTH: u32 = 32;

pub const FANART_IMAGE_HEIGHT: u32 = 18;
