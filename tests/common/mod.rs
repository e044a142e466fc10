//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestCatalog, SERIES_1_ID};
//!
//! #[test]
//! fn test_get_season() {
//!     let test = TestCatalog::with_seasons();
//!     let season = test.catalog.season_raw(SERIES_1_ID, 1).unwrap();
//!     assert!(season.is_some());
//! }
//! ```

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::TestCatalog;
