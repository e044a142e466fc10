//! TV Series Catalog Library
//!
//! Schema versioned storage of series, seasons and episodes, plus the fanart
//! cache. The modules are public for the binary and the integration tests.

pub mod catalog_store;
pub mod config;
pub mod fanart;
pub mod migration;
pub mod options;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog_store::{Catalog, CatalogSettings, DeleteScope, Episode, Season, Series};
pub use fanart::{Fanart, FanartCache, FanartRecord, Rgb};
pub use options::{OptionKey, OptionsStore};
pub use sqlite_persistence::{Condition, ConditionOp, Entity, EntityTable, SqliteExecutor};
