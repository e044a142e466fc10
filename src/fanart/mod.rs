//! Fanart discovery, selection and thumbnails.

mod cache;
mod discovery;
mod models;
mod thumbnail;

pub use cache::{Fanart, FanartCache, FanartKey};
pub use discovery::{FanartDiscovery, LocalFilesystem};
pub use models::{FanartField, FanartRecord, Rgb, FANART_TABLE};
pub use thumbnail::{ImageThumbnailer, Thumbnailer};

use crate::sqlite_persistence::StoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FanartError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to walk fanart folder: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid fanart pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}
