use super::FanartError;
use image::imageops::FilterType;
use image::ImageFormat;
use std::path::Path;
use tracing::debug;

pub trait Thumbnailer: Send + Sync {
    /// Writes a thumbnail of `source` to `target`, creating missing parent
    /// directories.
    fn create(&self, source: &Path, target: &Path) -> Result<(), FanartError>;
}

/// Resizes to a fixed size and stores the result as JPEG.
pub struct ImageThumbnailer {
    width: u32,
    height: u32,
}

impl ImageThumbnailer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Thumbnailer for ImageThumbnailer {
    fn create(&self, source: &Path, target: &Path) -> Result<(), FanartError> {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|source| FanartError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let image = image::open(source)?;
        let thumbnail = image
            .resize_exact(self.width, self.height, FilterType::Triangle)
            .to_rgb8();
        thumbnail.save_with_format(target, ImageFormat::Jpeg)?;
        debug!(
            "Created {}x{} thumbnail {:?} from {:?}",
            self.width, self.height, target, source
        );
        Ok(())
    }
}
